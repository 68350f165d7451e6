use {
    crate::{
        client::{InterfaceChannel, InterfaceEvent},
        ids::ClientId,
        rect::Rect,
        utils::bindings::Bindings,
    },
    std::{
        cell::{Cell, RefCell},
        rc::Rc,
    },
};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Screen {
    pub id: u64,
    pub bounds: Rect,
    pub work_area: Rect,
    pub scale: u32,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub struct Insets {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

/// Hands clients the screen configuration and the frame decoration values
/// the window manager wants them to use.
pub struct ScreenProvider {
    bindings: Bindings,
    screens: RefCell<Vec<Screen>>,
    client_area_insets: Cell<Insets>,
    max_title_bar_button_width: Cell<i32>,
}

impl ScreenProvider {
    pub const NAME: &'static str = "screen-provider";

    pub fn new() -> Self {
        Self {
            bindings: Default::default(),
            screens: Default::default(),
            client_area_insets: Cell::new(Insets::default()),
            max_title_bar_button_width: Cell::new(0),
        }
    }

    /// New bindings are told about the current configuration right away.
    pub fn add_binding(&self, channel: &Rc<InterfaceChannel>) {
        self.bindings.add(channel);
        channel.notify(InterfaceEvent::ScreenConfigurationChanged);
    }

    pub fn remove_client(&self, client: ClientId) {
        self.bindings.remove_client(client);
    }

    pub fn set_screens(&self, screens: Vec<Screen>) {
        if *self.screens.borrow() == screens {
            return;
        }
        *self.screens.borrow_mut() = screens;
        self.bindings
            .broadcast(InterfaceEvent::ScreenConfigurationChanged);
    }

    pub fn screens(&self) -> Vec<Screen> {
        self.screens.borrow().clone()
    }

    pub fn set_frame_decoration_values(
        &self,
        client_area_insets: Insets,
        max_title_bar_button_width: i32,
    ) {
        let insets_same = self.client_area_insets.replace(client_area_insets) == client_area_insets;
        let width_same =
            self.max_title_bar_button_width.replace(max_title_bar_button_width)
                == max_title_bar_button_width;
        if insets_same && width_same {
            return;
        }
        self.bindings
            .broadcast(InterfaceEvent::ScreenConfigurationChanged);
    }

    pub fn client_area_insets(&self) -> Insets {
        self.client_area_insets.get()
    }

    pub fn max_title_bar_button_width(&self) -> i32 {
        self.max_title_bar_button_width.get()
    }
}
