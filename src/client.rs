use {
    crate::{
        ids::ClientId,
        utils::numcell::NumCell,
    },
    std::{
        fmt::{Display, Formatter},
        rc::Rc,
    },
};

/// Identifies one bound endpoint of a satellite service.
#[derive(Debug, Copy, Clone, Hash, Ord, PartialOrd, Eq, PartialEq)]
pub struct BindingId(u64);

impl BindingId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl Display for BindingId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

pub struct BindingIds {
    next: NumCell<u64>,
}

impl Default for BindingIds {
    fn default() -> Self {
        Self {
            next: NumCell::new(1),
        }
    }
}

impl BindingIds {
    pub fn next(&self) -> BindingId {
        BindingId(self.next.fetch_add(1))
    }
}

/// Notifications emitted by the satellite services. The transport turns these
/// into whatever wire messages its protocol defines.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum InterfaceEvent {
    ClipboardChanged,
    ScreenConfigurationChanged,
    InputDevicesChanged,
    ImeDriverChanged,
}

/// The outbound half of a satellite-service channel, supplied by the
/// transport when a client asks to bind an interface.
pub trait InterfaceEventSink {
    fn notify(&self, event: InterfaceEvent);
}

/// One bound satellite-service endpoint of one client connection.
pub struct InterfaceChannel {
    pub binding: BindingId,
    pub client: ClientId,
    sink: Rc<dyn InterfaceEventSink>,
}

impl InterfaceChannel {
    pub fn new(binding: BindingId, client: ClientId, sink: Rc<dyn InterfaceEventSink>) -> Rc<Self> {
        Rc::new(Self {
            binding,
            client,
            sink,
        })
    }

    pub fn notify(&self, event: InterfaceEvent) {
        log::trace!("Client {} <= {:?}", self.client, event);
        self.sink.notify(event);
    }
}
