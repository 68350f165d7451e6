use {
    crate::{
        ids::{ClientId, SurfaceId},
        tree::PlatformWindow,
    },
    std::{cell::Cell, rc::Rc},
};

/// The service-side identity of a platform window.
///
/// Exactly one wrapper exists per platform window. The wrapper is attached as
/// metadata on the window itself so that the reverse lookup is O(1) and needs
/// no secondary index. The owner back-reference is a plain `ClientId` handle
/// into the service's tree map rather than a pointer, so there is no
/// ownership cycle between trees and windows.
pub struct ServerWindow {
    pub id: SurfaceId,
    pub window: Rc<PlatformWindow>,
    top_level: bool,
    owner: Cell<Option<ClientId>>,
}

impl ServerWindow {
    /// Attaches a fresh wrapper to the window. At most one wrapper may ever
    /// be attached to a window at a time; a second attachment is a bug in the
    /// caller.
    pub fn create(window: &Rc<PlatformWindow>, id: SurfaceId, top_level: bool) -> Rc<Self> {
        let server = Rc::new(Self {
            id,
            window: window.clone(),
            top_level,
            owner: Cell::new(None),
        });
        let prev = window.set_server(Some(server.clone()));
        assert!(prev.is_none(), "window {} already has a server window", window.id);
        server
    }

    /// Returns the wrapper attached to the window, if any.
    pub fn get(window: &PlatformWindow) -> Option<Rc<Self>> {
        window.server()
    }

    /// True if the window represents an independent on-screen surface, that
    /// is, it is not nested under another window in the shared tree.
    pub fn is_top_level(&self) -> bool {
        self.top_level
    }

    /// The client whose tree currently owns this window. `None` for windows
    /// that no remote client owns.
    pub fn owner(&self) -> Option<ClientId> {
        self.owner.get()
    }

    pub fn set_owner(&self, owner: Option<ClientId>) {
        self.owner.set(owner);
    }
}
