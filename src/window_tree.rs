
use {
    crate::{
        ids::{ClientId, SurfaceId, WindowId},
        rect::Rect,
        server_window::ServerWindow,
        service::WindowService,
        utils::{copyhashmap::CopyHashMap, errorfmt::ErrorFmt},
    },
    isnt::std_1::vec::IsntVecExt,
    std::{
        cell::{Cell, RefCell},
        mem,
        rc::{Rc, Weak},
    },
    thiserror::Error,
};

#[derive(Debug, Error)]
pub enum WindowTreeError {
    #[error("The window id {0} is already in use")]
    WindowIdInUse(WindowId),
    #[error("This tree does not know a window with id {0}")]
    UnknownWindow(WindowId),
    #[error("The window {0} is not owned by this tree")]
    NotOwner(SurfaceId),
    #[error("The window {0} is not a top-level window")]
    NotTopLevel(SurfaceId),
}

/// Events delivered to the client at the other end of a tree. Events for a
/// window reach the client in the order in which the underlying mutations
/// occurred.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TreeEvent {
    WindowCreated { window: WindowId },
    BoundsChanged { window: WindowId, bounds: Rect },
    VisibilityChanged { window: WindowId, visible: bool },
    WindowDestroyed { window: WindowId },
    FocusChanged { window: Option<WindowId> },
    CloseRequested { window: WindowId },
}

/// The outbound event channel of one client connection. Exclusively owned by
/// the connection's window tree.
pub trait TreeClient {
    fn event(&self, event: TreeEvent);
}

/// One client's projection of the shared window tree.
///
/// The tree tracks every window the client created or was granted visibility
/// into, keyed by the client-local window id. Requests mutate the platform
/// tree; platform mutations come back in through the `forward_*` methods and
/// leave as events, restricted to the windows this tree tracks.
pub struct WindowTree {
    pub client_id: ClientId,
    service: Weak<WindowService>,
    client: Rc<dyn TreeClient>,
    windows: CopyHashMap<WindowId, Rc<ServerWindow>>,
    surfaces: CopyHashMap<SurfaceId, WindowId>,
    created: RefCell<Vec<WindowId>>,
    /// Ids of windows that have been destroyed. Destruction is terminal for
    /// an id; re-creating a window under a retired id would resurrect its
    /// surface identity.
    retired: CopyHashMap<WindowId, ()>,
    dead: Cell<bool>,
}

impl WindowTree {
    pub(crate) fn new(
        client_id: ClientId,
        service: &Rc<WindowService>,
        client: Rc<dyn TreeClient>,
    ) -> Self {
        Self {
            client_id,
            service: Rc::downgrade(service),
            client,
            windows: Default::default(),
            surfaces: Default::default(),
            created: Default::default(),
            retired: Default::default(),
            dead: Cell::new(false),
        }
    }

    fn service(&self) -> Rc<WindowService> {
        // Trees are torn down before the service; a dangling reference here
        // is bookkeeping corruption.
        self.service.upgrade().expect("window service is gone")
    }

    /// Creates a top-level window under the id the client obtained from the
    /// service. The reply to this request is the only confirmation the
    /// creating client receives; `WindowCreated` events announce windows to
    /// trees that did not create them.
    pub fn create_window(&self, id: WindowId, bounds: Rect) -> Result<(), WindowTreeError> {
        if self.windows.contains(&id) || self.retired.contains(&id) {
            return Err(WindowTreeError::WindowIdInUse(id));
        }
        log::trace!("Client {} -> create_window {}", self.client_id, id);
        let service = self.service();
        let window = service.platform.create_window(None);
        window.set_bounds(bounds);
        let surface = SurfaceId {
            client: self.client_id,
            window: id,
        };
        let server = ServerWindow::create(&window, surface, true);
        server.set_owner(Some(self.client_id));
        service.add_window(&server);
        self.windows.set(id, server);
        self.surfaces.set(surface, id);
        self.created.borrow_mut().push(id);
        Ok(())
    }

    pub fn set_bounds(&self, id: WindowId, bounds: Rect) -> Result<(), WindowTreeError> {
        let server = self.get(id)?;
        server.window.set_bounds(bounds);
        Ok(())
    }

    pub fn set_visible(&self, id: WindowId, visible: bool) -> Result<(), WindowTreeError> {
        let server = self.get(id)?;
        server.window.set_visible(visible);
        Ok(())
    }

    pub fn set_property(
        &self,
        id: WindowId,
        key: &str,
        value: Vec<u8>,
    ) -> Result<(), WindowTreeError> {
        let server = self.get(id)?;
        server.window.set_property(key, value);
        Ok(())
    }

    /// Asks the owner of a top-level window to close it. Only the owning
    /// tree may do this; the window is never destroyed directly, the owning
    /// client applies its own close semantics first.
    pub fn request_close(&self, id: WindowId) -> Result<(), WindowTreeError> {
        let server = self.get(id)?;
        if !server.is_top_level() {
            return Err(WindowTreeError::NotTopLevel(server.id));
        }
        match server.owner() {
            Some(owner) if owner == self.client_id => {
                self.handle_close_request(&server);
                Ok(())
            }
            _ => Err(WindowTreeError::NotOwner(server.id)),
        }
    }

    /// Grants this client visibility into a window it did not create. The
    /// ownership of the window is untouched.
    pub fn observe_window(&self, server: &Rc<ServerWindow>) -> WindowId {
        if let Some(existing) = self.surfaces.get(&server.id) {
            return existing;
        }
        let id = self.service().allocate_window_id();
        self.windows.set(id, server.clone());
        self.surfaces.set(server.id, id);
        self.emit(TreeEvent::WindowCreated { window: id });
        id
    }

    pub fn num_windows(&self) -> usize {
        self.windows.len()
    }

    pub fn window(&self, id: WindowId) -> Option<Rc<ServerWindow>> {
        self.windows.get(&id)
    }

    fn get(&self, id: WindowId) -> Result<Rc<ServerWindow>, WindowTreeError> {
        match self.windows.get(&id) {
            Some(s) => Ok(s),
            _ => Err(WindowTreeError::UnknownWindow(id)),
        }
    }

    pub(crate) fn handle_close_request(&self, server: &Rc<ServerWindow>) {
        let Some(id) = self.surfaces.get(&server.id) else {
            // The owner back-reference points at a tree that does not track
            // the window. This is bookkeeping corruption, not client
            // misbehavior.
            panic!(
                "tree of client {} owns window {} but does not track it",
                self.client_id, server.id,
            );
        };
        log::trace!(
            "Routing close request for window {} to client {}",
            server.id,
            self.client_id,
        );
        self.emit(TreeEvent::CloseRequested { window: id });
    }

    pub(crate) fn forward_bounds_changed(&self, surface: SurfaceId, bounds: Rect) {
        if let Some(id) = self.surfaces.get(&surface) {
            self.emit(TreeEvent::BoundsChanged {
                window: id,
                bounds,
            });
        }
    }

    pub(crate) fn forward_visibility_changed(&self, surface: SurfaceId, visible: bool) {
        if let Some(id) = self.surfaces.get(&surface) {
            self.emit(TreeEvent::VisibilityChanged {
                window: id,
                visible,
            });
        }
    }

    pub(crate) fn forward_window_destroyed(&self, surface: SurfaceId) {
        if let Some(id) = self.surfaces.remove(&surface) {
            self.windows.remove(&id);
            self.retired.set(id, ());
            self.emit(TreeEvent::WindowDestroyed { window: id });
        }
    }

    pub(crate) fn forward_focus_changed(
        &self,
        old: Option<SurfaceId>,
        new: Option<SurfaceId>,
    ) {
        let old = old.and_then(|s| self.surfaces.get(&s));
        let new = new.and_then(|s| self.surfaces.get(&s));
        if old.is_none() && new.is_none() {
            return;
        }
        self.emit(TreeEvent::FocusChanged { window: new });
    }

    /// Tears the tree down after its connection closed. Policy: every window
    /// this tree created is destroyed, in reverse creation order; windows it
    /// was merely granted visibility into are only dropped from the
    /// projection. A platform error while destroying one window is logged
    /// and does not stop the teardown of the others.
    pub(crate) fn teardown(&self) {
        self.dead.set(true);
        let service = self.service();
        let created = mem::take(&mut *self.created.borrow_mut());
        if created.is_not_empty() {
            log::info!(
                "Destroying {} windows of client {}",
                created.len(),
                self.client_id,
            );
        }
        for id in created.iter().rev() {
            let Some(server) = self.windows.remove(id) else {
                continue;
            };
            if let Err(e) = service.platform.destroy_window(&server.window) {
                log::error!("Could not destroy window {}: {}", server.id, ErrorFmt(e));
            }
        }
        self.windows.clear();
        self.surfaces.clear();
    }

    fn emit(&self, event: TreeEvent) {
        if self.dead.get() {
            return;
        }
        log::trace!("Client {} <= {:?}", self.client_id, event);
        self.client.event(event);
    }
}
