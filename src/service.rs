#[cfg(test)]
mod tests;

use {
    crate::{
        client::{BindingIds, InterfaceChannel, InterfaceEventSink},
        ids::{ClientId, Ids, SERVICE_CLIENT_ID, SurfaceId, WindowId},
        ifs::{
            clipboard::Clipboard,
            gpu::{self, GpuSupport},
            ime::{ImeDriver, ImeRegistrar},
            input_devices::InputDeviceServer,
            screen_provider::ScreenProvider,
        },
        rect::Rect,
        registry::InterfaceRegistry,
        server_window::ServerWindow,
        tree::{PlatformTree, PlatformWindow, TreeObserver},
        utils::{clonecell::CloneCell, copyhashmap::CopyHashMap},
        window_tree::{TreeClient, WindowTree},
        window_tree_factory::WindowTreeFactory,
    },
    std::rc::{Rc, Weak},
};

/// The top-level coordinator.
///
/// Owns the identifier allocator, the per-connection window trees, the
/// SurfaceId-keyed window store, and the interface registry for the
/// satellite services. All methods must be called from the single
/// coordination context; the type is deliberately neither `Send` nor `Sync`.
pub struct WindowService {
    pub ids: Ids,
    pub platform: Rc<PlatformTree>,
    windows: CopyHashMap<SurfaceId, Rc<ServerWindow>>,
    trees: CopyHashMap<ClientId, Rc<WindowTree>>,
    factory: WindowTreeFactory,
    registry: InterfaceRegistry,
    binding_ids: BindingIds,
    pub(crate) gpu: Option<Rc<dyn GpuSupport>>,
    clipboard: CloneCell<Option<Rc<Clipboard>>>,
    screen_provider: CloneCell<Option<Rc<ScreenProvider>>>,
    ime_driver: CloneCell<Option<Rc<ImeDriver>>>,
    ime_registrar: CloneCell<Option<Rc<ImeRegistrar>>>,
    input_devices: CloneCell<Option<Rc<InputDeviceServer>>>,
}

impl WindowService {
    pub fn new(platform: &Rc<PlatformTree>, gpu: Option<Rc<dyn GpuSupport>>) -> Rc<Self> {
        let slf = Rc::new_cyclic(|weak: &Weak<Self>| {
            let registry = InterfaceRegistry::new();
            registry.add(
                Clipboard::NAME,
                Box::new(|s, c| s.clipboard().add_binding(c)),
            );
            registry.add(
                ScreenProvider::NAME,
                Box::new(|s, c| s.screen_provider().add_binding(c)),
            );
            registry.add(
                ImeRegistrar::NAME,
                Box::new(|s, c| s.ime_registrar().add_binding(c)),
            );
            registry.add(
                ImeDriver::NAME,
                Box::new(|s, c| s.ime_driver().add_binding(c)),
            );
            registry.add(
                InputDeviceServer::NAME,
                Box::new(|s, c| s.input_devices().add_binding(c)),
            );
            if gpu.is_some() {
                registry.add(
                    gpu::GPU_MEMORY,
                    Box::new(|s, c| {
                        let Some(gpu) = s.gpu.clone() else {
                            return;
                        };
                        let gpu2 = gpu.clone();
                        let channel = c.clone();
                        gpu.dispatch(Box::new(move || gpu2.bind_gpu_memory(channel)));
                    }),
                );
            }
            Self {
                ids: Ids::default(),
                platform: platform.clone(),
                windows: Default::default(),
                trees: Default::default(),
                factory: WindowTreeFactory::new(weak.clone()),
                registry,
                binding_ids: Default::default(),
                gpu,
                clipboard: Default::default(),
                screen_provider: Default::default(),
                ime_driver: Default::default(),
                ime_registrar: Default::default(),
                input_devices: Default::default(),
            }
        });
        let observer: Rc<dyn TreeObserver> = slf.clone();
        platform.add_observer(&observer);
        slf
    }

    /// Accepts a new client connection.
    pub fn create_window_tree(&self, client: Rc<dyn TreeClient>) -> Rc<WindowTree> {
        self.factory.create_tree(client)
    }

    /// Tears down the tree of a closed connection. Safe to call with an
    /// already-removed client.
    pub fn destroy_window_tree(&self, client: ClientId) {
        let Some(tree) = self.trees.remove(&client) else {
            return;
        };
        log::info!("Removing client {}", client);
        tree.teardown();
        if let Some(c) = self.clipboard.get() {
            c.remove_client(client);
        }
        if let Some(s) = self.screen_provider.get() {
            s.remove_client(client);
        }
        if let Some(d) = self.ime_driver.get() {
            d.remove_client(client);
        }
        if let Some(r) = self.ime_registrar.get() {
            r.remove_client(client);
        }
        if let Some(i) = self.input_devices.get() {
            i.remove_client(client);
        }
    }

    /// Tears down all remaining connections.
    pub fn shutdown(&self) {
        let clients: Vec<_> = self.trees.lock().keys().copied().collect();
        for client in clients {
            self.destroy_window_tree(client);
        }
    }

    /// Issues a window id on behalf of a client.
    pub fn allocate_window_id(&self) -> WindowId {
        self.ids.next_window_id()
    }

    /// Returns the existing server window of the platform window or attaches
    /// a fresh non-top-level one under the service's own client id.
    pub fn get_or_create_server_window(&self, window: &Rc<PlatformWindow>) -> Rc<ServerWindow> {
        debug_assert!(!window.is_destroyed());
        if let Some(server) = ServerWindow::get(window) {
            return server;
        }
        let surface = SurfaceId {
            client: SERVICE_CLIENT_ID,
            window: self.ids.next_window_id(),
        };
        let server = ServerWindow::create(window, surface, false);
        self.add_window(&server);
        server
    }

    /// True iff a server window is attached to the platform window. Cheap
    /// existence check, allocates nothing.
    pub fn has_remote_client(&self, window: &PlatformWindow) -> bool {
        window.server().is_some()
    }

    /// Routes a close request from inside the service to the tree owning the
    /// window. Calling this for a window that is not top-level or has no
    /// owning tree is the caller's bug.
    pub fn request_close(&self, window: &Rc<PlatformWindow>) {
        let Some(server) = ServerWindow::get(window) else {
            debug_assert!(false, "request_close on a window without a server window");
            log::warn!("Dropping close request for window {}", window.id);
            return;
        };
        if !server.is_top_level() {
            debug_assert!(false, "request_close on a non-top-level window");
            log::warn!("Dropping close request for non-top-level window {}", server.id);
            return;
        }
        let Some(owner) = server.owner() else {
            debug_assert!(false, "request_close on an unowned window");
            log::warn!("Dropping close request for unowned window {}", server.id);
            return;
        };
        let Some(tree) = self.trees.get(&owner) else {
            // The back-reference names a client that no longer exists, which
            // means teardown bookkeeping is corrupted.
            panic!("window {} is owned by unknown client {}", server.id, owner);
        };
        tree.handle_close_request(&server);
    }

    /// Binds a client channel to the named interface, constructing the
    /// singleton service on first use. Unknown names are ignored.
    pub fn bind_interface(
        self: &Rc<Self>,
        name: &str,
        client: ClientId,
        sink: Rc<dyn InterfaceEventSink>,
    ) {
        let channel = InterfaceChannel::new(self.binding_ids.next(), client, sink);
        self.registry.bind(self, name, &channel);
    }

    /// The advertised interface names.
    pub fn interface_names(&self) -> Vec<&'static str> {
        self.registry.names()
    }

    pub fn clipboard(&self) -> Rc<Clipboard> {
        match self.clipboard.get() {
            Some(c) => c,
            _ => {
                let c = Rc::new(Clipboard::new());
                self.clipboard.set(Some(c.clone()));
                c
            }
        }
    }

    pub fn screen_provider(&self) -> Rc<ScreenProvider> {
        match self.screen_provider.get() {
            Some(s) => s,
            _ => {
                let s = Rc::new(ScreenProvider::new());
                self.screen_provider.set(Some(s.clone()));
                s
            }
        }
    }

    pub fn ime_driver(&self) -> Rc<ImeDriver> {
        match self.ime_driver.get() {
            Some(d) => d,
            _ => {
                let d = Rc::new(ImeDriver::new());
                self.ime_driver.set(Some(d.clone()));
                d
            }
        }
    }

    pub fn ime_registrar(&self) -> Rc<ImeRegistrar> {
        match self.ime_registrar.get() {
            Some(r) => r,
            _ => {
                let r = Rc::new(ImeRegistrar::new(&self.ime_driver()));
                self.ime_registrar.set(Some(r.clone()));
                r
            }
        }
    }

    pub fn input_devices(&self) -> Rc<InputDeviceServer> {
        match self.input_devices.get() {
            Some(i) => i,
            _ => {
                let i = Rc::new(InputDeviceServer::new());
                self.input_devices.set(Some(i.clone()));
                i
            }
        }
    }

    pub fn window(&self, surface: SurfaceId) -> Option<Rc<ServerWindow>> {
        self.windows.get(&surface)
    }

    pub fn num_windows(&self) -> usize {
        self.windows.len()
    }

    pub fn tree(&self, client: ClientId) -> Option<Rc<WindowTree>> {
        self.trees.get(&client)
    }

    pub(crate) fn register_tree(&self, tree: &Rc<WindowTree>) {
        let prev = self.trees.set(tree.client_id, tree.clone());
        assert!(prev.is_none());
    }

    pub(crate) fn add_window(&self, server: &Rc<ServerWindow>) {
        let prev = self.windows.set(server.id, server.clone());
        assert!(prev.is_none(), "surface id {} is already in use", server.id);
    }

    fn collect_trees(&self) -> Vec<Rc<WindowTree>> {
        self.trees.lock().values().cloned().collect()
    }
}

impl TreeObserver for WindowService {
    fn window_created(&self, window: &Rc<PlatformWindow>) {
        log::trace!("Platform window {} created", window.id);
    }

    fn bounds_changed(&self, window: &Rc<PlatformWindow>, _old: Rect, new: Rect) {
        let Some(server) = window.server() else {
            return;
        };
        for tree in self.collect_trees() {
            tree.forward_bounds_changed(server.id, new);
        }
    }

    fn visibility_changed(&self, window: &Rc<PlatformWindow>, visible: bool) {
        let Some(server) = window.server() else {
            return;
        };
        for tree in self.collect_trees() {
            tree.forward_visibility_changed(server.id, visible);
        }
    }

    fn window_destroyed(&self, window: &Rc<PlatformWindow>) {
        let Some(server) = window.server() else {
            return;
        };
        for tree in self.collect_trees() {
            tree.forward_window_destroyed(server.id);
        }
        self.windows.remove(&server.id);
        server.set_owner(None);
    }

    fn focus_changed(
        &self,
        old: Option<&Rc<PlatformWindow>>,
        new: Option<&Rc<PlatformWindow>>,
    ) {
        let old = old.and_then(|w| w.server()).map(|s| s.id);
        let new = new.and_then(|w| w.server()).map(|s| s.id);
        for tree in self.collect_trees() {
            tree.forward_focus_changed(old, new);
        }
    }
}
