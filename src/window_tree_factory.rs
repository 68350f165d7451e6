use {
    crate::{
        service::WindowService,
        window_tree::{TreeClient, WindowTree},
    },
    std::rc::{Rc, Weak},
};

/// Accepts new client connections and hands each one its own window tree.
pub struct WindowTreeFactory {
    service: Weak<WindowService>,
}

impl WindowTreeFactory {
    pub(crate) fn new(service: Weak<WindowService>) -> Self {
        Self { service }
    }

    /// Creates the window tree for a new connection. The fresh client id is
    /// never reused; running out of them aborts the process.
    pub fn create_tree(&self, client: Rc<dyn TreeClient>) -> Rc<WindowTree> {
        let service = self.service.upgrade().expect("window service is gone");
        let client_id = service.ids.next_client_id();
        let tree = Rc::new(WindowTree::new(client_id, &service, client));
        service.register_tree(&tree);
        log::info!("Client {} connected", client_id);
        tree
    }
}
