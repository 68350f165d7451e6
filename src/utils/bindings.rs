use {
    crate::{
        client::{BindingId, InterfaceChannel, InterfaceEvent},
        ids::ClientId,
        utils::copyhashmap::CopyHashMap,
    },
    std::rc::Rc,
};

/// The set of channels currently bound to one satellite service.
pub struct Bindings {
    bindings: CopyHashMap<(ClientId, BindingId), Rc<InterfaceChannel>>,
}

impl Default for Bindings {
    fn default() -> Self {
        Self {
            bindings: Default::default(),
        }
    }
}

impl Bindings {
    pub fn add(&self, channel: &Rc<InterfaceChannel>) {
        let prev = self
            .bindings
            .set((channel.client, channel.binding), channel.clone());
        assert!(prev.is_none());
    }

    /// Drops all channels of the client. Called on connection teardown so
    /// that a closed client receives no further notifications.
    pub fn remove_client(&self, client: ClientId) {
        self.bindings.lock().retain(|(c, _), _| *c != client);
    }

    pub fn broadcast(&self, event: InterfaceEvent) {
        let bindings = self.bindings.lock();
        for channel in bindings.values() {
            channel.notify(event);
        }
    }
}
