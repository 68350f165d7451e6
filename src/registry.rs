use {
    crate::{client::InterfaceChannel, service::WindowService},
    indexmap::IndexMap,
    std::{cell::RefCell, rc::Rc},
};

pub type BindFn = Box<dyn Fn(&Rc<WindowService>, &Rc<InterfaceChannel>)>;

/// Maps interface names to bind functions.
///
/// The bind functions take the service as an argument instead of capturing
/// it, so the registry can live inside the service without a reference
/// cycle. Entries are kept in registration order, which makes the advertised
/// capability set deterministic.
pub struct InterfaceRegistry {
    factories: RefCell<IndexMap<&'static str, BindFn>>,
}

impl InterfaceRegistry {
    pub fn new() -> Self {
        Self {
            factories: Default::default(),
        }
    }

    pub fn add(&self, name: &'static str, f: BindFn) {
        let prev = self.factories.borrow_mut().insert(name, f);
        debug_assert!(prev.is_none(), "interface {} registered twice", name);
    }

    /// Binds the channel to the named interface. Unknown names are dropped
    /// here; the transport is expected to have validated the name against
    /// the advertised set already.
    pub fn bind(&self, service: &Rc<WindowService>, name: &str, channel: &Rc<InterfaceChannel>) {
        let factories = self.factories.borrow();
        match factories.get(name) {
            Some(f) => f(service, channel),
            None => {
                log::debug!(
                    "Client {} tried to bind unknown interface {}",
                    channel.client,
                    name,
                );
            }
        }
    }

    /// The advertised capability set, in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.factories.borrow().keys().copied().collect()
    }
}
