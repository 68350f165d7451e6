use {
    crate::{
        client::{InterfaceChannel, InterfaceEvent},
        ids::ClientId,
        utils::{bindings::Bindings, clonecell::CloneCell},
    },
    std::rc::Rc,
};

/// An installed input-method driver. The component that implements the input
/// method registers one through the registrar; the driver service then routes
/// text input there.
#[derive(Debug)]
pub struct ImeDriverInfo {
    pub name: String,
}

/// The text-input driver service. Clients bind it to learn which driver is
/// active; the registrar installs drivers into it.
pub struct ImeDriver {
    bindings: Bindings,
    driver: CloneCell<Option<Rc<ImeDriverInfo>>>,
}

impl ImeDriver {
    pub const NAME: &'static str = "ime-driver";

    pub fn new() -> Self {
        Self {
            bindings: Default::default(),
            driver: Default::default(),
        }
    }

    pub fn add_binding(&self, channel: &Rc<InterfaceChannel>) {
        self.bindings.add(channel);
    }

    pub fn remove_client(&self, client: ClientId) {
        self.bindings.remove_client(client);
    }

    pub fn driver(&self) -> Option<Rc<ImeDriverInfo>> {
        self.driver.get()
    }

    fn set_driver(&self, driver: Option<Rc<ImeDriverInfo>>) {
        self.driver.set(driver);
        self.bindings.broadcast(InterfaceEvent::ImeDriverChanged);
    }
}

/// The registrar through which an input-method implementation installs
/// itself as the active driver.
pub struct ImeRegistrar {
    bindings: Bindings,
    driver_service: Rc<ImeDriver>,
}

impl ImeRegistrar {
    pub const NAME: &'static str = "ime-registrar";

    pub fn new(driver_service: &Rc<ImeDriver>) -> Self {
        Self {
            bindings: Default::default(),
            driver_service: driver_service.clone(),
        }
    }

    pub fn add_binding(&self, channel: &Rc<InterfaceChannel>) {
        self.bindings.add(channel);
    }

    pub fn remove_client(&self, client: ClientId) {
        self.bindings.remove_client(client);
    }

    pub fn register_driver(&self, driver: ImeDriverInfo) {
        log::info!("Installing input-method driver {:?}", driver.name);
        self.driver_service.set_driver(Some(Rc::new(driver)));
    }

    pub fn unregister_driver(&self) {
        self.driver_service.set_driver(None);
    }
}
