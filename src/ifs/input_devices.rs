use {
    crate::{
        client::{InterfaceChannel, InterfaceEvent},
        ids::ClientId,
        utils::bindings::Bindings,
    },
    std::{cell::RefCell, rc::Rc},
};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum InputDeviceKind {
    Keyboard,
    Pointer,
    Touch,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct InputDevice {
    pub id: u64,
    pub kind: InputDeviceKind,
    pub name: String,
}

/// Enumerates the input devices attached to the system. The backend feeds
/// hotplug events in; clients bind the service to observe them.
pub struct InputDeviceServer {
    bindings: Bindings,
    devices: RefCell<Vec<InputDevice>>,
}

impl InputDeviceServer {
    pub const NAME: &'static str = "input-devices";

    pub fn new() -> Self {
        Self {
            bindings: Default::default(),
            devices: Default::default(),
        }
    }

    /// New bindings are told to fetch the device list right away.
    pub fn add_binding(&self, channel: &Rc<InterfaceChannel>) {
        self.bindings.add(channel);
        channel.notify(InterfaceEvent::InputDevicesChanged);
    }

    pub fn remove_client(&self, client: ClientId) {
        self.bindings.remove_client(client);
    }

    pub fn add_device(&self, device: InputDevice) {
        log::info!("Input device added: {:?}", device);
        self.devices.borrow_mut().push(device);
        self.bindings.broadcast(InterfaceEvent::InputDevicesChanged);
    }

    pub fn remove_device(&self, id: u64) {
        let mut devices = self.devices.borrow_mut();
        let len = devices.len();
        devices.retain(|d| d.id != id);
        if devices.len() == len {
            return;
        }
        drop(devices);
        self.bindings.broadcast(InterfaceEvent::InputDevicesChanged);
    }

    pub fn devices(&self) -> Vec<InputDevice> {
        self.devices.borrow().clone()
    }
}
