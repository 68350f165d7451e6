use {
    super::*,
    crate::{
        client::{InterfaceEvent, InterfaceEventSink},
        ifs::{gpu::GpuTask, ime::ImeDriverInfo, screen_provider::Screen},
        window_tree::TreeEvent,
    },
    std::{cell::RefCell, mem},
};

#[derive(Default)]
struct RecordingSink {
    events: RefCell<Vec<InterfaceEvent>>,
}

impl RecordingSink {
    fn take(&self) -> Vec<InterfaceEvent> {
        mem::take(&mut *self.events.borrow_mut())
    }
}

impl InterfaceEventSink for RecordingSink {
    fn notify(&self, event: InterfaceEvent) {
        self.events.borrow_mut().push(event);
    }
}

#[derive(Default)]
struct RecordingClient {
    events: RefCell<Vec<TreeEvent>>,
}

impl RecordingClient {
    fn take(&self) -> Vec<TreeEvent> {
        mem::take(&mut *self.events.borrow_mut())
    }
}

impl crate::window_tree::TreeClient for RecordingClient {
    fn event(&self, event: TreeEvent) {
        self.events.borrow_mut().push(event);
    }
}

fn fixture() -> (Rc<PlatformTree>, Rc<WindowService>) {
    let platform = PlatformTree::new();
    let service = WindowService::new(&platform, None);
    (platform, service)
}

#[test]
fn advertised_interfaces() {
    let (_platform, service) = fixture();
    assert_eq!(
        service.interface_names(),
        vec![
            "clipboard",
            "screen-provider",
            "ime-registrar",
            "ime-driver",
            "input-devices",
        ],
    );
}

#[test]
fn unknown_interface_names_are_ignored() {
    let (_platform, service) = fixture();
    let client = service.create_window_tree(Rc::new(RecordingClient::default()));
    let sink = Rc::new(RecordingSink::default());
    service.bind_interface("no-such-interface", client.client_id, sink.clone());
    assert_eq!(sink.take(), vec![]);
}

#[test]
fn screen_provider_is_a_singleton_across_clients() {
    let (_platform, service) = fixture();
    let a = service.create_window_tree(Rc::new(RecordingClient::default()));
    let b = service.create_window_tree(Rc::new(RecordingClient::default()));

    let a_sink = Rc::new(RecordingSink::default());
    let b_sink = Rc::new(RecordingSink::default());
    service.bind_interface(ScreenProvider::NAME, a.client_id, a_sink.clone());
    let first = service.screen_provider();
    service.bind_interface(ScreenProvider::NAME, b.client_id, b_sink.clone());
    let second = service.screen_provider();
    assert!(Rc::ptr_eq(&first, &second));

    // Both bindings observe the current configuration once at bind time.
    assert_eq!(a_sink.take(), vec![InterfaceEvent::ScreenConfigurationChanged]);
    assert_eq!(b_sink.take(), vec![InterfaceEvent::ScreenConfigurationChanged]);

    first.set_screens(vec![Screen {
        id: 1,
        bounds: Rect::new_sized(0, 0, 1920, 1080).unwrap(),
        work_area: Rect::new_sized(0, 30, 1920, 1050).unwrap(),
        scale: 1,
    }]);
    assert_eq!(a_sink.take(), vec![InterfaceEvent::ScreenConfigurationChanged]);
    assert_eq!(b_sink.take(), vec![InterfaceEvent::ScreenConfigurationChanged]);
    assert_eq!(second.screens().len(), 1);
}

#[test]
fn satellite_bindings_die_with_the_connection() {
    let (_platform, service) = fixture();
    let a = service.create_window_tree(Rc::new(RecordingClient::default()));
    let sink = Rc::new(RecordingSink::default());
    service.bind_interface(Clipboard::NAME, a.client_id, sink.clone());

    service.clipboard().set_contents("text/plain", b"one".to_vec());
    assert_eq!(sink.take(), vec![InterfaceEvent::ClipboardChanged]);

    service.destroy_window_tree(a.client_id);
    service.clipboard().set_contents("text/plain", b"two".to_vec());
    assert_eq!(sink.take(), vec![]);
}

#[test]
fn ime_registrar_installs_the_driver() {
    let (_platform, service) = fixture();
    let a = service.create_window_tree(Rc::new(RecordingClient::default()));
    let sink = Rc::new(RecordingSink::default());
    service.bind_interface(ImeDriver::NAME, a.client_id, sink.clone());

    service.ime_registrar().register_driver(ImeDriverInfo {
        name: "test-ime".to_string(),
    });
    assert_eq!(sink.take(), vec![InterfaceEvent::ImeDriverChanged]);
    assert_eq!(service.ime_driver().driver().unwrap().name, "test-ime");

    service.ime_registrar().unregister_driver();
    assert_eq!(sink.take(), vec![InterfaceEvent::ImeDriverChanged]);
    assert!(service.ime_driver().driver().is_none());
}

#[test]
fn input_device_changes_are_broadcast() {
    let (_platform, service) = fixture();
    let a = service.create_window_tree(Rc::new(RecordingClient::default()));
    let sink = Rc::new(RecordingSink::default());
    service.bind_interface(InputDeviceServer::NAME, a.client_id, sink.clone());
    assert_eq!(sink.take(), vec![InterfaceEvent::InputDevicesChanged]);

    service.input_devices().add_device(crate::ifs::input_devices::InputDevice {
        id: 1,
        kind: crate::ifs::input_devices::InputDeviceKind::Keyboard,
        name: "kbd0".to_string(),
    });
    assert_eq!(sink.take(), vec![InterfaceEvent::InputDevicesChanged]);

    // Removing a device that does not exist must not notify anybody.
    service.input_devices().remove_device(99);
    assert_eq!(sink.take(), vec![]);

    service.input_devices().remove_device(1);
    assert_eq!(sink.take(), vec![InterfaceEvent::InputDevicesChanged]);
    assert!(service.input_devices().devices().is_empty());
}

#[derive(Default)]
struct TestGpu {
    tasks: RefCell<Vec<GpuTask>>,
    bound: RefCell<Vec<ClientId>>,
}

impl GpuSupport for TestGpu {
    fn dispatch(&self, task: GpuTask) {
        self.tasks.borrow_mut().push(task);
    }

    fn bind_gpu_memory(self: Rc<Self>, channel: Rc<InterfaceChannel>) {
        self.bound.borrow_mut().push(channel.client);
    }
}

#[test]
fn gpu_binds_are_dispatched_to_the_gpu_context() {
    let platform = PlatformTree::new();
    let gpu = Rc::new(TestGpu::default());
    let service = WindowService::new(&platform, Some(gpu.clone()));
    assert!(service.interface_names().contains(&"gpu-memory"));

    let a = service.create_window_tree(Rc::new(RecordingClient::default()));
    let sink = Rc::new(RecordingSink::default());
    service.bind_interface("gpu-memory", a.client_id, sink);

    // The bind is fire-and-forget: nothing happened on the coordination
    // context, the task is queued for the GPU context.
    assert!(gpu.bound.borrow().is_empty());
    let tasks = mem::take(&mut *gpu.tasks.borrow_mut());
    assert_eq!(tasks.len(), 1);
    for task in tasks {
        task();
    }
    assert_eq!(*gpu.bound.borrow(), vec![a.client_id]);
}

#[test]
fn server_windows_are_created_once_per_platform_window() {
    let (platform, service) = fixture();
    let window = platform.create_window(None);
    assert!(!service.has_remote_client(&window));

    let first = service.get_or_create_server_window(&window);
    let second = service.get_or_create_server_window(&window);
    assert!(Rc::ptr_eq(&first, &second));
    assert!(service.has_remote_client(&window));
    assert_eq!(first.id.client, SERVICE_CLIENT_ID);
    assert!(!first.is_top_level());
    assert!(first.owner().is_none());

    platform.destroy_window(&window).unwrap();
    assert!(!service.has_remote_client(&window));
    assert_eq!(service.num_windows(), 0);
}

#[test]
fn service_routes_close_requests_to_the_owner() {
    let (_platform, service) = fixture();
    let client = Rc::new(RecordingClient::default());
    let tree = service.create_window_tree(client.clone());
    let id = service.allocate_window_id();
    tree.create_window(id, Rect::new_sized(0, 0, 100, 100).unwrap())
        .unwrap();
    let window = tree.window(id).unwrap().window.clone();
    client.take();

    service.request_close(&window);
    assert_eq!(client.take(), vec![TreeEvent::CloseRequested { window: id }]);
}

#[test]
fn shutdown_tears_down_all_clients() {
    let (_platform, service) = fixture();
    let a = service.create_window_tree(Rc::new(RecordingClient::default()));
    let b = service.create_window_tree(Rc::new(RecordingClient::default()));
    for tree in [&a, &b] {
        let id = service.allocate_window_id();
        tree.create_window(id, Rect::new_sized(0, 0, 10, 10).unwrap())
            .unwrap();
    }
    assert_eq!(service.num_windows(), 2);

    service.shutdown();
    assert_eq!(service.num_windows(), 0);
    assert!(service.tree(a.client_id).is_none());
    assert!(service.tree(b.client_id).is_none());
}
