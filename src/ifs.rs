pub mod clipboard;
pub mod gpu;
pub mod ime;
pub mod input_devices;
pub mod screen_provider;
