use {crate::client::InterfaceChannel, std::rc::Rc};

pub type GpuTask = Box<dyn FnOnce()>;

/// The bridge to the GPU/compositor subsystem.
///
/// GPU state has its own serialization discipline, so binding the GPU memory
/// interface does not happen on the coordination context. The service posts a
/// task through `dispatch` and never waits for it; `bind_gpu_memory` runs on
/// the GPU-owning context.
pub trait GpuSupport {
    /// Fire-and-forget hand-off to the GPU-owning execution context.
    fn dispatch(&self, task: GpuTask);

    /// Must only be called from a task running on the GPU-owning context.
    fn bind_gpu_memory(self: Rc<Self>, channel: Rc<InterfaceChannel>);
}

pub const GPU_MEMORY: &str = "gpu-memory";
