use {
    crate::{
        client::{InterfaceChannel, InterfaceEvent},
        ids::ClientId,
        utils::{bindings::Bindings, copyhashmap::CopyHashMap},
    },
    std::rc::Rc,
};

/// The shared clipboard. One instance per service, constructed the first
/// time any client binds it.
pub struct Clipboard {
    bindings: Bindings,
    contents: CopyHashMap<String, Rc<Vec<u8>>>,
}

impl Clipboard {
    pub const NAME: &'static str = "clipboard";

    pub fn new() -> Self {
        Self {
            bindings: Default::default(),
            contents: Default::default(),
        }
    }

    pub fn add_binding(&self, channel: &Rc<InterfaceChannel>) {
        self.bindings.add(channel);
    }

    pub fn remove_client(&self, client: ClientId) {
        self.bindings.remove_client(client);
    }

    /// Replaces the clipboard with a single offer and tells every bound
    /// client to re-fetch.
    pub fn set_contents(&self, mime: &str, data: Vec<u8>) {
        self.contents.clear();
        self.contents.set(mime.to_string(), Rc::new(data));
        self.bindings.broadcast(InterfaceEvent::ClipboardChanged);
    }

    /// Adds an offer for an additional mime type without discarding the
    /// existing ones.
    pub fn add_contents(&self, mime: &str, data: Vec<u8>) {
        self.contents.set(mime.to_string(), Rc::new(data));
        self.bindings.broadcast(InterfaceEvent::ClipboardChanged);
    }

    pub fn contents(&self, mime: &str) -> Option<Rc<Vec<u8>>> {
        self.contents.get(&mime.to_string())
    }

    pub fn clear(&self) {
        if self.contents.is_empty() {
            return;
        }
        self.contents.clear();
        self.bindings.broadcast(InterfaceEvent::ClipboardChanged);
    }
}
