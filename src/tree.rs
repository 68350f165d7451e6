//! The platform window tree.
//!
//! This module stands in for the native windowing system underneath the
//! service. It offers exactly the primitives the service consumes: window
//! creation and destruction, bounds/visibility/property mutation, focus, a
//! synchronous observer interface, and a metadata slot that gives
//! `ServerWindow` its O(1) reverse lookup.


use {
    crate::{
        rect::Rect,
        server_window::ServerWindow,
        utils::{clonecell::CloneCell, copyhashmap::CopyHashMap, numcell::NumCell},
    },
    smallvec::SmallVec,
    std::{
        cell::{Cell, RefCell},
        fmt::{Display, Formatter},
        mem,
        rc::{Rc, Weak},
    },
    thiserror::Error,
};

#[derive(Debug, Error)]
pub enum PlatformTreeError {
    #[error("The window {0} has already been destroyed")]
    AlreadyDestroyed(NodeId),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn raw(&self) -> u32 {
        self.0
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

pub struct NodeIds {
    next: NumCell<u32>,
}

impl Default for NodeIds {
    fn default() -> Self {
        Self {
            next: NumCell::new(1),
        }
    }
}

impl NodeIds {
    pub fn next(&self) -> NodeId {
        NodeId(self.next.fetch_add(1))
    }
}

/// Observes mutations of the platform tree. Callbacks run synchronously,
/// after the mutation has been applied, in observer registration order.
pub trait TreeObserver {
    fn window_created(&self, window: &Rc<PlatformWindow>) {
        let _ = window;
    }

    fn bounds_changed(&self, window: &Rc<PlatformWindow>, old: Rect, new: Rect) {
        let _ = window;
        let _ = old;
        let _ = new;
    }

    fn visibility_changed(&self, window: &Rc<PlatformWindow>, visible: bool) {
        let _ = window;
        let _ = visible;
    }

    fn window_destroyed(&self, window: &Rc<PlatformWindow>) {
        let _ = window;
    }

    fn focus_changed(
        &self,
        old: Option<&Rc<PlatformWindow>>,
        new: Option<&Rc<PlatformWindow>>,
    ) {
        let _ = old;
        let _ = new;
    }
}

pub struct PlatformTree {
    node_ids: NodeIds,
    windows: CopyHashMap<NodeId, Rc<PlatformWindow>>,
    focus: CloneCell<Option<Rc<PlatformWindow>>>,
    observers: RefCell<Vec<Weak<dyn TreeObserver>>>,
}

impl Default for PlatformTree {
    fn default() -> Self {
        Self {
            node_ids: Default::default(),
            windows: Default::default(),
            focus: Default::default(),
            observers: Default::default(),
        }
    }
}

impl PlatformTree {
    pub fn new() -> Rc<Self> {
        Rc::new(Default::default())
    }

    pub fn add_observer(&self, observer: &Rc<dyn TreeObserver>) {
        self.observers.borrow_mut().push(Rc::downgrade(observer));
    }

    /// Creates a window, at the root if no parent is given. The new window is
    /// invisible and has empty bounds.
    pub fn create_window(self: &Rc<Self>, parent: Option<&Rc<PlatformWindow>>) -> Rc<PlatformWindow> {
        if let Some(parent) = parent {
            debug_assert!(!parent.destroyed.get());
        }
        let window = Rc::new(PlatformWindow {
            id: self.node_ids.next(),
            tree: Rc::downgrade(self),
            parent: CloneCell::new(parent.map(Rc::downgrade).unwrap_or_else(Weak::new)),
            children: Default::default(),
            bounds: Cell::new(Rect::default()),
            visible: Cell::new(false),
            properties: Default::default(),
            server: Default::default(),
            destroyed: Cell::new(false),
        });
        if let Some(parent) = parent {
            parent.children.borrow_mut().push(window.clone());
        }
        self.windows.set(window.id, window.clone());
        for observer in self.observers() {
            observer.window_created(&window);
        }
        window
    }

    /// Destroys the window and all of its children, children first. Observers
    /// see one `window_destroyed` per window, after the window has been
    /// unlinked from the tree.
    pub fn destroy_window(&self, window: &Rc<PlatformWindow>) -> Result<(), PlatformTreeError> {
        if window.destroyed.get() {
            return Err(PlatformTreeError::AlreadyDestroyed(window.id));
        }
        self.destroy_(window);
        Ok(())
    }

    fn destroy_(&self, window: &Rc<PlatformWindow>) {
        let children: Vec<_> = mem::take(&mut *window.children.borrow_mut()).into_vec();
        for child in &children {
            self.destroy_(child);
        }
        if let Some(focus) = self.focus.get() {
            if Rc::ptr_eq(&focus, window) {
                self.set_focus(None);
            }
        }
        window.destroyed.set(true);
        if let Some(parent) = window.parent.take().upgrade() {
            parent
                .children
                .borrow_mut()
                .retain(|c| !Rc::ptr_eq(c, window));
        }
        self.windows.remove(&window.id);
        for observer in self.observers() {
            observer.window_destroyed(window);
        }
        window.server.set(None);
    }

    pub fn set_focus(&self, window: Option<&Rc<PlatformWindow>>) {
        let old = self.focus.get();
        let same = match (&old, window) {
            (Some(o), Some(n)) => Rc::ptr_eq(o, n),
            (None, None) => true,
            _ => false,
        };
        if same {
            return;
        }
        self.focus.set(window.cloned());
        let new = self.focus.get();
        for observer in self.observers() {
            observer.focus_changed(old.as_ref(), new.as_ref());
        }
    }

    pub fn focus(&self) -> Option<Rc<PlatformWindow>> {
        self.focus.get()
    }

    pub fn get(&self, id: NodeId) -> Option<Rc<PlatformWindow>> {
        self.windows.get(&id)
    }

    pub fn num_windows(&self) -> usize {
        self.windows.len()
    }

    fn observers(&self) -> SmallVec<[Rc<dyn TreeObserver>; 2]> {
        let mut observers = self.observers.borrow_mut();
        observers.retain(|o| o.strong_count() > 0);
        observers.iter().flat_map(|o| o.upgrade()).collect()
    }
}

pub struct PlatformWindow {
    pub id: NodeId,
    tree: Weak<PlatformTree>,
    parent: CloneCell<Weak<PlatformWindow>>,
    children: RefCell<SmallVec<[Rc<PlatformWindow>; 4]>>,
    bounds: Cell<Rect>,
    visible: Cell<bool>,
    properties: CopyHashMap<String, Rc<Vec<u8>>>,
    server: CloneCell<Option<Rc<ServerWindow>>>,
    destroyed: Cell<bool>,
}

impl PlatformWindow {
    pub fn bounds(&self) -> Rect {
        self.bounds.get()
    }

    /// Idempotent: setting the current bounds again performs no mutation and
    /// notifies nobody.
    pub fn set_bounds(self: &Rc<Self>, bounds: Rect) {
        if self.destroyed.get() {
            debug_assert!(false, "set_bounds on a destroyed window");
            return;
        }
        let old = self.bounds.get();
        if old == bounds {
            return;
        }
        self.bounds.set(bounds);
        if let Some(tree) = self.tree.upgrade() {
            for observer in tree.observers() {
                observer.bounds_changed(self, old, bounds);
            }
        }
    }

    pub fn visible(&self) -> bool {
        self.visible.get()
    }

    pub fn set_visible(self: &Rc<Self>, visible: bool) {
        if self.destroyed.get() {
            debug_assert!(false, "set_visible on a destroyed window");
            return;
        }
        if self.visible.replace(visible) == visible {
            return;
        }
        if let Some(tree) = self.tree.upgrade() {
            for observer in tree.observers() {
                observer.visibility_changed(self, visible);
            }
        }
    }

    pub fn property(&self, key: &str) -> Option<Rc<Vec<u8>>> {
        self.properties.get(&key.to_string())
    }

    pub fn set_property(&self, key: &str, value: Vec<u8>) {
        if self.destroyed.get() {
            debug_assert!(false, "set_property on a destroyed window");
            return;
        }
        if let Some(old) = self.properties.get(&key.to_string()) {
            if *old == value {
                return;
            }
        }
        self.properties.set(key.to_string(), Rc::new(value));
    }

    pub fn parent(&self) -> Option<Rc<PlatformWindow>> {
        self.parent.get().upgrade()
    }

    pub fn children(&self) -> Vec<Rc<PlatformWindow>> {
        self.children.borrow().to_vec()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed.get()
    }

    /// The metadata slot used by `ServerWindow` for O(1) reverse lookup.
    pub fn server(&self) -> Option<Rc<ServerWindow>> {
        self.server.get()
    }

    pub fn set_server(&self, server: Option<Rc<ServerWindow>>) -> Option<Rc<ServerWindow>> {
        self.server.set(server)
    }
}
