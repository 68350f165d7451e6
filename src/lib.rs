//! A window arbitration service.
//!
//! The service owns the canonical tree of on-screen window surfaces and lets
//! many mutually-untrusted client connections create, observe, and
//! manipulate subsets of it. Each connection gets its own [`WindowTree`]
//! projection with a never-reused client id; every window is named
//! process-wide by a [`SurfaceId`]. Singleton platform services (clipboard,
//! screens, input methods, input devices, GPU memory) are brokered through a
//! lazily-populated interface registry.
//!
//! Everything here runs on one coordination context: the whole crate is
//! `Rc`-based and single-threaded. The transport that carries requests and
//! events is out of scope; requests arrive as method calls and events leave
//! through the [`TreeClient`] and [`InterfaceEventSink`] traits.
//!
//! [`WindowTree`]: window_tree::WindowTree
//! [`SurfaceId`]: ids::SurfaceId
//! [`TreeClient`]: window_tree::TreeClient
//! [`InterfaceEventSink`]: client::InterfaceEventSink

pub mod client;
pub mod ids;
pub mod ifs;
pub mod rect;
pub mod registry;
pub mod server_window;
pub mod service;
pub mod tree;
pub mod utils;
pub mod window_tree;
pub mod window_tree_factory;

pub use {
    crate::{
        ids::{ClientId, SurfaceId, WindowId},
        service::WindowService,
        window_tree::{TreeClient, TreeEvent, WindowTree, WindowTreeError},
    },
};
