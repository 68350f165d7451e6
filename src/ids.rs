use {
    crate::utils::numcell::NumCell,
    std::fmt::{Display, Formatter},
};

/// Identifies one accepted client connection. Never reused within a process
/// lifetime. 0 is reserved for the service itself and never issued to a
/// connection.
#[derive(Debug, Copy, Clone, Hash, Ord, PartialOrd, Eq, PartialEq)]
pub struct ClientId(u64);

/// The reserved client id under which the service names windows it wrapped
/// itself, without any remote owner.
pub const SERVICE_CLIENT_ID: ClientId = ClientId(0);

impl ClientId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl Display for ClientId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// Identifies a window within a single client's namespace. Never reused. 0 is
/// reserved and never issued.
#[derive(Debug, Copy, Clone, Hash, Ord, PartialOrd, Eq, PartialEq)]
pub struct WindowId(u64);

impl WindowId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl Display for WindowId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// The globally unique name of a window: the id of the client that owns the
/// window id plus the window id itself. Immutable for the lifetime of the
/// window.
#[derive(Debug, Copy, Clone, Hash, Ord, PartialOrd, Eq, PartialEq)]
pub struct SurfaceId {
    pub client: ClientId,
    pub window: WindowId,
}

impl Display for SurfaceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.client, self.window)
    }
}

pub struct Ids {
    next_client_id: NumCell<u64>,
    next_window_id: NumCell<u64>,
}

impl Default for Ids {
    fn default() -> Self {
        Self {
            next_client_id: NumCell::new(1),
            next_window_id: NumCell::new(1),
        }
    }
}

impl Ids {
    /// Returns a client id strictly greater than all previously issued ones.
    /// Exhaustion means id reuse and therefore corrupted surface identities,
    /// so it aborts the process instead of reporting an error.
    pub fn next_client_id(&self) -> ClientId {
        let id = self.next_client_id.fetch_add(1);
        if id == 0 {
            panic!("Client ids overflowed");
        }
        ClientId(id)
    }

    pub fn next_window_id(&self) -> WindowId {
        let id = self.next_window_id.fetch_add(1);
        if id == 0 {
            panic!("Window ids overflowed");
        }
        WindowId(id)
    }
}
