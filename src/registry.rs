//! Naming and counting of live sensor instances.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

/// Hands out instance names and tracks how many instances are alive.
///
/// Identifiers only ever increase, so a name is never reused while another
/// instance with the same name could still exist.
#[derive(Debug, Default)]
pub struct Registry {
    next_id: AtomicU32,
    live: AtomicUsize,
}

impl Registry {
    /// Creates an empty registry.
    pub const fn new() -> Self {
        Self {
            next_id: AtomicU32::new(0),
            live: AtomicUsize::new(0),
        }
    }

    /// Claims the next identifier; the slot is released when the guard drops.
    pub fn register(self: &Arc<Self>) -> Registration {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.live.fetch_add(1, Ordering::AcqRel);
        Registration {
            registry: Arc::clone(self),
            id,
        }
    }

    /// Number of registrations currently alive.
    pub fn live(&self) -> usize {
        self.live.load(Ordering::Acquire)
    }
}

/// One claimed instance slot.
#[derive(Debug)]
pub struct Registration {
    registry: Arc<Registry>,
    id: u32,
}

impl Registration {
    /// Identifier of this instance.
    pub fn id(&self) -> u32 {
        self.id
    }
}

impl fmt::Display for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "adxl345-{}", self.id)
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.registry.live.fetch_sub(1, Ordering::AcqRel);
    }
}
