//! Shared bus handle for concurrent register access.
//!
//! The interrupt drain and live axis queries run on different threads but
//! talk to one physical bus. [`SharedInterface`] serializes them per
//! transaction: the lock is held for exactly one address + data exchange, so
//! a query can slip in between two FIFO entries but never inside one.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::Adxl345Interface;

/// Clonable, thread-safe handle to a bus interface.
pub struct SharedInterface<IFACE> {
    inner: Arc<Mutex<IFACE>>,
}

impl<IFACE> SharedInterface<IFACE> {
    /// Wraps `interface` so it can be shared across threads.
    pub fn new(interface: IFACE) -> Self {
        Self {
            inner: Arc::new(Mutex::new(interface)),
        }
    }

    /// Runs `f` with exclusive access to the underlying interface.
    pub fn with<R>(&self, f: impl FnOnce(&mut IFACE) -> R) -> R {
        f(&mut self.lock())
    }

    /// Returns the wrapped interface if this is the last handle.
    pub fn try_release(self) -> Option<IFACE> {
        Arc::try_unwrap(self.inner)
            .ok()
            .map(|mutex| mutex.into_inner().unwrap_or_else(PoisonError::into_inner))
    }

    fn lock(&self) -> MutexGuard<'_, IFACE> {
        // A panic mid-transaction leaves no partial state in the handle.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<IFACE> Clone for SharedInterface<IFACE> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<IFACE> Adxl345Interface for SharedInterface<IFACE>
where
    IFACE: Adxl345Interface,
{
    type Error = IFACE::Error;

    fn write_register(&mut self, register: u8, value: u8) -> core::result::Result<(), Self::Error> {
        self.lock().write_register(register, value)
    }

    fn read_register(&mut self, register: u8) -> core::result::Result<u8, Self::Error> {
        self.lock().read_register(register)
    }

    fn read_burst(
        &mut self,
        register: u8,
        buf: &mut [u8],
    ) -> core::result::Result<(), Self::Error> {
        self.lock().read_burst(register, buf)
    }
}
