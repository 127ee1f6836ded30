//! Error handling primitives for the ADXL345 driver.

use core::fmt;

/// Crate-wide result type alias.
pub type Result<T, E> = core::result::Result<T, Error<E>>;

/// Error variants produced by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    /// Any error reported by the underlying bus interface.
    Interface(E),
    /// The provided configuration parameters are invalid.
    InvalidConfig,
    /// A query named an axis selector other than X (0), Y (1) or Z (2).
    InvalidAxis(u8),
    /// A query asked for a byte count other than 1 or 2.
    InvalidLength(u8),
    /// `DEVID` did not hold the ADXL345 identifier; carries the value read.
    DeviceIdMismatch(u8),
    /// The device is not in the lifecycle state the operation requires.
    NotReady,
}

impl<E> Error<E> {
    /// Returns `true` when the caller supplied a malformed request.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidAxis(_) | Self::InvalidLength(_))
    }
}

impl<E> From<E> for Error<E> {
    fn from(err: E) -> Self {
        Self::Interface(err)
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interface(err) => write!(f, "bus transaction failed: {err:?}"),
            Self::InvalidConfig => f.write_str("invalid device configuration"),
            Self::InvalidAxis(axis) => write!(f, "unknown axis selector {axis}"),
            Self::InvalidLength(len) => write!(f, "unsupported query length {len}"),
            Self::DeviceIdMismatch(id) => write!(f, "unexpected device id {id:#04x}"),
            Self::NotReady => f.write_str("device is not in the required state"),
        }
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug> std::error::Error for Error<E> {}

#[cfg(feature = "std")]
impl<E> From<Error<E>> for std::io::Error
where
    E: fmt::Debug + Send + Sync + 'static,
{
    fn from(err: Error<E>) -> Self {
        let kind = match err {
            Error::InvalidAxis(_) | Error::InvalidLength(_) | Error::InvalidConfig => {
                std::io::ErrorKind::InvalidInput
            }
            Error::NotReady => std::io::ErrorKind::NotConnected,
            Error::Interface(_) | Error::DeviceIdMismatch(_) => std::io::ErrorKind::Other,
        };
        std::io::Error::new(kind, err)
    }
}
