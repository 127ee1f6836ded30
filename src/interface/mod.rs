//! Bus interface abstraction for the ADXL345 driver.

pub mod i2c;
#[cfg(feature = "std")]
pub mod shared;
pub mod spi;

/// Abstraction over the low-level bus access required by the driver.
///
/// Every call is one complete request/response exchange on the bus. An
/// implementation reports an error whenever a phase moves fewer bytes than
/// requested.
pub trait Adxl345Interface {
    /// Error type produced by the concrete bus implementation.
    type Error;

    /// Writes a single register.
    fn write_register(&mut self, register: u8, value: u8) -> core::result::Result<(), Self::Error>;

    /// Reads a single register.
    fn read_register(&mut self, register: u8) -> core::result::Result<u8, Self::Error>;

    /// Reads `buf.len()` consecutive registers starting at `register`.
    ///
    /// Relies on the sensor auto-incrementing the register address.
    fn read_burst(
        &mut self,
        register: u8,
        buf: &mut [u8],
    ) -> core::result::Result<(), Self::Error>;
}
