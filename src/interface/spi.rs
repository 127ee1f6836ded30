//! SPI interface implementation built on top of `embedded-hal` `SpiDevice`.
//!
//! The ADXL345 uses 4-wire SPI mode 3. The command byte carries the register
//! address in bits 5:0, the multi-byte flag in bit 6 and the read flag in
//! bit 7.

use embedded_hal::spi::{Operation, SpiDevice};

use super::Adxl345Interface;

const READ_FLAG: u8 = 0x80;
const MULTI_BYTE_FLAG: u8 = 0x40;
const ADDRESS_MASK: u8 = 0x3F;

/// SPI-based interface implementation for the ADXL345 driver.
pub struct SpiInterface<SPI> {
    spi: SPI,
}

impl<SPI> SpiInterface<SPI> {
    /// Creates a new interface from the provided SPI device abstraction.
    pub const fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Builds the command byte used to address registers over SPI.
    fn command_byte(register: u8, is_read: bool, len: usize) -> u8 {
        let mut command = register & ADDRESS_MASK;
        if is_read {
            command |= READ_FLAG;
        }
        if len > 1 {
            command |= MULTI_BYTE_FLAG;
        }
        command
    }

    /// Provides mutable access to the wrapped SPI device.
    pub fn spi_mut(&mut self) -> &mut SPI {
        &mut self.spi
    }

    /// Consumes the interface and returns the owned SPI device.
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI> Adxl345Interface for SpiInterface<SPI>
where
    SPI: SpiDevice,
{
    type Error = SPI::Error;

    fn write_register(&mut self, register: u8, value: u8) -> core::result::Result<(), Self::Error> {
        let frame = [Self::command_byte(register, false, 1), value];
        self.spi.write(&frame)
    }

    fn read_register(&mut self, register: u8) -> core::result::Result<u8, Self::Error> {
        let mut value = [0u8; 1];
        self.read_burst(register, &mut value)?;
        Ok(value[0])
    }

    fn read_burst(
        &mut self,
        register: u8,
        buf: &mut [u8],
    ) -> core::result::Result<(), Self::Error> {
        if buf.is_empty() {
            return Ok(());
        }

        let command = [Self::command_byte(register, true, buf.len())];
        let mut operations = [Operation::Write(&command), Operation::Read(buf)];
        self.spi.transaction(&mut operations)
    }
}
