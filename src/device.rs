//! High-level ADXL345 device driver implementation.

use embedded_hal::i2c::I2c;
use embedded_hal::spi::SpiDevice;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::fifo::{self, DrainReport, Sample};
use crate::interface::Adxl345Interface;
use crate::interface::i2c::{I2cAddress, I2cInterface};
use crate::interface::spi::SpiInterface;
use crate::query::{self, AxisQuery, QueryRequest, QueryResponse};
use crate::registers::{
    EXPECTED_DEVID, FifoStatus, PowerControl, REG_BW_RATE, REG_DATA_FORMAT, REG_DEVID,
    REG_FIFO_CTL, REG_INT_ENABLE, REG_POWER_CTL,
};

/// Lifecycle of one sensor instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceState {
    /// Bus is available; nothing has been written yet.
    Uninitialized,
    /// Rate, format, FIFO and measurement registers were written.
    Configured,
    /// The watermark interrupt is enabled; drains may run at any time.
    Active,
    /// Measurement disabled.
    Standby,
}

/// High-level synchronous driver for the ADXL345 accelerometer.
pub struct Adxl345<IFACE> {
    interface: IFACE,
    config: Config,
    state: DeviceState,
}

impl<IFACE> Adxl345<IFACE> {
    // ==================================================================
    // == Driver Construction & Ownership ===============================
    // ==================================================================
    /// Creates a new driver instance from the provided bus interface.
    pub fn new(interface: IFACE, config: Config) -> Self {
        Self {
            interface,
            config,
            state: DeviceState::Uninitialized,
        }
    }

    /// Consumes the driver and returns the owned interface.
    pub fn release(self) -> (IFACE, Config) {
        (self.interface, self.config)
    }

    /// Provides mutable access to the underlying interface.
    pub fn interface_mut(&mut self) -> &mut IFACE {
        &mut self.interface
    }

    /// Returns the configuration written at startup.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> DeviceState {
        self.state
    }
}

impl<I2C> Adxl345<I2cInterface<I2C>>
where
    I2C: I2c,
{
    /// Convenience constructor for I²C transports.
    pub fn new_i2c(i2c: I2C, address: I2cAddress, config: Config) -> Self {
        Self::new(I2cInterface::new(i2c, address), config)
    }

    /// Releases the driver, returning the I²C bus and configuration.
    pub fn release_i2c(self) -> (I2C, Config) {
        let (iface, config) = self.release();
        (iface.release(), config)
    }
}

impl<SPI> Adxl345<SpiInterface<SPI>>
where
    SPI: SpiDevice,
{
    /// Convenience constructor for SPI transports.
    pub fn new_spi(spi: SPI, config: Config) -> Self {
        Self::new(SpiInterface::new(spi), config)
    }

    /// Releases the driver, returning the SPI device and configuration.
    pub fn release_spi(self) -> (SPI, Config) {
        let (iface, config) = self.release();
        (iface.release(), config)
    }
}

impl<IFACE, CommE> Adxl345<IFACE>
where
    IFACE: Adxl345Interface<Error = CommE>,
{
    // ==================================================================
    // == Lifecycle =====================================================
    // ==================================================================
    /// Configures the sensor and enables the watermark interrupt.
    pub fn init(&mut self) -> Result<(), CommE> {
        self.configure()?;
        self.enable_interrupts()
    }

    /// Writes rate, data format, FIFO control and power control, in that order.
    ///
    /// Stops at the first failed write; the device stays `Uninitialized`.
    pub fn configure(&mut self) -> Result<(), CommE> {
        self.config.validate().map_err(|_| Error::InvalidConfig)?;

        let sequence = [
            (REG_BW_RATE, u8::from(self.config.bw_rate())),
            (REG_DATA_FORMAT, u8::from(self.config.data_format())),
            (REG_FIFO_CTL, u8::from(self.config.fifo_control())),
            (REG_POWER_CTL, u8::from(self.config.power_control())),
        ];
        for (register, value) in sequence {
            if let Err(err) = self.interface.write_register(register, value) {
                log_warn!(
                    "adxl345: configuration write to register {} failed",
                    register
                );
                return Err(Error::Interface(err));
            }
        }

        self.state = DeviceState::Configured;
        log_debug!("adxl345: configured");
        Ok(())
    }

    /// Writes `INT_ENABLE`; the device must be configured first.
    pub fn enable_interrupts(&mut self) -> Result<(), CommE> {
        if self.state != DeviceState::Configured {
            return Err(Error::NotReady);
        }

        self.interface
            .write_register(REG_INT_ENABLE, u8::from(self.config.interrupt_enable()))?;
        self.state = DeviceState::Active;
        log_info!("adxl345: measurement active");
        Ok(())
    }

    /// Puts the sensor in standby by clearing `POWER_CTL`.
    pub fn standby(&mut self) -> Result<(), CommE> {
        self.interface
            .write_register(REG_POWER_CTL, u8::from(PowerControl::new()))?;
        self.state = DeviceState::Standby;
        log_info!("adxl345: standby");
        Ok(())
    }

    // ==================================================================
    // == Identification & Status =======================================
    // ==================================================================
    /// Verifies `DEVID` against the fixed ADXL345 identifier.
    pub fn check_id(&mut self) -> Result<u8, CommE> {
        let id = self.interface.read_register(REG_DEVID)?;
        if id != EXPECTED_DEVID {
            return Err(Error::DeviceIdMismatch(id));
        }
        Ok(id)
    }

    /// Reads `FIFO_STATUS`.
    pub fn fifo_status(&mut self) -> Result<FifoStatus, CommE> {
        fifo::read_fifo_status(&mut self.interface)
    }

    // ==================================================================
    // == Data Acquisition ==============================================
    // ==================================================================
    /// Burst reads the current sample from the data registers.
    pub fn read_sample(&mut self) -> Result<Sample, CommE> {
        fifo::read_sample(&mut self.interface)
    }

    /// Empties the hardware FIFO into `sink`.
    ///
    /// See [`fifo::drain_fifo`] for the failure policy.
    pub fn drain_fifo<F>(&mut self, sink: F) -> Result<DrainReport, CommE>
    where
        F: FnMut(Sample),
    {
        fifo::drain_fifo(&mut self.interface, sink)
    }

    /// Runs a validated live axis query.
    pub fn query_axis(&mut self, query: AxisQuery) -> Result<QueryResponse, CommE> {
        query::query_axis(&mut self.interface, query)
    }

    /// Validates and runs a raw `{ axis, length }` query.
    pub fn query(&mut self, request: QueryRequest) -> Result<QueryResponse, CommE> {
        query::handle_request(&mut self.interface, request)
    }
}
