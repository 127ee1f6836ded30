//! Configuration primitives for the ADXL345 driver.
//!
//! A [`Config`] is written to the device once during startup and is not
//! touched afterwards. [`Config::default()`] reproduces the reference startup
//! sequence: 100 Hz, default data format, stream FIFO with a watermark of 20,
//! measurement enabled and the watermark interrupt unmasked.

use crate::params::{DataRate, FifoMode, Justify, Range, TriggerPin, WakeUpRate};
use crate::registers::{
    BwRate, DataFormat, FifoControl, InterruptEnable, MAX_WATERMARK, PowerControl,
};

/// User-facing configuration for the ADXL345 sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Output data rate selection.
    pub data_rate: DataRate,
    /// Reduced power operation.
    pub low_power: bool,
    /// Measurement range.
    pub range: Range,
    /// Full resolution output (4 mg/LSB regardless of range).
    pub full_resolution: bool,
    /// Output justification.
    pub justify: Justify,
    /// Hardware FIFO mode.
    pub fifo_mode: FifoMode,
    /// Hardware FIFO watermark in samples (0..=31).
    pub watermark: u8,
    /// Raise the interrupt line when the watermark is reached.
    pub watermark_interrupt: bool,
}

impl Config {
    /// Begins building a [`Config`] using the builder pattern.
    pub fn new() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Checks whether this configuration can be encoded and is coherent.
    pub fn validate(&self) -> core::result::Result<(), ConfigError> {
        if self.watermark > MAX_WATERMARK {
            return Err(ConfigError::WatermarkOutOfRange);
        }

        if self.watermark_interrupt && self.fifo_mode == FifoMode::Bypass {
            return Err(ConfigError::WatermarkWithoutFifo);
        }

        Ok(())
    }

    /// `BW_RATE` value for this configuration.
    pub fn bw_rate(&self) -> BwRate {
        BwRate::new()
            .with_rate(self.data_rate)
            .with_low_power(self.low_power)
    }

    /// `DATA_FORMAT` value for this configuration.
    pub fn data_format(&self) -> DataFormat {
        DataFormat::new()
            .with_range(self.range)
            .with_justify(self.justify)
            .with_full_res(self.full_resolution)
    }

    /// `FIFO_CTL` value for this configuration.
    ///
    /// Callers must validate first; the watermark is masked to five bits.
    pub fn fifo_control(&self) -> FifoControl {
        FifoControl::new()
            .with_samples(self.watermark & MAX_WATERMARK)
            .with_trigger(TriggerPin::Int1)
            .with_mode(self.fifo_mode)
    }

    /// `POWER_CTL` value that starts measurement.
    pub fn power_control(&self) -> PowerControl {
        PowerControl::new()
            .with_wakeup(WakeUpRate::Hz8)
            .with_measure(true)
    }

    /// `INT_ENABLE` value for this configuration.
    pub fn interrupt_enable(&self) -> InterruptEnable {
        InterruptEnable::new().with_watermark(self.watermark_interrupt)
    }
}

/// Builder for [`Config`] allowing piecemeal construction.
#[derive(Debug, Clone, Copy)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Creates a new builder seeded with [`Config::default()`].
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Overrides the output data rate.
    pub fn data_rate(mut self, data_rate: DataRate) -> Self {
        self.config.data_rate = data_rate;
        self
    }

    /// Enables reduced power operation.
    pub fn low_power(mut self, low_power: bool) -> Self {
        self.config.low_power = low_power;
        self
    }

    /// Overrides the measurement range.
    pub fn range(mut self, range: Range) -> Self {
        self.config.range = range;
        self
    }

    /// Selects full resolution output.
    pub fn full_resolution(mut self, full_resolution: bool) -> Self {
        self.config.full_resolution = full_resolution;
        self
    }

    /// Overrides the output justification.
    pub fn justify(mut self, justify: Justify) -> Self {
        self.config.justify = justify;
        self
    }

    /// Overrides the hardware FIFO mode.
    pub fn fifo_mode(mut self, mode: FifoMode) -> Self {
        self.config.fifo_mode = mode;
        self
    }

    /// Sets the hardware FIFO watermark.
    pub fn watermark(mut self, samples: u8) -> Self {
        self.config.watermark = samples;
        self
    }

    /// Enables or masks the watermark interrupt.
    pub fn watermark_interrupt(mut self, enabled: bool) -> Self {
        self.config.watermark_interrupt = enabled;
        self
    }

    /// Finalizes the builder and returns the [`Config`].
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_rate: DataRate::Hz100,
            low_power: false,
            range: Range::G2,
            full_resolution: false,
            justify: Justify::Right,
            fifo_mode: FifoMode::Stream,
            watermark: 20,
            watermark_interrupt: true,
        }
    }
}

/// Validation errors generated while verifying a [`Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The watermark does not fit the five-bit `SAMPLES` field.
    WatermarkOutOfRange,
    /// The watermark interrupt cannot fire while the FIFO is bypassed.
    WatermarkWithoutFifo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_encodes_reference_startup_values() {
        let config = Config::default();
        config.validate().unwrap();

        assert_eq!(u8::from(config.bw_rate()), 0x0A);
        assert_eq!(u8::from(config.data_format()), 0x00);
        assert_eq!(u8::from(config.fifo_control()), 148);
        assert_eq!(u8::from(config.power_control()), 0x08);
        assert_eq!(u8::from(config.interrupt_enable()), 0x01);
    }

    #[test]
    fn builder_overrides_fields() {
        let config = Config::new()
            .data_rate(DataRate::Hz400)
            .range(Range::G8)
            .full_resolution(true)
            .watermark(31)
            .build();

        assert_eq!(u8::from(config.bw_rate()), 0x0C);
        assert_eq!(u8::from(config.data_format()), 0b0000_1010);
        assert_eq!(config.fifo_control().samples(), 31);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn watermark_above_five_bits_is_rejected() {
        let config = Config::new().watermark(32).build();
        assert_eq!(config.validate(), Err(ConfigError::WatermarkOutOfRange));
    }

    #[test]
    fn watermark_interrupt_requires_fifo() {
        let config = Config::new().fifo_mode(FifoMode::Bypass).build();
        assert_eq!(config.validate(), Err(ConfigError::WatermarkWithoutFifo));

        let polled = Config::new()
            .fifo_mode(FifoMode::Bypass)
            .watermark_interrupt(false)
            .build();
        assert_eq!(polled.validate(), Ok(()));
    }
}
