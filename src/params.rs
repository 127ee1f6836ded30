//! Strongly typed parameter enumerations for the ADXL345 driver.
//!
//! These enums map directly to datasheet field encodings and are used across
//! [`Config`](crate::config::Config) and the register bitfields. Prefer these
//! types over raw integers to keep configuration values valid and explicit.
//!
//! # Examples
//!
//! ```rust
//! use adxl345::params::{DataRate, FifoMode, Range};
//!
//! let rate = DataRate::Hz100;
//! let range = Range::G2;
//! let mode = FifoMode::Stream;
//! assert_eq!(rate.code(), 0x0A);
//! let _ = (range, mode);
//! ```

use modular_bitfield::prelude::Specifier;

/// Output data rate codes encoded in `BW_RATE.RATE` (bits 3:0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 4]
pub enum DataRate {
    /// 0.10 Hz.
    Hz0_10 = 0x00,
    /// 0.20 Hz.
    Hz0_20 = 0x01,
    /// 0.39 Hz.
    Hz0_39 = 0x02,
    /// 0.78 Hz.
    Hz0_78 = 0x03,
    /// 1.56 Hz.
    Hz1_56 = 0x04,
    /// 3.13 Hz.
    Hz3_13 = 0x05,
    /// 6.25 Hz.
    Hz6_25 = 0x06,
    /// 12.5 Hz.
    Hz12_5 = 0x07,
    /// 25 Hz.
    Hz25 = 0x08,
    /// 50 Hz.
    Hz50 = 0x09,
    /// 100 Hz (power-on default).
    Hz100 = 0x0A,
    /// 200 Hz.
    Hz200 = 0x0B,
    /// 400 Hz.
    Hz400 = 0x0C,
    /// 800 Hz.
    Hz800 = 0x0D,
    /// 1600 Hz.
    Hz1600 = 0x0E,
    /// 3200 Hz.
    Hz3200 = 0x0F,
}

impl DataRate {
    /// Returns the raw rate code.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Returns the output data rate in millihertz.
    pub const fn millihertz(self) -> u32 {
        match self {
            Self::Hz0_10 => 100,
            Self::Hz0_20 => 200,
            Self::Hz0_39 => 390,
            Self::Hz0_78 => 780,
            Self::Hz1_56 => 1_560,
            Self::Hz3_13 => 3_130,
            Self::Hz6_25 => 6_250,
            Self::Hz12_5 => 12_500,
            Self::Hz25 => 25_000,
            Self::Hz50 => 50_000,
            Self::Hz100 => 100_000,
            Self::Hz200 => 200_000,
            Self::Hz400 => 400_000,
            Self::Hz800 => 800_000,
            Self::Hz1600 => 1_600_000,
            Self::Hz3200 => 3_200_000,
        }
    }
}

/// Measurement range selections encoded in `DATA_FORMAT.RANGE` (bits 1:0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 2]
pub enum Range {
    /// ±2 g.
    G2 = 0b00,
    /// ±4 g.
    G4 = 0b01,
    /// ±8 g.
    G8 = 0b10,
    /// ±16 g.
    G16 = 0b11,
}

impl Range {
    /// Returns the full-scale magnitude in g.
    pub const fn g(self) -> u8 {
        match self {
            Self::G2 => 2,
            Self::G4 => 4,
            Self::G8 => 8,
            Self::G16 => 16,
        }
    }
}

/// FIFO operating modes encoded in `FIFO_CTL.FIFO_MODE` (bits 7:6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 2]
pub enum FifoMode {
    /// FIFO bypassed; only the data registers hold a sample.
    Bypass = 0b00,
    /// Collects up to 32 samples, then stops.
    Fifo = 0b01,
    /// Keeps the latest 32 samples, discarding the oldest.
    Stream = 0b10,
    /// Holds samples around a trigger event.
    Trigger = 0b11,
}

/// Trigger routing encoded in `FIFO_CTL.TRIGGER` (bit 5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 1]
pub enum TriggerPin {
    /// Trigger event linked to INT1.
    Int1 = 0,
    /// Trigger event linked to INT2.
    Int2 = 1,
}

/// Data justification encoded in `DATA_FORMAT.JUSTIFY` (bit 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 1]
pub enum Justify {
    /// Right-justified with sign extension.
    Right = 0,
    /// Left-justified (MSB mode).
    Left = 1,
}

/// Sleep-mode reading frequency encoded in `POWER_CTL.WAKEUP` (bits 1:0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 2]
pub enum WakeUpRate {
    /// 8 Hz.
    Hz8 = 0b00,
    /// 4 Hz.
    Hz4 = 0b01,
    /// 2 Hz.
    Hz2 = 0b10,
    /// 1 Hz.
    Hz1 = 0b11,
}
