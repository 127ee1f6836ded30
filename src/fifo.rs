//! Samples, axes and the hardware FIFO drain.
//!
//! [`drain_fifo`] is the producer half of the acquisition core. It runs once
//! per watermark interrupt, reads how many entries the sensor holds and burst
//! reads each one. A failed entry is logged and skipped; the loop never
//! retries and never aborts, so the interrupt path always returns promptly.

use crate::error::{Error, Result};
use crate::interface::Adxl345Interface;
use crate::registers::{
    FifoStatus, REG_DATAX0, REG_DATAX1, REG_DATAY0, REG_DATAY1, REG_DATAZ0, REG_DATAZ1,
    REG_FIFO_STATUS, SAMPLE_BYTES,
};

/// One synchronized raw reading of all three axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample {
    /// X-axis reading.
    pub x: i16,
    /// Y-axis reading.
    pub y: i16,
    /// Z-axis reading.
    pub z: i16,
}

impl Sample {
    /// Creates a sample from raw axis values.
    pub const fn new(x: i16, y: i16, z: i16) -> Self {
        Self { x, y, z }
    }

    /// Decodes `DATAX0..=DATAZ1` as three little-endian values.
    pub const fn from_le_bytes(raw: [u8; SAMPLE_BYTES]) -> Self {
        Self {
            x: i16::from_le_bytes([raw[0], raw[1]]),
            y: i16::from_le_bytes([raw[2], raw[3]]),
            z: i16::from_le_bytes([raw[4], raw[5]]),
        }
    }

    /// Returns the value of a single axis.
    pub const fn axis(&self, axis: Axis) -> i16 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }
}

/// Axis selector used by queries and streaming reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Axis {
    /// X axis (selector 0).
    X = 0,
    /// Y axis (selector 1).
    Y = 1,
    /// Z axis (selector 2).
    Z = 2,
}

impl Axis {
    /// Address of the low data byte for this axis.
    pub const fn low_register(self) -> u8 {
        match self {
            Self::X => REG_DATAX0,
            Self::Y => REG_DATAY0,
            Self::Z => REG_DATAZ0,
        }
    }

    /// Address of the high data byte for this axis.
    pub const fn high_register(self) -> u8 {
        match self {
            Self::X => REG_DATAX1,
            Self::Y => REG_DATAY1,
            Self::Z => REG_DATAZ1,
        }
    }
}

impl TryFrom<u8> for Axis {
    type Error = u8;

    fn try_from(value: u8) -> core::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::X),
            1 => Ok(Self::Y),
            2 => Ok(Self::Z),
            other => Err(other),
        }
    }
}

/// Outcome of one FIFO drain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DrainReport {
    /// Entries the hardware FIFO reported as pending.
    pub pending: u8,
    /// Entries read and handed to the sink.
    pub delivered: u8,
    /// Entries lost to a failed burst read.
    pub dropped: u8,
}

/// Reads `FIFO_STATUS`.
pub fn read_fifo_status<IFACE>(interface: &mut IFACE) -> Result<FifoStatus, IFACE::Error>
where
    IFACE: Adxl345Interface,
{
    let raw = interface.read_register(REG_FIFO_STATUS)?;
    Ok(FifoStatus::from(raw))
}

/// Burst reads one sample from the data registers.
pub fn read_sample<IFACE>(interface: &mut IFACE) -> Result<Sample, IFACE::Error>
where
    IFACE: Adxl345Interface,
{
    let mut raw = [0u8; SAMPLE_BYTES];
    interface
        .read_burst(REG_DATAX0, &mut raw)
        .map_err(Error::from)?;
    Ok(Sample::from_le_bytes(raw))
}

/// Empties the hardware FIFO into `sink`, oldest entry first.
///
/// Only the status read can fail the call. Each entry is read in its own
/// burst; a failed entry is counted in [`DrainReport::dropped`] and the loop
/// moves on to the next one.
pub fn drain_fifo<IFACE, F>(interface: &mut IFACE, mut sink: F) -> Result<DrainReport, IFACE::Error>
where
    IFACE: Adxl345Interface,
    F: FnMut(Sample),
{
    let pending = read_fifo_status(interface)?.entries();
    let mut report = DrainReport {
        pending,
        ..DrainReport::default()
    };

    for _ in 0..pending {
        match read_sample(interface) {
            Ok(sample) => {
                sink(sample);
                report.delivered += 1;
            }
            Err(_) => {
                report.dropped += 1;
                log_warn!("adxl345: failed to read FIFO entry, dropping it");
            }
        }
    }

    log_trace!(
        "adxl345: drained {} of {} FIFO entries",
        report.delivered,
        report.pending
    );
    Ok(report)
}
