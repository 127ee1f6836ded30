#![cfg_attr(not(any(feature = "std", test)), no_std)]

#[macro_use]
mod log;

mod error;

pub mod config;
pub mod device;
pub mod fifo;
pub mod interface;
pub mod params;
pub mod query;
pub mod registers;
pub mod ring;

#[cfg(feature = "std")]
pub mod acquisition;
#[cfg(feature = "std")]
pub mod reader;
#[cfg(feature = "std")]
pub mod registry;
#[cfg(feature = "std")]
pub mod stream;

#[cfg(test)]
mod testing;

pub use crate::device::Adxl345;
pub use crate::error::{Error, Result};
pub use crate::fifo::{Axis, Sample};
pub use crate::query::{AxisQuery, QueryRequest, QueryResponse};

#[cfg(feature = "std")]
pub use crate::acquisition::{Acquisition, InterruptTrigger};
#[cfg(feature = "std")]
pub use crate::reader::{AxisStream, BlockingReader};
#[cfg(feature = "std")]
pub use crate::stream::SampleBuffer;
