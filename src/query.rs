//! Live, buffer-independent axis queries.
//!
//! A query reads the instantaneous data registers of one axis straight from
//! the sensor. It never touches the acquisition buffer, so its result depends
//! only on the register contents at call time.

use crate::error::{Error, Result};
use crate::fifo::Axis;
use crate::interface::Adxl345Interface;

/// Raw query as received from a caller: `{ axis, length }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QueryRequest {
    /// Axis selector: 0 = X, 1 = Y, 2 = Z.
    pub axis: u8,
    /// Number of data bytes to read, 1 or 2.
    pub length: u8,
}

/// Query response: `value[1]` is only populated for two-byte queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QueryResponse {
    /// Low data byte followed by the optional high data byte.
    pub value: [u8; 2],
}

impl QueryResponse {
    /// Assembles the little-endian 16-bit value.
    pub const fn raw(&self) -> i16 {
        i16::from_le_bytes(self.value)
    }
}

/// Number of data bytes read by a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Width {
    /// Low byte only.
    Low,
    /// Low and high bytes.
    Full,
}

/// Validated query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisQuery {
    /// Queried axis.
    pub axis: Axis,
    /// Bytes to read.
    pub width: Width,
}

impl AxisQuery {
    /// Creates a query for both data bytes of `axis`.
    pub const fn full(axis: Axis) -> Self {
        Self {
            axis,
            width: Width::Full,
        }
    }

    /// Validates a raw selector and byte count.
    pub fn parse<E>(axis: u8, length: u8) -> Result<Self, E> {
        let axis = Axis::try_from(axis).map_err(Error::InvalidAxis)?;
        let width = match length {
            1 => Width::Low,
            2 => Width::Full,
            other => return Err(Error::InvalidLength(other)),
        };
        Ok(Self { axis, width })
    }
}

impl TryFrom<QueryRequest> for AxisQuery {
    type Error = Error<core::convert::Infallible>;

    fn try_from(request: QueryRequest) -> core::result::Result<Self, Self::Error> {
        Self::parse(request.axis, request.length)
    }
}

/// Reads the data register(s) for `query`, one register per transaction.
pub fn query_axis<IFACE>(
    interface: &mut IFACE,
    query: AxisQuery,
) -> Result<QueryResponse, IFACE::Error>
where
    IFACE: Adxl345Interface,
{
    let mut response = QueryResponse::default();
    response.value[0] = interface.read_register(query.axis.low_register())?;
    if query.width == Width::Full {
        response.value[1] = interface.read_register(query.axis.high_register())?;
    }
    Ok(response)
}

/// Validates `request` before touching the bus, then runs it.
pub fn handle_request<IFACE>(
    interface: &mut IFACE,
    request: QueryRequest,
) -> Result<QueryResponse, IFACE::Error>
where
    IFACE: Adxl345Interface,
{
    let query = AxisQuery::parse::<IFACE::Error>(request.axis, request.length)?;
    query_axis(interface, query)
}
