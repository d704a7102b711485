//! Manufacturing API
//!
//! Work order, serial number and work order monitor lookups, behind the
//! [`ManufacturingApi`] trait so the control sequence can run against mocks.

pub mod client;
pub mod errors;
pub mod types;

#[cfg(test)]
pub mod mocks;

pub use client::{HttpManufacturingApi, ManufacturingApi};
pub use errors::ApiError;
pub use types::{Endpoint, SerialInfo, WorkOrderInfo};
