//! Common types used throughout the co-simulation harness.
//!
//! This module provides the bus access classification and the error types
//! shared by the devices, the bus, the link and the harness.

/// Bus access type definitions.
pub mod data;

/// Error types for devices, bus, link and harness.
pub mod error;

pub use data::AccessType;
pub use error::{BusError, DeviceError, FrameError, SimError, TransportError};
