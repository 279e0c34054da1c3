//! System-on-Chip components: the address-decoding bus and the devices
//! behind it.

/// System builder wiring devices into the configured memory map.
pub mod builder;

/// Memory-mapped peripherals (timer, UART, stop register).
pub mod devices;

/// Prefix-decoded system bus.
pub mod interconnect;

/// Word-addressed RAM/ROM.
pub mod memory;

/// The `Device` trait implemented by everything on the bus.
pub mod traits;

pub use builder::System;
pub use interconnect::{Bus, DeviceId, Segment, TickStatus};
pub use traits::{Device, IrqLine};
