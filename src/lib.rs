//! eisV Co-Simulation Harness Library.
//!
//! This crate is the software half of a lock-step co-simulation of a RISC-V
//! softcore. A hardware simulator runs the core's RTL and exchanges one
//! record of signal values with this harness per clock edge; the harness
//! serves the core's instruction and data ports from an emulated bus.
//!
//! # Architecture
//!
//! * **Bus**: prefix-decoded address map over devices that own their state.
//! * **Devices**: word-addressed memory, machine timer, UART, stop register.
//! * **Link**: nine-valued logic codec, fixed port layouts, and a
//!   sequenced-packet socket transport.
//!
//! # Modules
//!
//! * `common`: Access types and error handling.
//! * `config`: Configuration loading and parsing.
//! * `cosim`: Wire codec, transports, and the per-edge bridge.
//! * `sim`: Cycle harness and image loaders.
//! * `soc`: Bus, devices, and system assembly.
//! * `stats`: Run statistics collection.

/// Shared access types and error enums.
pub mod common;

/// Configuration system for the address map, memories, and devices.
///
/// Loads TOML configuration files; every field has a default matching the
/// stock eisV platform.
pub mod config;

/// Hardware link: logic symbols, port layouts, transports, and the bridge.
pub mod cosim;

/// Cycle harness, image loaders, and the run loop.
pub mod sim;

/// System-on-Chip components: bus interconnect and MMIO devices.
///
/// Implements address decoding and the memory, timer, UART, and stop
/// devices the core sees on its data and instruction ports.
pub mod soc;

/// Run statistics collection and reporting.
pub mod stats;
