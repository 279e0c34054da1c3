//! Simulation harness and image loaders.

/// Per-edge harness and run loop.
pub mod harness;

/// ROM image and UART input pre-loading.
pub mod loader;

pub use harness::Harness;
