//! Memory-mapped peripherals.

pub mod stop;
pub mod timer;
pub mod uart;

pub use stop::StopSimulation;
pub use timer::Timer;
pub use uart::Uart;
