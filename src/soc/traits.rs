//! System-on-Chip Traits.
//!
//! This module defines the common interface implemented by every device on
//! the bus. Devices never see global addresses: the bus strips the matched
//! prefix and passes a local offset. All transactions are 32 bits wide with a
//! 4-bit byte-enable mask.

use crate::common::DeviceError;
use crate::soc::devices::Uart;
use crate::soc::memory::Memory;

/// Interrupt line driven by a device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IrqLine {
    /// Machine timer interrupt.
    Timer,
    /// Machine external interrupt.
    External,
}

/// Trait for memory-mapped devices.
///
/// All devices attached to the bus implement this trait. Register-style
/// devices decode the word index `offset >> 2`.
pub trait Device {
    /// Returns the user-friendly name of the device.
    ///
    /// Used in bus warnings and the memory map printout.
    fn name(&self) -> &str;

    /// Writes `val` at the local offset, honouring `byte_enable` where the
    /// device supports partial writes.
    fn write(&mut self, offset: u32, val: u32, byte_enable: u8) -> Result<(), DeviceError>;

    /// Reads the word at the local offset.
    fn read(&mut self, offset: u32, byte_enable: u8) -> Result<u32, DeviceError>;

    /// Advances the device state by one clock cycle.
    ///
    /// # Returns
    ///
    /// The level of the device's interrupt line after the tick.
    fn tick(&mut self) -> bool {
        false
    }

    /// Returns the interrupt line driven by this device's tick level.
    ///
    /// Returns `None` if the device does not generate interrupts.
    fn irq_line(&self) -> Option<IrqLine> {
        None
    }

    /// Returns the exit code once the device has requested the end of the
    /// simulation.
    fn exit_request(&self) -> Option<u32> {
        None
    }

    /// Downcasts the device to a mutable UART reference if applicable.
    ///
    /// Used by the harness to inject receive data.
    fn as_uart_mut(&mut self) -> Option<&mut Uart> {
        None
    }

    /// Downcasts the device to a mutable Memory reference if applicable.
    ///
    /// Used by the harness to load images and dump RAM.
    fn as_memory_mut(&mut self) -> Option<&mut Memory> {
        None
    }
}
