//! System-on-Chip (SoC) Builder.
//!
//! This module defines the `System` structure, which owns the bus and the
//! handles of the devices the harness needs to reach directly (ROM for the
//! boot image, RAM for the exit dump, UART for receive data). It wires the
//! devices into the memory map given by the configuration.

use crate::common::SimError;
use crate::config::{Config, DeviceKind};
use crate::soc::devices::{StopSimulation, Timer, Uart};
use crate::soc::interconnect::{Bus, DeviceId, TickStatus};
use crate::soc::memory::Memory;

/// System-on-Chip structure containing all memory-mapped components.
pub struct System {
    /// Address-decoding bus owning every device.
    pub bus: Bus,
    rom: DeviceId,
    ram: DeviceId,
    uart: DeviceId,
    stop: DeviceId,
    timer: DeviceId,
}

impl System {
    /// Creates a new system instance from the configuration.
    ///
    /// Every device is created once and attached in a fixed order (RAM, ROM,
    /// stop, timer, UART); the configured segments are then mapped in file
    /// order. A device may appear in several segments or in none.
    ///
    /// # Errors
    ///
    /// `SimError::Config` for unparsable prefixes, `SimError::Bus` for
    /// prefixes with bits set below their length.
    pub fn new(config: &Config) -> Result<Self, SimError> {
        let mut bus = Bus::new();

        let ram = bus.attach(Box::new(Memory::new("RAM", config.memory.ram_words())));
        let rom = bus.attach(Box::new(Memory::new("ROM", config.memory.rom_words())));
        let stop = bus.attach(Box::new(StopSimulation::new()));
        let timer = bus.attach(Box::new(Timer::new(config.timer.ticks_per_mtime_tick)));
        let uart = bus.attach(Box::new(build_uart(config)));

        let mut system = Self {
            bus,
            rom,
            ram,
            uart,
            stop,
            timer,
        };

        for seg in &config.map {
            let prefix = seg.prefix_val().ok_or_else(|| {
                SimError::Config(format!("bad prefix '{}' for {:?}", seg.prefix, seg.device))
            })?;
            let id = system.device_id(seg.device);
            system.bus.map(id, seg.prefix_length, prefix)?;
        }

        Ok(system)
    }

    /// Advances all devices by one cycle.
    pub fn tick(&mut self) -> TickStatus {
        self.bus.tick()
    }

    /// Returns the boot ROM.
    ///
    /// `None` only if the handle no longer refers to a `Memory`.
    pub fn rom_mut(&mut self) -> Option<&mut Memory> {
        self.bus.device_mut(self.rom)?.as_memory_mut()
    }

    /// Returns the main RAM.
    pub fn ram_mut(&mut self) -> Option<&mut Memory> {
        self.bus.device_mut(self.ram)?.as_memory_mut()
    }

    /// Returns the UART.
    pub fn uart_mut(&mut self) -> Option<&mut Uart> {
        self.bus.device_mut(self.uart)?.as_uart_mut()
    }

    /// Returns the bus handle of a device.
    pub fn device_id(&self, kind: DeviceKind) -> DeviceId {
        match kind {
            DeviceKind::Ram => self.ram,
            DeviceKind::Rom => self.rom,
            DeviceKind::Stop => self.stop,
            DeviceKind::Timer => self.timer,
            DeviceKind::Uart => self.uart,
        }
    }

    /// Returns the exit code once the stop register has been written.
    pub fn check_exit(&self) -> Option<u32> {
        self.bus.device(self.stop).and_then(|dev| dev.exit_request())
    }
}

fn build_uart(config: &Config) -> Uart {
    let mut uart = match &config.uart.output {
        Some(path) => Uart::with_output_file(path).unwrap_or_else(|e| {
            log::warn!(
                "[Uart] Could not open '{}' ({}), writing to stdout",
                path.display(),
                e
            );
            Uart::new()
        }),
        None => Uart::new(),
    };
    uart.set_echo_rx(config.uart.echo_rx);
    uart
}
