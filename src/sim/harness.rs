//! Cycle Harness.
//!
//! Drives one clock edge per `step()`. Within an edge the order is fixed:
//! the current core inputs are sent, the core outputs are received and
//! applied, the instruction and data ports are served from the bus, the
//! interrupt lines are latched, and every device ticks. The run loop polls
//! the stop request once per edge and dumps RAM when the program ends.

use crate::common::{AccessType, SimError};
use crate::config::Config;
use crate::cosim::{Bridge, CoreInputs, CoreOutputs, Transport};
use crate::soc::{System, TickStatus};
use crate::stats::SimStats;
use std::path::PathBuf;

/// Byte enable used for instruction fetches and data reads.
const FULL_WORD: u8 = 0b1111;

macro_rules! trace_access {
    ($($arg:tt)*) => {
        if cfg!(feature = "always-trace") {
            log::info!($($arg)*)
        } else {
            log::trace!($($arg)*)
        }
    };
}

/// Software side of the co-simulation.
pub struct Harness<T: Transport> {
    system: System,
    bridge: Bridge<T>,
    inputs: CoreInputs,
    irqs: TickStatus,
    cycle: u64,
    reset_cycles: u64,
    max_cycles: u64,
    ram_dump: Option<PathBuf>,
    exit: Option<u32>,
    pub stats: SimStats,
}

impl<T: Transport> Harness<T> {
    pub fn new(system: System, transport: T, config: &Config) -> Self {
        let bridge = Bridge::new(transport);
        let (out_len, in_len) = bridge.buffer_sizes();
        log::debug!("[TB] Link buffers: {} bytes out, {} bytes in", out_len, in_len);
        Self {
            system,
            bridge,
            inputs: CoreInputs::default(),
            irqs: TickStatus::default(),
            cycle: 0,
            reset_cycles: config.general.reset_cycles,
            max_cycles: config.general.max_cycles,
            ram_dump: config.memory.ram_dump.clone(),
            exit: None,
            stats: SimStats::default(),
        }
    }

    /// Clock edges completed so far.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Signals that will be sent on the next edge.
    pub fn inputs(&self) -> &CoreInputs {
        &self.inputs
    }

    /// Exit code, once the program has written the stop register.
    pub fn exit_code(&self) -> Option<u32> {
        self.exit
    }

    pub fn system(&self) -> &System {
        &self.system
    }

    pub fn system_mut(&mut self) -> &mut System {
        &mut self.system
    }

    pub fn bridge(&self) -> &Bridge<T> {
        &self.bridge
    }

    /// Runs one clock edge.
    ///
    /// # Returns
    ///
    /// `Some(code)` on the edge where the stop register was observed.
    ///
    /// # Errors
    ///
    /// Only transport failures, which leave the link desynchronized.
    pub fn step(&mut self) -> Result<Option<u32>, SimError> {
        self.drive_reset();

        let outputs = self.bridge.exchange(&self.inputs)?;
        self.stats.exchanges = self.bridge.exchanges();

        self.serve(&outputs);

        self.inputs.external_irq = self.irqs.external_irq;
        self.inputs.timer_irq = self.irqs.timer_irq;

        self.irqs = self.system.tick();
        self.cycle += 1;
        self.stats.cycles = self.cycle;

        if self.exit.is_none() {
            self.exit = self.irqs.exit;
        }
        Ok(self.irqs.exit)
    }

    /// Steps until the program stops, then dumps RAM.
    ///
    /// # Returns
    ///
    /// The value the program wrote to the stop register.
    pub fn run(&mut self) -> Result<u32, SimError> {
        let code = loop {
            if let Some(code) = self.step()? {
                break code;
            }
            if self.max_cycles != 0 && self.cycle >= self.max_cycles {
                self.stats.finish();
                return Err(SimError::CycleLimit(self.cycle));
            }
        };
        self.drain(code);
        Ok(code)
    }

    fn drive_reset(&mut self) {
        let rst_n = self.cycle >= self.reset_cycles;
        if self.cycle == 0 && !rst_n {
            log::info!("[TB] Reset on");
        }
        if rst_n && !self.inputs.rst_n {
            log::info!("[TB] Reset off");
        }
        self.inputs.rst_n = rst_n;
    }

    fn serve(&mut self, outputs: &CoreOutputs) {
        if outputs.imem_ren {
            self.inputs.imem_rdata = self.read(AccessType::Fetch, outputs.imem_addr);
        }
        if outputs.dmem_ren {
            self.inputs.dmem_rdata = self.read(AccessType::Read, outputs.dmem_addr);
        }
        if outputs.dmem_wen {
            self.write(
                outputs.dmem_addr,
                outputs.dmem_wdata,
                outputs.dmem_byte_enable,
            );
        }
    }

    fn read(&mut self, access: AccessType, addr: u32) -> u32 {
        match self.system.bus.read(addr, FULL_WORD) {
            Ok(val) => {
                trace_access!("[TB] Reading {}[{:08x}] => {:08x}", access.port(), addr, val);
                self.stats.record(access, true);
                val
            }
            Err(_) => {
                log::warn!("[TB] {} {} at {:08x} is OOB", access.port(), access, addr);
                self.stats.record(access, false);
                0
            }
        }
    }

    fn write(&mut self, addr: u32, val: u32, byte_enable: u8) {
        let ok = self.system.bus.write(addr, val, byte_enable).is_ok();
        if ok {
            trace_access!(
                "[TB] Writing DMEM[{:08x}] <= {:08x}, {:02x}",
                addr,
                val,
                byte_enable
            );
        } else {
            log::warn!("[TB] DMEM write at {:08x} is OOB", addr);
        }
        self.stats.record(AccessType::Write, ok);
    }

    fn drain(&mut self, code: u32) {
        self.stats.exit_code = Some(code);
        self.stats.finish();
        log::info!(
            "[TB] Program finished with return value {} ({:x})!",
            code,
            code
        );
        let (Some(path), Some(ram)) = (&self.ram_dump, self.system.ram_mut()) else {
            return;
        };
        log::info!("[TB] Dumping memory to {}...", path.display());
        match ram.write_to_file(path) {
            Ok(()) => log::info!("[TB] Finished dumping memory to {}", path.display()),
            Err(e) => log::warn!("[TB] Failed dumping memory to {}: {}", path.display(), e),
        }
    }
}
