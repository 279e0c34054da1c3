//! Machine Timer.
//!
//! A 64-bit free-running `mtime` counter compared against `mtimecmp`. The
//! counter advances once every `ticks_per_mtime_tick` bus cycles and the
//! interrupt level is recomputed on every cycle, so the line rises without
//! any software access.

use crate::common::DeviceError;
use crate::soc::traits::{Device, IrqLine};

/// `mtime` bits 31:0.
pub const MTIME_LO: u32 = 0;
/// `mtime` bits 63:32.
pub const MTIME_HI: u32 = 1;
/// `mtimecmp` bits 31:0.
pub const MTIMECMP_LO: u32 = 2;
/// `mtimecmp` bits 63:32.
pub const MTIMECMP_HI: u32 = 3;

const LO_MASK: u64 = 0x0000_0000_ffff_ffff;
const HI_MASK: u64 = 0xffff_ffff_0000_0000;

/// Machine timer device.
pub struct Timer {
    mtime: u64,
    mtimecmp: u64,
    ticks: u32,
    ticks_per_mtime_tick: u32,
    interrupt_pending: bool,
}

impl Timer {
    /// Creates a timer whose `mtime` advances every `ticks_per_mtime_tick` cycles.
    ///
    /// A prescaler of 0 is treated as 1.
    pub fn new(ticks_per_mtime_tick: u32) -> Self {
        Self {
            mtime: 0,
            mtimecmp: 0,
            ticks: 0,
            ticks_per_mtime_tick: ticks_per_mtime_tick.max(1),
            interrupt_pending: false,
        }
    }

    /// Current `mtime`.
    pub fn mtime(&self) -> u64 {
        self.mtime
    }

    /// Current `mtimecmp`.
    pub fn mtimecmp(&self) -> u64 {
        self.mtimecmp
    }

    /// Interrupt level computed by the most recent tick.
    pub fn interrupt_pending(&self) -> bool {
        self.interrupt_pending
    }
}

impl Device for Timer {
    fn name(&self) -> &str {
        "TIMER"
    }

    fn write(&mut self, offset: u32, val: u32, _byte_enable: u8) -> Result<(), DeviceError> {
        let val = val as u64;
        match offset >> 2 {
            MTIME_LO => self.mtime = (self.mtime & HI_MASK) | val,
            MTIME_HI => self.mtime = (self.mtime & LO_MASK) | (val << 32),
            MTIMECMP_LO => self.mtimecmp = (self.mtimecmp & HI_MASK) | val,
            MTIMECMP_HI => self.mtimecmp = (self.mtimecmp & LO_MASK) | (val << 32),
            _ => return Err(DeviceError::NoSuchRegister(offset)),
        }
        Ok(())
    }

    fn read(&mut self, offset: u32, _byte_enable: u8) -> Result<u32, DeviceError> {
        match offset >> 2 {
            MTIME_LO => Ok(self.mtime as u32),
            MTIME_HI => Ok((self.mtime >> 32) as u32),
            MTIMECMP_LO => Ok(self.mtimecmp as u32),
            MTIMECMP_HI => Ok((self.mtimecmp >> 32) as u32),
            _ => Err(DeviceError::NoSuchRegister(offset)),
        }
    }

    fn tick(&mut self) -> bool {
        self.ticks += 1;
        if self.ticks >= self.ticks_per_mtime_tick {
            self.ticks = 0;
            self.mtime = self.mtime.wrapping_add(1);
        }
        self.interrupt_pending = self.mtime >= self.mtimecmp;
        self.interrupt_pending
    }

    fn irq_line(&self) -> Option<IrqLine> {
        Some(IrqLine::Timer)
    }
}
