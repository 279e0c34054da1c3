use crate::common::DeviceError;
use crate::soc::traits::Device;

/// Simulation stop register.
///
/// Any write latches the written value as the program's exit code and
/// requests the end of the simulation. The run loop observes the request
/// through `Device::exit_request` after the bus tick.
pub struct StopSimulation {
    stop_requested: bool,
    return_value: u32,
}

impl StopSimulation {
    /// Creates a stop register with no request pending.
    pub fn new() -> Self {
        Self {
            stop_requested: false,
            return_value: 0,
        }
    }

    /// Whether software has written the register.
    pub fn stop_requested(&self) -> bool {
        self.stop_requested
    }

    /// Value of the most recent write.
    pub fn return_value(&self) -> u32 {
        self.return_value
    }
}

impl Default for StopSimulation {
    fn default() -> Self {
        Self::new()
    }
}

impl Device for StopSimulation {
    fn name(&self) -> &str {
        "STOP"
    }

    fn write(&mut self, _offset: u32, val: u32, _byte_enable: u8) -> Result<(), DeviceError> {
        if !self.stop_requested {
            log::info!("[Stop] Stop requested with value {} ({:#x})", val, val);
        }
        self.stop_requested = true;
        self.return_value = val;
        Ok(())
    }

    fn read(&mut self, _offset: u32, _byte_enable: u8) -> Result<u32, DeviceError> {
        Err(DeviceError::WriteOnly)
    }

    fn exit_request(&self) -> Option<u32> {
        self.stop_requested.then_some(self.return_value)
    }
}
