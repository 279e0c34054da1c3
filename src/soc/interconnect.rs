//! System Bus Interconnect.
//!
//! This module implements the address-decoding bus. Devices live in an arena
//! owned by the bus and are referenced by `DeviceId`; the memory map is an
//! ordered list of prefix segments pointing into that arena. Decoding scans
//! the segments in registration order and the first match wins, so
//! overlapping segments are legal and resolved by order.

use crate::common::{BusError, DeviceError};
use crate::soc::traits::{Device, IrqLine};

/// Handle to a device attached to a `Bus`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DeviceId(usize);

impl DeviceId {
    /// Position of the device in attach order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// One entry of the memory map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment {
    /// Number of leading address bits compared against `addr_prefix`.
    pub prefix_length: u32,
    /// Value of the leading bits; all lower bits are zero.
    pub addr_prefix: u32,
    /// Device receiving accesses that match.
    pub device: DeviceId,
}

impl Segment {
    /// Mask selecting the prefix bits of an address.
    pub fn mask(&self) -> u32 {
        prefix_mask(self.prefix_length)
    }

    /// Returns the local address if `addr` falls inside this segment.
    pub fn local(&self, addr: u32) -> Option<u32> {
        let mask = self.mask();
        if addr & mask == self.addr_prefix {
            Some(addr & !mask)
        } else {
            None
        }
    }
}

/// Computes `!((1 << (32 - prefix_length)) - 1)` without shifting by 32.
///
/// A length of 0 yields an empty mask (every address matches); lengths above
/// 32 saturate to a full mask.
pub fn prefix_mask(prefix_length: u32) -> u32 {
    match prefix_length {
        0 => 0,
        n if n >= 32 => u32::MAX,
        n => !((1u32 << (32 - n)) - 1),
    }
}

/// Interrupt and stop status collected from all devices after a tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickStatus {
    /// Level of the machine timer interrupt line.
    pub timer_irq: bool,
    /// Level of the machine external interrupt line.
    pub external_irq: bool,
    /// Exit code, once a device has requested the end of the simulation.
    pub exit: Option<u32>,
}

/// System interconnect bus.
///
/// Routes 32-bit, byte-enabled transactions to devices by address prefix.
pub struct Bus {
    devices: Vec<Box<dyn Device>>,
    segments: Vec<Segment>,
}

impl Bus {
    /// Creates an empty bus.
    pub fn new() -> Self {
        Self {
            devices: Vec::new(),
            segments: Vec::new(),
        }
    }

    /// Attaches a device without mapping it.
    ///
    /// The device is ticked every cycle from now on, whether or not any
    /// segment points at it.
    pub fn attach(&mut self, dev: Box<dyn Device>) -> DeviceId {
        self.devices.push(dev);
        DeviceId(self.devices.len() - 1)
    }

    /// Appends a segment mapping `addr_prefix/prefix_length` to an attached device.
    ///
    /// Overlaps with earlier segments are not checked; the earlier segment wins.
    pub fn map(
        &mut self,
        id: DeviceId,
        prefix_length: u32,
        addr_prefix: u32,
    ) -> Result<(), BusError> {
        let dev = self
            .devices
            .get(id.0)
            .ok_or(BusError::UnknownDevice(id.0))?;
        if prefix_length > 32 || addr_prefix & !prefix_mask(prefix_length) != 0 {
            return Err(BusError::InvalidSegment {
                prefix_length,
                addr_prefix,
            });
        }
        log::info!(
            "[Bus] Registered device: {:<8} @ {:#010x}/{:<2} ({} bytes)",
            dev.name(),
            addr_prefix,
            prefix_length,
            (!prefix_mask(prefix_length)) as u64 + 1
        );
        self.segments.push(Segment {
            prefix_length,
            addr_prefix,
            device: id,
        });
        Ok(())
    }

    /// Attaches a device and maps it to a single segment.
    pub fn add_device(
        &mut self,
        dev: Box<dyn Device>,
        prefix_length: u32,
        addr_prefix: u32,
    ) -> Result<DeviceId, BusError> {
        let id = self.attach(dev);
        if let Err(e) = self.map(id, prefix_length, addr_prefix) {
            self.devices.pop();
            return Err(e);
        }
        Ok(id)
    }

    /// Decodes a global address.
    ///
    /// # Returns
    ///
    /// The first segment (in registration order) whose prefix matches, and
    /// the address with that prefix stripped.
    pub fn map_address(&self, addr: u32) -> Option<(Segment, u32)> {
        self.segments
            .iter()
            .find_map(|seg| seg.local(addr).map(|local| (*seg, local)))
    }

    /// The memory map in registration order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of attached devices.
    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    /// Returns a mutable reference to an attached device.
    pub fn device_mut(&mut self, id: DeviceId) -> Option<&mut dyn Device> {
        match self.devices.get_mut(id.0) {
            Some(dev) => Some(&mut **dev),
            None => None,
        }
    }

    /// Returns a shared reference to an attached device.
    pub fn device(&self, id: DeviceId) -> Option<&dyn Device> {
        match self.devices.get(id.0) {
            Some(dev) => Some(&**dev),
            None => None,
        }
    }

    /// Writes a word at a global address.
    ///
    /// Unmapped addresses and device rejections are logged and leave all
    /// state unchanged.
    pub fn write(&mut self, addr: u32, val: u32, byte_enable: u8) -> Result<(), BusError> {
        let Some((seg, local)) = self.map_address(addr) else {
            log::warn!("[Bus] Write to unmapped memory at {:08x}", addr);
            return Err(BusError::Unmapped(addr));
        };
        let dev = &mut self.devices[seg.device.0];
        dev.write(local, val, byte_enable)
            .map_err(|e| rejected(&**dev, addr, e))
    }

    /// Reads a word at a global address.
    pub fn read(&mut self, addr: u32, byte_enable: u8) -> Result<u32, BusError> {
        let Some((seg, local)) = self.map_address(addr) else {
            log::warn!("[Bus] Read from unmapped memory at {:08x}", addr);
            return Err(BusError::Unmapped(addr));
        };
        let dev = &mut self.devices[seg.device.0];
        dev.read(local, byte_enable)
            .map_err(|e| rejected(&**dev, addr, e))
    }

    /// Advances every attached device by one cycle, in attach order.
    ///
    /// # Returns
    ///
    /// The interrupt line levels and any pending stop request.
    pub fn tick(&mut self) -> TickStatus {
        let mut status = TickStatus::default();
        for dev in &mut self.devices {
            let level = dev.tick();
            match dev.irq_line() {
                Some(IrqLine::Timer) => status.timer_irq |= level,
                Some(IrqLine::External) => status.external_irq |= level,
                None => {}
            }
            if status.exit.is_none() {
                status.exit = dev.exit_request();
            }
        }
        status
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

fn rejected(dev: &dyn Device, addr: u32, source: DeviceError) -> BusError {
    log::warn!("[Bus] {} rejected access at {:08x}: {}", dev.name(), addr, source);
    BusError::Rejected {
        device: dev.name().to_string(),
        addr,
        source,
    }
}
