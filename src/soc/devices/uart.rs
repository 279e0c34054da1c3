//! UART Model.
//!
//! Transmit bytes go straight to an output sink (a file or stdout) and are
//! flushed on every write. Receive bytes are pre-loaded or injected by the
//! harness and consumed in FIFO order by reads of the data register. No
//! baud-rate timing or back-pressure is modelled.

use crate::common::DeviceError;
use crate::soc::traits::Device;
use std::collections::VecDeque;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

/// Data register (transmit on write, receive on read).
pub const DATA_REG: u32 = 0;
/// Baud-rate register; accepted and ignored.
pub const BAUD_REG: u32 = 1;
/// Control register.
pub const CTRL_REG: u32 = 2;
/// Status register.
pub const STATUS_REG: u32 = 3;

/// Control bit: receiver enable.
pub const CONTROL_RX_EN: u32 = 4;
/// Control bit: transmitter enable.
pub const CONTROL_TX_EN: u32 = 3;

/// Status bit: transmitter can take a byte.
pub const STATUS_TX_READY: u32 = 5;
/// Status bit: a received byte is waiting.
pub const STATUS_RX_COMPLETE: u32 = 7;

/// UART device.
pub struct Uart {
    rx: VecDeque<u8>,
    sink: Box<dyn Write>,
    rx_enable: bool,
    tx_enable: bool,
    echo_rx: bool,
}

impl Uart {
    /// Creates a UART that transmits to stdout.
    pub fn new() -> Self {
        Self::with_sink(Box::new(io::stdout()))
    }

    /// Creates a UART that transmits to a freshly truncated file.
    pub fn with_output_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        Ok(Self::with_sink(Box::new(File::create(path)?)))
    }

    /// Creates a UART that transmits to an arbitrary writer.
    pub fn with_sink(sink: Box<dyn Write>) -> Self {
        Self {
            rx: VecDeque::new(),
            sink,
            rx_enable: false,
            tx_enable: false,
            echo_rx: false,
        }
    }

    /// Enables printing of each received byte to stdout as software reads it.
    pub fn set_echo_rx(&mut self, echo: bool) {
        self.echo_rx = echo;
    }

    /// Queues one byte for software to receive.
    pub fn push_byte(&mut self, byte: u8) {
        self.rx.push_back(byte);
    }

    /// Queues every byte of `s`.
    pub fn push_str(&mut self, s: &str) {
        self.rx.extend(s.bytes());
    }

    /// Queues the contents of a file.
    ///
    /// # Returns
    ///
    /// The number of bytes queued.
    pub fn push_file<P: AsRef<Path>>(&mut self, path: P) -> io::Result<usize> {
        let data = fs::read(path)?;
        self.rx.extend(&data);
        Ok(data.len())
    }

    /// Number of bytes waiting to be read by software.
    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    /// Receiver enable bit as last written by software.
    pub fn rx_enabled(&self) -> bool {
        self.rx_enable
    }

    /// Transmitter enable bit as last written by software.
    pub fn tx_enabled(&self) -> bool {
        self.tx_enable
    }

    fn transmit(&mut self, byte: u8) -> io::Result<()> {
        self.sink.write_all(&[byte])?;
        self.sink.flush()
    }

    fn receive(&mut self) -> u32 {
        match self.rx.pop_front() {
            Some(byte) => {
                if self.echo_rx {
                    print!("{}", byte as char);
                    io::stdout().flush().ok();
                }
                byte as u32
            }
            None => 0,
        }
    }
}

impl Default for Uart {
    fn default() -> Self {
        Self::new()
    }
}

impl Device for Uart {
    fn name(&self) -> &str {
        "UART0"
    }

    fn write(&mut self, offset: u32, val: u32, _byte_enable: u8) -> Result<(), DeviceError> {
        match offset >> 2 {
            DATA_REG => self
                .transmit(val as u8)
                .map_err(|e| DeviceError::Sink(e.to_string()))?,
            BAUD_REG | STATUS_REG => {}
            CTRL_REG => {
                self.rx_enable = (val >> CONTROL_RX_EN) & 1 != 0;
                self.tx_enable = (val >> CONTROL_TX_EN) & 1 != 0;
            }
            _ => return Err(DeviceError::NoSuchRegister(offset)),
        }
        Ok(())
    }

    fn read(&mut self, offset: u32, _byte_enable: u8) -> Result<u32, DeviceError> {
        match offset >> 2 {
            DATA_REG => Ok(self.receive()),
            BAUD_REG => Ok(0),
            CTRL_REG => Ok(((self.rx_enable as u32) << CONTROL_RX_EN)
                | ((self.tx_enable as u32) << CONTROL_TX_EN)),
            STATUS_REG => {
                let mut status = 1 << STATUS_TX_READY;
                if !self.rx.is_empty() {
                    status |= 1 << STATUS_RX_COMPLETE;
                }
                Ok(status)
            }
            _ => Err(DeviceError::NoSuchRegister(offset)),
        }
    }

    fn as_uart_mut(&mut self) -> Option<&mut Uart> {
        Some(self)
    }
}
