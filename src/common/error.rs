//! Error Types.
//!
//! Every fallible operation in the harness reports through one of the enums
//! below. Device and bus errors are expected during normal simulation (the
//! core is free to touch unmapped memory) and are never fatal on their own;
//! transport errors desynchronize the lock-step link and end the run.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Rejection reported by a device for a local (prefix-stripped) offset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceError {
    /// The word index lies beyond the end of a memory.
    #[error("offset {0:#x} is outside the device")]
    OutOfRange(u32),

    /// The word index does not select a register.
    #[error("no register at offset {0:#x}")]
    NoSuchRegister(u32),

    /// The device cannot be read.
    #[error("device is write-only")]
    WriteOnly,

    /// Writing to the output sink failed.
    #[error("output sink failed: {0}")]
    Sink(String),
}

/// Failure of a global bus access or of bus construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BusError {
    /// No segment matches the address.
    #[error("address {0:#010x} is unmapped")]
    Unmapped(u32),

    /// A segment matched but its device refused the access.
    #[error("{device} rejected access at {addr:#010x}: {source}")]
    Rejected {
        /// Name of the refusing device.
        device: String,
        /// Global address of the access.
        addr: u32,
        /// Reason given by the device.
        source: DeviceError,
    },

    /// The prefix has bits set below its prefix length, or the length exceeds 32.
    #[error("invalid segment {addr_prefix:#010x}/{prefix_length}")]
    InvalidSegment {
        /// Number of significant leading address bits.
        prefix_length: u32,
        /// Address prefix.
        addr_prefix: u32,
    },

    /// The device handle does not belong to this bus.
    #[error("unknown device handle {0}")]
    UnknownDevice(usize),
}

/// A wire buffer does not have the length its port layout requires.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    /// Buffer length differs from the layout's bit count.
    #[error("frame is {actual} bytes, layout needs {expected}")]
    Length {
        /// Bytes required by the layout.
        expected: usize,
        /// Bytes supplied.
        actual: usize,
    },
}

/// Failure of the co-simulation link.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Socket system call failed.
    #[error("socket error: {0}")]
    Io(#[from] io::Error),

    /// Socket name does not fit the abstract address.
    #[error("socket name is {0} bytes, at most 32 allowed")]
    NameTooLong(usize),

    /// A record of unexpected size was sent or received.
    #[error("exchanged {actual} bytes, expected {expected}")]
    Length {
        /// Configured buffer size.
        expected: usize,
        /// Bytes actually transferred.
        actual: usize,
    },

    /// The peer is gone.
    #[error("peer closed the link")]
    Closed,

    /// Encoding or decoding a frame failed.
    #[error(transparent)]
    Frame(#[from] FrameError),
}

/// Top-level simulation failure.
#[derive(Debug, Error)]
pub enum SimError {
    /// A required image could not be read.
    #[error("could not read image '{}': {source}", .path.display())]
    Image {
        /// Path of the image.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The co-simulation link failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The system could not be assembled.
    #[error(transparent)]
    Bus(#[from] BusError),

    /// The configuration is inconsistent.
    #[error("configuration error: {0}")]
    Config(String),

    /// The run hit its cycle bound without the program stopping.
    #[error("no stop request after {0} cycles")]
    CycleLimit(u64),
}
