//! Hardware co-simulation link.
//!
//! Signals cross the link once per clock edge as fixed-size records of
//! `std_ulogic` bytes. The layers, bottom up:
//!
//! * `logic`: per-bit symbol encoding.
//! * `frame`: port layouts and bundle encode/decode.
//! * `transport`: record transports (Unix sequenced-packet socket, loopback).
//! * `bridge`: the per-edge send/receive exchange.

pub mod bridge;
pub mod frame;
pub mod logic;
pub mod transport;

pub use bridge::Bridge;
pub use frame::{Bundle, CoreInputs, CoreOutputs};
pub use logic::LogicSymbol;
pub use transport::{Loopback, Transport};

#[cfg(target_os = "linux")]
pub use transport::SeqPacketSocket;
