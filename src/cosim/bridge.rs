//! Clock-edge exchange over a transport.
//!
//! The bridge owns the transport and both wire buffers. Buffer sizes come
//! from the bundle layouts and are fixed for the life of the link. On the
//! harness side `Tx` is `CoreInputs` and `Rx` is `CoreOutputs`; a stand-in
//! for the hardware model uses the reverse pair.

use super::frame::{self, Bundle, CoreInputs, CoreOutputs};
use super::transport::Transport;
use crate::common::TransportError;
use std::marker::PhantomData;

/// One end of the lock-step link.
pub struct Bridge<T: Transport, Tx: Bundle = CoreInputs, Rx: Bundle = CoreOutputs> {
    transport: T,
    out_buf: Vec<u8>,
    in_buf: Vec<u8>,
    exchanges: u64,
    _dir: PhantomData<(Tx, Rx)>,
}

impl<T: Transport, Tx: Bundle, Rx: Bundle> Bridge<T, Tx, Rx> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            out_buf: vec![0; Tx::WIRE_LEN],
            in_buf: vec![0; Rx::WIRE_LEN],
            exchanges: 0,
            _dir: PhantomData,
        }
    }

    /// Encodes and sends one outbound bundle.
    pub fn send(&mut self, bundle: &Tx) -> Result<(), TransportError> {
        frame::encode(bundle, &mut self.out_buf)?;
        self.transport.send(&self.out_buf)
    }

    /// Receives and decodes one inbound bundle.
    pub fn receive(&mut self) -> Result<Rx, TransportError> {
        self.transport.recv(&mut self.in_buf)?;
        Ok(frame::decode(&self.in_buf)?)
    }

    /// One clock edge: send the current outbound signals, then block for the
    /// peer's reply.
    pub fn exchange(&mut self, bundle: &Tx) -> Result<Rx, TransportError> {
        self.send(bundle)?;
        let reply = self.receive()?;
        self.exchanges += 1;
        Ok(reply)
    }

    /// Completed `exchange` calls.
    pub fn exchanges(&self) -> u64 {
        self.exchanges
    }

    /// Outbound and inbound buffer sizes in bytes.
    pub fn buffer_sizes(&self) -> (usize, usize) {
        (self.out_buf.len(), self.in_buf.len())
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_inner(self) -> T {
        self.transport
    }
}
