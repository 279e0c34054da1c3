//! Signal bundles and their wire layouts.
//!
//! Each direction of the link carries a fixed list of ports, concatenated in
//! declaration order with one byte per bit. The layouts below mirror the
//! port lists of the VHDL wrapper around the core: `CoreInputs` is what the
//! harness drives into the core, `CoreOutputs` is what the core drives back.

use super::logic::{decode_bit, decode_bits, encode_bit, encode_bits};
use crate::common::FrameError;

/// One port of a bundle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Port {
    /// VHDL port name.
    pub name: &'static str,
    /// Width in bits (and therefore in wire bytes).
    pub width: usize,
}

const fn port(name: &'static str, width: usize) -> Port {
    Port { name, width }
}

/// Total wire length of a port list.
pub const fn layout_len(ports: &[Port]) -> usize {
    let mut total = 0;
    let mut i = 0;
    while i < ports.len() {
        total += ports[i].width;
        i += 1;
    }
    total
}

/// Sequential writer over an outbound wire buffer.
pub struct WireWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> WireWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn put_bool(&mut self, bit: bool) {
        self.buf[self.pos] = encode_bit(bit);
        self.pos += 1;
    }

    pub fn put_bits(&mut self, value: u64, width: usize) {
        encode_bits(value, &mut self.buf[self.pos..self.pos + width]);
        self.pos += width;
    }

    pub fn position(&self) -> usize {
        self.pos
    }
}

/// Sequential reader over an inbound wire buffer.
pub struct WireReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn get_bool(&mut self) -> bool {
        let bit = decode_bit(self.buf[self.pos]);
        self.pos += 1;
        bit
    }

    pub fn get_bits(&mut self, width: usize) -> u64 {
        let value = decode_bits(&self.buf[self.pos..self.pos + width]);
        self.pos += width;
        value
    }

    pub fn position(&self) -> usize {
        self.pos
    }
}

/// A group of signals transferred together in one direction.
///
/// `write_to` and `read_from` must visit exactly the ports of `PORTS`, in
/// order.
pub trait Bundle: Sized {
    /// Ports in wire order.
    const PORTS: &'static [Port];

    /// Wire length in bytes.
    const WIRE_LEN: usize = layout_len(Self::PORTS);

    fn write_to(&self, w: &mut WireWriter<'_>);

    fn read_from(r: &mut WireReader<'_>) -> Self;
}

/// Encodes a bundle into a buffer of exactly `B::WIRE_LEN` bytes.
pub fn encode<B: Bundle>(bundle: &B, buf: &mut [u8]) -> Result<(), FrameError> {
    check_len::<B>(buf.len())?;
    let mut w = WireWriter::new(buf);
    bundle.write_to(&mut w);
    debug_assert_eq!(w.position(), B::WIRE_LEN);
    Ok(())
}

/// Decodes a bundle from a buffer of exactly `B::WIRE_LEN` bytes.
pub fn decode<B: Bundle>(buf: &[u8]) -> Result<B, FrameError> {
    check_len::<B>(buf.len())?;
    let mut r = WireReader::new(buf);
    let bundle = B::read_from(&mut r);
    debug_assert_eq!(r.position(), B::WIRE_LEN);
    Ok(bundle)
}

fn check_len<B: Bundle>(actual: usize) -> Result<(), FrameError> {
    if actual == B::WIRE_LEN {
        Ok(())
    } else {
        Err(FrameError::Length {
            expected: B::WIRE_LEN,
            actual,
        })
    }
}

/// Signals driven by the harness into the core.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CoreInputs {
    /// Active-low reset.
    pub rst_n: bool,
    /// Instruction read data.
    pub imem_rdata: u32,
    /// Data read data.
    pub dmem_rdata: u32,
    /// Machine external interrupt pending.
    pub external_irq: bool,
    /// Machine timer interrupt pending.
    pub timer_irq: bool,
}

impl Bundle for CoreInputs {
    const PORTS: &'static [Port] = &[
        port("i_eisV_rst_n", 1),
        port("i_imem_rdata", 32),
        port("i_dmem_rdata", 32),
        port("i_external_interrupt_pending", 1),
        port("i_timer_interrupt_pending", 1),
    ];

    fn write_to(&self, w: &mut WireWriter<'_>) {
        w.put_bool(self.rst_n);
        w.put_bits(self.imem_rdata as u64, 32);
        w.put_bits(self.dmem_rdata as u64, 32);
        w.put_bool(self.external_irq);
        w.put_bool(self.timer_irq);
    }

    fn read_from(r: &mut WireReader<'_>) -> Self {
        Self {
            rst_n: r.get_bool(),
            imem_rdata: r.get_bits(32) as u32,
            dmem_rdata: r.get_bits(32) as u32,
            external_irq: r.get_bool(),
            timer_irq: r.get_bool(),
        }
    }
}

/// Signals driven by the core back to the harness.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CoreOutputs {
    /// Instruction fetch address.
    pub imem_addr: u32,
    /// Instruction fetch request.
    pub imem_ren: bool,
    /// Data address.
    pub dmem_addr: u32,
    /// Data read request.
    pub dmem_ren: bool,
    /// Data write request.
    pub dmem_wen: bool,
    /// Data write value.
    pub dmem_wdata: u32,
    /// Byte lanes of `dmem_wdata` to write (4 bits).
    pub dmem_byte_enable: u8,
}

impl Bundle for CoreOutputs {
    const PORTS: &'static [Port] = &[
        port("o_imem_addr", 32),
        port("o_imem_ren", 1),
        port("o_dmem_addr", 32),
        port("o_dmem_ren", 1),
        port("o_dmem_wen", 1),
        port("o_dmem_wdata", 32),
        port("o_dmem_byte_enable", 4),
    ];

    fn write_to(&self, w: &mut WireWriter<'_>) {
        w.put_bits(self.imem_addr as u64, 32);
        w.put_bool(self.imem_ren);
        w.put_bits(self.dmem_addr as u64, 32);
        w.put_bool(self.dmem_ren);
        w.put_bool(self.dmem_wen);
        w.put_bits(self.dmem_wdata as u64, 32);
        w.put_bits(self.dmem_byte_enable as u64, 4);
    }

    fn read_from(r: &mut WireReader<'_>) -> Self {
        Self {
            imem_addr: r.get_bits(32) as u32,
            imem_ren: r.get_bool(),
            dmem_addr: r.get_bits(32) as u32,
            dmem_ren: r.get_bool(),
            dmem_wen: r.get_bool(),
            dmem_wdata: r.get_bits(32) as u32,
            dmem_byte_enable: r.get_bits(4) as u8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_lengths_match_wrapper() {
        assert_eq!(CoreInputs::WIRE_LEN, 67);
        assert_eq!(CoreOutputs::WIRE_LEN, 103);
    }

    #[test]
    fn writer_and_reader_track_position() {
        let mut buf = [0u8; 5];
        let mut w = WireWriter::new(&mut buf);
        w.put_bool(true);
        w.put_bits(0b1010, 4);
        assert_eq!(w.position(), 5);
        assert_eq!(buf, [3, 3, 2, 3, 2]);

        let mut r = WireReader::new(&buf);
        assert!(r.get_bool());
        assert_eq!(r.get_bits(4), 0b1010);
        assert_eq!(r.position(), 5);
    }
}
