//! Integration tests for the std_ulogic wire codec and port layouts.

use eisv_cosim::common::FrameError;
use eisv_cosim::cosim::frame::{self, Bundle};
use eisv_cosim::cosim::logic::{decode_bit, decode_bits, encode_bit, encode_bits};
use eisv_cosim::cosim::{CoreInputs, CoreOutputs, LogicSymbol};

/// Tests the strong-level symbol bytes.
#[test]
fn test_encode_bit() {
    assert_eq!(encode_bit(false), 2);
    assert_eq!(encode_bit(true), 3);
    assert!(decode_bit(encode_bit(true)));
    assert!(!decode_bit(encode_bit(false)));
}

/// Tests that every non-strong symbol decodes to false.
#[test]
fn test_decode_weak_and_unknown() {
    for sym in [
        LogicSymbol::Uninitialized,
        LogicSymbol::Unknown,
        LogicSymbol::HighImpedance,
        LogicSymbol::WeakUnknown,
        LogicSymbol::WeakZero,
        LogicSymbol::WeakOne,
        LogicSymbol::DontCare,
    ] {
        assert!(!decode_bit(sym.as_byte()), "{} decoded as '1'", sym);
    }
    assert!(!decode_bit(9));
    assert!(!decode_bit(0xFF));
}

/// Tests the symbol table order.
#[test]
fn test_symbol_order() {
    let chars: String = (0u8..9)
        .map(|b| LogicSymbol::from_byte(b).unwrap().as_char())
        .collect();
    assert_eq!(chars, "UX01ZWLH-");
    assert_eq!(LogicSymbol::from_byte(9), None);
}

/// Tests that vectors are encoded most significant bit first.
#[test]
fn test_bits_msb_first() {
    let mut out = [0u8; 4];
    encode_bits(0b1000, &mut out);
    assert_eq!(out, [3, 2, 2, 2]);

    encode_bits(0b0001, &mut out);
    assert_eq!(out, [2, 2, 2, 3]);
    assert_eq!(decode_bits(&out), 1);
}

/// Tests a full 32-bit vector.
#[test]
fn test_bits_word() {
    let mut out = [0u8; 32];
    encode_bits(0x8000_0001, &mut out);
    assert_eq!(out[0], 3);
    assert_eq!(out[31], 3);
    assert!(out[1..31].iter().all(|&b| b == 2));
    assert_eq!(decode_bits(&out), 0x8000_0001);
}

/// Tests that an 'X' inside a vector reads as 0 in that position.
#[test]
fn test_bits_with_unknown() {
    let bytes = [3, 1, 3, 4];
    assert_eq!(decode_bits(&bytes), 0b1010);
}

/// Tests the buffer sizes of both directions.
#[test]
fn test_wire_lengths() {
    assert_eq!(CoreInputs::WIRE_LEN, 1 + 32 + 32 + 1 + 1);
    assert_eq!(CoreOutputs::WIRE_LEN, 32 + 1 + 32 + 1 + 1 + 32 + 4);
    assert_eq!(frame::layout_len(CoreInputs::PORTS), 67);
    assert_eq!(frame::layout_len(CoreOutputs::PORTS), 103);
}

/// Tests the field placement of the harness-to-core record.
#[test]
fn test_core_inputs_layout() {
    let inputs = CoreInputs {
        rst_n: true,
        imem_rdata: 0x8000_0000,
        dmem_rdata: 0x0000_0001,
        external_irq: false,
        timer_irq: true,
    };
    let mut buf = vec![0u8; CoreInputs::WIRE_LEN];
    frame::encode(&inputs, &mut buf).unwrap();

    assert_eq!(buf[0], 3);
    assert_eq!(buf[1], 3);
    assert!(buf[2..33].iter().all(|&b| b == 2));
    assert!(buf[33..64].iter().all(|&b| b == 2));
    assert_eq!(buf[64], 3);
    assert_eq!(buf[65], 2);
    assert_eq!(buf[66], 3);

    assert_eq!(frame::decode::<CoreInputs>(&buf).unwrap(), inputs);
}

/// Tests decoding of a core-to-harness record.
#[test]
fn test_core_outputs_decode() {
    let outputs = CoreOutputs {
        imem_addr: 0x0000_0004,
        imem_ren: true,
        dmem_addr: 0x1000_0010,
        dmem_ren: false,
        dmem_wen: true,
        dmem_wdata: 0xDEAD_BEEF,
        dmem_byte_enable: 0b0011,
    };
    let mut buf = vec![0u8; CoreOutputs::WIRE_LEN];
    frame::encode(&outputs, &mut buf).unwrap();
    assert_eq!(&buf[99..], &[2, 2, 3, 3]);
    assert_eq!(buf[32], 3);

    // Bit 28 of dmem_addr.
    buf[36] = LogicSymbol::Unknown.as_byte();
    let decoded = frame::decode::<CoreOutputs>(&buf).unwrap();
    assert_eq!(decoded.dmem_addr, 0x0000_0010);
    assert_eq!(decoded.dmem_wdata, 0xDEAD_BEEF);
    assert!(decoded.dmem_wen);
}

/// Tests that a buffer of the wrong size is refused.
#[test]
fn test_frame_length_mismatch() {
    let buf = [2u8; 66];
    assert_eq!(
        frame::decode::<CoreInputs>(&buf),
        Err(FrameError::Length {
            expected: 67,
            actual: 66
        })
    );
    let mut out = [0u8; 104];
    assert!(frame::encode(&CoreOutputs::default(), &mut out).is_err());
}
