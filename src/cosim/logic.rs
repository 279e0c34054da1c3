//! Nine-valued `std_ulogic` wire encoding.
//!
//! The hardware simulator transfers every signal bit as one byte holding the
//! position of its value in the `std_ulogic` enumeration. Only `'0'` and
//! `'1'` carry a logic level for this harness; every other symbol decodes to
//! `false` with a warning so a floating or uninitialized signal never aborts
//! the run.

use std::fmt;

/// One `std_ulogic` value, numbered as in the IEEE 1164 enumeration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum LogicSymbol {
    /// `'U'`
    Uninitialized = 0,
    /// `'X'`
    Unknown = 1,
    /// `'0'`
    Zero = 2,
    /// `'1'`
    One = 3,
    /// `'Z'`
    HighImpedance = 4,
    /// `'W'`
    WeakUnknown = 5,
    /// `'L'`
    WeakZero = 6,
    /// `'H'`
    WeakOne = 7,
    /// `'-'`
    DontCare = 8,
}

const SYMBOLS: [LogicSymbol; 9] = [
    LogicSymbol::Uninitialized,
    LogicSymbol::Unknown,
    LogicSymbol::Zero,
    LogicSymbol::One,
    LogicSymbol::HighImpedance,
    LogicSymbol::WeakUnknown,
    LogicSymbol::WeakZero,
    LogicSymbol::WeakOne,
    LogicSymbol::DontCare,
];

impl LogicSymbol {
    /// Looks up the symbol for a wire byte.
    pub fn from_byte(byte: u8) -> Option<Self> {
        SYMBOLS.get(byte as usize).copied()
    }

    /// The wire byte of this symbol.
    pub fn as_byte(self) -> u8 {
        self as u8
    }

    /// The VHDL character literal of this symbol.
    pub fn as_char(self) -> char {
        match self {
            LogicSymbol::Uninitialized => 'U',
            LogicSymbol::Unknown => 'X',
            LogicSymbol::Zero => '0',
            LogicSymbol::One => '1',
            LogicSymbol::HighImpedance => 'Z',
            LogicSymbol::WeakUnknown => 'W',
            LogicSymbol::WeakZero => 'L',
            LogicSymbol::WeakOne => 'H',
            LogicSymbol::DontCare => '-',
        }
    }

    /// The logic level, for the two strong driven symbols only.
    pub fn level(self) -> Option<bool> {
        match self {
            LogicSymbol::Zero => Some(false),
            LogicSymbol::One => Some(true),
            _ => None,
        }
    }
}

impl From<bool> for LogicSymbol {
    fn from(bit: bool) -> Self {
        if bit {
            LogicSymbol::One
        } else {
            LogicSymbol::Zero
        }
    }
}

impl fmt::Display for LogicSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.as_char())
    }
}

/// Encodes a bit as its strong-level wire byte.
pub fn encode_bit(bit: bool) -> u8 {
    LogicSymbol::from(bit).as_byte()
}

/// Decodes a wire byte; anything but a strong `'0'`/`'1'` becomes `false`.
pub fn decode_bit(byte: u8) -> bool {
    match LogicSymbol::from_byte(byte) {
        Some(sym) => sym.level().unwrap_or_else(|| {
            log::warn!("[Link] Converting {} to '0'", sym);
            false
        }),
        None => {
            log::warn!("[Link] Converting invalid symbol byte {:#04x} to '0'", byte);
            false
        }
    }
}

/// Encodes the low `out.len()` bits of `value`, most significant first.
pub fn encode_bits(value: u64, out: &mut [u8]) {
    let width = out.len();
    for (i, slot) in out.iter_mut().enumerate() {
        let bit = width - 1 - i;
        *slot = encode_bit(bit < 64 && (value >> bit) & 1 != 0);
    }
}

/// Decodes a most-significant-first bit vector.
pub fn decode_bits(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .fold(0u64, |acc, &b| (acc << 1) | decode_bit(b) as u64)
}
