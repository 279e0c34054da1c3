//! Bus Access Types.
//!
//! This module defines the classification of bus transactions issued by the
//! core under test. The harness uses it to label trace output and to keep
//! separate counters for the instruction and data ports.

use std::fmt;

/// Type of bus transaction.
///
/// The core has two ports: an instruction port that only reads, and a data
/// port that reads and writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessType {
    /// Instruction fetch on the instruction port.
    Fetch,

    /// Data read on the data port.
    Read,

    /// Data write on the data port.
    Write,
}

impl AccessType {
    /// Short port label used in trace and warning messages.
    pub fn port(self) -> &'static str {
        match self {
            AccessType::Fetch => "IMEM",
            AccessType::Read | AccessType::Write => "DMEM",
        }
    }
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AccessType::Fetch => "fetch",
            AccessType::Read => "read",
            AccessType::Write => "write",
        };
        f.write_str(s)
    }
}
