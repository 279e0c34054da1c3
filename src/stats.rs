//! Simulation statistics collection and reporting.
//!
//! Tracks cycle counts, bus traffic per port, failed accesses and link
//! exchanges, and reports them as a console table or JSON.

use crate::common::AccessType;
use serde::Serialize;
use std::time::Instant;

/// Simulation statistics structure.
#[derive(Debug, Serialize)]
pub struct SimStats {
    #[serde(skip)]
    start_time: Instant,
    pub cycles: u64,
    pub exchanges: u64,

    pub fetches: u64,
    pub data_reads: u64,
    pub data_writes: u64,

    pub failed_fetches: u64,
    pub failed_reads: u64,
    pub failed_writes: u64,

    pub host_seconds: f64,
    pub exit_code: Option<u32>,
}

impl Default for SimStats {
    /// Returns the default value.
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            exchanges: 0,
            fetches: 0,
            data_reads: 0,
            data_writes: 0,
            failed_fetches: 0,
            failed_reads: 0,
            failed_writes: 0,
            host_seconds: 0.0,
            exit_code: None,
        }
    }
}

impl SimStats {
    /// Counts one bus access on the given port.
    pub fn record(&mut self, access: AccessType, ok: bool) {
        let (total, failed) = match access {
            AccessType::Fetch => (&mut self.fetches, &mut self.failed_fetches),
            AccessType::Read => (&mut self.data_reads, &mut self.failed_reads),
            AccessType::Write => (&mut self.data_writes, &mut self.failed_writes),
        };
        *total += 1;
        if !ok {
            *failed += 1;
        }
    }

    /// Total failed accesses over all ports.
    pub fn failed_accesses(&self) -> u64 {
        self.failed_fetches + self.failed_reads + self.failed_writes
    }

    /// Freezes the wall-clock time measured since creation.
    pub fn finish(&mut self) {
        self.host_seconds = self.start_time.elapsed().as_secs_f64();
    }

    /// Serializes the counters as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Prints a formatted summary of all simulation statistics.
    pub fn print(&self) {
        let seconds = if self.host_seconds > 0.0 {
            self.host_seconds
        } else {
            self.start_time.elapsed().as_secs_f64()
        };
        let khz = if seconds > 0.0 {
            (self.cycles as f64 / seconds) / 1000.0
        } else {
            0.0
        };

        let print_port = |name: &str, total: u64, failed: u64| {
            let rate = if total > 0 {
                (failed as f64 / total as f64) * 100.0
            } else {
                0.0
            };
            println!(
                "  {:<8} accesses: {:<10} | failed: {:<8} | fail_rate: {:.2}%",
                name, total, failed, rate
            );
        };

        println!("\n==========================================================");
        println!("CO-SIMULATION STATISTICS");
        println!("==========================================================");
        println!("host_seconds             {:.4} s", seconds);
        println!("sim_cycles               {}", self.cycles);
        println!("sim_freq                 {:.2} kHz", khz);
        println!("link_exchanges           {}", self.exchanges);
        match self.exit_code {
            Some(code) => println!("exit_code                {} ({:#x})", code, code),
            None => println!("exit_code                -"),
        }
        println!("----------------------------------------------------------");
        println!("BUS TRAFFIC");
        print_port("fetch", self.fetches, self.failed_fetches);
        print_port("read", self.data_reads, self.failed_reads);
        print_port("write", self.data_writes, self.failed_writes);
        println!("==========================================================");
    }
}
