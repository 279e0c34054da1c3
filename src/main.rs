//! eisV Co-Simulation Harness CLI.
//!
//! The main executable for the harness. It parses command-line arguments,
//! builds the system from the configuration, connects to the hardware
//! simulator, and runs the lock-step loop until the program writes the stop
//! register.
//!
//! # Usage
//!
//! Start the hardware simulator first, then:
//!
//! ```text
//! eisv-cosim <socket-name> [--config cfg.toml] [--rom app/imem.bin]
//! ```
//!
//! The link uses abstract Unix sockets, so only Linux builds can run a
//! simulation. Elsewhere the binary parses its configuration and exits with
//! an error.

use clap::Parser;
use std::path::PathBuf;
use std::{fs, process};

use eisv_cosim::common::SimError;
use eisv_cosim::config::Config;
use eisv_cosim::stats::SimStats;

#[cfg(target_os = "linux")]
use eisv_cosim::{
    cosim::SeqPacketSocket,
    sim::{loader, Harness},
    soc::System,
};
#[cfg(target_os = "linux")]
use std::time::Duration;

/// Command-line arguments for the co-simulation harness.
#[derive(Parser, Debug)]
#[command(author, version, about = "eisV RISC-V Co-Simulation Harness")]
struct Args {
    /// Abstract socket name of the hardware simulator.
    socket: Option<String>,

    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Boot image; overrides `memory.rom_image`.
    #[arg(short, long)]
    rom: Option<PathBuf>,

    /// Abort after this many cycles; overrides `general.max_cycles`.
    #[arg(long)]
    max_cycles: Option<u64>,

    /// Write run statistics as JSON to this file.
    #[arg(long)]
    stats_json: Option<PathBuf>,

    /// Raise log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Main entry point for the co-simulation harness.
///
/// # Behavior
///
/// 1. **Configuration**: Parses arguments and loads the TOML configuration,
///    falling back to built-in defaults.
/// 2. **Initialization**: Constructs the `System`, loads the boot ROM, and
///    queues UART input.
/// 3. **Link**: Connects to the hardware simulator, retrying until it listens.
/// 4. **Simulation Loop**: Exchanges one record per clock edge until the stop
///    register is written.
/// 5. **Teardown**: Prints statistics and exits with the program's return value.
fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            process::exit(1);
        }
    };

    match run(&config) {
        Ok((code, stats)) => {
            stats.print();
            write_stats(&args, &stats);
            process::exit(code as i32);
        }
        Err((e, stats)) => {
            log::error!("{}", e);
            if let Some(stats) = stats {
                stats.print();
                write_stats(&args, &stats);
            }
            process::exit(1);
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn load_config(args: &Args) -> Result<Config, SimError> {
    let mut config = match &args.config {
        Some(path) => {
            let content = fs::read_to_string(path)
                .map_err(|e| SimError::Config(format!("{}: {}", path.display(), e)))?;
            Config::from_toml(&content)
                .map_err(|e| SimError::Config(format!("{}: {}", path.display(), e)))?
        }
        None => Config::default(),
    };

    if let Some(socket) = &args.socket {
        config.link.socket = Some(socket.clone());
    }
    if let Some(rom) = &args.rom {
        config.memory.rom_image = rom.clone();
    }
    if let Some(max) = args.max_cycles {
        config.general.max_cycles = max;
    }
    Ok(config)
}

type RunResult = Result<(u32, SimStats), (SimError, Option<SimStats>)>;

#[cfg(target_os = "linux")]
fn run(config: &Config) -> RunResult {
    let socket_name = config.link.socket.clone().ok_or_else(|| {
        (
            SimError::Config("no socket name given (argument or link.socket)".into()),
            None,
        )
    })?;

    let mut system = System::new(config).map_err(|e| (e, None))?;
    loader::load_rom(&mut system, &config.memory.rom_image).map_err(|e| (e, None))?;
    if let Some(input) = &config.uart.input {
        loader::preload_uart(&mut system, input);
    }

    let socket = SeqPacketSocket::connect(&socket_name, Duration::from_millis(config.link.retry_ms))
        .map_err(|e| (SimError::from(e), None))?;

    let mut harness = Harness::new(system, socket, config);
    match harness.run() {
        Ok(code) => Ok((code, harness.stats)),
        Err(e) => Err((e, Some(harness.stats))),
    }
}

#[cfg(not(target_os = "linux"))]
fn run(_config: &Config) -> RunResult {
    Err((
        SimError::Config("the socket link requires Linux".into()),
        None,
    ))
}

fn write_stats(args: &Args, stats: &SimStats) {
    let Some(path) = &args.stats_json else {
        return;
    };
    let result = stats
        .to_json()
        .map_err(|e| e.to_string())
        .and_then(|json| fs::write(path, json).map_err(|e| e.to_string()));
    if let Err(e) = result {
        log::warn!("Failed to write stats to {}: {}", path.display(), e);
    }
}
