use serde::{Deserialize, Deserializer};
use std::path::PathBuf;

const ROM_SIZE: usize = 1 << 10;
const RAM_SIZE: usize = 1 << 16;

const ROM_BASE: u32 = 0x0000_0000;
const RAM_BASE: u32 = 0x1000_0000;
const STOP_BASE: u32 = 0x8000_0000;
const TIMER_BASE: u32 = 0x8000_0010;
const UART_BASE: u32 = 0x9000_0000;

const TICKS_PER_MTIME_TICK: u32 = 50;
const RESET_CYCLES: u64 = 2;
const CONNECT_RETRY_MS: u64 = 10;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub link: LinkConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub uart: UartConfig,
    #[serde(default = "default_map")]
    pub map: Vec<SegmentConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            link: LinkConfig::default(),
            memory: MemoryConfig::default(),
            timer: TimerConfig::default(),
            uart: UartConfig::default(),
            map: default_map(),
        }
    }
}

impl Config {
    /// Parses a TOML document; missing sections take their defaults.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeneralConfig {
    /// Clock edges for which the active-low reset is held.
    #[serde(default = "default_reset_cycles")]
    pub reset_cycles: u64,

    /// Upper bound on simulated cycles; 0 runs until the program stops.
    #[serde(default)]
    pub max_cycles: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            reset_cycles: default_reset_cycles(),
            max_cycles: 0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct LinkConfig {
    /// Abstract socket name of the hardware simulator.
    pub socket: Option<String>,

    #[serde(default = "default_retry_ms")]
    pub retry_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MemoryConfig {
    #[serde(default = "default_rom_size")]
    pub rom_size: String,

    #[serde(default = "default_ram_size")]
    pub ram_size: String,

    #[serde(default = "default_rom_image")]
    pub rom_image: PathBuf,

    /// RAM image written when the program stops; an empty string disables it.
    #[serde(default = "default_ram_dump", deserialize_with = "optional_path")]
    pub ram_dump: Option<PathBuf>,
}

impl MemoryConfig {
    /// ROM size in 32-bit words.
    pub fn rom_words(&self) -> usize {
        parse_size(&self.rom_size, ROM_SIZE) >> 2
    }

    /// RAM size in 32-bit words.
    pub fn ram_words(&self) -> usize {
        parse_size(&self.ram_size, RAM_SIZE) >> 2
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            rom_size: default_rom_size(),
            ram_size: default_ram_size(),
            rom_image: default_rom_image(),
            ram_dump: default_ram_dump(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct TimerConfig {
    #[serde(default = "default_ticks_per_mtime_tick")]
    pub ticks_per_mtime_tick: u32,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            ticks_per_mtime_tick: default_ticks_per_mtime_tick(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct UartConfig {
    /// File pre-loaded into the receive queue; ignored when missing.
    #[serde(default = "default_uart_input", deserialize_with = "optional_path")]
    pub input: Option<PathBuf>,

    /// Transmit sink; stdout when unset or empty.
    #[serde(default, deserialize_with = "optional_path")]
    pub output: Option<PathBuf>,

    #[serde(default = "default_true")]
    pub echo_rx: bool,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            input: default_uart_input(),
            output: None,
            echo_rx: true,
        }
    }
}

/// Devices the system builder knows how to instantiate.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    Ram,
    Rom,
    Stop,
    Timer,
    Uart,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SegmentConfig {
    pub device: DeviceKind,
    pub prefix: String,
    pub prefix_length: u32,
}

impl SegmentConfig {
    pub fn new(device: DeviceKind, prefix: u32, prefix_length: u32) -> Self {
        Self {
            device,
            prefix: format!("{:#010x}", prefix),
            prefix_length,
        }
    }

    pub fn prefix_val(&self) -> Option<u32> {
        parse_hex(&self.prefix)
    }
}

fn parse_hex(s: &str) -> Option<u32> {
    let s = s.trim();
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
        .replace('_', "");
    u32::from_str_radix(&digits, 16).ok()
}

/// Reads an optional path where an empty string means unset.
fn optional_path<'de, D: Deserializer<'de>>(d: D) -> Result<Option<PathBuf>, D::Error> {
    let s = Option::<String>::deserialize(d)?;
    Ok(s.filter(|s| !s.trim().is_empty()).map(PathBuf::from))
}

fn parse_size(s: &str, default: usize) -> usize {
    parse_hex(s).map(|v| v as usize).unwrap_or(default)
}

fn default_map() -> Vec<SegmentConfig> {
    vec![
        SegmentConfig::new(DeviceKind::Ram, RAM_BASE, 16),
        SegmentConfig::new(DeviceKind::Rom, ROM_BASE, 22),
        SegmentConfig::new(DeviceKind::Stop, STOP_BASE, 30),
        SegmentConfig::new(DeviceKind::Timer, TIMER_BASE, 28),
        SegmentConfig::new(DeviceKind::Uart, UART_BASE, 28),
    ]
}

fn default_reset_cycles() -> u64 {
    RESET_CYCLES
}

fn default_retry_ms() -> u64 {
    CONNECT_RETRY_MS
}

fn default_rom_size() -> String {
    format!("{:#x}", ROM_SIZE)
}

fn default_ram_size() -> String {
    format!("{:#x}", RAM_SIZE)
}

fn default_rom_image() -> PathBuf {
    PathBuf::from("app/imem.bin")
}

fn default_ram_dump() -> Option<PathBuf> {
    Some(PathBuf::from("app/dump.bin"))
}

fn default_ticks_per_mtime_tick() -> u32 {
    TICKS_PER_MTIME_TICK
}

fn default_uart_input() -> Option<PathBuf> {
    Some(PathBuf::from("uart_in"))
}

fn default_true() -> bool {
    true
}
