//! Integration tests for configuration parsing and system assembly.

use eisv_cosim::common::SimError;
use eisv_cosim::config::{Config, DeviceKind, SegmentConfig};
use eisv_cosim::soc::System;
use std::path::Path;

fn quiet(mut config: Config) -> Config {
    config.uart.output = None;
    config.uart.input = None;
    config
}

/// Tests that the defaults reproduce the stock address map.
#[test]
fn test_default_map() {
    let config = Config::default();
    let map: Vec<(DeviceKind, u32, u32)> = config
        .map
        .iter()
        .map(|s| (s.device, s.prefix_val().unwrap(), s.prefix_length))
        .collect();
    assert_eq!(
        map,
        vec![
            (DeviceKind::Ram, 0x1000_0000, 16),
            (DeviceKind::Rom, 0x0000_0000, 22),
            (DeviceKind::Stop, 0x8000_0000, 30),
            (DeviceKind::Timer, 0x8000_0010, 28),
            (DeviceKind::Uart, 0x9000_0000, 28),
        ]
    );
    assert_eq!(config.memory.ram_words(), 16 * 1024);
    assert_eq!(config.memory.rom_words(), 256);
    assert_eq!(config.timer.ticks_per_mtime_tick, 50);
    assert_eq!(config.general.reset_cycles, 2);
    assert_eq!(config.memory.rom_image, Path::new("app/imem.bin"));
}

/// Tests that an empty document yields the defaults.
#[test]
fn test_empty_toml() {
    let config = Config::from_toml("").unwrap();
    assert_eq!(config.map.len(), 5);
    assert_eq!(config.link.retry_ms, 10);
    assert!(config.uart.echo_rx);
}

/// Tests overriding sections and the map.
#[test]
fn test_toml_overrides() {
    let toml = r#"
        [general]
        max_cycles = 1000

        [link]
        socket = "eisv"

        [memory]
        ram_size = "0x10_0000"
        ram_dump = "out/ram.bin"

        [timer]
        ticks_per_mtime_tick = 1

        [[map]]
        device = "ram"
        prefix = "0x2000_0000"
        prefix_length = 8
    "#;
    let config = Config::from_toml(toml).unwrap();
    assert_eq!(config.general.max_cycles, 1000);
    assert_eq!(config.general.reset_cycles, 2);
    assert_eq!(config.link.socket.as_deref(), Some("eisv"));
    assert_eq!(config.memory.ram_words(), 0x10_0000 >> 2);
    assert_eq!(config.memory.ram_dump.as_deref(), Some(Path::new("out/ram.bin")));
    assert_eq!(config.timer.ticks_per_mtime_tick, 1);
    assert_eq!(config.map.len(), 1);
    assert_eq!(config.map[0].prefix_val(), Some(0x2000_0000));
}

/// Tests that an unknown device kind is rejected.
#[test]
fn test_unknown_device_kind() {
    let toml = r#"
        [[map]]
        device = "gpio"
        prefix = "0x0"
        prefix_length = 0
    "#;
    assert!(Config::from_toml(toml).is_err());
}

/// Tests that the UART writes to stdout unless an output file is named.
#[test]
fn test_uart_output_defaults_to_stdout() {
    let config = Config::from_toml("[uart]\necho_rx = false\n").unwrap();
    assert!(config.uart.output.is_none());
    assert!(!config.uart.echo_rx);
    assert!(Config::default().uart.output.is_none());

    let config = Config::from_toml("[uart]\noutput = \"uart_out\"\n").unwrap();
    assert_eq!(config.uart.output.as_deref(), Some(Path::new("uart_out")));
}

/// Tests that an empty string disables an optional path.
#[test]
fn test_empty_paths_disable() {
    let toml = r#"
        [memory]
        ram_dump = ""

        [uart]
        input = ""
        output = " "
    "#;
    let config = Config::from_toml(toml).unwrap();
    assert!(config.memory.ram_dump.is_none());
    assert!(config.uart.input.is_none());
    assert!(config.uart.output.is_none());

    let config = Config::from_toml("").unwrap();
    assert_eq!(config.memory.ram_dump.as_deref(), Some(Path::new("app/dump.bin")));
    assert_eq!(config.uart.input.as_deref(), Some(Path::new("uart_in")));
}

/// Tests typed access to the ROM, RAM and UART of a built system.
#[test]
fn test_system_device_accessors() {
    let mut system = System::new(&quiet(Config::default())).unwrap();
    assert_eq!(system.rom_mut().unwrap().len(), 256);
    assert_eq!(system.ram_mut().unwrap().len(), 16 * 1024);
    system.uart_mut().unwrap().push_str("hi");
    assert_eq!(system.uart_mut().unwrap().pending(), 2);
}

/// Tests that the default system decodes every device window.
#[test]
fn test_system_default_map() {
    let mut system = System::new(&quiet(Config::default())).unwrap();
    assert_eq!(system.bus.device_count(), 5);
    assert_eq!(system.bus.segments().len(), 5);

    system.bus.write(0x1000_FFFC, 9, 0b1111).unwrap();
    assert_eq!(system.ram_mut().unwrap().words()[0x3FFF], 9);
    assert!(system.bus.write(0x1001_0000, 9, 0b1111).is_err());

    system.bus.write(0x0000_03FC, 1, 0b1111).unwrap();
    assert!(system.bus.read(0x0000_0400, 0b1111).is_err());

    system.bus.write(0x8000_0018, 0x10, 0b1111).unwrap();
    assert_eq!(system.bus.read(0x8000_0018, 0b1111).unwrap(), 0x10);
    assert_eq!(system.bus.read(0x9000_000C, 0b1111).unwrap(), 1 << 5);

    assert_eq!(system.check_exit(), None);
    system.bus.write(0x8000_0000, 3, 0b1111).unwrap();
    assert_eq!(system.check_exit(), Some(3));
    assert_eq!(system.tick().exit, Some(3));
}

/// Tests that a device may be mapped more than once.
#[test]
fn test_system_alias_mapping() {
    let mut config = quiet(Config::default());
    config
        .map
        .push(SegmentConfig::new(DeviceKind::Ram, 0x2000_0000, 16));
    let mut system = System::new(&config).unwrap();
    assert_eq!(system.bus.device_count(), 5);

    system.bus.write(0x2000_0010, 0xAB, 0b1111).unwrap();
    assert_eq!(system.bus.read(0x1000_0010, 0b1111).unwrap(), 0xAB);
}

/// Tests that malformed prefixes are reported.
#[test]
fn test_system_bad_prefix() {
    let mut config = quiet(Config::default());
    config.map[0].prefix = "zzz".into();
    assert!(matches!(System::new(&config), Err(SimError::Config(_))));

    let mut config = quiet(Config::default());
    config.map[0].prefix = "0x1000_0004".into();
    assert!(matches!(System::new(&config), Err(SimError::Bus(_))));
}
