//! Image Loader.
//!
//! This module pre-loads the boot ROM and the UART receive queue before the
//! first clock edge.

use crate::common::SimError;
use crate::soc::System;
use std::path::Path;

/// Loads the boot image into ROM starting at word 0.
///
/// A missing or unreadable image is fatal: the core would fetch zeros.
pub fn load_rom(system: &mut System, path: &Path) -> Result<usize, SimError> {
    let rom = system
        .rom_mut()
        .ok_or_else(|| SimError::Config("no ROM device attached".into()))?;
    let words = rom
        .init_from_file(path, 0)
        .map_err(|source| SimError::Image {
            path: path.to_path_buf(),
            source,
        })?;
    log::info!(
        "[Loader] Initialized ROM with '{}' ({} words)",
        path.display(),
        words
    );
    Ok(words)
}

/// Queues the contents of `path` for the UART receiver.
///
/// A missing file only means the program gets no input.
pub fn preload_uart(system: &mut System, path: &Path) -> usize {
    let Some(uart) = system.uart_mut() else {
        log::warn!("[Loader] No UART attached, ignoring '{}'", path.display());
        return 0;
    };
    match uart.push_file(path) {
        Ok(n) => {
            log::info!("[Loader] Queued {} UART bytes from '{}'", n, path.display());
            n
        }
        Err(e) => {
            log::debug!("[Loader] No UART input from '{}': {}", path.display(), e);
            0
        }
    }
}
