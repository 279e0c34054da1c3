//! Word-Addressed Memory.
//!
//! Backing store for the ROM and RAM regions. Storage is an array of 32-bit
//! words; the byte-enable mask selects which lanes of a word a write
//! replaces. Images are raw little-endian words without a header.

use crate::common::DeviceError;
use crate::soc::traits::Device;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

/// Word-addressed RAM/ROM.
pub struct Memory {
    name: String,
    words: Vec<u32>,
}

impl Memory {
    /// Creates a zero-filled memory of `words` 32-bit words.
    pub fn new(name: &str, words: usize) -> Self {
        Self {
            name: name.to_string(),
            words: vec![0; words],
        }
    }

    /// Number of words in the memory.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns `true` if the memory holds no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Raw view of the stored words.
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    /// Copies an image into memory starting at word `offset`.
    ///
    /// Stops at the end of the image or the end of the memory, whichever
    /// comes first. A trailing partial word is zero-padded. Words not
    /// covered keep their previous value.
    ///
    /// # Returns
    ///
    /// The number of words written.
    pub fn load_words(&mut self, image: &[u8], offset: usize) -> usize {
        let mut loaded = 0;
        for (slot, chunk) in self
            .words
            .iter_mut()
            .skip(offset)
            .zip(image.chunks(4))
        {
            let mut bytes = [0u8; 4];
            bytes[..chunk.len()].copy_from_slice(chunk);
            *slot = u32::from_le_bytes(bytes);
            loaded += 1;
        }
        loaded
    }

    /// Loads a binary image file starting at word `offset`.
    ///
    /// A file shorter than the memory is not an error. Fails only if the
    /// file cannot be opened or read.
    pub fn init_from_file<P: AsRef<Path>>(&mut self, path: P, offset: usize) -> io::Result<usize> {
        let image = fs::read(path)?;
        Ok(self.load_words(&image, offset))
    }

    /// Dumps every word, in index order, to a raw binary file.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let mut out = File::create(path)?;
        let bytes: Vec<u8> = self.words.iter().flat_map(|w| w.to_le_bytes()).collect();
        out.write_all(&bytes)?;
        out.flush()
    }

    fn index(&self, offset: u32) -> Result<usize, DeviceError> {
        let idx = (offset >> 2) as usize;
        if idx < self.words.len() {
            Ok(idx)
        } else {
            Err(DeviceError::OutOfRange(offset))
        }
    }
}

/// Merges the enabled byte lanes of `new` into `old`.
///
/// Bit `i` of `byte_enable` selects bits `8i..8i+8`.
pub fn merge_lanes(old: u32, new: u32, byte_enable: u8) -> u32 {
    let mut mask = 0u32;
    for lane in 0..4u32 {
        if byte_enable & (1u8 << lane) != 0 {
            mask |= 0xff << (8 * lane);
        }
    }
    (old & !mask) | (new & mask)
}

impl Device for Memory {
    fn name(&self) -> &str {
        &self.name
    }

    fn write(&mut self, offset: u32, val: u32, byte_enable: u8) -> Result<(), DeviceError> {
        let idx = self.index(offset)?;
        self.words[idx] = merge_lanes(self.words[idx], val, byte_enable);
        Ok(())
    }

    /// Returns the whole word; reads are not masked by `byte_enable`.
    fn read(&mut self, offset: u32, _byte_enable: u8) -> Result<u32, DeviceError> {
        let idx = self.index(offset)?;
        Ok(self.words[idx])
    }

    fn as_memory_mut(&mut self) -> Option<&mut Memory> {
        Some(self)
    }
}
