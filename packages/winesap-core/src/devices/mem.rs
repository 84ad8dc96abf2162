//! Module for memory devices, such as RAM and ROM

use super::bus::{BusDevice, BusPeekResult};
use crate::error::{Error, Result, ROM_LEN};

pub struct Ram {
    buf: Vec<u8>,
    len: usize,
}

impl BusDevice for Ram {
    fn read(&mut self, addr: u16, last_bus_value: u8) -> u8 {
        self.peek(addr).unwrap(last_bus_value)
    }

    fn peek(&self, addr: u16) -> BusPeekResult {
        if (addr as usize) >= self.len {
            BusPeekResult::Unmapped
        } else {
            BusPeekResult::Result(self.buf[addr as usize])
        }
    }

    fn write(&mut self, addr: u16, value: u8) {
        if (addr as usize) < self.len {
            self.buf[addr as usize] = value;
        }
    }
}

impl Ram {
    pub fn new(size: usize) -> Ram {
        Ram {
            len: size,
            buf: vec![0u8; size],
        }
    }

    /// Copy a buffer into RAM at the given base, bounds-checked.
    pub fn load(&mut self, bytes: &[u8], base: u16) -> Result<()> {
        let base = base as usize;
        if base + bytes.len() > self.len {
            return Err(Error::RamLoadOutOfRange {
                base: base as u16,
                len: bytes.len(),
            });
        }
        self.buf[base..base + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    /// Borrow the whole buffer. The video generator reads the text and
    /// hi-res pages through this view; it never writes.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }
}

/// The 12k system ROM mapped at $D000-$FFFF. Writes are silently ignored.
pub struct Rom {
    buf: Vec<u8>,
}

impl BusDevice for Rom {
    fn read(&mut self, addr: u16, last_bus_value: u8) -> u8 {
        self.peek(addr).unwrap(last_bus_value)
    }

    fn peek(&self, addr: u16) -> BusPeekResult {
        if (addr as usize) >= self.buf.len() {
            BusPeekResult::Unmapped
        } else {
            BusPeekResult::Result(self.buf[addr as usize])
        }
    }

    fn write(&mut self, _addr: u16, _value: u8) {
        // no-op: this is a ROM
    }
}

impl Rom {
    /// An unprogrammed ROM reads as all ones, like blank EPROM.
    pub fn new_blank() -> Rom {
        Rom {
            buf: vec![0xFFu8; ROM_LEN],
        }
    }

    pub fn new_from_buf(buf: &[u8]) -> Result<Rom> {
        if buf.len() != ROM_LEN {
            return Err(Error::RomSizeMismatch { len: buf.len() });
        }
        Ok(Rom {
            buf: Vec::from(buf),
        })
    }
}
