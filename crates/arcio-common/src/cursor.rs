//! Little-endian primitives over byte streams.
//!
//! Both container formats are sequences of fixed-width little-endian words.
//! [`ReadExt`] and [`WriteExt`] extend any [`Read`]/[`Write`] with exactly
//! those reads and writes. A field that is cut short by the end of the stream
//! is reported as [`Error::UnexpectedEof`] and is never zero-padded.
//!
//! # Example
//!
//! ```
//! use std::io::Cursor;
//! use arcio_common::{ReadExt, WriteExt};
//!
//! let mut buf = Vec::new();
//! buf.write_u32_le(0x04030201).unwrap();
//! assert_eq!(buf, [0x01, 0x02, 0x03, 0x04]);
//!
//! let mut reader = Cursor::new(buf);
//! assert_eq!(reader.read_u32_le().unwrap(), 0x04030201);
//! ```

use std::io::{ErrorKind, Read, Write};

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use zerocopy::FromBytes;

use crate::{Error, Result};

/// Reading fixed-width little-endian fields from a stream.
pub trait ReadExt: Read {
    /// Read exactly `N` bytes.
    ///
    /// Unlike [`Read::read_exact`], a short stream reports how many bytes were
    /// actually available before it ended.
    fn read_bytes<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        let filled = fill(self, &mut buf)?;
        if filled < N {
            return Err(Error::UnexpectedEof {
                needed: N,
                available: filled,
            });
        }
        Ok(buf)
    }

    /// Read a little-endian u16.
    #[inline]
    fn read_u16_le(&mut self) -> Result<u16> {
        Ok(LittleEndian::read_u16(&self.read_bytes::<2>()?))
    }

    /// Read a little-endian u32.
    #[inline]
    fn read_u32_le(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(&self.read_bytes::<4>()?))
    }

    /// Consume a u32 whose value is not interpreted.
    #[inline]
    fn skip_u32(&mut self) -> Result<()> {
        self.read_bytes::<4>().map(|_| ())
    }

    /// Read a fixed-layout record.
    ///
    /// The struct must implement `FromBytes` from the zerocopy crate.
    fn read_struct<T: FromBytes>(&mut self) -> Result<T> {
        let size = std::mem::size_of::<T>();
        let mut bytes = vec![0u8; size];
        let filled = fill(self, &mut bytes)?;
        if filled < size {
            return Err(Error::UnexpectedEof {
                needed: size,
                available: filled,
            });
        }
        T::read_from_bytes(&bytes).map_err(|_| Error::UnexpectedEof {
            needed: size,
            available: bytes.len(),
        })
    }
}

impl<R: Read + ?Sized> ReadExt for R {}

/// Writing fixed-width little-endian fields to a stream.
pub trait WriteExt: Write {
    /// Write a little-endian u16.
    #[inline]
    fn write_u16_le(&mut self, value: u16) -> Result<()> {
        self.write_u16::<LittleEndian>(value)?;
        Ok(())
    }

    /// Write a little-endian u32.
    #[inline]
    fn write_u32_le(&mut self, value: u32) -> Result<()> {
        self.write_u32::<LittleEndian>(value)?;
        Ok(())
    }
}

impl<W: Write + ?Sized> WriteExt for W {}

/// Read until `buf` is full or the stream ends, returning the bytes filled.
fn fill<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(Error::Io(e)),
        }
    }
    Ok(filled)
}
