//! Capability impls for in-memory bytes, plus [`SliceReader`].

use alloc::vec::Vec;
use core::str;

use super::{
    seek::resolve, ByteReader, ByteScanner, ByteWriter, Read, ReadAt, RuneReader, RuneScanner,
    Seek, SeekFrom, Write, WriteAt, WriterTo,
};
use crate::error::{Error, IoResult, Partial};

/// Reading from a slice consumes it from the front.
impl Read for &[u8] {
    fn read(&mut self, buffer: &mut [u8]) -> IoResult {
        if self.is_empty() && !buffer.is_empty() {
            return Err(Error::Eof.into());
        }

        let n = self.len().min(buffer.len());
        let (head, tail) = self.split_at(n);
        buffer[..n].copy_from_slice(head);
        *self = tail;
        Ok(n)
    }

    fn remaining_hint(&self) -> Option<u64> {
        Some(self.len() as u64)
    }
}

impl ReadAt for [u8] {
    fn read_at(&self, buffer: &mut [u8], offset: u64) -> IoResult {
        let start = match usize::try_from(offset) {
            Ok(start) if start < self.len() => start,
            _ => return Err(Error::Eof.into()),
        };

        let available = &self[start..];
        let n = available.len().min(buffer.len());
        buffer[..n].copy_from_slice(&available[..n]);

        if n < buffer.len() {
            return Err(Partial::new(n, Error::Eof));
        }
        Ok(n)
    }
}

impl ReadAt for Vec<u8> {
    #[inline]
    fn read_at(&self, buffer: &mut [u8], offset: u64) -> IoResult {
        self.as_slice().read_at(buffer, offset)
    }
}

/// Writing to a vector appends to it.
impl Write for Vec<u8> {
    #[inline]
    fn write(&mut self, buffer: &[u8]) -> IoResult {
        self.extend_from_slice(buffer);
        Ok(buffer.len())
    }
}

impl ByteWriter for Vec<u8> {
    #[inline]
    fn write_byte(&mut self, byte: u8) -> Result<(), Error> {
        self.push(byte);
        Ok(())
    }
}

/// Writing past the end of a vector grows it, filling any gap with zeros.
impl WriteAt for Vec<u8> {
    fn write_at(&mut self, buffer: &[u8], offset: u64) -> IoResult {
        let start = usize::try_from(offset).map_err(|_| Error::InvalidOffset)?;
        let end = start
            .checked_add(buffer.len())
            .ok_or(Error::InvalidOffset)?;

        if end > self.len() {
            self.resize(end, 0);
        }
        self[start..end].copy_from_slice(buffer);
        Ok(buffer.len())
    }
}

/// What the last successful operation on a [`SliceReader`] was, for unread.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LastRead {
    Other,
    Byte,
    Rune(usize),
}

/// Cursor over a borrowed byte slice.
///
/// Supports every read-side capability. Unread is only valid directly after
/// the matching read.
#[derive(Clone, Debug)]
pub struct SliceReader<'a> {
    data: &'a [u8],
    pos: u64,
    last: LastRead,
}

impl<'a> SliceReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            last: LastRead::Other,
        }
    }

    /// Bytes not read yet.
    pub fn len(&self) -> usize {
        self.unread().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Length of the whole underlying slice.
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Start over on another slice.
    pub fn reset(&mut self, data: &'a [u8]) {
        *self = Self::new(data);
    }

    fn unread(&self) -> &'a [u8] {
        let data = self.data;
        match usize::try_from(self.pos) {
            Ok(pos) if pos < data.len() => &data[pos..],
            _ => &[],
        }
    }
}

impl Read for SliceReader<'_> {
    fn read(&mut self, buffer: &mut [u8]) -> IoResult {
        self.last = LastRead::Other;
        let mut rest = self.unread();
        let n = rest.read(buffer)?;
        self.pos += n as u64;
        Ok(n)
    }

    fn as_writer_to(&mut self) -> Option<&mut dyn WriterTo> {
        Some(self)
    }

    fn remaining_hint(&self) -> Option<u64> {
        Some(self.len() as u64)
    }
}

impl ReadAt for SliceReader<'_> {
    #[inline]
    fn read_at(&self, buffer: &mut [u8], offset: u64) -> IoResult {
        self.data.read_at(buffer, offset)
    }
}

impl Seek for SliceReader<'_> {
    fn seek(&mut self, pos: SeekFrom) -> Result<u64, Error> {
        self.last = LastRead::Other;
        self.pos = resolve(pos, 0, self.pos, Some(self.size()))?;
        Ok(self.pos)
    }
}

impl WriterTo for SliceReader<'_> {
    fn write_to(&mut self, dst: &mut dyn Write) -> IoResult<u64> {
        self.last = LastRead::Other;
        let rest = self.unread();
        if rest.is_empty() {
            return Ok(0);
        }

        let result = dst.write(rest);
        let n = match &result {
            Ok(n) => *n,
            Err(p) => p.done,
        };
        if n > rest.len() {
            return Err(Partial::new(0, Error::InvalidWrite));
        }
        self.pos += n as u64;

        match result {
            Ok(n) if n != rest.len() => Err(Partial::new(n as u64, Error::ShortWrite)),
            Ok(n) => Ok(n as u64),
            Err(Partial { done, error }) => Err(Partial::new(done as u64, error)),
        }
    }
}

impl ByteReader for SliceReader<'_> {
    fn read_byte(&mut self) -> Result<u8, Error> {
        self.last = LastRead::Other;
        let &byte = self.unread().first().ok_or(Error::Eof)?;
        self.pos += 1;
        self.last = LastRead::Byte;
        Ok(byte)
    }
}

impl ByteScanner for SliceReader<'_> {
    fn unread_byte(&mut self) -> Result<(), Error> {
        if self.last != LastRead::Byte {
            return Err(Error::InvalidUnread);
        }
        self.last = LastRead::Other;
        self.pos -= 1;
        Ok(())
    }
}

impl RuneReader for SliceReader<'_> {
    /// Invalid UTF-8 decodes as `U+FFFD` with a size of one byte.
    fn read_rune(&mut self) -> Result<(char, usize), Error> {
        self.last = LastRead::Other;
        let rest = self.unread();
        if rest.is_empty() {
            return Err(Error::Eof);
        }

        let (c, size) = decode_rune(rest);
        self.pos += size as u64;
        self.last = LastRead::Rune(size);
        Ok((c, size))
    }
}

impl RuneScanner for SliceReader<'_> {
    fn unread_rune(&mut self) -> Result<(), Error> {
        let LastRead::Rune(size) = self.last else {
            return Err(Error::InvalidUnread);
        };
        self.last = LastRead::Other;
        self.pos -= size as u64;
        Ok(())
    }
}

/// Decode the first character of `bytes`, which must not be empty.
fn decode_rune(bytes: &[u8]) -> (char, usize) {
    let width = match bytes[0] {
        0x00..=0x7F => return (bytes[0] as char, 1),
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => return (char::REPLACEMENT_CHARACTER, 1),
    };

    bytes
        .get(..width)
        .and_then(|encoded| str::from_utf8(encoded).ok())
        .and_then(|s| s.chars().next())
        .map_or((char::REPLACEMENT_CHARACTER, 1), |c| (c, width))
}
