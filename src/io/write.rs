use alloc::boxed::Box;

use super::Read;
use crate::error::{Error, IoResult, Partial};

/// Sink of bytes.
///
/// `write` never modifies `buffer`. It reports exactly how many bytes it took;
/// taking fewer than `buffer.len()` must come with an error.
pub trait Write {
    fn write(&mut self, buffer: &[u8]) -> IoResult;

    /// Write the contents of a string. Sinks that can take text without
    /// going through bytes override this; the default writes once.
    fn write_string(&mut self, s: &str) -> IoResult {
        self.write(s.as_bytes())
    }

    /// Keep writing until the whole buffer went through. A write that takes
    /// nothing without reporting why is a [`Error::ShortWrite`].
    fn write_all(&mut self, mut buffer: &[u8]) -> IoResult {
        let total = buffer.len();
        while !buffer.is_empty() {
            match self.write(buffer) {
                Ok(0) => return Err(Partial::new(total - buffer.len(), Error::ShortWrite)),
                Ok(n) if n > buffer.len() => {
                    return Err(Partial::new(total - buffer.len(), Error::InvalidWrite))
                }
                Ok(n) => buffer = &buffer[n..],
                Err(Partial { done, error }) => {
                    return Err(Partial::new(total - buffer.len() + done, error))
                }
            }
        }
        Ok(total)
    }

    /// Expose the "read directly from a source" capability, if this writer has one.
    fn as_reader_from(&mut self) -> Option<&mut dyn ReaderFrom> {
        None
    }
}

/// Positional writes that neither use nor move any cursor.
pub trait WriteAt {
    fn write_at(&mut self, buffer: &[u8], offset: u64) -> IoResult;
}

/// Bulk transfer driven by the sink.
pub trait ReaderFrom {
    /// Read from `src` until the end of the stream, returning the bytes read.
    /// Reaching the end is success.
    fn read_from(&mut self, src: &mut dyn Read) -> IoResult<u64>;
}

pub trait ByteWriter {
    fn write_byte(&mut self, byte: u8) -> Result<(), Error>;
}

impl<W: Write + ?Sized> Write for &mut W {
    #[inline]
    fn write(&mut self, buffer: &[u8]) -> IoResult {
        (**self).write(buffer)
    }

    #[inline]
    fn write_string(&mut self, s: &str) -> IoResult {
        (**self).write_string(s)
    }

    #[inline]
    fn as_reader_from(&mut self) -> Option<&mut dyn ReaderFrom> {
        (**self).as_reader_from()
    }
}

impl<W: Write + ?Sized> Write for Box<W> {
    #[inline]
    fn write(&mut self, buffer: &[u8]) -> IoResult {
        (**self).write(buffer)
    }

    #[inline]
    fn write_string(&mut self, s: &str) -> IoResult {
        (**self).write_string(s)
    }

    #[inline]
    fn as_reader_from(&mut self) -> Option<&mut dyn ReaderFrom> {
        (**self).as_reader_from()
    }
}

impl<W: WriteAt + ?Sized> WriteAt for &mut W {
    #[inline]
    fn write_at(&mut self, buffer: &[u8], offset: u64) -> IoResult {
        (**self).write_at(buffer, offset)
    }
}

impl<W: WriteAt + ?Sized> WriteAt for Box<W> {
    #[inline]
    fn write_at(&mut self, buffer: &[u8], offset: u64) -> IoResult {
        (**self).write_at(buffer, offset)
    }
}

impl<W: ByteWriter + ?Sized> ByteWriter for &mut W {
    #[inline]
    fn write_byte(&mut self, byte: u8) -> Result<(), Error> {
        (**self).write_byte(byte)
    }
}

/// Write `s` into `writer` with a single call to [`Write::write_string`].
#[inline]
pub fn write_string<W>(writer: &mut W, s: &str) -> IoResult
where
    W: Write + ?Sized,
{
    writer.write_string(s)
}
