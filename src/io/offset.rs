use super::{seek::resolve, Seek, SeekFrom, Write, WriteAt};
use crate::error::{Error, IoResult};

/// Maps writes at offset `0` to offset `base` of the inner [`WriteAt`].
///
/// `write` goes to a cursor that starts at `base` and moves forward by what
/// was written; `write_at` adds `base` and leaves the cursor alone.
#[derive(Debug)]
pub struct OffsetWriter<W>
where
    W: WriteAt,
{
    inner: W,
    base: u64,
    offset: u64,
}

impl<W> OffsetWriter<W>
where
    W: WriteAt,
{
    pub fn new(inner: W, base: u64) -> Self {
        Self {
            inner,
            base,
            offset: base,
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W> Write for OffsetWriter<W>
where
    W: WriteAt,
{
    /// A write that would carry the cursor past `u64::MAX` fails with
    /// [`Error::InvalidOffset`] before anything reaches the inner writer.
    fn write(&mut self, buffer: &[u8]) -> IoResult {
        let len = buffer.len() as u64;
        self.offset.checked_add(len).ok_or(Error::InvalidOffset)?;

        let result = self.inner.write_at(buffer, self.offset);

        let n = match &result {
            Ok(n) => *n,
            Err(p) => p.done,
        };
        self.offset += (n as u64).min(len);
        result
    }
}

impl<W> WriteAt for OffsetWriter<W>
where
    W: WriteAt,
{
    fn write_at(&mut self, buffer: &[u8], offset: u64) -> IoResult {
        let offset = self.base.checked_add(offset).ok_or(Error::InvalidOffset)?;
        self.inner.write_at(buffer, offset)
    }
}

impl<W> Seek for OffsetWriter<W>
where
    W: WriteAt,
{
    /// Offsets are relative to `base`. A writer has no known end, so
    /// [`SeekFrom::End`] is [`Error::InvalidWhence`].
    fn seek(&mut self, pos: SeekFrom) -> Result<u64, Error> {
        self.offset = resolve(pos, self.base, self.offset, None)?;
        Ok(self.offset - self.base)
    }
}
