use super::{
    pool::BufferPool, read::MAX_CONSECUTIVE_EMPTY_READS, ByteWriter, Read, ReaderFrom, Write,
};
use crate::error::{Error, IoResult, Partial};

/// Pool behind every [`Discard::new`].
static SHARED_POOL: BufferPool = BufferPool::new();

/// Writer on which every write succeeds without doing anything.
///
/// When a copy targets it, it drains the source through a scratch buffer
/// taken from a [`BufferPool`] instead of letting the copy allocate one.
#[derive(Clone, Copy, Debug)]
pub struct Discard<'p> {
    pool: &'p BufferPool,
}

impl Discard<'static> {
    /// A sink drawing from the crate-wide pool.
    pub fn new() -> Self {
        Self {
            pool: &SHARED_POOL,
        }
    }
}

impl<'p> Discard<'p> {
    pub fn with_pool(pool: &'p BufferPool) -> Self {
        Self { pool }
    }
}

impl Default for Discard<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for Discard<'_> {
    #[inline]
    fn write(&mut self, buffer: &[u8]) -> IoResult {
        Ok(buffer.len())
    }

    #[inline]
    fn write_string(&mut self, s: &str) -> IoResult {
        Ok(s.len())
    }

    fn as_reader_from(&mut self) -> Option<&mut dyn ReaderFrom> {
        Some(self)
    }
}

impl ByteWriter for Discard<'_> {
    #[inline]
    fn write_byte(&mut self, _: u8) -> Result<(), Error> {
        Ok(())
    }
}

impl ReaderFrom for Discard<'_> {
    fn read_from(&mut self, src: &mut dyn Read) -> IoResult<u64> {
        let mut buffer = self.pool.acquire();
        let mut total: u64 = 0;
        let mut empty_reads = 0;

        loop {
            match src.read(&mut buffer) {
                Ok(0) => {
                    empty_reads += 1;
                    if empty_reads >= MAX_CONSECUTIVE_EMPTY_READS {
                        return Err(Partial::new(total, Error::NoProgress));
                    }
                }
                Ok(n) => {
                    empty_reads = 0;
                    total += n as u64;
                }
                Err(Partial { done, error }) => {
                    total += done as u64;
                    return match error {
                        Error::Eof => Ok(total),
                        error => Err(Partial::new(total, error)),
                    };
                }
            }
        }
    }
}
