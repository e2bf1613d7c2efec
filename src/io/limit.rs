use super::Read;
use crate::error::{Error, IoResult};

/// Reads from the inner reader but stops with [`Error::Eof`] after a fixed
/// number of bytes.
///
/// Once the budget is spent the inner reader is never called again.
#[derive(Debug)]
pub struct LimitedReader<R>
where
    R: Read,
{
    inner: R,
    remaining: u64,
}

impl<R> LimitedReader<R>
where
    R: Read,
{
    pub fn new(inner: R, limit: u64) -> Self {
        Self {
            inner,
            remaining: limit,
        }
    }

    /// Bytes that may still be read.
    #[inline]
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R> Read for LimitedReader<R>
where
    R: Read,
{
    fn read(&mut self, buffer: &mut [u8]) -> IoResult {
        if self.remaining == 0 {
            return Err(Error::Eof.into());
        }

        let max = self.remaining.min(buffer.len() as u64) as usize;
        let result = self.inner.read(&mut buffer[..max]);

        let n = match &result {
            Ok(n) => *n,
            Err(p) => p.done,
        };
        self.remaining = self.remaining.saturating_sub(n as u64);
        result
    }

    #[inline]
    fn remaining_hint(&self) -> Option<u64> {
        Some(self.remaining)
    }
}
