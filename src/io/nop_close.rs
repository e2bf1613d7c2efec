use super::{Close, Read, WriterTo};
use crate::error::{Error, IoResult};

/// Gives any reader a `close` that does nothing and always succeeds.
///
/// The inner reader's fast path stays visible, so a copy out of the wrapper
/// still lets the inner reader write itself out.
#[derive(Debug)]
pub struct NopCloser<R>(R)
where
    R: Read;

impl<R> NopCloser<R>
where
    R: Read,
{
    pub fn new(inner: R) -> Self {
        Self(inner)
    }

    pub fn into_inner(self) -> R {
        self.0
    }
}

impl<R> Read for NopCloser<R>
where
    R: Read,
{
    #[inline]
    fn read(&mut self, buffer: &mut [u8]) -> IoResult {
        self.0.read(buffer)
    }

    #[inline]
    fn as_writer_to(&mut self) -> Option<&mut dyn WriterTo> {
        self.0.as_writer_to()
    }

    #[inline]
    fn remaining_hint(&self) -> Option<u64> {
        self.0.remaining_hint()
    }
}

impl<R> Close for NopCloser<R>
where
    R: Read,
{
    /// Always `Ok`, however many times it is called.
    #[inline]
    fn close(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::io::{copy, read_all, SliceReader};

    #[test]
    fn close_is_noop() {
        let mut rc = NopCloser::new(&b"abc"[..]);
        assert!(rc.close().is_ok());
        assert!(rc.close().is_ok());
        assert_eq!(read_all(&mut rc).unwrap(), b"abc");
    }

    #[test]
    fn forwards_writer_to() {
        let mut plain = NopCloser::new(&b"abc"[..]);
        assert!(plain.as_writer_to().is_none());

        let mut rc = NopCloser::new(SliceReader::new(b"fast"));
        assert!(rc.as_writer_to().is_some());

        let mut dst: Vec<u8> = Vec::new();
        assert_eq!(copy(&mut dst, &mut rc).unwrap(), 4);
        assert_eq!(dst, b"fast");
    }
}
