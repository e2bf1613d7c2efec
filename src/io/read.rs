use alloc::{boxed::Box, sync::Arc, vec, vec::Vec};

use super::Write;
use crate::error::{split, Error, IoResult, Partial};

/// Number of `Ok(0)` reads in a row after which a loop stops with
/// [`Error::NoProgress`] instead of spinning forever.
pub(crate) const MAX_CONSECUTIVE_EMPTY_READS: usize = 100;

/// Initial capacity of the buffer grown by [`read_all`].
const READ_ALL_INITIAL_SIZE: usize = 512;

/// Source of bytes.
///
/// `read` fills at most `buffer.len()` bytes and returns what is available now,
/// which may be less than what was asked for. The end of the stream is
/// [`Error::Eof`]; bytes read together with the end may either be returned as
/// `Err(Partial { done, error: Eof })` or as `Ok(done)` with `Eof` following on
/// the next call. `Ok(0)` for a non-empty buffer is not the end of the stream.
pub trait Read {
    fn read(&mut self, buffer: &mut [u8]) -> IoResult;

    /// Expose the "write myself into a sink" capability, if this reader has one.
    fn as_writer_to(&mut self) -> Option<&mut dyn WriterTo> {
        None
    }

    /// Upper bound on the bytes this reader can still produce, when known.
    fn remaining_hint(&self) -> Option<u64> {
        None
    }
}

/// Positional reads that neither use nor move any cursor.
///
/// A short read always carries an error. Implementations must tolerate
/// concurrent calls.
pub trait ReadAt {
    fn read_at(&self, buffer: &mut [u8], offset: u64) -> IoResult;
}

/// Bulk transfer driven by the source.
pub trait WriterTo {
    /// Write everything until the end of the stream into `dst`, returning the
    /// bytes written. Reaching the end is success.
    fn write_to(&mut self, dst: &mut dyn Write) -> IoResult<u64>;
}

pub trait ByteReader {
    fn read_byte(&mut self) -> Result<u8, Error>;
}

/// A [`ByteReader`] that can step back one byte.
///
/// `unread_byte` is only valid directly after a successful `read_byte`; any
/// other call, including a second `unread_byte`, fails with
/// [`Error::InvalidUnread`].
pub trait ByteScanner: ByteReader {
    fn unread_byte(&mut self) -> Result<(), Error>;
}

pub trait RuneReader {
    /// Read one UTF-8 encoded character and return it with its encoded size.
    fn read_rune(&mut self) -> Result<(char, usize), Error>;
}

/// A [`RuneReader`] that can step back one character, under the same rule as
/// [`ByteScanner::unread_byte`].
pub trait RuneScanner: RuneReader {
    fn unread_rune(&mut self) -> Result<(), Error>;
}

impl<R: Read + ?Sized> Read for &mut R {
    #[inline]
    fn read(&mut self, buffer: &mut [u8]) -> IoResult {
        (**self).read(buffer)
    }

    #[inline]
    fn as_writer_to(&mut self) -> Option<&mut dyn WriterTo> {
        (**self).as_writer_to()
    }

    #[inline]
    fn remaining_hint(&self) -> Option<u64> {
        (**self).remaining_hint()
    }
}

impl<R: Read + ?Sized> Read for Box<R> {
    #[inline]
    fn read(&mut self, buffer: &mut [u8]) -> IoResult {
        (**self).read(buffer)
    }

    #[inline]
    fn as_writer_to(&mut self) -> Option<&mut dyn WriterTo> {
        (**self).as_writer_to()
    }

    #[inline]
    fn remaining_hint(&self) -> Option<u64> {
        (**self).remaining_hint()
    }
}

impl<R: ReadAt + ?Sized> ReadAt for &R {
    #[inline]
    fn read_at(&self, buffer: &mut [u8], offset: u64) -> IoResult {
        (**self).read_at(buffer, offset)
    }
}

impl<R: ReadAt + ?Sized> ReadAt for Box<R> {
    #[inline]
    fn read_at(&self, buffer: &mut [u8], offset: u64) -> IoResult {
        (**self).read_at(buffer, offset)
    }
}

impl<R: ReadAt + ?Sized> ReadAt for Arc<R> {
    #[inline]
    fn read_at(&self, buffer: &mut [u8], offset: u64) -> IoResult {
        (**self).read_at(buffer, offset)
    }
}

impl<R: ByteReader + ?Sized> ByteReader for &mut R {
    #[inline]
    fn read_byte(&mut self) -> Result<u8, Error> {
        (**self).read_byte()
    }
}

impl<R: ByteScanner + ?Sized> ByteScanner for &mut R {
    #[inline]
    fn unread_byte(&mut self) -> Result<(), Error> {
        (**self).unread_byte()
    }
}

impl<R: RuneReader + ?Sized> RuneReader for &mut R {
    #[inline]
    fn read_rune(&mut self) -> Result<(char, usize), Error> {
        (**self).read_rune()
    }
}

impl<R: RuneScanner + ?Sized> RuneScanner for &mut R {
    #[inline]
    fn unread_rune(&mut self) -> Result<(), Error> {
        (**self).unread_rune()
    }
}

/// Read from `reader` into `buffer` until at least `min` bytes are in.
///
/// On return, `Ok` holds `done >= min`; every error means fewer bytes were
/// read. An error hit after `min` bytes is dropped. The error is `Eof` only
/// when nothing was read; the end of the stream after some but fewer than
/// `min` bytes is `UnexpectedEof`. If `min` exceeds the buffer, the reader is
/// not touched and the result is `ShortBuffer`.
pub fn read_at_least<R>(reader: &mut R, buffer: &mut [u8], min: usize) -> IoResult
where
    R: Read + ?Sized,
{
    if buffer.len() < min {
        return Err(Error::ShortBuffer.into());
    }

    let mut done = 0;
    let mut error = None;
    let mut empty_reads = 0;

    while done < min && error.is_none() {
        let (n, e) = split(reader.read(&mut buffer[done..]));
        done += n;
        error = e;

        if n == 0 && error.is_none() {
            empty_reads += 1;
            if empty_reads >= MAX_CONSECUTIVE_EMPTY_READS {
                error = Some(Error::NoProgress);
            }
        } else {
            empty_reads = 0;
        }
    }

    if done >= min {
        return Ok(done);
    }

    let error = match error {
        Some(Error::Eof) if done > 0 => Error::UnexpectedEof,
        Some(e) => e,
        None => Error::NoProgress,
    };
    Err(Partial::new(done, error))
}

/// Read exactly `buffer.len()` bytes. See [`read_at_least`].
#[inline]
pub fn read_full<R>(reader: &mut R, buffer: &mut [u8]) -> IoResult
where
    R: Read + ?Sized,
{
    let min = buffer.len();
    read_at_least(reader, buffer, min)
}

/// Read until the end of the stream and return everything read.
///
/// The end of the stream is success. Any other fault is returned together with
/// the bytes collected before it, including [`Error::NoProgress`] when the
/// reader answers 100 reads in a row with neither data nor an error.
pub fn read_all<R>(reader: &mut R) -> IoResult<Vec<u8>>
where
    R: Read + ?Sized,
{
    let mut data = vec![0; READ_ALL_INITIAL_SIZE];
    let mut filled = 0;
    let mut empty_reads = 0;

    loop {
        if filled == data.len() {
            // double the capacity, only the newly added tail gets zeroed
            data.resize(data.len() * 2, 0);
        }

        let (n, error) = split(reader.read(&mut data[filled..]));
        filled += n;

        match error {
            Some(Error::Eof) => {
                data.truncate(filled);
                return Ok(data);
            }
            Some(e) => {
                data.truncate(filled);
                return Err(Partial::new(data, e));
            }
            None if n == 0 => {
                empty_reads += 1;
                if empty_reads >= MAX_CONSECUTIVE_EMPTY_READS {
                    data.truncate(filled);
                    return Err(Partial::new(data, Error::NoProgress));
                }
            }
            None => empty_reads = 0,
        }
    }
}

#[cfg(test)]
mod test {
    use std::collections::VecDeque;

    use super::*;

    /// Hands out its chunks in order, then ends with `end`.
    struct Chunked<'a> {
        chunks: VecDeque<&'a [u8]>,
        end: fn() -> Error,
    }

    impl<'a> Chunked<'a> {
        fn new(chunks: &[&'a [u8]], end: fn() -> Error) -> Self {
            Self {
                chunks: chunks.iter().copied().collect(),
                end,
            }
        }
    }

    impl Read for Chunked<'_> {
        fn read(&mut self, buffer: &mut [u8]) -> IoResult {
            let Some(chunk) = self.chunks.front_mut() else {
                return Err((self.end)().into());
            };

            let n = chunk.len().min(buffer.len());
            buffer[..n].copy_from_slice(&chunk[..n]);
            *chunk = &chunk[n..];
            if chunk.is_empty() {
                self.chunks.pop_front();
            }
            Ok(n)
        }
    }

    struct Stalled;

    impl Read for Stalled {
        fn read(&mut self, _: &mut [u8]) -> IoResult {
            Ok(0)
        }
    }

    #[test]
    fn read_at_least_short_stream() {
        let mut reader = Chunked::new(&[b"abc"], || Error::Eof);
        let mut buf = [0; 10];

        let err = read_at_least(&mut reader, &mut buf, 5).unwrap_err();
        assert_eq!(err.done, 3);
        assert!(matches!(err.error, Error::UnexpectedEof));
        assert_eq!(&buf[..3], b"abc");
    }

    #[test]
    fn read_at_least_empty_stream_is_eof() {
        let mut reader = Chunked::new(&[], || Error::Eof);
        let mut buf = [0; 4];

        let err = read_at_least(&mut reader, &mut buf, 1).unwrap_err();
        assert_eq!(err.done, 0);
        assert!(err.is_eof());
    }

    #[test]
    fn read_at_least_short_buffer_leaves_reader_alone() {
        let mut reader = Chunked::new(&[b"abc"], || Error::Eof);
        let mut buf = [0; 2];

        let err = read_at_least(&mut reader, &mut buf, 3).unwrap_err();
        assert!(matches!(err.error, Error::ShortBuffer));
        assert_eq!(reader.chunks.len(), 1, "reader must not be touched");
    }

    #[test]
    fn read_at_least_drops_error_after_min() {
        let mut reader = Chunked::new(&[b"ab", b"cd"], || Error::stream("boom"));
        let mut buf = [0; 8];

        assert_eq!(read_at_least(&mut reader, &mut buf, 3).unwrap(), 4);
    }

    #[test]
    fn read_full_matches_len_iff_ok() {
        for len in 0..6 {
            let mut reader = Chunked::new(&[b"a", b"bc", b"d"], || Error::Eof);
            let mut buf = [0; 5];
            let res = read_full(&mut reader, &mut buf[..len]);
            match res {
                Ok(n) => assert_eq!(n, len),
                Err(p) => assert!(p.done < len, "len {} gave {:?}", len, p),
            }
        }
    }

    #[test]
    fn read_full_keeps_other_faults() {
        let mut reader = Chunked::new(&[b"a"], || Error::ClosedPipe);
        let mut buf = [0; 3];

        let err = read_full(&mut reader, &mut buf).unwrap_err();
        assert_eq!(err.done, 1);
        assert!(matches!(err.error, Error::ClosedPipe));
    }

    #[test]
    fn read_at_least_gives_up_on_stalled_reader() {
        let mut buf = [0; 3];
        let err = read_full(&mut Stalled, &mut buf).unwrap_err();
        assert!(matches!(err.error, Error::NoProgress));
    }

    #[test]
    fn read_all_gives_up_on_stalled_reader() {
        let err = read_all(&mut Stalled).unwrap_err();
        assert!(matches!(err.error, Error::NoProgress));
        assert!(err.done.is_empty());
    }

    #[test]
    fn read_all_swallows_eof() {
        let mut reader = Chunked::new(&[b"a", b"b", b"c"], || Error::Eof);
        assert_eq!(read_all(&mut reader).unwrap(), b"abc");
    }

    #[test]
    fn read_all_grows_past_initial_size() {
        let big = [7u8; 1500];
        let chunks: [&[u8]; 3] = [&big, &big, &big[..3]];
        let mut reader = Chunked::new(&chunks, || Error::Eof);

        let data = read_all(&mut reader).unwrap();
        assert_eq!(data.len(), 3003);
        assert!(data.iter().all(|&b| b == 7));
    }

    #[test]
    fn read_all_returns_data_with_fault() {
        let mut reader = Chunked::new(&[b"xy"], || Error::stream(42));

        let err = read_all(&mut reader).unwrap_err();
        assert_eq!(err.done, b"xy");
        assert!(matches!(err.error, Error::Stream(_)));
    }
}
