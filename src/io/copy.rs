use alloc::vec;

use super::{LimitedReader, Read, Write};
use crate::{
    error::{split, Error, IoResult, Partial},
    io::read::MAX_CONSECUTIVE_EMPTY_READS,
    trace::trace,
};

/// Size of the working buffer [`copy`] allocates.
pub const DEFAULT_BUF_SIZE: usize = 32 * 1024;

/// Copy from `src` into `dst` until `src` ends or either side fails.
///
/// Returns the bytes written. Reaching the end of `src` is success, so a
/// successful copy never reports [`Error::Eof`]. On failure the bytes written
/// so far come with the fault.
///
/// If `src` can write itself into a sink ([`Read::as_writer_to`]) that is used;
/// otherwise if `dst` can read from a source ([`Write::as_reader_from`]) that is
/// used; otherwise bytes go through a buffer of [`DEFAULT_BUF_SIZE`], shrunk to
/// what `src` can still produce when it knows that number.
///
/// A source that answers 100 reads in a row with neither data nor an error
/// ends the copy with [`Error::NoProgress`].
pub fn copy<W, R>(dst: &mut W, src: &mut R) -> IoResult<u64>
where
    W: Write + ?Sized,
    R: Read + ?Sized,
{
    copy_with(dst, src, None)
}

/// Same as [`copy`], staging through `buffer` instead of allocating one.
///
/// `buffer` goes unused when either side offers a fast path.
///
/// # Panics
///
/// If `buffer` is empty.
pub fn copy_buffer<W, R>(dst: &mut W, src: &mut R, buffer: &mut [u8]) -> IoResult<u64>
where
    W: Write + ?Sized,
    R: Read + ?Sized,
{
    assert!(!buffer.is_empty(), "empty buffer in copy_buffer");
    copy_with(dst, src, Some(buffer))
}

/// Copy exactly `n` bytes from `src` into `dst`.
///
/// `Ok` always holds `n`. If `src` ends earlier the result is
/// [`Error::UnexpectedEof`] with the bytes that did get through.
pub fn copy_n<W, R>(dst: &mut W, src: &mut R, n: u64) -> IoResult<u64>
where
    W: Write + ?Sized,
    R: Read + ?Sized,
{
    let mut limited = LimitedReader::new(src, n);

    match copy(dst, &mut limited) {
        Ok(written) if written == n => Ok(n),
        Ok(written) => Err(Partial::new(written, Error::UnexpectedEof)),
        Err(p) if p.done == n => Ok(n),
        Err(p) => Err(p),
    }
}

fn copy_with<W, R>(dst: &mut W, src: &mut R, buffer: Option<&mut [u8]>) -> IoResult<u64>
where
    W: Write + ?Sized,
    R: Read + ?Sized,
{
    if let Some(writer_to) = src.as_writer_to() {
        trace!("copy: source writes itself");
        let mut dst = dst;
        return writer_to.write_to(&mut dst);
    }

    if let Some(reader_from) = dst.as_reader_from() {
        trace!("copy: sink reads from source");
        let mut src = src;
        return reader_from.read_from(&mut src);
    }

    let mut owned;
    let buffer = match buffer {
        Some(buffer) => buffer,
        None => {
            let size = match src.remaining_hint() {
                Some(remaining) if remaining < DEFAULT_BUF_SIZE as u64 => remaining.max(1) as usize,
                _ => DEFAULT_BUF_SIZE,
            };
            owned = vec![0; size];
            &mut owned[..]
        }
    };

    let mut written: u64 = 0;
    let mut empty_reads = 0;

    loop {
        let (nr, read_error) = split(src.read(buffer));

        if nr > 0 {
            empty_reads = 0;
            let (nw, write_error) = split(dst.write(&buffer[..nr]));

            if nw > nr {
                return Err(Partial::new(written, Error::InvalidWrite));
            }
            written += nw as u64;

            if let Some(e) = write_error {
                return Err(Partial::new(written, e));
            }
            if nw != nr {
                return Err(Partial::new(written, Error::ShortWrite));
            }
        } else if read_error.is_none() {
            empty_reads += 1;
            if empty_reads >= MAX_CONSECUTIVE_EMPTY_READS {
                return Err(Partial::new(written, Error::NoProgress));
            }
        }

        match read_error {
            None => {}
            Some(Error::Eof) => {
                trace!(written, "copy: done");
                return Ok(written);
            }
            Some(e) => return Err(Partial::new(written, e)),
        }
    }
}
