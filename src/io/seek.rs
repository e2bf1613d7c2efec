use alloc::boxed::Box;

use crate::error::Error;

/// Origin of a [`Seek`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeekFrom {
    Start(u64),
    Current(i64),
    End(i64),
}

/// Streams with a movable cursor.
///
/// `seek` returns the new offset relative to the start of the stream. Moving
/// before the start is [`Error::InvalidOffset`]; moving past a known end is
/// allowed and what later I/O does there is up to the stream.
pub trait Seek {
    fn seek(&mut self, pos: SeekFrom) -> Result<u64, Error>;

    /// Current offset, without moving.
    fn stream_position(&mut self) -> Result<u64, Error> {
        self.seek(SeekFrom::Current(0))
    }
}

/// Streams holding something that must be released.
///
/// What a second `close` does is documented by each implementation.
pub trait Close {
    fn close(&mut self) -> Result<(), Error>;
}

impl<S: Seek + ?Sized> Seek for &mut S {
    #[inline]
    fn seek(&mut self, pos: SeekFrom) -> Result<u64, Error> {
        (**self).seek(pos)
    }
}

impl<S: Seek + ?Sized> Seek for Box<S> {
    #[inline]
    fn seek(&mut self, pos: SeekFrom) -> Result<u64, Error> {
        (**self).seek(pos)
    }
}

impl<C: Close + ?Sized> Close for &mut C {
    #[inline]
    fn close(&mut self) -> Result<(), Error> {
        (**self).close()
    }
}

impl<C: Close + ?Sized> Close for Box<C> {
    #[inline]
    fn close(&mut self) -> Result<(), Error> {
        (**self).close()
    }
}

/// Resolve `pos` against a stream living in `[base, end)` whose cursor is at
/// `current`, all in absolute offsets. `end` is `None` when the stream has no
/// known end, in which case `SeekFrom::End` is rejected.
pub(crate) fn resolve(
    pos: SeekFrom,
    base: u64,
    current: u64,
    end: Option<u64>,
) -> Result<u64, Error> {
    let target = match pos {
        SeekFrom::Start(offset) => base.checked_add(offset),
        SeekFrom::Current(delta) => current.checked_add_signed(delta),
        SeekFrom::End(delta) => end.ok_or(Error::InvalidWhence)?.checked_add_signed(delta),
    };

    match target {
        Some(target) if target >= base => Ok(target),
        _ => Err(Error::InvalidOffset),
    }
}
