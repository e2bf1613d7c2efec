use alloc::boxed::Box;
use core::{
    any::Any,
    fmt::{self, Debug, Display},
};

/// A fault raised by a concrete stream, kept as is inside [`Error::Stream`].
///
/// Implemented for every `'static` type that is `Debug + Send + Sync`; use
/// [`Error::downcast_ref`] to get the concrete value back.
pub trait StreamFault: Debug + Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Debug + Any + Send + Sync> StreamFault for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Everything that can go wrong while moving bytes between streams.
///
/// `Eof` is the graceful "no more data" signal and is never wrapped. Faults
/// coming from a concrete stream travel unchanged inside `Stream`.
#[derive(Debug)]
pub enum Error {
    Eof,
    UnexpectedEof,
    ShortBuffer,
    ShortWrite,
    InvalidWrite,
    NoProgress,
    InvalidWhence,
    InvalidOffset,
    InvalidUnread,
    ClosedPipe,
    Stream(Box<dyn StreamFault>),
}

impl Error {
    /// Wrap a fault reported by a concrete stream.
    pub fn stream<E: StreamFault>(e: E) -> Self {
        Self::Stream(Box::new(e))
    }

    /// The stream fault inside, if this is one of type `E`.
    pub fn downcast_ref<E: StreamFault>(&self) -> Option<&E> {
        match self {
            Self::Stream(fault) => (**fault).as_any().downcast_ref(),
            _ => None,
        }
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        matches!(self, Self::Eof)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eof => f.write_str("EOF"),
            Self::UnexpectedEof => f.write_str("unexpected EOF"),
            Self::ShortBuffer => f.write_str("short buffer"),
            Self::ShortWrite => f.write_str("short write"),
            Self::InvalidWrite => f.write_str("invalid write result"),
            Self::NoProgress => f.write_str("multiple read calls return no data or error"),
            Self::InvalidWhence => f.write_str("seek: invalid whence"),
            Self::InvalidOffset => f.write_str("seek: invalid offset"),
            Self::InvalidUnread => f.write_str("unread: previous operation was not a read"),
            Self::ClosedPipe => f.write_str("read/write on closed pipe"),
            Self::Stream(e) => write!(f, "stream fault: {:?}", e),
        }
    }
}

impl core::error::Error for Error {}

/// A fault together with the amount of work done before it happened.
///
/// `done` is bytes for single reads and writes, and the running total for whole
/// transfers.
#[derive(Debug)]
pub struct Partial<T = usize> {
    pub done: T,
    pub error: Error,
}

impl<T> Partial<T> {
    pub fn new(done: T, error: Error) -> Self {
        Self { done, error }
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.error.is_eof()
    }

    pub fn into_error(self) -> Error {
        self.error
    }
}

impl<T: Default> From<Error> for Partial<T> {
    fn from(error: Error) -> Self {
        Self::new(T::default(), error)
    }
}

impl<T: Display> Display for Partial<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (after {} bytes)", self.error, self.done)
    }
}

impl<T: Debug + Display> core::error::Error for Partial<T> {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Result of an operation that may move some bytes before failing.
pub type IoResult<T = usize> = Result<T, Partial<T>>;

/// Split an [`IoResult`] into the count moved and the fault, if any.
#[inline]
pub(crate) fn split<T>(result: IoResult<T>) -> (T, Option<Error>) {
    match result {
        Ok(n) => (n, None),
        Err(Partial { done, error }) => (done, Some(error)),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn partial_from_error_starts_at_zero() {
        let p: Partial = Error::ShortBuffer.into();
        assert_eq!(p.done, 0);
        assert!(matches!(p.error, Error::ShortBuffer));
    }

    #[test]
    fn eof_is_matched_by_kind() {
        assert!(Error::Eof.is_eof());
        assert!(!Error::UnexpectedEof.is_eof());
        assert!(!Error::stream("EOF").is_eof());
    }

    #[test]
    fn stream_fault_comes_back_typed() {
        #[derive(Debug, PartialEq)]
        struct Refused(u16);

        let e = Error::stream(Refused(25));
        assert_eq!(e.downcast_ref::<Refused>(), Some(&Refused(25)));
        assert_eq!(e.downcast_ref::<&str>(), None);
        assert_eq!(Error::Eof.downcast_ref::<Refused>(), None);
        assert_eq!(e.to_string(), "stream fault: Refused(25)");
    }

    #[test]
    fn display_mentions_progress() {
        let p = Partial::new(3usize, Error::UnexpectedEof);
        assert_eq!(p.to_string(), "unexpected EOF (after 3 bytes)");
    }
}
