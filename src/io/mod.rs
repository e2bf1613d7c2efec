//! Stream capabilities and the adapters and transfer routines built on them.
//!
//! Every capability is its own small trait ([`Read`], [`Write`], [`Seek`],
//! [`Close`], [`ReadAt`], [`WriteAt`], ...). A stream implements whichever it
//! supports, and the composed traits ([`ReadWrite`], [`ReadSeekClose`], ...)
//! come for free.

mod read;
pub use read::*;

mod write;
pub use write::*;

mod seek;
pub use seek::{Close, Seek, SeekFrom};

mod copy;
pub use copy::*;

mod limit;
pub use limit::LimitedReader;

mod section;
pub use section::SectionReader;

mod offset;
pub use offset::OffsetWriter;

mod tee;
pub use tee::TeeReader;

mod pool;
pub use pool::{BufferPool, PooledBuffer, POOL_BUF_SIZE, POOL_SLOTS};

mod discard;
pub use discard::Discard;

mod nop_close;
pub use nop_close::NopCloser;

mod mem;
pub use mem::SliceReader;

mod stream;
pub use stream::TcpStream;

pub trait ReadWrite: Read + Write {}
impl<T: Read + Write + ?Sized> ReadWrite for T {}

pub trait ReadClose: Read + Close {}
impl<T: Read + Close + ?Sized> ReadClose for T {}

pub trait WriteClose: Write + Close {}
impl<T: Write + Close + ?Sized> WriteClose for T {}

pub trait ReadWriteClose: Read + Write + Close {}
impl<T: Read + Write + Close + ?Sized> ReadWriteClose for T {}

pub trait ReadSeek: Read + Seek {}
impl<T: Read + Seek + ?Sized> ReadSeek for T {}

pub trait ReadSeekClose: Read + Seek + Close {}
impl<T: Read + Seek + Close + ?Sized> ReadSeekClose for T {}

pub trait WriteSeek: Write + Seek {}
impl<T: Write + Seek + ?Sized> WriteSeek for T {}

pub trait ReadWriteSeek: Read + Write + Seek {}
impl<T: Read + Write + Seek + ?Sized> ReadWriteSeek for T {}

#[cfg(test)]
mod test {
    use super::*;

    fn drain(stream: &mut dyn ReadSeek) -> Vec<u8> {
        stream.seek(SeekFrom::Start(0)).unwrap();
        read_all(stream).unwrap()
    }

    #[test]
    fn composed_traits_are_object_safe() {
        let mut r = SliceReader::new(b"again");
        assert_eq!(drain(&mut r), b"again");
        assert_eq!(drain(&mut r), b"again");

        let mut section = SectionReader::new(&b"..again.."[..], 2, 5);
        assert_eq!(drain(&mut section), b"again");

        let mut closer: Box<dyn ReadClose> = Box::new(NopCloser::new(&b"x"[..]));
        assert_eq!(read_all(&mut closer).unwrap(), b"x");
        closer.close().unwrap();
    }
}
