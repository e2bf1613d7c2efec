use super::{Read, Write};
use crate::error::{split, Error, IoResult, Partial};

/// Reader that writes everything it reads into a side writer.
///
/// There is no buffering: bytes are written before `read` returns them. A
/// failing side write is reported as the read's error, with the count that was
/// read.
#[derive(Debug)]
pub struct TeeReader<R, W>
where
    R: Read,
    W: Write,
{
    reader: R,
    writer: W,
}

impl<R, W> TeeReader<R, W>
where
    R: Read,
    W: Write,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

impl<R, W> Read for TeeReader<R, W>
where
    R: Read,
    W: Write,
{
    fn read(&mut self, buffer: &mut [u8]) -> IoResult {
        let result = self.reader.read(buffer);
        let n = match &result {
            Ok(n) => *n,
            Err(p) => p.done,
        };

        if n > 0 {
            match split(self.writer.write(&buffer[..n])) {
                (_, Some(e)) => return Err(Partial::new(n, e)),
                (written, None) if written != n => {
                    return Err(Partial::new(n, Error::ShortWrite))
                }
                _ => {}
            }
        }
        result
    }
}
