use super::{seek::resolve, Read, ReadAt, Seek, SeekFrom};
use crate::error::{Error, IoResult, Partial};

/// A window `[offset, offset + len)` over a [`ReadAt`], read with its own
/// cursor.
///
/// Every read issued to the inner reader stays inside the window, whatever
/// the buffer size or the cursor position. The inner reader may be shared by
/// many sections since positional reads do not touch any cursor.
#[derive(Debug)]
pub struct SectionReader<R>
where
    R: ReadAt,
{
    inner: R,
    base: u64,
    offset: u64,
    limit: u64,
}

impl<R> SectionReader<R>
where
    R: ReadAt,
{
    /// A section starting at `offset` and ending `len` bytes later. A window
    /// running past `u64::MAX` ends there.
    pub fn new(inner: R, offset: u64, len: u64) -> Self {
        Self {
            inner,
            base: offset,
            offset,
            limit: offset.saturating_add(len),
        }
    }

    /// Size of the section in bytes.
    #[inline]
    pub fn size(&self) -> u64 {
        self.limit - self.base
    }

    /// Where the section sits in the inner reader: `(offset, size)`.
    pub fn outer_offsets(&self) -> (u64, u64) {
        (self.base, self.size())
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R> Read for SectionReader<R>
where
    R: ReadAt,
{
    fn read(&mut self, buffer: &mut [u8]) -> IoResult {
        if self.offset >= self.limit {
            return Err(Error::Eof.into());
        }

        let max = (self.limit - self.offset).min(buffer.len() as u64) as usize;
        let result = self.inner.read_at(&mut buffer[..max], self.offset);

        let n = match &result {
            Ok(n) => *n,
            Err(p) => p.done,
        };
        self.offset += n as u64;
        result
    }

    fn remaining_hint(&self) -> Option<u64> {
        Some(self.limit.saturating_sub(self.offset))
    }
}

impl<R> Seek for SectionReader<R>
where
    R: ReadAt,
{
    /// Offsets are relative to the start of the section. Seeking past the end
    /// is allowed and reads there report [`Error::Eof`].
    fn seek(&mut self, pos: SeekFrom) -> Result<u64, Error> {
        self.offset = resolve(pos, self.base, self.offset, Some(self.limit))?;
        Ok(self.offset - self.base)
    }
}

impl<R> ReadAt for SectionReader<R>
where
    R: ReadAt,
{
    /// `offset` is relative to the start of the section. A read crossing the
    /// end of the section is clipped and always reports [`Error::Eof`] along
    /// with what it got.
    fn read_at(&self, buffer: &mut [u8], offset: u64) -> IoResult {
        if offset >= self.size() {
            return Err(Error::Eof.into());
        }

        let offset = self.base + offset;
        let max = self.limit - offset;
        if buffer.len() as u64 <= max {
            return self.inner.read_at(buffer, offset);
        }

        match self.inner.read_at(&mut buffer[..max as usize], offset) {
            Ok(n) => Err(Partial::new(n, Error::Eof)),
            Err(p) => Err(p),
        }
    }
}

#[cfg(test)]
mod test {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::io::{read_all, read_full};

    /// Positional source of `data` that logs every range it is asked for.
    struct Recorder {
        data: Vec<u8>,
        ranges: Mutex<Vec<(u64, u64)>>,
    }

    impl Recorder {
        fn new(len: usize) -> Self {
            Self {
                data: (0..len).map(|i| i as u8).collect(),
                ranges: Mutex::new(Vec::new()),
            }
        }
    }

    impl ReadAt for Recorder {
        fn read_at(&self, buffer: &mut [u8], offset: u64) -> IoResult {
            self.ranges
                .lock()
                .unwrap()
                .push((offset, offset + buffer.len() as u64));
            self.data.read_at(buffer, offset)
        }
    }

    #[test]
    fn reads_stay_inside_window() {
        let recorder = Recorder::new(100);
        let mut section = SectionReader::new(&recorder, 10, 20);

        assert_eq!(read_all(&mut section).unwrap(), &recorder.data[10..30]);

        section.seek(SeekFrom::Start(15)).unwrap();
        let mut buf = [0; 64];
        let err = section.read_at(&mut buf, 5).unwrap_err();
        assert_eq!(err.done, 15);
        assert!(err.is_eof());
        assert!(section.read(&mut buf).is_ok());

        for &(start, end) in recorder.ranges.lock().unwrap().iter() {
            assert!(start >= 10 && end <= 30, "read outside window: {}..{}", start, end);
        }
    }

    #[test]
    fn read_full_section() {
        let data: &[u8] = b"0123456789";
        let mut section = SectionReader::new(data, 2, 5);
        let mut buf = [0; 5];

        assert_eq!(read_full(&mut section, &mut buf).unwrap(), 5);
        assert_eq!(&buf, b"23456");
        assert!(section.read(&mut buf).unwrap_err().is_eof());
    }

    #[test]
    fn section_past_source_end() {
        let data: &[u8] = b"0123456789";
        let mut section = SectionReader::new(data, 8, 5);

        let err = read_all(&mut section);
        assert_eq!(err.unwrap(), b"89");
    }

    #[test]
    fn seek_is_relative_to_base() {
        let data: &[u8] = b"0123456789";
        let mut section = SectionReader::new(data, 3, 4);

        assert_eq!(section.seek(SeekFrom::End(-1)).unwrap(), 3);
        let mut buf = [0; 4];
        assert_eq!(section.read(&mut buf).unwrap(), 1);
        assert_eq!(buf[0], b'6');

        assert_eq!(section.seek(SeekFrom::Current(-2)).unwrap(), 2);
        assert_eq!(section.stream_position().unwrap(), 2);
    }

    #[test]
    fn seek_before_base_fails_and_keeps_cursor() {
        let data: &[u8] = b"0123456789";
        let mut section = SectionReader::new(data, 3, 4);

        section.seek(SeekFrom::Start(1)).unwrap();
        assert!(matches!(
            section.seek(SeekFrom::Current(-2)),
            Err(Error::InvalidOffset)
        ));
        assert_eq!(section.stream_position().unwrap(), 1);
    }

    #[test]
    fn seek_past_end_then_read_is_eof() {
        let data: &[u8] = b"0123456789";
        let mut section = SectionReader::new(data, 3, 4);

        assert_eq!(section.seek(SeekFrom::Start(100)).unwrap(), 100);
        assert!(section.read(&mut [0; 2]).unwrap_err().is_eof());
    }

    #[test]
    fn read_at_out_of_range() {
        let data: &[u8] = b"0123456789";
        let section = SectionReader::new(data, 3, 4);

        assert!(section.read_at(&mut [0; 2], 4).unwrap_err().is_eof());
        assert!(section.read_at(&mut [0; 2], u64::MAX).unwrap_err().is_eof());

        let mut buf = [0; 2];
        assert_eq!(section.read_at(&mut buf, 1).unwrap(), 2);
        assert_eq!(&buf, b"45");
    }

    #[test]
    fn limit_saturates() {
        let data: &[u8] = b"0123456789";
        let section = SectionReader::new(data, 5, u64::MAX);
        assert_eq!(section.size(), u64::MAX - 5);
        assert_eq!(section.outer_offsets(), (5, u64::MAX - 5));
    }

    #[test]
    fn sections_share_source_across_threads() {
        let source: Arc<Vec<u8>> = Arc::new((0..=255).collect());

        let handles: Vec<_> = (0..4u64)
            .map(|i| {
                let source = Arc::clone(&source);
                std::thread::spawn(move || {
                    let mut section = SectionReader::new(source, i * 64, 64);
                    read_all(&mut section).unwrap()
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let chunk = handle.join().unwrap();
            assert_eq!(chunk, &source[i * 64..(i + 1) * 64]);
        }
    }
}
