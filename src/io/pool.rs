use alloc::{boxed::Box, vec};
use core::ops::{Deref, DerefMut};

use heapless::Vec;
use spin::Mutex;

use crate::trace::debug;

/// Size of the scratch buffers handed out by [`BufferPool::new`].
pub const POOL_BUF_SIZE: usize = 8 * 1024;

/// Idle buffers a pool keeps around. Buffers returned past this are freed.
pub const POOL_SLOTS: usize = 16;

/// Bounded pool of equally sized scratch buffers.
///
/// A buffer checked out with [`BufferPool::acquire`] belongs to the holder of
/// the [`PooledBuffer`] alone and goes back to the pool when that guard is
/// dropped, whichever way the holder exits.
pub struct BufferPool {
    idle: Mutex<Vec<Box<[u8]>, POOL_SLOTS>>,
    buffer_size: usize,
}

impl BufferPool {
    pub const fn new() -> Self {
        Self::with_buffer_size(POOL_BUF_SIZE)
    }

    /// # Panics
    ///
    /// If `buffer_size` is zero.
    pub const fn with_buffer_size(buffer_size: usize) -> Self {
        assert!(buffer_size > 0, "zero sized pool buffer");
        Self {
            idle: Mutex::new(Vec::new()),
            buffer_size,
        }
    }

    #[inline]
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Number of buffers waiting to be reused.
    pub fn idle(&self) -> usize {
        self.idle.lock().len()
    }

    pub fn acquire(&self) -> PooledBuffer<'_> {
        let reused = self.idle.lock().pop();
        let buffer = reused.unwrap_or_else(|| {
            debug!(size = self.buffer_size, "buffer pool: allocating");
            vec![0; self.buffer_size].into_boxed_slice()
        });

        PooledBuffer {
            pool: self,
            buffer: Some(buffer),
        }
    }

    fn release(&self, buffer: Box<[u8]>) {
        if self.idle.lock().push(buffer).is_err() {
            debug!("buffer pool: full, dropping buffer");
        }
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for BufferPool {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BufferPool")
            .field("buffer_size", &self.buffer_size)
            .field("idle", &self.idle())
            .finish()
    }
}

/// A buffer checked out of a [`BufferPool`], returned on drop.
pub struct PooledBuffer<'a> {
    pool: &'a BufferPool,
    buffer: Option<Box<[u8]>>,
}

impl Deref for PooledBuffer<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.buffer.as_deref().unwrap_or_default()
    }
}

impl DerefMut for PooledBuffer<'_> {
    fn deref_mut(&mut self) -> &mut [u8] {
        self.buffer.as_deref_mut().unwrap_or_default()
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        if let Some(buffer) = self.buffer.take() {
            self.pool.release(buffer);
        }
    }
}
