use crate::constants::aligned_size;
use crate::error::FrameError;
use bytemuck::Pod;
use std::marker::PhantomData;
use std::mem::size_of;
use std::ops::Range;

/// CPU staging copy of one constant buffer, laid out exactly as the GPU
/// buffer it feeds.
///
/// Records sit at a fixed stride, padded up to the device's uniform offset
/// alignment, so element `i` is bound at offset `i * stride`. Writes widen a
/// dirty byte range that the backend drains when it uploads.
#[derive(Debug, Clone)]
pub struct UploadBuffer<T: Pod> {
    label: &'static str,
    bytes: Vec<u8>,
    stride: usize,
    capacity: usize,
    dirty: Option<Range<usize>>,
    writes: u64,
    _record: PhantomData<T>,
}

impl<T: Pod> UploadBuffer<T> {
    pub fn new(label: &'static str, capacity: usize, alignment: usize) -> Self {
        let stride = aligned_size(size_of::<T>(), alignment);
        Self {
            label,
            bytes: vec![0; stride * capacity],
            stride,
            capacity,
            dirty: None,
            writes: 0,
            _record: PhantomData,
        }
    }

    /// Overwrite element `index`.
    pub fn copy_data(&mut self, index: usize, value: &T) -> Result<(), FrameError> {
        if index >= self.capacity {
            return Err(FrameError::SlotOutOfRange {
                buffer: self.label,
                index,
                capacity: self.capacity,
            });
        }
        let start = index * self.stride;
        let end = start + size_of::<T>();
        self.bytes[start..end].copy_from_slice(bytemuck::bytes_of(value));
        self.dirty = Some(match self.dirty.take() {
            Some(range) => range.start.min(start)..range.end.max(end),
            None => start..end,
        });
        self.writes += 1;
        Ok(())
    }

    pub fn read(&self, index: usize) -> Option<T> {
        if index >= self.capacity {
            return None;
        }
        let start = index * self.stride;
        Some(bytemuck::pod_read_unaligned(
            &self.bytes[start..start + size_of::<T>()],
        ))
    }

    /// Take the byte range written since the last call.
    pub fn take_dirty_range(&mut self) -> Option<Range<usize>> {
        self.dirty.take()
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn byte_size(&self) -> usize {
        self.bytes.len()
    }

    /// Dynamic binding offset of element `index`.
    pub fn offset_of(&self, index: usize) -> u32 {
        (index * self.stride) as u32
    }

    /// Total `copy_data` calls over the buffer's lifetime.
    pub fn writes(&self) -> u64 {
        self.writes
    }
}
