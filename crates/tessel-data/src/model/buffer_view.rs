// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use super::gpu_objects::Buffer;
use crate::storage::{Arena, Handle};
use tessel_core::renderer::ResourceError;

/// A homogeneous run of elements inside a buffer, sharing a stride and an instance divisor.
///
/// A buffer can hold heterogeneous sections addressed by distinct views, and
/// several views may alias the same buffer at different offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferView {
    /// The viewed buffer.
    pub buffer: Handle<Buffer>,
    /// Distance in bytes between two consecutive elements.
    pub stride: u32,
    /// 0 for per-vertex data, N to advance once every N instances.
    pub instance_divisor: u32,
    /// Offset of the view from the start of the buffer, in bytes.
    pub offset: u64,
    /// Number of bytes the view has access to, starting from `offset`.
    pub size: u64,
}

impl BufferView {
    /// Creates a view, checking that `[offset, offset + size)` lies inside the buffer.
    ///
    /// ## Errors
    /// * `ResourceError::InvalidHandle` - If `buffer` is not in `buffers`.
    /// * `ResourceError::OutOfBounds` - If the range exceeds the buffer size.
    pub fn new(
        buffers: &Arena<Buffer>,
        buffer: Handle<Buffer>,
        stride: u32,
        instance_divisor: u32,
        offset: u64,
        size: u64,
    ) -> Result<Self, ResourceError> {
        let capacity = buffers
            .get(buffer)
            .ok_or(ResourceError::InvalidHandle)?
            .size;
        let end = offset
            .checked_add(size)
            .ok_or(ResourceError::OutOfBounds {
                offset,
                size,
                capacity,
            })?;
        if end > capacity {
            return Err(ResourceError::OutOfBounds {
                offset,
                size,
                capacity,
            });
        }
        Ok(Self {
            buffer,
            stride,
            instance_divisor,
            offset,
            size,
        })
    }

    /// One past the last byte of the view, relative to the start of the buffer.
    pub fn end(&self) -> u64 {
        self.offset + self.size
    }

    /// The number of whole elements the view holds.
    pub fn element_count(&self) -> u64 {
        if self.stride == 0 {
            0
        } else {
            self.size / self.stride as u64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessel_core::renderer::{BufferId, BufferUsage};

    fn arena_with(size: u64) -> (Arena<Buffer>, Handle<Buffer>) {
        let mut buffers = Arena::new();
        let handle = buffers.push(Buffer {
            id: BufferId(1),
            size,
            usage: BufferUsage::StaticDraw,
        });
        (buffers, handle)
    }

    #[test]
    fn view_inside_buffer_is_accepted() {
        let (buffers, handle) = arena_with(64);
        let view = BufferView::new(&buffers, handle, 16, 0, 32, 32).unwrap();
        assert_eq!(view.end(), 64);
        assert_eq!(view.element_count(), 2);
    }

    #[test]
    fn view_past_the_end_is_rejected() {
        let (buffers, handle) = arena_with(64);
        let err = BufferView::new(&buffers, handle, 16, 0, 40, 32).unwrap_err();
        assert_eq!(
            err,
            ResourceError::OutOfBounds {
                offset: 40,
                size: 32,
                capacity: 64
            }
        );
    }

    #[test]
    fn view_on_unknown_buffer_is_rejected() {
        let (buffers, _) = arena_with(64);
        let err = BufferView::new(&buffers, Handle::from_raw(9), 4, 0, 0, 4).unwrap_err();
        assert_eq!(err, ResourceError::InvalidHandle);
    }
}
