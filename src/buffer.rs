//
// Copyright 2022-Present (c) Raja Lehtihet & Wael El Oraiby
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice,
// this list of conditions and the following disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice,
// this list of conditions and the following disclaimer in the documentation
// and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its contributors
// may be used to endorse or promote products derived from this software without
// specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE
// ARE DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE
// LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR
// CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF
// SUBSTITUTE GOODS OR SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS
// INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN
// CONTRACT, STRICT LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE)
// ARISING IN ANY WAY OUT OF THE USE OF THIS SOFTWARE, EVEN IF ADVISED OF THE
// POSSIBILITY OF SUCH DAMAGE.
//
//! Two sided bump arena backing command buffers, text and draw list scratch memory.

use bytemuck::Pod;
use log::warn;
use thiserror::Error;

/// Initial size of a dynamic buffer created with [`Buffer::default`].
pub const BUFFER_DEFAULT_INITIAL_SIZE: usize = 4 * 1024;
const DEFAULT_GROW_FACTOR: f32 = 2.0;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
/// Allocation failures reported by [`Buffer`].
pub enum BufferError {
    /// A fixed buffer (or a failed growth) cannot satisfy the request.
    #[error("buffer full: requested {requested} bytes with {available} available")]
    Full {
        /// Requested size including alignment padding.
        requested: usize,
        /// Free bytes between the two cursors.
        available: usize,
    },
    /// The alignment is zero or not a power of two.
    #[error("alignment must be a non zero power of two")]
    InvalidAlignment,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(usize)]
/// End of the buffer an allocation grows from.
pub enum BufferSide {
    /// Grows upward from offset zero.
    Front = 0,
    /// Grows downward from the end.
    Back = 1,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Memory policy of a [`Buffer`].
pub enum BufferKind {
    /// Never grows; allocations fail when full.
    Fixed,
    /// Reallocates on demand.
    Dynamic,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
/// Usage counters of a [`Buffer`].
pub struct BufferInfo {
    /// Bytes used by the front side.
    pub allocated: usize,
    /// Bytes requested since the last clear, including failed requests.
    pub needed: usize,
    /// Total capacity.
    pub size: usize,
    /// Number of successful allocations.
    pub calls: usize,
}

#[derive(Clone, Debug)]
/// Byte arena with a front cursor growing up and a back cursor growing down.
///
/// Front offsets stay valid across growth. Back data is moved to the new end when the buffer
/// grows, so long lived back references should be kept as a distance from the end
/// (see [`Buffer::distance_from_end`]).
pub struct Buffer {
    memory: Vec<u8>,
    kind: BufferKind,
    grow_factor: f32,
    allocated: usize,
    size: usize,
    needed: usize,
    calls: usize,
    // front marks are offsets, back marks are distances from the end
    marks: [Option<usize>; 2],
}

impl Default for Buffer {
    fn default() -> Self { Self::new(BUFFER_DEFAULT_INITIAL_SIZE) }
}

impl Buffer {
    /// Creates a growable buffer with `capacity` bytes.
    pub fn new(capacity: usize) -> Self { Self::with_kind(capacity, BufferKind::Dynamic) }

    /// Creates a buffer that never grows past `size` bytes.
    pub fn fixed(size: usize) -> Self { Self::with_kind(size, BufferKind::Fixed) }

    fn with_kind(capacity: usize, kind: BufferKind) -> Self {
        Self {
            memory: vec![0; capacity],
            kind,
            grow_factor: DEFAULT_GROW_FACTOR,
            allocated: 0,
            size: capacity,
            needed: 0,
            calls: 0,
            marks: [None, None],
        }
    }

    /// Returns the memory policy.
    pub fn kind(&self) -> BufferKind { self.kind }

    /// Total capacity in bytes.
    pub fn capacity(&self) -> usize { self.memory.len() }

    /// Front cursor.
    pub fn allocated(&self) -> usize { self.allocated }

    /// Back cursor (start of the back region).
    pub fn back(&self) -> usize { self.size }

    /// Bytes requested since the last clear.
    pub fn needed(&self) -> usize { self.needed }

    /// Free bytes between the two cursors.
    pub fn available(&self) -> usize { self.size - self.allocated }

    /// Whole backing store.
    pub fn memory(&self) -> &[u8] { &self.memory }

    /// Mutable backing store.
    pub fn memory_mut(&mut self) -> &mut [u8] { &mut self.memory }

    /// Bytes used by the front side.
    pub fn front_bytes(&self) -> &[u8] { &self.memory[..self.allocated] }

    /// Usage counters.
    pub fn info(&self) -> BufferInfo {
        BufferInfo { allocated: self.allocated, needed: self.needed, size: self.memory.len(), calls: self.calls }
    }

    /// Converts an absolute offset into a distance from the end of the buffer.
    pub fn distance_from_end(&self, offset: usize) -> usize { self.memory.len() - offset }

    /// Converts a distance from the end back into an absolute offset.
    pub fn offset_from_end(&self, distance: usize) -> usize { self.memory.len() - distance }

    /// Allocates `size` bytes aligned to `align` from `side` and returns the absolute offset.
    pub fn alloc(&mut self, side: BufferSide, size: usize, align: usize) -> Result<usize, BufferError> {
        if align == 0 || !align.is_power_of_two() {
            return Err(BufferError::InvalidAlignment);
        }
        self.needed += size;
        if size == 0 {
            return Ok(match side {
                BufferSide::Front => self.allocated,
                BufferSide::Back => self.size,
            });
        }

        let (mut start, mut padding) = self.aligned_start(side, size, align);
        if self.is_full(side, size, padding) {
            if self.kind == BufferKind::Fixed {
                warn!("fixed buffer full: {} bytes requested, {} available", size + padding, self.available());
                return Err(BufferError::Full { requested: size + padding, available: self.available() });
            }
            let grown = ((self.memory.len() as f32) * self.grow_factor) as usize;
            let capacity = grown.max((self.allocated + (self.memory.len() - self.size) + size + align).next_power_of_two());
            self.grow(capacity);
            let (s, p) = self.aligned_start(side, size, align);
            start = s;
            padding = p;
            if self.is_full(side, size, padding) {
                return Err(BufferError::Full { requested: size + padding, available: self.available() });
            }
        }

        match side {
            BufferSide::Front => self.allocated += size + padding,
            BufferSide::Back => self.size -= size + padding,
        }
        self.needed += padding;
        self.calls += 1;
        Ok(start)
    }

    /// Copies `data` into a fresh allocation and returns its offset.
    pub fn push(&mut self, side: BufferSide, data: &[u8], align: usize) -> Result<usize, BufferError> {
        let at = self.alloc(side, data.len(), align)?;
        self.memory[at..at + data.len()].copy_from_slice(data);
        Ok(at)
    }

    /// Reads a plain value stored at `offset`.
    pub fn read<T: Pod>(&self, offset: usize) -> T { bytemuck::pod_read_unaligned(&self.memory[offset..offset + size_of::<T>()]) }

    /// Writes a plain value at `offset`.
    pub fn write<T: Pod>(&mut self, offset: usize, value: &T) {
        let bytes = bytemuck::bytes_of(value);
        self.memory[offset..offset + bytes.len()].copy_from_slice(bytes);
    }

    /// Raw bytes at `offset..offset + len`.
    pub fn bytes(&self, offset: usize, len: usize) -> &[u8] { &self.memory[offset..offset + len] }

    /// Mutable raw bytes at `offset..offset + len`.
    pub fn bytes_mut(&mut self, offset: usize, len: usize) -> &mut [u8] { &mut self.memory[offset..offset + len] }

    /// Records the current cursor of `side`.
    pub fn mark(&mut self, side: BufferSide) {
        self.marks[side as usize] = Some(match side {
            BufferSide::Front => self.allocated,
            BufferSide::Back => self.memory.len() - self.size,
        });
    }

    /// Rewinds `side` to its mark, or empties it when no mark is set. The mark is consumed.
    pub fn reset(&mut self, side: BufferSide) {
        let mark = self.marks[side as usize].take();
        match side {
            BufferSide::Front => {
                let to = mark.unwrap_or(0).min(self.allocated);
                self.needed = self.needed.saturating_sub(self.allocated - to);
                self.allocated = to;
            }
            BufferSide::Back => {
                let used = self.memory.len() - self.size;
                let keep = mark.unwrap_or(0).min(used);
                self.needed = self.needed.saturating_sub(used - keep);
                self.size = self.memory.len() - keep;
            }
        }
    }

    /// Drops the mark of `side` without rewinding.
    pub fn unmark(&mut self, side: BufferSide) { self.marks[side as usize] = None; }

    /// Whether `side` carries a mark.
    pub fn is_marked(&self, side: BufferSide) -> bool { self.marks[side as usize].is_some() }

    /// Empties both sides and drops the marks.
    pub fn clear(&mut self) {
        self.allocated = 0;
        self.size = self.memory.len();
        self.needed = 0;
        self.calls = 0;
        self.marks = [None, None];
    }

    fn aligned_start(&self, side: BufferSide, size: usize, align: usize) -> (usize, usize) {
        match side {
            BufferSide::Front => {
                let start = (self.allocated + align - 1) & !(align - 1);
                (start, start - self.allocated)
            }
            BufferSide::Back => {
                let unaligned = self.size.saturating_sub(size);
                let start = unaligned & !(align - 1);
                (start, unaligned - start)
            }
        }
    }

    fn is_full(&self, side: BufferSide, size: usize, padding: usize) -> bool {
        match side {
            BufferSide::Front => self.allocated + size + padding > self.size,
            BufferSide::Back => self.size < size + padding || self.size - (size + padding) < self.allocated,
        }
    }

    fn grow(&mut self, capacity: usize) {
        let old = self.memory.len();
        let back_len = old - self.size;
        self.memory.resize(capacity, 0);
        let new_back = capacity - back_len;
        self.memory.copy_within(self.size..old, new_back);
        self.size = new_back;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // deterministic size sequence
    fn sizes() -> impl Iterator<Item = (BufferSide, usize, usize)> {
        let mut seed = 0x2545_f491u32;
        (0..64).map(move |i| {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let side = if seed & 1 == 0 { BufferSide::Front } else { BufferSide::Back };
            let size = 1 + (seed as usize >> 3) % 24;
            let align = 1 << (i % 4);
            (side, size, align)
        })
    }

    #[test]
    fn allocations_never_overlap() {
        let mut buf = Buffer::fixed(4096);
        let mut ranges: Vec<(usize, usize)> = Vec::new();
        for (side, size, align) in sizes() {
            let at = buf.alloc(side, size, align).unwrap();
            assert_eq!(at % align, 0);
            assert!(buf.allocated() <= buf.back());
            for &(s, l) in &ranges {
                assert!(at + size <= s || s + l <= at, "overlap {at}+{size} with {s}+{l}");
            }
            ranges.push((at, size));
        }
    }

    #[test]
    fn fixed_buffer_reports_full() {
        let mut buf = Buffer::fixed(16);
        assert_eq!(buf.alloc(BufferSide::Front, 8, 1), Ok(0));
        assert_eq!(buf.alloc(BufferSide::Back, 8, 1), Ok(8));
        assert!(matches!(buf.alloc(BufferSide::Front, 1, 1), Err(BufferError::Full { .. })));
        assert_eq!(buf.alloc(BufferSide::Front, 4, 3), Err(BufferError::InvalidAlignment));
        assert_eq!(buf.capacity(), 16);
    }

    #[test]
    fn unmarked_reset_empties_the_side() {
        let mut buf = Buffer::fixed(64);
        buf.alloc(BufferSide::Front, 8, 1).unwrap();
        buf.mark(BufferSide::Front);
        buf.alloc(BufferSide::Front, 8, 1).unwrap();
        assert!(buf.is_marked(BufferSide::Front));
        buf.unmark(BufferSide::Front);
        assert!(!buf.is_marked(BufferSide::Front));
        buf.reset(BufferSide::Front);
        assert_eq!(buf.allocated(), 0);
    }

    #[test]
    fn growth_keeps_both_sides() {
        let mut buf = Buffer::new(16);
        buf.push(BufferSide::Front, &[1, 2, 3, 4], 4).unwrap();
        let back = buf.push(BufferSide::Back, &[9, 8, 7, 6], 4).unwrap();
        let dist = buf.distance_from_end(back);
        buf.alloc(BufferSide::Front, 40, 4).unwrap();
        assert!(buf.capacity() >= 48);
        assert_eq!(buf.bytes(0, 4), &[1, 2, 3, 4]);
        assert_eq!(buf.bytes(buf.offset_from_end(dist), 4), &[9, 8, 7, 6]);
        assert!(buf.allocated() <= buf.back());
    }

    #[test]
    fn mark_and_reset_round_trip() {
        let mut buf = Buffer::fixed(256);
        buf.alloc(BufferSide::Front, 10, 1).unwrap();
        buf.mark(BufferSide::Front);
        let before = buf.allocated();
        for n in [7, 13, 21] {
            buf.alloc(BufferSide::Front, n, 1).unwrap();
        }
        buf.reset(BufferSide::Front);
        assert_eq!(buf.allocated(), before);
        buf.alloc(BufferSide::Front, 41, 1).unwrap();
        assert_eq!(buf.capacity(), 256);

        buf.alloc(BufferSide::Back, 16, 4).unwrap();
        buf.mark(BufferSide::Back);
        let back = buf.back();
        buf.alloc(BufferSide::Back, 32, 8).unwrap();
        buf.reset(BufferSide::Back);
        assert_eq!(buf.back(), back);

        // unmarked reset empties the side
        buf.reset(BufferSide::Back);
        assert_eq!(buf.back(), 256);
    }

    #[test]
    fn clear_rewinds_everything() {
        let mut buf = Buffer::new(64);
        buf.alloc(BufferSide::Front, 12, 4).unwrap();
        buf.alloc(BufferSide::Back, 12, 4).unwrap();
        assert_eq!(buf.info().calls, 2);
        buf.clear();
        assert_eq!(buf.info(), BufferInfo { allocated: 0, needed: 0, size: 64, calls: 0 });
        assert_eq!(buf.back(), 64);
    }
}
