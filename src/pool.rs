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
use std::marker::PhantomData;

use log::warn;
use thiserror::Error;

/// Number of slots added per page.
pub const POOL_DEFAULT_CAPACITY: usize = 16;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
/// Allocation failures reported by [`Pool`].
pub enum PoolError {
    /// A fixed pool has no free slot left.
    #[error("pool exhausted at {capacity} slots")]
    Exhausted {
        /// Slot count of the pool.
        capacity: usize,
    },
}

/// Generation checked reference to a pool slot.
pub struct Handle<T> {
    index: u32,
    generation: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    /// Slot index inside the pool.
    pub fn index(&self) -> usize { self.index as usize }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self { *self }
}
impl<T> Copy for Handle<T> {}
impl<T> PartialEq for Handle<T> {
    fn eq(&self, o: &Self) -> bool { self.index == o.index && self.generation == o.generation }
}
impl<T> Eq for Handle<T> {}
impl<T> std::fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "Handle({}v{})", self.index, self.generation) }
}

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Paged slot allocator with a free index stack.
///
/// Pages are never returned: the capacity only grows until the pool is dropped.
pub struct Pool<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    page_capacity: usize,
    fixed: bool,
    live: usize,
}

impl<T> Default for Pool<T> {
    fn default() -> Self { Self::new() }
}

impl<T> Pool<T> {
    /// Creates a growable pool adding [`POOL_DEFAULT_CAPACITY`] slots per page.
    pub fn new() -> Self { Self { slots: Vec::new(), free: Vec::new(), page_capacity: POOL_DEFAULT_CAPACITY, fixed: false, live: 0 } }

    /// Creates a pool with a single page of `capacity` slots.
    pub fn fixed(capacity: usize) -> Self {
        let mut pool = Self { slots: Vec::new(), free: Vec::new(), page_capacity: capacity, fixed: true, live: 0 };
        pool.add_page();
        pool
    }

    /// Total number of slots in all pages.
    pub fn capacity(&self) -> usize { self.slots.len() }

    /// Number of live values.
    pub fn len(&self) -> usize { self.live }

    /// Returns `true` if no value is live.
    pub fn is_empty(&self) -> bool { self.live == 0 }

    fn add_page(&mut self) {
        let start = self.slots.len();
        self.slots.reserve(self.page_capacity);
        for _ in 0..self.page_capacity {
            self.slots.push(Slot { generation: 0, value: None });
        }
        // lowest index on top of the stack
        self.free.extend((start..start + self.page_capacity).rev().map(|i| i as u32));
    }

    /// Stores `value` in a free slot.
    pub fn alloc(&mut self, value: T) -> Result<Handle<T>, PoolError> {
        if self.free.is_empty() {
            if self.fixed || self.page_capacity == 0 {
                warn!("fixed pool exhausted at {} slots", self.slots.len());
                return Err(PoolError::Exhausted { capacity: self.slots.len() });
            }
            self.add_page();
        }
        let index = self.free.pop().ok_or(PoolError::Exhausted { capacity: self.slots.len() })?;
        let slot = &mut self.slots[index as usize];
        slot.value = Some(value);
        self.live += 1;
        Ok(Handle { index, generation: slot.generation, _marker: PhantomData })
    }

    /// Releases the slot and returns its value. Stale handles are ignored.
    pub fn free(&mut self, handle: Handle<T>) -> Option<T> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.live -= 1;
        Some(value)
    }

    /// Shared access to a live value.
    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        self.slots.get(handle.index as usize).filter(|s| s.generation == handle.generation).and_then(|s| s.value.as_ref())
    }

    /// Exclusive access to a live value.
    pub fn get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        self.slots.get_mut(handle.index as usize).filter(|s| s.generation == handle.generation).and_then(|s| s.value.as_mut())
    }

    /// Returns `true` if `handle` refers to a live value.
    pub fn contains(&self, handle: Handle<T>) -> bool { self.get(handle).is_some() }

    /// Iterates over live values with their handles.
    pub fn iter(&self) -> impl Iterator<Item = (Handle<T>, &T)> {
        self.slots.iter().enumerate().filter_map(|(i, s)| {
            s.value.as_ref().map(|v| (Handle { index: i as u32, generation: s.generation, _marker: PhantomData }, v))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_grow_monotonically() {
        let mut pool = Pool::new();
        let handles: Vec<_> = (0..20).map(|i| pool.alloc(i).unwrap()).collect();
        assert_eq!(pool.capacity(), 2 * POOL_DEFAULT_CAPACITY);
        for h in &handles {
            pool.free(*h);
        }
        assert!(pool.is_empty());
        assert_eq!(pool.capacity(), 2 * POOL_DEFAULT_CAPACITY);
    }

    #[test]
    fn stale_handles_are_rejected() {
        let mut pool = Pool::new();
        let a = pool.alloc("a").unwrap();
        assert_eq!(pool.free(a), Some("a"));
        let b = pool.alloc("b").unwrap();
        assert_eq!(a.index(), b.index());
        assert_eq!(pool.get(a), None);
        assert_eq!(pool.free(a), None);
        assert_eq!(pool.get(b), Some(&"b"));
    }

    #[test]
    fn fixed_pool_is_exhausted() {
        let mut pool = Pool::fixed(2);
        pool.alloc(1).unwrap();
        pool.alloc(2).unwrap();
        assert_eq!(pool.alloc(3), Err(PoolError::Exhausted { capacity: 2 }));
    }
}
