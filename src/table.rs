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
//! Per window key/value pages holding the little state widgets keep across frames.

use log::warn;

use crate::pool::{Handle, Pool};
use crate::util::Hash;

/// Entries per value page.
pub const VALUE_PAGE_CAPACITY: usize = 32;

/// Fixed size page of hashed keys and values.
pub struct Table {
    pub(crate) seq: u32,
    keys: [Hash; VALUE_PAGE_CAPACITY],
    values: [u32; VALUE_PAGE_CAPACITY],
    size: usize,
}

impl Table {
    fn new(seq: u32) -> Self { Self { seq, keys: [0; VALUE_PAGE_CAPACITY], values: [0; VALUE_PAGE_CAPACITY], size: 0 } }

    fn is_full(&self) -> bool { self.size == VALUE_PAGE_CAPACITY }

    fn slot(&self, key: Hash) -> Option<usize> { self.keys[..self.size].iter().position(|k| *k == key) }
}

/// Ordered list of the pages owned by one window.
#[derive(Default)]
pub(crate) struct ValueTables {
    pages: Vec<Handle<Table>>,
}

impl ValueTables {
    /// Looks `key` up and marks the page holding it as used in frame `seq`.
    pub(crate) fn find(&self, pool: &mut Pool<Table>, key: Hash, seq: u32) -> Option<u32> {
        for h in &self.pages {
            if let Some(page) = pool.get_mut(*h)
                && let Some(i) = page.slot(key)
            {
                page.seq = seq;
                return Some(page.values[i]);
            }
        }
        None
    }

    /// Inserts or overwrites `key`. Returns `false` when no page could be allocated.
    pub(crate) fn insert(&mut self, pool: &mut Pool<Table>, key: Hash, value: u32, seq: u32) -> bool {
        for h in &self.pages {
            if let Some(page) = pool.get_mut(*h)
                && let Some(i) = page.slot(key)
            {
                page.values[i] = value;
                page.seq = seq;
                return true;
            }
        }

        let needs_page = match self.pages.last() {
            Some(h) => pool.get(*h).is_none_or(|p| p.is_full()),
            None => true,
        };
        if needs_page {
            match pool.alloc(Table::new(seq)) {
                Ok(h) => self.pages.push(h),
                Err(err) => {
                    warn!("value table not extended: {err}");
                    return false;
                }
            }
        }
        let Some(page) = self.pages.last().and_then(|h| pool.get_mut(*h)) else {
            return false;
        };
        page.keys[page.size] = key;
        page.values[page.size] = value;
        page.size += 1;
        page.seq = seq;
        true
    }

    /// Frees every page not used in frame `seq`. Returns the number of freed pages.
    pub(crate) fn sweep(&mut self, pool: &mut Pool<Table>, seq: u32) -> usize {
        let before = self.pages.len();
        self.pages.retain(|h| match pool.get(*h) {
            Some(page) if page.seq == seq => true,
            _ => {
                pool.free(*h);
                false
            }
        });
        before - self.pages.len()
    }

    /// Frees every page.
    pub(crate) fn free_all(&mut self, pool: &mut Pool<Table>) {
        for h in self.pages.drain(..) {
            pool.free(h);
        }
    }

    pub(crate) fn page_count(&self) -> usize { self.pages.len() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_span_pages() {
        let mut pool = Pool::new();
        let mut tables = ValueTables::default();
        for k in 0..(VALUE_PAGE_CAPACITY as u32 + 3) {
            assert!(tables.insert(&mut pool, k, k * 10, 1));
        }
        assert_eq!(tables.page_count(), 2);
        assert_eq!(tables.find(&mut pool, 34, 1), Some(340));
        assert!(tables.insert(&mut pool, 34, 7, 1));
        assert_eq!(tables.find(&mut pool, 34, 1), Some(7));
        assert_eq!(tables.find(&mut pool, 99, 1), None);
    }

    #[test]
    fn stale_pages_are_swept() {
        let mut pool = Pool::new();
        let mut tables = ValueTables::default();
        for k in 0..(VALUE_PAGE_CAPACITY as u32 + 1) {
            tables.insert(&mut pool, k, 0, 1);
        }
        // touching a key in the first page keeps only that page alive
        assert_eq!(tables.find(&mut pool, 0, 2), Some(0));
        assert_eq!(tables.sweep(&mut pool, 2), 1);
        assert_eq!(tables.page_count(), 1);
        assert_eq!(pool.len(), 1);
        tables.free_all(&mut pool);
        assert!(pool.is_empty());
    }
}
