//! Single-level radix heap
//!
//! A monotone priority queue for Dijkstra's algorithm with integer edge
//! weights bounded by `C`.
//!
//! # Layout
//!
//! `B = ceil(log2(C + 1)) + 2` buckets partition `[fence, n*C + 1)`. Bucket
//! `b` holds keys in `[fences[b], fences[b + 1])`; `fences[0]` is the last
//! extracted minimum. Nominal widths are `1, 1, 2, 4, ...`, and the last
//! bucket reaches the capacity sentinel. Redistribution can collapse a
//! bucket's span to nothing; such buckets are flagged inactive and skipped by
//! the placement scan.
//!
//! Every entry in bucket 0 has key `fences[0]`, so popping bucket 0 is O(1).
//! When bucket 0 is empty, the first non-empty bucket `i` is drained, the
//! fences of buckets `0..=i` are tightened around the new minimum, and the
//! remaining entries fall into strictly lower buckets.
//!
//! # Time Complexity
//!
//! | Operation    | Complexity          |
//! |--------------|---------------------|
//! | `insert`     | O(B)                |
//! | `decrease`   | O(1) + bucket moves |
//! | `delete_min` | O(B) amortized*     |
//!
//! *An entry's bucket index only ever decreases, so each entry is moved at
//! most `B` times. Over `n` queue operations driven by `m` relaxations the
//! total is O(B*n + m).
//!
//! # References
//!
//! - Ahuja, R. K., Mehlhorn, K., Orlin, J. B., & Tarjan, R. E. (1990).
//!   "Faster algorithms for the shortest path problem."
//!   *Journal of the ACM*, 37(2), 213-223.
//!
//! # Example
//!
//! ```rust
//! use monotone_heaps::{MonotoneQueue, QueueParams};
//! use monotone_heaps::radix::RadixHeap;
//!
//! let mut heap = RadixHeap::with_params(QueueParams::new(4, 1000)).unwrap();
//! for (label, key) in [(0, 1), (1, 999), (2, 500), (3, 250)] {
//!     heap.insert(label, key).unwrap();
//! }
//!
//! heap.decrease(1, 400).unwrap();
//!
//! assert_eq!(heap.delete_min(), Ok((0, 1)));
//! assert_eq!(heap.delete_min(), Ok((3, 250)));
//! assert_eq!(heap.delete_min(), Ok((1, 400)));
//! assert_eq!(heap.delete_min(), Ok((2, 500)));
//! ```

use crate::config::QueueParams;
use crate::handles::HandleTable;
use crate::traits::{Key, Label, MonotoneQueue, QueueError};
use intrusive_list::{LinkArena, List};
use smallvec::SmallVec;
use std::fmt::Write;

/// `ceil(log2(x))` for `x >= 1`.
#[inline]
pub(crate) fn ceil_log2(x: u64) -> u32 {
    if x <= 1 {
        0
    } else {
        u64::BITS - (x - 1).leading_zeros()
    }
}

/// Number of buckets for weights up to `max_weight`.
pub fn bucket_count(max_weight: u64) -> usize {
    ceil_log2(max_weight.saturating_add(1)) as usize + 2
}

/// A single-level radix heap (monotone priority queue)
///
/// # Panics
///
/// Never panics on caller errors; contract violations are returned as
/// [`QueueError`]s and leave the heap untouched.
pub struct RadixHeap {
    params: QueueParams,
    /// One list per bucket; the links live in `links`.
    buckets: Vec<List>,
    links: LinkArena,
    /// `B + 1` inclusive lower bounds; `fences[B]` is the sentinel.
    fences: Vec<Key>,
    /// Nominal bucket widths used when tightening.
    widths: Vec<Key>,
    /// Whether a bucket's span is non-empty.
    active: Vec<bool>,
    handles: HandleTable<usize>,
    len: usize,
}

impl RadixHeap {
    /// Number of buckets `B`.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Bucket currently holding `label`.
    pub fn bucket_of(&self, label: Label) -> Option<usize> {
        self.handles.get(label).map(|handle| handle.location)
    }

    /// Inclusive lower bounds of every bucket, followed by the sentinel.
    pub fn fences(&self) -> &[Key] {
        &self.fences
    }

    /// Whether bucket `b` currently spans at least one key.
    pub fn is_active(&self, bucket: usize) -> bool {
        self.active.get(bucket).copied().unwrap_or(false)
    }

    /// Highest active bucket at or below `start` whose lower fence is `<= key`.
    fn locate(&self, key: Key, start: usize) -> Result<usize, QueueError> {
        (0..=start)
            .rev()
            .find(|&b| self.active[b] && self.fences[b] <= key)
            .ok_or(QueueError::Corrupted("no bucket accepts the key"))
    }

    fn place(&mut self, label: Label, key: Key, bucket: usize) -> Result<(), QueueError> {
        self.buckets[bucket].append(&mut self.links, label)?;
        self.handles.set(label, key, bucket);
        Ok(())
    }

    /// Re-anchors buckets `0..=top` at `min`, keeping `fences[top + 1]`.
    fn tighten(&mut self, min: Key, top: usize) {
        let ceiling = self.fences[top + 1];
        self.fences[0] = min;
        for j in 1..=top {
            self.fences[j] = self.fences[j - 1]
                .saturating_add(self.widths[j - 1])
                .min(ceiling);
        }
        for j in 0..=top {
            self.active[j] = self.fences[j] < self.fences[j + 1];
        }
    }

    fn trace(&self, operation: &'static str) {
        if self.params.trace_dumps && tracing::enabled!(tracing::Level::TRACE) {
            tracing::trace!(operation = operation, "{}", self.dump());
        }
    }
}

impl MonotoneQueue for RadixHeap {
    fn with_params(params: QueueParams) -> Result<Self, QueueError> {
        let count = bucket_count(params.max_weight);
        let sentinel = params.sentinel();

        let mut widths = Vec::with_capacity(count);
        widths.push(1);
        for j in 1..count {
            widths.push(if j + 1 == count {
                sentinel
            } else {
                1u64.checked_shl(j as u32 - 1).unwrap_or(u64::MAX)
            });
        }

        let mut fences: Vec<Key> = Vec::with_capacity(count + 1);
        fences.push(0);
        for j in 1..count {
            fences.push(fences[j - 1].saturating_add(widths[j - 1]).min(sentinel));
        }
        fences.push(sentinel);

        let active = (0..count).map(|b| fences[b] < fences[b + 1]).collect();
        let mut links = LinkArena::with_capacity(params.vertex_count);
        let buckets = (0..count).map(|_| links.new_list()).collect();

        Ok(RadixHeap {
            params,
            buckets,
            links,
            fences,
            widths,
            active,
            handles: HandleTable::new(params.vertex_count),
            len: 0,
        })
    }

    fn params(&self) -> &QueueParams {
        &self.params
    }

    fn insert(&mut self, label: Label, key: Key) -> Result<(), QueueError> {
        self.handles.ensure_vacant(label)?;
        let key = self.params.admit(key, self.fences[0])?;
        let bucket = self.locate(key, self.buckets.len() - 1)?;

        self.place(label, key, bucket)?;
        self.len += 1;
        self.trace("insert");
        Ok(())
    }

    fn decrease(&mut self, label: Label, key: Key) -> Result<(), QueueError> {
        let handle = self.handles.lookup(label)?;
        let key = self.params.admit(key, self.fences[0])?;
        if key >= handle.key {
            return Err(QueueError::NotDecreased {
                label,
                current: handle.key,
                requested: key,
            });
        }

        // A smaller key never needs a coarser bucket.
        let bucket = self.locate(key, handle.location)?;
        if bucket == handle.location {
            self.handles.set(label, key, bucket);
        } else {
            self.buckets[handle.location].remove(&mut self.links, label)?;
            self.place(label, key, bucket)?;
        }
        self.trace("decrease");
        Ok(())
    }

    fn delete_min(&mut self) -> Result<(Label, Key), QueueError> {
        if self.len == 0 {
            return Err(QueueError::Empty);
        }

        // Bucket 0 spans exactly one key, the current fence.
        if let Some(label) = self.buckets[0].pop_front(&mut self.links) {
            let key = self.handles.key(label)?;
            self.handles.clear(label);
            self.len -= 1;
            self.trace("delete_min");
            return Ok((label, key));
        }

        let source = (1..self.buckets.len())
            .find(|&b| !self.buckets[b].is_empty())
            .ok_or(QueueError::Corrupted("non-empty heap has no populated bucket"))?;

        let mut drained: SmallVec<[(Label, Key); 8]> = SmallVec::new();
        let mut min_index = 0;
        while let Some(label) = self.buckets[source].pop_front(&mut self.links) {
            let key = self.handles.key(label)?;
            if key < drained.get(min_index).map_or(Key::MAX, |&(_, k)| k) {
                min_index = drained.len();
            }
            drained.push((label, key));
        }

        let (min_label, min_key) = drained[min_index];
        self.tighten(min_key, source);

        for (index, &(label, key)) in drained.iter().enumerate() {
            if index != min_index {
                let bucket = self.locate(key, source)?;
                self.place(label, key, bucket)?;
            }
        }

        self.handles.clear(min_label);
        self.len -= 1;
        self.trace("delete_min");
        Ok((min_label, min_key))
    }

    fn len(&self) -> usize {
        self.len
    }

    fn key_of(&self, label: Label) -> Option<Key> {
        self.handles.get(label).map(|handle| handle.key)
    }

    fn lower_fence(&self) -> Key {
        self.fences[0]
    }

    fn dump(&self) -> String {
        let mut out = String::new();
        for (b, bucket) in self.buckets.iter().enumerate() {
            let _ = write!(
                out,
                "bucket {b} [{}, {}){}:",
                self.fences[b],
                self.fences[b + 1],
                if self.active[b] { "" } else { " inactive" }
            );
            for label in bucket.iter(&self.links) {
                let key = self.key_of(label).unwrap_or(Key::MAX);
                let _ = write!(out, " ({label}, {key})");
            }
            out.push('\n');
        }
        out
    }
}
