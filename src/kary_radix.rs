//! Two-level (bucket x segment) radix heap
//!
//! Generalizes [`RadixHeap`](crate::radix::RadixHeap) with a branching factor
//! `K >= 2`. There are `B = ceil(log_K(C + 1)) + 1` buckets; bucket `b` has a
//! nominal width of `K^(b+1)` and is split into `K` segments of width `K^b`.
//! The last bucket reaches the capacity sentinel and has a single segment.
//!
//! A `(bucket, segment)` pair is a *class*; class ids `b*K + k` increase with
//! the keys they hold. Segments are anchored at the bucket's upper fence,
//! which redistribution never moves, so tightening the lower buckets leaves
//! the mapping of every still-populated segment intact:
//!
//! ```text
//! segment(b, x) = K - 1 - (fences[b + 1] - 1 - x) / K^b
//! ```
//!
//! Redistribution drains a single segment instead of a whole bucket, which
//! cuts the constant factor of `delete_min` by roughly `K`. The drained
//! segment's contents are reported through [`Redistribution`] so that
//! [`FibRadixHeap`](crate::fib_radix::FibRadixHeap) can mirror every move.
//!
//! # Example
//!
//! ```rust
//! use monotone_heaps::{MonotoneQueue, QueueParams};
//! use monotone_heaps::kary_radix::KaryRadixHeap;
//!
//! let params = QueueParams::new(4, 1000).with_branching(4);
//! let mut heap = KaryRadixHeap::with_params(params).unwrap();
//! for (label, key) in [(0, 1), (1, 999), (2, 500), (3, 250)] {
//!     heap.insert(label, key).unwrap();
//! }
//!
//! let keys: Vec<_> = (0..4).map(|_| heap.delete_min().unwrap().1).collect();
//! assert_eq!(keys, vec![1, 250, 500, 999]);
//! ```

use crate::config::QueueParams;
use crate::handles::HandleTable;
use crate::traits::{Key, Label, MonotoneQueue, QueueError};
use intrusive_list::{LinkArena, List};
use smallvec::SmallVec;
use std::fmt::Write;

/// Index of a `(bucket, segment)` pair: `bucket * K + segment`.
pub type ClassId = usize;

/// Smallest `e` with `base^e >= x`.
pub(crate) fn ceil_log(base: u64, x: u64) -> u32 {
    let mut exponent = 0;
    let mut power = 1u64;
    while power < x {
        power = power.saturating_mul(base);
        exponent += 1;
    }
    exponent
}

/// Number of buckets for branching factor `branching` and weights up to `max_weight`.
pub fn bucket_count(branching: usize, max_weight: u64) -> usize {
    ceil_log(branching as u64, max_weight.saturating_add(1)) as usize + 1
}

/// Where a non-minimum entry landed after [`KaryRadixHeap::redistribute_segment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relocation {
    pub label: Label,
    pub key: Key,
    pub bucket: usize,
    pub segment: usize,
}

/// Result of draining one segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redistribution {
    /// Every drained `(label, key)`, in segment order.
    pub entries: SmallVec<[(Label, Key); 8]>,
    /// Position of the true minimum in `entries`; that entry left the heap.
    pub min_index: usize,
    /// New address of every other drained entry.
    pub relocations: SmallVec<[Relocation; 8]>,
}

impl Redistribution {
    /// The extracted minimum.
    pub fn minimum(&self) -> (Label, Key) {
        self.entries[self.min_index]
    }
}

/// A K-ary two-level radix heap
pub struct KaryRadixHeap {
    params: QueueParams,
    branching: usize,
    /// One list per class.
    segments: Vec<List>,
    links: LinkArena,
    /// Entry count per bucket.
    occupancy: Vec<usize>,
    /// `B + 1` inclusive lower bounds; `fences[B]` is the sentinel.
    fences: Vec<Key>,
    /// Segment width `K^b` per bucket.
    spans: Vec<Key>,
    active: Vec<bool>,
    handles: HandleTable<ClassId>,
    len: usize,
}

impl KaryRadixHeap {
    pub fn branching(&self) -> usize {
        self.branching
    }

    pub fn bucket_count(&self) -> usize {
        self.occupancy.len()
    }

    /// Total number of classes, `B * K`.
    pub fn class_count(&self) -> usize {
        self.segments.len()
    }

    /// Class currently holding `label`.
    pub fn class_of(&self, label: Label) -> Option<ClassId> {
        self.handles.get(label).map(|handle| handle.location)
    }

    /// `(bucket, segment)` of a class id.
    #[inline]
    pub fn address(&self, class: ClassId) -> (usize, usize) {
        (class / self.branching, class % self.branching)
    }

    #[inline]
    pub fn class_index(&self, bucket: usize, segment: usize) -> ClassId {
        bucket * self.branching + segment
    }

    pub fn fences(&self) -> &[Key] {
        &self.fences
    }

    /// Number of entries in one class.
    pub fn class_len(&self, class: ClassId) -> usize {
        self.segments.get(class).map_or(0, List::len)
    }

    #[inline]
    fn last_bucket(&self) -> usize {
        self.occupancy.len() - 1
    }

    /// Nominal width `K^(b+1)` of bucket `b`.
    #[inline]
    fn width(&self, bucket: usize) -> Key {
        self.spans[bucket].saturating_mul(self.branching as Key)
    }

    fn segment_of(&self, bucket: usize, key: Key) -> usize {
        if bucket == self.last_bucket() {
            return 0;
        }
        let below_top = self.fences[bucket + 1].saturating_sub(1).saturating_sub(key);
        let steps = (below_top / self.spans[bucket]).min(self.branching as Key - 1) as usize;
        self.branching - 1 - steps
    }

    /// Exclusive upper bound of segment `(bucket, segment)`.
    fn segment_upper(&self, bucket: usize, segment: usize) -> Key {
        if bucket == self.last_bucket() {
            return self.fences[bucket + 1];
        }
        let steps = (self.branching - 1 - segment) as Key;
        self.fences[bucket + 1].saturating_sub(steps.saturating_mul(self.spans[bucket]))
    }

    fn locate(&self, key: Key, start: usize) -> Result<ClassId, QueueError> {
        let bucket = (0..=start)
            .rev()
            .find(|&b| self.active[b] && self.fences[b] <= key)
            .ok_or(QueueError::Corrupted("no bucket accepts the key"))?;
        Ok(self.class_index(bucket, self.segment_of(bucket, key)))
    }

    fn place(&mut self, label: Label, key: Key, class: ClassId) -> Result<(), QueueError> {
        self.segments[class].append(&mut self.links, label)?;
        self.occupancy[class / self.branching] += 1;
        self.handles.set(label, key, class);
        Ok(())
    }

    fn unplace(&mut self, label: Label, class: ClassId) -> Result<(), QueueError> {
        self.segments[class].remove(&mut self.links, label)?;
        self.occupancy[class / self.branching] -= 1;
        Ok(())
    }

    /// Lowest populated class, if any.
    fn lowest_class(&self) -> Option<ClassId> {
        let bucket = self.occupancy.iter().position(|&count| count > 0)?;
        let first = self.class_index(bucket, 0);
        (first..first + self.branching).find(|&c| !self.segments[c].is_empty())
    }

    fn tighten(&mut self, min: Key, top: usize, ceiling: Key) {
        self.fences[0] = min;
        for j in 1..=top {
            self.fences[j] = self.fences[j - 1]
                .saturating_add(self.width(j - 1))
                .min(ceiling);
        }
        for j in 0..=top {
            self.active[j] = self.fences[j] < self.fences[j + 1];
        }
    }

    /// Drains segment `(bucket, segment)`, extracts its true minimum and
    /// reinserts everything else into the tightened lower buckets.
    ///
    /// The segment must be the lowest populated class.
    ///
    /// # Errors
    /// `SegmentNotLowest` if the segment is empty, out of range, or some
    /// smaller class still holds entries.
    pub fn redistribute_segment(
        &mut self,
        bucket: usize,
        segment: usize,
    ) -> Result<Redistribution, QueueError> {
        let class = self.class_index(bucket, segment);
        if bucket >= self.bucket_count()
            || segment >= self.branching
            || self.lowest_class() != Some(class)
        {
            return Err(QueueError::SegmentNotLowest { bucket, segment });
        }

        let ceiling = self.segment_upper(bucket, segment);
        let mut entries: SmallVec<[(Label, Key); 8]> = SmallVec::new();
        let mut min_index = 0;
        while let Some(label) = self.segments[class].pop_front(&mut self.links) {
            let key = self.handles.key(label)?;
            if key < entries.get(min_index).map_or(Key::MAX, |&(_, k)| k) {
                min_index = entries.len();
            }
            entries.push((label, key));
        }
        self.occupancy[bucket] -= entries.len();

        let (min_label, min_key) = entries[min_index];
        self.tighten(min_key, bucket, ceiling);

        let mut relocations = SmallVec::new();
        for (index, &(label, key)) in entries.iter().enumerate() {
            if index == min_index {
                continue;
            }
            let target = self.locate(key, bucket)?;
            self.place(label, key, target)?;
            let (bucket, segment) = self.address(target);
            relocations.push(Relocation {
                label,
                key,
                bucket,
                segment,
            });
        }

        self.handles.clear(min_label);
        self.len -= 1;
        self.trace("redistribute_segment");
        Ok(Redistribution {
            entries,
            min_index,
            relocations,
        })
    }

    /// Removes a specific label from the lowest populated class in bucket 0.
    ///
    /// Every entry of such a class carries the minimum key, so the caller may
    /// choose which one leaves.
    pub(crate) fn extract(&mut self, label: Label) -> Result<(Label, Key), QueueError> {
        let handle = self.handles.lookup(label)?;
        let (bucket, segment) = self.address(handle.location);
        if bucket != 0 || self.lowest_class() != Some(handle.location) {
            return Err(QueueError::SegmentNotLowest { bucket, segment });
        }

        self.unplace(label, handle.location)?;
        self.handles.clear(label);
        self.fences[0] = handle.key;
        self.len -= 1;
        self.trace("extract");
        Ok((label, handle.key))
    }

    fn trace(&self, operation: &'static str) {
        if self.params.trace_dumps && tracing::enabled!(tracing::Level::TRACE) {
            tracing::trace!(operation = operation, "{}", self.dump());
        }
    }
}

impl MonotoneQueue for KaryRadixHeap {
    fn with_params(params: QueueParams) -> Result<Self, QueueError> {
        let branching = params.require_branching()?;
        let count = bucket_count(branching, params.max_weight);
        let sentinel = params.sentinel();

        let spans: Vec<Key> = (0..count)
            .map(|b| (branching as Key).saturating_pow(b as u32))
            .collect();

        let mut fences: Vec<Key> = Vec::with_capacity(count + 1);
        fences.push(0);
        for j in 1..count {
            let width = spans[j - 1].saturating_mul(branching as Key);
            fences.push(fences[j - 1].saturating_add(width).min(sentinel));
        }
        fences.push(sentinel);

        let active = (0..count).map(|b| fences[b] < fences[b + 1]).collect();
        let mut links = LinkArena::with_capacity(params.vertex_count);
        let segments = (0..count * branching).map(|_| links.new_list()).collect();

        Ok(KaryRadixHeap {
            params,
            branching,
            segments,
            links,
            occupancy: vec![0; count],
            fences,
            spans,
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
        let class = self.locate(key, self.last_bucket())?;

        self.place(label, key, class)?;
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

        let class = self.locate(key, handle.location / self.branching)?;
        if class == handle.location {
            self.handles.set(label, key, class);
        } else {
            self.unplace(label, handle.location)?;
            self.place(label, key, class)?;
        }
        self.trace("decrease");
        Ok(())
    }

    fn delete_min(&mut self) -> Result<(Label, Key), QueueError> {
        if self.len == 0 {
            return Err(QueueError::Empty);
        }
        let class = self
            .lowest_class()
            .ok_or(QueueError::Corrupted("non-empty heap has no populated class"))?;

        let (bucket, segment) = self.address(class);
        if bucket == 0 {
            let label = self.segments[class]
                .front()
                .ok_or(QueueError::Corrupted("populated class has no front"))?;
            return self.extract(label);
        }
        Ok(self.redistribute_segment(bucket, segment)?.minimum())
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
        for b in 0..self.bucket_count() {
            let _ = writeln!(
                out,
                "bucket {b} [{}, {}){}",
                self.fences[b],
                self.fences[b + 1],
                if self.active[b] { "" } else { " inactive" }
            );
            for k in 0..self.branching {
                let class = self.class_index(b, k);
                if self.segments[class].is_empty() {
                    continue;
                }
                let _ = write!(out, "  segment {k}:");
                for label in self.segments[class].iter(&self.links) {
                    let key = self.key_of(label).unwrap_or(Key::MAX);
                    let _ = write!(out, " ({label}, {key})");
                }
                out.push('\n');
            }
        }
        out
    }
}
