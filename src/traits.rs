//! Common traits for monotone priority queues
//!
//! Every backend in this crate implements [`MonotoneQueue`], the capability
//! surface the shortest-path engine depends on:
//!
//! - `insert(label, key)` places a label that is not currently queued
//! - `decrease(label, key)` lowers the key of a queued label
//! - `delete_min()` removes and returns a `(label, key)` pair with the smallest key
//!
//! Labels are dense integers in `[0, n)` and double as the handle used for
//! O(1) relocation, so there is no separate handle type.
//!
//! # Monotonicity
//!
//! All backends are *monotone*: once a key `d` has been extracted, nothing
//! below `d` may be inserted or decreased to. The current floor is exposed as
//! [`MonotoneQueue::lower_fence`]. Dijkstra's relaxation with non-negative
//! weights satisfies this naturally.

use crate::config::QueueParams;
use intrusive_list::ListError;

/// Dense vertex label in `[0, n)`.
pub type Label = usize;

/// Non-negative distance estimate.
pub type Key = u64;

/// Error type for queue operations
///
/// Everything except [`QueueError::OutOfRange`], [`QueueError::InvalidParams`]
/// and the internal bookkeeping variants is a caller contract violation; see
/// [`QueueError::is_contract_violation`]. A failed call leaves the queue
/// exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    /// The label is outside `[0, n)`.
    #[error("label {label} is outside 0..{capacity}")]
    LabelOutOfRange { label: Label, capacity: usize },
    /// `insert` on a label that is already queued.
    #[error("label {0} is already queued")]
    DuplicateLabel(Label),
    /// `decrease` on a label that is not queued.
    #[error("label {0} is not queued")]
    NotQueued(Label),
    /// The new key is not strictly smaller than the current one.
    #[error("new key {requested} for label {label} is not below its current key {current}")]
    NotDecreased {
        label: Label,
        current: Key,
        requested: Key,
    },
    /// The key lies below the last extracted minimum.
    #[error("key {key} is below the lower fence {fence}")]
    BelowFence { key: Key, fence: Key },
    /// `delete_min` on an empty queue.
    #[error("delete_min on an empty queue")]
    Empty,
    /// A segment other than the lowest populated one was asked to redistribute.
    #[error("segment ({bucket}, {segment}) is empty or not the lowest populated class")]
    SegmentNotLowest { bucket: usize, segment: usize },
    /// The key does not fit below the `n*C + 1` capacity sentinel.
    #[error("key {key} exceeds the largest representable key {limit}")]
    OutOfRange { key: Key, limit: Key },
    /// Construction parameters are unusable.
    #[error("invalid queue parameters: {0}")]
    InvalidParams(&'static str),
    /// A list operation failed; the queue's own bookkeeping disagrees with its lists.
    #[error("list bookkeeping failed: {0}")]
    List(#[from] ListError),
    /// Internal bookkeeping is inconsistent.
    #[error("internal bookkeeping is inconsistent: {0}")]
    Corrupted(&'static str),
}

impl QueueError {
    /// Whether this error reports a caller bug rather than a capacity or
    /// configuration problem.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            QueueError::LabelOutOfRange { .. }
                | QueueError::DuplicateLabel(_)
                | QueueError::NotQueued(_)
                | QueueError::NotDecreased { .. }
                | QueueError::BelowFence { .. }
                | QueueError::Empty
                | QueueError::SegmentNotLowest { .. }
        )
    }
}

/// Monotone priority queue over dense labels with bounded integer keys
///
/// # Example
///
/// ```rust
/// use monotone_heaps::{MonotoneQueue, QueueParams};
/// use monotone_heaps::radix::RadixHeap;
///
/// let mut queue = RadixHeap::with_params(QueueParams::new(3, 10)).unwrap();
/// queue.insert(0, 7).unwrap();
/// queue.insert(1, 4).unwrap();
/// queue.decrease(0, 2).unwrap();
///
/// assert_eq!(queue.delete_min(), Ok((0, 2)));
/// assert_eq!(queue.delete_min(), Ok((1, 4)));
/// assert!(queue.is_empty());
/// ```
pub trait MonotoneQueue: Sized {
    /// Creates an empty queue. Parameters are fixed for the queue's lifetime.
    fn with_params(params: QueueParams) -> Result<Self, QueueError>;

    /// The parameters this queue was built with.
    fn params(&self) -> &QueueParams;

    /// Inserts `label` with `key`.
    ///
    /// # Errors
    /// `DuplicateLabel` if the label is queued, `BelowFence` if `key` is below
    /// [`lower_fence`](Self::lower_fence), `OutOfRange` when the key is at or
    /// above the capacity sentinel and the overflow policy rejects it.
    fn insert(&mut self, label: Label, key: Key) -> Result<(), QueueError>;

    /// Lowers the key of a queued label.
    ///
    /// # Errors
    /// `NotQueued`, `NotDecreased` if `key` is not strictly smaller, or
    /// `BelowFence`.
    fn decrease(&mut self, label: Label, key: Key) -> Result<(), QueueError>;

    /// Removes and returns a label with the smallest key.
    ///
    /// # Errors
    /// `Empty` if nothing is queued.
    fn delete_min(&mut self) -> Result<(Label, Key), QueueError>;

    /// Number of queued labels.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current key of `label`, or `None` if it is not queued.
    fn key_of(&self, label: Label) -> Option<Key>;

    /// Smallest key that may still be inserted.
    fn lower_fence(&self) -> Key;

    /// Textual dump of the internal layout, for tracing only.
    fn dump(&self) -> String;
}
