//! Construction parameters shared by every queue backend.

use crate::graph::Graph;
use crate::traits::{Key, QueueError};

/// What to do with a key at or above the `n*C + 1` sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyOverflow {
    /// Fail with [`QueueError::OutOfRange`].
    #[default]
    Reject,
    /// Store `n*C` instead.
    Clamp,
}

/// Parameters fixed at construction.
///
/// Built with [`QueueParams::new`] and refined with the `with_*` setters:
///
/// ```rust
/// use monotone_heaps::{KeyOverflow, QueueParams};
///
/// let params = QueueParams::new(6, 20)
///     .with_branching(4)
///     .with_overflow(KeyOverflow::Clamp);
/// assert_eq!(params.sentinel(), 121);
/// assert_eq!(params.branching, 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueParams {
    /// Number of labels `n`; labels live in `[0, n)`.
    pub vertex_count: usize,
    /// Largest edge weight `C`.
    pub max_weight: u64,
    /// Branching factor `K` of the multi-level backends (ignored by `RadixHeap`).
    pub branching: usize,
    /// Policy for keys beyond capacity.
    pub overflow: KeyOverflow,
    /// Emit a `trace!` dump of the layout after every mutating call.
    pub trace_dumps: bool,
}

impl QueueParams {
    /// Parameters for `vertex_count` labels and weights up to `max_weight`,
    /// with `K = 2`, rejecting oversized keys and tracing disabled.
    pub fn new(vertex_count: usize, max_weight: u64) -> Self {
        QueueParams {
            vertex_count,
            max_weight,
            branching: 2,
            overflow: KeyOverflow::Reject,
            trace_dumps: false,
        }
    }

    /// Parameters sized for `graph`.
    pub fn for_graph(graph: &Graph) -> Self {
        Self::new(graph.vertex_count(), graph.max_weight())
    }

    pub fn with_branching(mut self, branching: usize) -> Self {
        self.branching = branching;
        self
    }

    pub fn with_overflow(mut self, overflow: KeyOverflow) -> Self {
        self.overflow = overflow;
        self
    }

    pub fn with_trace_dumps(mut self, enabled: bool) -> Self {
        self.trace_dumps = enabled;
        self
    }

    /// The "infinity" key `n*C + 1`, saturating at `u64::MAX`.
    ///
    /// Every stored key is strictly below it.
    pub fn sentinel(&self) -> Key {
        (self.vertex_count as u64)
            .saturating_mul(self.max_weight)
            .saturating_add(1)
    }

    /// Largest storable key, `n*C`.
    pub fn max_key(&self) -> Key {
        self.sentinel() - 1
    }

    pub(crate) fn require_branching(&self) -> Result<usize, QueueError> {
        if self.branching < 2 {
            return Err(QueueError::InvalidParams("branching factor must be at least 2"));
        }
        Ok(self.branching)
    }

    /// Applies the overflow policy and the lower-fence check to `key`.
    pub(crate) fn admit(&self, key: Key, fence: Key) -> Result<Key, QueueError> {
        let key = if key >= self.sentinel() {
            match self.overflow {
                KeyOverflow::Reject => {
                    return Err(QueueError::OutOfRange {
                        key,
                        limit: self.max_key(),
                    })
                }
                KeyOverflow::Clamp => self.max_key(),
            }
        } else {
            key
        };
        if key < fence {
            return Err(QueueError::BelowFence { key, fence });
        }
        Ok(key)
    }
}
