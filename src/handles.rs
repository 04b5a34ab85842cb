//! Per-instance label -> location table.

use crate::traits::{Key, Label, QueueError};

/// Where a queued label currently lives, and its key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Handle<L> {
    pub key: Key,
    pub location: L,
}

/// One slot per label; `None` means the label is not queued.
#[derive(Clone, Debug)]
pub(crate) struct HandleTable<L> {
    slots: Vec<Option<Handle<L>>>,
}

impl<L: Copy> HandleTable<L> {
    pub fn new(capacity: usize) -> Self {
        HandleTable {
            slots: vec![None; capacity],
        }
    }

    #[inline]
    pub fn get(&self, label: Label) -> Option<Handle<L>> {
        self.slots.get(label).copied().flatten()
    }

    fn check_range(&self, label: Label) -> Result<(), QueueError> {
        if label >= self.slots.len() {
            return Err(QueueError::LabelOutOfRange {
                label,
                capacity: self.slots.len(),
            });
        }
        Ok(())
    }

    /// The handle of a queued label.
    pub fn lookup(&self, label: Label) -> Result<Handle<L>, QueueError> {
        self.check_range(label)?;
        self.get(label).ok_or(QueueError::NotQueued(label))
    }

    /// Fails unless `label` is in range and not queued.
    pub fn ensure_vacant(&self, label: Label) -> Result<(), QueueError> {
        self.check_range(label)?;
        match self.slots[label] {
            Some(_) => Err(QueueError::DuplicateLabel(label)),
            None => Ok(()),
        }
    }

    /// Key of a label the caller knows is queued.
    pub fn key(&self, label: Label) -> Result<Key, QueueError> {
        self.get(label)
            .map(|handle| handle.key)
            .ok_or(QueueError::Corrupted("listed label has no handle"))
    }

    #[inline]
    pub fn set(&mut self, label: Label, key: Key, location: L) {
        self.slots[label] = Some(Handle { key, location });
    }

    #[inline]
    pub fn clear(&mut self, label: Label) {
        self.slots[label] = None;
    }
}
