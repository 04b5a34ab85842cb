//! Index-addressed intrusive doubly-linked lists.
//!
//! A [`LinkArena`] owns one link slot per element index. Any number of
//! [`List`] heads can be threaded through the same arena; each slot is linked
//! into at most one list at a time, and the element index itself is the
//! handle used for O(1) removal.
//!
//! This is the layout the monotone heaps need: element indices are dense
//! labels, a bucket or a sibling ring is just a head record, and moving an
//! element between lists never allocates.
//!
//! # Example
//!
//! ```rust
//! use intrusive_list::LinkArena;
//!
//! let mut arena = LinkArena::with_capacity(4);
//! let mut evens = arena.new_list();
//! let mut odds = arena.new_list();
//!
//! for i in 0..4 {
//!     if i % 2 == 0 {
//!         evens.append(&mut arena, i).unwrap();
//!     } else {
//!         odds.append(&mut arena, i).unwrap();
//!     }
//! }
//!
//! assert_eq!(evens.remove(&mut arena, 2), Ok(2));
//! assert!(odds.remove(&mut arena, 0).is_err()); // 0 belongs to `evens`
//! assert_eq!(odds.pop_front(&mut arena), Some(1));
//! assert_eq!(evens.len(), 1);
//! ```
//!
//! # Ownership
//!
//! Every slot records which list currently holds it, so a handle presented
//! to the wrong list is reported as [`ListError::ForeignHandle`] instead of
//! silently corrupting both lists.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use core::fmt;

/// Identifies one [`List`] inside its arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ListId(u32);

/// Errors reported by list operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ListError {
    /// The index is outside the arena.
    #[error("index {0} is outside the link arena")]
    OutOfBounds(usize),
    /// The slot is already linked into some list.
    #[error("index {0} is already linked")]
    AlreadyLinked(usize),
    /// The slot is linked into a different list than the one asked to remove it.
    #[error("index {0} belongs to another list")]
    ForeignHandle(usize),
    /// The slot is not linked into any list.
    #[error("index {0} is not linked")]
    NotLinked(usize),
}

// =============================================================================
// LinkArena
// =============================================================================

#[derive(Clone, Copy, Default)]
struct Link {
    prev: Option<usize>,
    next: Option<usize>,
    owner: Option<ListId>,
}

/// Backing storage for the links of every list threaded through it.
#[derive(Clone, Default)]
pub struct LinkArena {
    links: Vec<Link>,
    next_list: u32,
}

impl LinkArena {
    /// Creates an arena with `capacity` unlinked slots.
    pub fn with_capacity(capacity: usize) -> Self {
        LinkArena {
            links: vec![Link::default(); capacity],
            next_list: 0,
        }
    }

    /// Number of slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.links.len()
    }

    /// Creates a new empty list whose id is unique within this arena.
    pub fn new_list(&mut self) -> List {
        let id = ListId(self.next_list);
        self.next_list += 1;
        List {
            id,
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// The list currently holding `index`, if any.
    #[inline]
    pub fn owner(&self, index: usize) -> Option<ListId> {
        self.links.get(index).and_then(|link| link.owner)
    }

    /// Whether `index` is linked into some list.
    #[inline]
    pub fn is_linked(&self, index: usize) -> bool {
        self.owner(index).is_some()
    }

    #[inline]
    fn next(&self, index: usize) -> Option<usize> {
        self.links[index].next
    }
}

impl fmt::Debug for LinkArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let linked = self.links.iter().filter(|l| l.owner.is_some()).count();
        f.debug_struct("LinkArena")
            .field("capacity", &self.links.len())
            .field("linked", &linked)
            .finish()
    }
}

// =============================================================================
// List
// =============================================================================

/// Head record of a doubly-linked list whose links live in a [`LinkArena`].
///
/// A list must only be used with the arena that created it.
#[derive(Clone, Debug)]
pub struct List {
    id: ListId,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl List {
    /// This list's id.
    #[inline]
    pub fn id(&self) -> ListId {
        self.id
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// First element, if any.
    #[inline]
    pub fn front(&self) -> Option<usize> {
        self.head
    }

    /// Whether `index` is linked into this list.
    #[inline]
    pub fn contains(&self, arena: &LinkArena, index: usize) -> bool {
        arena.owner(index) == Some(self.id)
    }

    /// Appends `index` at the tail. The index is the handle for later removal.
    pub fn append(&mut self, arena: &mut LinkArena, index: usize) -> Result<usize, ListError> {
        let link = arena
            .links
            .get(index)
            .ok_or(ListError::OutOfBounds(index))?;
        if link.owner.is_some() {
            return Err(ListError::AlreadyLinked(index));
        }

        arena.links[index] = Link {
            prev: self.tail,
            next: None,
            owner: Some(self.id),
        };
        match self.tail {
            Some(tail) => arena.links[tail].next = Some(index),
            None => self.head = Some(index),
        }
        self.tail = Some(index);
        self.len += 1;
        Ok(index)
    }

    /// Unlinks `index` from this list in O(1).
    pub fn remove(&mut self, arena: &mut LinkArena, index: usize) -> Result<usize, ListError> {
        let link = *arena
            .links
            .get(index)
            .ok_or(ListError::OutOfBounds(index))?;
        match link.owner {
            None => return Err(ListError::NotLinked(index)),
            Some(owner) if owner != self.id => return Err(ListError::ForeignHandle(index)),
            Some(_) => {}
        }

        match link.prev {
            Some(prev) => arena.links[prev].next = link.next,
            None => self.head = link.next,
        }
        match link.next {
            Some(next) => arena.links[next].prev = link.prev,
            None => self.tail = link.prev,
        }
        arena.links[index] = Link::default();
        self.len -= 1;
        Ok(index)
    }

    /// Unlinks and returns the first element.
    pub fn pop_front(&mut self, arena: &mut LinkArena) -> Option<usize> {
        let head = self.head?;
        self.remove(arena, head).ok()
    }

    /// Moves every element of `other` to the tail of `self`, preserving order.
    ///
    /// Ownership is rewritten element by element, so this is O(len(other)).
    pub fn append_list(&mut self, arena: &mut LinkArena, other: &mut List) {
        while let Some(index) = other.pop_front(arena) {
            // Just unlinked, so append cannot fail.
            let _ = self.append(arena, index);
        }
    }

    /// Iterates over the elements front to back.
    pub fn iter<'a>(&self, arena: &'a LinkArena) -> Iter<'a> {
        Iter {
            arena,
            cursor: self.head,
        }
    }
}

/// Iterator over the indices of a [`List`].
pub struct Iter<'a> {
    arena: &'a LinkArena,
    cursor: Option<usize>,
}

impl Iterator for Iter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let current = self.cursor?;
        self.cursor = self.arena.next(current);
        Some(current)
    }
}

// =============================================================================
// Tests
// =============================================================================
