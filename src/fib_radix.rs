//! Fibonacci forest over the classes of a K-ary radix heap
//!
//! [`FibRadixHeap`] keeps a [`KaryRadixHeap`] as its source of truth for keys
//! and classes and mirrors every entry in a Fibonacci-style forest ordered by
//! class id instead of by key.
//!
//! # Structure
//!
//! - Each populated class has exactly one *active* member, its
//!   representative. Only active nodes take part in trees.
//! - Every other member of the class is *passive*: a childless, parentless
//!   node on the class's passive list.
//! - Trees are heap-ordered with strict inequality: a parent's class is
//!   smaller than each child's class. The representative of the lowest
//!   populated class is therefore always a root, and is the heap minimum.
//! - The rank of a node is its child count; roots of equal rank are linked
//!   during consolidation, and a node that loses a second child is cut from
//!   its parent (cascading cut).
//!
//! When a representative moves into a class that already has one, it turns
//! passive: its children are handed to its former parent (or become roots)
//! and one of the passive members of its old class is promoted in its place.
//!
//! # Example
//!
//! ```rust
//! use monotone_heaps::{MonotoneQueue, QueueParams};
//! use monotone_heaps::fib_radix::FibRadixHeap;
//!
//! let params = QueueParams::new(5, 100).with_branching(3);
//! let mut heap = FibRadixHeap::with_params(params).unwrap();
//! for (label, key) in [(0, 40), (1, 90), (2, 41), (3, 7)] {
//!     heap.insert(label, key).unwrap();
//! }
//! heap.decrease(1, 8).unwrap();
//!
//! assert_eq!(heap.find_min(), Some((3, 7)));
//! assert_eq!(heap.delete_min(), Ok((3, 7)));
//! assert_eq!(heap.delete_min(), Ok((1, 8)));
//! heap.validate().unwrap();
//! ```

use crate::config::QueueParams;
use crate::kary_radix::{ClassId, KaryRadixHeap, Relocation};
use crate::traits::{Key, Label, MonotoneQueue, QueueError};
use intrusive_list::{LinkArena, List};
use std::fmt::Write;

#[derive(Debug, Clone, Copy, Default)]
struct ForestNode {
    parent: Option<Label>,
    /// Lost a child since it last became a child itself.
    mark: bool,
    active: bool,
    class: ClassId,
}

/// Fibonacci heap keyed by radix class
pub struct FibRadixHeap {
    params: QueueParams,
    radix: KaryRadixHeap,
    nodes: Vec<ForestNode>,
    children: Vec<List>,
    /// Shared by the root list, every child list and every passive list.
    links: LinkArena,
    roots: List,
    passive: Vec<List>,
    representative: Vec<Option<Label>>,
    /// Queued labels per class, active and passive.
    members: Vec<usize>,
    min: Option<Label>,
    rank_slots: Vec<Option<Label>>,
}

impl FibRadixHeap {
    /// The underlying radix heap.
    pub fn radix(&self) -> &KaryRadixHeap {
        &self.radix
    }

    /// The minimum without removing it.
    pub fn find_min(&self) -> Option<(Label, Key)> {
        let label = self.min?;
        Some((label, self.radix.key_of(label)?))
    }

    pub fn root_count(&self) -> usize {
        self.roots.len()
    }

    /// Number of active and passive members of `class`.
    pub fn class_members(&self, class: ClassId) -> usize {
        self.members.get(class).copied().unwrap_or(0)
    }

    /// Whether `label` is queued and currently its class's representative.
    pub fn is_representative(&self, label: Label) -> bool {
        self.radix.key_of(label).is_some() && self.nodes[label].active
    }

    fn update_min(&mut self, label: Label) {
        let better = match self.min {
            None => true,
            Some(current) => {
                (self.nodes[label].class, label) < (self.nodes[current].class, current)
            }
        };
        if better {
            self.min = Some(label);
        }
    }

    fn refresh_min(&mut self) {
        self.min = self
            .roots
            .iter(&self.links)
            .min_by_key(|&root| (self.nodes[root].class, root));
    }

    /// Adds a fresh, unlinked node to `class`, as representative if the class has none.
    fn join_class(&mut self, label: Label, class: ClassId) -> Result<(), QueueError> {
        self.nodes[label] = ForestNode {
            parent: None,
            mark: false,
            active: false,
            class,
        };
        if self.representative[class].is_none() {
            self.nodes[label].active = true;
            self.representative[class] = Some(label);
            self.roots.append(&mut self.links, label)?;
            self.update_min(label);
        } else {
            self.passive[class].append(&mut self.links, label)?;
        }
        self.members[class] += 1;
        Ok(())
    }

    /// Makes a passive member of a representative-less class its new representative.
    fn promote(&mut self, class: ClassId) -> Result<(), QueueError> {
        if let Some(label) = self.passive[class].pop_front(&mut self.links) {
            self.nodes[label].active = true;
            self.representative[class] = Some(label);
            self.roots.append(&mut self.links, label)?;
            self.update_min(label);
        }
        Ok(())
    }

    fn detach_from_parent(&mut self, label: Label) -> Result<Option<Label>, QueueError> {
        let Some(parent) = self.nodes[label].parent else {
            return Ok(None);
        };
        self.children[parent].remove(&mut self.links, label)?;
        self.nodes[label].parent = None;
        self.nodes[label].mark = false;
        Ok(Some(parent))
    }

    fn cut(&mut self, label: Label) -> Result<(), QueueError> {
        self.detach_from_parent(label)?;
        self.roots.append(&mut self.links, label)?;
        self.update_min(label);
        Ok(())
    }

    fn cascading_cut(&mut self, start: Label) -> Result<(), QueueError> {
        let mut node = start;
        while let Some(parent) = self.nodes[node].parent {
            if !self.nodes[node].mark {
                self.nodes[node].mark = true;
                break;
            }
            self.cut(node)?;
            node = parent;
        }
        Ok(())
    }

    /// Turns an active node into a bare passive one.
    ///
    /// Children of a non-root node move to its parent, children of a root
    /// become roots.
    fn demote(&mut self, label: Label) -> Result<(), QueueError> {
        if let Some(parent) = self.nodes[label].parent {
            while let Some(child) = self.children[label].pop_front(&mut self.links) {
                self.nodes[child].parent = Some(parent);
                self.nodes[child].mark = false;
                self.children[parent].append(&mut self.links, child)?;
            }
            self.detach_from_parent(label)?;
            self.cascading_cut(parent)?;
        } else {
            self.remove_root(label)?;
        }

        self.nodes[label].active = false;
        self.nodes[label].mark = false;
        if self.min == Some(label) {
            self.refresh_min();
        }
        Ok(())
    }

    /// Unlinks a root and lifts its children to the root list.
    fn remove_root(&mut self, label: Label) -> Result<(), QueueError> {
        self.roots.remove(&mut self.links, label)?;
        while let Some(child) = self.children[label].pop_front(&mut self.links) {
            self.nodes[child].parent = None;
            self.nodes[child].mark = false;
            self.roots.append(&mut self.links, child)?;
        }
        Ok(())
    }

    /// Empties a class whose segment was drained by the radix heap.
    fn dissolve_class(&mut self, class: ClassId) {
        while let Some(label) = self.passive[class].pop_front(&mut self.links) {
            self.nodes[label] = ForestNode::default();
        }
        self.representative[class] = None;
        self.members[class] = 0;
    }

    /// Links two roots of equal rank and returns the winner.
    fn link(&mut self, a: Label, b: Label) -> Result<Label, QueueError> {
        let (winner, loser) = if (self.nodes[a].class, a) < (self.nodes[b].class, b) {
            (a, b)
        } else {
            (b, a)
        };
        self.nodes[loser].parent = Some(winner);
        self.nodes[loser].mark = false;
        self.children[winner].append(&mut self.links, loser)?;
        Ok(winner)
    }

    fn consolidate(&mut self) -> Result<(), QueueError> {
        while let Some(mut root) = self.roots.pop_front(&mut self.links) {
            loop {
                let rank = self.children[root].len();
                if rank >= self.rank_slots.len() {
                    self.rank_slots.resize(rank + 1, None);
                }
                match self.rank_slots[rank].take() {
                    None => {
                        self.rank_slots[rank] = Some(root);
                        break;
                    }
                    Some(other) => root = self.link(root, other)?,
                }
            }
        }

        self.min = None;
        for rank in 0..self.rank_slots.len() {
            if let Some(root) = self.rank_slots[rank].take() {
                self.roots.append(&mut self.links, root)?;
                self.update_min(root);
            }
        }
        Ok(())
    }

    /// Checks every structural invariant of the forest against the radix heap.
    pub fn validate(&self) -> Result<(), QueueError> {
        let mut counted = vec![0usize; self.members.len()];
        let mut lowest: Option<ClassId> = None;
        for label in 0..self.nodes.len() {
            let Some(class) = self.radix.class_of(label) else {
                continue;
            };
            let node = &self.nodes[label];
            if node.class != class {
                return Err(QueueError::Corrupted("forest class disagrees with radix class"));
            }
            counted[class] += 1;
            lowest = Some(lowest.map_or(class, |c| c.min(class)));

            if node.active {
                if self.representative[class] != Some(label) {
                    return Err(QueueError::Corrupted("active node is not its class representative"));
                }
                if let Some(parent) = node.parent {
                    if !self.nodes[parent].active || self.nodes[parent].class >= class {
                        return Err(QueueError::Corrupted("parent class is not below child class"));
                    }
                    if !self.children[parent].contains(&self.links, label) {
                        return Err(QueueError::Corrupted("child missing from parent's list"));
                    }
                } else if !self.roots.contains(&self.links, label) {
                    return Err(QueueError::Corrupted("parentless active node is not a root"));
                }
            } else {
                if node.parent.is_some() || !self.children[label].is_empty() {
                    return Err(QueueError::Corrupted("passive node is part of a tree"));
                }
                if !self.passive[class].contains(&self.links, label) {
                    return Err(QueueError::Corrupted("passive node missing from its class list"));
                }
            }
        }

        for class in 0..self.members.len() {
            if counted[class] != self.members[class] {
                return Err(QueueError::Corrupted("class member count is stale"));
            }
            let expected_passive = self.members[class].saturating_sub(1);
            if self.representative[class].is_some() != (self.members[class] > 0)
                || self.passive[class].len() != expected_passive
            {
                return Err(QueueError::Corrupted("populated class without exactly one representative"));
            }
        }

        for root in self.roots.iter(&self.links) {
            if !self.nodes[root].active || self.nodes[root].parent.is_some() {
                return Err(QueueError::Corrupted("root list holds a non-root"));
            }
        }

        match (self.min, lowest) {
            (None, None) => Ok(()),
            (Some(min), Some(class)) if self.nodes[min].active && self.nodes[min].class == class => {
                Ok(())
            }
            _ => Err(QueueError::Corrupted("minimum is not the lowest class representative")),
        }
    }

    fn trace(&self, operation: &'static str) {
        if self.params.trace_dumps && tracing::enabled!(tracing::Level::TRACE) {
            tracing::trace!(operation = operation, "{}", self.dump());
        }
    }
}

impl MonotoneQueue for FibRadixHeap {
    fn with_params(params: QueueParams) -> Result<Self, QueueError> {
        let radix = KaryRadixHeap::with_params(params.with_trace_dumps(false))?;
        let n = params.vertex_count;
        let class_count = radix.class_count();

        let mut links = LinkArena::with_capacity(n);
        let roots = links.new_list();
        let children = (0..n).map(|_| links.new_list()).collect();
        let passive = (0..class_count).map(|_| links.new_list()).collect();

        Ok(FibRadixHeap {
            params,
            radix,
            nodes: vec![ForestNode::default(); n],
            children,
            links,
            roots,
            passive,
            representative: vec![None; class_count],
            members: vec![0; class_count],
            min: None,
            rank_slots: Vec::new(),
        })
    }

    fn params(&self) -> &QueueParams {
        &self.params
    }

    fn insert(&mut self, label: Label, key: Key) -> Result<(), QueueError> {
        self.radix.insert(label, key)?;
        let class = self
            .radix
            .class_of(label)
            .ok_or(QueueError::Corrupted("inserted label has no class"))?;
        self.join_class(label, class)?;
        self.trace("insert");
        Ok(())
    }

    fn decrease(&mut self, label: Label, key: Key) -> Result<(), QueueError> {
        self.radix.decrease(label, key)?;
        let new = self
            .radix
            .class_of(label)
            .ok_or(QueueError::Corrupted("decreased label has no class"))?;
        let old = self.nodes[label].class;
        if new == old {
            self.trace("decrease");
            return Ok(());
        }

        if !self.nodes[label].active {
            self.passive[old].remove(&mut self.links, label)?;
            self.members[old] -= 1;
            self.join_class(label, new)?;
            self.trace("decrease");
            return Ok(());
        }

        self.members[old] -= 1;
        self.representative[old] = None;
        self.nodes[label].class = new;
        self.promote(old)?;

        if self.representative[new].is_none() {
            if let Some(parent) = self.nodes[label].parent {
                if self.nodes[parent].class > new {
                    self.cut(label)?;
                    self.cascading_cut(parent)?;
                }
            }
            self.representative[new] = Some(label);
            if self.nodes[label].parent.is_none() {
                self.update_min(label);
            }
        } else {
            self.demote(label)?;
            self.passive[new].append(&mut self.links, label)?;
        }
        self.members[new] += 1;
        self.trace("decrease");
        Ok(())
    }

    fn delete_min(&mut self) -> Result<(Label, Key), QueueError> {
        if self.radix.is_empty() {
            return Err(QueueError::Empty);
        }
        let min = self
            .min
            .ok_or(QueueError::Corrupted("non-empty forest has no minimum"))?;
        let class = self.nodes[min].class;
        let (bucket, segment) = self.radix.address(class);

        let extracted = if bucket == 0 {
            let extracted = self.radix.extract(min)?;
            self.members[class] -= 1;
            self.representative[class] = None;
            self.remove_root(min)?;
            self.nodes[min] = ForestNode::default();
            self.promote(class)?;
            extracted
        } else {
            let moved = self.radix.redistribute_segment(bucket, segment)?;
            self.dissolve_class(class);
            self.remove_root(min)?;
            self.nodes[min] = ForestNode::default();
            // The cached minimum rejoins first and keeps representing its new class.
            let (cached, rest): (Vec<&Relocation>, Vec<&Relocation>) =
                moved.relocations.iter().partition(|r| r.label == min);
            for relocation in cached.into_iter().chain(rest) {
                let target = self.radix.class_index(relocation.bucket, relocation.segment);
                self.join_class(relocation.label, target)?;
            }
            moved.minimum()
        };

        self.min = None;
        self.consolidate()?;
        self.trace("delete_min");
        Ok(extracted)
    }

    fn len(&self) -> usize {
        self.radix.len()
    }

    fn key_of(&self, label: Label) -> Option<Key> {
        self.radix.key_of(label)
    }

    fn lower_fence(&self) -> Key {
        self.radix.lower_fence()
    }

    fn dump(&self) -> String {
        let mut out = self.radix.dump();
        let _ = write!(out, "roots:");
        for root in self.roots.iter(&self.links) {
            let node = &self.nodes[root];
            let _ = write!(
                out,
                " {root}(class {}, rank {})",
                node.class,
                self.children[root].len()
            );
        }
        out.push('\n');
        for (class, list) in self.passive.iter().enumerate() {
            if !list.is_empty() {
                let _ = writeln!(out, "passive class {class}: {}", list.len());
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heap(n: usize, c: u64, k: usize) -> FibRadixHeap {
        FibRadixHeap::with_params(QueueParams::new(n, c).with_branching(k)).unwrap()
    }

    #[test]
    fn test_empty() {
        let mut heap = heap(3, 10, 2);
        assert!(heap.is_empty());
        assert_eq!(heap.find_min(), None);
        assert_eq!(heap.delete_min(), Err(QueueError::Empty));
        heap.validate().unwrap();
    }

    #[test]
    fn test_passive_members_share_a_class() {
        let mut heap = heap(4, 20, 2);
        heap.insert(0, 10).unwrap();
        heap.insert(1, 11).unwrap();
        heap.insert(2, 13).unwrap();
        heap.validate().unwrap();

        let class = heap.radix().class_of(0).unwrap();
        assert_eq!(heap.class_members(class), 3);
        assert!(heap.is_representative(0));
        assert!(!heap.is_representative(1));
        assert_eq!(heap.root_count(), 1);

        assert_eq!(heap.delete_min(), Ok((0, 10)));
        heap.validate().unwrap();
        assert_eq!(heap.delete_min(), Ok((1, 11)));
        assert_eq!(heap.delete_min(), Ok((2, 13)));
        assert!(heap.is_empty());
        heap.validate().unwrap();
    }

    #[test]
    fn test_decrease_representative_promotes_passive() {
        let mut heap = heap(4, 20, 2);
        heap.insert(0, 10).unwrap();
        heap.insert(1, 11).unwrap();
        heap.insert(2, 3).unwrap();

        // 0 leaves the shared class for the class of 2, which already has a representative.
        heap.decrease(0, 3).unwrap();
        heap.validate().unwrap();
        assert!(heap.is_representative(1));
        assert!(!heap.is_representative(0));

        assert_eq!(heap.delete_min().map(|(_, key)| key), Ok(3));
        assert_eq!(heap.delete_min().map(|(_, key)| key), Ok(3));
        assert_eq!(heap.delete_min(), Ok((1, 11)));
        heap.validate().unwrap();
    }

    #[test]
    fn test_cached_min_keeps_representing_after_redistribution() {
        let mut heap = heap(4, 20, 2);
        // All three share the class [10, 14); 0 represents it.
        heap.insert(0, 13).unwrap();
        heap.insert(1, 10).unwrap();
        heap.insert(2, 13).unwrap();
        assert!(heap.is_representative(0));

        assert_eq!(heap.delete_min(), Ok((1, 10)));
        heap.validate().unwrap();
        assert_eq!(heap.radix().class_of(0), heap.radix().class_of(2));
        assert!(heap.is_representative(0));
        assert!(!heap.is_representative(2));
        assert_eq!(heap.find_min(), Some((0, 13)));
    }

    #[test]
    fn test_floor_class_is_drained_one_by_one() {
        let mut heap = heap(5, 10, 2);
        for label in 0..4 {
            heap.insert(label, 0).unwrap();
        }
        heap.insert(4, 1).unwrap();
        let mut labels = Vec::new();
        for _ in 0..4 {
            let (label, key) = heap.delete_min().unwrap();
            assert_eq!(key, 0);
            labels.push(label);
            heap.validate().unwrap();
        }
        labels.sort_unstable();
        assert_eq!(labels, vec![0, 1, 2, 3]);
        assert_eq!(heap.delete_min(), Ok((4, 1)));
    }

    #[test]
    fn test_cuts_keep_forest_consistent() {
        let n = 64;
        let mut heap = heap(n, 1000, 2);
        for label in 0..n {
            heap.insert(label, 500 + (label as u64 * 37) % 400).unwrap();
        }
        // Builds trees.
        let (first, first_key) = heap.delete_min().unwrap();
        heap.validate().unwrap();

        let mut expected: Vec<(Key, Label)> = Vec::new();
        for label in (0..n).filter(|&l| l != first) {
            let current = heap.key_of(label).unwrap();
            let wanted = first_key + label as u64 % 50;
            let key = if label % 3 == 0 && wanted < current {
                heap.decrease(label, wanted).unwrap();
                heap.validate().unwrap();
                wanted
            } else {
                current
            };
            expected.push((key, label));
        }
        expected.sort_unstable();

        let mut keys = Vec::new();
        while let Ok((label, key)) = heap.delete_min() {
            assert_eq!(heap.key_of(label), None);
            keys.push(key);
            heap.validate().unwrap();
        }
        let expected_keys: Vec<Key> = expected.iter().map(|&(key, _)| key).collect();
        assert_eq!(keys, expected_keys);
    }

    #[test]
    fn test_failed_calls_leave_heap_unchanged() {
        let mut heap = heap(3, 10, 4);
        heap.insert(0, 5).unwrap();
        assert_eq!(heap.insert(0, 6), Err(QueueError::DuplicateLabel(0)));
        assert_eq!(
            heap.decrease(0, 9),
            Err(QueueError::NotDecreased {
                label: 0,
                current: 5,
                requested: 9
            })
        );
        assert_eq!(heap.decrease(1, 1), Err(QueueError::NotQueued(1)));
        heap.validate().unwrap();

        assert_eq!(heap.delete_min(), Ok((0, 5)));
        assert_eq!(
            heap.insert(1, 4),
            Err(QueueError::BelowFence { key: 4, fence: 5 })
        );
        heap.validate().unwrap();
    }
}
