//! Broad phase: bounding-interval tree over collider y-extents
//!
//! Colliders never move in world space, so the tree is keyed on world y and
//! survives scrolling untouched. Level objects and spawned hulls tend to
//! arrive in ascending y, so any subtree that grows taller than its height
//! budget is rebuilt around median midpoints.

use super::geometry::Interval;
use crate::consts::INDEX_SPLIT_THRESHOLD;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Entry {
    id: u32,
    space: Interval,
}

/// Tree node. Only leaves hold entries; a node's space always covers every
/// entry beneath it.
#[derive(Debug, Clone)]
struct Node {
    space: Interval,
    entries: Vec<Entry>,
    children: Option<Box<[Node; 2]>>,
    /// Entries in this subtree
    len: usize,
    /// Levels in this subtree (1 for a leaf)
    height: usize,
}

/// Tallest a subtree of `len` entries may grow before it is rebuilt
fn height_budget(len: usize, split_threshold: usize) -> usize {
    let leaves = len.div_ceil(split_threshold).max(1);
    let log2 = (usize::BITS - leaves.leading_zeros()) as usize;
    2 * log2 + 1
}

impl Node {
    fn leaf(entries: Vec<Entry>) -> Self {
        let space = entries
            .iter()
            .map(|e| e.space)
            .reduce(|acc, s| acc.union(&s))
            .unwrap_or(Interval::new(0.0, 0.0));
        Self {
            space,
            len: entries.len(),
            entries,
            children: None,
            height: 1,
        }
    }

    /// Balanced subtree from entries sorted by midpoint
    fn build(mut sorted: Vec<Entry>, split_threshold: usize) -> Self {
        if sorted.len() <= split_threshold {
            return Self::leaf(sorted);
        }
        let upper = sorted.split_off(sorted.len() / 2);
        let lower = Self::build(sorted, split_threshold);
        let upper = Self::build(upper, split_threshold);
        Self {
            space: lower.space.union(&upper.space),
            entries: Vec::new(),
            len: lower.len + upper.len,
            height: 1 + lower.height.max(upper.height),
            children: Some(Box::new([lower, upper])),
        }
    }

    fn insert(&mut self, entry: Entry, split_threshold: usize) {
        self.space = self.space.union(&entry.space);
        self.len += 1;

        match self.children.as_mut() {
            Some(children) => {
                let [left, right] = &mut **children;
                let mid = entry.space.midpoint();
                let left_dist = (left.space.midpoint() - mid).abs();
                let right_dist = (right.space.midpoint() - mid).abs();
                if left_dist < right_dist || (left_dist == right_dist && left.len <= right.len) {
                    left.insert(entry, split_threshold);
                } else {
                    right.insert(entry, split_threshold);
                }
                self.height = 1 + left.height.max(right.height);
            }
            None => {
                self.entries.push(entry);
                if self.entries.len() > split_threshold {
                    self.rebuild(split_threshold);
                }
            }
        }

        if self.height > height_budget(self.len, split_threshold) {
            self.rebuild(split_threshold);
        }
    }

    /// Replace this subtree with a balanced one holding the same entries
    fn rebuild(&mut self, split_threshold: usize) {
        let mut entries = Vec::with_capacity(self.len);
        self.take_entries(&mut entries);
        entries.sort_by(|a, b| a.space.midpoint().total_cmp(&b.space.midpoint()));
        *self = Self::build(entries, split_threshold);
    }

    fn take_entries(&mut self, out: &mut Vec<Entry>) {
        out.append(&mut self.entries);
        if let Some(mut children) = self.children.take() {
            for child in children.iter_mut() {
                child.take_entries(out);
            }
        }
    }

    fn query(&self, range: &Interval, out: &mut Vec<u32>) {
        if self.len == 0 || !self.space.intersects(range) {
            return;
        }
        out.extend(
            self.entries
                .iter()
                .filter(|e| e.space.intersects(range))
                .map(|e| e.id),
        );
        if let Some(children) = &self.children {
            for child in children.iter() {
                child.query(range, out);
            }
        }
    }

    fn remove(&mut self, id: u32, space: &Interval) -> bool {
        if self.len == 0 || !self.space.contains(space) {
            return false;
        }
        if let Some(pos) = self.entries.iter().position(|e| e.id == id) {
            self.entries.remove(pos);
            self.len -= 1;
            return true;
        }
        let Some(children) = self.children.as_mut() else {
            return false;
        };
        if !children.iter_mut().any(|child| child.remove(id, space)) {
            return false;
        }

        self.len -= 1;
        if self.len == 0 {
            self.children = None;
            self.height = 1;
        } else {
            self.height = 1 + children[0].height.max(children[1].height);
        }
        true
    }
}

/// Binary tree of y-intervals answering "which colliders may touch this
/// y-range"
#[derive(Debug, Clone)]
pub struct IntervalTree {
    root: Option<Node>,
    split_threshold: usize,
    len: usize,
}

impl Default for IntervalTree {
    fn default() -> Self {
        Self::new(INDEX_SPLIT_THRESHOLD)
    }
}

impl IntervalTree {
    pub fn new(split_threshold: usize) -> Self {
        Self {
            root: None,
            split_threshold: split_threshold.max(1),
            len: 0,
        }
    }

    /// Insert a collider id with its world y-extent. Ids must be unique.
    pub fn insert(&mut self, id: u32, space: Interval) {
        let entry = Entry { id, space };
        match self.root.as_mut() {
            Some(root) => root.insert(entry, self.split_threshold),
            None => self.root = Some(Node::leaf(vec![entry])),
        }
        self.len += 1;
    }

    /// Remove a collider id; `space` must be the interval it was inserted with
    pub fn remove(&mut self, id: u32, space: Interval) -> bool {
        let removed = self
            .root
            .as_mut()
            .is_some_and(|root| root.remove(id, &space));
        if removed {
            self.len -= 1;
            if self.len == 0 {
                self.root = None;
            }
        }
        removed
    }

    /// Ids whose interval intersects `range`, written into `buf` sorted by id
    pub fn query_into(&self, range: Interval, buf: &mut Vec<u32>) {
        buf.clear();
        if let Some(root) = &self.root {
            root.query(&range, buf);
        }
        buf.sort_unstable();
    }

    /// Ids whose interval intersects `range`, sorted by id
    pub fn query(&self, range: Interval) -> Vec<u32> {
        let mut buf = Vec::new();
        self.query_into(range, &mut buf);
        buf
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Tree height (0 when empty)
    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, |root| root.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn brute_force(entries: &[(u32, Interval)], range: Interval) -> Vec<u32> {
        let mut ids: Vec<u32> = entries
            .iter()
            .filter(|(_, s)| s.intersects(&range))
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }

    #[test]
    fn test_empty_tree() {
        let tree = IntervalTree::default();
        assert!(tree.is_empty());
        assert!(tree.query(Interval::new(0.0, 1000.0)).is_empty());
        assert_eq!(tree.depth(), 0);
    }

    #[test]
    fn test_split_keeps_all_entries() {
        let mut tree = IntervalTree::new(4);
        for i in 0..50u32 {
            let bottom = i as f32 * 64.0;
            tree.insert(i, Interval::new(bottom, bottom + 100.0));
        }
        assert_eq!(tree.len(), 50);
        assert!(tree.depth() > 1);
        let all = tree.query(Interval::new(-1.0, 10_000.0));
        assert_eq!(all, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_query_prunes() {
        let mut tree = IntervalTree::new(2);
        tree.insert(1, Interval::new(0.0, 100.0));
        tree.insert(2, Interval::new(200.0, 300.0));
        tree.insert(3, Interval::new(250.0, 600.0));
        tree.insert(4, Interval::new(1000.0, 1100.0));

        assert_eq!(tree.query(Interval::new(150.0, 260.0)), vec![2, 3]);
        assert_eq!(tree.query(Interval::new(700.0, 900.0)), Vec::<u32>::new());
        // Touching bounds are not an intersection
        assert_eq!(tree.query(Interval::new(100.0, 200.0)), Vec::<u32>::new());
    }

    #[test]
    fn test_ascending_inserts_stay_shallow() {
        let mut tree = IntervalTree::default();
        for i in 0..1000u32 {
            let bottom = i as f32 * 96.0;
            tree.insert(i, Interval::new(bottom, bottom + 96.0));
        }
        assert_eq!(tree.len(), 1000);
        // Balanced, 1000 entries take 8 levels; the budget allows 15
        assert!(tree.depth() <= 15, "depth {}", tree.depth());
        assert_eq!(
            tree.query(Interval::new(95_000.0, 95_100.0)),
            vec![989, 990]
        );
    }

    #[test]
    fn test_descending_inserts_stay_shallow() {
        let mut tree = IntervalTree::new(4);
        for i in (0..500u32).rev() {
            let bottom = i as f32 * 10.0;
            tree.insert(i, Interval::new(bottom, bottom + 30.0));
        }
        assert!(tree.depth() <= height_budget(500, 4), "depth {}", tree.depth());
        assert_eq!(tree.query(Interval::new(-1.0, 5000.0)).len(), 500);
    }

    #[test]
    fn test_remove() {
        let mut tree = IntervalTree::new(2);
        let spaces: Vec<_> = (0..10u32)
            .map(|i| (i, Interval::new(i as f32 * 10.0, i as f32 * 10.0 + 15.0)))
            .collect();
        for &(id, s) in &spaces {
            tree.insert(id, s);
        }

        assert!(tree.remove(3, spaces[3].1));
        assert!(!tree.remove(3, spaces[3].1));
        assert_eq!(tree.len(), 9);
        assert!(!tree.query(Interval::new(-1.0, 200.0)).contains(&3));

        for &(id, s) in &spaces {
            tree.remove(id, s);
        }
        assert!(tree.is_empty());
        assert_eq!(tree.depth(), 0);
    }

    proptest! {
        #[test]
        fn prop_query_matches_brute_force(
            raw in proptest::collection::vec((0.0f32..4000.0, 1.0f32..400.0), 0..120),
            lo in -100.0f32..4400.0,
            span in 0.0f32..900.0,
            threshold in 1usize..10,
        ) {
            let mut tree = IntervalTree::new(threshold);
            let entries: Vec<(u32, Interval)> = raw
                .iter()
                .enumerate()
                .map(|(i, &(bottom, height))| (i as u32, Interval::new(bottom, bottom + height)))
                .collect();
            for &(id, s) in &entries {
                tree.insert(id, s);
            }
            let range = Interval::new(lo, lo + span);
            prop_assert_eq!(tree.query(range), brute_force(&entries, range));
        }
    }
}
