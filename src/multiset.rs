//! A concurrently shared ordered multiset of strings.
//!
//! The multiset is a binary search tree with one node per distinct value and a per-node
//! occurrence count, guarded as a whole by a single
//! [`AdmissionGate`](crate::sync::AdmissionGate): queries run concurrently, mutations run
//! alone.

use std::cmp::Ordering;

use crate::sync::AdmissionGate;

/// A node of the search tree: one distinct value and its occurrence count.
///
/// Nodes are exclusively owned by their parent; the tree keeps the strict binary-search-tree
/// ordering of values under ordinal comparison between operations.
struct Node {
    value: String,
    count: usize,
    left: Option<Box<Node>>,
    right: Option<Box<Node>>,
}

impl Node {
    fn leaf(value: String) -> Box<Self> {
        Box::new(Self {
            value,
            count: 1,
            left: None,
            right: None,
        })
    }
}

/// An ordered multiset of strings.
///
/// Values are ordered by ordinal (byte-wise) comparison; duplicate insertions of an equal
/// value aggregate into one node's count rather than growing the tree.
/// The tree is unbalanced: shape follows insertion order.
///
/// All operations take tree-wide admission on one gate, so any number of
/// [`search`](Multiset::search) and traversal calls run concurrently while
/// [`add`](Multiset::add) and [`delete`](Multiset::delete) exclude everything else.
///
/// ```rust
/// use gridlock::multiset::Multiset;
///
/// let multiset = Multiset::new();
/// multiset.add("b");
/// multiset.add("a");
/// multiset.add("b");
/// assert_eq!(multiset.search("b"), 2);
/// multiset.delete("b");
/// assert_eq!(multiset.search("b"), 1);
/// assert_eq!(
///     multiset.sorted_entries(),
///     vec![("a".to_string(), 1), ("b".to_string(), 1)]
/// );
/// ```
#[derive(Debug)]
pub struct Multiset {
    root: AdmissionGate<Option<Box<Node>>>,
}

impl Multiset {
    /// Create an empty multiset.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            root: AdmissionGate::new(None),
        }
    }

    /// Insert one occurrence of `value`.
    ///
    /// An existing node's count is incremented; otherwise a leaf is inserted at the ordinal
    /// position of `value`.
    pub fn add(&self, value: impl Into<String>) {
        let value = value.into();
        let mut root = self.root.write();
        insert(&mut root, value);
    }

    /// Remove one occurrence of `value`.
    ///
    /// Absent values are ignored.
    /// Removing the last occurrence splices the node out of the tree; a node with two children
    /// is replaced by its in-order successor, whose value and count move up whole while the
    /// successor's node is excised from the right subtree.
    pub fn delete(&self, value: &str) {
        let mut root = self.root.write();
        remove(&mut root, value);
    }

    /// The number of occurrences of `value`, zero if absent.
    #[must_use]
    pub fn search(&self, value: &str) -> usize {
        let root = self.root.read();
        count_of(&root, value)
    }

    /// All `(value, count)` pairs in ascending ordinal order.
    #[must_use]
    pub fn sorted_entries(&self) -> Vec<(String, usize)> {
        let root = self.root.read();
        let mut entries = Vec::new();
        collect_in_order(&root, &mut entries);
        entries
    }

    /// The total number of occurrences across all values.
    #[must_use]
    pub fn len(&self) -> usize {
        let root = self.root.read();
        totals(&root).0
    }

    /// The number of distinct values.
    #[must_use]
    pub fn distinct_len(&self) -> usize {
        let root = self.root.read();
        totals(&root).1
    }

    /// Whether the multiset holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.read().is_none()
    }
}

impl Default for Multiset {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Multiset {
    /// Format as one `value (count)` line per distinct value, in ascending order.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (value, count) in self.sorted_entries() {
            writeln!(f, "{value} ({count})")?;
        }
        Ok(())
    }
}

fn insert(tree: &mut Option<Box<Node>>, value: String) {
    match tree {
        None => *tree = Some(Node::leaf(value)),
        Some(node) => match value.as_str().cmp(node.value.as_str()) {
            Ordering::Equal => node.count += 1,
            Ordering::Less => insert(&mut node.left, value),
            Ordering::Greater => insert(&mut node.right, value),
        },
    }
}

fn remove(tree: &mut Option<Box<Node>>, value: &str) {
    let Some(node) = tree else {
        return;
    };
    match value.cmp(node.value.as_str()) {
        Ordering::Less => remove(&mut node.left, value),
        Ordering::Greater => remove(&mut node.right, value),
        Ordering::Equal => {
            if node.count > 1 {
                node.count -= 1;
            } else if node.left.is_none() {
                let right = node.right.take();
                *tree = right;
            } else if node.right.is_none() {
                let left = node.left.take();
                *tree = left;
            } else if let Some((value, count)) = take_min(&mut node.right) {
                node.value = value;
                node.count = count;
            }
        }
    }
}

/// Remove the minimum node of the subtree, returning its value and count.
fn take_min(tree: &mut Option<Box<Node>>) -> Option<(String, usize)> {
    let node = tree.as_mut()?;
    if node.left.is_some() {
        take_min(&mut node.left)
    } else {
        let node = tree.take()?;
        *tree = node.right;
        Some((node.value, node.count))
    }
}

fn count_of(tree: &Option<Box<Node>>, value: &str) -> usize {
    match tree {
        None => 0,
        Some(node) => match value.cmp(node.value.as_str()) {
            Ordering::Equal => node.count,
            Ordering::Less => count_of(&node.left, value),
            Ordering::Greater => count_of(&node.right, value),
        },
    }
}

fn collect_in_order(tree: &Option<Box<Node>>, entries: &mut Vec<(String, usize)>) {
    if let Some(node) = tree {
        collect_in_order(&node.left, entries);
        entries.push((node.value.clone(), node.count));
        collect_in_order(&node.right, entries);
    }
}

/// Total occurrences and distinct values of the subtree.
fn totals(tree: &Option<Box<Node>>) -> (usize, usize) {
    match tree {
        None => (0, 0),
        Some(node) => {
            let (left_total, left_distinct) = totals(&node.left);
            let (right_total, right_distinct) = totals(&node.right);
            (
                left_total + node.count + right_total,
                left_distinct + 1 + right_distinct,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiset_counts() {
        let multiset = Multiset::new();
        assert!(multiset.is_empty());
        assert_eq!(multiset.search("b"), 0);

        multiset.add("b");
        multiset.add("a");
        multiset.add("b");
        assert_eq!(multiset.search("b"), 2);
        assert_eq!(multiset.search("a"), 1);
        assert_eq!(multiset.search("c"), 0);
        assert_eq!(multiset.len(), 3);
        assert_eq!(multiset.distinct_len(), 2);

        multiset.delete("b");
        assert_eq!(multiset.search("b"), 1);
        multiset.delete("b");
        assert_eq!(multiset.search("b"), 0);
        assert_eq!(
            multiset.sorted_entries(),
            vec![("a".to_string(), 1)]
        );

        multiset.delete("a");
        assert!(multiset.is_empty());
    }

    #[test]
    fn multiset_delete_edge_cases() {
        let multiset = Multiset::new();
        // Deleting from an empty tree and deleting an absent value are no-ops.
        multiset.delete("x");
        multiset.add("m");
        multiset.delete("x");
        assert_eq!(multiset.len(), 1);

        // One-child splice.
        multiset.add("f");
        multiset.add("c");
        multiset.delete("f");
        assert_eq!(
            multiset.sorted_entries(),
            vec![("c".to_string(), 1), ("m".to_string(), 1)]
        );
    }

    #[test]
    fn multiset_delete_two_children_uses_successor() {
        let multiset = Multiset::new();
        multiset.add("m");
        multiset.add("f");
        multiset.add("t");
        multiset.add("p");
        multiset.add("p");

        // "m" has two children; its in-order successor "p" carries a count of two, which must
        // move up whole, leaving exactly one node per value.
        multiset.delete("m");
        assert_eq!(multiset.search("p"), 2);
        assert_eq!(
            multiset.sorted_entries(),
            vec![
                ("f".to_string(), 1),
                ("p".to_string(), 2),
                ("t".to_string(), 1)
            ]
        );
        assert_eq!(multiset.len(), 4);
        assert_eq!(multiset.distinct_len(), 3);
    }

    #[test]
    fn multiset_sorted_order() {
        let multiset = Multiset::new();
        for value in ["pear", "apple", "plum", "apple", "fig"] {
            multiset.add(value);
        }
        assert_eq!(
            multiset.sorted_entries(),
            vec![
                ("apple".to_string(), 2),
                ("fig".to_string(), 1),
                ("pear".to_string(), 1),
                ("plum".to_string(), 1)
            ]
        );
        assert_eq!(multiset.to_string(), "apple (2)\nfig (1)\npear (1)\nplum (1)\n");
    }

    #[test]
    fn multiset_ordinal_comparison() {
        let multiset = Multiset::new();
        multiset.add("Zebra");
        multiset.add("apple");
        // Ordinal order puts all uppercase before lowercase.
        assert_eq!(
            multiset.sorted_entries(),
            vec![("Zebra".to_string(), 1), ("apple".to_string(), 1)]
        );
        assert_eq!(multiset.search("zebra"), 0);
    }
}
