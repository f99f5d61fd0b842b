//! Ordered Index Module
//!
//! Unbalanced binary search tree keyed by `Ord`, guarded by a single
//! exclusive lock.
//!
//! Insertion order is preserved structurally: feeding keys in ascending
//! order produces a right-leaning chain with linear lookups. No rebalancing
//! is performed.

use std::borrow::Borrow;
use std::cmp::Ordering;

use parking_lot::Mutex;
use tracing::trace;

type Link<T> = Option<Box<IndexNode<T>>>;

// == Index Node ==
struct IndexNode<T> {
    element: T,
    left: Link<T>,
    right: Link<T>,
}

impl<T> IndexNode<T> {
    fn leaf(element: T) -> Box<Self> {
        Box::new(Self {
            element,
            left: None,
            right: None,
        })
    }
}

struct Tree<T> {
    root: Link<T>,
    len: usize,
}

// == Ordered Index ==
/// Set of elements ordered by their `Ord` implementation.
///
/// Elements comparing equal never coexist: the first insertion of a key
/// wins and later equal insertions are dropped without touching the stored
/// element. Every operation takes the same exclusive lock.
pub struct OrderedIndex<T> {
    tree: Mutex<Tree<T>>,
}

impl<T> Default for OrderedIndex<T> {
    fn default() -> Self {
        Self {
            tree: Mutex::new(Tree { root: None, len: 0 }),
        }
    }
}

impl<T: Ord> OrderedIndex<T> {
    // == Constructor ==
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    // == Insert ==
    /// Inserts `element` at the empty slot its key descends to.
    ///
    /// If an element with an equal key is met on the way down, `element`
    /// is discarded and the stored one is left as is.
    pub fn insert(&self, element: T) {
        let mut guard = self.tree.lock();
        let tree = &mut *guard;

        let mut slot = &mut tree.root;
        while let Some(node) = slot {
            slot = match element.cmp(&node.element) {
                Ordering::Less => &mut node.left,
                Ordering::Greater => &mut node.right,
                Ordering::Equal => {
                    trace!("Index insert dropped duplicate key");
                    return;
                }
            };
        }

        *slot = Some(IndexNode::leaf(element));
        tree.len += 1;
    }

    // == Search ==
    /// Returns a clone of the stored element whose key equals `key`.
    pub fn search<Q>(&self, key: &Q) -> Option<T>
    where
        T: Borrow<Q> + Clone,
        Q: Ord + ?Sized,
    {
        let tree = self.tree.lock();

        let mut current = tree.root.as_deref();
        while let Some(node) = current {
            current = match key.cmp(node.element.borrow()) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => return Some(node.element.clone()),
            };
        }

        None
    }
}

impl<T> OrderedIndex<T> {
    // == Clear ==
    /// Discards every element.
    pub fn clear(&self) {
        let detached = {
            let mut tree = self.tree.lock();
            tree.len = 0;
            tree.root.take()
        };
        teardown(detached);
        trace!("Index cleared");
    }

    // == Length ==
    /// Returns the number of stored elements.
    pub fn len(&self) -> usize {
        self.tree.lock().len
    }

    // == Is Empty ==
    /// Returns true if the index holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // == Depth ==
    /// Returns the length of the longest root-to-leaf path.
    ///
    /// Equals `len()` when keys were inserted in sorted order.
    pub fn depth(&self) -> usize {
        let tree = self.tree.lock();

        let mut deepest = 0;
        let mut pending: Vec<(&IndexNode<T>, usize)> = Vec::new();
        if let Some(root) = tree.root.as_deref() {
            pending.push((root, 1));
        }
        while let Some((node, level)) = pending.pop() {
            deepest = deepest.max(level);
            pending.extend(node.left.as_deref().map(|child| (child, level + 1)));
            pending.extend(node.right.as_deref().map(|child| (child, level + 1)));
        }
        deepest
    }
}

impl<T> Drop for OrderedIndex<T> {
    fn drop(&mut self) {
        teardown(self.tree.get_mut().root.take());
    }
}

/// Frees a subtree without recursing, so degenerate chains cannot exhaust
/// the stack.
fn teardown<T>(root: Link<T>) {
    let mut pending: Vec<Box<IndexNode<T>>> = root.into_iter().collect();
    while let Some(mut node) = pending.pop() {
        pending.extend(node.left.take());
        pending.extend(node.right.take());
    }
}
