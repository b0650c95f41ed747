//! Bounded recycling pool for tree nodes.
//!
//! Trees route every node acquisition and release through a [`FreeList`].
//! A released node keeps the heap buffers behind its item and child
//! sequences, so reusing it skips the initial growth a fresh node would pay
//! for. The pool is bounded and best-effort: once it holds
//! [`capacity`](FreeList::capacity) nodes, further releases simply drop the
//! node, and no ordering is guaranteed on which pooled node an acquisition
//! returns.
//!
//! One free list may back any number of trees (clones always share their
//! source's list). The internal buffer is guarded by a single mutex, which
//! is off the hot path: lookups and iteration never touch the pool.

use parking_lot::Mutex;

use crate::raw::Node;

/// Pool capacity used by trees that are not given an explicit free list.
pub const DEFAULT_FREE_LIST_SIZE: usize = 32;

/// A bounded pool of detached tree nodes.
///
/// Wrap it in an [`Arc`](std::sync::Arc) and pass it to
/// [`CowBTree::with_free_list`](crate::CowBTree::with_free_list) to share
/// one pool across several trees:
///
/// ```
/// use std::sync::Arc;
/// use cowtree::{CowBTree, FreeList};
///
/// let pool = Arc::new(FreeList::new(64));
/// let mut a: CowBTree<i64> = CowBTree::with_free_list(8, Arc::clone(&pool));
/// let mut b: CowBTree<i64> = CowBTree::with_free_list(8, Arc::clone(&pool));
///
/// for i in 0..1000 {
///     a.insert(i);
/// }
/// // Returns a's nodes to the pool; b's next growth spurt reuses them.
/// a.clear(true);
/// assert!(!pool.is_empty());
/// for i in 0..1000 {
///     b.insert(i);
/// }
/// ```
pub struct FreeList<T> {
    nodes: Mutex<Vec<Node<T>>>,
    capacity: usize,
}

impl<T> FreeList<T> {
    /// Creates a pool that retains at most `capacity` nodes.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            nodes: Mutex::new(Vec::with_capacity(capacity)),
            capacity,
        }
    }

    /// Returns the maximum number of nodes the pool retains.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of nodes currently pooled.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.lock().len()
    }

    /// Returns true if no nodes are currently pooled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Hands out a pooled node, or a fresh one when the pool is empty.
    /// The returned node is detached: empty sequences, no cow stamp.
    pub(crate) fn acquire(&self) -> Node<T> {
        self.nodes.lock().pop().unwrap_or_else(Node::detached)
    }

    /// Stores `node` if spare capacity remains and reports whether it was
    /// kept. The node is recycled (sequences truncated, stamp cleared)
    /// either way; a rejected node is simply dropped.
    pub(crate) fn release(&self, mut node: Node<T>) -> bool {
        node.recycle();
        let mut nodes = self.nodes.lock();
        if nodes.len() < self.capacity {
            nodes.push(node);
            true
        } else {
            false
        }
    }
}

impl<T> Default for FreeList<T> {
    fn default() -> Self {
        Self::new(DEFAULT_FREE_LIST_SIZE)
    }
}
