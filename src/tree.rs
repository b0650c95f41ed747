//! The public tree handle and its iteration surface.

use core::fmt;
use core::iter::FusedIterator;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::free_list::FreeList;
use crate::item::Item;
use crate::raw::{CowCtx, CowRef, Direction, Node, Remove};

/// An ordered container of [`Item`]s with copy-on-write snapshot clones.
///
/// `CowBTree` is a B-tree of caller-chosen degree `d`: every node holds
/// `d - 1` to `2d - 1` items and lookups, insertions, and removals are
/// O(log n). It stores at most one item per key; inserting an item whose
/// key is already present replaces the stored item and hands it back.
///
/// # Cloning
///
/// [`clone`](CowBTree::clone) is O(1): the new handle shares the tree
/// structure with the original, and each side copies a node only when it
/// first mutates it. Both handles remain fully independent containers and
/// may be used (one thread per handle) concurrently:
///
/// ```
/// use cowtree::CowBTree;
///
/// let mut tree = CowBTree::new(8);
/// for i in 0..100_i64 {
///     tree.insert(i);
/// }
///
/// let snapshot = tree.clone();
/// tree.remove(&42);
///
/// assert!(!tree.contains(&42));
/// assert!(snapshot.contains(&42));
/// ```
///
/// # Iteration
///
/// Range traversal is visitor-based: eight entry points cover both
/// directions with inclusive/exclusive bounds, and the visitor stops the
/// walk by returning `false`. An ascending borrowing iterator is also
/// available via [`iter`](CowBTree::iter):
///
/// ```
/// use cowtree::CowBTree;
///
/// let mut tree = CowBTree::new(4);
/// for i in [3, 1, 4, 1, 5, 9, 2, 6_i64] {
///     tree.insert(i);
/// }
///
/// let mut up_to_four = Vec::new();
/// tree.ascend(|&item| {
///     up_to_four.push(item);
///     item < 4
/// });
/// assert_eq!(up_to_four, [1, 2, 3, 4]);
///
/// let all: Vec<i64> = tree.iter().copied().collect();
/// assert_eq!(all, [1, 2, 3, 4, 5, 6, 9]);
/// ```
///
/// # Node recycling
///
/// Trees acquire and release nodes through a bounded [`FreeList`], either a
/// private one ([`new`](CowBTree::new)) or a shared one
/// ([`with_free_list`](CowBTree::with_free_list)). [`clear`](CowBTree::clear)
/// can return a dropped tree's nodes to the list so a rebuild reuses their
/// buffers.
pub struct CowBTree<T> {
    degree: usize,
    length: usize,
    root: Option<Arc<Node<T>>>,
    cow: CowRef<T>,
}

impl<T: Item> CowBTree<T> {
    /// Creates an empty tree of the given degree with a private free list
    /// of the default capacity.
    ///
    /// `degree` bounds node fill: nodes hold `degree - 1` to
    /// `2 * degree - 1` items. Degree 2 gives a 2-3-4 tree; larger degrees
    /// trade comparison count for cache-friendlier nodes.
    ///
    /// # Panics
    ///
    /// Panics if `degree < 2`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cowtree::CowBTree;
    ///
    /// let tree: CowBTree<i64> = CowBTree::new(32);
    /// assert!(tree.is_empty());
    /// ```
    #[must_use]
    pub fn new(degree: usize) -> Self {
        Self::with_free_list(degree, Arc::new(FreeList::default()))
    }

    /// Creates an empty tree of the given degree whose node acquisitions
    /// and releases go through `free_list`, which may be shared with other
    /// trees.
    ///
    /// # Panics
    ///
    /// Panics if `degree < 2`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use cowtree::{CowBTree, FreeList};
    ///
    /// let pool = Arc::new(FreeList::new(128));
    /// let tree: CowBTree<i64> = CowBTree::with_free_list(8, pool);
    /// assert_eq!(tree.degree(), 8);
    /// ```
    #[must_use]
    pub fn with_free_list(degree: usize, free_list: Arc<FreeList<T>>) -> Self {
        assert!(degree >= 2, "`CowBTree::new()` - degree must be at least 2!");
        Self {
            degree,
            length: 0,
            root: None,
            cow: CowCtx::mint(free_list),
        }
    }

    /// Returns the tree's degree.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Returns the number of items in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.length
    }

    /// Returns true if the tree holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    const fn max_items(&self) -> usize {
        2 * self.degree - 1
    }

    const fn min_items(&self) -> usize {
        self.degree - 1
    }

    /// Returns the stored item equal to `key`, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use cowtree::CowBTree;
    ///
    /// let mut tree = CowBTree::new(2);
    /// tree.insert(7_i64);
    /// assert_eq!(tree.get(&7), Some(&7));
    /// assert_eq!(tree.get(&8), None);
    /// ```
    #[must_use]
    pub fn get(&self, key: &T) -> Option<&T> {
        self.root.as_deref()?.get(key)
    }

    /// Returns true if an item equal to `key` is stored.
    #[must_use]
    pub fn contains(&self, key: &T) -> bool {
        self.get(key).is_some()
    }

    /// Returns the smallest item, or `None` if the tree is empty.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.root.as_deref()?.first()
    }

    /// Returns the largest item, or `None` if the tree is empty.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.root.as_deref()?.last()
    }

    /// Inserts `item`, replacing and returning the stored item equal to it
    /// if one exists. The length grows exactly when `None` is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use cowtree::CowBTree;
    ///
    /// let mut tree = CowBTree::new(4);
    /// assert_eq!(tree.insert(3_i64), None);
    /// assert_eq!(tree.insert(3), Some(3));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert(&mut self, item: T) -> Option<T> {
        let max_items = self.max_items();
        if self.root.is_none() {
            self.root = Some(Node::new_leaf(&self.cow, item));
            self.length = 1;
            return None;
        }
        if self
            .root
            .as_deref()
            .is_some_and(|root| root.item_count() >= max_items)
        {
            // Full root: grow a level, then split the old root under it.
            let mut left = self
                .root
                .take()
                .expect("`CowBTree::insert()` - root vanished during split!");
            let (median, right) = Node::make_mut(&mut left, &self.cow).split(max_items / 2, &self.cow);
            self.root = Some(Node::new_root(&self.cow, median, left, right));
        }
        let root = self
            .root
            .as_mut()
            .expect("`CowBTree::insert()` - missing root!");
        let displaced = Node::make_mut(root, &self.cow).insert(item, max_items, &self.cow);
        if displaced.is_none() {
            self.length += 1;
        }
        displaced
    }

    /// Removes and returns the stored item equal to `key`, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use cowtree::CowBTree;
    ///
    /// let mut tree = CowBTree::new(4);
    /// tree.insert(3_i64);
    /// assert_eq!(tree.remove(&3), Some(3));
    /// assert_eq!(tree.remove(&3), None);
    /// ```
    pub fn remove(&mut self, key: &T) -> Option<T> {
        self.remove_inner(Remove::Key(key))
    }

    /// Removes and returns the smallest item, or `None` if the tree is
    /// empty.
    pub fn pop_first(&mut self) -> Option<T> {
        self.remove_inner(Remove::Min)
    }

    /// Removes and returns the largest item, or `None` if the tree is
    /// empty.
    pub fn pop_last(&mut self) -> Option<T> {
        self.remove_inner(Remove::Max)
    }

    fn remove_inner(&mut self, what: Remove<'_, T>) -> Option<T> {
        let min_items = self.min_items();
        let out = {
            let root = self.root.as_mut()?;
            if root.item_count() == 0 {
                return None;
            }
            Node::make_mut(root, &self.cow).remove(what, min_items, &self.cow)
        };
        let collapse = self
            .root
            .as_deref()
            .is_some_and(|root| root.item_count() == 0 && root.child_count() > 0);
        if collapse {
            let shell = self
                .root
                .take()
                .expect("`CowBTree::remove()` - root vanished during collapse!");
            self.root = Some(Node::collapse_root(shell, &self.cow));
        }
        if out.is_some() {
            self.length -= 1;
        }
        out
    }

    /// Clones the tree in O(1) by sharing its structure.
    ///
    /// Both the original and the returned tree behave as independent
    /// containers from this point on: a node is copied (through the shared
    /// free list) the first time either side mutates it. The two handles
    /// may be moved to different threads.
    ///
    /// # Examples
    ///
    /// ```
    /// use cowtree::CowBTree;
    ///
    /// let mut tree = CowBTree::new(8);
    /// for i in 0..50_i64 {
    ///     tree.insert(i);
    /// }
    ///
    /// let mut snapshot = tree.clone();
    /// snapshot.insert(50);
    ///
    /// assert_eq!(tree.len(), 50);
    /// assert_eq!(snapshot.len(), 51);
    /// ```
    // Not `impl Clone`: the clone point must retire the source tree's
    // mutation token as well, which needs `&mut self`.
    #[allow(clippy::should_implement_trait)]
    pub fn clone(&mut self) -> Self {
        let free_list = Arc::clone(&self.cow.free_list);
        self.cow = CowCtx::mint(Arc::clone(&free_list));
        Self {
            degree: self.degree,
            length: self.length,
            root: self.root.clone(),
            cow: CowCtx::mint(free_list),
        }
    }

    /// Removes every item.
    ///
    /// With `to_free_list` set, the tree walks its nodes and returns the
    /// uniquely held ones to the free list until the list is full; nodes
    /// still shared with clones are dropped by reference count instead.
    /// With it unset the root is simply dropped, which is faster when the
    /// nodes are not worth keeping.
    ///
    /// # Examples
    ///
    /// ```
    /// use cowtree::CowBTree;
    ///
    /// let mut tree = CowBTree::new(2);
    /// for i in 0..100_i64 {
    ///     tree.insert(i);
    /// }
    /// tree.clear(true);
    /// assert!(tree.is_empty());
    /// assert_eq!(tree.first(), None);
    /// ```
    pub fn clear(&mut self, to_free_list: bool) {
        if let Some(root) = self.root.take() {
            if to_free_list {
                Node::reset(root, &self.cow);
            }
        }
        self.length = 0;
    }

    fn iterate<F>(
        &self,
        dir: Direction,
        start: Option<&T>,
        stop: Option<&T>,
        include_start: bool,
        visit: &mut F,
    ) where
        F: FnMut(&T) -> bool,
    {
        if let Some(root) = self.root.as_deref() {
            let mut hit = false;
            root.iterate(dir, start, stop, include_start, &mut hit, visit);
        }
    }

    /// Visits every item in ascending order until `visit` returns false.
    ///
    /// # Examples
    ///
    /// ```
    /// use cowtree::CowBTree;
    ///
    /// let mut tree = CowBTree::new(4);
    /// for i in [5, 2, 8, 1_i64] {
    ///     tree.insert(i);
    /// }
    ///
    /// let mut seen = Vec::new();
    /// tree.ascend(|&item| {
    ///     seen.push(item);
    ///     true
    /// });
    /// assert_eq!(seen, [1, 2, 5, 8]);
    /// ```
    pub fn ascend<F>(&self, mut visit: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.iterate(Direction::Ascending, None, None, false, &mut visit);
    }

    /// Visits every item in `[greater_or_equal, less_than)` in ascending
    /// order until `visit` returns false.
    ///
    /// # Examples
    ///
    /// ```
    /// use cowtree::CowBTree;
    ///
    /// let mut tree = CowBTree::new(4);
    /// for i in 0..10_i64 {
    ///     tree.insert(i);
    /// }
    ///
    /// let mut seen = Vec::new();
    /// tree.ascend_range(&3, &7, |&item| {
    ///     seen.push(item);
    ///     true
    /// });
    /// assert_eq!(seen, [3, 4, 5, 6]);
    /// ```
    pub fn ascend_range<F>(&self, greater_or_equal: &T, less_than: &T, mut visit: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.iterate(
            Direction::Ascending,
            Some(greater_or_equal),
            Some(less_than),
            true,
            &mut visit,
        );
    }

    /// Visits every item strictly below `less_than` in ascending order
    /// until `visit` returns false.
    pub fn ascend_less_than<F>(&self, less_than: &T, mut visit: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.iterate(Direction::Ascending, None, Some(less_than), false, &mut visit);
    }

    /// Visits every item at or above `greater_or_equal` in ascending order
    /// until `visit` returns false.
    pub fn ascend_greater_or_equal<F>(&self, greater_or_equal: &T, mut visit: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.iterate(
            Direction::Ascending,
            Some(greater_or_equal),
            None,
            true,
            &mut visit,
        );
    }

    /// Visits every item in descending order until `visit` returns false.
    ///
    /// # Examples
    ///
    /// ```
    /// use cowtree::CowBTree;
    ///
    /// let mut tree = CowBTree::new(4);
    /// for i in [5, 2, 8, 1_i64] {
    ///     tree.insert(i);
    /// }
    ///
    /// let mut seen = Vec::new();
    /// tree.descend(|&item| {
    ///     seen.push(item);
    ///     true
    /// });
    /// assert_eq!(seen, [8, 5, 2, 1]);
    /// ```
    pub fn descend<F>(&self, mut visit: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.iterate(Direction::Descending, None, None, false, &mut visit);
    }

    /// Visits every item in `(greater_than, less_or_equal]` in descending
    /// order until `visit` returns false.
    ///
    /// # Examples
    ///
    /// ```
    /// use cowtree::CowBTree;
    ///
    /// let mut tree = CowBTree::new(4);
    /// for i in 0..10_i64 {
    ///     tree.insert(i);
    /// }
    ///
    /// let mut seen = Vec::new();
    /// tree.descend_range(&7, &3, |&item| {
    ///     seen.push(item);
    ///     true
    /// });
    /// assert_eq!(seen, [7, 6, 5, 4]);
    /// ```
    pub fn descend_range<F>(&self, less_or_equal: &T, greater_than: &T, mut visit: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.iterate(
            Direction::Descending,
            Some(less_or_equal),
            Some(greater_than),
            true,
            &mut visit,
        );
    }

    /// Visits every item at or below `less_or_equal` in descending order
    /// until `visit` returns false.
    pub fn descend_less_or_equal<F>(&self, less_or_equal: &T, mut visit: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.iterate(
            Direction::Descending,
            Some(less_or_equal),
            None,
            true,
            &mut visit,
        );
    }

    /// Visits every item strictly above `greater_than` in descending order
    /// until `visit` returns false.
    pub fn descend_greater_than<F>(&self, greater_than: &T, mut visit: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.iterate(
            Direction::Descending,
            None,
            Some(greater_than),
            false,
            &mut visit,
        );
    }

    /// Returns an ascending iterator over the items.
    ///
    /// # Examples
    ///
    /// ```
    /// use cowtree::CowBTree;
    ///
    /// let mut tree = CowBTree::new(4);
    /// for i in [2, 9, 4_i64] {
    ///     tree.insert(i);
    /// }
    /// let items: Vec<i64> = tree.iter().copied().collect();
    /// assert_eq!(items, [2, 4, 9]);
    /// ```
    #[must_use]
    pub fn iter(&self) -> Iter<'_, T> {
        let mut iter = Iter {
            stack: SmallVec::new(),
            remaining: self.length,
        };
        if let Some(root) = self.root.as_deref() {
            iter.push_left_spine(root);
        }
        iter
    }
}

impl<T: Item + fmt::Debug> fmt::Debug for CowBTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<'a, T: Item> IntoIterator for &'a CowBTree<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

/// An ascending iterator over the items of a [`CowBTree`].
///
/// Created by [`CowBTree::iter`]. Yields the same sequence an unbounded
/// [`ascend`](CowBTree::ascend) would visit.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T> {
    // In-order descent stack: each frame is a node and the index of the
    // next item to yield from it.
    stack: SmallVec<[(&'a Node<T>, usize); 16]>,
    remaining: usize,
}

impl<'a, T: Item> Iter<'a, T> {
    fn push_left_spine(&mut self, mut node: &'a Node<T>) {
        loop {
            self.stack.push((node, 0));
            if node.child_count() == 0 {
                break;
            }
            node = node.child(0);
        }
    }
}

impl<'a, T: Item> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        loop {
            let (node, index) = *self.stack.last()?;
            if index < node.item_count() {
                self.stack
                    .last_mut()
                    .expect("`Iter::next()` - descent stack emptied mid-step!")
                    .1 += 1;
                if node.child_count() > 0 {
                    self.push_left_spine(node.child(index + 1));
                }
                self.remaining -= 1;
                return Some(node.item(index));
            }
            self.stack.pop();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T: Item> ExactSizeIterator for Iter<'_, T> {}

impl<T: Item> FusedIterator for Iter<'_, T> {}
