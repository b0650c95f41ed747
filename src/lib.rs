//! Copy-on-write B-tree collections for Rust.
//!
//! This crate provides [`CowBTree`], an in-memory ordered container with
//! O(1) logical cloning. A clone shares structure with the original; the
//! first write on either side copies only the nodes along the mutated path,
//! so every handle keeps an independent, consistent view:
//!
//! ```
//! use cowtree::CowBTree;
//!
//! let mut tree = CowBTree::new(32);
//! for i in 0..1000_i64 {
//!     tree.insert(i);
//! }
//!
//! // O(1): no items are copied at the clone point.
//! let mut snapshot = tree.clone();
//!
//! tree.remove(&500);
//! snapshot.insert(1000);
//!
//! assert_eq!(tree.len(), 999);
//! assert_eq!(snapshot.len(), 1001);
//! assert_eq!(snapshot.get(&500), Some(&500));
//! ```
//!
//! # Features
//!
//! - **O(1) snapshot clones** - structural sharing with copy-on-write
//!   materialization; clones may be mutated from different threads
//! - **Bidirectional bounded iteration** - eight range entry points
//!   ([`ascend_range`](CowBTree::ascend_range),
//!   [`descend_less_or_equal`](CowBTree::descend_less_or_equal), ...) with
//!   visitor-driven early termination, plus a borrowing
//!   [`iter`](CowBTree::iter)
//! - **Node recycling** - an optional shared [`FreeList`] amortizes node
//!   allocation across trees and across [`clear`](CowBTree::clear)/rebuild
//!   cycles
//! - **Caller-defined ordering** - items implement [`Item`] and are compared
//!   strictly by their embedded key
//!
//! # Implementation
//!
//! The container is a B-tree of runtime degree `d`: every node holds between
//! `d - 1` and `2d - 1` items (the root may underflow) and items live in
//! internal nodes as well as leaves. Nodes are reference-counted and stamped
//! with the identity of the tree that last mutated them; a tree mutates a
//! node in place only when the stamp matches its own identity, and
//! shallow-copies the node first otherwise. Cloning a tree therefore only
//! mints two fresh identities and shares the root.
//!
//! Copies and discarded nodes are routed through a bounded [`FreeList`] so
//! that steady-state churn (clone, mutate, drop) reuses node buffers instead
//! of reallocating them.

#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]

mod item;
mod raw;

pub mod free_list;
pub mod tree;

pub use free_list::{FreeList, DEFAULT_FREE_LIST_SIZE};
pub use item::Item;
pub use tree::CowBTree;
