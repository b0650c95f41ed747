use std::sync::Arc;

use crate::free_list::FreeList;

/// Per-tree mutation identity.
///
/// Every tree handle owns exactly one token at a time, and every node is
/// stamped with (a weak reference to) the token of the tree that last
/// mutated it. A node may be mutated in place only when its stamp matches
/// the mutating tree's token; cloning a tree retires both handles' tokens,
/// which is what forces the next write on either side to copy.
///
/// The token also carries the free list all node acquisitions and releases
/// for this tree go through.
pub(crate) struct CowCtx<T> {
    pub(crate) free_list: Arc<FreeList<T>>,
}

/// Shared handle to a [`CowCtx`]; identity is the `Arc` allocation.
pub(crate) type CowRef<T> = Arc<CowCtx<T>>;

impl<T> CowCtx<T> {
    /// Mints a fresh token backed by `free_list`.
    pub(crate) fn mint(free_list: Arc<FreeList<T>>) -> CowRef<T> {
        Arc::new(CowCtx { free_list })
    }
}
