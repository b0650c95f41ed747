/// An ordered item storable in a [`CowBTree`](crate::CowBTree).
///
/// An item carries its own key; the tree compares items strictly by that
/// key, via [`less`](Item::less). Two items `a` and `b` are considered equal
/// when `!a.less(b) && !b.less(a)`, and the tree stores at most one item per
/// equivalence class - inserting an equal item replaces the stored one.
///
/// `less` must define a [strict weak order] with trichotomy over every key
/// the caller actually stores. Violating this (for example with a NaN-style
/// incomparable key) never causes undefined behavior - the crate contains no
/// `unsafe` code - but lookups, ordering, and tree shape become arbitrary.
/// For this reason no impl is provided for `f32`/`f64`; wrap floats in a
/// total order of your own if you need them as keys.
///
/// Items must be [`Clone`]: copy-on-write materialization shallow-copies a
/// node's item sequence. Keep items cheap to clone (or reference-counted)
/// when trees will be cloned heavily.
///
/// # Examples
///
/// An item with a payload, compared by key only:
///
/// ```
/// use cowtree::{CowBTree, Item};
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Entry {
///     key: u64,
///     payload: &'static str,
/// }
///
/// impl Item for Entry {
///     fn less(&self, other: &Self) -> bool {
///         self.key < other.key
///     }
/// }
///
/// let mut tree = CowBTree::new(4);
/// tree.insert(Entry { key: 7, payload: "first" });
///
/// // Same key: the stored item is replaced and handed back.
/// let displaced = tree.insert(Entry { key: 7, payload: "second" });
/// assert_eq!(displaced.unwrap().payload, "first");
/// ```
///
/// [strict weak order]: https://en.wikipedia.org/wiki/Weak_ordering
pub trait Item: Clone {
    /// Returns true if `self` orders strictly before `other`.
    fn less(&self, other: &Self) -> bool;
}

// Ready-made impls for the usual key types, ordered exactly as `Ord`.
macro_rules! impl_item_via_ord {
    ($($t:ty),* $(,)?) => {
        $(
            impl Item for $t {
                #[inline]
                fn less(&self, other: &Self) -> bool {
                    self < other
                }
            }
        )*
    };
}

impl_item_via_ord!(i8, i16, i32, i64, i128, isize);
impl_item_via_ord!(u8, u16, u32, u64, u128, usize);
impl_item_via_ord!(char, String, Vec<u8>);

// Written out by hand: a reference type in an `impl` header needs its
// lifetime named, which the macro's `$t:ty` substitution cannot supply.
impl<'a> Item for &'a str {
    #[inline]
    fn less(&self, other: &Self) -> bool {
        self < other
    }
}
