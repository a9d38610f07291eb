//! Immutable snapshots with staged add/remove deltas
//!
//! A `Snapshot` is a logical view of a set of identifiable items: a lazily
//! materialized base set plus two pending-delta maps. Mutating operations
//! return a new snapshot; the receiver is never changed.

mod base;
mod view;

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use stageset_core_types::{Identifiable, Identity};

use self::base::{BaseCell, Loader, Realize};
use crate::errors::Result;

pub use self::view::LogicalIter;

/// Immutable staged-change view over a set of identifiable items
///
/// A snapshot is composed of a deferred base loader, a materialization
/// cache shared by every snapshot derived from the same root, and two
/// pending-delta maps (`added`, `removed`) keyed by identity. `add` and
/// `remove` derive children that carry the loader and cache forward by
/// reference and fresh copies of the deltas; the deltas are kept disjoint
/// by the cancellation rule (adding a pending-removed identity cancels the
/// removal, and vice versa).
///
/// Identity is the sole equality key: two items with equal identities are
/// the same entry regardless of their other attributes.
///
/// Not thread-safe (`Rc`/`RefCell` inside) - a lineage is designed to be
/// driven by a single logical thread of control.
pub struct Snapshot<T: 'static> {
    loader: Loader<T>,
    base: BaseCell<T>,
    added: IndexMap<Identity, T>,
    removed: IndexMap<Identity, T>,
}

impl<T: Identifiable + Clone + 'static> Snapshot<T> {
    /// Create a root snapshot over a deferred base loader
    ///
    /// The loader is a zero-argument supplier of the base item sequence. It
    /// is invoked lazily, and at most once across the whole lineage as long
    /// as every pass consumes its sequence to the end; see
    /// [`Snapshot::iter`] for the partial-consumption caveat.
    pub fn new<F, I>(loader: F) -> Self
    where
        F: Fn() -> I + 'static,
        I: IntoIterator<Item = Result<T>>,
        I::IntoIter: 'static,
    {
        let loader: Loader<T> =
            Rc::new(move || Box::new(loader().into_iter()) as Box<dyn Iterator<Item = Result<T>>>);
        Self {
            loader,
            base: base::new_cell(),
            added: IndexMap::new(),
            removed: IndexMap::new(),
        }
    }

    /// Create a root snapshot over an in-memory base set
    ///
    /// Convenience for consumers whose base items are already resident;
    /// equivalent to `Snapshot::new` with a loader that replays `items`.
    pub fn from_items<I>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let items: Vec<T> = items.into_iter().collect();
        Self::new(move || items.clone().into_iter().map(Ok))
    }

    /// Derive a child snapshot sharing this lineage's loader and cache.
    fn derive(&self, added: IndexMap<Identity, T>, removed: IndexMap<Identity, T>) -> Self {
        Self {
            loader: Rc::clone(&self.loader),
            base: Rc::clone(&self.base),
            added,
            removed,
        }
    }

    /// Stage items for addition, returning a new snapshot
    ///
    /// Items are processed in argument order and keyed by identity, so a
    /// later duplicate overwrites an earlier one within the same call. An
    /// identity currently staged for removal is not added; its pending
    /// removal is cancelled instead, reverting the entry to whatever its
    /// base-set membership already implies.
    pub fn add<I>(&self, items: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut added = self.added.clone();
        let mut removed = self.removed.clone();

        for item in items {
            let id = item.identity();
            if removed.shift_remove(&id).is_none() {
                added.insert(id, item);
            }
        }

        tracing::trace!(
            component = module_path!(),
            op = "add",
            added = added.len(),
            removed = removed.len(),
            "derived snapshot"
        );
        self.derive(added, removed)
    }

    /// Stage items for removal, returning a new snapshot
    ///
    /// Symmetric to [`Snapshot::add`]: an identity currently staged for
    /// addition has that pending addition cancelled instead of being
    /// recorded in `removed`.
    pub fn remove<I>(&self, items: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut added = self.added.clone();
        let mut removed = self.removed.clone();

        for item in items {
            let id = item.identity();
            if added.shift_remove(&id).is_none() {
                removed.insert(id, item);
            }
        }

        tracing::trace!(
            component = module_path!(),
            op = "remove",
            added = added.len(),
            removed = removed.len(),
            "derived snapshot"
        );
        self.derive(added, removed)
    }

    /// Iterate the logical view: base items not staged for removal, in
    /// loader-yield order, followed by pending additions not already
    /// present in the base set, in staging order
    ///
    /// The first fully-consumed pass over a lineage materializes the base
    /// set; later passes replay the cache without invoking the loader.
    /// A pass dropped mid-stream does not complete materialization, and the
    /// next pass re-invokes the loader and restarts population. Loader
    /// failures are yielded as `Err` items and are never cached.
    pub fn iter(&self) -> LogicalIter<T> {
        LogicalIter::new(
            Realize::new(Rc::clone(&self.loader), Rc::clone(&self.base)),
            Rc::clone(&self.base),
            self.added.clone(),
            self.removed.clone(),
        )
    }

    /// Number of items in the logical view
    ///
    /// Consumes the view fully on every call; the result is not cached.
    ///
    /// # Errors
    /// Propagates the first loader failure encountered while materializing.
    pub fn count(&self) -> Result<usize> {
        let mut total = 0;
        for item in self.iter() {
            item?;
            total += 1;
        }
        Ok(total)
    }

    /// Whether an item with the same identity is in the logical view
    ///
    /// Fast paths: an identity staged for addition is present, an identity
    /// staged for removal is absent; neither touches the loader. Otherwise
    /// falls back to a linear scan of the logical view.
    ///
    /// # Errors
    /// Propagates the first loader failure encountered during the scan.
    pub fn contains(&self, item: &impl Identifiable) -> Result<bool> {
        let id = item.identity();
        if self.added.contains_key(&id) {
            return Ok(true);
        }
        if self.removed.contains_key(&id) {
            return Ok(false);
        }

        for entry in self.iter() {
            if entry?.identity() == id {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Whether the logical view has no items
    ///
    /// A non-empty `added` delta answers immediately without touching the
    /// loader.
    ///
    /// # Errors
    /// Propagates the first loader failure encountered while counting.
    pub fn is_empty(&self) -> Result<bool> {
        if !self.added.is_empty() {
            return Ok(false);
        }
        Ok(self.count()? == 0)
    }

    /// Items currently staged for addition, in staging order
    ///
    /// Raw delta access; no reconciliation against the base set.
    pub fn added_items(&self) -> impl Iterator<Item = &T> {
        self.added.values()
    }

    /// Items currently staged for removal, in staging order
    ///
    /// Raw delta access; no reconciliation against the base set.
    pub fn removed_items(&self) -> impl Iterator<Item = &T> {
        self.removed.values()
    }

    /// Fully materialize the logical view into a `Vec`
    ///
    /// # Errors
    /// Propagates the first loader failure encountered while materializing.
    pub fn to_vec(&self) -> Result<Vec<T>> {
        self.iter().collect()
    }
}

impl<T: 'static> Clone for Snapshot<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        Self {
            loader: Rc::clone(&self.loader),
            base: Rc::clone(&self.base),
            added: self.added.clone(),
            removed: self.removed.clone(),
        }
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for Snapshot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("added", &self.added)
            .field("removed", &self.removed)
            .finish_non_exhaustive()
    }
}

impl<T: Identifiable + Clone + 'static> IntoIterator for &Snapshot<T> {
    type Item = Result<T>;
    type IntoIter = LogicalIter<T>;

    fn into_iter(self) -> LogicalIter<T> {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Member {
        id: &'static str,
    }

    impl Identifiable for Member {
        fn identity(&self) -> Identity {
            Identity::new(self.id)
        }
    }

    fn member(id: &'static str) -> Member {
        Member { id }
    }

    #[test]
    fn test_add_stages_item() {
        let snapshot = Snapshot::from_items(Vec::<Member>::new());

        let staged = snapshot.add([member("10")]);

        assert_eq!(staged.added_items().count(), 1);
        assert_eq!(staged.removed_items().count(), 0);
    }

    #[test]
    fn test_remove_cancels_pending_add() {
        let snapshot = Snapshot::from_items(Vec::<Member>::new());

        let staged = snapshot.add([member("10")]).remove([member("10")]);

        // Cancellation empties `added` without ever touching `removed`
        assert_eq!(staged.added_items().count(), 0);
        assert_eq!(staged.removed_items().count(), 0);
    }

    #[test]
    fn test_add_cancels_pending_remove() {
        let snapshot = Snapshot::from_items(vec![member("10")]);

        let staged = snapshot.remove([member("10")]).add([member("10")]);

        assert_eq!(staged.added_items().count(), 0);
        assert_eq!(staged.removed_items().count(), 0);
    }

    #[test]
    fn test_last_write_wins_within_one_call() {
        #[derive(Debug, Clone, PartialEq)]
        struct Versioned {
            id: &'static str,
            version: u32,
        }

        impl Identifiable for Versioned {
            fn identity(&self) -> Identity {
                Identity::new(self.id)
            }
        }

        let snapshot = Snapshot::from_items(Vec::<Versioned>::new());
        let staged = snapshot.add([
            Versioned {
                id: "10",
                version: 1,
            },
            Versioned {
                id: "10",
                version: 2,
            },
        ]);

        let staged_items: Vec<&Versioned> = staged.added_items().collect();
        assert_eq!(staged_items.len(), 1);
        assert_eq!(staged_items[0].version, 2);
    }

    #[test]
    fn test_deltas_stay_disjoint() {
        let snapshot = Snapshot::from_items(vec![member("10")]);

        let staged = snapshot
            .add([member("20")])
            .remove([member("10"), member("20")])
            .add([member("10")]);

        let added: Vec<Identity> = staged.added_items().map(Identifiable::identity).collect();
        let removed: Vec<Identity> = staged.removed_items().map(Identifiable::identity).collect();
        for id in &added {
            assert!(!removed.contains(id));
        }
        assert!(added.is_empty());
        assert!(removed.is_empty());
    }

    #[test]
    fn test_debug_omits_loader() {
        let snapshot = Snapshot::from_items(vec![member("10")]).add([member("20")]);
        let rendered = format!("{:?}", snapshot);
        assert!(rendered.starts_with("Snapshot"));
        assert!(rendered.contains("added"));
    }
}
