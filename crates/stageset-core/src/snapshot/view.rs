//! Logical-view reconciliation
//!
//! The logical view combines the materialized base set with the pending
//! deltas: base items whose identity is not staged for removal, followed by
//! pending additions that neither duplicate a base item nor are staged for
//! removal. Each distinct identity appears exactly once.

use indexmap::IndexMap;
use stageset_core_types::{Identifiable, Identity};

use super::base::{self, BaseCell, Realize};
use crate::errors::Result;

/// Lazy iterator over a snapshot's logical view.
///
/// Owns clones of the snapshot's delta maps plus handles to the shared
/// base cell, so it does not borrow the snapshot it came from. Loader
/// failures surface as `Err` items in yield position.
pub struct LogicalIter<T: 'static> {
    realize: Realize<T>,
    base_done: bool,
    cell: BaseCell<T>,
    pending: indexmap::map::IntoIter<Identity, T>,
    removed: IndexMap<Identity, T>,
}

impl<T: Identifiable + Clone + 'static> LogicalIter<T> {
    pub(crate) fn new(
        realize: Realize<T>,
        cell: BaseCell<T>,
        added: IndexMap<Identity, T>,
        removed: IndexMap<Identity, T>,
    ) -> Self {
        Self {
            realize,
            base_done: false,
            cell,
            pending: added.into_iter(),
            removed,
        }
    }
}

impl<T: Identifiable + Clone + 'static> Iterator for LogicalIter<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Result<T>> {
        if !self.base_done {
            for item in self.realize.by_ref() {
                match item {
                    Ok(item) => {
                        if self.removed.contains_key(&item.identity()) {
                            continue;
                        }
                        return Some(Ok(item));
                    }
                    Err(err) => return Some(Err(err)),
                }
            }
            self.base_done = true;
        }

        loop {
            let (id, item) = self.pending.next()?;
            if self.removed.contains_key(&id) || base::materialized_contains(&self.cell, &id) {
                continue;
            }
            return Some(Ok(item));
        }
    }
}
