//! Lazy materialization of a lineage's base set
//!
//! Every snapshot lineage shares one `BaseCell`. The first fully-consumed
//! pass over the loader's output populates the cell; every later pass
//! replays the cached items without touching the loader again.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use stageset_core_types::{Identifiable, Identity};

use crate::errors::Result;

/// Type-erased deferred supplier of the base item sequence.
pub(crate) type Loader<T> = Rc<dyn Fn() -> Box<dyn Iterator<Item = Result<T>>>>;

/// Materialization state of a lineage's base set.
///
/// `Loaded` is reached only when a pass observes the loader's sequence run
/// out. A pass abandoned mid-stream leaves the cell in `Loading`, and the
/// next pass re-invokes the loader and restarts population from scratch.
pub(crate) enum BaseState<T> {
    /// The loader has never been invoked for this lineage.
    NotLoaded,
    /// A materializing pass is (or was) in flight; holds the partial
    /// population keyed by identity.
    Loading(IndexMap<Identity, T>),
    /// A full pass completed; the canonical base set in first-yield order.
    Loaded(IndexMap<Identity, T>),
}

/// Shared materialization cell, one per lineage.
pub(crate) type BaseCell<T> = Rc<RefCell<BaseState<T>>>;

pub(crate) fn new_cell<T>() -> BaseCell<T> {
    Rc::new(RefCell::new(BaseState::NotLoaded))
}

/// Whether the identity is present in the portion of the base set that has
/// been materialized so far.
pub(crate) fn materialized_contains<T>(cell: &BaseCell<T>, id: &Identity) -> bool {
    match &*cell.borrow() {
        BaseState::NotLoaded => false,
        BaseState::Loading(partial) => partial.contains_key(id),
        BaseState::Loaded(full) => full.contains_key(id),
    }
}

/// Single-pass iterator over the base set that caches while yielding.
///
/// The loader is not touched until the first `next` call. Errors from the
/// loader's sequence are yielded downstream without being cached and
/// without promoting the cell to `Loaded`.
pub(crate) enum Realize<T: 'static> {
    NotStarted {
        loader: Loader<T>,
        cell: BaseCell<T>,
    },
    Streaming {
        cell: BaseCell<T>,
        source: Box<dyn Iterator<Item = Result<T>>>,
        /// Set once the source has yielded an error; a failed pass must
        /// never promote the cell to `Loaded`.
        failed: bool,
    },
    Cached {
        cell: BaseCell<T>,
        index: usize,
    },
    Done,
}

impl<T: Identifiable + Clone + 'static> Realize<T> {
    pub(crate) fn new(loader: Loader<T>, cell: BaseCell<T>) -> Self {
        Realize::NotStarted { loader, cell }
    }
}

impl<T: Identifiable + Clone + 'static> Iterator for Realize<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Result<T>> {
        let mut current = std::mem::replace(self, Realize::Done);
        loop {
            match current {
                Realize::NotStarted { loader, cell } => {
                    let replay = matches!(&*cell.borrow(), BaseState::Loaded(_));
                    if replay {
                        current = Realize::Cached { cell, index: 0 };
                    } else {
                        // NotLoaded, or an earlier pass stopped before the
                        // source ran out: restart population from scratch.
                        *cell.borrow_mut() = BaseState::Loading(IndexMap::new());
                        tracing::debug!(
                            component = module_path!(),
                            op = "realize",
                            "invoking base loader"
                        );
                        let source = loader();
                        current = Realize::Streaming {
                            cell,
                            source,
                            failed: false,
                        };
                    }
                }
                Realize::Streaming {
                    cell,
                    mut source,
                    failed,
                } => {
                    return match source.next() {
                        Some(Ok(item)) => {
                            if let BaseState::Loading(partial) = &mut *cell.borrow_mut() {
                                partial.insert(item.identity(), item.clone());
                            }
                            *self = Realize::Streaming {
                                cell,
                                source,
                                failed,
                            };
                            Some(Ok(item))
                        }
                        Some(Err(err)) => {
                            *self = Realize::Streaming {
                                cell,
                                source,
                                failed: true,
                            };
                            Some(Err(err))
                        }
                        None => {
                            if !failed {
                                let mut state = cell.borrow_mut();
                                if let BaseState::Loading(partial) = &mut *state {
                                    let full = std::mem::take(partial);
                                    tracing::trace!(
                                        component = module_path!(),
                                        op = "realize",
                                        items = full.len(),
                                        "base set materialized"
                                    );
                                    *state = BaseState::Loaded(full);
                                }
                            }
                            None
                        }
                    };
                }
                Realize::Cached { cell, index } => {
                    let entry = match &*cell.borrow() {
                        BaseState::Loaded(full) => {
                            full.get_index(index).map(|(_, item)| item.clone())
                        }
                        _ => None,
                    };
                    return match entry {
                        Some(item) => {
                            *self = Realize::Cached {
                                cell,
                                index: index + 1,
                            };
                            Some(Ok(item))
                        }
                        None => None,
                    };
                }
                Realize::Done => return None,
            }
        }
    }
}
