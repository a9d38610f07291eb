//! StageSet Core - Persistent staged-change collections
//!
//! This crate provides the snapshot collection used to stage changes to a
//! set of uniquely-identified entities before committing them, including:
//! - Immutable `Snapshot` values with copy-on-derive add/remove deltas
//! - Lazy, load-once materialization of the base set shared across a lineage
//! - Logical-view reconciliation (base minus removed, plus non-duplicate adds)
//! - Membership, count and emptiness queries with delta fast paths
//!
//! A snapshot never mutates its base source; every `add`/`remove` returns a
//! new snapshot and the receiver stays valid and unchanged.

pub mod errors;
pub mod logging;
pub mod snapshot;

// Re-export commonly used types
pub use errors::{LoadError, Result};
pub use snapshot::{LogicalIter, Snapshot};
pub use stageset_core_types::{Identifiable, Identity};
