//! Core types shared across StageSet facilities
//!
//! This crate provides the foundational identity capability used by the
//! collection layer and by consumers embedding staged collections in their
//! domain models:
//!
//! - **Identity**: opaque token that uniquely distinguishes one entry from
//!   another within a collection
//! - **Identifiable**: capability trait exposing an entry's identity

pub mod identifiable;
pub mod identity;

pub use identifiable::Identifiable;
pub use identity::Identity;
