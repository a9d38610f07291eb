//! Identity capability for collection entries

use std::rc::Rc;
use std::sync::Arc;

use crate::identity::Identity;

/// Capability trait for values that expose a collection identity
///
/// The returned identity must be pure, stable and total: it must not
/// change after the value is handed to a collection, and two values are
/// the same collection entry iff their identities are equal.
pub trait Identifiable {
    /// Return the identity that uniquely identifies this value
    fn identity(&self) -> Identity;
}

impl<T: Identifiable + ?Sized> Identifiable for &T {
    fn identity(&self) -> Identity {
        (**self).identity()
    }
}

impl<T: Identifiable + ?Sized> Identifiable for Box<T> {
    fn identity(&self) -> Identity {
        (**self).identity()
    }
}

impl<T: Identifiable + ?Sized> Identifiable for Rc<T> {
    fn identity(&self) -> Identity {
        (**self).identity()
    }
}

impl<T: Identifiable + ?Sized> Identifiable for Arc<T> {
    fn identity(&self) -> Identity {
        (**self).identity()
    }
}
