use std::{rc::Rc, sync::Arc};

use super::{hash_leaf, Digest};
use crate::Field;

/// Types which can be hashed into a leaf digest
///
/// Anything that can be viewed as an ordered sequence of [`Field`]s hashes the same way as that
/// sequence, so a [`Payload`] and the slice it wraps produce equal digests.
///
/// ```rust
/// # use smt::{hash::Hashable, Field, Payload};
/// let payload = Payload::from(vec![Field::from(1), Field::from(2)]);
/// assert_eq!(payload.hash(), [Field::from(1), Field::from(2)].hash());
/// ```
///
/// [`Payload`]: crate::Payload
pub trait Hashable {
    /// Compute the leaf digest of this object
    fn hash(&self) -> Digest;
}

impl<T: ?Sized> Hashable for &T
where
    T: Hashable,
{
    fn hash(&self) -> Digest {
        <T as Hashable>::hash(self)
    }
}

impl<T: ?Sized> Hashable for Box<T>
where
    T: Hashable,
{
    fn hash(&self) -> Digest {
        <T as Hashable>::hash(self)
    }
}

impl<T: ?Sized> Hashable for Rc<T>
where
    T: Hashable,
{
    fn hash(&self) -> Digest {
        <T as Hashable>::hash(self)
    }
}

impl<T: ?Sized> Hashable for Arc<T>
where
    T: Hashable,
{
    fn hash(&self) -> Digest {
        <T as Hashable>::hash(self)
    }
}

impl Hashable for Field {
    fn hash(&self) -> Digest {
        hash_leaf(std::slice::from_ref(self))
    }
}

impl Hashable for [Field] {
    fn hash(&self) -> Digest {
        hash_leaf(self)
    }
}

impl<const N: usize> Hashable for [Field; N] {
    fn hash(&self) -> Digest {
        hash_leaf(self)
    }
}

impl Hashable for Vec<Field> {
    fn hash(&self) -> Digest {
        hash_leaf(self)
    }
}
