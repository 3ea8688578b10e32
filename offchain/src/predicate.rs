//! Application rules on `(old, new)` leaf pairs
//!
//! The validator only proves that a batch of updates moves the tree from one root to another. What
//! makes an update *allowed* is up to the application, expressed as an [`UpdatePredicate`].
//! Closures with the signature of [`UpdatePredicate::check`] are predicates too:
//!
//! ```rust
//! # use offchain::{predicate::UpdatePredicate, LeafValue, UpdateContext};
//! # use smt::hash::empty_tree_hash;
//! let only_slot_zero = |ctx: &UpdateContext, _: &LeafValue, _: &LeafValue| {
//!     if ctx.index == 0 { Ok(()) } else { Err("only slot 0 may change".to_string()) }
//! };
//!
//! let ctx = UpdateContext { position: 0, index: 1, previous_root: empty_tree_hash(8), slot_was_empty: true };
//! assert!(only_slot_zero.check(&ctx, &LeafValue::Empty, &LeafValue::Empty).is_err());
//! ```

use smt::{hash::Digest, Field};

use crate::LeafValue;

/// What the validator knows about one update when it applies the predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateContext {
    /// Position of the update within its batch
    pub position: usize,
    /// The leaf index, recovered from the witness
    pub index: u64,
    /// The root before this update
    pub previous_root: Digest,
    /// Whether the slot is empty under `previous_root`
    pub slot_was_empty: bool,
}

pub trait UpdatePredicate {
    /// Accept or reject one update, with a reason for rejection
    fn check(&self, ctx: &UpdateContext, old: &LeafValue, new: &LeafValue) -> Result<(), String>;

    /// Accept or reject the shape of the whole batch
    fn check_batch(&self, len: usize) -> Result<(), String> {
        let _ = len;
        Ok(())
    }
}

impl<F> UpdatePredicate for F
where
    F: Fn(&UpdateContext, &LeafValue, &LeafValue) -> Result<(), String>,
{
    fn check(&self, ctx: &UpdateContext, old: &LeafValue, new: &LeafValue) -> Result<(), String> {
        self(ctx, old, new)
    }
}

/// Accepts every update
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyUpdate;

impl UpdatePredicate for AnyUpdate {
    fn check(&self, _: &UpdateContext, _: &LeafValue, _: &LeafValue) -> Result<(), String> {
        Ok(())
    }
}

/// The first field of the new value must be strictly greater than the old one
///
/// An empty leaf counts as zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct Increasing;

impl UpdatePredicate for Increasing {
    fn check(&self, _: &UpdateContext, old: &LeafValue, new: &LeafValue) -> Result<(), String> {
        let (old, new) = values(old, new)?;
        if new > old {
            Ok(())
        } else {
            Err(format!("{new} is not greater than {old}"))
        }
    }
}

/// A leaf may be written once, and never cleared
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateOnce;

impl UpdatePredicate for CreateOnce {
    fn check(&self, ctx: &UpdateContext, old: &LeafValue, new: &LeafValue) -> Result<(), String> {
        if !ctx.slot_was_empty || !old.is_empty() {
            return Err(format!("leaf {} is already set", ctx.index));
        }
        if new.is_empty() {
            return Err(format!("leaf {} must be set to a value", ctx.index));
        }
        Ok(())
    }
}

/// The first field may grow by less than `max` per update
#[derive(Debug, Clone, Copy)]
pub struct BoundedIncrement {
    pub max: Field,
}

impl UpdatePredicate for BoundedIncrement {
    fn check(&self, _: &UpdateContext, old: &LeafValue, new: &LeafValue) -> Result<(), String> {
        let (old, new) = values(old, new)?;
        match new.checked_sub(old) {
            Some(increment) if increment < self.max => Ok(()),
            Some(increment) => Err(format!("increment {increment} is not below {}", self.max)),
            None => Err(format!("{new} is less than {old}")),
        }
    }
}

fn values(old: &LeafValue, new: &LeafValue) -> Result<(Field, Field), String> {
    match (old.value(), new.value()) {
        (Some(old), Some(new)) => Ok((old, new)),
        _ => Err("leaf value is an opaque digest".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use smt::{hash::empty_tree_hash, Payload};

    use super::*;

    fn ctx(slot_was_empty: bool) -> UpdateContext {
        UpdateContext {
            position: 0,
            index: 5,
            previous_root: empty_tree_hash(8),
            slot_was_empty,
        }
    }

    fn value(n: u64) -> LeafValue {
        LeafValue::Payload(Payload::from([Field::from(n)]))
    }

    #[test]
    fn increasing() {
        assert!(Increasing.check(&ctx(true), &LeafValue::Empty, &value(4)).is_ok());
        assert!(Increasing.check(&ctx(false), &value(4), &value(5)).is_ok());
        assert!(Increasing.check(&ctx(false), &value(4), &value(4)).is_err());
        assert!(Increasing
            .check(&ctx(false), &LeafValue::Digest(empty_tree_hash(2)), &value(4))
            .is_err());
    }

    #[test]
    fn create_once() {
        assert!(CreateOnce.check(&ctx(true), &LeafValue::Empty, &value(1)).is_ok());
        assert!(CreateOnce.check(&ctx(false), &value(1), &value(2)).is_err());
        assert!(CreateOnce
            .check(&ctx(true), &LeafValue::Empty, &LeafValue::Empty)
            .is_err());
    }

    #[test]
    fn bounded_increment() {
        let rule = BoundedIncrement {
            max: Field::from(10),
        };

        assert!(rule.check(&ctx(false), &value(3), &value(12)).is_ok());
        assert!(rule.check(&ctx(false), &value(3), &value(13)).is_err());
        assert!(rule.check(&ctx(false), &value(3), &value(2)).is_err());
    }

    #[test]
    fn any_update() {
        assert!(AnyUpdate
            .check(&ctx(false), &value(9), &LeafValue::Empty)
            .is_ok());
        assert!(AnyUpdate.check_batch(100).is_ok());
    }
}
