use serde::{Deserialize, Serialize};
use smt::{
    hash::{Digest, Hashable},
    Field, MerkleWitness, Payload,
};

use crate::{
    AuthorityKey, CommittedState, Error, Result, RootCommitment, Staleness, UpdateContext,
    UpdatePredicate,
};

/// The claimed value of a leaf, before or after an update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum LeafValue {
    /// The slot is unset
    Empty,
    /// An application payload, hashed with [`Payload::digest`]
    Payload(Payload),
    /// A leaf digest whose preimage is not revealed
    Digest(Digest),
}

impl LeafValue {
    /// Build a value from a digest and an "is empty" flag
    ///
    /// The flag wins: an empty leaf is [`Digest::EMPTY`] whatever digest accompanies it.
    #[must_use]
    pub fn from_flags(digest: Digest, is_empty: bool) -> Self {
        if is_empty {
            Self::Empty
        } else {
            Self::Digest(digest)
        }
    }

    /// The digest this value contributes to the tree
    #[must_use]
    pub fn digest(&self) -> Digest {
        match self {
            Self::Empty => Digest::EMPTY,
            Self::Payload(payload) => payload.hash(),
            Self::Digest(digest) => *digest,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    #[must_use]
    pub fn payload(&self) -> Option<&Payload> {
        match self {
            Self::Payload(payload) => Some(payload),
            _ => None,
        }
    }

    /// The first field of the payload, zero if empty, `None` if opaque
    #[must_use]
    pub fn value(&self) -> Option<Field> {
        match self {
            Self::Empty => Some(Field::ZERO),
            Self::Payload(payload) => Some(payload.value()),
            Self::Digest(_) => None,
        }
    }
}

impl From<Option<Payload>> for LeafValue {
    fn from(value: Option<Payload>) -> Self {
        value.map_or(Self::Empty, Self::Payload)
    }
}

/// One witnessed leaf change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafUpdate {
    pub old: LeafValue,
    pub new: LeafValue,
    pub witness: MerkleWitness,
}

impl LeafUpdate {
    #[must_use]
    pub fn new(old: LeafValue, new: LeafValue, witness: MerkleWitness) -> Self {
        Self { old, new, witness }
    }

    /// Build an update from digest and "is empty" flag pairs
    #[must_use]
    pub fn from_flags(
        old_digest: Digest,
        old_is_empty: bool,
        new_digest: Digest,
        new_is_empty: bool,
        witness: MerkleWitness,
    ) -> Self {
        Self {
            old: LeafValue::from_flags(old_digest, old_is_empty),
            new: LeafValue::from_flags(new_digest, new_is_empty),
            witness,
        }
    }

    /// The leaf index this update targets
    #[must_use]
    pub fn index(&self) -> u64 {
        self.witness.compute_index()
    }
}

/// A validated transition, ready to be committed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authorized {
    pub root: Digest,
    pub sequence: u64,
}

/// Authorizes root transitions against commitments from one signing authority
///
/// Validation is a pure function of its inputs. Making the result durable, and making sure no
/// other transition is validated against the same root in the meantime, is the caller's job (see
/// [`Settlement`]).
///
/// [`Settlement`]: crate::Settlement
#[derive(Debug, Clone, Copy)]
pub struct RootTransitionValidator {
    authority: AuthorityKey,
}

impl RootTransitionValidator {
    #[must_use]
    pub fn new(authority: AuthorityKey) -> Self {
        Self { authority }
    }

    /// Check that `updates` move `state.root` to `commitment.root` under `predicate`
    ///
    /// Every witness must come from a tree of `state.height`. Updates are folded left to right,
    /// each starting from the root the previous one produced.
    /// The commitment's signature and sequence are checked before the fold, so a replayed or
    /// forged commitment is reported as such even when its witnesses are also stale. Any failure
    /// rejects the whole batch.
    #[tracing::instrument(
        skip_all,
        fields(
            previous_root = %state.root,
            watermark = state.sequence,
            height = state.height,
            updates = updates.len(),
            sequence = commitment.sequence,
        )
    )]
    pub fn validate<P>(
        &self,
        state: &CommittedState,
        updates: &[LeafUpdate],
        predicate: &P,
        commitment: &RootCommitment,
    ) -> Result<Authorized>
    where
        P: UpdatePredicate + ?Sized,
    {
        tracing::debug!("validating");

        let result = self.run(state, updates, predicate, commitment);

        match &result {
            Ok(authorized) => tracing::debug!(root = %authorized.root, "authorized"),
            Err(err @ Error::SignatureInvalid { .. }) => {
                tracing::error!(error = %err, "rejected forged commitment");
            }
            Err(err) => tracing::debug!(error = %err, "rejected"),
        }

        result
    }

    fn run<P>(
        &self,
        state: &CommittedState,
        updates: &[LeafUpdate],
        predicate: &P,
        commitment: &RootCommitment,
    ) -> Result<Authorized>
    where
        P: UpdatePredicate + ?Sized,
    {
        let CommittedState {
            root: previous_root,
            sequence: watermark,
            height,
        } = *state;

        if updates.is_empty() {
            return Err(Error::EmptyBatch);
        }

        if !commitment.verify(&self.authority) {
            return Err(Error::SignatureInvalid {
                root: commitment.root,
                sequence: commitment.sequence,
            });
        }

        if commitment.sequence <= watermark {
            return Err(Error::StaleCommitment(Staleness::Sequence {
                sequence: commitment.sequence,
                watermark,
            }));
        }

        predicate
            .check_batch(updates.len())
            .map_err(|reason| Error::PredicateViolation {
                position: updates.len(),
                reason,
            })?;

        let mut root = previous_root;

        for (position, update) in updates.iter().enumerate() {
            // every witness must address a single leaf
            if update.witness.height() != height {
                return Err(Error::WitnessHeight {
                    position,
                    expected: height,
                    actual: update.witness.height(),
                });
            }

            if update.witness.compute_root(update.old.digest()) != root {
                return Err(Error::StaleWitness {
                    position,
                    expected: root,
                });
            }

            let ctx = UpdateContext {
                position,
                index: update.index(),
                previous_root: root,
                slot_was_empty: update.witness.compute_root(Digest::EMPTY) == root,
            };

            predicate
                .check(&ctx, &update.old, &update.new)
                .map_err(|reason| Error::PredicateViolation { position, reason })?;

            root = update.witness.compute_root(update.new.digest());
        }

        if root != commitment.root {
            return Err(Error::StaleCommitment(Staleness::RootMismatch {
                candidate: root,
                committed: commitment.root,
            }));
        }

        Ok(Authorized {
            root,
            sequence: commitment.sequence,
        })
    }
}

#[cfg(test)]
mod tests {
    use smt::hash::hash_leaf;

    use super::*;

    #[test]
    fn empty_flag_wins_over_digest() {
        let digest = hash_leaf(&[Field::from(4)]);

        assert_eq!(LeafValue::from_flags(digest, true).digest(), Digest::EMPTY);
        assert_eq!(LeafValue::from_flags(digest, false).digest(), digest);
    }

    #[test]
    fn merkle_map_increments() {
        use smt::MerkleMap;

        use crate::SigningAuthority;

        // map leaves are raw words, so the rule reads the first word element
        let below_ten = |_: &UpdateContext, old: &LeafValue, new: &LeafValue| {
            let old = old.digest().to_word()[0];
            let new = new.digest().to_word()[0];
            match new.checked_sub(old) {
                Some(step) if step < Field::from(10) => Ok(()),
                _ => Err(format!("{old} -> {new}")),
            }
        };

        let authority = SigningAuthority::generate();
        let validator = RootTransitionValidator::new(authority.public_key());
        let key = MerkleMap::key_for(&[Field::from(7)]);
        let mut map = MerkleMap::new();

        let increment = |map: &mut MerkleMap, to: u64, sequence: u64| {
            let previous = map.root();
            let old = map.get(key);
            let witness = map.get_witness(key).as_witness().clone();
            map.set(key, Field::from(to));

            let word = |v: Field| Digest::from_word([v, Field::ZERO, Field::ZERO, Field::ZERO]);
            let update = LeafUpdate::from_flags(
                word(old),
                old == Field::ZERO,
                word(Field::from(to)),
                false,
                witness,
            );
            let commitment = RootCommitment::sign(&authority, map.root(), sequence).unwrap();
            let state = CommittedState {
                root: previous,
                sequence: sequence - 1,
                height: smt::MAP_HEIGHT,
            };
            validator.validate(&state, &[update], &below_ten, &commitment)
        };

        assert!(increment(&mut map, 9, 1).is_ok());
        assert_eq!(map.get(key), Field::from(9));
        assert!(increment(&mut map, 12, 2).is_ok());
        assert!(matches!(
            increment(&mut map, 30, 3),
            Err(Error::PredicateViolation { position: 0, .. })
        ));
    }

    #[test]
    fn payload_digest_is_leaf_hash() {
        let payload = Payload::from([Field::from(4)]);
        let value = LeafValue::from(Some(payload.clone()));

        assert_eq!(value.digest(), hash_leaf(&[Field::from(4)]));
        assert_eq!(value.payload(), Some(&payload));
        assert_eq!(LeafValue::from(None).value(), Some(Field::ZERO));
        assert_eq!(LeafValue::Digest(payload.digest()).value(), None);
    }
}
