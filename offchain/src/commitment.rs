use serde::{Deserialize, Serialize};
use smt::{hash::Digest, Field};

use crate::{AuthorityKey, Result, Signature, SigningAuthority};

/// A store's signed statement that `root` is sequence number `sequence` for some owner
///
/// The owner is not part of the signed message. A commitment issued to one owner verifies for any
/// other owner whose batch folds to the same root, and moves that owner's watermark to its
/// sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootCommitment {
    pub root: Digest,
    pub sequence: u64,
    pub signature: Signature,
}

impl RootCommitment {
    pub(crate) fn sign(authority: &SigningAuthority, root: Digest, sequence: u64) -> Result<Self> {
        let signature = authority.sign(&message_fields(root, sequence))?;
        Ok(Self {
            root,
            sequence,
            signature,
        })
    }

    /// Whether `signature` covers `[root, sequence]` under `key`
    #[must_use]
    pub fn verify(&self, key: &AuthorityKey) -> bool {
        key.verify(&message_fields(self.root, self.sequence), &self.signature)
    }
}

fn message_fields(root: Digest, sequence: u64) -> Vec<Field> {
    let mut fields = root.to_word().to_vec();
    fields.push(Field::from(sequence));
    fields
}
