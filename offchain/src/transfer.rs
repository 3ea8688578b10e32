//! Token ledger transfers
//!
//! Each account leaf holds the payload `[balance, owner]`, where `owner` is a hash of the
//! account key. A [`Transfer`] is signed by the sender over the ledger root it was built on, and
//! validates as a two-update batch: debit the sender, then credit the recipient. The recipient's
//! witness is checked against the root produced by the debit, so the whole transfer is a single
//! sequential fold.

use serde::{Deserialize, Serialize};
use smt::{
    hash::{hash_leaf, Digest},
    Field, Payload,
};

use crate::{
    client::Replica, AuthorityKey, Error, LeafUpdate, LeafValue, Result, Signature,
    SigningAuthority, UpdateContext, UpdatePredicate,
};

/// The field identifying an account's key inside its leaf
#[must_use]
pub fn owner_hash(key: &AuthorityKey) -> Field {
    hash_leaf(&key.to_fields()).to_word()[0]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Account {
    pub balance: Field,
    pub owner: Field,
}

impl Account {
    #[must_use]
    pub fn new(balance: Field, key: &AuthorityKey) -> Self {
        Self {
            balance,
            owner: owner_hash(key),
        }
    }

    #[must_use]
    pub fn to_payload(&self) -> Payload {
        Payload::from([self.balance, self.owner])
    }

    #[must_use]
    pub fn from_payload(payload: &Payload) -> Option<Self> {
        match **payload {
            [balance, owner] => Some(Self { balance, owner }),
            _ => None,
        }
    }

    fn from_value(value: &LeafValue) -> Result<Self, String> {
        value
            .payload()
            .and_then(Self::from_payload)
            .ok_or_else(|| "leaf is not an account".to_string())
    }
}

/// A signed instruction to move `amount` from `sender` to `recipient`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub sender: AuthorityKey,
    pub recipient: AuthorityKey,
    pub amount: Field,
    pub signature: Signature,
}

impl Transfer {
    /// Sign a transfer against the ledger at `ledger_root`
    pub fn sign(
        sender: &SigningAuthority,
        ledger_root: Digest,
        recipient: AuthorityKey,
        amount: Field,
    ) -> Result<Self> {
        let signature = sender.sign(&message(ledger_root, amount, &recipient))?;
        Ok(Self {
            sender: sender.public_key(),
            recipient,
            amount,
            signature,
        })
    }

    /// Whether the sender signed this transfer against `ledger_root`
    #[must_use]
    pub fn verify(&self, ledger_root: Digest) -> bool {
        self.sender.verify(
            &message(ledger_root, self.amount, &self.recipient),
            &self.signature,
        )
    }

    /// Apply the transfer to `replica`, returning the debit and credit updates
    ///
    /// Balances are not checked here: an overdraft produces a batch the predicate rejects.
    pub fn stage(
        &self,
        replica: &mut Replica,
        sender_index: u64,
        recipient_index: u64,
    ) -> Result<Vec<LeafUpdate>> {
        let sender = replica
            .get(sender_index)
            .and_then(Account::from_payload)
            .ok_or_else(|| Error::PredicateViolation {
                position: 0,
                reason: format!("no account at index {sender_index}"),
            })?;

        let debited = Account {
            balance: sender.balance - self.amount,
            ..sender
        };
        let debit = replica.update(sender_index, Some(debited.to_payload()))?;

        let credited = match replica.get(recipient_index).and_then(Account::from_payload) {
            Some(recipient) => Account {
                balance: recipient.balance + self.amount,
                ..recipient
            },
            None => Account::new(self.amount, &self.recipient),
        };
        let credit = replica.update(recipient_index, Some(credited.to_payload()))?;

        Ok(vec![debit, credit])
    }

    fn check_debit(
        &self,
        ctx: &UpdateContext,
        old: &LeafValue,
        new: &LeafValue,
    ) -> Result<(), String> {
        if !self.verify(ctx.previous_root) {
            return Err("sender signature does not cover this ledger root".to_string());
        }

        let old = Account::from_value(old)?;
        let new = Account::from_value(new)?;

        if old.owner != owner_hash(&self.sender) {
            return Err("sender does not own the debited account".to_string());
        }
        if old.balance < self.amount {
            return Err(format!(
                "balance {} is less than amount {}",
                old.balance, self.amount
            ));
        }
        if new.balance != old.balance - self.amount || new.owner != old.owner {
            return Err("debited account does not match the transfer".to_string());
        }

        Ok(())
    }

    fn check_credit(
        &self,
        ctx: &UpdateContext,
        old: &LeafValue,
        new: &LeafValue,
    ) -> Result<(), String> {
        let new = Account::from_value(new)?;

        if ctx.slot_was_empty {
            // a new account: the caller may not claim a prior balance
            if !old.is_empty() {
                return Err("recipient slot is empty but an old value was claimed".to_string());
            }
            if new != Account::new(self.amount, &self.recipient) {
                return Err("new recipient account does not match the transfer".to_string());
            }
            return Ok(());
        }

        let old = Account::from_value(old)?;
        if old.owner != owner_hash(&self.recipient) {
            return Err("recipient does not own the credited account".to_string());
        }
        let sum = old.balance.as_u64().checked_add(self.amount.as_u64());
        if !matches!(sum, Some(sum) if sum < Field::MODULUS) {
            return Err("recipient balance would overflow".to_string());
        }
        if new.balance != old.balance + self.amount || new.owner != old.owner {
            return Err("credited account does not match the transfer".to_string());
        }

        Ok(())
    }
}

impl UpdatePredicate for Transfer {
    fn check(&self, ctx: &UpdateContext, old: &LeafValue, new: &LeafValue) -> Result<(), String> {
        match ctx.position {
            0 => self.check_debit(ctx, old, new),
            1 => self.check_credit(ctx, old, new),
            _ => Err("a transfer has exactly two updates".to_string()),
        }
    }

    fn check_batch(&self, len: usize) -> Result<(), String> {
        if len == 2 {
            Ok(())
        } else {
            Err(format!("a transfer has exactly two updates, got {len}"))
        }
    }
}

fn message(ledger_root: Digest, amount: Field, recipient: &AuthorityKey) -> Vec<Field> {
    let mut fields = ledger_root.to_word().to_vec();
    fields.push(amount);
    fields.extend(recipient.to_fields());
    fields
}
