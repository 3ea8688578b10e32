use offchain::{
    client::Replica,
    predicate::CreateOnce,
    storage::memory::MemoryStorage,
    transfer::{Account, Transfer},
    CommittedState, Error, OffchainStore, Settlement, SigningAuthority,
};
use pretty_assertions::assert_eq;
use smt::Field;

const SENDER: u64 = 1;
const RECIPIENT: u64 = 2;

struct Ledger {
    store: OffchainStore<MemoryStorage>,
    settlement: Settlement,
    alice: SigningAuthority,
    bob: SigningAuthority,
}

impl Ledger {
    /// A ledger where alice holds 100 at `SENDER`
    fn new() -> Self {
        let store =
            OffchainStore::open(MemoryStorage::new(), SigningAuthority::generate(), 32).unwrap();
        let settlement = Settlement::new(store.public_key());
        settlement.register("ledger", 16).unwrap();

        let ledger = Self {
            store,
            settlement,
            alice: SigningAuthority::generate(),
            bob: SigningAuthority::generate(),
        };

        let mut replica = ledger.replica();
        let mint = Account::new(Field::from(100), &ledger.alice.public_key());
        let update = replica.update(SENDER, Some(mint.to_payload())).unwrap();
        let commitment = ledger
            .store
            .put_snapshot("ledger", 16, replica.snapshot().clone())
            .unwrap();
        ledger
            .settlement
            .submit("ledger", &[update], &CreateOnce, &commitment)
            .unwrap();

        ledger
    }

    fn state(&self) -> CommittedState {
        self.settlement.state("ledger").unwrap()
    }

    fn replica(&self) -> Replica {
        let state = self.state();
        let snapshot = self.store.get_snapshot("ledger", state.root).unwrap();
        Replica::new(state.height, snapshot).unwrap()
    }

    fn send(&self, transfer: &Transfer, from: u64, to: u64) -> offchain::Result<CommittedState> {
        let mut replica = self.replica();
        let updates = transfer.stage(&mut replica, from, to)?;
        let commitment = self
            .store
            .put_snapshot("ledger", 16, replica.snapshot().clone())?;
        self.settlement
            .submit("ledger", &updates, transfer, &commitment)
    }

    fn account(&self, index: u64) -> Option<Account> {
        self.replica().get(index).and_then(Account::from_payload)
    }
}

#[test]
fn transfer_to_a_new_account() {
    let ledger = Ledger::new();
    let transfer = Transfer::sign(
        &ledger.alice,
        ledger.state().root,
        ledger.bob.public_key(),
        Field::from(12),
    )
    .unwrap();

    let state = ledger.send(&transfer, SENDER, RECIPIENT).unwrap();

    assert_eq!(state.sequence, 2);
    assert_eq!(
        ledger.account(SENDER),
        Some(Account::new(Field::from(88), &ledger.alice.public_key()))
    );
    assert_eq!(
        ledger.account(RECIPIENT),
        Some(Account::new(Field::from(12), &ledger.bob.public_key()))
    );
}

#[test]
fn overdraft_is_rejected() {
    let ledger = Ledger::new();
    let before = ledger.state();
    let transfer = Transfer::sign(
        &ledger.alice,
        before.root,
        ledger.bob.public_key(),
        Field::from(150),
    )
    .unwrap();

    let err = ledger.send(&transfer, SENDER, RECIPIENT).unwrap_err();

    assert!(matches!(err, Error::PredicateViolation { position: 0, .. }));
    assert_eq!(ledger.state(), before);
    assert_eq!(ledger.account(RECIPIENT), None);
}

#[test]
fn transfer_back_credits_the_existing_account() {
    let ledger = Ledger::new();
    let to_bob = Transfer::sign(
        &ledger.alice,
        ledger.state().root,
        ledger.bob.public_key(),
        Field::from(12),
    )
    .unwrap();
    ledger.send(&to_bob, SENDER, RECIPIENT).unwrap();

    let to_alice = Transfer::sign(
        &ledger.bob,
        ledger.state().root,
        ledger.alice.public_key(),
        Field::from(2),
    )
    .unwrap();
    ledger.send(&to_alice, RECIPIENT, SENDER).unwrap();

    assert_eq!(
        ledger.account(SENDER).map(|account| account.balance),
        Some(Field::from(90))
    );
    assert_eq!(
        ledger.account(RECIPIENT).map(|account| account.balance),
        Some(Field::from(10))
    );
}

#[test]
fn only_the_owner_can_spend() {
    let ledger = Ledger::new();
    let mallory = SigningAuthority::generate();
    let transfer = Transfer::sign(
        &mallory,
        ledger.state().root,
        mallory.public_key(),
        Field::from(1),
    )
    .unwrap();

    let err = ledger.send(&transfer, SENDER, RECIPIENT).unwrap_err();

    assert!(matches!(
        err,
        Error::PredicateViolation { position: 0, reason } if reason.contains("own")
    ));
}

#[test]
fn transfer_signed_for_an_old_root_cannot_be_replayed() {
    let ledger = Ledger::new();
    let transfer = Transfer::sign(
        &ledger.alice,
        ledger.state().root,
        ledger.bob.public_key(),
        Field::from(10),
    )
    .unwrap();
    ledger.send(&transfer, SENDER, RECIPIENT).unwrap();

    let err = ledger.send(&transfer, SENDER, RECIPIENT).unwrap_err();

    assert!(matches!(err, Error::PredicateViolation { position: 0, .. }));
    assert_eq!(
        ledger.account(SENDER).map(|account| account.balance),
        Some(Field::from(90))
    );
}
