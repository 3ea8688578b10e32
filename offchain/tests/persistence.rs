use offchain::{
    storage::rocksdb::RocksDb, HistoryEntry, OffchainStore, OwnerInfo, SigningAuthority, Snapshot,
};
use pretty_assertions::assert_eq;
use smt::{Field, Payload};
use tempdir::TempDir;

fn snapshot(value: u64) -> Snapshot {
    [(3, Payload::from([Field::from(value), Field::ONE]))]
        .into_iter()
        .collect()
}

#[test]
fn snapshots_survive_a_restart() {
    let dir = TempDir::new("offchain").unwrap();
    let authority = SigningAuthority::generate();

    let store = OffchainStore::open(
        RocksDb::open(dir.path()).unwrap(),
        authority.clone(),
        32,
    )
    .unwrap();
    let first = store.put_snapshot("app", 10, snapshot(1)).unwrap();
    let second = store.put_snapshot("app", 10, snapshot(2)).unwrap();
    store.close().unwrap();

    let store = OffchainStore::open(RocksDb::open(dir.path()).unwrap(), authority, 32).unwrap();

    assert_eq!(store.get_snapshot("app", first.root).unwrap(), snapshot(1));
    assert_eq!(store.get_snapshot("app", second.root).unwrap(), snapshot(2));
    assert_eq!(
        store.history("app").unwrap(),
        vec![
            HistoryEntry {
                sequence: 1,
                root: first.root
            },
            HistoryEntry {
                sequence: 2,
                root: second.root
            },
        ]
    );

    // sequence numbering continues where it left off
    let third = store.put_snapshot("app", 10, snapshot(3)).unwrap();
    assert_eq!(third.sequence, 3);
    assert_eq!(
        store.owner("app").unwrap(),
        Some(OwnerInfo {
            height: 10,
            next_sequence: 4
        })
    );
}

#[test]
fn commitments_verify_after_reopening_with_the_same_key() {
    let dir = TempDir::new("offchain").unwrap();
    let authority = SigningAuthority::generate();
    let key_file = authority.secret_hex();

    let store = OffchainStore::open(RocksDb::open(dir.path()).unwrap(), authority, 32).unwrap();
    let commitment = store.put_snapshot("app", 4, snapshot(7)).unwrap();
    store.close().unwrap();

    let reloaded = SigningAuthority::from_hex(&key_file).unwrap();
    let store = OffchainStore::open(RocksDb::open(dir.path()).unwrap(), reloaded, 32).unwrap();

    assert!(commitment.verify(&store.public_key()));
}
