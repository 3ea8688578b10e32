use std::sync::Arc;

use tempdir::TempDir;

use super::{memory::MemoryStorage, rocksdb::RocksDb, Storage};

#[derive(Debug)]
struct TestDb {
    _dir: TempDir,
    db: RocksDb,
}

impl TestDb {
    fn new() -> Self {
        let dir = TempDir::new("offchain").unwrap();
        let db = RocksDb::open(dir.path()).unwrap();

        Self { _dir: dir, db }
    }
}

fn exercise(storage: &dyn Storage) {
    assert_eq!(storage.get(b"a/1").unwrap(), None);

    storage
        .write(vec![
            (b"a/2".to_vec(), b"two".to_vec()),
            (b"a/1".to_vec(), b"one".to_vec()),
            (b"b/1".to_vec(), b"other".to_vec()),
        ])
        .unwrap();

    assert_eq!(storage.get(b"a/1").unwrap(), Some(b"one".to_vec()));
    assert_eq!(
        storage.scan(b"a/").unwrap(),
        vec![b"one".to_vec(), b"two".to_vec()]
    );
    assert!(storage.scan(b"c/").unwrap().is_empty());
    storage.flush().unwrap();
}

#[test]
fn memory_storage() {
    exercise(&MemoryStorage::new());
}

#[test]
fn rocksdb_storage() {
    exercise(&TestDb::new().db);
}

#[test]
fn shared_storage() {
    let storage = Arc::new(MemoryStorage::new());
    exercise(&storage);
}

#[test]
fn rocksdb_survives_reopen() {
    let dir = TempDir::new("offchain").unwrap();

    {
        let db = RocksDb::open(dir.path()).unwrap();
        db.write(vec![(b"key".to_vec(), b"value".to_vec())]).unwrap();
        db.flush().unwrap();
    }

    let db = RocksDb::open(dir.path()).unwrap();
    assert_eq!(db.get(b"key").unwrap(), Some(b"value".to_vec()));
}
