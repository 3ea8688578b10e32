use std::{fmt::Debug, path::Path};

use ::rocksdb::{Direction, IteratorMode, Options, WriteBatch, DB};

use super::{Batch, Error, Storage};

/// A [`Storage`] backed by a rocksdb database on disk
pub struct RocksDb {
    inner: DB,
}

impl Debug for RocksDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RocksDb({})", self.inner.path().display())
    }
}

impl RocksDb {
    /// Open the database at `path`, creating it if it does not exist
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let mut options = Options::default();
        options.create_if_missing(true);

        let inner = DB::open(&options, path)?;

        Ok(Self { inner })
    }
}

impl Storage for RocksDb {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, Error> {
        Ok(self.inner.get(key)?)
    }

    fn write(&self, batch: Batch) -> Result<(), Error> {
        let mut db_batch = WriteBatch::default();
        for (key, value) in batch {
            db_batch.put(key, value);
        }
        self.inner.write(db_batch)?;
        Ok(())
    }

    fn scan(&self, prefix: &[u8]) -> Result<Vec<Vec<u8>>, Error> {
        let mut values = Vec::new();

        for result in self
            .inner
            .iterator(IteratorMode::From(prefix, Direction::Forward))
        {
            let (key, value) = result?;
            if !key.starts_with(prefix) {
                break;
            }
            values.push(value.into_vec());
        }

        Ok(values)
    }

    fn flush(&self) -> Result<(), Error> {
        self.inner.flush()?;
        Ok(())
    }
}
