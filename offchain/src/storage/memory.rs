use std::collections::BTreeMap;

use parking_lot::RwLock;

use super::{Batch, Error, Storage};

/// An in-memory [`Storage`], lost when dropped
#[derive(Debug, Default)]
pub struct MemoryStorage {
    state: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, Error> {
        Ok(self.state.read().get(key).cloned())
    }

    fn write(&self, batch: Batch) -> Result<(), Error> {
        let mut state = self.state.write();
        state.extend(batch);
        Ok(())
    }

    fn scan(&self, prefix: &[u8]) -> Result<Vec<Vec<u8>>, Error> {
        let state = self.state.read();
        let values = state
            .range(prefix.to_vec()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(_, value)| value.clone())
            .collect();
        Ok(values)
    }
}
