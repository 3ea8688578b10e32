use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use smt::{
    hash::{empty_tree_height, Digest},
    Payload, SparseMerkleTree, MAX_HEIGHT,
};

use crate::{
    storage::{self, decode, encode, keys::Key, Storage},
    AuthorityKey, Error, Result, RootCommitment, SigningAuthority, Snapshot,
};

/// Per-owner metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerInfo {
    /// Every snapshot of this owner uses this height
    pub height: usize,
    /// The sequence number the next snapshot will receive
    pub next_sequence: u64,
}

/// One accepted snapshot, in the order it was written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub sequence: u64,
    pub root: Digest,
}

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotRecord {
    sequence: u64,
    root: Digest,
    items: Vec<(u64, Payload)>,
}

/// The authority for "which mapping produced root R"
///
/// Every [`OffchainStore::put_snapshot`] appends an immutable `(root, sequence, mapping)` record
/// and signs `[root, sequence]`. Nothing is ever overwritten, so older roots stay readable.
#[derive(Debug)]
pub struct OffchainStore<S> {
    storage: S,
    authority: SigningAuthority,
    max_height: usize,
    /// Serialises sequence allocation
    write_lock: Mutex<()>,
}

impl<S: Storage> OffchainStore<S> {
    /// Open a store over `storage`, signing with `authority`
    ///
    /// `max_height` bounds the height of every owner's tree.
    pub fn open(storage: S, authority: SigningAuthority, max_height: usize) -> Result<Self> {
        if max_height == 0 || max_height > MAX_HEIGHT {
            return Err(Error::HeightTooLarge {
                height: max_height,
                max: MAX_HEIGHT,
            });
        }

        tracing::info!(
            public_key = authority.public_key().to_hex(),
            max_height,
            "opened off-chain store"
        );

        Ok(Self {
            storage,
            authority,
            max_height,
            write_lock: Mutex::new(()),
        })
    }

    /// Make every stored snapshot durable
    pub fn flush(&self) -> Result<()> {
        self.storage.flush()?;
        Ok(())
    }

    /// Flush all writes and release the storage
    pub fn close(self) -> Result<()> {
        self.flush()?;
        tracing::info!("closed off-chain store");
        Ok(())
    }

    #[must_use]
    pub fn public_key(&self) -> AuthorityKey {
        self.authority.public_key()
    }

    /// Check that the storage backend answers reads
    pub fn health(&self) -> Result<()> {
        self.storage.get(&Key::Owner { owner: "" }.serialize())?;
        Ok(())
    }

    /// The mapping that hashes to `root`
    ///
    /// The root of an empty tree of any supported height yields an empty snapshot, whether or not
    /// anything was ever stored for `owner`.
    #[tracing::instrument(skip(self))]
    pub fn get_snapshot(&self, owner: &str, root: Digest) -> Result<Snapshot> {
        if empty_tree_height(root).is_some_and(|height| height <= self.max_height) {
            return Ok(Snapshot::new());
        }

        let unknown = || Error::UnknownRoot {
            owner: owner.to_string(),
            root,
        };

        let sequence: u64 = self.load(&Key::Root { owner, root })?.ok_or_else(unknown)?;
        let record: SnapshotRecord = self
            .load(&Key::Snapshot { owner, sequence })?
            .ok_or(storage::Error::DanglingRoot { sequence })?;

        Ok(record.items.into())
    }

    /// Persist `snapshot` as the next version of `owner` and sign its root
    ///
    /// This does not check the caller's prior root: authorizing the transition is the job of the
    /// [`RootTransitionValidator`].
    ///
    /// [`RootTransitionValidator`]: crate::RootTransitionValidator
    #[tracing::instrument(skip(self, snapshot), fields(items = snapshot.len()))]
    pub fn put_snapshot(
        &self,
        owner: &str,
        height: usize,
        snapshot: Snapshot,
    ) -> Result<RootCommitment> {
        if height > self.max_height {
            return Err(Error::HeightTooLarge {
                height,
                max: self.max_height,
            });
        }

        let capacity = SparseMerkleTree::new(height)?.capacity();
        if snapshot.len() as u128 > capacity {
            return Err(Error::TooManyItems {
                height,
                items: snapshot.len(),
                capacity,
            });
        }
        let root = snapshot.to_tree(height)?.root();

        let _guard = self.write_lock.lock();

        let info = match self.owner(owner)? {
            Some(info) if info.height != height => {
                return Err(Error::HeightMismatch {
                    owner: owner.to_string(),
                    stored: info.height,
                    requested: height,
                })
            }
            Some(info) => info,
            None => OwnerInfo {
                height,
                next_sequence: 1,
            },
        };

        let sequence = info.next_sequence;
        let commitment = RootCommitment::sign(&self.authority, root, sequence)?;

        let record = SnapshotRecord {
            sequence,
            root,
            items: snapshot.into(),
        };
        let info = OwnerInfo {
            height,
            next_sequence: sequence + 1,
        };

        self.storage.write(vec![
            (
                Key::Snapshot { owner, sequence }.serialize(),
                encode(&record).map_err(storage::Error::from)?,
            ),
            (
                Key::Root { owner, root }.serialize(),
                encode(&sequence).map_err(storage::Error::from)?,
            ),
            (
                Key::Owner { owner }.serialize(),
                encode(&info).map_err(storage::Error::from)?,
            ),
        ])?;

        tracing::info!(%root, sequence, "stored snapshot");

        Ok(commitment)
    }

    /// Metadata for `owner`, if it has ever stored a snapshot
    pub fn owner(&self, owner: &str) -> Result<Option<OwnerInfo>> {
        self.load(&Key::Owner { owner })
    }

    /// Every snapshot stored for `owner`, in sequence order
    pub fn history(&self, owner: &str) -> Result<Vec<HistoryEntry>> {
        self.storage
            .scan(&storage::keys::snapshots_of(owner))?
            .iter()
            .map(|bytes| {
                let record: SnapshotRecord = decode(bytes).map_err(storage::Error::from)?;
                Ok(HistoryEntry {
                    sequence: record.sequence,
                    root: record.root,
                })
            })
            .collect()
    }

    fn load<T: serde::de::DeserializeOwned>(&self, key: &Key<'_>) -> Result<Option<T>> {
        match self.storage.get(&key.serialize())? {
            Some(bytes) => Ok(Some(decode(&bytes).map_err(storage::Error::from)?)),
            None => Ok(None),
        }
    }
}
