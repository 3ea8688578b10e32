use smt::hash::Digest;

const OWNER: u8 = 1;
const SNAPSHOT: u8 = 2;
const ROOT: u8 = 3;

/// Database keys
///
/// Every key is `tag || len(owner) as u32 be || owner`, followed by a big-endian sequence number
/// for snapshots or the root bytes for the root index. The length prefix keeps one owner's keys
/// from being a prefix of another's, and big-endian sequences keep snapshots in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Key<'a> {
    /// Per-owner metadata
    Owner { owner: &'a str },
    /// The immutable record for one sequence number
    Snapshot { owner: &'a str, sequence: u64 },
    /// The latest sequence number whose mapping hashes to `root`
    Root { owner: &'a str, root: Digest },
}

impl Key<'_> {
    pub(crate) fn serialize(&self) -> Vec<u8> {
        match self {
            Key::Owner { owner } => prefix(OWNER, owner),
            Key::Snapshot { owner, sequence } => {
                let mut key = prefix(SNAPSHOT, owner);
                key.extend_from_slice(&sequence.to_be_bytes());
                key
            }
            Key::Root { owner, root } => {
                let mut key = prefix(ROOT, owner);
                key.extend_from_slice(&root.to_bytes());
                key
            }
        }
    }
}

/// The common prefix of every [`Key::Snapshot`] of `owner`
pub(crate) fn snapshots_of(owner: &str) -> Vec<u8> {
    prefix(SNAPSHOT, owner)
}

fn prefix(tag: u8, owner: &str) -> Vec<u8> {
    let len = u32::try_from(owner.len()).unwrap_or(u32::MAX);
    let mut key = Vec::with_capacity(5 + owner.len() + 32);
    key.push(tag);
    key.extend_from_slice(&len.to_be_bytes());
    key.extend_from_slice(owner.as_bytes());
    key
}
