//! Outbound Ports (Driven Ports / SPI)
//!
//! Collaborators owned by other subsystems. The name registry only reads
//! through these traits and never assumes a concrete backing store.

use shared_types::{Hash, NameTransaction, NodeState, Script};
use thiserror::Error;

use crate::domain::entities::NameRecord;

/// Failure reported by a name index backend.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("name database corrupted: {0}")]
    Corrupted(String),

    #[error("name database read failed: {0}")]
    Read(String),
}

/// Failure reported by a transaction lookup backend.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("transaction lookup failed: {0}")]
    Backend(String),
}

/// Ordered, seekable iteration over the name index.
///
/// Entries come back in ascending byte order of the name.
pub trait NameCursor {
    /// Position before the first entry whose name is `>= start`.
    fn seek(&mut self, start: &[u8]);

    /// Next `(name, record)` pair, or `None` once the index is exhausted.
    fn next_entry(&mut self) -> Result<Option<(Vec<u8>, NameRecord)>, IndexError>;
}

/// Versioned key-value index of committed name records.
pub trait NameIndex: Send + Sync {
    /// Current record of a name.
    fn get_name(&self, name: &[u8]) -> Result<Option<NameRecord>, IndexError>;

    /// Past records of a name, oldest first. Excludes the current record.
    fn get_history(&self, name: &[u8]) -> Result<Vec<NameRecord>, IndexError>;

    /// Whether the deployment retains name history.
    fn history_enabled(&self) -> bool;

    /// Fresh cursor positioned at the beginning of the index.
    fn iterate_names(&self) -> Box<dyn NameCursor + '_>;

    /// Write buffered state through to the backing store.
    fn flush(&self) -> Result<(), IndexError>;

    /// Self-check of the index. `true` means consistent.
    fn validate_name_db(&self) -> bool;
}

/// Chain tip and consensus parameters.
pub trait ChainStateProvider: Send + Sync {
    fn current_height(&self) -> u64;

    /// Blocks after which a name updated at `height` expires.
    fn expiration_depth(&self, height: u64) -> u64;

    fn node_state(&self) -> NodeState;
}

/// Pool of unconfirmed transactions.
pub trait PendingPool: Send + Sync {
    fn transactions(&self) -> Vec<&NameTransaction>;
}

/// Ownership lookup against a wallet.
pub trait WalletOwnership: Send + Sync {
    fn is_spendable(&self, script: &Script) -> bool;
}

/// Placeholder wallet type for services running without a wallet.
#[derive(Debug)]
pub enum NoWallet {}

impl WalletOwnership for NoWallet {
    fn is_spendable(&self, _script: &Script) -> bool {
        match *self {}
    }
}

/// State of the transaction index behind [`TransactionLookup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxIndexStatus {
    Disabled,
    Syncing,
    Ready,
}

/// Resolves the block time of confirmed transactions.
pub trait TransactionLookup: Send + Sync {
    fn index_status(&self) -> TxIndexStatus;

    /// Time of the block containing `txid`, if the transaction is known.
    fn block_time(&self, txid: &Hash) -> Result<Option<u64>, LookupError>;
}
