//! In-memory adapters for every outbound port.
//!
//! Used by tests and by the `qc-names` snapshot tool.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::ops::Bound;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use shared_types::{Hash, NameTransaction, NodeState, Script};
use tracing::warn;

use crate::domain::entities::NameRecord;
use crate::ports::outbound::{
    ChainStateProvider, IndexError, LookupError, NameCursor, NameIndex, PendingPool,
    TransactionLookup, TxIndexStatus, WalletOwnership,
};

/// Expiration depth of names on the main chain.
pub const DEFAULT_EXPIRATION_DEPTH: u64 = 36_000;

// =============================================================================
// NAME INDEX
// =============================================================================

/// `BTreeMap`-backed name index with optional history retention.
#[derive(Debug, Default)]
pub struct InMemoryNameIndex {
    names: BTreeMap<Vec<u8>, NameRecord>,
    history: HashMap<Vec<u8>, Vec<NameRecord>>,
    history_enabled: bool,
    flushes: AtomicU64,
}

impl InMemoryNameIndex {
    pub fn new(history_enabled: bool) -> Self {
        Self {
            history_enabled,
            ..Default::default()
        }
    }

    /// Set the current record of a name.
    pub fn insert(&mut self, name: &[u8], record: NameRecord) {
        self.names.insert(name.to_vec(), record);
    }

    /// Append a past record. Entries must be added oldest first.
    pub fn insert_history(&mut self, name: &[u8], record: NameRecord) {
        self.history.entry(name.to_vec()).or_default().push(record);
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Number of flushes requested so far.
    pub fn flush_count(&self) -> u64 {
        self.flushes.load(Ordering::Relaxed)
    }
}

impl NameIndex for InMemoryNameIndex {
    fn get_name(&self, name: &[u8]) -> Result<Option<NameRecord>, IndexError> {
        Ok(self.names.get(name).cloned())
    }

    fn get_history(&self, name: &[u8]) -> Result<Vec<NameRecord>, IndexError> {
        Ok(self.history.get(name).cloned().unwrap_or_default())
    }

    fn history_enabled(&self) -> bool {
        self.history_enabled
    }

    fn iterate_names(&self) -> Box<dyn NameCursor + '_> {
        Box::new(InMemoryNameCursor {
            names: &self.names,
            position: Bound::Unbounded,
        })
    }

    fn flush(&self) -> Result<(), IndexError> {
        self.flushes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// History chains must be strictly increasing in height, end below the
    /// current record, and never repeat an outpoint.
    fn validate_name_db(&self) -> bool {
        for (name, entries) in &self.history {
            let Some(current) = self.names.get(name) else {
                warn!("history kept for unknown name 0x{}", hex::encode(name));
                return false;
            };

            let mut seen = HashSet::new();
            let mut last_height = None;
            for record in entries.iter().chain(std::iter::once(current)) {
                if last_height.is_some_and(|h| record.height <= h) {
                    warn!("history of 0x{} is not ordered by height", hex::encode(name));
                    return false;
                }
                if !seen.insert(record.update_outpoint) {
                    warn!("history of 0x{} repeats {}", hex::encode(name), record.update_outpoint);
                    return false;
                }
                last_height = Some(record.height);
            }
        }
        true
    }
}

/// Cursor that remembers the last key it returned.
struct InMemoryNameCursor<'a> {
    names: &'a BTreeMap<Vec<u8>, NameRecord>,
    position: Bound<Vec<u8>>,
}

impl NameCursor for InMemoryNameCursor<'_> {
    fn seek(&mut self, start: &[u8]) {
        self.position = Bound::Included(start.to_vec());
    }

    fn next_entry(&mut self) -> Result<Option<(Vec<u8>, NameRecord)>, IndexError> {
        let next = self
            .names
            .range::<Vec<u8>, _>((self.position.as_ref(), Bound::Unbounded))
            .next()
            .map(|(name, record)| (name.clone(), record.clone()));

        if let Some((name, _)) = &next {
            self.position = Bound::Excluded(name.clone());
        }
        Ok(next)
    }
}

// =============================================================================
// MEMPOOL / WALLET / TRANSACTIONS
// =============================================================================

/// Unconfirmed transactions keyed by txid.
#[derive(Debug, Default)]
pub struct InMemoryPendingPool {
    transactions: BTreeMap<Hash, NameTransaction>,
}

impl InMemoryPendingPool {
    pub fn add(&mut self, tx: NameTransaction) {
        self.transactions.insert(tx.txid, tx);
    }
}

impl PendingPool for InMemoryPendingPool {
    fn transactions(&self) -> Vec<&NameTransaction> {
        self.transactions.values().collect()
    }
}

/// Wallet that owns an explicit set of scripts.
#[derive(Debug, Default)]
pub struct InMemoryWallet {
    scripts: HashSet<Script>,
}

impl InMemoryWallet {
    pub fn add_script(&mut self, script: Script) {
        self.scripts.insert(script);
    }
}

impl WalletOwnership for InMemoryWallet {
    fn is_spendable(&self, script: &Script) -> bool {
        self.scripts.contains(script)
    }
}

/// Block times of confirmed transactions.
#[derive(Debug)]
pub struct InMemoryTransactionLookup {
    status: TxIndexStatus,
    times: HashMap<Hash, u64>,
}

impl InMemoryTransactionLookup {
    pub fn new(status: TxIndexStatus) -> Self {
        Self {
            status,
            times: HashMap::new(),
        }
    }

    pub fn insert(&mut self, txid: Hash, block_time: u64) {
        self.times.insert(txid, block_time);
    }
}

impl TransactionLookup for InMemoryTransactionLookup {
    fn index_status(&self) -> TxIndexStatus {
        self.status
    }

    fn block_time(&self, txid: &Hash) -> Result<Option<u64>, LookupError> {
        Ok(self.times.get(txid).copied())
    }
}

// =============================================================================
// CHAIN STATE
// =============================================================================

/// Chain state with a settable tip and a fixed expiration depth.
#[derive(Debug)]
pub struct StaticChainState {
    height: AtomicU64,
    expiration_depth: u64,
    state: RwLock<NodeState>,
}

impl StaticChainState {
    pub fn new(height: u64, expiration_depth: u64) -> Self {
        Self {
            height: AtomicU64::new(height),
            expiration_depth,
            state: RwLock::new(NodeState::Running),
        }
    }

    pub fn set_height(&self, height: u64) {
        self.height.store(height, Ordering::Relaxed);
    }

    pub fn set_node_state(&self, state: NodeState) {
        *self.state.write() = state;
    }
}

impl ChainStateProvider for StaticChainState {
    fn current_height(&self) -> u64 {
        self.height.load(Ordering::Relaxed)
    }

    fn expiration_depth(&self, _height: u64) -> u64 {
        self.expiration_depth
    }

    fn node_state(&self) -> NodeState {
        *self.state.read()
    }
}
