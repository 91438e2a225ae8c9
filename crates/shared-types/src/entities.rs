//! # Core Chain Entities
//!
//! ## Clusters
//!
//! - **Chain**: `Hash`, `OutPoint`, `NodeState`
//! - **Transactions**: `NameTransaction`, `NameTxOutput`

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::script::{NameOperation, Script};

// =============================================================================
// CLUSTER A: THE CHAIN
// =============================================================================

/// A 32-byte transaction or block hash.
pub type Hash = [u8; 32];

/// Reference to a single output of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct OutPoint {
    /// Hash of the transaction holding the output.
    pub txid: Hash,
    /// Index of the output within that transaction.
    pub vout: u32,
}

impl OutPoint {
    pub fn new(txid: Hash, vout: u32) -> Self {
        Self { txid, vout }
    }

    /// Lowercase hex rendering of the transaction hash.
    pub fn txid_hex(&self) -> String {
        hex::encode(self.txid)
    }
}

impl fmt::Display for OutPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.txid_hex(), self.vout)
    }
}

/// Node operational states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum NodeState {
    /// Normal operation.
    #[default]
    Running,
    /// Synchronizing with the network (initial block download).
    Syncing,
}

impl NodeState {
    pub fn is_syncing(&self) -> bool {
        matches!(self, NodeState::Syncing)
    }
}

// =============================================================================
// CLUSTER B: TRANSACTIONS
// =============================================================================

/// A single transaction output as seen by the name subsystem.
///
/// Transaction decoding happens upstream; the output arrives with its name
/// operation (if any) already separated from the owner script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameTxOutput {
    /// Amount locked in the output, in base units.
    pub value: u64,
    /// Owner script the output pays to.
    pub address: Script,
    /// Name operation prefixed to the owner script.
    pub name_op: Option<NameOperation>,
}

/// A transaction reduced to the parts the name subsystem inspects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameTransaction {
    /// Transaction hash.
    pub txid: Hash,
    /// Outputs in serialization order.
    pub outputs: Vec<NameTxOutput>,
}

impl NameTransaction {
    /// Whether any output carries a name operation.
    pub fn is_name_transaction(&self) -> bool {
        self.outputs.iter().any(|out| out.name_op.is_some())
    }
}
