//! JSON registry snapshots.
//!
//! A snapshot describes the chain tip, the name index (with history), the
//! pending pool, an optional wallet and the block times of known
//! transactions. Names and values are text in the snapshot's `encoding`;
//! scripts and txids are hex.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use qc_18_name_registry::adapters::{
    InMemoryNameIndex, InMemoryPendingPool, InMemoryTransactionLookup, InMemoryWallet,
    StaticChainState, DEFAULT_EXPIRATION_DEPTH,
};
use qc_18_name_registry::domain::encoding::decode;
use qc_18_name_registry::{NameEncoding, NameRecord, TxIndexStatus};
use serde::Deserialize;
use shared_types::{Hash, NameOperation, NameTransaction, NameTxOutput, NodeState, OutPoint, Script};

#[derive(Debug, Deserialize)]
pub struct Snapshot {
    #[serde(default = "default_encoding")]
    pub encoding: NameEncoding,
    pub height: u64,
    #[serde(default = "default_expiration_depth")]
    pub expiration_depth: u64,
    #[serde(default)]
    pub syncing: bool,
    #[serde(default)]
    pub history_enabled: bool,
    #[serde(default)]
    pub tx_index: TxIndexSetting,
    #[serde(default)]
    pub names: Vec<NameEntry>,
    #[serde(default)]
    pub pending: Vec<PendingTx>,
    #[serde(default)]
    pub wallet: Option<Vec<String>>,
    #[serde(default)]
    pub block_times: HashMap<String, u64>,
}

fn default_encoding() -> NameEncoding {
    NameEncoding::Utf8
}

fn default_expiration_depth() -> u64 {
    DEFAULT_EXPIRATION_DEPTH
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxIndexSetting {
    Disabled,
    Syncing,
    #[default]
    Ready,
}

impl From<TxIndexSetting> for TxIndexStatus {
    fn from(setting: TxIndexSetting) -> Self {
        match setting {
            TxIndexSetting::Disabled => TxIndexStatus::Disabled,
            TxIndexSetting::Syncing => TxIndexStatus::Syncing,
            TxIndexSetting::Ready => TxIndexStatus::Ready,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RecordEntry {
    pub value: String,
    #[serde(default)]
    pub address: String,
    pub txid: String,
    #[serde(default)]
    pub vout: u32,
    pub height: u64,
}

#[derive(Debug, Deserialize)]
pub struct NameEntry {
    pub name: String,
    #[serde(flatten)]
    pub current: RecordEntry,
    /// Past records, oldest first.
    #[serde(default)]
    pub history: Vec<RecordEntry>,
}

#[derive(Debug, Deserialize)]
pub struct PendingTx {
    pub txid: String,
    pub outputs: Vec<PendingOutput>,
}

#[derive(Debug, Deserialize)]
pub struct PendingOutput {
    #[serde(default)]
    pub amount: u64,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub op: Option<PendingOp>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind")]
pub enum PendingOp {
    #[serde(rename = "name_new")]
    NameNew { hash: String },
    #[serde(rename = "name_firstupdate")]
    FirstUpdate {
        name: String,
        value: String,
        #[serde(default)]
        rand: String,
    },
    #[serde(rename = "name_update")]
    Update { name: String, value: String },
}

/// Adapters populated from a snapshot.
pub struct LoadedRegistry {
    pub index: InMemoryNameIndex,
    pub pool: InMemoryPendingPool,
    pub wallet: Option<InMemoryWallet>,
    pub lookup: InMemoryTransactionLookup,
    pub chain: StaticChainState,
}

impl Snapshot {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading snapshot {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing snapshot {}", path.display()))
    }

    pub fn into_registry(self) -> Result<LoadedRegistry> {
        let encoding = self.encoding;
        let text = |field: &str, raw: &str| {
            decode(raw, encoding).map_err(|e| anyhow!("{} {:?}: {}", field, raw, e))
        };

        let mut index = InMemoryNameIndex::new(self.history_enabled);
        for entry in &self.names {
            let name = text("name", &entry.name)?;
            for past in &entry.history {
                index.insert_history(&name, record(past, encoding)?);
            }
            index.insert(&name, record(&entry.current, encoding)?);
        }

        let mut pool = InMemoryPendingPool::default();
        for tx in &self.pending {
            let mut outputs = Vec::with_capacity(tx.outputs.len());
            for out in &tx.outputs {
                let name_op = match &out.op {
                    None => None,
                    Some(PendingOp::NameNew { hash }) => Some(NameOperation::NameNew {
                        hash: hex::decode(hash).context("name_new hash")?,
                    }),
                    Some(PendingOp::FirstUpdate { name, value, rand }) => {
                        Some(NameOperation::FirstUpdate {
                            name: text("name", name)?,
                            value: text("value", value)?,
                            rand: hex::decode(rand).context("name_firstupdate rand")?,
                        })
                    }
                    Some(PendingOp::Update { name, value }) => Some(NameOperation::Update {
                        name: text("name", name)?,
                        value: text("value", value)?,
                    }),
                };
                outputs.push(NameTxOutput {
                    value: out.amount,
                    address: script(&out.address)?,
                    name_op,
                });
            }
            pool.add(NameTransaction {
                txid: txid(&tx.txid)?,
                outputs,
            });
        }

        let wallet = match &self.wallet {
            None => None,
            Some(scripts) => {
                let mut wallet = InMemoryWallet::default();
                for raw in scripts {
                    wallet.add_script(script(raw)?);
                }
                Some(wallet)
            }
        };

        let mut lookup = InMemoryTransactionLookup::new(self.tx_index.into());
        for (raw, time) in &self.block_times {
            lookup.insert(txid(raw)?, *time);
        }

        let chain = StaticChainState::new(self.height, self.expiration_depth);
        if self.syncing {
            chain.set_node_state(NodeState::Syncing);
        }

        Ok(LoadedRegistry {
            index,
            pool,
            wallet,
            lookup,
            chain,
        })
    }
}

fn record(entry: &RecordEntry, encoding: NameEncoding) -> Result<NameRecord> {
    Ok(NameRecord {
        value: decode(&entry.value, encoding)
            .map_err(|e| anyhow!("value {:?}: {}", entry.value, e))?,
        address: script(&entry.address)?,
        update_outpoint: OutPoint::new(txid(&entry.txid)?, entry.vout),
        height: entry.height,
    })
}

fn script(raw: &str) -> Result<Script> {
    let bytes = hex::decode(raw).with_context(|| format!("script {:?} is not hex", raw))?;
    Ok(Script::new(bytes))
}

fn txid(raw: &str) -> Result<Hash> {
    let bytes = hex::decode(raw).with_context(|| format!("txid {:?} is not hex", raw))?;
    bytes
        .try_into()
        .map_err(|b: Vec<u8>| anyhow!("txid must be 32 bytes, got {}", b.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use qc_18_name_registry::{ChainStateProvider, NameIndex, PendingPool, WalletOwnership};

    const TXID_A: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
    const TXID_B: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";
    const P2PKH: &str = "76a914010101010101010101010101010101010101010188ac";

    fn sample() -> Snapshot {
        serde_json::from_value(serde_json::json!({
            "height": 105,
            "expiration_depth": 50,
            "history_enabled": true,
            "names": [{
                "name": "d/abc",
                "value": "hello",
                "address": P2PKH,
                "txid": TXID_B,
                "height": 100,
                "history": [{"value": "old", "txid": TXID_A, "height": 90}]
            }],
            "pending": [{
                "txid": TXID_A,
                "outputs": [{"address": P2PKH, "op": {"kind": "name_update", "name": "d/abc", "value": "next"}}]
            }],
            "wallet": [P2PKH],
            "block_times": {(TXID_A): 1000, (TXID_B): 2000}
        }))
        .unwrap()
    }

    #[test]
    fn test_snapshot_populates_adapters() {
        let loaded = sample().into_registry().unwrap();

        let record = loaded.index.get_name(b"d/abc").unwrap().unwrap();
        assert_eq!(record.value, b"hello".to_vec());
        assert_eq!(record.height, 100);
        assert_eq!(loaded.index.get_history(b"d/abc").unwrap().len(), 1);
        assert!(loaded.index.validate_name_db());

        assert_eq!(loaded.pool.transactions().len(), 1);
        assert!(loaded.wallet.unwrap().is_spendable(&record.address));
        assert_eq!(loaded.chain.current_height(), 105);
        assert_eq!(loaded.chain.expiration_depth(105), 50);
    }

    #[test]
    fn test_short_txid_rejected() {
        let mut snapshot = sample();
        snapshot.names[0].current.txid = "abcd".to_string();
        assert!(snapshot.into_registry().is_err());
    }

    #[test]
    fn test_hex_encoded_snapshot() {
        let snapshot: Snapshot = serde_json::from_value(serde_json::json!({
            "encoding": "hex",
            "height": 1,
            "names": [{"name": "642f78", "value": "ff", "txid": TXID_A, "height": 1}]
        }))
        .unwrap();
        let loaded = snapshot.into_registry().unwrap();
        assert_eq!(loaded.index.get_name(b"d/x").unwrap().unwrap().value, vec![0xff]);
        assert!(loaded.wallet.is_none());
    }
}
