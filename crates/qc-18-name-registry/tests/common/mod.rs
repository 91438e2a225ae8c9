//! Shared fixtures for the name registry integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use parking_lot::RwLock;
use qc_18_name_registry::adapters::{
    InMemoryNameIndex, InMemoryPendingPool, InMemoryTransactionLookup, StaticChainState,
};
use qc_18_name_registry::{NameRecord, NameRegistryConfig, NameRegistryService, OptionsBag, TxIndexStatus};
use shared_types::{OutPoint, Script};

pub type Service = NameRegistryService<InMemoryNameIndex, InMemoryPendingPool>;

pub fn bag(value: serde_json::Value) -> OptionsBag {
    value.as_object().cloned().expect("options must be an object")
}

pub fn record(tag: u8, height: u64) -> NameRecord {
    NameRecord {
        value: format!("value-{}", tag).into_bytes(),
        address: Script::pay_to_key_hash([tag; 20]),
        update_outpoint: OutPoint::new([tag; 32], u32::from(tag % 4)),
        height,
    }
}

pub struct Fixture {
    pub service: Service,
    pub chain: Arc<StaticChainState>,
    pub index: Arc<RwLock<InMemoryNameIndex>>,
    pub pool: Arc<RwLock<InMemoryPendingPool>>,
}

pub fn fixture(
    index: InMemoryNameIndex,
    height: u64,
    expiration_depth: u64,
    lookup: InMemoryTransactionLookup,
) -> Fixture {
    let chain = Arc::new(StaticChainState::new(height, expiration_depth));
    let index = Arc::new(RwLock::new(index));
    let pool = Arc::new(RwLock::new(InMemoryPendingPool::default()));
    let service = NameRegistryService::new(
        NameRegistryConfig::default(),
        index.clone(),
        pool.clone(),
        chain.clone(),
        Arc::new(lookup),
    );
    Fixture {
        service,
        chain,
        index,
        pool,
    }
}

pub fn ready_lookup() -> InMemoryTransactionLookup {
    InMemoryTransactionLookup::new(TxIndexStatus::Ready)
}
