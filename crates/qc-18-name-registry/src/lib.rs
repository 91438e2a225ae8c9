//! # QC-18: Name Registry Subsystem
//!
//! Read path of the name registry: lookups, history, paginated scans over
//! the ordered name index, pending (unconfirmed) name operations, and a
//! streaming JSON export of matching names.
//!
//! ## Architecture
//!
//! - **Domain**: encodings, query options, filters, result assembly, errors
//! - **Algorithms**: scan/pagination engine, pending scanner, export writer
//! - **Ports**: Inbound (`NameRegistryApi`) and Outbound (`NameIndex`,
//!   `ChainStateProvider`, `PendingPool`, `WalletOwnership`, `TransactionLookup`)
//! - **Adapters**: in-memory implementations of every outbound port
//! - **Application**: service orchestration and lock ordering
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use parking_lot::RwLock;
//! use qc_18_name_registry::adapters::{
//!     InMemoryNameIndex, InMemoryPendingPool, InMemoryTransactionLookup, StaticChainState,
//! };
//! use qc_18_name_registry::{
//!     NameRecord, NameRegistryApi, NameRegistryConfig, NameRegistryService, OptionsBag,
//!     TxIndexStatus,
//! };
//! use shared_types::{OutPoint, Script};
//!
//! let mut index = InMemoryNameIndex::new(false);
//! index.insert(
//!     b"d/abc",
//!     NameRecord {
//!         value: b"hello".to_vec(),
//!         address: Script::pay_to_key_hash([1; 20]),
//!         update_outpoint: OutPoint::new([7; 32], 0),
//!         height: 100,
//!     },
//! );
//!
//! let service = NameRegistryService::new(
//!     NameRegistryConfig::default(),
//!     Arc::new(RwLock::new(index)),
//!     Arc::new(RwLock::new(InMemoryPendingPool::default())),
//!     Arc::new(StaticChainState::new(105, 50)),
//!     Arc::new(InMemoryTransactionLookup::new(TxIndexStatus::Ready)),
//! );
//!
//! let record = service.lookup("d/abc", &OptionsBag::new()).unwrap();
//! assert_eq!(record.expires_in, Some(45));
//! ```

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use application::service::NameRegistryService;
pub use config::{ConfigError, NameRegistryConfig};
pub use domain::encoding::NameEncoding;
pub use domain::entities::*;
pub use domain::errors::{NameRegistryError, NameRegistryErrorPayload, NameRegistryErrorType};
pub use domain::options::{OptionsBag, QueryOperation, QueryOptions};
pub use ports::inbound::NameRegistryApi;
pub use ports::outbound::{
    ChainStateProvider, IndexError, LookupError, NameCursor, NameIndex, NoWallet, PendingPool,
    TransactionLookup, TxIndexStatus, WalletOwnership,
};
