//! Ports module for the Name Registry
//!
//! Defines inbound (API) and outbound (SPI) port traits.

pub mod inbound;
pub mod outbound;

pub use inbound::NameRegistryApi;
pub use outbound::{
    ChainStateProvider, IndexError, LookupError, NameCursor, NameIndex, NoWallet, PendingPool,
    TransactionLookup, TxIndexStatus, WalletOwnership,
};
