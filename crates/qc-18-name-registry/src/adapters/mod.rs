//! Adapters module for the Name Registry

pub mod memory;

pub use memory::{
    InMemoryNameIndex, InMemoryPendingPool, InMemoryTransactionLookup, InMemoryWallet,
    StaticChainState, DEFAULT_EXPIRATION_DEPTH,
};
