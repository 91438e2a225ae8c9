//! Application layer: service orchestration and lock discipline.

pub mod locks;
pub mod service;

pub use service::NameRegistryService;
