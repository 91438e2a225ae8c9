//! # Shared Types Crate
//!
//! Chain primitives shared across the name registry subsystem and the
//! tools built on top of it.
//!
//! ## Design Principles
//!
//! - **Opaque bytes**: names, values and scripts are raw byte strings. Text
//!   renderings are produced by the consumer, never stored here.
//! - **No consensus logic**: these types describe what the chain contains,
//!   not whether it is valid.

pub mod entities;
pub mod script;

pub use entities::*;
pub use script::*;
