//! Domain module for the Name Registry
//!
//! Encodings, options, filters, result assembly and the error taxonomy.

pub mod assembler;
pub mod encoding;
pub mod entities;
pub mod errors;
pub mod filters;
pub mod options;

pub use assembler::{ResultAssembler, NONSTANDARD_ADDRESS};
pub use encoding::{NameEncoding, UnknownEncoding};
pub use entities::*;
pub use errors::*;
pub use filters::{HeightWindow, NamePattern};
pub use options::{OptionKind, OptionsBag, OptionsParser, QueryOperation, QueryOptions};
