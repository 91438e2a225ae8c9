//! Algorithms module for the Name Registry
//!
//! - `scan`: paginated, filtered iteration over the name index
//! - `pending`: full scan of unconfirmed name operations
//! - `export`: streaming JSON array export

pub mod export;
pub mod pending;
pub mod scan;

pub use export::{export_summary, resolve_timestamp, ExportRun, JsonArrayWriter};
pub use pending::scan_pending;
pub use scan::{scan_names, ScanFilter};
