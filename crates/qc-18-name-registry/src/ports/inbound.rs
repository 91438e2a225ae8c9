//! Inbound Ports (Driving Ports / API)

use std::path::Path;

use crate::domain::entities::OutputRecord;
use crate::domain::errors::NameRegistryError;
use crate::domain::options::OptionsBag;

/// Primary Name Registry query API.
///
/// Every operation validates its options bag first. Names passed as text
/// are decoded with the request's `nameEncoding`.
pub trait NameRegistryApi: Send + Sync {
    /// Current record of `name`.
    fn lookup(&self, name: &str, options: &OptionsBag) -> Result<OutputRecord, NameRegistryError>;

    /// History of `name`, oldest first, ending with the current record.
    fn history(
        &self,
        name: &str,
        options: &OptionsBag,
    ) -> Result<Vec<OutputRecord>, NameRegistryError>;

    /// Up to `count` names at or after `start` in index order.
    ///
    /// `start = None` begins at the first name; `count = None` uses the
    /// configured default.
    fn scan(
        &self,
        start: Option<&str>,
        count: Option<i64>,
        options: &OptionsBag,
    ) -> Result<Vec<OutputRecord>, NameRegistryError>;

    /// Name operations in unconfirmed transactions, optionally for one name.
    fn pending(
        &self,
        name: Option<&str>,
        options: &OptionsBag,
    ) -> Result<Vec<OutputRecord>, NameRegistryError>;

    /// Stream names matching `pattern` into a JSON array at `destination`.
    ///
    /// Returns a summary such as `Found 3 names with "^d/" regexp`.
    fn export(
        &self,
        pattern: &str,
        destination: &Path,
        options: &OptionsBag,
    ) -> Result<String, NameRegistryError>;

    /// Flush the index and run its self-validation.
    fn check_index_consistency(&self) -> Result<bool, NameRegistryError>;
}
