//! # Domain Entities
//!
//! - `NameRecord`: committed state of one name, as read from the index
//! - `ExpirationContext` / `ExpirationInfo`: expiry arithmetic
//! - `OutputRecord`: assembled result for one (name, record) pair

use serde::{Deserialize, Serialize};
use shared_types::{OutPoint, Script};

use super::encoding::NameEncoding;

/// Committed state of a name at one point in its history.
///
/// History entries for a name, followed by its current record, are totally
/// ordered by `height` and never share an `update_outpoint`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRecord {
    /// Opaque value bytes.
    pub value: Vec<u8>,
    /// Owner script.
    pub address: Script,
    /// Output of the transaction that last updated the name.
    pub update_outpoint: OutPoint,
    /// Height at which that update was confirmed.
    pub height: u64,
}

/// Chain tip and expiration depth, sampled once per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpirationContext {
    pub current_height: u64,
    pub expiration_depth: u64,
}

/// Expiry state of a record relative to the current tip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpirationInfo {
    pub height: u64,
    pub expires_in: i64,
    pub expired: bool,
}

impl ExpirationInfo {
    /// `expires_in = height + depth - tip`; a record expires when it hits zero.
    pub fn compute(update_height: u64, ctx: ExpirationContext) -> Self {
        let expire_height =
            clamp_i64(update_height).saturating_add(clamp_i64(ctx.expiration_depth));
        let expires_in = expire_height.saturating_sub(clamp_i64(ctx.current_height));
        Self {
            height: update_height,
            expires_in,
            expired: expires_in <= 0,
        }
    }
}

fn clamp_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Assembled query result for one name at one point in its history.
///
/// Field names match the wire format. Optional parts are omitted from the
/// JSON rendering when absent; in particular `ismine` is never emitted as a
/// placeholder when ownership is unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub name_encoding: NameEncoding,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_error: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub value_encoding: NameEncoding,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_error: Option<String>,

    pub txid: String,
    pub vout: u32,
    pub address: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ismine: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expired: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub op: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<OutputRecord>>,
}

impl OutputRecord {
    pub(crate) fn with_expiration(mut self, info: ExpirationInfo) -> Self {
        self.height = Some(info.height);
        self.expires_in = Some(info.expires_in);
        self.expired = Some(info.expired);
        self
    }

    pub(crate) fn with_ownership(mut self, is_mine: bool) -> Self {
        self.ismine = Some(is_mine);
        self
    }

    pub(crate) fn with_operation(mut self, label: &str) -> Self {
        self.op = Some(label.to_string());
        self
    }

    /// Join the block time of the record's last update (export, current record).
    pub(crate) fn with_last_updated(mut self, timestamp: u64) -> Self {
        self.last_updated = Some(timestamp);
        self
    }

    /// Join the block time of a historical update (export, history entries).
    pub(crate) fn with_time(mut self, timestamp: u64) -> Self {
        self.time = Some(timestamp);
        self
    }

    pub(crate) fn with_history(mut self, history: Vec<OutputRecord>) -> Self {
        self.history = Some(history);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(current_height: u64, expiration_depth: u64) -> ExpirationContext {
        ExpirationContext {
            current_height,
            expiration_depth,
        }
    }

    #[test]
    fn test_expiration_not_expired() {
        let info = ExpirationInfo::compute(100, ctx(105, 50));
        assert_eq!(info.height, 100);
        assert_eq!(info.expires_in, 45);
        assert!(!info.expired);
    }

    #[test]
    fn test_expiration_boundary_is_expired() {
        let info = ExpirationInfo::compute(100, ctx(150, 50));
        assert_eq!(info.expires_in, 0);
        assert!(info.expired);

        let info = ExpirationInfo::compute(100, ctx(200, 50));
        assert_eq!(info.expires_in, -50);
        assert!(info.expired);
    }

    #[test]
    fn test_expiration_saturates_on_huge_heights() {
        let info = ExpirationInfo::compute(u64::MAX - 5, ctx(10, 36_000));
        assert_eq!(info.height, u64::MAX - 5);
        assert_eq!(info.expires_in, i64::MAX - 10);
        assert!(!info.expired);

        let info = ExpirationInfo::compute(0, ctx(u64::MAX, 36_000));
        assert_eq!(info.expires_in, 36_000 - i64::MAX);
        assert!(info.expired);
    }
}
