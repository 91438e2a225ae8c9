//! # Result Assembler
//!
//! Builds the [`OutputRecord`] for one name at one point in its history.
//! Assembly never fails: stored bytes that cannot be shown in the requested
//! encoding are reported through `name_error` / `value_error`.

use shared_types::{OutPoint, Script};

use super::encoding::EncodedField;
use super::entities::{ExpirationContext, ExpirationInfo, NameRecord, OutputRecord};
use super::options::QueryOptions;
use crate::ports::outbound::WalletOwnership;

/// Display address of a script without a standard destination.
pub const NONSTANDARD_ADDRESS: &str = "<nonstandard>";

/// Assembles output records for a single request.
///
/// Expiration is attached only when a context is supplied, ownership only
/// when a wallet is supplied.
pub struct ResultAssembler<'a> {
    options: &'a QueryOptions,
    expiration: Option<ExpirationContext>,
    wallet: Option<&'a dyn WalletOwnership>,
}

impl<'a> ResultAssembler<'a> {
    pub fn new(options: &'a QueryOptions) -> Self {
        Self {
            options,
            expiration: None,
            wallet: None,
        }
    }

    pub fn with_expiration(mut self, ctx: ExpirationContext) -> Self {
        self.expiration = Some(ctx);
        self
    }

    pub fn with_wallet(mut self, wallet: Option<&'a dyn WalletOwnership>) -> Self {
        self.wallet = wallet;
        self
    }

    /// Record without height information (pending operations).
    pub fn assemble(
        &self,
        name: &[u8],
        value: &[u8],
        outpoint: &OutPoint,
        address: &Script,
    ) -> OutputRecord {
        let (name_text, name_error) =
            EncodedField::new(name, self.options.name_encoding()).into_parts();
        let (value_text, value_error) =
            EncodedField::new(value, self.options.value_encoding()).into_parts();

        let record = OutputRecord {
            name: name_text,
            name_encoding: self.options.name_encoding(),
            name_error,
            value: value_text,
            value_encoding: self.options.value_encoding(),
            value_error,
            txid: outpoint.txid_hex(),
            vout: outpoint.vout,
            address: display_address(address),
            ismine: None,
            height: None,
            expires_in: None,
            expired: None,
            op: None,
            last_updated: None,
            time: None,
            history: None,
        };

        match self.wallet {
            Some(wallet) => record.with_ownership(wallet.is_spendable(address)),
            None => record,
        }
    }

    /// Record of a committed name, with expiry relative to the sampled tip.
    pub fn assemble_record(&self, name: &[u8], record: &NameRecord) -> OutputRecord {
        let output = self.assemble(name, &record.value, &record.update_outpoint, &record.address);
        match self.expiration {
            Some(ctx) => output.with_expiration(ExpirationInfo::compute(record.height, ctx)),
            None => output,
        }
    }
}

fn display_address(script: &Script) -> String {
    script
        .extract_destination()
        .map(|dest| dest.to_string())
        .unwrap_or_else(|| NONSTANDARD_ADDRESS.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NameRegistryConfig;
    use crate::domain::encoding::NameEncoding;
    use crate::domain::options::{OptionsBag, OptionsParser, QueryOperation};
    use serde_json::json;

    struct OwnsKeyHash;

    impl WalletOwnership for OwnsKeyHash {
        fn is_spendable(&self, script: &Script) -> bool {
            *script == Script::pay_to_key_hash([1; 20])
        }
    }

    fn options(bag: serde_json::Value) -> QueryOptions {
        let config = NameRegistryConfig::default();
        let bag: OptionsBag = bag.as_object().cloned().unwrap();
        OptionsParser::new(&config)
            .parse(QueryOperation::Lookup, &bag)
            .unwrap()
    }

    fn record(height: u64) -> NameRecord {
        NameRecord {
            value: b"{\"ip\":\"1.2.3.4\"}".to_vec(),
            address: Script::pay_to_key_hash([1; 20]),
            update_outpoint: OutPoint::new([0x11; 32], 1),
            height,
        }
    }

    #[test]
    fn test_assemble_record_with_expiration() {
        let opts = options(json!({}));
        let out = ResultAssembler::new(&opts)
            .with_expiration(ExpirationContext {
                current_height: 105,
                expiration_depth: 50,
            })
            .assemble_record(b"d/abc", &record(100));

        assert_eq!(out.name.as_deref(), Some("d/abc"));
        assert_eq!(out.value.as_deref(), Some("{\"ip\":\"1.2.3.4\"}"));
        assert_eq!(out.txid, hex::encode([0x11; 32]));
        assert_eq!(out.vout, 1);
        assert_eq!(out.address, format!("0x{}", hex::encode([1u8; 20])));
        assert_eq!(out.height, Some(100));
        assert_eq!(out.expires_in, Some(45));
        assert_eq!(out.expired, Some(false));
        assert_eq!(out.ismine, None);
    }

    #[test]
    fn test_ismine_omitted_without_wallet() {
        let opts = options(json!({}));
        let out = ResultAssembler::new(&opts).assemble_record(b"d/abc", &record(1));
        let json = serde_json::to_value(&out).unwrap();
        assert!(json.get("ismine").is_none());
        assert!(json.get("expires_in").is_none());
    }

    #[test]
    fn test_ismine_reported_with_wallet() {
        let opts = options(json!({}));
        let wallet = OwnsKeyHash;
        let assembler = ResultAssembler::new(&opts).with_wallet(Some(&wallet));

        let mine = assembler.assemble_record(b"d/abc", &record(1));
        assert_eq!(mine.ismine, Some(true));

        let mut other = record(1);
        other.address = Script::pay_to_key_hash([2; 20]);
        assert_eq!(assembler.assemble_record(b"d/abc", &other).ismine, Some(false));
    }

    #[test]
    fn test_nonstandard_address() {
        let opts = options(json!({}));
        let mut rec = record(1);
        rec.address = Script::new(vec![0x6a, 0x01, 0x02]);
        let out = ResultAssembler::new(&opts).assemble_record(b"d/abc", &rec);
        assert_eq!(out.address, NONSTANDARD_ADDRESS);
    }

    #[test]
    fn test_unrenderable_bytes_use_error_fields() {
        let opts = options(json!({"valueEncoding": "hex"}));
        let mut rec = record(1);
        rec.value = vec![0xff, 0x00];
        let out = ResultAssembler::new(&opts).assemble_record(&[0xc3, 0x28], &rec);

        assert_eq!(out.name, None);
        assert_eq!(out.name_error.as_deref(), Some("invalid data for ascii"));
        assert_eq!(out.value.as_deref(), Some("ff00"));
        assert_eq!(out.value_encoding, NameEncoding::Hex);
        assert_eq!(out.value_error, None);
    }
}
