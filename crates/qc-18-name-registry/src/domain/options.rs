//! # Query Options
//!
//! Every operation accepts a loosely-typed JSON options bag. The parser in
//! this module checks it against the keys the operation recognises and
//! turns it into a typed, immutable [`QueryOptions`].
//!
//! | Key             | Type    | Operations                 | Default          |
//! |-----------------|---------|----------------------------|------------------|
//! | `nameEncoding`  | string  | all                        | configured       |
//! | `valueEncoding` | string  | all                        | configured       |
//! | `minConf`       | integer | scan                       | 1                |
//! | `maxConf`       | integer | scan                       | unbounded        |
//! | `prefix`        | string  | scan                       | empty            |
//! | `regexp`        | string  | scan                       | none             |
//! | `withHistory`   | boolean | export                     | false            |
//! | `count`         | integer | export                     | -1 (unbounded)   |
//!
//! A `null` value is treated as if the key were absent.

use serde_json::Value;
use tracing::warn;

use super::encoding::{decode, NameEncoding};
use super::errors::NameRegistryError;
use super::filters::NamePattern;
use crate::config::NameRegistryConfig;

/// Raw options bag as received from a client.
pub type OptionsBag = serde_json::Map<String, Value>;

/// Expected JSON type of a recognised option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Text,
    Integer,
    Boolean,
}

impl OptionKind {
    fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::Text => value.is_string(),
            Self::Integer => value.as_i64().is_some(),
            Self::Boolean => value.is_boolean(),
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Self::Text => "string",
            Self::Integer => "integer",
            Self::Boolean => "bool",
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

const ENCODING_OPTIONS: &[(&str, OptionKind)] = &[
    ("nameEncoding", OptionKind::Text),
    ("valueEncoding", OptionKind::Text),
];

const SCAN_OPTIONS: &[(&str, OptionKind)] = &[
    ("nameEncoding", OptionKind::Text),
    ("valueEncoding", OptionKind::Text),
    ("minConf", OptionKind::Integer),
    ("maxConf", OptionKind::Integer),
    ("prefix", OptionKind::Text),
    ("regexp", OptionKind::Text),
];

const EXPORT_OPTIONS: &[(&str, OptionKind)] = &[
    ("nameEncoding", OptionKind::Text),
    ("valueEncoding", OptionKind::Text),
    ("withHistory", OptionKind::Boolean),
    ("count", OptionKind::Integer),
];

/// Operation an options bag is parsed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOperation {
    Lookup,
    History,
    Scan,
    Pending,
    Export,
}

impl QueryOperation {
    pub fn recognized_options(&self) -> &'static [(&'static str, OptionKind)] {
        match self {
            Self::Lookup | Self::History | Self::Pending => ENCODING_OPTIONS,
            Self::Scan => SCAN_OPTIONS,
            Self::Export => EXPORT_OPTIONS,
        }
    }
}

/// Validated options for a single query invocation.
#[derive(Debug, Clone)]
pub struct QueryOptions {
    name_encoding: NameEncoding,
    value_encoding: NameEncoding,
    min_conf: u64,
    max_conf: Option<u64>,
    prefix: Vec<u8>,
    pattern: Option<NamePattern>,
    with_history: bool,
    max_count: Option<u64>,
}

impl QueryOptions {
    /// Options with every filter absent.
    pub fn defaults(config: &NameRegistryConfig) -> Self {
        Self {
            name_encoding: config.name_encoding,
            value_encoding: config.value_encoding,
            min_conf: 1,
            max_conf: None,
            prefix: Vec::new(),
            pattern: None,
            with_history: false,
            max_count: None,
        }
    }

    pub fn name_encoding(&self) -> NameEncoding {
        self.name_encoding
    }

    pub fn value_encoding(&self) -> NameEncoding {
        self.value_encoding
    }

    pub fn min_conf(&self) -> u64 {
        self.min_conf
    }

    pub fn max_conf(&self) -> Option<u64> {
        self.max_conf
    }

    pub fn prefix(&self) -> &[u8] {
        &self.prefix
    }

    pub fn pattern(&self) -> Option<&NamePattern> {
        self.pattern.as_ref()
    }

    pub fn with_history(&self) -> bool {
        self.with_history
    }

    /// Export cap; `None` means unbounded.
    pub fn max_count(&self) -> Option<u64> {
        self.max_count
    }

    /// Decode a name argument with this request's name encoding.
    pub fn decode_name(&self, text: &str) -> Result<Vec<u8>, NameRegistryError> {
        Ok(decode(text, self.name_encoding)?)
    }
}

/// Validating parser from [`OptionsBag`] to [`QueryOptions`].
pub struct OptionsParser<'a> {
    config: &'a NameRegistryConfig,
}

impl<'a> OptionsParser<'a> {
    pub fn new(config: &'a NameRegistryConfig) -> Self {
        Self { config }
    }

    pub fn parse(
        &self,
        operation: QueryOperation,
        bag: &OptionsBag,
    ) -> Result<QueryOptions, NameRegistryError> {
        check_schema(operation.recognized_options(), bag)?;

        let mut options = QueryOptions::defaults(self.config);
        options.name_encoding = encoding_option(bag, "nameEncoding", self.config.name_encoding);
        options.value_encoding = encoding_option(bag, "valueEncoding", self.config.value_encoding);

        if let Some(min_conf) = integer_option(bag, "minConf") {
            if min_conf < 1 {
                return Err(NameRegistryError::invalid_parameter("minConf must be >= 1"));
            }
            options.min_conf = min_conf as u64;
        }

        if let Some(max_conf) = integer_option(bag, "maxConf") {
            if max_conf < 0 {
                return Err(NameRegistryError::invalid_parameter(
                    "maxConf must not be negative",
                ));
            }
            options.max_conf = Some(max_conf as u64);
        }

        if let Some(prefix) = text_option(bag, "prefix") {
            options.prefix = options.decode_name(prefix)?;
        }

        if let Some(pattern) = text_option(bag, "regexp") {
            options.pattern = Some(NamePattern::compile(pattern)?);
        }

        if let Some(with_history) = option_value(bag, "withHistory").and_then(Value::as_bool) {
            options.with_history = with_history;
        }

        if let Some(count) = integer_option(bag, "count") {
            options.max_count = match count {
                -1 => None,
                n if n < -1 => {
                    return Err(NameRegistryError::invalid_parameter(
                        "count must be -1 or non-negative",
                    ))
                }
                n => Some(n as u64),
            };
        }

        Ok(options)
    }
}

fn check_schema(
    schema: &[(&'static str, OptionKind)],
    bag: &OptionsBag,
) -> Result<(), NameRegistryError> {
    for (key, value) in bag {
        let Some((_, kind)) = schema.iter().find(|(name, _)| *name == key.as_str()) else {
            return Err(NameRegistryError::UnknownOption { key: key.clone() });
        };
        if !value.is_null() && !kind.accepts(value) {
            return Err(NameRegistryError::InvalidOptionType {
                key: key.clone(),
                expected: kind.type_name(),
                actual: json_type_name(value),
            });
        }
    }
    Ok(())
}

fn option_value<'b>(bag: &'b OptionsBag, key: &str) -> Option<&'b Value> {
    bag.get(key).filter(|value| !value.is_null())
}

fn text_option<'b>(bag: &'b OptionsBag, key: &str) -> Option<&'b str> {
    option_value(bag, key).and_then(Value::as_str)
}

fn integer_option(bag: &OptionsBag, key: &str) -> Option<i64> {
    option_value(bag, key).and_then(Value::as_i64)
}

/// Unrecognised encoding names fall back to the configured default.
fn encoding_option(bag: &OptionsBag, key: &str, default: NameEncoding) -> NameEncoding {
    match text_option(bag, key) {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|e| {
            warn!("Invalid value for {} in options: {}, using default {}", key, e, default);
            default
        }),
    }
}
