//! # Name Filters
//!
//! Confirmation windows and name patterns applied by scan and export.
//! An absent filter accepts everything.

use regex::Regex;

use super::encoding::render_utf8;
use super::errors::NameRegistryError;

/// Range of update heights admitted by `minConf`/`maxConf`.
///
/// Confirmation depth of a record is `tip - height + 1`, so
/// `height <= tip - minConf + 1` and `height >= tip - maxConf + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeightWindow {
    max_height: i64,
    min_height: Option<i64>,
}

impl HeightWindow {
    pub fn new(current_height: u64, min_conf: u64, max_conf: Option<u64>) -> Self {
        let tip = clamp_i64(current_height);
        Self {
            max_height: tip.saturating_sub(clamp_i64(min_conf)).saturating_add(1),
            min_height: max_conf.map(|conf| tip.saturating_sub(clamp_i64(conf)).saturating_add(1)),
        }
    }

    pub fn contains(&self, height: u64) -> bool {
        let height = clamp_i64(height);
        if height > self.max_height {
            return false;
        }
        match self.min_height {
            Some(min) => height >= min,
            None => true,
        }
    }
}

fn clamp_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Compiled regular expression over the UTF-8 rendering of names.
///
/// Matching is unanchored search; names that are not valid UTF-8 never
/// match.
#[derive(Debug, Clone)]
pub struct NamePattern {
    regex: Regex,
}

impl NamePattern {
    pub fn compile(pattern: &str) -> Result<Self, NameRegistryError> {
        Regex::new(pattern)
            .map(|regex| Self { regex })
            .map_err(|e| NameRegistryError::invalid_parameter(format!("invalid regexp: {}", e)))
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn matches_text(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    pub fn matches_name(&self, name: &[u8]) -> bool {
        render_utf8(name).is_some_and(|text| self.matches_text(text))
    }
}
