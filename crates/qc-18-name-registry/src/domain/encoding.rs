//! # Name and Value Encodings
//!
//! Names and values are stored as raw bytes. Clients exchange them as text
//! in one of three encodings:
//!
//! | Encoding | Valid text | Valid bytes |
//! |----------|------------|-------------|
//! | `ascii`  | printable 7-bit characters (0x20..=0x7e) | same |
//! | `utf8`   | any string | well-formed UTF-8 |
//! | `hex`    | even number of hex digits (or empty) | any |
//!
//! For every encoding `E` and every byte string `b` valid under `E`,
//! `decode(&encode(b, E)?, E) == b`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Textual encoding of a name or value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameEncoding {
    Ascii,
    Utf8,
    Hex,
}

impl NameEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ascii => "ascii",
            Self::Utf8 => "utf8",
            Self::Hex => "hex",
        }
    }
}

impl fmt::Display for NameEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NameEncoding {
    type Err = UnknownEncoding;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ascii" => Ok(Self::Ascii),
            "utf8" => Ok(Self::Utf8),
            "hex" => Ok(Self::Hex),
            other => Err(UnknownEncoding(other.to_string())),
        }
    }
}

/// Encoding name that is not one of `ascii`, `utf8` or `hex`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid name encoding: {0}")]
pub struct UnknownEncoding(pub String);

/// Text or bytes are not valid for the requested encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid data for {encoding}")]
pub struct EncodingError {
    pub encoding: NameEncoding,
}

fn is_printable_ascii(byte: u8) -> bool {
    (0x20..=0x7e).contains(&byte)
}

/// Decode client text into raw bytes.
pub fn decode(text: &str, encoding: NameEncoding) -> Result<Vec<u8>, EncodingError> {
    let err = EncodingError { encoding };
    match encoding {
        NameEncoding::Ascii => {
            if text.bytes().all(is_printable_ascii) {
                Ok(text.as_bytes().to_vec())
            } else {
                Err(err)
            }
        }
        NameEncoding::Utf8 => Ok(text.as_bytes().to_vec()),
        NameEncoding::Hex => hex::decode(text).map_err(|_| err),
    }
}

/// Render raw bytes as text.
pub fn encode(bytes: &[u8], encoding: NameEncoding) -> Result<String, EncodingError> {
    match encoding {
        NameEncoding::Ascii => {
            if bytes.iter().copied().all(is_printable_ascii) {
                // All bytes are ASCII, so this cannot fail.
                String::from_utf8(bytes.to_vec()).map_err(|_| EncodingError { encoding })
            } else {
                Err(EncodingError { encoding })
            }
        }
        NameEncoding::Utf8 => {
            String::from_utf8(bytes.to_vec()).map_err(|_| EncodingError { encoding })
        }
        NameEncoding::Hex => Ok(hex::encode(bytes)),
    }
}

/// UTF-8 rendering used by regex filters; `None` marks an unrenderable name.
pub fn render_utf8(bytes: &[u8]) -> Option<&str> {
    std::str::from_utf8(bytes).ok()
}

/// Rendering of a name for error messages.
pub fn name_for_message(name: &[u8]) -> String {
    match encode(name, NameEncoding::Ascii) {
        Ok(text) => format!("'{}'", text),
        Err(_) => format!("0x{}", hex::encode(name)),
    }
}

/// Output-side encoding that never fails: either the text or an error note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodedField {
    Text(String),
    Error(String),
}

impl EncodedField {
    pub fn new(bytes: &[u8], encoding: NameEncoding) -> Self {
        match encode(bytes, encoding) {
            Ok(text) => Self::Text(text),
            Err(err) => Self::Error(err.to_string()),
        }
    }

    pub fn into_parts(self) -> (Option<String>, Option<String>) {
        match self {
            Self::Text(text) => (Some(text), None),
            Self::Error(err) => (None, Some(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_encoding_from_str() {
        assert_eq!("ascii".parse::<NameEncoding>(), Ok(NameEncoding::Ascii));
        assert_eq!("utf8".parse::<NameEncoding>(), Ok(NameEncoding::Utf8));
        assert_eq!("hex".parse::<NameEncoding>(), Ok(NameEncoding::Hex));
        assert!("UTF-8".parse::<NameEncoding>().is_err());
    }

    #[test]
    fn test_ascii_rejects_control_and_high_bytes() {
        assert!(decode("d/abc", NameEncoding::Ascii).is_ok());
        assert!(decode("tab\there", NameEncoding::Ascii).is_err());
        assert!(decode("caf\u{e9}", NameEncoding::Ascii).is_err());
        assert!(encode(&[0x41, 0x7f], NameEncoding::Ascii).is_err());
        assert!(encode(&[0x41, 0x80], NameEncoding::Ascii).is_err());
    }

    #[test]
    fn test_utf8_rejects_malformed_bytes() {
        assert_eq!(
            encode("caf\u{e9}".as_bytes(), NameEncoding::Utf8).unwrap(),
            "caf\u{e9}"
        );
        assert_eq!(
            encode(&[0xc3, 0x28], NameEncoding::Utf8),
            Err(EncodingError {
                encoding: NameEncoding::Utf8
            })
        );
    }

    #[test]
    fn test_hex_decoding() {
        assert_eq!(decode("", NameEncoding::Hex).unwrap(), Vec::<u8>::new());
        assert_eq!(decode("00fF", NameEncoding::Hex).unwrap(), vec![0x00, 0xff]);
        assert!(decode("abc", NameEncoding::Hex).is_err());
        assert!(decode("zz", NameEncoding::Hex).is_err());
        assert_eq!(encode(&[0xab, 0x01], NameEncoding::Hex).unwrap(), "ab01");
    }

    #[test]
    fn test_render_utf8_marks_unrenderable() {
        assert_eq!(render_utf8(b"d/abc"), Some("d/abc"));
        assert_eq!(render_utf8(&[0xff, 0xfe]), None);
    }

    #[test]
    fn test_name_for_message() {
        assert_eq!(name_for_message(b"d/abc"), "'d/abc'");
        assert_eq!(name_for_message(&[0x00, 0xff]), "0x00ff");
    }

    #[test]
    fn test_encoded_field_falls_back_to_error() {
        let (text, err) = EncodedField::new(&[0xff], NameEncoding::Ascii).into_parts();
        assert_eq!(text, None);
        assert_eq!(err.as_deref(), Some("invalid data for ascii"));

        let (text, err) = EncodedField::new(&[0xff], NameEncoding::Hex).into_parts();
        assert_eq!(text.as_deref(), Some("ff"));
        assert_eq!(err, None);
    }

    proptest! {
        #[test]
        fn prop_hex_round_trip(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
            let text = encode(&bytes, NameEncoding::Hex).unwrap();
            prop_assert_eq!(decode(&text, NameEncoding::Hex).unwrap(), bytes);
        }

        #[test]
        fn prop_utf8_round_trip(text in "\\PC{0,32}") {
            let bytes = text.as_bytes().to_vec();
            let encoded = encode(&bytes, NameEncoding::Utf8).unwrap();
            prop_assert_eq!(decode(&encoded, NameEncoding::Utf8).unwrap(), bytes);
        }

        #[test]
        fn prop_ascii_round_trip(bytes in proptest::collection::vec(0x20u8..=0x7e, 0..64)) {
            let encoded = encode(&bytes, NameEncoding::Ascii).unwrap();
            prop_assert_eq!(decode(&encoded, NameEncoding::Ascii).unwrap(), bytes);
        }
    }
}
