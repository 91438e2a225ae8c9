//! # Scripts and Name Operations
//!
//! Owner scripts are kept as raw bytes. A small set of standard templates
//! can be reduced to a [`Destination`], which is what gets displayed as an
//! address. Anything else is non-standard.

use serde::{Deserialize, Serialize};
use std::fmt;

const OP_0: u8 = 0x00;
const OP_DUP: u8 = 0x76;
const OP_EQUAL: u8 = 0x87;
const OP_EQUALVERIFY: u8 = 0x88;
const OP_HASH160: u8 = 0xa9;
const OP_CHECKSIG: u8 = 0xac;
const PUSH_20: u8 = 0x14;

/// A 20-byte key or script hash.
pub type Address = [u8; 20];

/// Owner script of an output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Script(pub Vec<u8>);

impl Script {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Pay-to-key-hash template.
    pub fn pay_to_key_hash(hash: Address) -> Self {
        let mut bytes = vec![OP_DUP, OP_HASH160, PUSH_20];
        bytes.extend_from_slice(&hash);
        bytes.extend_from_slice(&[OP_EQUALVERIFY, OP_CHECKSIG]);
        Self(bytes)
    }

    /// Pay-to-script-hash template.
    pub fn pay_to_script_hash(hash: Address) -> Self {
        let mut bytes = vec![OP_HASH160, PUSH_20];
        bytes.extend_from_slice(&hash);
        bytes.push(OP_EQUAL);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Reduce the script to a standard destination, if it has one.
    pub fn extract_destination(&self) -> Option<Destination> {
        let s = self.0.as_slice();
        match s.len() {
            25 if s[..3] == [OP_DUP, OP_HASH160, PUSH_20]
                && s[23..] == [OP_EQUALVERIFY, OP_CHECKSIG] =>
            {
                Some(Destination::KeyHash(hash_at(s, 3)))
            }
            23 if s[..2] == [OP_HASH160, PUSH_20] && s[22] == OP_EQUAL => {
                Some(Destination::ScriptHash(hash_at(s, 2)))
            }
            22 if s[..2] == [OP_0, PUSH_20] => Some(Destination::WitnessKeyHash(hash_at(s, 2))),
            _ => None,
        }
    }
}

fn hash_at(script: &[u8], offset: usize) -> Address {
    let mut hash = [0u8; 20];
    hash.copy_from_slice(&script[offset..offset + 20]);
    hash
}

/// Standard destination extracted from an owner script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Destination {
    KeyHash(Address),
    ScriptHash(Address),
    WitnessKeyHash(Address),
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeyHash(hash) => write!(f, "0x{}", hex::encode(hash)),
            Self::ScriptHash(hash) => write!(f, "p2sh:0x{}", hex::encode(hash)),
            Self::WitnessKeyHash(hash) => write!(f, "p2wpkh:0x{}", hex::encode(hash)),
        }
    }
}

/// Name operation carried by a transaction output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NameOperation {
    /// Reservation of a salted name hash. The name itself is not visible.
    NameNew { hash: Vec<u8> },
    /// First registration revealing the name and its initial value.
    FirstUpdate {
        name: Vec<u8>,
        value: Vec<u8>,
        rand: Vec<u8>,
    },
    /// Update of an existing name.
    Update { name: Vec<u8>, value: Vec<u8> },
}

impl NameOperation {
    /// Name and value of operations that update a name's state.
    pub fn name_and_value(&self) -> Option<(&[u8], &[u8])> {
        match self {
            Self::NameNew { .. } => None,
            Self::FirstUpdate { name, value, .. } | Self::Update { name, value } => {
                Some((name.as_slice(), value.as_slice()))
            }
        }
    }

    /// Operation label used in query output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::NameNew { .. } => "name_new",
            Self::FirstUpdate { .. } => "name_firstupdate",
            Self::Update { .. } => "name_update",
        }
    }
}
