use alloy_primitives::Address;
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// Token record as indexed by the graph.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Token {
    pub id: String,
    pub symbol: String,
    pub name: String,
    #[serde(deserialize_with = "deserialize_decimals")]
    pub decimals: u8,
}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state)
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Token {}

impl Ord for Token {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl PartialOrd for Token {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Token {
    pub fn new_with_data(id: impl Into<String>, symbol: impl Into<String>, name: impl Into<String>, decimals: u8) -> Token {
        Token { id: id.into(), symbol: symbol.into(), name: name.into(), decimals }
    }

    pub fn get_id(&self) -> &str {
        &self.id
    }

    pub fn get_symbol(&self) -> &str {
        &self.symbol
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_decimals(&self) -> u8 {
        self.decimals
    }

    /// Token contract address, when the id is a hex address.
    pub fn get_address(&self) -> Option<Address> {
        self.id.parse().ok()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(u64),
    String(String),
}

/// The graph serializes `decimals` as a BigInt string; plain numbers are accepted too.
fn deserialize_decimals<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => n,
        NumberOrString::String(s) => s.trim().parse::<u64>().map_err(serde::de::Error::custom)?,
    };
    u8::try_from(raw).map_err(serde::de::Error::custom)
}
