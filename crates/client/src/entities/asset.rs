use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetType {
    BankAccount,
    RealEstate,
    Crypto,
    Stock,
    Investment,
}

impl AssetType {
    pub const ALL: [AssetType; 5] = [
        AssetType::BankAccount,
        AssetType::RealEstate,
        AssetType::Crypto,
        AssetType::Stock,
        AssetType::Investment,
    ];

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            AssetType::BankAccount => "Bank Account",
            AssetType::RealEstate => "Real Estate",
            AssetType::Crypto => "Cryptocurrency",
            AssetType::Stock => "Stock",
            AssetType::Investment => "Investment",
        }
    }

    /// Wire name, e.g. `BANK_ACCOUNT`.
    pub fn as_str(self) -> &'static str {
        match self {
            AssetType::BankAccount => "BANK_ACCOUNT",
            AssetType::RealEstate => "REAL_ESTATE",
            AssetType::Crypto => "CRYPTO",
            AssetType::Stock => "STOCK",
            AssetType::Investment => "INVESTMENT",
        }
    }

    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub portfolio_id: String,
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    pub name: String,
    #[serde(deserialize_with = "super::amount::deserialize")]
    pub value: f64,
    pub currency: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub details: Option<Map<String, Value>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub value_history: Vec<AssetValueHistory>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetValueHistory {
    pub id: String,
    pub asset_id: String,
    #[serde(deserialize_with = "super::amount::deserialize")]
    pub value: f64,
    pub recorded_at: DateTime<Utc>,
}
