use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::asset::AssetType;

/// Total holdings across every portfolio the user can see, in one currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetWorth {
    #[serde(deserialize_with = "super::amount::deserialize")]
    pub total_net_worth: f64,
    pub currency: String,
    pub portfolio_count: u32,
    pub asset_count: u32,
    #[serde(default)]
    pub by_type: BTreeMap<String, TypeTotal>,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeTotal {
    pub count: u32,
    #[serde(deserialize_with = "super::amount::deserialize")]
    pub total_value: f64,
}

impl NetWorth {
    /// Per-type totals keyed by asset type, skipping kinds this client does not know.
    pub fn totals_by_asset_type(&self) -> Vec<(AssetType, &TypeTotal)> {
        self.by_type
            .iter()
            .filter_map(|(name, total)| AssetType::from_wire(name).map(|kind| (kind, total)))
            .collect()
    }
}
