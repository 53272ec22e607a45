use chrono::{DateTime, Utc};
use pineapple_auth::User;
use serde::{Deserialize, Serialize};

use super::asset::Asset;
use super::sharing::{Permission, PortfolioShare};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub user_id: String,
    pub user: User,
    #[serde(default)]
    pub assets: Vec<Asset>,
    #[serde(default)]
    pub shares: Vec<PortfolioShare>,
    #[serde(default)]
    pub is_owner: bool,
    #[serde(default)]
    pub permission: Option<Permission>,
    #[serde(default, deserialize_with = "super::amount::deserialize")]
    pub total_value: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Portfolio {
    /// Owners and holders of an edit share may change assets.
    pub fn can_edit(&self) -> bool {
        self.is_owner || self.permission == Some(Permission::Edit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn portfolio(is_owner: bool, permission: Option<&str>) -> Portfolio {
        serde_json::from_value(json!({
            "id": "p1",
            "name": "Retirement",
            "userId": "u2",
            "user": { "id": "u2", "email": "grace@example.com", "name": "Grace" },
            "isOwner": is_owner,
            "permission": permission,
            "totalValue": 1200,
            "createdAt": "2024-03-01T10:00:00Z",
            "updatedAt": "2024-03-01T10:00:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn edit_rights_follow_ownership_or_share() {
        assert!(portfolio(true, None).can_edit());
        assert!(portfolio(false, Some("EDIT")).can_edit());
        assert!(!portfolio(false, Some("VIEW")).can_edit());
        assert!(!portfolio(false, None).can_edit());
    }

    #[test]
    fn collections_default_to_empty() {
        let decoded = portfolio(true, None);
        assert!(decoded.assets.is_empty());
        assert!(decoded.shares.is_empty());
        assert_eq!(decoded.total_value, 1200.0);
    }
}
