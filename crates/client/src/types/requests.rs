use serde::Serialize;
use serde_json::{Map, Value};

use crate::entities::{AssetType, Permission};

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatePortfolioRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdatePortfolioRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateAssetRequest {
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    pub name: String,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateAssetRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SharePortfolioRequest {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permission: Option<Permission>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RespondToInvitationRequest {
    pub accept: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateShareRequest {
    pub permission: Permission,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn optional_fields_are_left_out() {
        let body = serde_json::to_value(UpdateProfileRequest {
            name: Some("Ada".into()),
            avatar: None,
        })
        .unwrap();
        assert_eq!(body, json!({ "name": "Ada" }));

        assert_eq!(serde_json::to_value(LogoutRequest::default()).unwrap(), json!({}));
    }

    #[test]
    fn asset_kind_goes_out_as_type() {
        let body = serde_json::to_value(CreateAssetRequest {
            asset_type: AssetType::BankAccount,
            name: "Checking".into(),
            value: 1200.0,
            currency: Some("CHF".into()),
            notes: None,
            details: None,
        })
        .unwrap();
        assert_eq!(body["type"], "BANK_ACCOUNT");
        assert_eq!(body["currency"], "CHF");
        assert!(body.get("notes").is_none());
    }
}
