use chrono::{DateTime, Utc};
use pineapple_auth::User;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Permission {
    View,
    Edit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ShareStatus {
    Pending,
    Accepted,
    Declined,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioShare {
    pub id: String,
    pub portfolio_id: String,
    pub shared_with_user_id: String,
    pub shared_with_user: User,
    pub permission: Permission,
    pub status: ShareStatus,
    pub created_at: DateTime<Utc>,
}

/// A pending (or answered) offer to access someone else's portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invitation {
    pub id: String,
    pub portfolio_id: String,
    pub portfolio: InvitationPortfolio,
    pub permission: Permission,
    pub status: ShareStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvitationPortfolio {
    pub id: String,
    pub name: String,
    pub user: User,
}
