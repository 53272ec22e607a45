//! Plain-text rendering for command output.

use pineapple_auth::User;
use pineapple_client::entities::{Invitation, NetWorth, Permission, Portfolio, ShareStatus};

pub fn user(user: &User) -> String {
    format!("{} <{}> ({})", user.name, user.email, user.id)
}

pub fn portfolio(portfolio: &Portfolio) -> String {
    let access = if portfolio.is_owner {
        "owner".to_owned()
    } else {
        match portfolio.permission {
            Some(permission) => format!(
                "shared by {}, {}",
                portfolio.user.name,
                permission_label(permission)
            ),
            None => format!("shared by {}", portfolio.user.name),
        }
    };

    format!(
        "{}  {}  {:.2}  [{}]",
        portfolio.id, portfolio.name, portfolio.total_value, access
    )
}

pub fn invitation(invitation: &Invitation) -> String {
    format!(
        "{}  {} from {}  {}  {}",
        invitation.id,
        invitation.portfolio.name,
        invitation.portfolio.user.name,
        permission_label(invitation.permission),
        status_label(invitation.status),
    )
}

pub fn net_worth(net_worth: &NetWorth) -> Vec<String> {
    let mut lines = vec![format!(
        "Net worth: {:.2} {} across {} portfolio(s), {} asset(s)",
        net_worth.total_net_worth,
        net_worth.currency,
        net_worth.portfolio_count,
        net_worth.asset_count
    )];

    lines.extend(
        net_worth
            .totals_by_asset_type()
            .into_iter()
            .map(|(kind, total)| format!("  {kind}: {:.2} ({})", total.total_value, total.count)),
    );

    lines
}

fn permission_label(permission: Permission) -> &'static str {
    match permission {
        Permission::View => "view only",
        Permission::Edit => "can edit",
    }
}

fn status_label(status: ShareStatus) -> &'static str {
    match status {
        ShareStatus::Pending => "pending",
        ShareStatus::Accepted => "accepted",
        ShareStatus::Declined => "declined",
    }
}
