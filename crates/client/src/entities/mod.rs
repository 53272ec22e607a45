//! Payloads returned by the API.
//!
//! The client enforces no invariants on these; they are decoded and handed
//! to the caller.

pub mod asset;
pub mod auth;
pub mod currency;
pub mod portfolio;
pub mod sharing;

pub use asset::{Asset, AssetType, AssetValueHistory};
pub use auth::{AuthTokens, TokenPair};
pub use currency::{NetWorth, TypeTotal};
pub use portfolio::Portfolio;
pub use sharing::{Invitation, InvitationPortfolio, Permission, PortfolioShare, ShareStatus};

/// Monetary amounts arrive either as JSON numbers or as decimal strings.
pub(crate) mod amount {
    use serde::de::{self, Deserializer, Visitor};
    use std::fmt;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct AmountVisitor;

        impl<'de> Visitor<'de> for AmountVisitor {
            type Value = f64;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a number or a decimal string")
            }

            fn visit_f64<E: de::Error>(self, value: f64) -> Result<f64, E> {
                Ok(value)
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<f64, E> {
                Ok(value as f64)
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<f64, E> {
                Ok(value as f64)
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<f64, E> {
                value
                    .trim()
                    .parse()
                    .map_err(|_| E::invalid_value(de::Unexpected::Str(value), &self))
            }
        }

        deserializer.deserialize_any(AmountVisitor)
    }
}
