//! Typed wrappers over the REST endpoints, grouped the way the backend
//! groups its routes.

mod assets;
mod auth;
mod currency;
mod portfolios;
mod sharing;
mod users;

pub use assets::AssetsApi;
pub use auth::AuthApi;
pub use currency::{CurrencyApi, DEFAULT_CURRENCY};
pub use portfolios::PortfoliosApi;
pub use sharing::SharingApi;
pub use users::UsersApi;
