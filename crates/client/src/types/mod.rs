//! Request bodies sent to the API.

pub mod requests;

pub use requests::*;
