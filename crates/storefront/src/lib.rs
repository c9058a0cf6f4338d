//! Bazaar storefront client.
//!
//! REST API client, client-side stores for payments, Razorpay checkout and
//! the signed-in profile, the profile editor, landing-page content, and the
//! development proxy served by the `bazaar-dev-proxy` binary.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod marketing;
pub mod middleware;
pub mod profile;
pub mod proxy;
pub mod state;
pub mod stores;
pub mod token;

pub use api::{ApiClient, ApiError};
pub use config::StorefrontConfig;
pub use state::AppContext;
pub use token::TokenStore;
