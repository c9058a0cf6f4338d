//! Command implementations.

pub mod admin;
pub mod auth;
pub mod payments;
pub mod profile;
pub mod razorpay;

use bazaar_storefront::AppContext;
use bazaar_storefront::config::{ConfigError, StorefrontConfig};
use bazaar_storefront::profile::FormError;
use bazaar_storefront::state::ContextError;
use bazaar_storefront::token::TokenError;
use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Context(#[from] ContextError),

    #[error("{0}")]
    Token(#[from] TokenError),

    #[error("{0}")]
    Form(#[from] FormError),

    #[error("JSON output failed: {0}")]
    Json(#[from] serde_json::Error),

    /// A store action failed; carries the store's error message.
    #[error("{0}")]
    Store(String),

    #[error("Not logged in. Run `bazaar login --token <TOKEN>` first")]
    NotLoggedIn,
}

/// Build the application context from the environment.
pub fn context() -> Result<AppContext, CommandError> {
    let config = StorefrontConfig::from_env()?;
    Ok(AppContext::from_config(config)?)
}

/// Build the context and require a stored token.
pub fn authenticated_context() -> Result<AppContext, CommandError> {
    let ctx = context()?;
    if ctx.tokens().is_authenticated() {
        Ok(ctx)
    } else {
        Err(CommandError::NotLoggedIn)
    }
}

/// Output mode shared by all commands.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub json: bool,
}

impl Output {
    /// Print `value` as JSON, or as the text produced by `render`.
    pub fn emit<T: Serialize + ?Sized>(
        self,
        value: &T,
        render: impl FnOnce(&T) -> String,
    ) -> Result<(), CommandError> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{}", render(value));
        }
        Ok(())
    }
}
