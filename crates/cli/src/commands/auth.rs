//! Bearer token management.
//!
//! # Usage
//!
//! ```bash
//! bazaar login --token eyJhbGciOi...
//! bazaar logout
//! ```

use super::{CommandError, context};

/// Store a bearer token and confirm it by loading the profile.
pub async fn login(token: &str) -> Result<(), CommandError> {
    let ctx = context()?;
    ctx.auth().lock().await.login(token.trim())?;

    let profile = ctx.auth().lock().await.fetch_profile().await;
    match profile {
        Some(profile) => println!("Logged in as {} <{}>", profile.name, profile.email),
        None => {
            // Keep the token; the backend may just be down
            let message = ctx
                .auth()
                .lock()
                .await
                .state()
                .error
                .clone()
                .unwrap_or_default();
            tracing::warn!(error = %message, "Token stored but profile could not be loaded");
            println!("Token stored at {}", ctx.config().token_path.display());
        }
    }
    Ok(())
}

/// Forget the stored token.
pub async fn logout() -> Result<(), CommandError> {
    let ctx = context()?;
    ctx.logout().await?;
    println!("Logged out");
    Ok(())
}
