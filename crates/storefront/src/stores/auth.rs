//! Auth and profile store.
//!
//! Holds the authoritative copy of the signed-in user's profile and the bearer
//! token lifecycle.

use bazaar_core::{ProfileUpdate, UserProfile};
use tracing::{info, warn};

use crate::api::{ApiError, ProfileApi};
use crate::token::{TokenError, TokenStore};

const FETCH_FAILED: &str = "Failed to fetch profile";
const UPDATE_FAILED: &str = "Failed to update profile";

/// Observable state of the auth store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub profile: Option<UserProfile>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Store wrapping the auth/profile endpoints.
#[derive(Debug)]
pub struct AuthStore<A> {
    api: A,
    tokens: TokenStore,
    state: AuthState,
}

impl<A: ProfileApi> AuthStore<A> {
    /// Create a store with no profile loaded.
    pub fn new(api: A, tokens: TokenStore) -> Self {
        Self {
            api,
            tokens,
            state: AuthState::default(),
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &AuthState {
        &self.state
    }

    /// The underlying API client.
    #[must_use]
    pub const fn api(&self) -> &A {
        &self.api
    }

    /// Whether a bearer token is stored.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.tokens.is_authenticated()
    }

    /// Store a bearer token obtained from the login flow.
    ///
    /// # Errors
    ///
    /// Returns an error if the token cannot be persisted.
    pub fn login(&mut self, token: impl Into<String>) -> Result<(), TokenError> {
        self.tokens.set(token)?;
        self.state = AuthState::default();
        info!("Bearer token stored");
        Ok(())
    }

    /// Forget the token and the cached profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted token cannot be removed.
    pub fn logout(&mut self) -> Result<(), TokenError> {
        self.tokens.clear()?;
        self.state = AuthState::default();
        info!("Logged out");
        Ok(())
    }

    /// Fetch the profile into the store.
    ///
    /// Failures are recorded in `error`; the previous profile is kept.
    pub async fn fetch_profile(&mut self) -> Option<UserProfile> {
        self.state.loading = true;
        self.state.error = None;
        let result = self.api.get_profile().await;
        self.state.loading = false;

        match result {
            Ok(profile) => {
                self.state.profile = Some(profile.clone());
                Some(profile)
            }
            Err(e) => {
                warn!(error = %e, "Fetch profile failed");
                self.state.error = Some(e.message_or(FETCH_FAILED));
                None
            }
        }
    }

    /// Send a profile update.
    ///
    /// Unlike the other actions this returns the error as well as recording
    /// it, because the caller must decide how to reconcile its local copy.
    ///
    /// # Errors
    ///
    /// Returns the API error when the update fails.
    pub async fn update_profile(&mut self, update: &ProfileUpdate) -> Result<UserProfile, ApiError> {
        self.state.loading = true;
        self.state.error = None;
        let result = self.api.update_profile(update).await;
        self.state.loading = false;

        match result {
            Ok(profile) => {
                info!(id = %profile.id, "Profile updated");
                self.state.profile = Some(profile.clone());
                Ok(profile)
            }
            Err(e) => {
                warn!(error = %e, "Update profile failed");
                self.state.error = Some(e.message_or(UPDATE_FAILED));
                Err(e)
            }
        }
    }
}
