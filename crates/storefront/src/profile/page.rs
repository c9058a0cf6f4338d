//! Profile page container.
//!
//! The page keeps its own copy of the profile in two tiers: the last copy the
//! server confirmed, and an overlay holding a write that has not been
//! confirmed yet. What the page shows is the overlay applied to the remote
//! copy.

use std::sync::Arc;

use bazaar_core::{ProfileUpdate, UserProfile};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::{FormError, ProfileForm, ProfileSaver, SaveOutcome};
use crate::api::{ApiError, ProfileApi};
use crate::stores::AuthStore;

// =============================================================================
// Cache
// =============================================================================

/// Remote profile plus pending-write overlay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileCache {
    remote: Option<UserProfile>,
    overlay: Option<ProfileUpdate>,
}

impl ProfileCache {
    #[must_use]
    pub const fn remote(&self) -> Option<&UserProfile> {
        self.remote.as_ref()
    }

    #[must_use]
    pub const fn overlay(&self) -> Option<&ProfileUpdate> {
        self.overlay.as_ref()
    }

    /// The profile to display: the overlay on top of the remote copy.
    ///
    /// Identity and role always come from the remote copy.
    #[must_use]
    pub fn merged(&self) -> Option<UserProfile> {
        let remote = self.remote.as_ref()?;
        Some(match &self.overlay {
            Some(update) => remote.with_update(update),
            None => remote.clone(),
        })
    }

    /// Accept a server copy. The server wins over any pending overlay.
    pub fn set_remote(&mut self, profile: UserProfile) {
        self.remote = Some(profile);
        self.overlay = None;
    }

    /// Record a write that has not been confirmed yet.
    pub fn stage(&mut self, update: ProfileUpdate) {
        self.overlay = Some(update);
    }

    /// Settle a staged write against the server's answer.
    ///
    /// - success: the server copy replaces both tiers;
    /// - rejection (4xx or `success: false`): the overlay is dropped and the
    ///   error returned;
    /// - anything else: the overlay stays and the save counts as optimistic,
    ///   unless there is no remote copy to lay it over, in which case the
    ///   overlay is dropped and the error returned.
    ///
    /// # Errors
    ///
    /// Returns the error when the server rejected the write, or when it
    /// failed before any remote copy was loaded.
    pub fn reconcile(
        &mut self,
        result: Result<UserProfile, ApiError>,
    ) -> Result<SaveOutcome, ApiError> {
        match result {
            Ok(profile) => {
                self.set_remote(profile);
                Ok(SaveOutcome::Confirmed)
            }
            Err(e) if e.is_rejection() || self.remote.is_none() => {
                self.overlay = None;
                Err(e)
            }
            Err(e) => {
                warn!(error = %e, "Profile save not confirmed, keeping local edit");
                Ok(SaveOutcome::Optimistic)
            }
        }
    }
}

// =============================================================================
// View
// =============================================================================

/// What the page renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageView {
    Ready(UserProfile),
    Loading,
    Error(String),
    Empty,
}

impl PageView {
    /// A local copy always wins over stale loading or error flags.
    #[must_use]
    pub fn decide(local: Option<UserProfile>, loading: bool, error: Option<&str>) -> Self {
        match (local, error) {
            (Some(profile), _) => Self::Ready(profile),
            (None, _) if loading => Self::Loading,
            (None, Some(message)) => Self::Error(message.to_string()),
            (None, None) => Self::Empty,
        }
    }
}

// =============================================================================
// Page
// =============================================================================

/// Profile page bound to the shared auth store.
#[derive(Debug)]
pub struct ProfilePage<A> {
    auth: Arc<Mutex<AuthStore<A>>>,
    cache: ProfileCache,
}

impl<A: ProfileApi> ProfilePage<A> {
    pub fn new(auth: Arc<Mutex<AuthStore<A>>>) -> Self {
        Self {
            auth,
            cache: ProfileCache::default(),
        }
    }

    #[must_use]
    pub const fn cache(&self) -> &ProfileCache {
        &self.cache
    }

    /// Load the profile unless a copy is already present.
    ///
    /// Reuses the store's profile when it has one.
    pub async fn mount(&mut self) -> PageView {
        if self.cache.remote().is_none() {
            let mut auth = self.auth.lock().await;
            let profile = match auth.state().profile.clone() {
                Some(profile) => Some(profile),
                None => auth.fetch_profile().await,
            };
            drop(auth);

            if let Some(profile) = profile {
                self.cache.set_remote(profile);
            }
        } else {
            debug!("Profile already present, skipping fetch");
        }
        self.view().await
    }

    /// Fetch the profile again; a fresh server copy replaces the local one.
    pub async fn refresh(&mut self) -> PageView {
        let fetched = self.auth.lock().await.fetch_profile().await;
        if let Some(profile) = fetched {
            self.cache.set_remote(profile);
        }
        self.view().await
    }

    /// Current rendering decision.
    pub async fn view(&self) -> PageView {
        let auth = self.auth.lock().await;
        let state = auth.state();
        PageView::decide(self.cache.merged(), state.loading, state.error.as_deref())
    }

    /// Open `form` on the displayed profile.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::NoProfile`] before a profile is loaded, or the
    /// form's own error.
    pub fn edit(&self, form: &mut ProfileForm) -> Result<(), FormError> {
        let profile = self.cache.merged().ok_or(FormError::NoProfile)?;
        form.open(&profile)
    }

    /// Stage `update`, send it, and reconcile the answer.
    ///
    /// # Errors
    ///
    /// Returns the error when the server rejected the update, or when it
    /// failed before the page had a profile to show the edit on.
    pub async fn save(&mut self, update: ProfileUpdate) -> Result<SaveOutcome, ApiError> {
        self.cache.stage(update.clone());
        let result = self.auth.lock().await.update_profile(&update).await;
        self.cache.reconcile(result)
    }
}

impl<A: ProfileApi> ProfileSaver for ProfilePage<A> {
    async fn save(&mut self, update: ProfileUpdate) -> Result<SaveOutcome, ApiError> {
        Self::save(self, update).await
    }
}
