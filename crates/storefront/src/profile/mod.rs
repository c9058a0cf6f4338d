//! Profile editing.
//!
//! [`form::ProfileForm`] is the edit-form state machine, [`page::ProfilePage`]
//! the page container that owns the local profile copy and persists edits.
//! They meet at [`ProfileSaver`].

use std::future::Future;

use bazaar_core::ProfileUpdate;
use thiserror::Error;

use crate::api::ApiError;

pub mod addresses;
pub mod form;
pub mod page;

pub use form::{AddressField, FormState, ProfileDraft, ProfileForm};
pub use page::{PageView, ProfileCache, ProfilePage};

/// How a save was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The server accepted the update; its response is now the local copy.
    Confirmed,
    /// The server could not be reached; the local copy shows the edit.
    Optimistic,
}

/// Persists a profile update on behalf of the edit form.
pub trait ProfileSaver {
    fn save(
        &mut self,
        update: ProfileUpdate,
    ) -> impl Future<Output = Result<SaveOutcome, ApiError>> + Send;
}

/// Errors raised by the edit form.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("Form is not open")]
    NotOpen,

    #[error("A save is already in progress")]
    Busy,

    #[error("No profile loaded")]
    NoProfile,

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("No address at index {0}")]
    NoSuchAddress(usize),

    #[error("Failed to save profile: {0}")]
    Save(#[from] ApiError),
}
