//! User profile and address types.

use serde::{Deserialize, Serialize};

use super::id::{AddressId, UserId};
use super::status::Role;

/// A shipping address attached to a user profile.
///
/// New addresses have no `id` until the server confirms them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(
        rename = "_id",
        alias = "id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<AddressId>,
    pub full_name: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    #[serde(default)]
    pub is_default: bool,
}

impl Address {
    /// A new, unsaved address for the given recipient with empty location fields.
    #[must_use]
    pub fn for_recipient(full_name: &str, phone: &str, is_default: bool) -> Self {
        Self {
            id: None,
            full_name: full_name.to_owned(),
            phone: phone.to_owned(),
            is_default,
            ..Self::default()
        }
    }

    /// Format the address as a single line, skipping empty parts.
    #[must_use]
    pub fn formatted_single_line(&self) -> String {
        [
            &self.street,
            &self.city,
            &self.state,
            &self.postal_code,
            &self.country,
        ]
        .into_iter()
        .filter(|part| !part.trim().is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// A user profile as returned by the auth/profile service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id", alias = "id")]
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub address: Vec<Address>,
}

impl UserProfile {
    /// The address flagged as default, if any.
    #[must_use]
    pub fn default_address(&self) -> Option<&Address> {
        self.address.iter().find(|a| a.is_default)
    }

    /// Return a copy of this profile with the editable fields of `update`
    /// applied. Identity and role are kept from `self`.
    #[must_use]
    pub fn with_update(&self, update: &ProfileUpdate) -> Self {
        Self {
            id: self.id.clone(),
            name: update.name.clone(),
            email: update.email.clone(),
            phone: update.phone.clone(),
            role: self.role,
            address: update.address.clone(),
        }
    }
}

/// The partial profile sent on save.
///
/// There is deliberately no `role` field: the backend owns the role and the
/// client must never send one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: Vec<Address>,
}

impl From<&UserProfile> for ProfileUpdate {
    fn from(profile: &UserProfile) -> Self {
        Self {
            name: profile.name.clone(),
            email: profile.email.clone(),
            phone: profile.phone.clone(),
            address: profile.address.clone(),
        }
    }
}
