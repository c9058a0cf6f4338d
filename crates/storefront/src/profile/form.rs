//! Profile edit form.
//!
//! ```text
//! Closed --open--> Open --submit--> Submitting --ok--> Closed
//!                   ^                    |
//!                   +-------error--------+
//! ```

use bazaar_core::{Address, ProfileUpdate, Role, UserProfile};
use tracing::{error, info};

use super::addresses;
use super::{FormError, ProfileSaver, SaveOutcome};
use crate::api::ApiError;

/// Lifecycle of the edit form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormState {
    #[default]
    Closed,
    Open,
    Submitting,
}

/// Editable copy of the profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Shown read-only; never sent back.
    pub role: Role,
    pub address: Vec<Address>,
}

impl From<&UserProfile> for ProfileDraft {
    fn from(profile: &UserProfile) -> Self {
        Self {
            name: profile.name.clone(),
            email: profile.email.clone(),
            phone: profile.phone.clone(),
            role: profile.role,
            address: profile.address.clone(),
        }
    }
}

impl ProfileDraft {
    fn to_update(&self) -> ProfileUpdate {
        ProfileUpdate {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            address: self.address.clone(),
        }
    }

    fn check_required(&self) -> Result<(), FormError> {
        for (label, value) in [
            ("Name", &self.name),
            ("Email", &self.email),
            ("Phone", &self.phone),
        ] {
            if value.trim().is_empty() {
                return Err(FormError::MissingField(label));
            }
        }
        Ok(())
    }
}

/// Editable address field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressField {
    FullName,
    Phone,
    Street,
    City,
    State,
    PostalCode,
    Country,
}

impl AddressField {
    fn slot(self, address: &mut Address) -> &mut String {
        match self {
            Self::FullName => &mut address.full_name,
            Self::Phone => &mut address.phone,
            Self::Street => &mut address.street,
            Self::City => &mut address.city,
            Self::State => &mut address.state,
            Self::PostalCode => &mut address.postal_code,
            Self::Country => &mut address.country,
        }
    }
}

/// Edit form for the signed-in user's profile.
#[derive(Debug, Default)]
pub struct ProfileForm {
    state: FormState,
    draft: Option<ProfileDraft>,
}

impl ProfileForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> FormState {
        self.state
    }

    /// The draft, present while the form is open or submitting.
    #[must_use]
    pub const fn draft(&self) -> Option<&ProfileDraft> {
        self.draft.as_ref()
    }

    /// Open the form seeded from `profile`.
    ///
    /// Re-opening an open form discards the current draft.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Busy`] while a save is in progress.
    pub fn open(&mut self, profile: &UserProfile) -> Result<(), FormError> {
        if self.state == FormState::Submitting {
            return Err(FormError::Busy);
        }
        self.draft = Some(ProfileDraft::from(profile));
        self.state = FormState::Open;
        Ok(())
    }

    /// Close the form and discard the draft.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Busy`] while a save is in progress.
    pub fn cancel(&mut self) -> Result<(), FormError> {
        if self.state == FormState::Submitting {
            return Err(FormError::Busy);
        }
        self.draft = None;
        self.state = FormState::Closed;
        Ok(())
    }

    // ─── Field edits ─────────────────────────────────────────────────────────

    /// # Errors
    ///
    /// Returns an error unless the form is open.
    pub fn set_name(&mut self, value: impl Into<String>) -> Result<(), FormError> {
        self.editable()?.name = value.into();
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error unless the form is open.
    pub fn set_email(&mut self, value: impl Into<String>) -> Result<(), FormError> {
        self.editable()?.email = value.into();
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error unless the form is open.
    pub fn set_phone(&mut self, value: impl Into<String>) -> Result<(), FormError> {
        self.editable()?.phone = value.into();
        Ok(())
    }

    /// Overwrite one field of the address at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error unless the form is open and `index` is in range.
    pub fn update_address(
        &mut self,
        index: usize,
        field: AddressField,
        value: impl Into<String>,
    ) -> Result<(), FormError> {
        let address = self
            .editable()?
            .address
            .get_mut(index)
            .ok_or(FormError::NoSuchAddress(index))?;
        *field.slot(address) = value.into();
        Ok(())
    }

    // ─── Address list ────────────────────────────────────────────────────────

    /// Append an address for the draft's name and phone; returns its index.
    ///
    /// # Errors
    ///
    /// Returns an error unless the form is open.
    pub fn add_address(&mut self) -> Result<usize, FormError> {
        let draft = self.editable()?;
        Ok(addresses::add_address(
            &mut draft.address,
            &draft.name,
            &draft.phone,
        ))
    }

    /// # Errors
    ///
    /// Returns an error unless the form is open and `index` is in range.
    pub fn remove_address(&mut self, index: usize) -> Result<Address, FormError> {
        addresses::remove_address(&mut self.editable()?.address, index)
            .ok_or(FormError::NoSuchAddress(index))
    }

    /// # Errors
    ///
    /// Returns an error unless the form is open and `index` is in range.
    pub fn set_default_address(&mut self, index: usize) -> Result<(), FormError> {
        if addresses::set_default_address(&mut self.editable()?.address, index) {
            Ok(())
        } else {
            Err(FormError::NoSuchAddress(index))
        }
    }

    // ─── Submit ──────────────────────────────────────────────────────────────

    /// Validate the draft and enter `Submitting`.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Busy`] if a save is already running,
    /// [`FormError::NotOpen`] if the form is closed, or
    /// [`FormError::MissingField`] if a required field is blank.
    pub fn begin_submit(&mut self) -> Result<ProfileUpdate, FormError> {
        match self.state {
            FormState::Submitting => return Err(FormError::Busy),
            FormState::Closed => return Err(FormError::NotOpen),
            FormState::Open => {}
        }
        let draft = self.draft.as_ref().ok_or(FormError::NotOpen)?;
        draft.check_required()?;
        let update = draft.to_update();
        self.state = FormState::Submitting;
        Ok(update)
    }

    /// Settle a submit started with [`Self::begin_submit`].
    ///
    /// Success closes the form. Failure returns it to `Open` with the draft
    /// intact so the user can retry.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::NotOpen`] if no submit is in progress, or the
    /// save error.
    pub fn finish_submit(
        &mut self,
        result: Result<SaveOutcome, ApiError>,
    ) -> Result<SaveOutcome, FormError> {
        if self.state != FormState::Submitting {
            return Err(FormError::NotOpen);
        }
        match result {
            Ok(outcome) => {
                info!(?outcome, "Profile saved");
                self.draft = None;
                self.state = FormState::Closed;
                Ok(outcome)
            }
            Err(e) => {
                error!(error = %e, "Failed to update profile");
                self.state = FormState::Open;
                Err(FormError::Save(e))
            }
        }
    }

    /// Submit the draft through `saver`.
    ///
    /// # Errors
    ///
    /// See [`Self::begin_submit`] and [`Self::finish_submit`].
    pub async fn submit<S: ProfileSaver>(&mut self, saver: &mut S) -> Result<SaveOutcome, FormError> {
        let update = self.begin_submit()?;
        let result = saver.save(update).await;
        self.finish_submit(result)
    }

    fn editable(&mut self) -> Result<&mut ProfileDraft, FormError> {
        match self.state {
            FormState::Open => self.draft.as_mut().ok_or(FormError::NotOpen),
            FormState::Submitting => Err(FormError::Busy),
            FormState::Closed => Err(FormError::NotOpen),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use bazaar_core::UserId;

    use super::*;

    fn profile() -> UserProfile {
        let mut home = Address::for_recipient("Asha Rao", "9999900000", true);
        home.street = "12 MG Road".to_string();
        home.city = "Bengaluru".to_string();
        UserProfile {
            id: UserId::new("u1"),
            name: "Asha Rao".to_string(),
            email: "asha@example.com".to_string(),
            phone: "9999900000".to_string(),
            role: Role::Business,
            address: vec![home],
        }
    }

    struct RecordingSaver {
        saved: Vec<ProfileUpdate>,
        fail: bool,
    }

    impl ProfileSaver for RecordingSaver {
        async fn save(&mut self, update: ProfileUpdate) -> Result<SaveOutcome, ApiError> {
            self.saved.push(update);
            if self.fail {
                Err(ApiError::Status {
                    status: 400,
                    message: Some("Invalid phone".to_string()),
                })
            } else {
                Ok(SaveOutcome::Confirmed)
            }
        }
    }

    fn saver(fail: bool) -> RecordingSaver {
        RecordingSaver {
            saved: Vec::new(),
            fail,
        }
    }

    #[test]
    fn test_open_seeds_draft() {
        let mut form = ProfileForm::new();
        assert_eq!(form.state(), FormState::Closed);

        form.open(&profile()).unwrap();

        assert_eq!(form.state(), FormState::Open);
        let draft = form.draft().unwrap();
        assert_eq!(draft.name, "Asha Rao");
        assert_eq!(draft.role, Role::Business);
        assert_eq!(draft.address.len(), 1);
    }

    #[test]
    fn test_cancel_discards_draft() {
        let mut form = ProfileForm::new();
        form.open(&profile()).unwrap();
        form.set_name("Someone Else").unwrap();

        form.cancel().unwrap();

        assert_eq!(form.state(), FormState::Closed);
        assert!(form.draft().is_none());
        assert!(matches!(form.set_name("x"), Err(FormError::NotOpen)));
    }

    #[test]
    fn test_add_address_seeded_from_draft() {
        let mut form = ProfileForm::new();
        form.open(&profile()).unwrap();
        form.set_name("Asha R").unwrap();
        form.set_phone("8888800000").unwrap();

        let index = form.add_address().unwrap();

        let added = &form.draft().unwrap().address[index];
        assert_eq!(index, 1);
        assert_eq!(added.full_name, "Asha R");
        assert_eq!(added.phone, "8888800000");
        assert!(!added.is_default);
        assert!(added.id.is_none());
    }

    #[test]
    fn test_remove_default_then_set_default() {
        let mut form = ProfileForm::new();
        form.open(&profile()).unwrap();
        form.add_address().unwrap();
        form.add_address().unwrap();

        form.remove_address(0).unwrap();
        let list = &form.draft().unwrap().address;
        assert_eq!(list.len(), 2);
        assert!(list[0].is_default);
        assert!(!list[1].is_default);

        form.set_default_address(1).unwrap();
        let list = &form.draft().unwrap().address;
        assert!(!list[0].is_default);
        assert!(list[1].is_default);
    }

    #[test]
    fn test_out_of_range_index() {
        let mut form = ProfileForm::new();
        form.open(&profile()).unwrap();

        assert!(matches!(form.remove_address(3), Err(FormError::NoSuchAddress(3))));
        assert!(matches!(
            form.set_default_address(1),
            Err(FormError::NoSuchAddress(1))
        ));
        assert!(matches!(
            form.update_address(2, AddressField::City, "Pune"),
            Err(FormError::NoSuchAddress(2))
        ));
    }

    #[test]
    fn test_update_address_field() {
        let mut form = ProfileForm::new();
        form.open(&profile()).unwrap();

        form.update_address(0, AddressField::City, "Mysuru").unwrap();
        form.update_address(0, AddressField::PostalCode, "570001").unwrap();

        let address = &form.draft().unwrap().address[0];
        assert_eq!(address.city, "Mysuru");
        assert_eq!(address.postal_code, "570001");
        assert_eq!(address.street, "12 MG Road");
    }

    #[tokio::test]
    async fn test_submit_success_closes_form() {
        let mut form = ProfileForm::new();
        form.open(&profile()).unwrap();
        form.set_email("  asha.rao@example.com ").unwrap();
        let mut saver = saver(false);

        let outcome = form.submit(&mut saver).await.unwrap();

        assert_eq!(outcome, SaveOutcome::Confirmed);
        assert_eq!(form.state(), FormState::Closed);
        assert!(form.draft().is_none());
        assert_eq!(saver.saved.len(), 1);
        assert_eq!(saver.saved[0].email, "asha.rao@example.com");
    }

    #[tokio::test]
    async fn test_submit_payload_never_carries_role() {
        let mut form = ProfileForm::new();
        form.open(&profile()).unwrap();
        let mut saver = saver(false);

        form.submit(&mut saver).await.unwrap();

        let json = serde_json::to_value(&saver.saved[0]).unwrap();
        assert!(json.get("role").is_none());
    }

    #[tokio::test]
    async fn test_submit_failure_keeps_form_open() {
        let mut form = ProfileForm::new();
        form.open(&profile()).unwrap();
        form.set_phone("123").unwrap();
        let mut saver = saver(true);

        let err = form.submit(&mut saver).await.unwrap_err();

        assert!(matches!(err, FormError::Save(_)));
        assert_eq!(form.state(), FormState::Open);
        assert_eq!(form.draft().unwrap().phone, "123");
        // No automatic retry
        assert_eq!(saver.saved.len(), 1);
    }

    #[tokio::test]
    async fn test_submit_requires_fields() {
        let mut form = ProfileForm::new();
        form.open(&profile()).unwrap();
        form.set_email("   ").unwrap();
        let mut saver = saver(false);

        let err = form.submit(&mut saver).await.unwrap_err();

        assert!(matches!(err, FormError::MissingField("Email")));
        assert_eq!(form.state(), FormState::Open);
        assert!(saver.saved.is_empty());
    }

    #[test]
    fn test_submitting_is_busy() {
        let mut form = ProfileForm::new();
        form.open(&profile()).unwrap();
        form.begin_submit().unwrap();

        assert_eq!(form.state(), FormState::Submitting);
        assert!(matches!(form.begin_submit(), Err(FormError::Busy)));
        assert!(matches!(form.cancel(), Err(FormError::Busy)));
        assert!(matches!(form.set_name("x"), Err(FormError::Busy)));
        assert!(matches!(form.open(&profile()), Err(FormError::Busy)));

        form.finish_submit(Ok(SaveOutcome::Optimistic)).unwrap();
        assert_eq!(form.state(), FormState::Closed);
    }

    #[test]
    fn test_submit_when_closed() {
        let mut form = ProfileForm::new();
        assert!(matches!(form.begin_submit(), Err(FormError::NotOpen)));
        assert!(matches!(
            form.finish_submit(Ok(SaveOutcome::Confirmed)),
            Err(FormError::NotOpen)
        ));
    }
}
