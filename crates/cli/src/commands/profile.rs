//! Profile commands.
//!
//! # Usage
//!
//! ```bash
//! bazaar profile show
//! bazaar profile update --phone "+91 98450 11111"
//! bazaar profile set-default-address 1
//! ```

use std::fmt::Write as _;

use bazaar_core::UserProfile;
use bazaar_storefront::profile::{PageView, ProfileForm, ProfilePage, SaveOutcome};
use bazaar_storefront::ApiClient;

use super::{CommandError, Output, authenticated_context};

/// Load the profile page or fail with the page's error.
async fn mounted_page() -> Result<ProfilePage<ApiClient>, CommandError> {
    let ctx = authenticated_context()?;
    let mut page = ctx.profile_page();
    match page.mount().await {
        PageView::Ready(_) => Ok(page),
        PageView::Error(message) => Err(CommandError::Store(message)),
        PageView::Loading | PageView::Empty => {
            Err(CommandError::Store("No profile available".to_string()))
        }
    }
}

/// Print the signed-in profile.
pub async fn show(output: Output) -> Result<(), CommandError> {
    let page = mounted_page().await?;
    let PageView::Ready(profile) = page.view().await else {
        return Err(CommandError::Store("No profile available".to_string()));
    };
    output.emit(&profile, render_profile)
}

/// Edit name, email or phone.
pub async fn update(
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
) -> Result<(), CommandError> {
    let mut page = mounted_page().await?;
    let mut form = ProfileForm::new();
    page.edit(&mut form)?;

    if let Some(name) = name {
        form.set_name(name)?;
    }
    if let Some(email) = email {
        form.set_email(email)?;
    }
    if let Some(phone) = phone {
        form.set_phone(phone)?;
    }

    let outcome = form.submit(&mut page).await?;
    report(outcome);
    Ok(())
}

/// Make the address at `index` the default one.
pub async fn set_default_address(index: usize) -> Result<(), CommandError> {
    let mut page = mounted_page().await?;
    let mut form = ProfileForm::new();
    page.edit(&mut form)?;

    form.set_default_address(index)?;
    let outcome = form.submit(&mut page).await?;
    report(outcome);
    Ok(())
}

fn report(outcome: SaveOutcome) {
    match outcome {
        SaveOutcome::Confirmed => println!("Profile saved"),
        SaveOutcome::Optimistic => {
            println!("Backend unreachable; the change is shown locally but was not saved");
        }
    }
}

fn render_profile(profile: &UserProfile) -> String {
    let mut out = format!(
        "{}\n  Email: {}\n  Phone: {}\n  Role:  {}\n",
        profile.name, profile.email, profile.phone, profile.role
    );
    if profile.address.is_empty() {
        out.push_str("  No saved addresses\n");
    }
    for (index, address) in profile.address.iter().enumerate() {
        let marker = if address.is_default { " (default)" } else { "" };
        let _ = writeln!(
            out,
            "  [{index}] {}{marker}",
            address.formatted_single_line()
        );
    }
    out.trim_end().to_string()
}
