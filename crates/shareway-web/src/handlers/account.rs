//! Account page: profile and driver verification.

use std::sync::Arc;

use axum::extract::State;
use axum::{Form, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use shareway_auth::IdentityProvider;
use shareway_backend::{BackendApi, ProfileUpdate, VerificationRequest};

use crate::aggregate::soft;
use crate::error::ApiError;
use crate::forms::optional_text;
use crate::outcome::ActionOutcome;
use crate::session::CurrentSession;
use crate::state::AppState;

/// View-model of the account page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    /// The viewer's backend profile, `null` when unavailable.
    pub db_user: Value,
}

/// `GET /account`
pub async fn account<B, I>(
    State(state): State<Arc<AppState<B, I>>>,
    session: CurrentSession,
) -> Json<AccountView>
where
    B: BackendApi + 'static,
    I: IdentityProvider + 'static,
{
    let db_user = match session.token() {
        Some(token) => soft("account", "users/me", state.backend.current_user(token)).await,
        None => Value::Null,
    };

    Json(AccountView { db_user })
}

/// Fields of the profile form.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileForm {
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Avatar URL.
    pub profile_image: Option<String>,
    /// Phone number.
    pub phone_number: Option<String>,
}

impl From<ProfileForm> for ProfileUpdate {
    fn from(form: ProfileForm) -> Self {
        Self {
            first_name: form.first_name,
            last_name: form.last_name,
            profile_image: optional_text(form.profile_image),
            phone_number: optional_text(form.phone_number),
        }
    }
}

/// `POST /account/profile`
///
/// # Errors
///
/// Returns `Unauthorized` without a session.
pub async fn update_profile<B, I>(
    State(state): State<Arc<AppState<B, I>>>,
    session: CurrentSession,
    Form(form): Form<ProfileForm>,
) -> Result<ActionOutcome, ApiError>
where
    B: BackendApi + 'static,
    I: IdentityProvider + 'static,
{
    let token = session.require_token()?;

    let result = state.backend.update_profile(token, &form.into()).await;
    Ok(ActionOutcome::from_result("update_profile", Some("profile"), result, |_| {
        "Could not update profile"
    }))
}

/// Fields of the verification form.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationForm {
    /// Front of the driving licence.
    pub license_image_front: Option<String>,
    /// Back of the driving licence.
    pub license_image_back: Option<String>,
}

/// `POST /account/verification`
///
/// # Errors
///
/// Returns `Unauthorized` without a session.
pub async fn request_verification<B, I>(
    State(state): State<Arc<AppState<B, I>>>,
    session: CurrentSession,
    Form(form): Form<VerificationForm>,
) -> Result<ActionOutcome, ApiError>
where
    B: BackendApi + 'static,
    I: IdentityProvider + 'static,
{
    let token = session.require_token()?;

    let request = VerificationRequest {
        license_image_front: form.license_image_front,
        license_image_back: form.license_image_back,
    };
    let result = state.backend.request_verification(token, &request).await;
    Ok(ActionOutcome::from_result(
        "request_verification",
        Some("verification"),
        result,
        |_| "Could not request verification",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_blanks() {
        let update = ProfileUpdate::from(ProfileForm {
            first_name: Some(String::new()),
            last_name: Some("Lee".into()),
            profile_image: Some(String::new()),
            phone_number: None,
        });

        assert_eq!(update.first_name.as_deref(), Some(""));
        assert_eq!(update.profile_image, None);
        assert_eq!(update.phone_number, None);
    }
}
