//! Admin pages: driver verification and content moderation.
//!
//! Verification is gated by the backend only; moderation additionally checks
//! the admin role before any lookup.

use std::sync::Arc;

use axum::extract::State;
use axum::{Form, Json};
use serde::{Deserialize, Serialize};

use shareway_auth::{Claims, IdentityProvider};
use shareway_backend::BackendApi;
use shareway_core::{DirectoryUser, FlaggedContent};

use crate::aggregate::soft;
use crate::error::ApiError;
use crate::outcome::ActionOutcome;
use crate::session::CurrentSession;
use crate::state::AppState;

/// Flag content type whose underlying item is a review.
pub const REVIEW_CONTENT: &str = "REVIEW";

/// View-model of the verification queue.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationsView {
    /// Users waiting for verification.
    pub pending_users: Vec<DirectoryUser>,
}

/// `GET /admin/verifications`
pub async fn verifications<B, I>(
    State(state): State<Arc<AppState<B, I>>>,
    session: CurrentSession,
) -> Json<VerificationsView>
where
    B: BackendApi + 'static,
    I: IdentityProvider + 'static,
{
    let pending_users = match session.token() {
        Some(token) => {
            soft("verifications", "users/pending", state.backend.pending_users(token)).await
        }
        None => Vec::new(),
    };

    Json(VerificationsView { pending_users })
}

/// Fields of the verify/reject forms.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdForm {
    /// User being decided.
    pub user_id: Option<String>,
}

/// `POST /admin/verifications/verify`
///
/// # Errors
///
/// Returns `Unauthorized` without a session.
pub async fn verify_user<B, I>(
    State(state): State<Arc<AppState<B, I>>>,
    session: CurrentSession,
    Form(form): Form<UserIdForm>,
) -> Result<ActionOutcome, ApiError>
where
    B: BackendApi + 'static,
    I: IdentityProvider + 'static,
{
    let token = session.require_token()?;

    let user_id = form.user_id.unwrap_or_default();
    let result = state.backend.verify_user(token, &user_id).await;
    Ok(ActionOutcome::from_result("verify_user", Some("verified"), result, |_| {
        "Could not verify user"
    }))
}

/// `POST /admin/verifications/reject`
///
/// # Errors
///
/// Returns `Unauthorized` without a session.
pub async fn reject_user<B, I>(
    State(state): State<Arc<AppState<B, I>>>,
    session: CurrentSession,
    Form(form): Form<UserIdForm>,
) -> Result<ActionOutcome, ApiError>
where
    B: BackendApi + 'static,
    I: IdentityProvider + 'static,
{
    let token = session.require_token()?;

    let user_id = form.user_id.unwrap_or_default();
    let result = state.backend.reject_user(token, &user_id).await;
    Ok(ActionOutcome::from_result("reject_user", Some("rejected"), result, |_| {
        "Could not reject user"
    }))
}

/// View-model of the moderation queue.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationView {
    /// Open flags.
    pub flagged_content: Vec<FlaggedContent>,
    /// The viewer's claims.
    pub user: Claims,
}

/// `GET /admin/moderation`
///
/// # Errors
///
/// Returns `Unauthorized` without a session and `Forbidden` for non-admins.
pub async fn moderation<B, I>(
    State(state): State<Arc<AppState<B, I>>>,
    session: CurrentSession,
) -> Result<Json<ModerationView>, ApiError>
where
    B: BackendApi + 'static,
    I: IdentityProvider + 'static,
{
    let token = session.require_admin()?;

    let flagged_content =
        soft("moderation", "admin/flagged", state.backend.flagged_content(token)).await;

    Ok(Json(ModerationView {
        flagged_content,
        user: session.claims().clone(),
    }))
}

/// Fields of the moderation forms.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagForm {
    /// The flag.
    pub flagged_id: Option<String>,
    /// Kind of flagged item, e.g. `REVIEW`.
    pub content_type: Option<String>,
    /// The flagged item.
    pub content_id: Option<String>,
}

/// `POST /admin/moderation/delete`
///
/// Removes a flagged review first, then the flag itself. If the review
/// cannot be removed the flag stays.
///
/// # Errors
///
/// Returns `Unauthorized` without a session.
pub async fn delete_content<B, I>(
    State(state): State<Arc<AppState<B, I>>>,
    session: CurrentSession,
    Form(form): Form<FlagForm>,
) -> Result<ActionOutcome, ApiError>
where
    B: BackendApi + 'static,
    I: IdentityProvider + 'static,
{
    let token = session.require_token()?;
    let backend = &state.backend;

    let flagged_id = form.flagged_id.unwrap_or_default();
    let is_review = form.content_type.as_deref() == Some(REVIEW_CONTENT);
    let review_id = form.content_id.filter(|_| is_review);

    let result: shareway_backend::Result<()> = async {
        if let Some(review_id) = &review_id {
            backend.delete_review(token, review_id).await?;
        }
        backend.delete_flagged(token, &flagged_id).await
    }
    .await;

    Ok(ActionOutcome::from_result("delete_content", Some("deleted"), result, |_| {
        "Could not delete content"
    }))
}

/// `POST /admin/moderation/dismiss`
///
/// # Errors
///
/// Returns `Unauthorized` without a session.
pub async fn dismiss_flag<B, I>(
    State(state): State<Arc<AppState<B, I>>>,
    session: CurrentSession,
    Form(form): Form<FlagForm>,
) -> Result<ActionOutcome, ApiError>
where
    B: BackendApi + 'static,
    I: IdentityProvider + 'static,
{
    let token = session.require_token()?;

    let flagged_id = form.flagged_id.unwrap_or_default();
    let result = state.backend.delete_flagged(token, &flagged_id).await;
    Ok(ActionOutcome::from_result("dismiss_flag", Some("dismissed"), result, |_| {
        "Could not dismiss flag"
    }))
}
