//! Result record of a form submission.

use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use shareway_backend::GatewayError;

/// `{success: true, action?}` or `{success: false, error}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionOutcome {
    /// Whether the backend accepted the submission.
    pub success: bool,
    /// Tag telling the page which form succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<&'static str>,
    /// User-facing failure message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ActionOutcome {
    /// A success, optionally tagged.
    #[must_use]
    pub const fn done(action: Option<&'static str>) -> Self {
        Self {
            success: true,
            action,
            error: None,
        }
    }

    /// A failure with a user-facing message.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            action: None,
            error: Some(message.into()),
        }
    }

    /// Map the result of a backend call.
    ///
    /// `message` picks the failure text, usually by backend status.
    pub fn from_result<F>(
        name: &'static str,
        action: Option<&'static str>,
        result: shareway_backend::Result<()>,
        message: F,
    ) -> Self
    where
        F: FnOnce(&GatewayError) -> &'static str,
    {
        match result {
            Ok(()) => {
                tracing::debug!(action = name, "Form submission accepted");
                Self::done(action)
            }
            Err(e) => {
                tracing::warn!(
                    action = name,
                    status = ?e.status(),
                    error = %e,
                    "Form submission failed"
                );
                Self::failed(message(&e))
            }
        }
    }
}

impl IntoResponse for ActionOutcome {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_compactly() {
        let ok = serde_json::to_value(ActionOutcome::done(Some("booked"))).unwrap();
        assert_eq!(ok, json!({ "success": true, "action": "booked" }));

        let untagged = serde_json::to_value(ActionOutcome::done(None)).unwrap();
        assert_eq!(untagged, json!({ "success": true }));

        let failed = serde_json::to_value(ActionOutcome::failed("nope")).unwrap();
        assert_eq!(failed, json!({ "success": false, "error": "nope" }));
    }

    #[test]
    fn message_chosen_by_status() {
        let conflict = Err(GatewayError::Status {
            status: 409,
            message: "dup".into(),
        });
        let outcome = ActionOutcome::from_result("review", Some("reviewed"), conflict, |e| {
            if e.is_status(409) {
                "already"
            } else {
                "other"
            }
        });
        assert_eq!(outcome, ActionOutcome::failed("already"));
    }
}
