//! Public job board.

use std::sync::Arc;

use axum::extract::State;
use axum::{Form, Json};
use serde::{Deserialize, Serialize};

use shareway_auth::IdentityProvider;
use shareway_backend::{BackendApi, NewJob};
use shareway_core::{Company, Job};

use crate::aggregate::batch_failed;
use crate::forms::parse_float;
use crate::outcome::ActionOutcome;
use crate::state::AppState;

/// View-model of the job board.
#[derive(Debug, Default, Serialize)]
pub struct JobsView {
    /// Posted jobs.
    pub jobs: Vec<Job>,
    /// Companies, for the posting form.
    pub companies: Vec<Company>,
}

/// `GET /jobs`
pub async fn jobs<B, I>(State(state): State<Arc<AppState<B, I>>>) -> Json<JobsView>
where
    B: BackendApi + 'static,
    I: IdentityProvider + 'static,
{
    let backend = &state.backend;

    match futures::try_join!(backend.list_jobs(), backend.list_companies()) {
        Ok((jobs, companies)) => Json(JobsView { jobs, companies }),
        Err(e) => {
            batch_failed("jobs", &e);
            Json(JobsView::default())
        }
    }
}

/// Fields of the job posting form.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobForm {
    /// Job title.
    pub title: Option<String>,
    /// Job description.
    pub description: Option<String>,
    /// Pay.
    pub earnings: Option<String>,
    /// Kind of job.
    pub job_type: Option<String>,
    /// Posting company.
    pub company_id: Option<String>,
}

/// `POST /jobs`
///
/// Open to anonymous visitors; no credential is sent.
pub async fn create_job<B, I>(
    State(state): State<Arc<AppState<B, I>>>,
    Form(form): Form<JobForm>,
) -> ActionOutcome
where
    B: BackendApi + 'static,
    I: IdentityProvider + 'static,
{
    let job = NewJob {
        title: form.title,
        description: form.description,
        earnings: parse_float(form.earnings.as_deref()),
        job_type: form.job_type,
        company_id: form.company_id,
    };

    let result = state.backend.create_job(&job).await;
    ActionOutcome::from_result("create_job", None, result, |_| "Could not create job")
}
