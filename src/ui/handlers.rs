//! Home and job pages

use axum::{
    extract::{rejection::FormRejection, Path, State},
    http::Uri,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use minijinja::context;

use super::{form_or_default, guard, render};
use crate::api::server::SharedState;
use crate::auth::{CurrentIdentity, Resource};
use crate::error::{Error, Result};
use crate::forms::{ApplicationForm, FieldErrors, JobForm};

/// Parse a numeric path segment; anything else is not a route
fn parse_id(raw: &str) -> Result<i64> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| Error::NotFound(format!("invalid id '{}'", raw)))
}

/// Public home page
pub async fn home(State(state): State<SharedState>, current: CurrentIdentity) -> Result<Response> {
    render(&state, &current, "home.html", context! {})
}

/// Job listing for freelancers
pub async fn available_jobs(
    State(state): State<SharedState>,
    current: CurrentIdentity,
    uri: Uri,
) -> Result<Response> {
    if let Some(redirect) = guard(&state, &current, Resource::AvailableJobs, &uri) {
        return Ok(redirect);
    }

    let jobs = state.db.list_jobs().await?;
    render(&state, &current, "jobs/available_jobs.html", context! { jobs })
}

/// Job posting form
pub async fn post_job_form(
    State(state): State<SharedState>,
    current: CurrentIdentity,
    uri: Uri,
) -> Result<Response> {
    if let Some(redirect) = guard(&state, &current, Resource::PostJob, &uri) {
        return Ok(redirect);
    }

    render(
        &state,
        &current,
        "jobs/post_job.html",
        context! { form => JobForm::default(), errors => FieldErrors::new() },
    )
}

/// Create a job from the posting form
pub async fn post_job_submit(
    State(state): State<SharedState>,
    current: CurrentIdentity,
    uri: Uri,
    form: std::result::Result<Form<JobForm>, FormRejection>,
) -> Result<Response> {
    if let Some(redirect) = guard(&state, &current, Resource::PostJob, &uri) {
        return Ok(redirect);
    }

    let form = form_or_default(form);
    let posting = match form.validate() {
        Ok(posting) => posting,
        Err(Error::Validation(errors)) => {
            return render(&state, &current, "jobs/post_job.html", context! { form, errors });
        }
        Err(e) => return Err(e),
    };

    let owner = current.identity.user().map(|user| user.id);
    state.db.create_job(&posting, owner).await?;
    Ok(Redirect::to(&state.redirects().home).into_response())
}

/// Application form for one job
pub async fn apply_job_form(
    State(state): State<SharedState>,
    current: CurrentIdentity,
    uri: Uri,
    Path(job_id): Path<String>,
) -> Result<Response> {
    if let Some(redirect) = guard(&state, &current, Resource::ApplyJob, &uri) {
        return Ok(redirect);
    }

    let job_id = parse_id(&job_id)?;
    let job = state.db.get_job(job_id).await?.ok_or(Error::JobNotFound(job_id))?;
    render(
        &state,
        &current,
        "jobs/apply_job.html",
        context! { job, form => ApplicationForm::default(), errors => FieldErrors::new() },
    )
}

/// Submit an application to one job
pub async fn apply_job_submit(
    State(state): State<SharedState>,
    current: CurrentIdentity,
    uri: Uri,
    Path(job_id): Path<String>,
    form: std::result::Result<Form<ApplicationForm>, FormRejection>,
) -> Result<Response> {
    if let Some(redirect) = guard(&state, &current, Resource::ApplyJob, &uri) {
        return Ok(redirect);
    }

    let job_id = parse_id(&job_id)?;
    let job = state.db.get_job(job_id).await?.ok_or(Error::JobNotFound(job_id))?;

    let form = form_or_default(form);
    let proposal = match form.validate() {
        Ok(proposal) => proposal,
        Err(Error::Validation(errors)) => {
            return render(&state, &current, "jobs/apply_job.html", context! { job, form, errors });
        }
        Err(e) => return Err(e),
    };

    let applicant = current.identity.user().map(|user| user.id);
    state.db.create_application(job.id, &proposal, applicant).await?;
    Ok(Redirect::to("/available-jobs/").into_response())
}

/// Jobs posted by the requesting client
pub async fn my_jobs(
    State(state): State<SharedState>,
    current: CurrentIdentity,
    uri: Uri,
) -> Result<Response> {
    if let Some(redirect) = guard(&state, &current, Resource::MyJobs, &uri) {
        return Ok(redirect);
    }

    let Some(user) = current.identity.user() else {
        return Ok(Redirect::to(&state.config.auth.login_url).into_response());
    };
    let jobs = state.db.list_jobs_for_owner(user.id).await?;
    render(&state, &current, "jobs/my_jobs.html", context! { jobs })
}

/// Applications received for one of the requester's jobs
pub async fn job_applications(
    State(state): State<SharedState>,
    current: CurrentIdentity,
    uri: Uri,
    Path(job_id): Path<String>,
) -> Result<Response> {
    if let Some(redirect) = guard(&state, &current, Resource::JobApplications, &uri) {
        return Ok(redirect);
    }

    let job_id = parse_id(&job_id)?;
    let job = state.db.get_job(job_id).await?.ok_or(Error::JobNotFound(job_id))?;

    let requester = current.identity.user().map(|user| user.id);
    if job.owner_id.is_none() || job.owner_id != requester {
        tracing::debug!(job_id, "Job not owned by requester");
        return Ok(Redirect::to(&state.redirects().home).into_response());
    }

    let applications = state.db.list_applications_for_job(job.id).await?;
    render(
        &state,
        &current,
        "jobs/job_applications.html",
        context! { job, applications },
    )
}

/// Applications submitted by the requesting freelancer
pub async fn my_applications(
    State(state): State<SharedState>,
    current: CurrentIdentity,
    uri: Uri,
) -> Result<Response> {
    if let Some(redirect) = guard(&state, &current, Resource::MyApplications, &uri) {
        return Ok(redirect);
    }

    let Some(user) = current.identity.user() else {
        return Ok(Redirect::to(&state.config.auth.login_url).into_response());
    };
    let applications = state.db.list_applications_for_applicant(user.id).await?;
    render(
        &state,
        &current,
        "jobs/my_applications.html",
        context! { applications },
    )
}
