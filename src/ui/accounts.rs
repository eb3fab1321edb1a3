//! Signup, login and logout pages

use axum::{
    extract::{
        rejection::{FormRejection, QueryRejection},
        Query, State,
    },
    http::{header, Uri},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use minijinja::context;
use serde::Deserialize;

use super::{form_or_default, guard, render};
use crate::api::server::{AppState, SharedState};
use crate::auth::access::safe_next;
use crate::auth::middleware::{expired_session_cookie, session_cookie};
use crate::auth::{service, CurrentIdentity, Resource, Role};
use crate::error::{Error, Result};
use crate::forms::{FieldErrors, LoginForm, SignupForm};

#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

/// Role chooser shown before signup
pub async fn choose_role(
    State(state): State<SharedState>,
    current: CurrentIdentity,
    uri: Uri,
) -> Result<Response> {
    if let Some(redirect) = guard(&state, &current, Resource::Signup, &uri) {
        return Ok(redirect);
    }
    render(&state, &current, "registration/choose_role.html", context! {})
}

fn signup_page(
    state: &AppState,
    current: &CurrentIdentity,
    role: Role,
    form: &SignupForm,
    errors: &FieldErrors,
) -> Result<Response> {
    render(
        state,
        current,
        "registration/signup.html",
        context! {
            role => role.as_str(),
            role_label => role.label().to_lowercase(),
            form,
            errors
        },
    )
}

async fn signup_form(state: &AppState, current: &CurrentIdentity, uri: &Uri, role: Role) -> Result<Response> {
    if let Some(redirect) = guard(state, current, Resource::Signup, uri) {
        return Ok(redirect);
    }
    signup_page(state, current, role, &SignupForm::default(), &FieldErrors::new())
}

async fn signup_submit(
    state: &AppState,
    current: &CurrentIdentity,
    uri: &Uri,
    role: Role,
    form: SignupForm,
) -> Result<Response> {
    if let Some(redirect) = guard(state, current, Resource::Signup, uri) {
        return Ok(redirect);
    }

    match service::register(&state.db, &state.hasher, &form, role).await {
        // No session: the new account logs in explicitly
        Ok(_) => Ok(Redirect::to(&state.redirects().home).into_response()),
        Err(Error::Validation(errors)) => signup_page(state, current, role, &form, &errors),
        Err(e) => Err(e),
    }
}

pub async fn signup_client_form(
    State(state): State<SharedState>,
    current: CurrentIdentity,
    uri: Uri,
) -> Result<Response> {
    signup_form(&state, &current, &uri, Role::Client).await
}

pub async fn signup_client_submit(
    State(state): State<SharedState>,
    current: CurrentIdentity,
    uri: Uri,
    form: std::result::Result<Form<SignupForm>, FormRejection>,
) -> Result<Response> {
    signup_submit(&state, &current, &uri, Role::Client, form_or_default(form)).await
}

pub async fn signup_freelancer_form(
    State(state): State<SharedState>,
    current: CurrentIdentity,
    uri: Uri,
) -> Result<Response> {
    signup_form(&state, &current, &uri, Role::Freelancer).await
}

pub async fn signup_freelancer_submit(
    State(state): State<SharedState>,
    current: CurrentIdentity,
    uri: Uri,
    form: std::result::Result<Form<SignupForm>, FormRejection>,
) -> Result<Response> {
    signup_submit(&state, &current, &uri, Role::Freelancer, form_or_default(form)).await
}

/// Login form
pub async fn login_form(
    State(state): State<SharedState>,
    current: CurrentIdentity,
    query: std::result::Result<Query<NextQuery>, QueryRejection>,
) -> Result<Response> {
    // A malformed query string only loses the post-login target
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            tracing::debug!("Unreadable login query: {}", rejection);
            NextQuery::default()
        }
    };
    let next = safe_next(query.next.as_deref());
    render(
        &state,
        &current,
        "registration/login.html",
        context! { form => LoginForm::default(), next, error => Option::<String>::None },
    )
}

/// Check credentials and start a session
pub async fn login_submit(
    State(state): State<SharedState>,
    current: CurrentIdentity,
    form: std::result::Result<Form<LoginForm>, FormRejection>,
) -> Result<Response> {
    let form = form_or_default(form);

    let user = match service::authenticate(&state.db, &state.hasher, &form.email, &form.password).await {
        Ok(user) => user,
        Err(Error::InvalidCredentials) => {
            let error = Error::InvalidCredentials.to_string();
            let next = safe_next(form.next.as_deref()).map(str::to_string);
            return render(
                &state,
                &current,
                "registration/login.html",
                context! { form, next, error },
            );
        }
        Err(e) => return Err(e),
    };

    // Never reuse a session id presented before authentication
    if let Some(previous) = &current.session_id {
        state.sessions.delete_session(previous).await;
    }
    let session_id = state.sessions.create_session(user.id).await;
    let target = safe_next(form.next.as_deref())
        .unwrap_or(&state.config.auth.login_redirect)
        .to_string();

    Ok((
        [(
            header::SET_COOKIE,
            session_cookie(&state.config.auth.session_cookie, &session_id),
        )],
        Redirect::to(&target),
    )
        .into_response())
}

/// End the session, if any
pub async fn logout(State(state): State<SharedState>, current: CurrentIdentity) -> Response {
    if let Some(session_id) = &current.session_id {
        if state.sessions.delete_session(session_id).await {
            tracing::info!(
                user_id = current.identity.user().map(|user| user.id),
                "Logged out"
            );
        }
    }

    (
        [(
            header::SET_COOKIE,
            expired_session_cookie(&state.config.auth.session_cookie),
        )],
        Redirect::to(&state.config.auth.logout_redirect),
    )
        .into_response()
}
