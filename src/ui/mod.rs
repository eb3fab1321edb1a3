//! Server-rendered pages

pub mod accounts;
pub mod handlers;
pub mod nav;
pub mod templates;

use axum::{
    extract::rejection::FormRejection,
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    Form,
};
use serde::Serialize;

use crate::api::server::AppState;
use crate::auth::{decide, CurrentIdentity, Resource};
use crate::error::Result;

pub use accounts::*;
pub use handlers::*;
pub use templates::Templates;

/// Redirect response when the requester may not see `resource`
fn guard(state: &AppState, current: &CurrentIdentity, resource: Resource, uri: &Uri) -> Option<Response> {
    let decision = decide(&current.identity, resource);
    let redirect = state.redirects().for_decision(decision, uri.path());
    if redirect.is_some() {
        tracing::debug!(path = uri.path(), ?decision, "Access redirected");
    }
    redirect
}

/// Render a template as a `200 OK` page
fn render<T: Serialize>(
    state: &AppState,
    current: &CurrentIdentity,
    name: &str,
    page: T,
) -> Result<Response> {
    let html = state.templates.render(name, &current.identity, page)?;
    Ok(Html(html).into_response())
}

/// Unreadable form bodies are treated as empty submissions
fn form_or_default<T: Default>(form: std::result::Result<Form<T>, FormRejection>) -> T {
    match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            tracing::debug!("Unreadable form body: {}", rejection);
            T::default()
        }
    }
}

/// Fallback for unknown paths
pub async fn not_found(uri: Uri) -> Response {
    tracing::debug!(path = uri.path(), "No route");
    (
        StatusCode::NOT_FOUND,
        Html("<h1>Not Found</h1><p>The requested page does not exist.</p>"),
    )
        .into_response()
}
