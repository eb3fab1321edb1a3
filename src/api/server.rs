//! HTTP server and shared application state

use axum::{routing::get, Router};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;

use crate::auth::{PasswordHasher, Redirects, SessionManager};
use crate::config::Config;
use crate::db::Database;
use crate::error::Result;
use crate::ui::{self, Templates};

use super::routes;

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub sessions: SessionManager,
    pub hasher: PasswordHasher,
    pub templates: Templates,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    /// Open the database, apply the schema and build the shared state
    pub async fn new(config: Config) -> Result<Self> {
        let db = Database::open(&config.database).await?;
        let sessions = SessionManager::new(config.auth.session_idle_minutes);
        let hasher = PasswordHasher::new(config.auth.bcrypt_cost)?;

        Ok(Self {
            config,
            db,
            sessions,
            hasher,
            templates: Templates::new(),
        })
    }

    /// Redirect targets for access decisions
    pub fn redirects(&self) -> Redirects {
        Redirects {
            home: "/".to_string(),
            login: self.config.auth.login_url.clone(),
        }
    }
}

/// Run the HTTP server until it is stopped
pub async fn run_server(config: Config) -> Result<()> {
    let addr = config.bind_address();
    let state = Arc::new(AppState::new(config).await?);
    let _sweeper = state.sessions.spawn_sweeper(SESSION_SWEEP_INTERVAL);

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the router with all routes
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/", get(ui::home))
        // Accounts
        .route("/signup/", get(ui::choose_role))
        .route(
            "/signup/client/",
            get(ui::signup_client_form).post(ui::signup_client_submit),
        )
        .route(
            "/signup/freelancer/",
            get(ui::signup_freelancer_form).post(ui::signup_freelancer_submit),
        )
        .route("/join/", get(ui::login_form).post(ui::login_submit))
        .route("/logout/", get(ui::logout).post(ui::logout))
        // Jobs
        .route("/available-jobs/", get(ui::available_jobs))
        .route("/post/", get(ui::post_job_form).post(ui::post_job_submit))
        .route(
            "/apply/{job_id}/",
            get(ui::apply_job_form).post(ui::apply_job_submit),
        )
        .route("/my-jobs/", get(ui::my_jobs))
        .route("/my-jobs/{job_id}/", get(ui::job_applications))
        .route("/my-applications/", get(ui::my_applications))
        .fallback(ui::not_found)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
