//! Shared helpers for driving the router in-process

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use std::sync::Arc;
use tower::ServiceExt;

use marketplace::api::{create_router, AppState};
use marketplace::config::Config;

pub const PASSWORD: &str = "s3cret-pass";

pub struct TestApp {
    pub state: Arc<AppState>,
    router: Router,
}

impl TestApp {
    pub async fn new() -> Self {
        let state = Arc::new(
            AppState::new(Config::for_tests())
                .await
                .expect("failed to build app state"),
        );
        let router = create_router(state.clone());
        Self { state, router }
    }

    pub async fn get(&self, path: &str, cookie: Option<&str>) -> Response {
        let mut request = Request::builder().method("GET").uri(path);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        self.send(request.body(Body::empty()).unwrap()).await
    }

    pub async fn post(&self, path: &str, fields: &[(&str, &str)], cookie: Option<&str>) -> Response {
        let mut request = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        self.send(request.body(Body::from(encode_form(fields))).unwrap())
            .await
    }

    async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Sign up through the form and assert it redirected
    pub async fn signup(&self, role: &str, email: &str) {
        let response = self
            .post(
                &format!("/signup/{}/", role),
                &[
                    ("first_name", "Test"),
                    ("last_name", "User"),
                    ("email", email),
                    ("password", PASSWORD),
                ],
                None,
            )
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "signup of {} failed", email);
    }

    /// Log in and return the `name=value` cookie pair
    pub async fn login(&self, email: &str) -> String {
        let response = self
            .post("/join/", &[("email", email), ("password", PASSWORD)], None)
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "login of {} failed", email);
        session_cookie(&response).expect("login did not set a session cookie")
    }

    pub async fn signup_and_login(&self, role: &str, email: &str) -> String {
        self.signup(role, email).await;
        self.login(email).await
    }
}

pub fn encode_form(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

pub fn location(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

pub fn set_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// `sessionid=...` pair from a Set-Cookie header
pub fn session_cookie(response: &Response) -> Option<String> {
    set_cookie(response).and_then(|c| c.split(';').next().map(str::to_string))
}

pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn assert_redirect(response: &Response, to: &str) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(response).as_deref(), Some(to));
}
