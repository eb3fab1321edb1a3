//! Role-based access decisions
//!
//! `decide` is a pure function of the requester's identity and the page being
//! requested. Handlers call it before touching the store so a mismatched role
//! never reaches protected content.

use axum::response::{IntoResponse, Redirect, Response};

use super::models::{Identity, Role};

/// Pages subject to an access decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Home,
    /// Role chooser and per-role signup forms
    Signup,
    PostJob,
    AvailableJobs,
    ApplyJob,
    MyJobs,
    JobApplications,
    MyApplications,
}

impl Resource {
    pub const ALL: [Resource; 8] = [
        Resource::Home,
        Resource::Signup,
        Resource::PostJob,
        Resource::AvailableJobs,
        Resource::ApplyJob,
        Resource::MyJobs,
        Resource::JobApplications,
        Resource::MyApplications,
    ];

    /// Role the resource requires, if any
    pub fn required_role(&self) -> Option<Role> {
        match self {
            Resource::Home | Resource::Signup => None,
            Resource::PostJob | Resource::MyJobs | Resource::JobApplications => Some(Role::Client),
            Resource::AvailableJobs | Resource::ApplyJob | Resource::MyApplications => {
                Some(Role::Freelancer)
            }
        }
    }
}

/// Outcome of an access check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Serve,
    RedirectHome,
    RedirectLogin,
}

/// Decide whether `identity` may see `resource`
pub fn decide(identity: &Identity, resource: Resource) -> Decision {
    match (identity, resource) {
        (_, Resource::Home) => Decision::Serve,
        (Identity::Anonymous, Resource::Signup) => Decision::Serve,
        (Identity::Authenticated(_), Resource::Signup) => Decision::RedirectHome,
        // The job listing sends anonymous visitors home rather than to login
        (Identity::Anonymous, Resource::AvailableJobs) => Decision::RedirectHome,
        (Identity::Anonymous, _) => Decision::RedirectLogin,
        (Identity::Authenticated(user), resource) => {
            if user.role.is_some() && user.role == resource.required_role() {
                Decision::Serve
            } else {
                Decision::RedirectHome
            }
        }
    }
}

/// Builds redirect responses for non-serve decisions
#[derive(Debug, Clone)]
pub struct Redirects {
    pub home: String,
    pub login: String,
}

impl Redirects {
    /// `None` for `Serve`, otherwise the redirect to send
    pub fn for_decision(&self, decision: Decision, requested: &str) -> Option<Response> {
        match decision {
            Decision::Serve => None,
            Decision::RedirectHome => Some(Redirect::to(&self.home).into_response()),
            Decision::RedirectLogin => Some(Redirect::to(&self.login_with_next(requested)).into_response()),
        }
    }

    /// Login URL carrying the originally requested path
    pub fn login_with_next(&self, requested: &str) -> String {
        let separator = if self.login.contains('?') { '&' } else { '?' };
        format!(
            "{}{}next={}",
            self.login,
            separator,
            urlencoding::encode(requested)
        )
    }
}

/// Only local absolute paths are honoured as post-login targets
pub fn safe_next(next: Option<&str>) -> Option<&str> {
    next.filter(|n| n.starts_with('/') && !n.starts_with("//") && !n.contains('\\'))
}
