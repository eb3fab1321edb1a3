//! Navigation links per requester

use serde::Serialize;

use crate::auth::{Identity, Role};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub name: &'static str,
    pub url: &'static str,
}

const fn link(name: &'static str, url: &'static str) -> NavLink {
    NavLink { name, url }
}

/// Links shown in the page header
pub fn nav_links(identity: &Identity) -> Vec<NavLink> {
    let Identity::Authenticated(user) = identity else {
        return vec![link("Sign Up", "/signup/"), link("Login", "/join/")];
    };

    let mut links = match user.role {
        Some(Role::Client) => vec![
            link("Home", "/"),
            link("Post Job", "/post/"),
            link("My Jobs", "/my-jobs/"),
        ],
        Some(Role::Freelancer) => vec![
            link("Home", "/"),
            link("Available Jobs", "/available-jobs/"),
            link("My Applications", "/my-applications/"),
        ],
        None => Vec::new(),
    };
    links.push(link("Logout", "/logout/"));
    links
}
