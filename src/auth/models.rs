//! Authentication models

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Marketplace roles, fixed at signup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Client - posts jobs
    Client,
    /// Freelancer - browses jobs and applies
    Freelancer,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Client, Role::Freelancer];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Freelancer => "freelancer",
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            Role::Client => "Client",
            Role::Freelancer => "Freelancer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client" => Ok(Role::Client),
            "freelancer" => Ok(Role::Freelancer),
            other => Err(Error::Other(format!("unknown role '{}'", other))),
        }
    }
}

/// Account record joined with its profile role
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    /// Login identifier
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// `None` when the account has no profile
    pub role: Option<Role>,
    pub date_joined: chrono::DateTime<chrono::Utc>,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn is_client(&self) -> bool {
        self.role == Some(Role::Client)
    }

    pub fn is_freelancer(&self) -> bool {
        self.role == Some(Role::Freelancer)
    }
}

/// Who is making the current request
#[derive(Debug, Clone, Default)]
pub enum Identity {
    #[default]
    Anonymous,
    Authenticated(User),
}

impl Identity {
    pub fn user(&self) -> Option<&User> {
        match self {
            Identity::Anonymous => None,
            Identity::Authenticated(user) => Some(user),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Identity::Authenticated(_))
    }

    /// Role of the authenticated user, if any
    pub fn role(&self) -> Option<Role> {
        self.user().and_then(|user| user.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("admin".parse::<Role>().is_err());
        assert!("Client".parse::<Role>().is_err());
    }

    #[test]
    fn test_anonymous_identity() {
        let identity = Identity::default();
        assert!(!identity.is_authenticated());
        assert_eq!(identity.role(), None);
    }
}
