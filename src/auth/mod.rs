//! Authentication, sessions and role-based access

pub mod access;
pub mod middleware;
pub mod models;
pub mod password;
pub mod service;
pub mod session;

pub use access::{decide, Decision, Redirects, Resource};
pub use middleware::{session_id_from_headers, CurrentIdentity};
pub use models::{Identity, Role, User};
pub use password::PasswordHasher;
pub use session::{Session, SessionManager};
