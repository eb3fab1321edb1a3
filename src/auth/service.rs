//! Signup and login flows

use super::models::{Role, User};
use super::password::PasswordHasher;
use crate::db::users::NewUser;
use crate::db::Database;
use crate::error::{Error, Result};
use crate::forms::{normalize_email, FieldErrors, SignupForm};

/// Create an account with a profile for `role`
///
/// Field problems come back as `Error::Validation` and nothing is stored. No
/// session is created; the new user logs in separately.
pub async fn register(
    db: &Database,
    hasher: &PasswordHasher,
    form: &SignupForm,
    role: Role,
) -> Result<User> {
    let registration = form.validate()?;

    if db.email_exists(&registration.email).await? {
        tracing::info!("Signup rejected: email already registered");
        return Err(Error::Validation(FieldErrors::single(
            "email",
            "Email already registered.",
        )));
    }

    let password_hash = hasher.hash(&registration.password).await?;
    let new_user = NewUser {
        email: registration.email,
        password_hash,
        first_name: registration.first_name,
        last_name: registration.last_name,
    };

    db.create_user_with_profile(&new_user, role).await
}

/// Check credentials, returning the matching user
///
/// Unknown emails and wrong passwords both yield `Error::InvalidCredentials`
/// after one bcrypt verification.
pub async fn authenticate(
    db: &Database,
    hasher: &PasswordHasher,
    email: &str,
    password: &str,
) -> Result<User> {
    let email = normalize_email(email);

    let Some((user, hash)) = db.find_user_credentials(&email).await? else {
        hasher.verify_dummy(password).await?;
        tracing::info!("Login failed");
        return Err(Error::InvalidCredentials);
    };

    if !hasher.verify(password, &hash).await? {
        tracing::info!(user_id = user.id, "Login failed");
        return Err(Error::InvalidCredentials);
    }

    db.record_login(user.id).await?;
    tracing::info!(user_id = user.id, "Login succeeded");
    Ok(user)
}
