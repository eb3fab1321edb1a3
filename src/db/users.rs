//! Account and profile records

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::Database;
use crate::auth::{Role, User};
use crate::error::{Error, Result};
use crate::forms::FieldErrors;

/// Insert payload for a new account
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    email: String,
    password_hash: String,
    first_name: String,
    last_name: String,
    date_joined: DateTime<Utc>,
    last_login: Option<DateTime<Utc>>,
    role: Option<String>,
}

impl UserRow {
    fn into_user(self) -> Result<(User, String)> {
        let role = self.role.as_deref().map(str::parse::<Role>).transpose()?;
        let user = User {
            id: self.id,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            role,
            date_joined: self.date_joined,
            last_login: self.last_login,
        };
        Ok((user, self.password_hash))
    }
}

const SELECT_USER: &str = "SELECT u.id, u.email, u.password_hash, u.first_name, u.last_name, \
     u.date_joined, u.last_login, p.role \
     FROM users u LEFT JOIN profiles p ON p.user_id = u.id";

fn duplicate_email() -> Error {
    Error::Validation(FieldErrors::single("email", "Email already registered."))
}

impl Database {
    /// Create an account and its profile in one transaction
    pub async fn create_user_with_profile(&self, new_user: &NewUser, role: Role) -> Result<User> {
        let now = Utc::now();
        let mut tx = self.pool().begin().await?;

        let inserted = sqlx::query(
            "INSERT INTO users (email, password_hash, first_name, last_name, date_joined) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .bind(now)
        .execute(&mut *tx)
        .await;

        let user_id = match inserted {
            Ok(result) => result.last_insert_rowid(),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                return Err(duplicate_email());
            }
            Err(e) => return Err(e.into()),
        };

        sqlx::query("INSERT INTO profiles (user_id, role, created_at) VALUES (?, ?, ?)")
            .bind(user_id)
            .bind(role.as_str())
            .bind(now)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::info!(user_id, role = %role, "Registered account");

        Ok(User {
            id: user_id,
            email: new_user.email.clone(),
            first_name: new_user.first_name.clone(),
            last_name: new_user.last_name.clone(),
            role: Some(role),
            date_joined: now,
            last_login: None,
        })
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE email = ?)")
            .bind(email)
            .fetch_one(self.pool())
            .await?;
        Ok(exists)
    }

    /// Look up an account with its stored password hash
    pub async fn find_user_credentials(&self, email: &str) -> Result<Option<(User, String)>> {
        let row: Option<UserRow> = sqlx::query_as(&format!("{} WHERE u.email = ?", SELECT_USER))
            .bind(email)
            .fetch_optional(self.pool())
            .await?;
        row.map(UserRow::into_user).transpose()
    }

    pub async fn find_user(&self, user_id: i64) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(&format!("{} WHERE u.id = ?", SELECT_USER))
            .bind(user_id)
            .fetch_optional(self.pool())
            .await?;
        Ok(row.map(UserRow::into_user).transpose()?.map(|(user, _)| user))
    }

    pub async fn record_login(&self, user_id: i64) -> Result<()> {
        sqlx::query("UPDATE users SET last_login = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(user_id)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    pub async fn count_users(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool())
            .await?;
        Ok(count)
    }

    pub async fn count_profiles(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM profiles")
            .fetch_one(self.pool())
            .await?;
        Ok(count)
    }
}
