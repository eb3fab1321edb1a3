//! Form payloads and their validation
//!
//! Every form field deserializes with a default so a missing field becomes a
//! field-level message instead of an extractor rejection.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Error, Result};

const REQUIRED: &str = "This field is required.";
const MAX_NAME_LEN: usize = 150;
const MAX_TITLE_LEN: usize = 255;
const MAX_EMAIL_LEN: usize = 254;
const MIN_PASSWORD_LEN: usize = 8;
/// bcrypt reads 72 bytes of input, the last being a NUL terminator
pub const MAX_PASSWORD_BYTES: usize = 71;

/// Field name to messages, in field order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Error map with a single message
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// `Ok(value)` when no messages were collected
    pub fn into_result<T>(self, value: T) -> Result<T> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(Error::Validation(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{}: {}", field, message)?;
                first = false;
            }
        }
        Ok(())
    }
}

fn required<'a>(errors: &mut FieldErrors, field: &str, value: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(field, REQUIRED);
    }
    trimmed
}

fn max_len(errors: &mut FieldErrors, field: &str, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.add(
            field,
            format!("Ensure this value has at most {} characters.", max),
        );
    }
}

/// Normalize an email address for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Basic `local@domain.tld` shape check
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

/// Password policy messages; empty when the password is acceptable
pub fn password_problems(password: &str, email: &str) -> Vec<String> {
    let mut problems = Vec::new();
    if password.chars().count() < MIN_PASSWORD_LEN {
        problems.push(format!(
            "This password is too short. It must contain at least {} characters.",
            MIN_PASSWORD_LEN
        ));
    }
    if password.len() > MAX_PASSWORD_BYTES {
        problems.push(format!(
            "This password is too long. It must contain at most {} bytes.",
            MAX_PASSWORD_BYTES
        ));
    }
    if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
        problems.push("This password is entirely numeric.".to_string());
    }
    let lowered = password.to_lowercase();
    let local = email.split('@').next().unwrap_or("");
    if !email.is_empty() && (lowered == email || (!local.is_empty() && lowered == local)) {
        problems.push("The password is too similar to the email.".to_string());
    }
    problems
}

/// Signup form, shared by both roles
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SignupForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing)]
    pub password: String,
}

/// A signup that passed field validation
#[derive(Debug, Clone)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

impl SignupForm {
    pub fn validate(&self) -> Result<Registration> {
        let mut errors = FieldErrors::new();

        let first_name = required(&mut errors, "first_name", &self.first_name);
        max_len(&mut errors, "first_name", first_name, MAX_NAME_LEN);
        let last_name = required(&mut errors, "last_name", &self.last_name);
        max_len(&mut errors, "last_name", last_name, MAX_NAME_LEN);

        let email = normalize_email(&self.email);
        if email.is_empty() {
            errors.add("email", REQUIRED);
        } else if !is_valid_email(&email) {
            errors.add("email", "Enter a valid email address.");
        } else {
            max_len(&mut errors, "email", &email, MAX_EMAIL_LEN);
        }

        if self.password.is_empty() {
            errors.add("password", REQUIRED);
        } else {
            for problem in password_problems(&self.password, &email) {
                errors.add("password", problem);
            }
        }

        let registration = Registration {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email,
            password: self.password.clone(),
        };
        errors.into_result(registration)
    }
}

/// Login form
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing)]
    pub password: String,
    /// Path to return to after login
    #[serde(default)]
    pub next: Option<String>,
}

/// Job posting form
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct JobForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub budget: String,
}

/// A job posting that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPosting {
    pub title: String,
    pub description: String,
    pub budget: i64,
}

impl JobForm {
    pub fn validate(&self) -> Result<JobPosting> {
        let mut errors = FieldErrors::new();

        let title = required(&mut errors, "title", &self.title);
        max_len(&mut errors, "title", title, MAX_TITLE_LEN);
        let description = required(&mut errors, "description", &self.description);

        let raw_budget = self.budget.trim();
        let mut budget = 0;
        if raw_budget.is_empty() {
            errors.add("budget", REQUIRED);
        } else {
            match raw_budget.parse::<i64>() {
                Ok(value) if value < 0 => {
                    errors.add("budget", "Budget cannot be negative.");
                }
                Ok(value) => budget = value,
                Err(_) => errors.add("budget", "Enter a whole number."),
            }
        }

        let posting = JobPosting {
            title: title.to_string(),
            description: description.to_string(),
            budget,
        };
        errors.into_result(posting)
    }
}

/// Job application form
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ApplicationForm {
    #[serde(default)]
    pub applicant_name: String,
    #[serde(default)]
    pub proposal: String,
}

/// An application that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proposal {
    pub applicant_name: String,
    pub proposal: String,
}

impl ApplicationForm {
    pub fn validate(&self) -> Result<Proposal> {
        let mut errors = FieldErrors::new();
        let applicant_name = required(&mut errors, "applicant_name", &self.applicant_name);
        max_len(&mut errors, "applicant_name", applicant_name, MAX_TITLE_LEN);
        let proposal = required(&mut errors, "proposal", &self.proposal);

        let value = Proposal {
            applicant_name: applicant_name.to_string(),
            proposal: proposal.to_string(),
        };
        errors.into_result(value)
    }
}
