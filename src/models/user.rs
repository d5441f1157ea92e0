use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{ERR_INVALID_EMAIL, ERR_USERNAME_TOO_SHORT, MIN_NAME_LEN};
use crate::error::{AppError, Result};
use crate::models::datetime_from_timestamp;

/// User record stored in redb
/// Uses Unix timestamp for compact storage with bincode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    pub email: String,
    /// bcrypt hash; carries its own salt and cost
    pub password_hash: String,
    pub avatar: Option<String>,
    /// Longest streak ever observed; only the streak calculator writes it
    pub longest_streak: u32,
    /// When the user was created (Unix timestamp)
    pub created_at: i64,
}

/// User model for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub avatar: Option<String>,
    pub longest_streak: u32,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn from_record(id: u64, record: &UserRecord) -> Self {
        Self {
            id,
            username: record.username.clone(),
            email: record.email.clone(),
            avatar: record.avatar.clone(),
            longest_streak: record.longest_streak,
            created_at: datetime_from_timestamp(record.created_at),
        }
    }

    /// Validate that a username is at least three characters long
    pub fn validate_username(username: &str) -> Result<()> {
        if username.trim().chars().count() < MIN_NAME_LEN {
            return Err(AppError::InvalidInput(ERR_USERNAME_TOO_SHORT.to_string()));
        }
        Ok(())
    }

    /// Validate that an email has a local part and a domain around `@`
    pub fn validate_email(email: &str) -> Result<()> {
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
            _ => Err(AppError::InvalidInput(ERR_INVALID_EMAIL.to_string())),
        }
    }
}

/// Profile fields a user may change; anything else in the body is rejected
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfilePatch {
    pub username: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.avatar.is_none()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(username) = &self.username {
            User::validate_username(username)?;
        }
        if let Some(email) = &self.email {
            User::validate_email(email)?;
        }
        Ok(())
    }
}
