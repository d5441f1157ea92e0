//! User accounts: registration, login, profile changes and cascade delete.

use chrono::{DateTime, Utc};
use redb::{ReadableDatabase, ReadableTable};
use serde::Deserialize;

use crate::constants::{ERR_EMPTY_PATCH, ERR_PASSWORD_REQUIRED};
use crate::db::store;
use crate::db::tables::{EMAILS, SEQ_USERS, SEQUENCES, USERNAMES};
use crate::db::{Db, Tables, decode};
use crate::error::{AppError, Result};
use crate::models::{ProfilePatch, User, UserRecord};
use crate::security::{hash_password, verify_password};

/// Registration payload
#[derive(Debug, Clone, Deserialize)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl NewAccount {
    pub fn validate(&self) -> Result<()> {
        User::validate_username(&self.username)?;
        User::validate_email(&self.email)?;
        if self.password.is_empty() {
            return Err(AppError::InvalidInput(ERR_PASSWORD_REQUIRED.to_string()));
        }
        Ok(())
    }
}

/// Emails are unique regardless of case
fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Account operations; blocking, like the ledger
#[derive(Clone)]
pub struct Accounts {
    db: Db,
    bcrypt_cost: u32,
}

impl Accounts {
    pub fn new(db: Db, bcrypt_cost: u32) -> Self {
        Self { db, bcrypt_cost }
    }

    pub fn register(&self, account: NewAccount, now: DateTime<Utc>) -> Result<User> {
        account.validate()?;

        let username = account.username.trim().to_string();
        let email = account.email.trim().to_string();
        // Hash before the write transaction so bcrypt does not hold the writer
        let password_hash = hash_password(&account.password, self.bcrypt_cost)?;

        let write_txn = self.db.begin_write()?;
        let user = {
            let mut tables = Tables::open_write(&write_txn)?;
            let mut usernames = write_txn.open_table(USERNAMES)?;
            let mut emails = write_txn.open_table(EMAILS)?;
            let mut sequences = write_txn.open_table(SEQUENCES)?;

            if usernames.get(username.as_str())?.is_some() {
                tracing::info!("Registration rejected: username taken");
                return Err(AppError::UsernameTaken);
            }
            if emails.get(email_key(&email).as_str())?.is_some() {
                tracing::info!("Registration rejected: email taken");
                return Err(AppError::EmailTaken);
            }

            let user_id = store::next_id(&mut sequences, SEQ_USERS)?;
            let record = UserRecord {
                password_hash,
                username,
                email,
                avatar: None,
                longest_streak: 0,
                created_at: now.timestamp(),
            };

            tables.put_user(user_id, &record)?;
            usernames.insert(record.username.as_str(), user_id)?;
            emails.insert(email_key(&record.email).as_str(), user_id)?;

            User::from_record(user_id, &record)
        };
        write_txn.commit()?;

        tracing::info!("New user registered: {}", user.id);

        Ok(user)
    }

    /// Verify a username/password pair; unknown users and wrong passwords look the same
    pub fn authenticate(&self, username: &str, password: &str) -> Result<User> {
        let read_txn = self.db.begin_read()?;
        let tables = Tables::open_read(&read_txn)?;
        let usernames = read_txn.open_table(USERNAMES)?;

        let Some(user_id) = usernames.get(username.trim())?.map(|guard| guard.value()) else {
            tracing::warn!("Login attempt for unknown username");
            return Err(AppError::InvalidCredentials);
        };

        let record = tables.user(user_id)?;
        if !verify_password(password, &record.password_hash) {
            tracing::warn!("Invalid password for user {}", user_id);
            return Err(AppError::InvalidCredentials);
        }

        Ok(User::from_record(user_id, &record))
    }

    pub fn profile(&self, user_id: u64) -> Result<User> {
        let read_txn = self.db.begin_read()?;
        let tables = Tables::open_read(&read_txn)?;

        let record = tables.user(user_id)?;
        Ok(User::from_record(user_id, &record))
    }

    /// Every registered user, in registration order
    pub fn list_users(&self) -> Result<Vec<User>> {
        let read_txn = self.db.begin_read()?;
        let tables = Tables::open_read(&read_txn)?;

        tables
            .users
            .iter()?
            .map(|entry| {
                let (id, bytes) = entry?;
                let record: UserRecord = decode(bytes.value())?;
                Ok(User::from_record(id.value(), &record))
            })
            .collect()
    }

    pub fn update_profile(&self, user_id: u64, patch: ProfilePatch) -> Result<User> {
        if patch.is_empty() {
            return Err(AppError::InvalidInput(ERR_EMPTY_PATCH.to_string()));
        }
        patch.validate()?;

        let write_txn = self.db.begin_write()?;
        let user = {
            let mut tables = Tables::open_write(&write_txn)?;
            let mut usernames = write_txn.open_table(USERNAMES)?;
            let mut emails = write_txn.open_table(EMAILS)?;

            let mut record = tables.user(user_id)?;

            if let Some(username) = patch.username.map(|u| u.trim().to_string())
                && username != record.username
            {
                if usernames.get(username.as_str())?.is_some() {
                    return Err(AppError::UsernameTaken);
                }
                usernames.remove(record.username.as_str())?;
                usernames.insert(username.as_str(), user_id)?;
                record.username = username;
            }

            if let Some(email) = patch.email.map(|e| e.trim().to_string())
                && email_key(&email) != email_key(&record.email)
            {
                if emails.get(email_key(&email).as_str())?.is_some() {
                    return Err(AppError::EmailTaken);
                }
                emails.remove(email_key(&record.email).as_str())?;
                emails.insert(email_key(&email).as_str(), user_id)?;
                record.email = email;
            }

            if let Some(avatar) = patch.avatar {
                record.avatar = Some(avatar);
            }

            tables.put_user(user_id, &record)?;
            User::from_record(user_id, &record)
        };
        write_txn.commit()?;

        tracing::info!("Profile updated for user {}", user_id);

        Ok(user)
    }

    /// Delete a user with their workouts, line items and personal bests
    pub fn delete_user(&self, user_id: u64) -> Result<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut tables = Tables::open_write(&write_txn)?;
            let mut usernames = write_txn.open_table(USERNAMES)?;
            let mut emails = write_txn.open_table(EMAILS)?;

            let record = tables.user(user_id)?;
            usernames.remove(record.username.as_str())?;
            emails.remove(email_key(&record.email).as_str())?;
            tables.remove_user(user_id)?;
        }
        write_txn.commit()?;

        tracing::info!("User {} and all associated data deleted", user_id);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn accounts(temp_dir: &TempDir) -> Accounts {
        let db = crate::db::open_database(temp_dir.path().join("accounts.db")).unwrap();
        // Lowest bcrypt cost keeps the tests fast
        Accounts::new(db, 4)
    }

    fn bob() -> NewAccount {
        NewAccount {
            username: "bob".to_string(),
            email: "bob@example.com".to_string(),
            password: "hunter22".to_string(),
        }
    }

    #[test]
    fn test_register_and_authenticate() {
        let temp_dir = TempDir::new().unwrap();
        let accounts = accounts(&temp_dir);

        let user = accounts.register(bob(), Utc::now()).unwrap();
        assert_eq!(user.username, "bob");
        assert_eq!(user.longest_streak, 0);

        let logged_in = accounts.authenticate("bob", "hunter22").unwrap();
        assert_eq!(logged_in.id, user.id);

        assert!(matches!(
            accounts.authenticate("bob", "wrong"),
            Err(AppError::InvalidCredentials)
        ));
        assert!(matches!(
            accounts.authenticate("nobody", "hunter22"),
            Err(AppError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_password_stored_as_bcrypt_hash() {
        let temp_dir = TempDir::new().unwrap();
        let accounts = accounts(&temp_dir);
        let user = accounts.register(bob(), Utc::now()).unwrap();

        let read_txn = accounts.db.begin_read().unwrap();
        let tables = Tables::open_read(&read_txn).unwrap();
        let record = tables.user(user.id).unwrap();

        assert!(record.password_hash.starts_with("$2b$04$"));
        assert!(!record.password_hash.contains("hunter22"));
    }

    #[test]
    fn test_list_users_in_registration_order() {
        let temp_dir = TempDir::new().unwrap();
        let accounts = accounts(&temp_dir);
        accounts.register(bob(), Utc::now()).unwrap();
        let alice = NewAccount {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "secret".to_string(),
        };
        accounts.register(alice, Utc::now()).unwrap();

        let names: Vec<String> = accounts
            .list_users()
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(names, ["bob", "alice"]);
    }

    #[test]
    fn test_duplicate_username_and_email() {
        let temp_dir = TempDir::new().unwrap();
        let accounts = accounts(&temp_dir);
        accounts.register(bob(), Utc::now()).unwrap();

        let mut same_name = bob();
        same_name.email = "other@example.com".to_string();
        assert!(matches!(
            accounts.register(same_name, Utc::now()),
            Err(AppError::UsernameTaken)
        ));

        let mut same_email = bob();
        same_email.username = "robert".to_string();
        same_email.email = "BOB@example.com".to_string();
        assert!(matches!(
            accounts.register(same_email, Utc::now()),
            Err(AppError::EmailTaken)
        ));
    }

    #[test]
    fn test_update_profile_moves_indexes() {
        let temp_dir = TempDir::new().unwrap();
        let accounts = accounts(&temp_dir);
        let user = accounts.register(bob(), Utc::now()).unwrap();

        let patch = ProfilePatch {
            username: Some("robert".to_string()),
            ..Default::default()
        };
        let updated = accounts.update_profile(user.id, patch).unwrap();
        assert_eq!(updated.username, "robert");

        assert!(accounts.authenticate("robert", "hunter22").is_ok());
        assert!(accounts.authenticate("bob", "hunter22").is_err());

        // The old name is free again
        let mut again = bob();
        again.email = "new-bob@example.com".to_string();
        assert!(accounts.register(again, Utc::now()).is_ok());
    }

    #[test]
    fn test_delete_user_frees_username() {
        let temp_dir = TempDir::new().unwrap();
        let accounts = accounts(&temp_dir);
        let user = accounts.register(bob(), Utc::now()).unwrap();

        accounts.delete_user(user.id).unwrap();

        assert!(matches!(
            accounts.profile(user.id),
            Err(AppError::UserNotFound)
        ));
        assert!(accounts.register(bob(), Utc::now()).is_ok());
    }
}
