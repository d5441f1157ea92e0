pub mod seed;
pub mod store;
pub mod tables;

use redb::{Database, Error as RedbError};
use serde::{Serialize, de::DeserializeOwned};
use std::path::Path;
use std::sync::Arc;

use crate::error::{AppError, Result};

pub use store::Tables;

/// Database handle type (Arc-wrapped for sharing across handlers)
pub type Db = Arc<Database>;

const BINCODE_CONFIG: bincode::config::Configuration = bincode::config::standard();

/// Serialize a record for storage
pub fn encode<T: Serialize>(record: &T) -> Result<Vec<u8>> {
    Ok(bincode::serde::encode_to_vec(record, BINCODE_CONFIG)?)
}

/// Deserialize a stored record
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let (record, _) = bincode::serde::decode_from_slice(bytes, BINCODE_CONFIG)?;
    Ok(record)
}

/// Open or create the redb database at the given path
///
/// Creates all required tables and seeds the exercise catalog on first run.
pub fn open_database(path: impl AsRef<Path>) -> Result<Db> {
    tracing::info!("Opening database at: {:?}", path.as_ref());

    // Create parent directory if it doesn't exist
    if let Some(parent) = path.as_ref().parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            tracing::error!("Failed to create database directory: {}", e);
            AppError::Database(RedbError::Io(e))
        })?;
    }

    let db = Database::create(path).map_err(RedbError::from)?;
    initialize(&db)?;

    tracing::info!("Database initialized successfully");

    Ok(Arc::new(db))
}

/// Create every table and seed the catalog if it is empty
pub fn initialize(db: &Database) -> Result<()> {
    let write_txn = db.begin_write()?;
    {
        // Create tables if they don't exist by opening them
        let _ = write_txn.open_table(tables::USERS)?;
        let _ = write_txn.open_table(tables::USERNAMES)?;
        let _ = write_txn.open_table(tables::EMAILS)?;
        let _ = write_txn.open_table(tables::WORKOUTS)?;
        let _ = write_txn.open_table(tables::USER_WORKOUTS)?;
        let _ = write_txn.open_table(tables::WORKOUT_EXERCISES)?;
        let _ = write_txn.open_table(tables::PERSONAL_BESTS)?;
        let _ = write_txn.open_table(tables::SEQUENCES)?;

        seed::seed_catalog(&write_txn)?;
    }
    write_txn.commit()?;

    Ok(())
}
