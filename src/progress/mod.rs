//! Streak, personal-best and summary engine.
//!
//! Derived state is refreshed eagerly inside the write transaction of every
//! ledger mutation. Only the current streak is computed on read, since it
//! depends on the current date.

pub mod personal_best;
pub mod streak;
pub mod summary;

pub use streak::Streaks;
pub use summary::{ProgressSummary, summarize};

use chrono::{DateTime, Utc};

use crate::db::Tables;
use crate::db::store::RecordTable;
use crate::error::Result;

/// Rebuild personal bests and refresh the cached longest streak for a user
pub fn refresh(
    tables: &mut Tables<RecordTable<'_>>,
    user_id: u64,
    now: DateTime<Utc>,
) -> Result<Streaks> {
    let ledger = tables.ledger(user_id)?;
    personal_best::rebuild(tables, user_id, &ledger, now)?;
    streak::refresh(tables, user_id, &ledger, now.date_naive())
}
