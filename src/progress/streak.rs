//! Consecutive-day workout streaks.
//!
//! Only the UTC calendar date of a workout matters; several workouts on the
//! same date count as one streak day. The current streak requires a workout
//! today: a streak that ended yesterday is reported as 0.

use chrono::NaiveDate;
use serde::Serialize;

use crate::db::Tables;
use crate::db::store::RecordTable;
use crate::error::Result;
use crate::ledger::LoggedWorkout;
use crate::models::WorkoutRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Streaks {
    pub current: u32,
    pub longest: u32,
}

impl Streaks {
    /// Compute both streaks from a sorted, deduplicated list of dates
    pub fn compute(dates: &[NaiveDate], today: NaiveDate) -> Self {
        Self {
            current: current_streak(dates, today),
            longest: longest_streak(dates),
        }
    }
}

/// Distinct workout dates in ascending order
pub fn workout_dates<'a>(workouts: impl IntoIterator<Item = &'a WorkoutRecord>) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = workouts
        .into_iter()
        .map(|workout| workout.performed_at().date_naive())
        .collect();

    dates.sort();
    dates.dedup();
    dates
}

/// Days in a row ending today
pub fn current_streak(dates: &[NaiveDate], today: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut day = Some(today);

    while let Some(date) = day {
        if dates.binary_search(&date).is_err() {
            break;
        }
        streak += 1;
        day = date.pred_opt();
    }

    streak
}

/// Longest run of consecutive days anywhere in the history
pub fn longest_streak(dates: &[NaiveDate]) -> u32 {
    if dates.is_empty() {
        return 0;
    }

    let mut longest = 1;
    let mut streak = 1;

    for window in dates.windows(2) {
        if window[0].succ_opt() == Some(window[1]) {
            streak += 1;
            longest = longest.max(streak);
        } else {
            streak = 1;
        }
    }

    longest
}

/// Recompute a user's streaks and raise the cached longest streak if needed.
///
/// The stored value never decreases and is only written when it grows, so
/// repeated calls without new workouts perform no writes.
pub fn refresh(
    tables: &mut Tables<RecordTable<'_>>,
    user_id: u64,
    ledger: &[LoggedWorkout],
    today: NaiveDate,
) -> Result<Streaks> {
    let mut user = tables.user(user_id)?;
    let dates = workout_dates(ledger.iter().map(|workout| &workout.record));
    let computed = Streaks::compute(&dates, today);

    let best = computed.current.max(computed.longest);
    if best > user.longest_streak {
        tracing::debug!(
            "Longest streak for user {} raised from {} to {}",
            user_id,
            user.longest_streak,
            best
        );
        user.longest_streak = best;
        tables.put_user(user_id, &user)?;
    }

    Ok(Streaks {
        current: computed.current,
        longest: user.longest_streak,
    })
}
