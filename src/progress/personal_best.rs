//! Personal-best aggregation.
//!
//! The personal-best set is a cache over the ledger: every mutation rebuilds
//! it from all of the user's line items and swaps it in whole. Each metric is
//! maximized independently, so the best weight and the best reps of one
//! exercise may come from different sessions.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::db::Tables;
use crate::db::store::RecordTable;
use crate::error::Result;
use crate::ledger::LoggedWorkout;
use crate::models::PersonalBestRecord;

/// Derive the personal-best set from a user's ledger, ordered by exercise name
pub fn recompute(ledger: &[LoggedWorkout], achieved_at: i64) -> Vec<PersonalBestRecord> {
    let mut bests: BTreeMap<&str, PersonalBestRecord> = BTreeMap::new();

    for exercise in ledger.iter().flat_map(|workout| &workout.exercises) {
        let name = exercise.template.name.as_str();
        let best = bests.entry(name).or_insert_with(|| PersonalBestRecord {
            exercise_name: name.to_string(),
            max_weight: None,
            max_reps: None,
            max_duration: None,
            max_distance: None,
            date_achieved: achieved_at,
        });

        let line = &exercise.record;
        best.max_weight = max_amount(best.max_weight, line.weight);
        best.max_reps = best.max_reps.max(line.reps);
        best.max_duration = best.max_duration.max(line.duration);
        best.max_distance = max_amount(best.max_distance, line.distance);
    }

    bests.into_values().collect()
}

fn max_amount(current: Option<f64>, candidate: Option<f64>) -> Option<f64> {
    match (current, candidate) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    }
}

/// Rebuild a user's personal bests inside the caller's write transaction.
///
/// Rows whose maxima did not change keep their previous `date_achieved`, and
/// nothing is written when the set is unchanged.
pub fn rebuild(
    tables: &mut Tables<RecordTable<'_>>,
    user_id: u64,
    ledger: &[LoggedWorkout],
    now: DateTime<Utc>,
) -> Result<Vec<PersonalBestRecord>> {
    let previous = tables.personal_bests(user_id)?;
    let mut fresh = recompute(ledger, now.timestamp());

    for best in &mut fresh {
        if let Some(old) = previous
            .iter()
            .find(|old| old.exercise_name == best.exercise_name)
            && same_maxima(old, best)
        {
            best.date_achieved = old.date_achieved;
        }
    }

    if fresh != previous {
        tables.replace_personal_bests(user_id, &fresh)?;
        tracing::debug!(
            "Rebuilt {} personal bests for user {}",
            fresh.len(),
            user_id
        );
    }

    Ok(fresh)
}

fn same_maxima(a: &PersonalBestRecord, b: &PersonalBestRecord) -> bool {
    a.max_weight == b.max_weight
        && a.max_reps == b.max_reps
        && a.max_duration == b.max_duration
        && a.max_distance == b.max_distance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::LoggedExercise;
    use crate::models::{ExerciseTemplateRecord, WorkoutExerciseRecord, WorkoutRecord};

    fn template(name: &str) -> ExerciseTemplateRecord {
        ExerciseTemplateRecord {
            name: name.to_string(),
            exercise_type: "strength".to_string(),
            supports_distance: false,
            workout_type_id: 2,
        }
    }

    fn line(name: &str, weight: Option<f64>, reps: Option<i64>) -> LoggedExercise {
        LoggedExercise {
            id: 0,
            record: WorkoutExerciseRecord {
                workout_id: 0,
                template_id: 0,
                sets: Some(3),
                reps,
                weight,
                duration: None,
                distance: None,
            },
            template: template(name),
        }
    }

    fn workout(id: u64, exercises: Vec<LoggedExercise>) -> LoggedWorkout {
        LoggedWorkout {
            id,
            record: WorkoutRecord {
                user_id: 1,
                workout_type_id: None,
                name: "Push Day".to_string(),
                performed_at: 0,
                notes: None,
                intensity: None,
                duration: None,
                estimated_calories: 0.0,
                exercise_ids: Vec::new(),
            },
            exercises,
        }
    }

    #[test]
    fn test_metrics_are_maximized_independently() {
        let ledger = vec![
            workout(1, vec![line("Bench Press", Some(100.0), Some(5))]),
            workout(2, vec![line("Bench Press", Some(80.0), Some(10))]),
        ];

        let bests = recompute(&ledger, 42);

        assert_eq!(bests.len(), 1);
        assert_eq!(bests[0].exercise_name, "Bench Press");
        assert_eq!(bests[0].max_weight, Some(100.0));
        assert_eq!(bests[0].max_reps, Some(10));
        assert_eq!(bests[0].max_duration, None);
        assert_eq!(bests[0].date_achieved, 42);
    }

    #[test]
    fn test_one_row_per_exercise_name() {
        let ledger = vec![workout(
            1,
            vec![
                line("Squats", Some(120.0), Some(5)),
                line("Deadlift", Some(160.0), Some(3)),
                line("Squats", None, Some(12)),
            ],
        )];

        let bests = recompute(&ledger, 0);
        let names: Vec<&str> = bests.iter().map(|b| b.exercise_name.as_str()).collect();

        assert_eq!(names, vec!["Deadlift", "Squats"]);
        assert_eq!(bests[1].max_weight, Some(120.0));
        assert_eq!(bests[1].max_reps, Some(12));
    }

    #[test]
    fn test_empty_ledger_has_no_bests() {
        assert!(recompute(&[], 0).is_empty());
        assert!(recompute(&[workout(1, Vec::new())], 0).is_empty());
    }

    #[test]
    fn test_recompute_is_deterministic() {
        let ledger = vec![
            workout(1, vec![line("Bench Press", Some(100.0), Some(5))]),
            workout(2, vec![line("Pull-ups", None, Some(15))]),
        ];

        assert_eq!(recompute(&ledger, 7), recompute(&ledger, 7));
    }

    #[test]
    fn test_max_amount() {
        assert_eq!(max_amount(None, None), None);
        assert_eq!(max_amount(Some(1.0), None), Some(1.0));
        assert_eq!(max_amount(None, Some(2.0)), Some(2.0));
        assert_eq!(max_amount(Some(1.0), Some(2.0)), Some(2.0));
    }
}
