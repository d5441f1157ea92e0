use serde::{Deserialize, Serialize};

use crate::constants::{NOT_AVAILABLE, RUN_EXERCISES, SQUAT_EXERCISE};
use crate::ledger::LoggedWorkout;
use crate::models::workout::round2;
use crate::models::{PersonalBest, PersonalBestRecord};
use crate::progress::Streaks;

/// Read-side progress report for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub total_workouts: usize,
    pub total_exercises: usize,
    pub total_calories: f64,
    /// Whole minutes, 0 without workouts
    pub average_duration_minutes: i64,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub best_squat: String,
    pub best_run: String,
    pub total_distance: f64,
    pub personal_bests: Vec<PersonalBest>,
}

/// Build the report from the ledger, the cached personal bests and the streaks
pub fn summarize(
    ledger: &[LoggedWorkout],
    bests: &[PersonalBestRecord],
    streaks: Streaks,
) -> ProgressSummary {
    let total_workouts = ledger.len();
    let total_exercises = ledger.iter().map(|w| w.exercises.len()).sum();
    let total_calories = round2(ledger.iter().map(|w| w.record.estimated_calories).sum());

    let average_duration_minutes = average_duration(ledger);

    let total_distance = round2(
        ledger
            .iter()
            .flat_map(|w| &w.exercises)
            .filter_map(|e| e.record.distance)
            .sum(),
    );

    ProgressSummary {
        total_workouts,
        total_exercises,
        total_calories,
        average_duration_minutes,
        current_streak: streaks.current,
        longest_streak: streaks.longest.max(streaks.current),
        best_squat: best_squat(bests),
        best_run: best_run(bests),
        total_distance,
        personal_bests: bests.iter().map(PersonalBest::from).collect(),
    }
}

/// Mean workout duration in whole minutes; workouts without one count as 0
fn average_duration(ledger: &[LoggedWorkout]) -> i64 {
    if ledger.is_empty() {
        return 0;
    }
    let total: i128 = ledger
        .iter()
        .filter_map(|w| w.record.duration)
        .map(i128::from)
        .sum();
    let average = total / ledger.len() as i128;
    i64::try_from(average).unwrap_or(i64::MAX)
}

fn best_squat(bests: &[PersonalBestRecord]) -> String {
    bests
        .iter()
        .find(|b| b.exercise_name == SQUAT_EXERCISE)
        .and_then(|b| b.max_weight)
        .map(|weight| format!("{weight} kg"))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Longest run by distance, falling back to duration
fn best_run(bests: &[PersonalBestRecord]) -> String {
    let runs: Vec<&PersonalBestRecord> = bests
        .iter()
        .filter(|b| RUN_EXERCISES.contains(&b.exercise_name.as_str()))
        .collect();

    let distance = runs
        .iter()
        .filter_map(|b| b.max_distance)
        .fold(None, |acc: Option<f64>, d| Some(acc.map_or(d, |a| a.max(d))));
    if let Some(distance) = distance {
        return format!("{distance} km");
    }

    match runs.iter().filter_map(|b| b.max_duration).max() {
        Some(minutes) => format!("{minutes} min"),
        None => NOT_AVAILABLE.to_string(),
    }
}
