//! Workout ledger operations.
//!
//! Every mutation runs in one redb write transaction that also rebuilds the
//! user's personal bests and refreshes the cached longest streak. redb allows
//! a single writer at a time, so two mutations for the same user cannot
//! interleave, and any error drops the transaction before commit.
//!
//! The methods are blocking; handlers call them from `spawn_blocking`.

mod entry;

pub use entry::{LoggedExercise, LoggedWorkout};

use chrono::{DateTime, Utc};
use redb::{ReadableDatabase, ReadableTable};

use crate::constants::ERR_EMPTY_PATCH;
use crate::db::store::{self, RecordTable, SequenceTable};
use crate::db::tables::{SEQ_EXERCISES, SEQ_WORKOUTS, SEQUENCES};
use crate::db::{Db, Tables};
use crate::error::{AppError, Result};
use crate::models::{
    ExercisePatch, NewExercise, NewWorkout, PersonalBest, Workout, WorkoutExercise,
    WorkoutExerciseRecord, WorkoutPatch, WorkoutRecord,
};
use crate::progress::{self, ProgressSummary, Streaks};

#[derive(Clone)]
pub struct Ledger {
    db: Db,
    body_weight_kg: f64,
}

impl Ledger {
    pub fn new(db: Db, body_weight_kg: f64) -> Self {
        Self { db, body_weight_kg }
    }

    /// `RecordWorkout`: log a workout with its line items
    pub fn record_workout(
        &self,
        user_id: u64,
        payload: NewWorkout,
        now: DateTime<Utc>,
    ) -> Result<Workout> {
        payload.validate()?;

        let write_txn = self.db.begin_write()?;
        let workout = {
            let mut tables = Tables::open_write(&write_txn)?;
            let mut sequences = write_txn.open_table(SEQUENCES)?;

            tables.user(user_id)?;
            if let Some(type_id) = payload.workout_type_id {
                tables.workout_type(type_id)?;
            }

            let workout_id = store::next_id(&mut sequences, SEQ_WORKOUTS)?;
            let mut record = WorkoutRecord {
                user_id,
                workout_type_id: payload.workout_type_id,
                name: payload.workout_name.trim().to_string(),
                performed_at: payload.date.unwrap_or(now).timestamp(),
                notes: payload.notes,
                intensity: payload.intensity,
                duration: payload.duration,
                estimated_calories: 0.0,
                exercise_ids: Vec::new(),
            };
            record.refresh_calories(self.body_weight_kg);
            record.exercise_ids =
                insert_exercises(&mut tables, &mut sequences, workout_id, payload.exercises)?;
            tables.put_workout(workout_id, &record)?;

            let mut workout_ids = tables.workout_ids(user_id)?;
            workout_ids.push(workout_id);
            tables.set_workout_ids(user_id, &workout_ids)?;

            progress::refresh(&mut tables, user_id, now)?;
            workout_view(&tables, workout_id, record)?
        };
        write_txn.commit()?;

        tracing::info!(
            "Workout {} recorded for user {} with {} exercises",
            workout.id,
            user_id,
            workout.exercises.len()
        );

        Ok(workout)
    }

    /// `UpdateWorkout`: apply an allow-listed patch to an owned workout
    pub fn update_workout(
        &self,
        user_id: u64,
        workout_id: u64,
        mut patch: WorkoutPatch,
        now: DateTime<Utc>,
    ) -> Result<Workout> {
        if patch.is_empty() {
            return Err(AppError::InvalidInput(ERR_EMPTY_PATCH.to_string()));
        }
        patch.validate()?;

        let write_txn = self.db.begin_write()?;
        let workout = {
            let mut tables = Tables::open_write(&write_txn)?;
            let mut sequences = write_txn.open_table(SEQUENCES)?;

            let mut record = tables.owned_workout(user_id, workout_id)?;
            if let Some(type_id) = patch.workout_type_id {
                tables.workout_type(type_id)?;
            }

            if let Some(exercises) = patch.exercises.take() {
                for &exercise_id in &record.exercise_ids {
                    tables.remove_exercise(exercise_id)?;
                }
                record.exercise_ids =
                    insert_exercises(&mut tables, &mut sequences, workout_id, exercises)?;
            }
            patch.apply(&mut record, self.body_weight_kg);
            tables.put_workout(workout_id, &record)?;

            progress::refresh(&mut tables, user_id, now)?;
            workout_view(&tables, workout_id, record)?
        };
        write_txn.commit()?;

        tracing::info!("Workout {} updated for user {}", workout_id, user_id);

        Ok(workout)
    }

    /// `DeleteWorkout`: remove an owned workout and its line items
    pub fn delete_workout(&self, user_id: u64, workout_id: u64, now: DateTime<Utc>) -> Result<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut tables = Tables::open_write(&write_txn)?;

            let record = tables.owned_workout(user_id, workout_id)?;
            tables.remove_workout(workout_id, &record)?;

            let mut workout_ids = tables.workout_ids(user_id)?;
            workout_ids.retain(|&id| id != workout_id);
            tables.set_workout_ids(user_id, &workout_ids)?;

            progress::refresh(&mut tables, user_id, now)?;
        }
        write_txn.commit()?;

        tracing::info!("Workout {} deleted for user {}", workout_id, user_id);

        Ok(())
    }

    /// Append a line item to an owned workout
    pub fn add_exercise(
        &self,
        user_id: u64,
        workout_id: u64,
        exercise: NewExercise,
        now: DateTime<Utc>,
    ) -> Result<WorkoutExercise> {
        exercise.validate()?;

        let write_txn = self.db.begin_write()?;
        let view = {
            let mut tables = Tables::open_write(&write_txn)?;
            let mut sequences = write_txn.open_table(SEQUENCES)?;

            let mut workout = tables.owned_workout(user_id, workout_id)?;
            let ids = insert_exercises(&mut tables, &mut sequences, workout_id, vec![exercise])?;
            workout.exercise_ids.extend(&ids);
            tables.put_workout(workout_id, &workout)?;

            progress::refresh(&mut tables, user_id, now)?;
            exercise_view(&tables, ids[0])?
        };
        write_txn.commit()?;

        tracing::info!(
            "Exercise {} added to workout {} for user {}",
            view.id,
            workout_id,
            user_id
        );

        Ok(view)
    }

    /// Patch a line item belonging to one of the user's workouts
    pub fn update_exercise(
        &self,
        user_id: u64,
        exercise_id: u64,
        patch: ExercisePatch,
        now: DateTime<Utc>,
    ) -> Result<WorkoutExercise> {
        if patch.is_empty() {
            return Err(AppError::InvalidInput(ERR_EMPTY_PATCH.to_string()));
        }
        patch.validate()?;

        let write_txn = self.db.begin_write()?;
        let view = {
            let mut tables = Tables::open_write(&write_txn)?;

            let mut record = owned_exercise(&tables, user_id, exercise_id)?;
            if let Some(template_id) = patch.exercise_template_id {
                tables.template(template_id)?;
            }
            patch.apply(&mut record);
            tables.put_exercise(exercise_id, &record)?;

            progress::refresh(&mut tables, user_id, now)?;
            exercise_view(&tables, exercise_id)?
        };
        write_txn.commit()?;

        tracing::info!("Exercise {} updated for user {}", exercise_id, user_id);

        Ok(view)
    }

    /// Remove a line item belonging to one of the user's workouts
    pub fn delete_exercise(&self, user_id: u64, exercise_id: u64, now: DateTime<Utc>) -> Result<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut tables = Tables::open_write(&write_txn)?;

            let record = owned_exercise(&tables, user_id, exercise_id)?;
            let mut workout = tables.owned_workout(user_id, record.workout_id)?;
            workout.exercise_ids.retain(|&id| id != exercise_id);
            tables.put_workout(record.workout_id, &workout)?;
            tables.remove_exercise(exercise_id)?;

            progress::refresh(&mut tables, user_id, now)?;
        }
        write_txn.commit()?;

        tracing::info!("Exercise {} deleted for user {}", exercise_id, user_id);

        Ok(())
    }

    pub fn workout(&self, user_id: u64, workout_id: u64) -> Result<Workout> {
        let read_txn = self.db.begin_read()?;
        let tables = Tables::open_read(&read_txn)?;

        let record = tables.owned_workout(user_id, workout_id)?;
        workout_view(&tables, workout_id, record)
    }

    /// A user's workouts, most recent first
    pub fn workouts(&self, user_id: u64) -> Result<Vec<Workout>> {
        let read_txn = self.db.begin_read()?;
        let tables = Tables::open_read(&read_txn)?;

        tables.user(user_id)?;
        let mut ledger = tables.ledger(user_id)?;
        ledger.sort_by(|a, b| {
            b.record
                .performed_at
                .cmp(&a.record.performed_at)
                .then(b.id.cmp(&a.id))
        });

        ledger
            .into_iter()
            .map(|logged| {
                let type_name = workout_type_name(&tables, &logged.record)?;
                Ok(logged.into_view(type_name))
            })
            .collect()
    }

    pub fn personal_bests(&self, user_id: u64) -> Result<Vec<PersonalBest>> {
        let read_txn = self.db.begin_read()?;
        let tables = Tables::open_read(&read_txn)?;

        tables.user(user_id)?;
        Ok(tables
            .personal_bests(user_id)?
            .iter()
            .map(PersonalBest::from)
            .collect())
    }

    /// Current streak as of `now` and the cached longest streak, without writing
    pub fn streaks(&self, user_id: u64, now: DateTime<Utc>) -> Result<Streaks> {
        let read_txn = self.db.begin_read()?;
        let tables = Tables::open_read(&read_txn)?;

        let user = tables.user(user_id)?;
        let ledger = tables.ledger(user_id)?;
        Ok(read_streaks(&ledger, user.longest_streak, now))
    }

    /// `GetProgressSummary`: read-only projection over the ledger and caches
    pub fn progress_summary(&self, user_id: u64, now: DateTime<Utc>) -> Result<ProgressSummary> {
        let read_txn = self.db.begin_read()?;
        let tables = Tables::open_read(&read_txn)?;

        let user = tables.user(user_id)?;
        let ledger = tables.ledger(user_id)?;
        let bests = tables.personal_bests(user_id)?;
        let streaks = read_streaks(&ledger, user.longest_streak, now);

        Ok(progress::summarize(&ledger, &bests, streaks))
    }
}

fn read_streaks(ledger: &[LoggedWorkout], cached_longest: u32, now: DateTime<Utc>) -> Streaks {
    let dates = progress::streak::workout_dates(ledger.iter().map(|workout| &workout.record));
    let current = progress::streak::current_streak(&dates, now.date_naive());
    Streaks {
        current,
        longest: cached_longest.max(current),
    }
}

/// Store new line items for a workout, checking each template exists
fn insert_exercises(
    tables: &mut Tables<RecordTable<'_>>,
    sequences: &mut SequenceTable<'_>,
    workout_id: u64,
    exercises: Vec<NewExercise>,
) -> Result<Vec<u64>> {
    exercises
        .into_iter()
        .map(|exercise| {
            tables.template(exercise.exercise_template_id)?;
            let exercise_id = store::next_id(sequences, SEQ_EXERCISES)?;
            tables.put_exercise(exercise_id, &exercise.into_record(workout_id))?;
            Ok(exercise_id)
        })
        .collect()
}

/// Load a line item, treating one on another user's workout as missing
fn owned_exercise<R>(
    tables: &Tables<R>,
    user_id: u64,
    exercise_id: u64,
) -> Result<WorkoutExerciseRecord>
where
    R: ReadableTable<u64, &'static [u8]>,
{
    let record = tables.exercise(exercise_id)?;
    match tables.owned_workout(user_id, record.workout_id) {
        Ok(_) => Ok(record),
        Err(AppError::WorkoutNotFound) => Err(AppError::ExerciseNotFound),
        Err(e) => Err(e),
    }
}

fn workout_type_name<R>(tables: &Tables<R>, record: &WorkoutRecord) -> Result<Option<String>>
where
    R: ReadableTable<u64, &'static [u8]>,
{
    record
        .workout_type_id
        .map(|type_id| tables.workout_type(type_id).map(|t| t.name))
        .transpose()
}

fn workout_view<R>(tables: &Tables<R>, workout_id: u64, record: WorkoutRecord) -> Result<Workout>
where
    R: ReadableTable<u64, &'static [u8]>,
{
    let type_name = workout_type_name(tables, &record)?;
    Ok(tables.logged_workout(workout_id, record)?.into_view(type_name))
}

fn exercise_view<R>(tables: &Tables<R>, exercise_id: u64) -> Result<WorkoutExercise>
where
    R: ReadableTable<u64, &'static [u8]>,
{
    let record = tables.exercise(exercise_id)?;
    let template = tables.template(record.template_id)?;
    Ok(WorkoutExercise::from_record(exercise_id, &record, &template))
}
