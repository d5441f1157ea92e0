//! Typed access to the record tables.
//!
//! [`Tables`] bundles every `u64 -> bytes` table so that one operation opens
//! each table exactly once per transaction. Read helpers work on both read
//! and write transactions; write helpers only exist for write transactions.

use redb::{ReadOnlyTable, ReadTransaction, ReadableTable, Table, WriteTransaction};
use serde::{Serialize, de::DeserializeOwned};

use crate::db::{decode, encode, tables};
use crate::error::{AppError, Result};
use crate::ledger::{LoggedExercise, LoggedWorkout};
use crate::models::{
    ExerciseTemplateRecord, PersonalBestRecord, UserRecord, WorkoutExerciseRecord, WorkoutRecord,
    WorkoutTypeRecord,
};

/// Record table opened inside a write transaction
pub type RecordTable<'txn> = Table<'txn, u64, &'static [u8]>;

/// Record table opened inside a read transaction
pub type ReadOnlyRecordTable = ReadOnlyTable<u64, &'static [u8]>;

/// Id sequence table opened inside a write transaction
pub type SequenceTable<'txn> = Table<'txn, &'static str, u64>;

pub struct Tables<T> {
    pub users: T,
    pub workouts: T,
    pub user_workouts: T,
    pub exercises: T,
    pub personal_bests: T,
    pub workout_types: T,
    pub templates: T,
}

impl Tables<ReadOnlyRecordTable> {
    pub fn open_read(txn: &ReadTransaction) -> Result<Self> {
        Ok(Self {
            users: txn.open_table(tables::USERS)?,
            workouts: txn.open_table(tables::WORKOUTS)?,
            user_workouts: txn.open_table(tables::USER_WORKOUTS)?,
            exercises: txn.open_table(tables::WORKOUT_EXERCISES)?,
            personal_bests: txn.open_table(tables::PERSONAL_BESTS)?,
            workout_types: txn.open_table(tables::WORKOUT_TYPES)?,
            templates: txn.open_table(tables::EXERCISE_TEMPLATES)?,
        })
    }
}

impl<'txn> Tables<RecordTable<'txn>> {
    pub fn open_write(txn: &'txn WriteTransaction) -> Result<Self> {
        Ok(Self {
            users: txn.open_table(tables::USERS)?,
            workouts: txn.open_table(tables::WORKOUTS)?,
            user_workouts: txn.open_table(tables::USER_WORKOUTS)?,
            exercises: txn.open_table(tables::WORKOUT_EXERCISES)?,
            personal_bests: txn.open_table(tables::PERSONAL_BESTS)?,
            workout_types: txn.open_table(tables::WORKOUT_TYPES)?,
            templates: txn.open_table(tables::EXERCISE_TEMPLATES)?,
        })
    }
}

/// Load and decode a record by id
pub fn get<T, R>(table: &R, id: u64) -> Result<Option<T>>
where
    T: DeserializeOwned,
    R: ReadableTable<u64, &'static [u8]>,
{
    match table.get(id)? {
        Some(guard) => Ok(Some(decode(guard.value())?)),
        None => Ok(None),
    }
}

/// Encode and store a record under the given id
pub fn put<T: Serialize>(table: &mut RecordTable<'_>, id: u64, record: &T) -> Result<()> {
    let bytes = encode(record)?;
    table.insert(id, bytes.as_slice())?;
    Ok(())
}

/// Allocate the next id of a sequence (ids start at 1)
pub fn next_id(sequences: &mut SequenceTable<'_>, sequence: &str) -> Result<u64> {
    let next = sequences.get(sequence)?.map(|guard| guard.value()).unwrap_or(0) + 1;
    sequences.insert(sequence, next)?;
    Ok(next)
}

impl<R: ReadableTable<u64, &'static [u8]>> Tables<R> {
    pub fn user(&self, user_id: u64) -> Result<UserRecord> {
        get(&self.users, user_id)?.ok_or(AppError::UserNotFound)
    }

    /// Workout ids of a user in insertion order
    pub fn workout_ids(&self, user_id: u64) -> Result<Vec<u64>> {
        Ok(get(&self.user_workouts, user_id)?.unwrap_or_default())
    }

    /// Load a workout, treating one owned by somebody else as missing
    pub fn owned_workout(&self, user_id: u64, workout_id: u64) -> Result<WorkoutRecord> {
        match get::<WorkoutRecord, _>(&self.workouts, workout_id)? {
            Some(record) if record.user_id == user_id => Ok(record),
            _ => Err(AppError::WorkoutNotFound),
        }
    }

    pub fn exercise(&self, exercise_id: u64) -> Result<WorkoutExerciseRecord> {
        get(&self.exercises, exercise_id)?.ok_or(AppError::ExerciseNotFound)
    }

    pub fn template(&self, template_id: u64) -> Result<ExerciseTemplateRecord> {
        get(&self.templates, template_id)?.ok_or(AppError::TemplateNotFound)
    }

    pub fn workout_type(&self, type_id: u64) -> Result<WorkoutTypeRecord> {
        get(&self.workout_types, type_id)?.ok_or(AppError::WorkoutTypeNotFound)
    }

    pub fn personal_bests(&self, user_id: u64) -> Result<Vec<PersonalBestRecord>> {
        Ok(get(&self.personal_bests, user_id)?.unwrap_or_default())
    }

    /// Resolve a workout's line items and their templates
    pub fn logged_workout(&self, workout_id: u64, record: WorkoutRecord) -> Result<LoggedWorkout> {
        let exercises = record
            .exercise_ids
            .iter()
            .map(|&exercise_id| {
                let exercise = self.exercise(exercise_id)?;
                let template = self.template(exercise.template_id)?;
                Ok(LoggedExercise {
                    id: exercise_id,
                    record: exercise,
                    template,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(LoggedWorkout {
            id: workout_id,
            record,
            exercises,
        })
    }

    /// Every workout of a user with its line items, in insertion order
    pub fn ledger(&self, user_id: u64) -> Result<Vec<LoggedWorkout>> {
        self.workout_ids(user_id)?
            .into_iter()
            .map(|workout_id| {
                let record = self.owned_workout(user_id, workout_id)?;
                self.logged_workout(workout_id, record)
            })
            .collect()
    }
}

impl Tables<RecordTable<'_>> {
    pub fn put_user(&mut self, user_id: u64, record: &UserRecord) -> Result<()> {
        put(&mut self.users, user_id, record)
    }

    pub fn put_workout(&mut self, workout_id: u64, record: &WorkoutRecord) -> Result<()> {
        put(&mut self.workouts, workout_id, record)
    }

    pub fn put_exercise(&mut self, exercise_id: u64, record: &WorkoutExerciseRecord) -> Result<()> {
        put(&mut self.exercises, exercise_id, record)
    }

    pub fn set_workout_ids(&mut self, user_id: u64, workout_ids: &[u64]) -> Result<()> {
        if workout_ids.is_empty() {
            self.user_workouts.remove(user_id)?;
            return Ok(());
        }
        put(&mut self.user_workouts, user_id, &workout_ids)
    }

    /// Swap a user's whole personal-best set in one write
    pub fn replace_personal_bests(
        &mut self,
        user_id: u64,
        bests: &[PersonalBestRecord],
    ) -> Result<()> {
        if bests.is_empty() {
            self.personal_bests.remove(user_id)?;
            return Ok(());
        }
        put(&mut self.personal_bests, user_id, &bests)
    }

    pub fn remove_exercise(&mut self, exercise_id: u64) -> Result<()> {
        self.exercises.remove(exercise_id)?;
        Ok(())
    }

    /// Remove a workout and its line items (not the user index entry)
    pub fn remove_workout(&mut self, workout_id: u64, record: &WorkoutRecord) -> Result<()> {
        for &exercise_id in &record.exercise_ids {
            self.remove_exercise(exercise_id)?;
        }
        self.workouts.remove(workout_id)?;
        Ok(())
    }

    /// Remove a user and everything they own
    pub fn remove_user(&mut self, user_id: u64) -> Result<()> {
        for workout_id in self.workout_ids(user_id)? {
            if let Some(record) = get::<WorkoutRecord, _>(&self.workouts, workout_id)? {
                self.remove_workout(workout_id, &record)?;
            }
        }
        self.user_workouts.remove(user_id)?;
        self.personal_bests.remove(user_id)?;
        self.users.remove(user_id)?;
        Ok(())
    }
}
