use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, WriteTransaction};

use crate::db::store::{self, put};
use crate::db::{decode, tables};
use crate::error::Result;
use crate::models::{
    Catalog, ExerciseTemplate, ExerciseTemplateRecord, WorkoutType, WorkoutTypeRecord,
};

const WORKOUT_TYPES: [&str; 9] = [
    "Cardio",
    "Strength",
    "Flexibility",
    "Mobility",
    "Balance",
    "HIIT",
    "Powerlifting",
    "Bodybuilding",
    "Endurance",
];

/// (name, exercise type, workout type)
const EXERCISE_TEMPLATES: [(&str, &str, &str); 31] = [
    ("Running", "cardio", "Cardio"),
    ("Jump Rope", "cardio", "Cardio"),
    ("Cycling", "cardio", "Cardio"),
    ("Swimming", "cardio", "Cardio"),
    ("Rowing", "cardio", "Cardio"),
    ("Bench Press", "strength", "Strength"),
    ("Deadlift", "strength", "Strength"),
    ("Squats", "strength", "Strength"),
    ("Pull-ups", "strength", "Strength"),
    ("Overhead Press", "strength", "Strength"),
    ("Hamstring Stretch", "mobility", "Flexibility"),
    ("Shoulder Stretch", "mobility", "Flexibility"),
    ("Cat-Cow Pose", "mobility", "Flexibility"),
    ("Seated Twist", "mobility", "Flexibility"),
    ("Hip Circles", "mobility", "Mobility"),
    ("Ankle Rolls", "mobility", "Mobility"),
    ("Arm Swings", "mobility", "Mobility"),
    ("Single-Leg Deadlift", "strength", "Balance"),
    ("Bosu Ball Squats", "strength", "Balance"),
    ("Heel-to-Toe Walk", "mobility", "Balance"),
    ("Burpees", "cardio", "HIIT"),
    ("Mountain Climbers", "cardio", "HIIT"),
    ("Jump Squats", "cardio", "HIIT"),
    ("Power Clean", "strength", "Powerlifting"),
    ("Snatch", "strength", "Powerlifting"),
    ("Bicep Curls", "strength", "Bodybuilding"),
    ("Tricep Extensions", "strength", "Bodybuilding"),
    ("Lateral Raises", "strength", "Bodybuilding"),
    ("Treadmill Jog", "cardio", "Endurance"),
    ("Elliptical", "cardio", "Endurance"),
    ("Step Climber", "cardio", "Endurance"),
];

const DISTANCE_EXERCISES: [&str; 7] = [
    "Running",
    "Cycling",
    "Swimming",
    "Rowing",
    "Treadmill Jog",
    "Elliptical",
    "Step Climber",
];

/// Seed workout types and exercise templates unless already present
pub fn seed_catalog(write_txn: &WriteTransaction) -> Result<()> {
    let mut workout_types = write_txn.open_table(tables::WORKOUT_TYPES)?;
    let mut templates = write_txn.open_table(tables::EXERCISE_TEMPLATES)?;
    if !workout_types.is_empty()? {
        return Ok(());
    }

    let mut sequences = write_txn.open_table(tables::SEQUENCES)?;

    let mut type_ids = Vec::with_capacity(WORKOUT_TYPES.len());
    for name in WORKOUT_TYPES {
        let id = store::next_id(&mut sequences, tables::SEQ_WORKOUT_TYPES)?;
        put(
            &mut workout_types,
            id,
            &WorkoutTypeRecord {
                name: name.to_string(),
            },
        )?;
        type_ids.push((name, id));
    }

    for (name, exercise_type, type_name) in EXERCISE_TEMPLATES {
        let workout_type_id = type_ids
            .iter()
            .find(|(candidate, _)| *candidate == type_name)
            .map(|(_, id)| *id)
            .unwrap_or_default();
        let id = store::next_id(&mut sequences, tables::SEQ_TEMPLATES)?;
        put(
            &mut templates,
            id,
            &ExerciseTemplateRecord {
                name: name.to_string(),
                exercise_type: exercise_type.to_string(),
                supports_distance: DISTANCE_EXERCISES.contains(&name),
                workout_type_id,
            },
        )?;
    }

    tracing::info!(
        "Seeded {} workout types and {} exercise templates",
        WORKOUT_TYPES.len(),
        EXERCISE_TEMPLATES.len()
    );

    Ok(())
}

/// Read the whole catalog, ordered by id
pub fn load_catalog(db: &Database) -> Result<Catalog> {
    let read_txn = db.begin_read()?;

    let mut workout_types = Vec::new();
    let types_table = read_txn.open_table(tables::WORKOUT_TYPES)?;
    for entry in types_table.iter()? {
        let (id, bytes) = entry?;
        let record: WorkoutTypeRecord = decode(bytes.value())?;
        workout_types.push(WorkoutType {
            id: id.value(),
            name: record.name,
        });
    }

    let mut exercise_templates = Vec::new();
    let templates_table = read_txn.open_table(tables::EXERCISE_TEMPLATES)?;
    for entry in templates_table.iter()? {
        let (id, bytes) = entry?;
        let record: ExerciseTemplateRecord = decode(bytes.value())?;
        exercise_templates.push(ExerciseTemplate::from_record(id.value(), &record));
    }

    Ok(Catalog {
        workout_types,
        exercise_templates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_catalog_is_seeded() {
        let temp_dir = TempDir::new().unwrap();
        let db = crate::db::open_database(temp_dir.path().join("seed.db")).unwrap();

        let catalog = load_catalog(&db).unwrap();

        assert_eq!(catalog.workout_types.len(), 9);
        assert_eq!(catalog.exercise_templates.len(), 31);

        let running = catalog
            .exercise_templates
            .iter()
            .find(|t| t.name == "Running")
            .unwrap();
        assert!(running.supports_distance);

        let squats = catalog
            .exercise_templates
            .iter()
            .find(|t| t.name == "Squats")
            .unwrap();
        assert!(!squats.supports_distance);

        let strength = catalog
            .workout_types
            .iter()
            .find(|t| t.name == "Strength")
            .unwrap();
        assert_eq!(squats.workout_type_id, strength.id);
    }
}
