use redb::TableDefinition;

/// Users table: user_id -> UserRecord (serialized)
pub const USERS: TableDefinition<u64, &[u8]> = TableDefinition::new("users");

/// Username index: username -> user_id (uniqueness)
pub const USERNAMES: TableDefinition<&str, u64> = TableDefinition::new("usernames");

/// Email index: lowercased email -> user_id (uniqueness)
pub const EMAILS: TableDefinition<&str, u64> = TableDefinition::new("emails");

/// Workouts table: workout_id -> WorkoutRecord (serialized)
pub const WORKOUTS: TableDefinition<u64, &[u8]> = TableDefinition::new("workouts");

/// User workouts index: user_id -> Vec<workout_id>
/// Used for listing and for cascade delete when a user is removed
pub const USER_WORKOUTS: TableDefinition<u64, &[u8]> = TableDefinition::new("user_workouts");

/// Line items table: exercise_id -> WorkoutExerciseRecord (serialized)
pub const WORKOUT_EXERCISES: TableDefinition<u64, &[u8]> =
    TableDefinition::new("workout_exercises");

/// Personal bests table: user_id -> Vec<PersonalBestRecord>
/// One value per user so a rebuild swaps the whole set in a single insert
pub const PERSONAL_BESTS: TableDefinition<u64, &[u8]> = TableDefinition::new("personal_bests");

/// Workout types table: type_id -> WorkoutTypeRecord (serialized)
pub const WORKOUT_TYPES: TableDefinition<u64, &[u8]> = TableDefinition::new("workout_types");

/// Exercise templates table: template_id -> ExerciseTemplateRecord (serialized)
pub const EXERCISE_TEMPLATES: TableDefinition<u64, &[u8]> =
    TableDefinition::new("exercise_templates");

/// Id sequences: sequence name -> last allocated id
pub const SEQUENCES: TableDefinition<&str, u64> = TableDefinition::new("sequences");

pub const SEQ_USERS: &str = "users";
pub const SEQ_WORKOUTS: &str = "workouts";
pub const SEQ_EXERCISES: &str = "workout_exercises";
pub const SEQ_WORKOUT_TYPES: &str = "workout_types";
pub const SEQ_TEMPLATES: &str = "exercise_templates";
