/// Body weight used for calorie estimation when none is configured (kg)
pub const DEFAULT_BODY_WEIGHT_KG: f64 = 70.0;

/// Calories per minute per intensity point per kg of body weight
pub const CALORIE_FACTOR: f64 = 0.1;

/// Minimum length for usernames and workout names
pub const MIN_NAME_LEN: usize = 3;

/// Upper bound (inclusive) of the workout intensity scale
pub const MAX_INTENSITY: f64 = 10.0;

/// Longest accepted workout or exercise duration (one day, in minutes)
pub const MAX_DURATION_MINUTES: i64 = 24 * 60;

/// Work factors bcrypt accepts
pub const MIN_BCRYPT_COST: u32 = 4;
pub const MAX_BCRYPT_COST: u32 = 31;

/// Default bearer token lifetime (24 hours)
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 86_400;

/// Exercise whose max weight is reported as the squat record
pub const SQUAT_EXERCISE: &str = "Squats";

/// Exercise names whose distance/duration is reported as the run record
pub const RUN_EXERCISES: [&str; 2] = ["Running", "Run"];

/// Placeholder for records the user has not logged yet
pub const NOT_AVAILABLE: &str = "N/A";

// =============================================================================
// Error Messages
// =============================================================================

/// Error message for a short username
pub const ERR_USERNAME_TOO_SHORT: &str = "Username must be at least 3 characters long";

/// Error message for a malformed email
pub const ERR_INVALID_EMAIL: &str = "Invalid email address";

/// Error message for an empty password
pub const ERR_PASSWORD_REQUIRED: &str = "Password must not be empty";

/// Error message for a short workout name
pub const ERR_WORKOUT_NAME_TOO_SHORT: &str = "Workout name must be at least 3 characters";

/// Error message for intensity outside 0..=10
pub const ERR_INVALID_INTENSITY: &str = "Intensity must be between 0 and 10";

/// Error message for a workout duration outside 0..=MAX_DURATION_MINUTES
pub const ERR_INVALID_DURATION: &str = "Duration must be between 0 and 1440 minutes";

/// Error message for a patch that changes nothing
pub const ERR_EMPTY_PATCH: &str = "No data provided for update";
