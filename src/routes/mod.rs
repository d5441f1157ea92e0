pub mod admin;
pub mod auth;
pub mod catalog;
pub mod exercises;
pub mod health;
pub mod profile;
pub mod progress;
pub mod workouts;

pub use admin::admin_stats;
pub use auth::{AuthUser, login, register};
pub use catalog::get_catalog;
pub use exercises::{add_exercise, delete_exercise, update_exercise};
pub use health::health_check;
pub use profile::{delete_profile, get_profile, list_users, update_profile};
pub use progress::{personal_bests, progress_summary};
pub use workouts::{create_workout, delete_workout, get_workout, list_workouts, update_workout};
