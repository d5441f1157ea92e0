use std::env;

use crate::constants::{
    DEFAULT_BODY_WEIGHT_KG, DEFAULT_TOKEN_TTL_SECS, MAX_BCRYPT_COST, MIN_BCRYPT_COST,
};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub database_path: String,
    pub allowed_origins: Vec<String>,
    pub environment: String,
    /// Secret used to sign bearer tokens
    pub app_secret_key: String,
    /// bcrypt work factor for new password hashes
    pub bcrypt_cost: u32,
    /// Enables `/admin/stats` when set
    pub admin_secret_key: Option<String>,
    pub token_ttl_secs: i64,
    /// Body weight assumed by the calorie estimate
    pub body_weight_kg: f64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if it exists (development)
        dotenvy::dotenv().ok();

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "9000".to_string())
            .parse()
            .map_err(|_| "Invalid SERVER_PORT")?;

        let database_path =
            env::var("DATABASE_PATH").unwrap_or_else(|_| "./data/fittrack.db".to_string());

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let app_secret_key = env::var("APP_SECRET_KEY")
            .map_err(|_| "APP_SECRET_KEY must be set for token signing")?;

        let bcrypt_cost: u32 = match env::var("BCRYPT_COST") {
            Ok(value) => value.parse().map_err(|_| "Invalid BCRYPT_COST")?,
            Err(_) => bcrypt::DEFAULT_COST,
        };
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&bcrypt_cost) {
            return Err(format!(
                "BCRYPT_COST must be between {MIN_BCRYPT_COST} and {MAX_BCRYPT_COST}"
            ));
        }

        let admin_secret_key = env::var("ADMIN_SECRET_KEY")
            .ok()
            .filter(|key| !key.is_empty());

        let token_ttl_secs = match env::var("TOKEN_TTL_SECS") {
            Ok(value) => value.parse().map_err(|_| "Invalid TOKEN_TTL_SECS")?,
            Err(_) => DEFAULT_TOKEN_TTL_SECS,
        };

        let body_weight_kg: f64 = match env::var("BODY_WEIGHT_KG") {
            Ok(value) => value.parse().map_err(|_| "Invalid BODY_WEIGHT_KG")?,
            Err(_) => DEFAULT_BODY_WEIGHT_KG,
        };
        if body_weight_kg.is_nan() || body_weight_kg <= 0.0 {
            return Err("BODY_WEIGHT_KG must be positive".to_string());
        }

        Ok(Config {
            server_host,
            server_port,
            database_path,
            allowed_origins,
            environment,
            app_secret_key,
            bcrypt_cost,
            admin_secret_key,
            token_ttl_secs,
            body_weight_kg,
        })
    }

    /// Get server address as string
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
