use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,

    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_audience: String,

    /// Per-user ceiling on concurrently active refresh tokens; floor 1.
    pub max_active_refresh_tokens: usize,
    /// How often the housekeeping sweeper deletes expired tokens; floor 1 hour.
    pub cleanup_interval: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://diving.db".to_string());

        let jwt_secret = std::env::var("JWT_SECRET").expect("JWT_SECRET is required");
        let jwt_issuer = std::env::var("JWT_ISSUER").unwrap_or_else(|_| "diving-api".to_string());
        let jwt_audience =
            std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "diving-api".to_string());

        let max_active_refresh_tokens = std::env::var("MAX_ACTIVE_REFRESH_TOKENS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(5)
            .max(1);

        let cleanup_interval_hours = std::env::var("CLEANUP_INTERVAL_HOURS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(6)
            .max(1);

        Self {
            database_url,
            jwt_secret,
            jwt_issuer,
            jwt_audience,
            max_active_refresh_tokens,
            cleanup_interval: Duration::from_secs(cleanup_interval_hours * 3600),
        }
    }
}
