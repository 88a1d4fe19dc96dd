/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// A malformed environment variable.
#[derive(Debug, thiserror::Error)]
#[error("{var} has invalid value {value:?}: {reason}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub reason: String,
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development. In production,
/// override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub database_url: String,
    pub db_max_connections: u32,
    /// Base URL of the user identity service.
    pub users_service_url: String,
    /// Base URL of the remote configuration store.
    pub configs_service_url: String,
    /// Per-request timeout for both upstream services, in seconds.
    pub upstream_timeout_secs: u64,
    /// How many configurations are enriched at once in listings.
    pub enrich_concurrency: usize,
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                              |
    /// |-------------------------|--------------------------------------|
    /// | `HOST`                  | `0.0.0.0`                            |
    /// | `PORT`                  | `8000`                               |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`              |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                                 |
    /// | `DATABASE_URL`          | `postgres://localhost:5432/setuphub` |
    /// | `DB_MAX_CONNECTIONS`    | `10`                                 |
    /// | `USERS_SERVICE_URL`     | `http://user-service:8000`           |
    /// | `CONFIGS_SERVICE_URL`   | `http://configs-service:8000`        |
    /// | `UPSTREAM_TIMEOUT_SECS` | `5`                                  |
    /// | `ENRICH_CONCURRENCY`    | `8`                                  |
    /// | `LOG_FORMAT`            | `pretty` (or `json`)                 |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let cors_origins: Vec<String> = var("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let log_format = match var("LOG_FORMAT", "pretty").to_ascii_lowercase().as_str() {
            "pretty" | "text" => LogFormat::Pretty,
            "json" => LogFormat::Json,
            other => {
                return Err(ConfigError {
                    var: "LOG_FORMAT",
                    value: other.to_string(),
                    reason: "expected `pretty` or `json`".into(),
                })
            }
        };

        let enrich_concurrency: usize = parse(&lookup, "ENRICH_CONCURRENCY", "8")?;
        if enrich_concurrency == 0 {
            return Err(ConfigError {
                var: "ENRICH_CONCURRENCY",
                value: "0".into(),
                reason: "must be at least 1".into(),
            });
        }

        Ok(Self {
            host: var("HOST", "0.0.0.0"),
            port: parse(&lookup, "PORT", "8000")?,
            cors_origins,
            request_timeout_secs: parse(&lookup, "REQUEST_TIMEOUT_SECS", "30")?,
            database_url: var("DATABASE_URL", "postgres://localhost:5432/setuphub"),
            db_max_connections: parse(&lookup, "DB_MAX_CONNECTIONS", "10")?,
            users_service_url: var("USERS_SERVICE_URL", "http://user-service:8000"),
            configs_service_url: var("CONFIGS_SERVICE_URL", "http://configs-service:8000"),
            upstream_timeout_secs: parse(&lookup, "UPSTREAM_TIMEOUT_SECS", "5")?,
            enrich_concurrency,
            log_format,
        })
    }
}

fn parse<F, T>(lookup: &F, var: &'static str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let value = lookup(var).unwrap_or_else(|| default.to_string());
    value.trim().parse().map_err(|e: T::Err| ConfigError {
        var,
        reason: e.to_string(),
        value,
    })
}
