use punchcard_cache::memory::DEFAULT_MAX_CAPACITY;
use punchcard_core::report::DEFAULT_PUNCH_ROW_CAP;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Bound on a single cache get/set/delete call in milliseconds
    /// (default: `250`). On timeout the call degrades to a miss.
    pub cache_op_timeout_ms: u64,
    /// Maximum number of cached report payloads (default: `10000`).
    pub cache_max_capacity: u64,
    /// Hard cap on punch-grouping report rows (default: `50000`).
    pub punch_row_cap: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `CACHE_OP_TIMEOUT_MS`  | `250`                      |
    /// | `CACHE_MAX_CAPACITY`   | `10000`                    |
    /// | `PUNCH_REPORT_ROW_CAP` | `50000`                    |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let cache_op_timeout_ms: u64 = std::env::var("CACHE_OP_TIMEOUT_MS")
            .unwrap_or_else(|_| "250".into())
            .parse()
            .expect("CACHE_OP_TIMEOUT_MS must be a valid u64");

        let cache_max_capacity: u64 = std::env::var("CACHE_MAX_CAPACITY")
            .unwrap_or_else(|_| DEFAULT_MAX_CAPACITY.to_string())
            .parse()
            .expect("CACHE_MAX_CAPACITY must be a valid u64");

        let punch_row_cap: usize = std::env::var("PUNCH_REPORT_ROW_CAP")
            .unwrap_or_else(|_| DEFAULT_PUNCH_ROW_CAP.to_string())
            .parse()
            .expect("PUNCH_REPORT_ROW_CAP must be a valid usize");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            cache_op_timeout_ms,
            cache_max_capacity,
            punch_row_cap,
        }
    }
}
