use std::sync::Once;
use std::{env, path::PathBuf};

use chrono::Utc;
use dirs::home_dir;

const DEFAULT_DIR_NAME: &str = ".lager_core";
const DATABASE_FILE: &str = "lager.sqlite3";

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber with sensible defaults.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter =
            EnvFilter::from_default_env().add_directive("lager_core=info".parse().unwrap());

        fmt().with_env_filter(filter).init();
    });
}

/// Current timestamp as the ISO-8601 string persisted in every table.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339()
}

/// Returns the application-specific data directory, defaulting to `~/.lager_core`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("LAGER_CORE_HOME") {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Absolute path of the managed database file.
pub fn database_file() -> PathBuf {
    app_data_dir().join(DATABASE_FILE)
}
