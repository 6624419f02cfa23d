use std::env;
use std::path::PathBuf;

pub const ENV_DB: &str = "TRUESTREAK_DB";
pub const ENV_LOG: &str = "TRUESTREAK_LOG";
pub const ENV_USER: &str = "TRUESTREAK_USER";

/// runtime settings; CLI flags override these
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    /// default `EnvFilter` directive when `RUST_LOG` is unset
    pub log_level: String,
    pub user_id: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            log_level: "info".to_string(),
            user_id: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// resolve from any key lookup; blank values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            db_path: get(ENV_DB).map(PathBuf::from).unwrap_or(defaults.db_path),
            log_level: get(ENV_LOG).unwrap_or(defaults.log_level),
            user_id: get(ENV_USER),
        }
    }
}

/// platform data dir, falling back to the working directory
pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("truestreak")
        .join("truestreak.db")
}
