use std::env;
use std::path::PathBuf;
use tracing::warn;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_BIND: &str = "0.0.0.0";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_address: String,
    pub port: u16,
    /// Submissions CSV loaded into the repository at startup
    pub submissions_csv: Option<PathBuf>,
    /// Seed used when a schedule request does not carry one
    pub default_seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
            submissions_csv: None,
            default_seed: None,
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: String) -> Option<T> {
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!("{} has invalid value '{}', ignoring it", key, value);
            None
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("DOULA_PORT") {
            Some(value) => parse_var("DOULA_PORT", value).unwrap_or(defaults.port),
            None => {
                warn!("DOULA_PORT not set, using {}", DEFAULT_PORT);
                defaults.port
            }
        };

        let bind_address = lookup("DOULA_BIND")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.bind_address);

        let submissions_csv = lookup("DOULA_SUBMISSIONS_CSV")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let default_seed = lookup("DOULA_DEFAULT_SEED").and_then(|v| parse_var("DOULA_DEFAULT_SEED", v));

        Self {
            bind_address,
            port,
            submissions_csv,
            default_seed,
        }
    }
}
