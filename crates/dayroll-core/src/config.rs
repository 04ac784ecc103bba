use std::fs;
use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use serde::Deserialize;
use thiserror::Error;

use crate::constants::{DEFAULT_DAILY_HOUR, DEFAULT_TIMEZONE, STATE_FILE_NAME, TOKEN_ENV_VAR};

/// Validated runtime configuration. Construction fails only on the
/// unrecoverable misconfigurations that justify refusing to start.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    pub token: String,
    pub data_dir: PathBuf,
    pub daily_hour: u32,
    pub timezone: Tz,
}

/// Raw shape of the optional JSON config file; every field may be
/// omitted except that a token must come from here or the environment.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    token: Option<String>,
    data_dir: Option<PathBuf>,
    daily_hour: Option<u32>,
    timezone: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("no bot token: set \"token\" in the config file or the {TOKEN_ENV_VAR} environment variable")]
    MissingToken,
    #[error("unknown timezone {0:?}")]
    InvalidTimezone(String),
    #[error("daily_hour {0} is out of range (0-23)")]
    InvalidHour(u32),
}

impl CoreConfig {
    /// Load configuration from an optional JSON file, falling back to
    /// the environment for the token and to built-in defaults for the
    /// rest.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => {
                let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                Some(
                    serde_json::from_str::<ConfigFile>(&contents).map_err(|source| {
                        ConfigError::Parse {
                            path: path.to_path_buf(),
                            source,
                        }
                    })?,
                )
            }
            None => None,
        };
        let file = file.unwrap_or(ConfigFile {
            token: None,
            data_dir: None,
            daily_hour: None,
            timezone: None,
        });

        let token = file
            .token
            .filter(|t| !t.trim().is_empty())
            .or_else(|| std::env::var(TOKEN_ENV_VAR).ok().filter(|t| !t.trim().is_empty()))
            .ok_or(ConfigError::MissingToken)?;

        let daily_hour = file.daily_hour.unwrap_or(DEFAULT_DAILY_HOUR);
        if daily_hour > 23 {
            return Err(ConfigError::InvalidHour(daily_hour));
        }

        let tz_name = file.timezone.unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());
        let timezone: Tz = tz_name
            .parse()
            .map_err(|_| ConfigError::InvalidTimezone(tz_name))?;

        let data_dir = file.data_dir.unwrap_or_else(default_data_dir);

        Ok(Self {
            token,
            data_dir,
            daily_hour,
            timezone,
        })
    }

    pub fn state_file(&self) -> PathBuf {
        self.data_dir.join(STATE_FILE_NAME)
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("dayroll"))
        .unwrap_or_else(|| PathBuf::from("dayroll_data"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn full_config_file() {
        let file = write_config(
            r#"{"token":"123:abc","data_dir":"/tmp/dayroll","daily_hour":7,"timezone":"Europe/Berlin"}"#,
        );
        let config = CoreConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.token, "123:abc");
        assert_eq!(config.daily_hour, 7);
        assert_eq!(config.timezone, chrono_tz::Europe::Berlin);
        assert_eq!(config.state_file(), PathBuf::from("/tmp/dayroll/dayroll_state.json"));
    }

    #[test]
    fn defaults_fill_missing_fields() {
        let file = write_config(r#"{"token":"123:abc"}"#);
        let config = CoreConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.daily_hour, DEFAULT_DAILY_HOUR);
        assert_eq!(config.timezone, chrono_tz::Europe::Sofia);
    }

    #[test]
    fn rejects_out_of_range_hour() {
        let file = write_config(r#"{"token":"t","daily_hour":24}"#);
        assert!(matches!(
            CoreConfig::load(Some(file.path())),
            Err(ConfigError::InvalidHour(24))
        ));
    }

    #[test]
    fn rejects_unknown_timezone() {
        let file = write_config(r#"{"token":"t","timezone":"Mars/Olympus"}"#);
        assert!(matches!(
            CoreConfig::load(Some(file.path())),
            Err(ConfigError::InvalidTimezone(_))
        ));
    }

    #[test]
    fn rejects_malformed_json() {
        let file = write_config("{nope");
        assert!(matches!(
            CoreConfig::load(Some(file.path())),
            Err(ConfigError::Parse { .. })
        ));
    }
}
