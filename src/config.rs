//! Configuration types.

use std::path::PathBuf;

use crate::error::ConfigError;
use crate::screening::DEFAULT_EXIT_KEYWORDS;

/// How the binary talks to candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// HTTP/JSON server.
    Server,
    /// Local stdin/stdout screening.
    Cli,
}

impl std::str::FromStr for RunMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "server" | "http" => Ok(Self::Server),
            "cli" | "repl" => Ok(Self::Cli),
            other => Err(ConfigError::InvalidValue {
                key: "TALENT_SCOUT_MODE".to_string(),
                message: format!("expected `server` or `cli`, got `{other}`"),
            }),
        }
    }
}

/// Screening service configuration.
#[derive(Debug, Clone)]
pub struct ScreeningConfig {
    pub mode: RunMode,
    /// HTTP listen port.
    pub port: u16,
    /// JSON file holding submitted screenings.
    pub data_file: PathBuf,
    /// Optional JSON question bank; the built-in bank is used when unset.
    pub question_bank: Option<PathBuf>,
    /// Lowercase keywords that end a session.
    pub exit_keywords: Vec<String>,
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            mode: RunMode::Server,
            port: 8080,
            data_file: PathBuf::from("./data/data.json"),
            question_bank: None,
            exit_keywords: DEFAULT_EXIT_KEYWORDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ScreeningConfig {
    /// Build configuration from `TALENT_SCOUT_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let mode = match lookup("TALENT_SCOUT_MODE") {
            Some(v) => v.parse()?,
            None => defaults.mode,
        };

        let port = match lookup("TALENT_SCOUT_PORT") {
            Some(v) => v.trim().parse().map_err(|e| ConfigError::InvalidValue {
                key: "TALENT_SCOUT_PORT".to_string(),
                message: format!("{e}"),
            })?,
            None => defaults.port,
        };

        let data_file = lookup("TALENT_SCOUT_DATA_FILE")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_file);

        let question_bank = lookup("TALENT_SCOUT_QUESTION_BANK")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let exit_keywords = match lookup("TALENT_SCOUT_EXIT_KEYWORDS") {
            Some(v) => {
                let keywords: Vec<String> = v
                    .split(',')
                    .map(|s| s.trim().to_lowercase())
                    .filter(|s| !s.is_empty())
                    .collect();
                if keywords.is_empty() {
                    return Err(ConfigError::InvalidValue {
                        key: "TALENT_SCOUT_EXIT_KEYWORDS".to_string(),
                        message: "at least one keyword is required".to_string(),
                    });
                }
                keywords
            }
            None => defaults.exit_keywords,
        };

        Ok(Self {
            mode,
            port,
            data_file,
            question_bank,
            exit_keywords,
        })
    }
}
