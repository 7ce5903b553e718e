//! Runtime configuration.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! `VIDEO_QUIZ_*` environment variables. Command-line flags are applied last
//! by the binary.
//!
//! ```toml
//! api_base_url = "http://localhost:8000"
//! target_lang = "en"
//! difficulty = "medium"        # basic | medium | hard
//! quiz_duration_secs = 600
//! request_timeout_secs = 180
//! scoring = "local"            # local | remote
//! log_filter = "info"
//! log_format = "pretty"        # pretty | json
//! log_file = "/tmp/video-quiz.log"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::ValueEnum;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::service::{Difficulty, GenerationParams};
use crate::session::{DEFAULT_DURATION_SECS, ScoringMode, SessionSettings};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 180;
const ENV_PREFIX: &str = "VIDEO_QUIZ_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid value {value:?} for {key}: {reason}")]
    Env {
        key: String,
        value: String,
        reason: String,
    },
    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub api_base_url: String,
    pub target_lang: String,
    pub difficulty: Difficulty,
    pub quiz_duration_secs: u32,
    pub request_timeout_secs: u64,
    pub scoring: ScoringMode,
    pub log_filter: String,
    pub log_format: LogFormat,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            target_lang: "en".to_string(),
            difficulty: Difficulty::Medium,
            quiz_duration_secs: DEFAULT_DURATION_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            scoring: ScoringMode::Local,
            log_filter: "info".to_string(),
            log_format: LogFormat::Pretty,
            log_file: None,
        }
    }
}

impl Config {
    /// Defaults, overlaid by `path` when given, overlaid by the process
    /// environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Overrides fields from `VIDEO_QUIZ_*` variables found through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            let key = format!("{ENV_PREFIX}{name}");
            lookup(&key).map(|value| (key, value))
        };

        if let Some((_, value)) = var("API_URL") {
            self.api_base_url = value;
        }
        if let Some((_, value)) = var("LANG") {
            self.target_lang = value;
        }
        if let Some((key, value)) = var("DIFFICULTY") {
            self.difficulty = parse_enum(&key, &value)?;
        }
        if let Some((key, value)) = var("DURATION_SECS") {
            self.quiz_duration_secs = parse_number(&key, &value)?;
        }
        if let Some((key, value)) = var("TIMEOUT_SECS") {
            self.request_timeout_secs = parse_number(&key, &value)?;
        }
        if let Some((key, value)) = var("SCORING") {
            self.scoring = parse_enum(&key, &value)?;
        }
        if let Some((_, value)) = var("LOG") {
            self.log_filter = value;
        }
        if let Some((key, value)) = var("LOG_FORMAT") {
            self.log_format = parse_enum(&key, &value)?;
        }
        if let Some((_, value)) = var("LOG_FILE") {
            self.log_file = Some(PathBuf::from(value));
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("api_base_url must not be empty".into()));
        }
        if self.target_lang.trim().is_empty() {
            return Err(ConfigError::Invalid("target_lang must not be empty".into()));
        }
        if self.quiz_duration_secs == 0 {
            return Err(ConfigError::Invalid(
                "quiz_duration_secs must be at least 1".into(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn log_file_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("video-quiz.log"))
    }

    pub fn generation_params(&self) -> GenerationParams {
        GenerationParams {
            target_lang: self.target_lang.clone(),
            difficulty: self.difficulty,
        }
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            duration_secs: self.quiz_duration_secs,
            scoring: self.scoring,
        }
    }
}

fn parse_enum<T: ValueEnum>(key: &str, value: &str) -> Result<T, ConfigError> {
    T::from_str(value.trim(), true).map_err(|reason| ConfigError::Env {
        key: key.to_string(),
        value: value.to_string(),
        reason,
    })
}

fn parse_number<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Env {
        key: key.to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "http://localhost:8000");
        assert_eq!(config.quiz_duration_secs, 600);
        assert_eq!(config.scoring, ScoringMode::Local);
        assert_eq!(config.difficulty, Difficulty::Medium);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            api_base_url = "https://quiz.example.org"
            difficulty = "hard"
            scoring = "remote"
            "#,
        )
        .unwrap();
        assert_eq!(config.api_base_url, "https://quiz.example.org");
        assert_eq!(config.difficulty, Difficulty::Hard);
        assert_eq!(config.scoring, ScoringMode::Remote);
        assert_eq!(config.quiz_duration_secs, 600);
        assert_eq!(config.target_lang, "en");
    }

    #[test]
    fn test_unknown_toml_keys_are_rejected() {
        assert!(toml::from_str::<Config>("api_url = \"x\"").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_env(env(&[
                ("VIDEO_QUIZ_API_URL", "http://10.0.0.2:9000"),
                ("VIDEO_QUIZ_DIFFICULTY", "Basic"),
                ("VIDEO_QUIZ_DURATION_SECS", " 90 "),
                ("VIDEO_QUIZ_LOG_FORMAT", "json"),
                ("UNRELATED", "1"),
            ]))
            .unwrap();

        assert_eq!(config.api_base_url, "http://10.0.0.2:9000");
        assert_eq!(config.difficulty, Difficulty::Basic);
        assert_eq!(config.quiz_duration_secs, 90);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.session_settings().duration_secs, 90);
    }

    #[test]
    fn test_bad_env_values_are_reported() {
        let mut config = Config::default();
        let err = config
            .apply_env(env(&[("VIDEO_QUIZ_DURATION_SECS", "ten")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Env { ref key, .. } if key == "VIDEO_QUIZ_DURATION_SECS"));

        let err = config
            .apply_env(env(&[("VIDEO_QUIZ_SCORING", "both")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Env { .. }));
    }

    #[test]
    fn test_validation() {
        let config = Config {
            quiz_duration_secs: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            api_base_url: "  ".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load(Some(Path::new("/nonexistent/video-quiz.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
