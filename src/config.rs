//! Engine configuration, from the environment or a JSON file.

use std::{path::{Path, PathBuf}, str::FromStr, fs::read_to_string};

use anyhow::{Result, Context, anyhow};
use serde::Deserialize;

use crate::{util::{getenv, getenv_or, getenv_bool},
            error::{ViewError, ViewErrorKind}};


/// `M/dd/yyyy h:mm tt`, e.g. "3/05/2024 4:07 PM".
pub const DEFAULT_DATE_FORMAT: &str = "%-m/%d/%Y %-I:%M %p";


#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// No caching: templates are re-read on every load.
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

impl FromStr for Environment {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match &*s.trim().to_ascii_lowercase() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(ViewErrorKind::UnknownEnvironment(s.into()).into())
        }
    }
}


#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Directory that template paths are relative to.
    pub root: PathBuf,
    pub environment: Environment,
    /// Print parse warnings to stderr.
    pub warnings: bool,
    /// chrono format string used when binding timestamps.
    pub date_format: String,
}

impl Default for ViewConfig {
    fn default() -> Self {
        ViewConfig {
            root: PathBuf::from("."),
            environment: Environment::default(),
            warnings: true,
            date_format: DEFAULT_DATE_FORMAT.into(),
        }
    }
}

impl ViewConfig {
    /// From `AVIEW_ROOT`, `AVIEW_ENVIRONMENT`, `AVIEW_WARNINGS` and
    /// `AVIEW_DATE_FORMAT`, defaults for unset ones.
    pub fn from_env() -> Result<Self> {
        let default = ViewConfig::default();
        let root = match getenv("AVIEW_ROOT")? {
            Some(root) => PathBuf::from(root),
            None => default.root,
        };
        let environment = getenv_or("AVIEW_ENVIRONMENT", Some("development"))?
            .parse()?;
        Ok(ViewConfig {
            root,
            environment,
            warnings: getenv_bool("AVIEW_WARNINGS", default.warnings)?,
            date_format: getenv_or("AVIEW_DATE_FORMAT",
                                   Some(default.date_format.as_str()))?,
        })
    }

    /// Missing keys take their default values.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let s = read_to_string(path).with_context(
            || anyhow!("reading config file {path:?}"))?;
        Self::from_json_str(&s).with_context(
            || anyhow!("parsing config file {path:?}"))
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_environment() {
        assert_eq!("Production".parse::<Environment>().unwrap(),
                   Environment::Production);
        assert_eq!(" staging".parse::<Environment>().unwrap(),
                   Environment::Staging);
        assert_eq!(Environment::default(), Environment::Development);
        let e = "live".parse::<Environment>().unwrap_err();
        assert!(matches!(e.kind(), ViewErrorKind::UnknownEnvironment(s) if s == "live"));
    }

    #[test]
    fn t_from_json() -> Result<()> {
        let c = ViewConfig::from_json_str(
            r#"{"environment": "production", "root": "/srv/views"}"#)?;
        assert_eq!(c.environment, Environment::Production);
        assert_eq!(c.root, PathBuf::from("/srv/views"));
        assert!(c.warnings);
        assert_eq!(c.date_format, DEFAULT_DATE_FORMAT);
        assert!(!c.is_development());

        let c = ViewConfig::from_json_str("{}")?;
        assert_eq!(c, ViewConfig::default());
        assert!(c.is_development());

        assert!(ViewConfig::from_json_str(r#"{"environment": "live"}"#).is_err());
        Ok(())
    }

    #[test]
    fn t_from_json_file() -> Result<()> {
        let path = std::env::temp_dir().join(
            format!("aview-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"environment": "staging", "warnings": false}"#)?;
        let c = ViewConfig::from_json_file(&path)?;
        std::fs::remove_file(&path)?;
        assert_eq!(c.environment, Environment::Staging);
        assert!(!c.warnings);
        assert!(ViewConfig::from_json_file(&path).is_err());
        Ok(())
    }
}
