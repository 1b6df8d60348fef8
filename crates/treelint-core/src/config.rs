//! Configuration types and the rule-option decode contract.

use crate::types::Severity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

/// Errors loading or decoding configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading the config file.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// TOML syntax or structure error.
    #[error("invalid config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// A rule entry does not match the accepted shapes.
    #[error("bad config for rule '{rule}': {message}")]
    BadRuleConfig {
        /// Rule name.
        rule: String,
        /// What was wrong.
        message: String,
    },
}

/// Reporting level requested for a rule in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleLevel {
    /// Rule disabled.
    Off,
    /// Report as info.
    Info,
    /// Report as warning.
    Warn,
    /// Report as error.
    Error,
}

impl RuleLevel {
    /// The severity this level maps to; `None` for [`RuleLevel::Off`].
    #[must_use]
    pub fn severity(self) -> Option<Severity> {
        match self {
            Self::Off => None,
            Self::Info => Some(Severity::Info),
            Self::Warn => Some(Severity::Warning),
            Self::Error => Some(Severity::Error),
        }
    }

    fn from_scalar(value: &toml::Value) -> Result<Option<Self>, String> {
        match value {
            toml::Value::String(s) => match s.as_str() {
                "off" => Ok(Some(Self::Off)),
                "info" => Ok(Some(Self::Info)),
                "warn" | "warning" => Ok(Some(Self::Warn)),
                "error" => Ok(Some(Self::Error)),
                other => Err(format!("unknown level '{other}'")),
            },
            // Booleans toggle the rule without overriding its severity.
            toml::Value::Boolean(false) => Ok(Some(Self::Off)),
            toml::Value::Boolean(true) => Ok(None),
            toml::Value::Integer(0) => Ok(Some(Self::Off)),
            toml::Value::Integer(1) => Ok(Some(Self::Warn)),
            toml::Value::Integer(2) => Ok(Some(Self::Error)),
            other => Err(format!("level must be a string, bool or 0..=2, got {other}")),
        }
    }
}

/// The raw configuration value of one rule entry.
///
/// Rule entries arrive in one of four shapes:
///
/// ```toml
/// [rules]
/// no-debugger = "error"                       # scalar
/// eqeqeq = ["warn", { null = "ignore" }]      # leading scalar + options
/// no-unused-vars = { level = "warn", ignore-pattern = "^_" }  # bare object
/// # absent entries keep preset defaults
/// ```
///
/// This is the single decode point for all rules; typed accessors below
/// replace per-rule type switching.
#[derive(Debug, Clone, Default)]
pub enum ConfigValue {
    /// Rule not mentioned in configuration.
    #[default]
    Absent,
    /// A bare level scalar.
    Scalar(toml::Value),
    /// `[level, { options }]` list form.
    List {
        /// The leading level scalar.
        level: toml::Value,
        /// The trailing options table.
        options: toml::value::Table,
    },
    /// A bare options table, optionally carrying a `level` key.
    Object(toml::value::Table),
}

impl ConfigValue {
    /// Decodes a raw TOML value into one of the four accepted shapes.
    ///
    /// # Errors
    ///
    /// Returns a description of the malformation; callers wrap it into
    /// [`ConfigError::BadRuleConfig`].
    pub fn from_toml(value: Option<&toml::Value>) -> Result<Self, String> {
        let Some(value) = value else {
            return Ok(Self::Absent);
        };
        match value {
            toml::Value::String(_) | toml::Value::Boolean(_) | toml::Value::Integer(_) => {
                Ok(Self::Scalar(value.clone()))
            }
            toml::Value::Array(items) => match items.as_slice() {
                [level] => Ok(Self::List {
                    level: level.clone(),
                    options: toml::value::Table::new(),
                }),
                [level, toml::Value::Table(options)] => Ok(Self::List {
                    level: level.clone(),
                    options: options.clone(),
                }),
                [] => Err("list form must start with a level scalar".to_string()),
                _ => Err(
                    "list form must be [level] or [level, { options }]".to_string(),
                ),
            },
            toml::Value::Table(table) => Ok(Self::Object(table.clone())),
            other => Err(format!("unsupported rule config shape: {other}")),
        }
    }

    /// The requested level, if the entry specifies one.
    ///
    /// # Errors
    ///
    /// Returns a description of an unrecognized level scalar.
    pub fn level(&self) -> Result<Option<RuleLevel>, String> {
        match self {
            Self::Absent => Ok(None),
            Self::Scalar(value) | Self::List { level: value, .. } => {
                RuleLevel::from_scalar(value)
            }
            Self::Object(table) => match table.get("level") {
                Some(value) => RuleLevel::from_scalar(value),
                None => Ok(None),
            },
        }
    }

    /// The options table, if the entry carries one.
    #[must_use]
    pub fn options(&self) -> Option<&toml::value::Table> {
        match self {
            Self::Absent | Self::Scalar(_) => None,
            Self::List { options, .. } => Some(options),
            Self::Object(table) => Some(table),
        }
    }

    /// Reads a boolean option with a default.
    #[must_use]
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.options()
            .and_then(|t| t.get(key))
            .and_then(toml::Value::as_bool)
            .unwrap_or(default)
    }

    /// Reads a string option.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.options()?.get(key)?.as_str()
    }

    /// Reads a non-negative integer option.
    #[must_use]
    pub fn get_usize(&self, key: &str) -> Option<usize> {
        let value = self.options()?.get(key)?.as_integer()?;
        usize::try_from(value).ok()
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Preset to start from (e.g. "recommended", "strict").
    #[serde(default)]
    pub preset: Option<String>,

    /// Analyzer configuration.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Raw per-rule entries, decoded lazily via [`Config::rule_value`].
    #[serde(default)]
    pub rules: BTreeMap<String, toml::Value>,
}

impl Config {
    /// Creates a default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Decodes the configuration value for one rule.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::BadRuleConfig`] when the entry does not match
    /// the accepted shapes; this surfaces at rule-activation time, never as a
    /// crash.
    pub fn rule_value(&self, rule: &str) -> Result<ConfigValue, ConfigError> {
        ConfigValue::from_toml(self.rules.get(rule)).map_err(|message| {
            ConfigError::BadRuleConfig {
                rule: rule.to_string(),
                message,
            }
        })
    }

    /// The level requested for a rule, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::BadRuleConfig`] for malformed entries.
    pub fn rule_level(&self, rule: &str) -> Result<Option<RuleLevel>, ConfigError> {
        self.rule_value(rule)?
            .level()
            .map_err(|message| ConfigError::BadRuleConfig {
                rule: rule.to_string(),
                message,
            })
    }

    /// Returns true unless the rule is explicitly turned off.
    ///
    /// Malformed entries count as enabled here; the malformation itself is
    /// reported when the rule is activated.
    #[must_use]
    pub fn is_rule_enabled(&self, rule: &str) -> bool {
        !matches!(self.rule_level(rule), Ok(Some(RuleLevel::Off)))
    }
}

/// Analyzer-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Root directory to analyze (default: current directory).
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Glob patterns to exclude from analysis.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Glob patterns to include (if empty, all files the provider handles).
    #[serde(default)]
    pub include: Vec<String>,

    /// Whether to respect .gitignore files.
    #[serde(default = "default_true")]
    pub respect_gitignore: bool,

    /// Maximum number of parallel file workers (default: CPU count).
    #[serde(default)]
    pub parallelism: Option<usize>,

    /// Override for the autofix pass cap.
    #[serde(default)]
    pub max_fix_passes: Option<usize>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            exclude: vec!["**/target/**".to_string(), "**/node_modules/**".to_string()],
            include: Vec::new(),
            respect_gitignore: true,
            parallelism: None,
            max_fix_passes: None,
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_true() -> bool {
    true
}
