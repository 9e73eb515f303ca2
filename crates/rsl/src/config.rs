#![forbid(unsafe_code)]

//! Configuration for reactive state roots.
//!
//! Defaults reproduce the history-tracking behavior: every write is logged
//! and nested writes are recorded as `nested.<name>`.
//!
//! Environment overrides:
//!
//! | Variable            | Values                        |
//! |---------------------|-------------------------------|
//! | `RSL_TRACK_HISTORY` | `1`/`true`/`on`, `0`/`false`/`off` |
//! | `RSL_PATH_SCHEME`   | `legacy`, `full`              |

use crate::error::ConfigError;

/// Environment variable toggling history tracking.
pub const ENV_TRACK_HISTORY: &str = "RSL_TRACK_HISTORY";
/// Environment variable selecting the [`PathScheme`].
pub const ENV_PATH_SCHEME: &str = "RSL_PATH_SCHEME";

/// How a write's property is qualified in the mutation log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PathScheme {
    /// Bare name at the root, `nested.<name>` at any depth below it.
    ///
    /// Writes at depth 2 and depth 3 produce the same path.
    #[default]
    Legacy,
    /// Dotted path from the root, e.g. `user.address.city`.
    Full,
}

impl PathScheme {
    /// Qualified path for a write of `property` on a node reached via `path`.
    #[must_use]
    pub fn qualify(self, path: &[String], property: &str) -> String {
        if path.is_empty() {
            return property.to_owned();
        }
        match self {
            Self::Legacy => format!("nested.{property}"),
            Self::Full => {
                let mut out = path.join(".");
                out.push('.');
                out.push_str(property);
                out
            }
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "legacy" => Some(Self::Legacy),
            "full" => Some(Self::Full),
            _ => None,
        }
    }
}

/// Settings fixed for the lifetime of one reactive root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReactiveConfig {
    /// Record every write in the mutation log.
    pub track_history: bool,
    /// Qualification of logged property paths.
    pub path_scheme: PathScheme,
}

impl Default for ReactiveConfig {
    fn default() -> Self {
        Self {
            track_history: true,
            path_scheme: PathScheme::Legacy,
        }
    }
}

impl ReactiveConfig {
    /// Toggle history tracking.
    #[must_use]
    pub fn with_history(mut self, enabled: bool) -> Self {
        self.track_history = enabled;
        self
    }

    /// Select the path scheme.
    #[must_use]
    pub fn with_path_scheme(mut self, scheme: PathScheme) -> Self {
        self.path_scheme = scheme;
        self
    }

    /// Defaults overridden by `RSL_TRACK_HISTORY` and `RSL_PATH_SCHEME`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if a variable is set to an
    /// unrecognised value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] on an unrecognised value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(raw) = lookup(ENV_TRACK_HISTORY) {
            config.track_history = parse_bool(&raw).ok_or(ConfigError::InvalidValue {
                key: ENV_TRACK_HISTORY,
                value: raw,
            })?;
        }
        if let Some(raw) = lookup(ENV_PATH_SCHEME) {
            config.path_scheme = PathScheme::parse(&raw).ok_or(ConfigError::InvalidValue {
                key: ENV_PATH_SCHEME,
                value: raw,
            })?;
        }
        Ok(config)
    }

    /// Parse a JSON config document. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] if the document is malformed.
    #[cfg(feature = "serde")]
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}
