#![forbid(unsafe_code)]

//! Error types.
//!
//! Construction is the only fallible step of the reactive layer itself.
//! Writes fail only when the observer reports a failure, and that failure is
//! handed back to the writer untouched.

use std::error::Error;
use std::fmt;

use crate::value::ValueKind;

/// Why a reactive state could not be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidArgument {
    /// The initial state was null or a primitive.
    NonObjectState { found: ValueKind },
    /// No invocable observer was supplied.
    NonCallableObserver,
}

impl fmt::Display for InvalidArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonObjectState { found } => {
                write!(f, "initial state must be a non-null object, got {found}")
            }
            Self::NonCallableObserver => f.write_str("observer must be callable"),
        }
    }
}

impl Error for InvalidArgument {}

/// Errors returned when creating reactive state.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ReactiveError {
    InvalidArgument(InvalidArgument),
}

impl fmt::Display for ReactiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument(inner) => write!(f, "invalid argument: {inner}"),
        }
    }
}

impl Error for ReactiveError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidArgument(inner) => Some(inner),
        }
    }
}

impl From<InvalidArgument> for ReactiveError {
    fn from(err: InvalidArgument) -> Self {
        Self::InvalidArgument(err)
    }
}

/// A failure reported by an observer while handling a change.
///
/// The mutation that triggered the observer has already been applied (and
/// recorded) when this error reaches the writer.
#[derive(Debug)]
pub struct ObserverError {
    message: String,
    source: Option<Box<dyn Error + 'static>>,
}

impl ObserverError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap an underlying error, using its message.
    pub fn from_source(source: impl Error + 'static) -> Self {
        Self {
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }

    /// Attach an underlying error to a custom message.
    #[must_use]
    pub fn with_source(mut self, source: impl Error + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ObserverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error for ObserverError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source.as_deref()
    }
}

/// Result of a write: `Err` only when the observer failed.
pub type ObserverResult = Result<(), ObserverError>;

/// Errors from loading a [`ReactiveConfig`](crate::ReactiveConfig).
#[derive(Debug)]
pub enum ConfigError {
    /// An environment variable held a value that could not be parsed.
    InvalidValue { key: &'static str, value: String },
    /// A JSON config document could not be parsed.
    #[cfg(feature = "serde")]
    Json(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { key, value } => {
                write!(f, "invalid value '{value}' for {key}")
            }
            #[cfg(feature = "serde")]
            Self::Json(err) => write!(f, "invalid config JSON: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidValue { .. } => None,
            #[cfg(feature = "serde")]
            Self::Json(err) => Some(err),
        }
    }
}

#[cfg(feature = "serde")]
impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}
