//! Structured errors for run processing.
//!
//! Every failure carries an [`ErrorInfo`]: a stable dotted code such as
//! `threads.duplicate-logl`, a message, and string context (sample indices,
//! offending likelihoods) that is kept machine readable so reports can be
//! serialised next to the run that produced them.

use std::collections::BTreeMap;
use std::fmt::{self, Debug, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Payload attached to every [`NsError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable dotted code, `<area>.<failure>`.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Sample indices, likelihood values, counts and similar details.
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Suggested remedy, when one is known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a payload with no context.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Adds a floating-point context entry.
    ///
    /// Values keep their `Debug` rendering so `-inf` and `1.0` stay
    /// distinguishable from integers and from each other.
    pub fn with_value(self, key: impl Into<String>, value: f64) -> Self {
        self.with_context(key, format!("{value:?}"))
    }

    /// Adds a list context entry such as `[1, 2]`.
    pub fn with_list<T: Debug>(self, key: impl Into<String>, values: &[T]) -> Self {
        self.with_context(key, format!("{values:?}"))
    }

    /// Sets the remediation hint.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        let mut entries = self.context.iter();
        if let Some((key, value)) = entries.next() {
            write!(f, " ({key}={value}")?;
            for (key, value) in entries {
                write!(f, ", {key}={value}")?;
            }
            write!(f, ")")?;
        }
        match &self.hint {
            Some(hint) => write!(f, "; hint: {hint}"),
            None => Ok(()),
        }
    }
}

/// Error returned by every fallible run-processing operation.
///
/// The variant is the failure family; callers that only need to tell
/// precision problems apart from genuinely broken input can match on it
/// without inspecting codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum NsError {
    /// Shape, length or ordering problems in the supplied arrays.
    #[error("malformed input {0}")]
    Malformed(ErrorInfo),
    /// Repeated log-likelihood values that exact contour matching cannot
    /// resolve.
    #[error("likelihood precision {0}")]
    Precision(ErrorInfo),
    /// Birth contours or thread bounds that admit no consistent threads.
    #[error("inconsistent threads {0}")]
    Reconstruction(ErrorInfo),
    /// Invalid or unreadable configuration.
    #[error("configuration {0}")]
    Config(ErrorInfo),
    /// JSON or YAML encoding failures.
    #[error("serialization {0}")]
    Serde(ErrorInfo),
}

impl NsError {
    /// Payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            NsError::Malformed(info)
            | NsError::Precision(info)
            | NsError::Reconstruction(info)
            | NsError::Config(info)
            | NsError::Serde(info) => info,
        }
    }

    /// Family name as written in serialised reports.
    pub fn family(&self) -> &'static str {
        match self {
            NsError::Malformed(_) => "Malformed",
            NsError::Precision(_) => "Precision",
            NsError::Reconstruction(_) => "Reconstruction",
            NsError::Config(_) => "Config",
            NsError::Serde(_) => "Serde",
        }
    }

    /// Stable error code.
    pub fn code(&self) -> &str {
        &self.info().code
    }

    /// Whether the input was well formed but its likelihoods collide.
    ///
    /// Such runs may still be usable with relaxed checking.
    pub fn is_precision(&self) -> bool {
        matches!(self, NsError::Precision(_))
    }
}
