use std::fs;
use std::path::Path;

use nst_core::errors::{ErrorInfo, NsError};
use serde::{Deserialize, Serialize};

/// YAML-configurable switches for run validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckConfig {
    /// Report repeated log-likelihoods as a warning instead of failing.
    pub logl_warn_only: bool,
}

impl CheckConfig {
    /// Repeated log-likelihoods are fatal.
    pub fn strict() -> Self {
        Self {
            logl_warn_only: false,
        }
    }

    /// Repeated log-likelihoods only produce a warning.
    pub fn relaxed() -> Self {
        Self {
            logl_warn_only: true,
        }
    }

    /// Parses a configuration document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, NsError> {
        serde_yaml::from_str(yaml)
            .map_err(|err| NsError::Config(ErrorInfo::new("config.parse", err.to_string())))
    }

    /// Reads a configuration document from disk.
    pub fn load(path: &Path) -> Result<Self, NsError> {
        let raw = fs::read_to_string(path).map_err(|err| {
            NsError::Config(
                ErrorInfo::new("config.read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        Self::from_yaml_str(&raw)
    }
}
