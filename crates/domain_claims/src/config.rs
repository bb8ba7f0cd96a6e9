//! Claims service configuration

use config::{builder::DefaultState, ConfigBuilder, Environment};
use serde::{Deserialize, Serialize};

use core_kernel::CoreError;

/// Default number of commit attempts before a conflict is surfaced
pub const DEFAULT_MAX_COMMIT_ATTEMPTS: u32 = 3;

/// Claims service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimsConfig {
    /// Commit attempts per submission, each with a fresh read
    #[serde(default = "default_max_commit_attempts")]
    pub max_commit_attempts: u32,
}

fn default_max_commit_attempts() -> u32 {
    DEFAULT_MAX_COMMIT_ATTEMPTS
}

impl Default for ClaimsConfig {
    fn default() -> Self {
        Self {
            max_commit_attempts: DEFAULT_MAX_COMMIT_ATTEMPTS,
        }
    }
}

impl ClaimsConfig {
    /// Loads configuration from `CLAIMS_*` environment variables
    ///
    /// * `CLAIMS_MAX_COMMIT_ATTEMPTS` - commit attempts per submission (default: 3)
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_builder(config::Config::builder())
    }

    /// Loads configuration from a builder with the environment layered on top
    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, CoreError> {
        let config: Self = builder
            .add_source(Environment::with_prefix("CLAIMS").try_parsing(true))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| CoreError::configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_max_commit_attempts(mut self, attempts: u32) -> Self {
        self.max_commit_attempts = attempts;
        self
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.max_commit_attempts == 0 {
            return Err(CoreError::configuration(
                "max_commit_attempts must be at least 1",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClaimsConfig::default();
        assert_eq!(config.max_commit_attempts, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_override() {
        let builder = config::Config::builder()
            .set_override("max_commit_attempts", 7)
            .unwrap();
        let config = ClaimsConfig::from_builder(builder).unwrap();
        assert_eq!(config.max_commit_attempts, 7);
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let builder = config::Config::builder()
            .set_override("max_commit_attempts", 0)
            .unwrap();
        assert!(matches!(
            ClaimsConfig::from_builder(builder),
            Err(CoreError::Configuration(_))
        ));
    }
}
