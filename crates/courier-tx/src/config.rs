//! Process configuration loading.

use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

/// Environment variable holding the signing credential.
pub const PRIVATE_KEY_ENV_VAR: &str = "PRIVATE_KEY";

/// Optional environment variable overriding the action batch file location.
pub const BATCH_PATH_ENV_VAR: &str = "COURIER_ACTIONS_PATH";

/// Configuration errors detected before any I/O is attempted.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum ConfigError {
    /// Signing credential is absent or blank.
    #[error("PRIVATE_KEY is not defined in the .env file")]
    MissingCredential,
}

/// Typed process configuration, read once at startup.
#[derive(Debug)]
pub struct Config {
    /// Signing credential. Never logged, never persisted.
    credential: SecretString,
    /// Optional batch file override.
    batch_path_override: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingCredential`] when the credential
    /// variable is unset or blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through an injected variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingCredential`] when the credential
    /// variable is unset or blank.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let credential = lookup(PRIVATE_KEY_ENV_VAR)
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::MissingCredential)?;
        let batch_path_override = lookup(BATCH_PATH_ENV_VAR)
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);
        Ok(Self {
            credential: SecretString::from(credential),
            batch_path_override,
        })
    }

    /// Returns the signing credential.
    #[must_use]
    pub fn credential(&self) -> &SecretString {
        &self.credential
    }

    /// Returns the batch file override when one is configured.
    #[must_use]
    pub fn batch_path_override(&self) -> Option<&PathBuf> {
        self.batch_path_override.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn missing_credential_fails_fast() {
        let result = Config::from_lookup(|_| None);
        assert!(matches!(result, Err(ConfigError::MissingCredential)));
    }

    #[test]
    fn blank_credential_is_treated_as_missing() {
        let result = Config::from_lookup(|name| {
            (name == PRIVATE_KEY_ENV_VAR).then(|| "   ".to_owned())
        });
        assert!(matches!(result, Err(ConfigError::MissingCredential)));
    }

    #[test]
    fn missing_credential_names_the_env_file() {
        assert_eq!(
            ConfigError::MissingCredential.to_string(),
            "PRIVATE_KEY is not defined in the .env file"
        );
    }

    #[test]
    fn credential_is_loaded_verbatim() {
        let result = Config::from_lookup(|name| {
            (name == PRIVATE_KEY_ENV_VAR).then(|| "credential-material".to_owned())
        });
        assert!(result.is_ok());
        if let Ok(config) = result {
            assert_eq!(config.credential().expose_secret(), "credential-material");
            assert_eq!(config.batch_path_override(), None);
        }
    }

    #[test]
    fn batch_path_override_is_optional() {
        let result = Config::from_lookup(|name| match name {
            PRIVATE_KEY_ENV_VAR => Some("credential-material".to_owned()),
            BATCH_PATH_ENV_VAR => Some("/srv/courier/actions.json".to_owned()),
            _ => None,
        });
        assert!(result.is_ok());
        if let Ok(config) = result {
            assert_eq!(
                config.batch_path_override(),
                Some(&PathBuf::from("/srv/courier/actions.json"))
            );
        }
    }

    #[test]
    fn debug_output_redacts_the_credential() {
        let result = Config::from_lookup(|name| {
            (name == PRIVATE_KEY_ENV_VAR).then(|| "credential-material".to_owned())
        });
        assert!(result.is_ok());
        if let Ok(config) = result {
            let rendered = format!("{config:?}");
            assert!(!rendered.contains("credential-material"));
        }
    }
}
