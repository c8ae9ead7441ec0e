//! Process configuration.
//!
//! Values come from the environment (a `.env` file is honoured). The loaded
//! [`AppConfig`] is split into the narrower settings structs each component takes,
//! so nothing below `main` reads ambient state.

use serde::Serialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;
use validator::{Validate, ValidationError};

use crate::error::AppError;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_MAX_TEXT_LENGTH: usize = 4000;
pub const DEFAULT_MIN_TEXT_LENGTH: usize = 10;
pub const DEFAULT_MAX_FILE_SIZE: usize = 10 * 1024 * 1024;
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 60;

/// Complete process configuration.
#[derive(Debug, Clone, Serialize, Validate)]
#[validate(schema(function = "validate_text_bounds"))]
pub struct AppConfig {
    #[serde(skip_serializing)]
    #[validate(length(min = 1))]
    pub openai_api_key: String,
    #[validate(url)]
    pub openai_base_url: String,
    #[validate(length(min = 1))]
    pub openai_model: String,
    /// Characters of email text sent to the model.
    #[validate(range(min = 1))]
    pub max_text_length: usize,
    /// Below this many characters the request is answered by failover.
    pub min_text_length: usize,
    /// Upload limit in bytes.
    #[validate(range(min = 1))]
    pub max_file_size: usize,
    #[validate(range(min = 1, max = 600))]
    pub llm_timeout_secs: u64,
}

fn validate_text_bounds(config: &AppConfig) -> Result<(), ValidationError> {
    if config.min_text_length >= config.max_text_length {
        return Err(ValidationError::new("min_text_length_not_below_max"));
    }
    Ok(())
}

/// Settings consumed by the classification orchestrator.
#[derive(Debug, Clone)]
pub struct ClassifierSettings {
    pub max_text_length: usize,
    pub temperature: f32,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            max_text_length: DEFAULT_MAX_TEXT_LENGTH,
            temperature: 0.0,
        }
    }
}

/// Settings consumed by the supervisor when accepting a request.
#[derive(Debug, Clone)]
pub struct IntakeSettings {
    pub min_text_length: usize,
    pub max_file_size: usize,
}

impl Default for IntakeSettings {
    fn default() -> Self {
        Self {
            min_text_length: DEFAULT_MIN_TEXT_LENGTH,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

/// Settings consumed by the OpenAI actor.
#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl AppConfig {
    /// Loads `.env` (if any) and then reads the configuration from the environment.
    pub fn load() -> Result<Self, AppError> {
        dotenv::dotenv().ok();
        Self::from_env()
    }

    /// Reads and validates the configuration from the current environment.
    pub fn from_env() -> Result<Self, AppError> {
        let openai_api_key = env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                AppError::Config(
                    "OPENAI_API_KEY ausente. Crie um arquivo .env com sua chave da OpenAI"
                        .to_string(),
                )
            })?;

        let config = Self {
            openai_api_key,
            openai_base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            max_text_length: parse_var("MAX_TEXT_LENGTH", DEFAULT_MAX_TEXT_LENGTH)?,
            min_text_length: parse_var("MIN_TEXT_LENGTH", DEFAULT_MIN_TEXT_LENGTH)?,
            max_file_size: parse_var("MAX_FILE_SIZE", DEFAULT_MAX_FILE_SIZE)?,
            llm_timeout_secs: parse_var("LLM_TIMEOUT_SECS", DEFAULT_LLM_TIMEOUT_SECS)?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn log_summary(&self) {
        info!("Configurações carregadas:");
        info!("   - OPENAI_MODEL: {}", self.openai_model);
        info!("   - OPENAI_BASE_URL: {}", self.openai_base_url);
        info!("   - MAX_FILE_SIZE: {}MB", self.max_file_size / (1024 * 1024));
        info!("   - MAX_TEXT_LENGTH: {} chars", self.max_text_length);
        info!("   - MIN_TEXT_LENGTH: {} chars", self.min_text_length);
    }

    pub fn classifier_settings(&self) -> ClassifierSettings {
        ClassifierSettings {
            max_text_length: self.max_text_length,
            ..ClassifierSettings::default()
        }
    }

    pub fn intake_settings(&self) -> IntakeSettings {
        IntakeSettings {
            min_text_length: self.min_text_length,
            max_file_size: self.max_file_size,
        }
    }

    pub fn llm_settings(&self) -> LlmSettings {
        LlmSettings {
            api_key: self.openai_api_key.clone(),
            base_url: self.openai_base_url.clone(),
            model: self.openai_model.clone(),
            timeout: Duration::from_secs(self.llm_timeout_secs),
        }
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{} inválido ({}): {}", name, raw, e))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_VARS: [&str; 7] = [
        "OPENAI_API_KEY",
        "OPENAI_BASE_URL",
        "OPENAI_MODEL",
        "MAX_TEXT_LENGTH",
        "MIN_TEXT_LENGTH",
        "MAX_FILE_SIZE",
        "LLM_TIMEOUT_SECS",
    ];

    fn with_env<F: FnOnce()>(vars: &[(&str, &str)], f: F) {
        let mut scoped: Vec<(&str, Option<&str>)> =
            ALL_VARS.iter().map(|name| (*name, None)).collect();
        for (name, value) in vars {
            if let Some(slot) = scoped.iter_mut().find(|(n, _)| n == name) {
                slot.1 = Some(*value);
            }
        }
        temp_env::with_vars(scoped, f);
    }

    #[test]
    fn test_defaults_applied() {
        with_env(&[("OPENAI_API_KEY", "sk-test")], || {
            let config = AppConfig::from_env().unwrap();
            assert_eq!(config.openai_base_url, DEFAULT_BASE_URL);
            assert_eq!(config.openai_model, DEFAULT_MODEL);
            assert_eq!(config.max_text_length, 4000);
            assert_eq!(config.min_text_length, 10);
            assert_eq!(config.max_file_size, 10 * 1024 * 1024);
            assert_eq!(config.llm_timeout_secs, 60);
        });
    }

    #[test]
    fn test_missing_api_key() {
        with_env(&[], || {
            let err = AppConfig::from_env().unwrap_err();
            assert!(matches!(err, AppError::Config(ref msg) if msg.contains("OPENAI_API_KEY")));
        });
    }

    #[test]
    fn test_blank_api_key_rejected() {
        with_env(&[("OPENAI_API_KEY", "   ")], || {
            assert!(AppConfig::from_env().is_err());
        });
    }

    #[test]
    fn test_overrides_parsed() {
        with_env(
            &[
                ("OPENAI_API_KEY", "sk-test"),
                ("OPENAI_MODEL", "gpt-4o-mini"),
                ("MAX_TEXT_LENGTH", "2000"),
                ("MIN_TEXT_LENGTH", "5"),
                ("LLM_TIMEOUT_SECS", "15"),
            ],
            || {
                let config = AppConfig::from_env().unwrap();
                assert_eq!(config.openai_model, "gpt-4o-mini");
                assert_eq!(config.classifier_settings().max_text_length, 2000);
                assert_eq!(config.intake_settings().min_text_length, 5);
                assert_eq!(config.llm_settings().timeout, Duration::from_secs(15));
            },
        );
    }

    #[test]
    fn test_non_numeric_length_rejected() {
        with_env(
            &[("OPENAI_API_KEY", "sk-test"), ("MAX_TEXT_LENGTH", "lots")],
            || {
                let err = AppConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("MAX_TEXT_LENGTH"));
            },
        );
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        with_env(
            &[("OPENAI_API_KEY", "sk-test"), ("OPENAI_BASE_URL", "not a url")],
            || {
                assert!(AppConfig::from_env().is_err());
            },
        );
    }

    #[test]
    fn test_min_must_be_below_max() {
        with_env(
            &[
                ("OPENAI_API_KEY", "sk-test"),
                ("MAX_TEXT_LENGTH", "10"),
                ("MIN_TEXT_LENGTH", "10"),
            ],
            || {
                assert!(AppConfig::from_env().is_err());
            },
        );
    }

    #[test]
    fn test_api_key_not_serialized() {
        with_env(&[("OPENAI_API_KEY", "sk-secret")], || {
            let config = AppConfig::from_env().unwrap();
            let json = serde_json::to_string(&config).unwrap();
            assert!(!json.contains("sk-secret"));
        });
    }
}
