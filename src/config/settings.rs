//! Application configuration settings
//!
//! Defines all configuration structures and loading logic

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Server configuration
    pub server: ServerConfig,
    /// OpenAI API configuration
    pub openai: OpenAIConfig,
    /// Token pricing configuration
    pub pricing: PricingConfig,
    /// Security configuration
    pub security: SecurityConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen host
    pub host: String,
    /// Listen port
    pub port: u16,
}

/// OpenAI API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIConfig {
    /// API key
    pub api_key: String,
    /// API base URL
    pub base_url: String,
    /// Primary model, attempted first for every request
    pub default_model: String,
    /// Fallback model, used only when the primary call fails
    pub fallback_model: String,
    /// Request timeout in seconds
    pub timeout: u64,
    /// Streaming request timeout in seconds
    pub stream_timeout: u64,
}

/// Token pricing configuration
///
/// Rates are USD per 1000 tokens; the cost estimate derived from them is
/// informational, not authoritative billing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Prompt token rate per 1000 tokens
    pub prompt_cost_per_1k: f64,
    /// Completion token rate per 1000 tokens
    pub completion_cost_per_1k: f64,
}

/// Security configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Allowed origin for CORS
    pub allowed_origin: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    /// Log format (text/json)
    pub format: String,
}

impl Settings {
    /// Create a new configuration instance from the environment
    pub fn new() -> Result<Self> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        let settings = Self {
            server: ServerConfig {
                host: get_env_or_default("BACKEND_HOST", "0.0.0.0"),
                port: get_env_or_default("BACKEND_PORT", "8000")
                    .parse()
                    .context("Invalid port number")?,
            },
            openai: OpenAIConfig {
                api_key: std::env::var("OPENAI_API_KEY")
                    .context("OPENAI_API_KEY environment variable not set")?,
                base_url: get_env_or_default("OPENAI_BASE_URL", "https://api.openai.com/v1"),
                default_model: get_env_or_default("OPENAI_DEFAULT_MODEL", "gpt-4.1-mini"),
                fallback_model: get_env_or_default("OPENAI_FALLBACK_MODEL", "gpt-4o-mini"),
                timeout: get_env_or_default("REQUEST_TIMEOUT", "30")
                    .parse()
                    .context("Invalid timeout value")?,
                stream_timeout: get_env_or_default("STREAM_TIMEOUT", "300")
                    .parse()
                    .context("Invalid stream timeout value")?,
            },
            pricing: PricingConfig {
                prompt_cost_per_1k: get_env_or_default("OPENAI_PROMPT_COST_PER_1K", "0.15")
                    .parse()
                    .context("Invalid prompt cost")?,
                completion_cost_per_1k: get_env_or_default("OPENAI_COMPLETION_COST_PER_1K", "0.60")
                    .parse()
                    .context("Invalid completion cost")?,
            },
            security: SecurityConfig {
                allowed_origin: get_env_or_default("FRONTEND_ORIGIN", "http://localhost:5173"),
            },
            logging: LoggingConfig {
                level: get_env_or_default("RUST_LOG", "info"),
                format: get_env_or_default("LOG_FORMAT", "text"),
            },
        };

        // Validate configuration
        settings.validate()?;

        Ok(settings)
    }

    /// Validate configuration validity
    pub fn validate(&self) -> Result<()> {
        // Validate port range
        if self.server.port == 0 {
            anyhow::bail!("Port number cannot be 0");
        }

        // Validate API key format - accept various formats for different providers
        if self.openai.api_key.is_empty() {
            anyhow::bail!("OpenAI API key cannot be empty");
        }

        if self.openai.api_key.contains(char::is_whitespace) {
            anyhow::bail!("OpenAI API key cannot contain whitespace characters");
        }

        // Validate URL format
        if !self.openai.base_url.starts_with("http") {
            anyhow::bail!("Invalid OpenAI base URL format, should start with 'http'");
        }

        // Validate model names
        if self.openai.default_model.is_empty() || self.openai.fallback_model.is_empty() {
            anyhow::bail!("Model names cannot be empty");
        }

        // Validate timeout values
        if self.openai.timeout == 0 || self.openai.stream_timeout == 0 {
            anyhow::bail!("Timeout values cannot be 0");
        }

        // Validate pricing rates
        if self.pricing.prompt_cost_per_1k < 0.0 || self.pricing.completion_cost_per_1k < 0.0 {
            anyhow::bail!("Token rates cannot be negative");
        }

        // Validate CORS origin
        if self.security.allowed_origin.is_empty() {
            anyhow::bail!("Allowed CORS origin cannot be empty");
        }

        // Validate log level
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            anyhow::bail!("Invalid log level: {}", self.logging.level);
        }

        // Validate log format
        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            anyhow::bail!("Invalid log format: {}", self.logging.format);
        }

        Ok(())
    }
}

/// Get environment variable or default value
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_settings() -> Settings {
        Settings {
            server: ServerConfig {
                host: "localhost".to_string(),
                port: 8000,
            },
            openai: OpenAIConfig {
                api_key: "sk-test-key".to_string(),
                base_url: "https://api.openai.com/v1".to_string(),
                default_model: "gpt-4.1-mini".to_string(),
                fallback_model: "gpt-4o-mini".to_string(),
                timeout: 30,
                stream_timeout: 300,
            },
            pricing: PricingConfig {
                prompt_cost_per_1k: 0.15,
                completion_cost_per_1k: 0.60,
            },
            security: SecurityConfig {
                allowed_origin: "http://localhost:5173".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "text".to_string(),
            },
        }
    }

    #[test]
    fn test_valid_settings_pass_validation() {
        assert!(valid_settings().validate().is_ok());
    }

    #[test]
    fn test_empty_api_key_rejected() {
        let mut settings = valid_settings();
        settings.openai.api_key = String::new();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_whitespace_api_key_rejected() {
        let mut settings = valid_settings();
        settings.openai.api_key = "sk test".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_zero_port_rejected() {
        let mut settings = valid_settings();
        settings.server.port = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_negative_rate_rejected() {
        let mut settings = valid_settings();
        settings.pricing.prompt_cost_per_1k = -0.01;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_bad_base_url_rejected() {
        let mut settings = valid_settings();
        settings.openai.base_url = "ftp://example.com".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_bad_log_level_rejected() {
        let mut settings = valid_settings();
        settings.logging.level = "verbose".to_string();
        assert!(settings.validate().is_err());
    }
}
