//! Configuration management module
//!
//! Responsible for loading and validating the environment-sourced settings

pub mod settings;

pub use settings::{LoggingConfig, OpenAIConfig, PricingConfig, SecurityConfig, ServerConfig, Settings};
