//! Error types for plan application and configuration loading

use thiserror::Error;

/// Fatal errors: the whole apply call is aborted and nothing is mutated
#[derive(Error, Debug)]
pub enum ApplyError {
    #[error("malformed execution plan: {0}")]
    MalformedPlan(#[source] serde_json::Error),

    #[error("malformed slide context: {0}")]
    MalformedContext(#[source] serde_json::Error),

    #[error("plan must contain between 1 and {max} operations (got {count})")]
    OperationCount { count: usize, max: usize },

    #[error("no slide found to apply the plan")]
    NoSlide,
}

/// Errors that can occur when loading engine configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}
