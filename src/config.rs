//! Engine configuration loaded from TOML
//!
//! Every field is optional; anything left out keeps its default.
//!
//! ```toml
//! [layout]
//! margin = 32.0
//!
//! [layout.subtitle]
//! gap = 12.0
//!
//! [host]
//! disabled = ["add-chart", "fetch-image"]
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::host::{Capabilities, Capability};
use crate::layout::LayoutConfig;

/// Complete configuration of a [`PlanApplier`](crate::PlanApplier)
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub layout: LayoutConfig,
    pub host: HostConfig,
}

/// Host capabilities the engine must not use, even if the host offers them
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub disabled: Vec<Capability>,
}

impl HostConfig {
    /// Remove the disabled capabilities from what the host offers
    pub fn restrict(&self, offered: Capabilities) -> Capabilities {
        self.disabled.iter().fold(offered, |caps, cap| caps.without(*cap))
    }
}

impl EngineConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Set the layout configuration
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// Set the host restrictions
    pub fn with_host(mut self, host: HostConfig) -> Self {
        self.host = host;
        self
    }

    /// Never use `capability`, whatever the host reports
    pub fn disable(mut self, capability: Capability) -> Self {
        if !self.host.disabled.contains(&capability) {
            self.host.disabled.push(capability);
        }
        self
    }
}
