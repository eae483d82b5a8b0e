use crate::errors::{DialectError, Result};
use crate::library::LibrarySource;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub libraries: LibraryConfig,
    pub bootstrap: BootstrapConfig,
    pub browser: BrowserConfig,
}

/// Where each selector library is fetched from when a page lacks it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    pub jquery: LibrarySource,
    pub sizzle: LibrarySource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    pub timeout_ms: u64,
    pub poll_interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub headless: bool,
    pub viewport: Viewport,
    pub user_agent: Option<String>,
    pub disable_images: bool,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Config {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.bootstrap.poll_interval_ms == 0 {
            return Err(DialectError::ConfigurationError(
                "bootstrap.poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.bootstrap.poll_interval_ms > self.bootstrap.timeout_ms {
            return Err(DialectError::ConfigurationError(format!(
                "bootstrap.poll_interval_ms ({}) exceeds bootstrap.timeout_ms ({})",
                self.bootstrap.poll_interval_ms, self.bootstrap.timeout_ms
            )));
        }
        Ok(())
    }
}

impl BootstrapConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            jquery: LibrarySource::Version("3.7.1".to_string()),
            sizzle: LibrarySource::Version("2.3.10".to_string()),
        }
    }
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            poll_interval_ms: 100,
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport: Viewport::default(),
            user_agent: None,
            disable_images: false,
            args: vec![],
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}
