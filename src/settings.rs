use crate::errors::AppResult;
use crate::models::DisplayConfiguration;
use crate::provider::{MetricsProvider, PreviewMetricsProvider, SampleMetricsProvider};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderKind {
    #[default]
    Sample,
    Preview,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostSettings {
    pub display_mode: Option<String>,
    pub color_theme: Option<String>,
    pub fetch_timeout_ms: u64,
    pub refresh_cycles: u32,
    pub provider: ProviderKind,
    pub preview_seed: Option<u64>,
    pub log_dir: Option<PathBuf>,
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            display_mode: None,
            color_theme: None,
            fetch_timeout_ms: 2_000,
            refresh_cycles: 0,
            provider: ProviderKind::Sample,
            preview_seed: None,
            log_dir: None,
        }
    }
}

impl HostSettings {
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path)?;
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(&raw)?)
    }

    pub fn display_configuration(&self) -> DisplayConfiguration {
        DisplayConfiguration::resolve(self.display_mode.as_deref(), self.color_theme.as_deref())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms.max(1))
    }

    pub fn build_provider(&self) -> Arc<dyn MetricsProvider> {
        match self.provider {
            ProviderKind::Sample => Arc::new(SampleMetricsProvider::new()),
            ProviderKind::Preview => Arc::new(PreviewMetricsProvider::new(self.preview_seed)),
        }
    }
}
