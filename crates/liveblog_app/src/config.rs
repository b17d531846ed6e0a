use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use feed_logging::LogSettings;
use liveblog_core::{BlogInfo, WidgetSettings};
use serde::Deserialize;

/// Contents of the RON file passed on the command line.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub settings: WidgetSettings,
    /// JSON document of the form `{"_items": [...]}`.
    pub feed_file: PathBuf,
    /// Polled for the open/closed status; `blog` is reported as-is when absent.
    pub blog_url: Option<String>,
    pub blog: BlogInfo,
    pub log: LogSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            settings: WidgetSettings::default(),
            feed_file: PathBuf::from("feed.json"),
            blog_url: None,
            blog: BlogInfo::default(),
            log: LogSettings::default(),
        }
    }
}

impl AppConfig {
    /// Read and parse the config. A relative `feed_file` is resolved against
    /// the config file's directory.
    pub(crate) fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let mut config: AppConfig = ron::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;

        if config.feed_file.is_relative() {
            if let Some(dir) = path.parent() {
                config.feed_file = dir.join(&config.feed_file);
            }
        }
        Ok(config)
    }
}
