use std::time::Duration;

use crate::{api::API_BASE, model::FieldSource};

pub const THEME_KEY: &str = "animefan-theme";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_base: String,
    /// Pause between a success toast and the page reload.
    pub reload_delay: Duration,
    pub toast_duration: Duration,
    pub theme_key: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: API_BASE.to_string(),
            reload_delay: Duration::from_millis(500),
            toast_duration: Duration::from_millis(3000),
            theme_key: THEME_KEY.to_string(),
        }
    }
}

impl Config {
    /// Defaults overridden by `animefan:*` page metadata.
    pub fn from_meta(meta: &impl FieldSource) -> Self {
        let mut config = Self::default();

        if let Some(base) = meta.field("animefan:api-base").filter(|v| !v.trim().is_empty()) {
            config.api_base = base.trim().trim_end_matches('/').to_string();
        }
        if let Some(delay) = millis(meta, "animefan:reload-delay-ms") {
            config.reload_delay = delay;
        }
        if let Some(duration) = millis(meta, "animefan:toast-duration-ms") {
            config.toast_duration = duration;
        }

        config
    }
}

fn millis(meta: &impl FieldSource, name: &str) -> Option<Duration> {
    let raw = meta.field(name)?;
    match raw.trim().parse::<u64>() {
        Ok(ms) => Some(Duration::from_millis(ms)),
        Err(e) => {
            warn!("ignoring {}={:?}: {}", name, raw, e);
            None
        }
    }
}
