use std::time::Duration;

use anyhow::{anyhow, Result};
use common::{Config, ConfigLoader};
use host::{DisplayPolicy, DEFAULT_POLL_INTERVAL};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WidgetOptions {
    pub poll_interval: Duration,
    pub display_policy: DisplayPolicy,
    pub session_game: bool,
    pub waiting_message: Option<String>,
}

impl Default for WidgetOptions {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            display_policy: DisplayPolicy::default(),
            session_game: true,
            waiting_message: None,
        }
    }
}

impl Config for WidgetOptions {
    fn load(config: &ConfigLoader) -> Result<Self> {
        let defaults = Self::default();

        let poll_interval = match config.get("poll_interval_ms") {
            Some(value) => value
                .as_u64()
                .map(Duration::from_millis)
                .ok_or_else(|| anyhow!("poll_interval_ms must be a non-negative integer"))?,
            None => defaults.poll_interval,
        };

        let display_policy = match config.get("display_policy") {
            Some(value) => value
                .as_string()
                .ok_or_else(|| anyhow!("display_policy must be a string"))?
                .parse::<DisplayPolicy>()?,
            None => defaults.display_policy,
        };

        let session_game = match config.get("session_game") {
            Some(value) => value
                .as_bool()
                .ok_or_else(|| anyhow!("session_game must be a boolean"))?,
            None => defaults.session_game,
        };

        let waiting_message = config
            .get("waiting_message")
            .and_then(|value| value.as_string())
            .filter(|message| !message.is_empty());

        Ok(Self {
            poll_interval,
            display_policy,
            session_game,
            waiting_message,
        })
    }
}
