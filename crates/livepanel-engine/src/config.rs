//! Engine configuration

use std::time::Duration;

/// Default poll cadence in milliseconds
pub const DEFAULT_POLL_MS: u64 = 500;

/// Default preview mode when none is configured
pub const DEFAULT_MODE: &str = "desktop";

/// Configuration for a panel engine
#[derive(Debug, Clone)]
pub struct PanelConfig {
    /// Poll cadence for the automatic update loop
    pub poll_interval: Duration,
    /// Override the markup's auto-update flag (None = follow the markup)
    pub auto_update: Option<bool>,
    /// Preview mode the panel starts in
    pub initial_mode: String,
    /// Control channel capacity
    pub channel_capacity: usize,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(DEFAULT_POLL_MS),
            auto_update: None,
            initial_mode: DEFAULT_MODE.to_string(),
            channel_capacity: 32,
        }
    }
}

impl PanelConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set poll cadence in milliseconds
    pub fn with_poll_ms(mut self, ms: u64) -> Self {
        self.poll_interval = Duration::from_millis(ms);
        self
    }

    /// Force automatic updates on or off regardless of the markup flag
    pub fn with_auto_update(mut self, enabled: bool) -> Self {
        self.auto_update = Some(enabled);
        self
    }

    /// Set the initial preview mode
    pub fn with_initial_mode(mut self, mode: impl Into<String>) -> Self {
        self.initial_mode = mode.into();
        self
    }
}
