//! Instance and global settings
//!
//! `Settings` is fixed once an instance is created; the only way to change
//! it is [`Settings::merged`], which builds a new value from explicitly
//! supplied overrides. Field names serialize in camelCase so option files
//! written for the browser plugin load unchanged.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors produced while loading or validating settings
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid TOML settings: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid JSON settings: {0}")]
    Json(#[from] serde_json::Error),

    #[error("track size {name} = {value} is outside 0..=100")]
    TrackSizeOutOfRange { name: &'static str, value: f64 },

    #[error("minTrackSize ({min}) is larger than maxTrackSize ({max})")]
    TrackSizeInverted { min: f64, max: f64 },
}

/// Per-instance settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Keep scroll gestures from chaining to the parent page
    #[serde(default)]
    pub prevent_parent_scroll: bool,
    /// Render custom scrollbars even where native ones are overlay-style
    #[serde(default)]
    pub force_scrollbars: bool,
    /// Quiet time after the last scroll event before `scrollstop` fires
    #[serde(default = "default_scroll_stop_delay", with = "duration_ms")]
    pub scroll_stop_delay: Duration,
    /// Largest track size, percent of the trough
    #[serde(default = "default_max_track_size")]
    pub max_track_size: f64,
    /// Smallest track size, percent of the trough
    #[serde(default = "default_min_track_size")]
    pub min_track_size: f64,
    /// Allow dragging the tracks to scroll
    #[serde(default = "default_true")]
    pub draggable_tracks: bool,
    /// Register with the runtime poll loop
    #[serde(default = "default_true")]
    pub auto_update: bool,
    /// Prefix of the class names the host generates
    #[serde(default = "default_class_prefix")]
    pub class_prefix: String,
}

fn default_scroll_stop_delay() -> Duration {
    Duration::from_millis(300)
}

fn default_max_track_size() -> f64 {
    95.0
}

fn default_min_track_size() -> f64 {
    5.0
}

fn default_true() -> bool {
    true
}

fn default_class_prefix() -> String {
    "glidebar".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            prevent_parent_scroll: false,
            force_scrollbars: false,
            scroll_stop_delay: default_scroll_stop_delay(),
            max_track_size: default_max_track_size(),
            min_track_size: default_min_track_size(),
            draggable_tracks: true,
            auto_update: true,
            class_prefix: default_class_prefix(),
        }
    }
}

impl Settings {
    /// Parse settings from TOML, filling missing fields with defaults
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(source)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings from a JSON options object
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(source)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Build a new value with every supplied override applied
    pub fn merged(&self, overrides: &SettingsOverrides) -> Self {
        Self {
            prevent_parent_scroll: overrides
                .prevent_parent_scroll
                .unwrap_or(self.prevent_parent_scroll),
            force_scrollbars: overrides.force_scrollbars.unwrap_or(self.force_scrollbars),
            scroll_stop_delay: overrides.scroll_stop_delay.unwrap_or(self.scroll_stop_delay),
            max_track_size: overrides.max_track_size.unwrap_or(self.max_track_size),
            min_track_size: overrides.min_track_size.unwrap_or(self.min_track_size),
            draggable_tracks: overrides.draggable_tracks.unwrap_or(self.draggable_tracks),
            auto_update: overrides.auto_update.unwrap_or(self.auto_update),
            class_prefix: overrides
                .class_prefix
                .clone()
                .unwrap_or_else(|| self.class_prefix.clone()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("minTrackSize", self.min_track_size),
            ("maxTrackSize", self.max_track_size),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(ConfigError::TrackSizeOutOfRange { name, value });
            }
        }
        if self.min_track_size > self.max_track_size {
            return Err(ConfigError::TrackSizeInverted {
                min: self.min_track_size,
                max: self.max_track_size,
            });
        }
        Ok(())
    }

    /// Track size bounds as ratios of the trough
    pub fn track_limits(&self) -> TrackLimits {
        TrackLimits {
            min: self.min_track_size / 100.0,
            max: self.max_track_size / 100.0,
        }
    }

    /// Class toggled on the container while parent scrolling is blocked
    pub fn nobounce_class(&self) -> String {
        format!("{}-nobounce", self.class_prefix)
    }
}

/// Explicitly supplied settings; `None` keeps the current value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsOverrides {
    #[serde(default)]
    pub prevent_parent_scroll: Option<bool>,
    #[serde(default)]
    pub force_scrollbars: Option<bool>,
    #[serde(default, with = "duration_ms::option")]
    pub scroll_stop_delay: Option<Duration>,
    #[serde(default)]
    pub max_track_size: Option<f64>,
    #[serde(default)]
    pub min_track_size: Option<f64>,
    #[serde(default)]
    pub draggable_tracks: Option<bool>,
    #[serde(default)]
    pub auto_update: Option<bool>,
    #[serde(default)]
    pub class_prefix: Option<String>,
}

impl SettingsOverrides {
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn prevent_parent_scroll(mut self, value: bool) -> Self {
        self.prevent_parent_scroll = Some(value);
        self
    }

    pub fn force_scrollbars(mut self, value: bool) -> Self {
        self.force_scrollbars = Some(value);
        self
    }

    pub fn scroll_stop_delay(mut self, value: Duration) -> Self {
        self.scroll_stop_delay = Some(value);
        self
    }

    pub fn track_sizes(mut self, min: f64, max: f64) -> Self {
        self.min_track_size = Some(min);
        self.max_track_size = Some(max);
        self
    }

    pub fn draggable_tracks(mut self, value: bool) -> Self {
        self.draggable_tracks = Some(value);
        self
    }

    pub fn auto_update(mut self, value: bool) -> Self {
        self.auto_update = Some(value);
        self
    }

    pub fn class_prefix(mut self, value: impl Into<String>) -> Self {
        self.class_prefix = Some(value.into());
        self
    }
}

/// Track size bounds, as ratios in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackLimits {
    pub min: f64,
    pub max: f64,
}

impl Default for TrackLimits {
    fn default() -> Self {
        Settings::default().track_limits()
    }
}

/// Settings shared by every instance of a runtime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalSettings {
    /// Minimum time between two processed scroll events (40 per second)
    #[serde(default = "default_scroll_min_update_interval", with = "duration_ms")]
    pub scroll_min_update_interval: Duration,
    /// Poll loop period; zero runs a single check and never re-arms
    #[serde(default = "default_check_frequency", with = "duration_ms")]
    pub check_frequency: Duration,
}

fn default_scroll_min_update_interval() -> Duration {
    Duration::from_millis(25)
}

fn default_check_frequency() -> Duration {
    Duration::from_millis(1000)
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            scroll_min_update_interval: default_scroll_min_update_interval(),
            check_frequency: default_check_frequency(),
        }
    }
}

/// Durations stored as (possibly fractional) milliseconds
mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64() * 1000.0)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        from_millis(f64::deserialize(deserializer)?)
    }

    /// Negative values clamp to zero; non-finite or overflowing ones are
    /// rejected
    fn from_millis<E: serde::de::Error>(millis: f64) -> Result<Duration, E> {
        if !millis.is_finite() {
            return Err(E::custom(format!("duration must be finite, got {millis}")));
        }
        Duration::try_from_secs_f64(millis.max(0.0) / 1000.0)
            .map_err(|_| E::custom(format!("duration of {millis}ms is out of range")))
    }

    pub mod option {
        use serde::{Deserialize, Deserializer, Serializer};
        use std::time::Duration;

        pub fn serialize<S: Serializer>(
            value: &Option<Duration>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(d) => serializer.serialize_some(&(d.as_secs_f64() * 1000.0)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Duration>, D::Error> {
            Option::<f64>::deserialize(deserializer)?
                .map(super::from_millis)
                .transpose()
        }
    }
}
