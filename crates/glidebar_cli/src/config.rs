//! Scenario file handling

use anyhow::{Context, Result};
use glidebar::{
    Axis, Environment, FrameSource, Geometry, GlobalSettings, Margin, Rect, ScrollDestination,
    SettingsOverrides,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A headless run: one container, its settings and a timed list of steps
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    #[serde(default)]
    pub runtime: GlobalSettings,
    #[serde(default)]
    pub environment: EnvironmentConfig,
    pub container: Geometry,
    #[serde(default)]
    pub settings: SettingsOverrides,
    #[serde(default)]
    pub elements: Vec<ElementConfig>,
    #[serde(default)]
    pub steps: Vec<Step>,
    /// Time simulated after the last step (ms)
    #[serde(default = "default_settle")]
    pub settle: f64,
    /// Time between two frames (ms)
    #[serde(default = "default_frame_interval")]
    pub frame_interval: f64,
}

fn default_settle() -> f64 {
    1000.0
}

fn default_frame_interval() -> f64 {
    16.0
}

fn default_true() -> bool {
    true
}

/// Host capabilities
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentConfig {
    #[serde(default)]
    pub touch: bool,
    #[serde(default)]
    pub native_scrollbar_size: f64,
    #[serde(default = "default_true")]
    pub can_hide_native_scrollbars: bool,
    #[serde(default)]
    pub frame_source: FrameSourceConfig,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            touch: false,
            native_scrollbar_size: 0.0,
            can_hide_native_scrollbars: true,
            frame_source: FrameSourceConfig::default(),
        }
    }
}

impl EnvironmentConfig {
    pub fn to_environment(&self) -> Environment {
        Environment {
            touch: self.touch,
            native_scrollbar_size: self.native_scrollbar_size,
            can_hide_native_scrollbars: self.can_hide_native_scrollbars,
            frame_source: match self.frame_source {
                FrameSourceConfig::AnimationFrame => FrameSource::AnimationFrame,
                FrameSourceConfig::Timer => FrameSource::Timer,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrameSourceConfig {
    #[default]
    AnimationFrame,
    Timer,
}

/// Element reachable by `scroll-into-view`, in content coordinates
#[derive(Debug, Deserialize, Serialize)]
pub struct ElementConfig {
    pub selector: String,
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ElementConfig {
    pub fn rect(&self) -> Rect {
        Rect::new(self.left, self.top, self.width, self.height)
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Step {
    /// Milliseconds since the start of the run
    pub at: f64,
    #[serde(flatten)]
    pub action: Action,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Action {
    /// User scroll: move the offset and deliver a `scroll` event
    Scroll { axis: Axis, offset: f64 },
    /// Content or container resized
    Resize { container: Geometry },
    /// Overflow notification from the host
    Overflow,
    ScrollTo {
        #[serde(default)]
        x: Destination,
        #[serde(default)]
        y: Destination,
        /// Milliseconds; derived from the distance when left out
        #[serde(default)]
        duration: Option<f64>,
        #[serde(default)]
        suppress: bool,
    },
    ScrollIntoView {
        selector: String,
        #[serde(default)]
        duration: Option<f64>,
        #[serde(default)]
        margin: Margin,
    },
    Wheel,
    TouchStart,
    TouchEnd,
    /// Drag a track from one pointer coordinate to another
    Drag { axis: Axis, from: f64, to: f64 },
    Configure { settings: SettingsOverrides },
    Update,
    Destroy,
}

/// Scroll destination as written in a scenario: a keyword or an offset
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Destination {
    Offset(f64),
    Keyword(String),
}

impl Default for Destination {
    fn default() -> Self {
        Destination::Keyword("keep".to_string())
    }
}

impl Destination {
    pub fn resolve(&self) -> Result<ScrollDestination> {
        match self {
            Destination::Offset(offset) => Ok(ScrollDestination::Offset(*offset)),
            Destination::Keyword(keyword) => Ok(keyword.parse()?),
        }
    }
}

impl Scenario {
    /// Load a scenario from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("No scenario found at {}", path.display());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let scenario: Scenario = toml::from_str(content)?;
        scenario
            .validate()
            .context("Invalid scenario settings")?;
        Ok(scenario)
    }

    fn validate(&self) -> Result<()> {
        glidebar::Settings::default().merged(&self.settings).validate()?;
        if !(self.frame_interval > 0.0 && self.frame_interval <= MAX_SCENARIO_MS) {
            anyhow::bail!("frameInterval must be positive, got {}", self.frame_interval);
        }
        check_time("settle", self.settle)?;
        for step in &self.steps {
            check_time("at", step.at)?;
            let duration = match &step.action {
                Action::ScrollTo { duration, .. } | Action::ScrollIntoView { duration, .. } => {
                    *duration
                }
                _ => None,
            };
            if let Some(duration) = duration {
                check_time("duration", duration)?;
            }
        }
        Ok(())
    }
}

/// Longest time a scenario may reference (one day)
const MAX_SCENARIO_MS: f64 = 86_400_000.0;

fn check_time(name: &str, ms: f64) -> Result<()> {
    if !(0.0..=MAX_SCENARIO_MS).contains(&ms) {
        anyhow::bail!("{name} must be between 0 and {MAX_SCENARIO_MS}ms, got {ms}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scenario() {
        let scenario = Scenario::from_toml_str(
            r##"
            [environment]
            nativeScrollbarSize = 17
            frameSource = "timer"

            [container]
            scrollHeight = 1000
            clientHeight = 400
            scrollWidth = 300
            clientWidth = 300

            [settings]
            preventParentScroll = true
            scrollStopDelay = 150

            [[elements]]
            selector = "#row"
            top = 700
            width = 100
            height = 50

            [[steps]]
            at = 0
            action = "scroll"
            axis = "vertical"
            offset = 600

            [[steps]]
            at = 400
            action = "scroll-to"
            y = "top"
            duration = 0
            suppress = true
            "##,
        )
        .unwrap();

        let env = scenario.environment.to_environment();
        assert_eq!(env.native_scrollbar_size, 17.0);
        assert_eq!(env.frame_source, FrameSource::Timer);
        assert_eq!(scenario.settings.prevent_parent_scroll, Some(true));
        assert_eq!(scenario.elements[0].rect(), Rect::new(0.0, 700.0, 100.0, 50.0));
        assert_eq!(scenario.steps.len(), 2);

        match &scenario.steps[1].action {
            Action::ScrollTo { x, y, suppress, .. } => {
                assert_eq!(x.resolve().unwrap(), ScrollDestination::Keep);
                assert_eq!(y.resolve().unwrap(), ScrollDestination::Start);
                assert!(*suppress);
            }
            other => panic!("unexpected action {other:?}"),
        }
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let result = Scenario::from_toml_str(
            r#"
            [container]
            scrollHeight = 1000
            clientHeight = 400
            scrollWidth = 300
            clientWidth = 300

            [settings]
            minTrackSize = 80
            maxTrackSize = 20
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_unbounded_times_rejected() {
        let base = r#"
            [container]
            scrollHeight = 1000
            clientHeight = 400
            scrollWidth = 300
            clientWidth = 300
            "#;
        let with = |extra: &str| Scenario::from_toml_str(&format!("{extra}\n{base}"));

        assert!(with("settle = inf").is_err());
        assert!(with("settle = -1").is_err());
        assert!(with("frameInterval = nan").is_err());
        assert!(with("frameInterval = 0").is_err());
        assert!(with("runtime = { checkFrequency = inf }").is_err());

        let step = |fields: &str| {
            Scenario::from_toml_str(&format!("{base}\n[[steps]]\n{fields}\n"))
        };
        assert!(step("at = 1e300\naction = \"update\"").is_err());
        assert!(step("at = 0\naction = \"scroll-to\"\ny = \"end\"\nduration = inf").is_err());
        assert!(step("at = 0\naction = \"scroll-to\"\ny = \"end\"\nduration = 200").is_ok());
    }
}
