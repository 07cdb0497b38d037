//! Headless scenario replay
//!
//! Drives a runtime over a `FakeSurface` with a manual clock: frames at a
//! fixed interval, steps applied at their timestamps, every notification
//! written out as one JSON line.

use anyhow::Result;
use glidebar::testing::{manual_runtime, FakeSurface};
use glidebar::{
    Axis, InputEvent, InputKind, InstanceId, ListenTarget, ManualClock, Point, Runtime,
    ScrollDetail, ScrollTarget,
};
use serde::Serialize;
use std::io::Write;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::config::{Action, Scenario};

/// One output line
#[derive(Serialize)]
struct Line<'a> {
    /// Milliseconds since the start of the run
    t: f64,
    event: &'static str,
    detail: &'a ScrollDetail,
}

/// Scenario times are validated on load; anything else maps to zero
fn millis(ms: f64) -> Duration {
    Duration::try_from_secs_f64(ms.max(0.0) / 1000.0).unwrap_or_default()
}

struct Replay {
    runtime: Runtime<FakeSurface, ManualClock>,
    clock: ManualClock,
    surface: FakeSurface,
    id: InstanceId,
    start: Instant,
    touch: bool,
}

impl Replay {
    fn flush<W: Write>(&self, t: f64, out: &mut W) -> Result<usize> {
        let notifications = self.surface.take_notifications();
        for notification in &notifications {
            let line = Line {
                t,
                event: notification.name(),
                detail: &notification.detail,
            };
            writeln!(out, "{}", serde_json::to_string(&line)?)?;
        }
        Ok(notifications.len())
    }

    fn apply(&mut self, action: &Action) -> glidebar::Result<()> {
        let id = self.id;
        match action {
            Action::Scroll { axis, offset } => {
                self.surface.user_scroll(*axis, *offset);
                self.runtime.handle_input(
                    id,
                    ListenTarget::ScrollElement,
                    InputEvent::new(InputKind::Scroll),
                )?;
            }
            Action::Resize { container } => self.surface.set_geometry(*container),
            Action::Overflow => {
                self.runtime.handle_input(
                    id,
                    ListenTarget::ScrollElement,
                    InputEvent::new(InputKind::Overflow),
                )?;
            }
            Action::ScrollTo {
                x,
                y,
                duration,
                suppress,
            } => {
                let (x, y) = match (x.resolve(), y.resolve()) {
                    (Ok(x), Ok(y)) => (x, y),
                    (Err(err), _) | (_, Err(err)) => {
                        warn!(%err, "skipping scroll-to");
                        return Ok(());
                    }
                };
                self.runtime
                    .scroll_to(id, x, y, duration.map(millis), *suppress)?;
            }
            Action::ScrollIntoView {
                selector,
                duration,
                margin,
            } => {
                self.runtime.scroll_into_view(
                    id,
                    ScrollTarget::Selector(selector),
                    duration.map(millis),
                    *margin,
                )?;
            }
            Action::Wheel => {
                self.runtime.handle_input(
                    id,
                    ListenTarget::ScrollElement,
                    InputEvent::new(InputKind::Wheel),
                )?;
            }
            Action::TouchStart => {
                self.runtime.handle_input(
                    id,
                    ListenTarget::ScrollElement,
                    InputEvent::new(InputKind::TouchStart),
                )?;
            }
            Action::TouchEnd => {
                self.runtime.handle_input(
                    id,
                    ListenTarget::ScrollElement,
                    InputEvent::new(InputKind::TouchEnd),
                )?;
            }
            Action::Drag { axis, from, to } => self.drag(*axis, *from, *to)?,
            Action::Configure { settings } => self.runtime.configure(id, settings)?,
            Action::Update => {
                self.runtime.update(id)?;
            }
            Action::Destroy => self.runtime.destroy(id)?,
        }
        Ok(())
    }

    fn drag(&mut self, axis: Axis, from: f64, to: f64) -> glidebar::Result<()> {
        let (down, moved, up) = if self.touch {
            (InputKind::TouchStart, InputKind::TouchMove, InputKind::TouchEnd)
        } else {
            (InputKind::MouseDown, InputKind::MouseMove, InputKind::MouseUp)
        };
        let point = |coord: f64| match axis {
            Axis::Vertical => Point::new(0.0, coord),
            Axis::Horizontal => Point::new(coord, 0.0),
        };

        let id = self.id;
        self.runtime
            .handle_input(id, ListenTarget::Track(axis), InputEvent::at(down, point(from)))?;
        self.runtime
            .handle_input(id, ListenTarget::Document, InputEvent::at(moved, point(to)))?;
        self.runtime
            .handle_input(id, ListenTarget::Document, InputEvent::at(up, point(to)))?;
        Ok(())
    }
}

/// Replay `scenario`, writing notifications to `out`. Returns how many
/// were written.
pub fn run<W: Write>(scenario: &Scenario, out: &mut W) -> Result<usize> {
    let start = Instant::now();
    let env = scenario.environment.to_environment();
    let (mut runtime, clock) = manual_runtime(scenario.runtime.clone(), env, start);

    let surface = FakeSurface::new(scenario.container);
    for element in &scenario.elements {
        surface.add_element(&element.selector, element.rect());
    }
    let id = runtime.create(surface.clone(), &scenario.settings)?;

    let mut replay = Replay {
        runtime,
        clock,
        surface,
        id,
        start,
        touch: env.touch,
    };
    let mut written = replay.flush(0.0, out)?;

    let mut steps: Vec<_> = scenario.steps.iter().collect();
    steps.sort_by(|a, b| a.at.total_cmp(&b.at));
    let end = steps.last().map_or(0.0, |step| step.at.max(0.0)) + scenario.settle;
    let mut steps = steps.into_iter().peekable();

    let mut t = 0.0;
    loop {
        while let Some(step) = steps.next_if(|step| step.at <= t) {
            replay.clock.set(replay.start + millis(step.at));
            debug!(at = step.at, action = ?step.action, "step");
            if let Err(err) = replay.apply(&step.action) {
                warn!(%err, at = step.at, "step failed");
            }
            written += replay.flush(step.at.max(0.0), out)?;
        }

        replay.clock.set(replay.start + millis(t));
        replay.runtime.frame();
        written += replay.flush(t, out)?;

        if t >= end {
            break;
        }
        t = (t + scenario.frame_interval).min(end);
    }

    if let Ok(state) = replay.runtime.state(id) {
        debug!(?state, "final state");
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(output: &[u8]) -> Vec<serde_json::Value> {
        String::from_utf8(output.to_vec())
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_replay_scroll_burst() {
        let scenario = Scenario::from_toml_str(
            r#"
            settle = 500

            [container]
            scrollHeight = 1000
            clientHeight = 400
            scrollWidth = 300
            clientWidth = 300

            [[steps]]
            at = 100
            action = "scroll"
            axis = "vertical"
            offset = 600
            "#,
        )
        .unwrap();

        let mut output = Vec::new();
        let written = run(&scenario, &mut output).unwrap();
        let events: Vec<String> = lines(&output)
            .iter()
            .map(|line| line["event"].as_str().unwrap().to_string())
            .collect();

        assert_eq!(written, events.len());
        assert_eq!(
            events,
            vec![
                "scrollreachedge",
                "scrollreachtop",
                "scrollstart",
                "scrollreachedge",
                "scrollreachbottom",
                "scrollstop",
            ]
        );

        let bottom = &lines(&output)[4];
        assert_eq!(bottom["t"], 100.0);
        assert_eq!(bottom["detail"]["scrollTop"], 600.0);
    }

    #[test]
    fn test_replay_survives_destroyed_instance() {
        let scenario = Scenario::from_toml_str(
            r#"
            settle = 100

            [container]
            scrollHeight = 1000
            clientHeight = 400
            scrollWidth = 300
            clientWidth = 300

            [[steps]]
            at = 0
            action = "destroy"

            [[steps]]
            at = 50
            action = "scroll-to"
            y = "bottom"
            "#,
        )
        .unwrap();

        let mut output = Vec::new();
        assert!(run(&scenario, &mut output).is_ok());
    }
}
