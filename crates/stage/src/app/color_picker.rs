use serde::Serialize;

use super::coords::Vec2;
use super::runtime::{Rgb, StageRuntime};
use super::timers::TimerId;

/// Last colour sampled under the pointer, in stage-local pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorInfo {
    pub x: f32,
    pub y: f32,
    pub color: Rgb,
}

/// Colour sampling state. Sampling runs from a fixed-rate poll while the
/// picker is active and reads whatever pointer position was seen last.
#[derive(Debug, Default)]
pub(crate) struct ColorPicker {
    poll_timer: Option<TimerId>,
    pick_position: Option<Vec2>,
    info: Option<ColorInfo>,
}

impl ColorPicker {
    pub(crate) fn is_polling(&self) -> bool {
        self.poll_timer.is_some()
    }

    pub(crate) fn start_polling(&mut self, timer: TimerId) {
        self.poll_timer = Some(timer);
    }

    /// Returns the poll timer to cancel. Pending samples are dropped.
    pub(crate) fn stop_polling(&mut self) -> Option<TimerId> {
        self.pick_position = None;
        self.info = None;
        self.poll_timer.take()
    }

    pub(crate) fn track(&mut self, position: Vec2) {
        self.pick_position = Some(position);
    }

    pub(crate) fn info(&self) -> Option<ColorInfo> {
        self.info
    }

    pub(crate) fn poll(&mut self, runtime: &mut dyn StageRuntime, radius: u32) {
        if let Some(position) = self.pick_position {
            self.info = Some(sample(runtime, position, radius));
        }
    }

    pub(crate) fn sample_now(
        &mut self,
        runtime: &mut dyn StageRuntime,
        position: Vec2,
        radius: u32,
    ) {
        self.pick_position = Some(position);
        self.info = Some(sample(runtime, position, radius));
    }

    /// Hands out the pending colour as `#rrggbb` and resets pick state.
    pub(crate) fn take_pick(&mut self) -> Option<String> {
        let info = self.info.take()?;
        self.pick_position = None;
        Some(info.color.to_hex())
    }
}

fn sample(runtime: &mut dyn StageRuntime, position: Vec2, radius: u32) -> ColorInfo {
    ColorInfo {
        x: position.x,
        y: position.y,
        color: runtime.extract_color(position.x, position.y, radius),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::FakeRuntime;

    #[test]
    fn poll_without_position_samples_nothing() {
        let mut runtime = FakeRuntime::default();
        let mut picker = ColorPicker::default();
        picker.poll(&mut runtime, 20);
        assert!(picker.info().is_none());
        assert!(runtime.color_samples.is_empty());
    }

    #[test]
    fn poll_reads_last_tracked_position() {
        let mut runtime = FakeRuntime {
            color: Rgb { r: 255, g: 128, b: 1 },
            ..FakeRuntime::default()
        };
        let mut picker = ColorPicker::default();
        picker.track(Vec2::new(3.0, 4.0));
        picker.track(Vec2::new(30.0, 40.0));
        picker.poll(&mut runtime, 20);
        assert_eq!(runtime.color_samples, vec![(30.0, 40.0, 20)]);
        assert_eq!(picker.take_pick().as_deref(), Some("#ff8001"));
        assert!(picker.info().is_none());
        assert_eq!(picker.take_pick(), None);
    }
}
