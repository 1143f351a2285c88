use serde::{Deserialize, Serialize};

pub const DEFAULT_STAGE_WIDTH: f32 = 480.0;
pub const DEFAULT_STAGE_HEIGHT: f32 = 360.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Vec2) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// The stage canvas' bounding box in client (page) pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for StageRect {
    fn default() -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width: DEFAULT_STAGE_WIDTH,
            height: DEFAULT_STAGE_HEIGHT,
        }
    }
}

impl StageRect {
    pub fn client_to_stage(&self, client: Vec2) -> Vec2 {
        Vec2 {
            x: client.x - self.left,
            y: client.y - self.top,
        }
    }

    /// Strict bounds: points on the stage edge count as outside.
    pub fn contains_stage_point(&self, point: Vec2) -> bool {
        point.x > 0.0 && point.x < self.width && point.y > 0.0 && point.y < self.height
    }
}

/// Stage-local pixels to native runtime units, centred on the stage.
///
/// The result keeps screen orientation (y grows downward). The runtime's y
/// axis points up, so callers negate y when posting positions back.
pub fn stage_to_native(point: Vec2, rect: &StageRect, native_size: (f32, f32)) -> Vec2 {
    let (native_width, native_height) = native_size;
    Vec2 {
        x: (native_width / rect.width) * (point.x - rect.width * 0.5),
        y: (native_height / rect.height) * (point.y - rect.height * 0.5),
    }
}

/// Runtime position (y up) to stage-local pixels (y down).
pub fn native_to_stage(position: Vec2, rect: &StageRect, native_size: (f32, f32)) -> Vec2 {
    let (native_width, native_height) = native_size;
    Vec2 {
        x: (position.x / native_width) * rect.width + rect.width * 0.5,
        y: -(position.y / native_height) * rect.height + rect.height * 0.5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NATIVE: (f32, f32) = (480.0, 360.0);

    fn double_size_rect() -> StageRect {
        StageRect {
            left: 100.0,
            top: 50.0,
            width: 960.0,
            height: 720.0,
        }
    }

    #[test]
    fn stage_centre_maps_to_native_origin() {
        let rect = double_size_rect();
        let native = stage_to_native(Vec2::new(480.0, 360.0), &rect, NATIVE);
        assert_eq!(native, Vec2::new(0.0, 0.0));
    }

    #[test]
    fn stage_to_native_keeps_screen_orientation() {
        let rect = double_size_rect();
        let native = stage_to_native(Vec2::new(960.0, 0.0), &rect, NATIVE);
        assert_eq!(native, Vec2::new(240.0, -180.0));
    }

    #[test]
    fn native_to_stage_inverts_y() {
        let rect = double_size_rect();
        let stage = native_to_stage(Vec2::new(240.0, 180.0), &rect, NATIVE);
        assert_eq!(stage, Vec2::new(960.0, 0.0));
    }

    #[test]
    fn client_offsets_by_rect_origin() {
        let rect = double_size_rect();
        assert_eq!(
            rect.client_to_stage(Vec2::new(110.0, 60.0)),
            Vec2::new(10.0, 10.0)
        );
    }

    #[test]
    fn edges_are_outside_the_stage() {
        let rect = StageRect::default();
        assert!(rect.contains_stage_point(Vec2::new(1.0, 1.0)));
        assert!(!rect.contains_stage_point(Vec2::new(0.0, 10.0)));
        assert!(!rect.contains_stage_point(Vec2::new(480.0, 10.0)));
        assert!(!rect.contains_stage_point(Vec2::new(10.0, 360.0)));
    }
}
