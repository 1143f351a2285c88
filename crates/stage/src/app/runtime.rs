use serde::{Deserialize, Serialize};

use super::coords::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DrawableId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// What the runtime reports about a positionable entity.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetInfo {
    pub id: TargetId,
    pub name: String,
    /// Native runtime units, y up.
    pub position: Vec2,
    pub draggable: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SpriteInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force: Option<bool>,
}

impl SpriteInfo {
    pub fn forced_position(x: f32, y: f32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            force: Some(true),
            ..Self::default()
        }
    }

    pub fn visibility(visible: bool) -> Self {
        Self {
            visible: Some(visible),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MouseData {
    pub x: f32,
    pub y: f32,
    pub canvas_width: f32,
    pub canvas_height: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_down: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub was_dragged: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WheelData {
    pub delta_x: f32,
    pub delta_y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum IoData {
    Mouse(MouseData),
    MouseWheel(WheelData),
}

impl IoData {
    pub fn channel(&self) -> &'static str {
        match self {
            IoData::Mouse(_) => "mouse",
            IoData::MouseWheel(_) => "mouseWheel",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Screen-space art of a drawable, used for the editor drag proxy.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawableExtraction {
    pub image_width: u32,
    pub image_height: u32,
    pub rgba: Vec<u8>,
    /// Bounds in stage-local layout pixels.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuntimeEventKind {
    Question,
    TargetsUpdate,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeEvent {
    /// `None` hides an open prompt.
    Question(Option<String>),
    TargetsUpdate,
}

impl RuntimeEvent {
    pub fn kind(&self) -> RuntimeEventKind {
        match self {
            RuntimeEvent::Question(_) => RuntimeEventKind::Question,
            RuntimeEvent::TargetsUpdate => RuntimeEventKind::TargetsUpdate,
        }
    }
}

/// Capability surface of the external VM and renderer.
///
/// The runtime owns the scene graph and hit testing. Events it emits are
/// delivered by its owner through `StageController::handle_runtime_event`
/// for as long as the matching subscription is held.
pub trait StageRuntime {
    fn pick(&mut self, x: f32, y: f32) -> Option<DrawableId>;
    fn target_for_drawable(&self, drawable: DrawableId) -> Option<TargetId>;
    fn target(&self, id: &TargetId) -> Option<TargetInfo>;
    fn targets(&self) -> Vec<TargetInfo>;
    fn editing_target(&self) -> Option<TargetId>;
    fn set_editing_target(&mut self, id: &TargetId);
    fn go_to_front(&mut self, id: &TargetId);
    fn start_drag(&mut self, id: &TargetId);
    fn stop_drag(&mut self, id: &TargetId);
    fn post_sprite_info(&mut self, info: SpriteInfo);
    fn post_io_data(&mut self, data: IoData);
    fn native_size(&self) -> (f32, f32);
    fn extract_color(&mut self, x: f32, y: f32, radius: u32) -> Rgb;
    fn extract_drawable_screen_space(&mut self, drawable: DrawableId) -> Option<DrawableExtraction>;
    fn resize(&mut self, width: f32, height: f32);
    fn draw(&mut self);
    fn emit_answer(&mut self, answer: &str);
    fn subscribe(&mut self, kind: RuntimeEventKind) -> ListenerId;
    fn unsubscribe(&mut self, listener: ListenerId);
}
