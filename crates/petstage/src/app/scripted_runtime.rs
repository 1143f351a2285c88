use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use stage::{
    native_to_stage, stage_to_native, DrawableExtraction, DrawableId, IoData, ListenerId, Rgb,
    RuntimeEvent, RuntimeEventKind, SpriteInfo, StageRect, StageRuntime, TargetId, TargetInfo,
    Vec2, DEFAULT_STAGE_HEIGHT, DEFAULT_STAGE_WIDTH,
};
use tracing::{debug, trace};

const NATIVE_SIZE: (f32, f32) = (DEFAULT_STAGE_WIDTH, DEFAULT_STAGE_HEIGHT);
const BACKDROP: Rgb = Rgb {
    r: 255,
    g: 255,
    b: 255,
};
const DEFAULT_SPRITE_SIZE: f32 = 40.0;
const MAX_IMAGE_SIDE: u32 = 2048;

/// Pixel size of one side of extracted art, clamped like a texture limit.
fn image_side(length: f32) -> u32 {
    length.round().clamp(1.0, MAX_IMAGE_SIDE as f32) as u32
}

fn default_draggable() -> bool {
    true
}

fn default_sprite_size() -> f32 {
    DEFAULT_SPRITE_SIZE
}

/// A sprite as declared by a scenario file. Position and size are native
/// runtime units.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct SpriteSpec {
    pub(crate) name: String,
    #[serde(default = "default_draggable")]
    pub(crate) draggable: bool,
    #[serde(default)]
    pub(crate) x: f32,
    #[serde(default)]
    pub(crate) y: f32,
    #[serde(default = "default_sprite_size")]
    pub(crate) width: f32,
    #[serde(default = "default_sprite_size")]
    pub(crate) height: f32,
    #[serde(default)]
    pub(crate) color: Rgb,
}

#[derive(Debug, Clone)]
struct ScriptedSprite {
    drawable: DrawableId,
    spec: SpriteSpec,
    position: Vec2,
    visible: bool,
}

impl ScriptedSprite {
    fn id(&self) -> TargetId {
        TargetId(self.spec.name.clone())
    }

    fn contains(&self, native: Vec2) -> bool {
        (native.x - self.position.x).abs() <= self.spec.width * 0.5
            && (native.y - self.position.y).abs() <= self.spec.height * 0.5
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct SpriteSummary {
    pub(crate) name: String,
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct RuntimeSummary {
    pub(crate) sprites: Vec<SpriteSummary>,
    pub(crate) editing_target: Option<TargetId>,
    pub(crate) answers: Vec<String>,
    pub(crate) mouse_posts: usize,
    pub(crate) wheel_posts: usize,
    pub(crate) draws: usize,
}

/// In-memory stand-in for the VM and renderer: rectangular sprites in draw
/// order (last on top), a fixed native size and a queue of emitted events.
#[derive(Debug)]
pub(crate) struct ScriptedRuntime {
    sprites: Vec<ScriptedSprite>,
    stage_size: (f32, f32),
    editing_target: Option<TargetId>,
    drag_target: Option<TargetId>,
    listeners: Vec<(ListenerId, RuntimeEventKind)>,
    next_listener: u64,
    pending: VecDeque<RuntimeEvent>,
    answers: Vec<String>,
    mouse_posts: usize,
    wheel_posts: usize,
    draws: usize,
}

impl ScriptedRuntime {
    pub(crate) fn new(specs: &[SpriteSpec]) -> Self {
        let sprites: Vec<_> = specs
            .iter()
            .enumerate()
            .map(|(index, spec)| ScriptedSprite {
                drawable: DrawableId(index as u64 + 1),
                spec: spec.clone(),
                position: Vec2::new(spec.x, spec.y),
                visible: true,
            })
            .collect();
        let editing_target = sprites.first().map(ScriptedSprite::id);

        Self {
            sprites,
            stage_size: NATIVE_SIZE,
            editing_target,
            drag_target: None,
            listeners: Vec::new(),
            next_listener: 0,
            pending: VecDeque::new(),
            answers: Vec::new(),
            mouse_posts: 0,
            wheel_posts: 0,
            draws: 0,
        }
    }

    pub(crate) fn ask(&mut self, prompt: &str) {
        self.queue(RuntimeEvent::Question(Some(prompt.to_string())));
    }

    /// Moves a sprite as a running script would. Returns false for an
    /// unknown name.
    pub(crate) fn move_sprite(&mut self, name: &str, position: Vec2) -> bool {
        let Some(sprite) = self.sprites.iter_mut().find(|s| s.spec.name == name) else {
            return false;
        };
        sprite.position = position;
        self.queue(RuntimeEvent::TargetsUpdate);
        true
    }

    pub(crate) fn drain_events(&mut self) -> Vec<RuntimeEvent> {
        self.pending.drain(..).collect()
    }

    pub(crate) fn summary(&self) -> RuntimeSummary {
        RuntimeSummary {
            sprites: self
                .sprites
                .iter()
                .map(|sprite| SpriteSummary {
                    name: sprite.spec.name.clone(),
                    x: sprite.position.x,
                    y: sprite.position.y,
                    visible: sprite.visible,
                })
                .collect(),
            editing_target: self.editing_target.clone(),
            answers: self.answers.clone(),
            mouse_posts: self.mouse_posts,
            wheel_posts: self.wheel_posts,
            draws: self.draws,
        }
    }

    fn queue(&mut self, event: RuntimeEvent) {
        let kind = event.kind();
        if self.listeners.iter().any(|(_, listened)| *listened == kind) {
            self.pending.push_back(event);
        } else {
            trace!(?kind, "runtime_event_unobserved");
        }
    }

    fn stage_rect(&self) -> StageRect {
        StageRect {
            left: 0.0,
            top: 0.0,
            width: self.stage_size.0,
            height: self.stage_size.1,
        }
    }

    fn sprite_at(&self, x: f32, y: f32) -> Option<&ScriptedSprite> {
        let screen = stage_to_native(Vec2::new(x, y), &self.stage_rect(), NATIVE_SIZE);
        let native = Vec2::new(screen.x, -screen.y);
        self.sprites
            .iter()
            .rev()
            .find(|sprite| sprite.visible && sprite.contains(native))
    }

    fn sprite_mut(&mut self, id: &TargetId) -> Option<&mut ScriptedSprite> {
        self.sprites.iter_mut().find(|sprite| sprite.spec.name == id.0)
    }

    fn info(sprite: &ScriptedSprite) -> TargetInfo {
        TargetInfo {
            id: sprite.id(),
            name: sprite.spec.name.clone(),
            position: sprite.position,
            draggable: sprite.spec.draggable,
        }
    }
}

impl StageRuntime for ScriptedRuntime {
    fn pick(&mut self, x: f32, y: f32) -> Option<DrawableId> {
        self.sprite_at(x, y).map(|sprite| sprite.drawable)
    }

    fn target_for_drawable(&self, drawable: DrawableId) -> Option<TargetId> {
        self.sprites
            .iter()
            .find(|sprite| sprite.drawable == drawable)
            .map(ScriptedSprite::id)
    }

    fn target(&self, id: &TargetId) -> Option<TargetInfo> {
        self.sprites
            .iter()
            .find(|sprite| sprite.spec.name == id.0)
            .map(Self::info)
    }

    fn targets(&self) -> Vec<TargetInfo> {
        self.sprites.iter().map(Self::info).collect()
    }

    fn editing_target(&self) -> Option<TargetId> {
        self.editing_target.clone()
    }

    fn set_editing_target(&mut self, id: &TargetId) {
        self.editing_target = Some(id.clone());
    }

    fn go_to_front(&mut self, id: &TargetId) {
        if let Some(index) = self.sprites.iter().position(|s| s.spec.name == id.0) {
            let sprite = self.sprites.remove(index);
            self.sprites.push(sprite);
        }
    }

    fn start_drag(&mut self, id: &TargetId) {
        self.drag_target = Some(id.clone());
    }

    fn stop_drag(&mut self, id: &TargetId) {
        if self.drag_target.as_ref() == Some(id) {
            self.drag_target = None;
        }
    }

    fn post_sprite_info(&mut self, info: SpriteInfo) {
        let Some(id) = self.drag_target.clone().or_else(|| self.editing_target.clone()) else {
            return;
        };
        let Some(sprite) = self.sprite_mut(&id) else {
            return;
        };
        if let Some(visible) = info.visible {
            sprite.visible = visible;
        }
        let mut moved = false;
        if let Some(x) = info.x {
            sprite.position.x = x;
            moved = true;
        }
        if let Some(y) = info.y {
            sprite.position.y = y;
            moved = true;
        }
        if moved {
            self.queue(RuntimeEvent::TargetsUpdate);
        }
    }

    fn post_io_data(&mut self, data: IoData) {
        match data {
            IoData::Mouse(_) => self.mouse_posts += 1,
            IoData::MouseWheel(_) => self.wheel_posts += 1,
        }
        trace!(channel = data.channel(), "io_posted");
    }

    fn native_size(&self) -> (f32, f32) {
        NATIVE_SIZE
    }

    fn extract_color(&mut self, x: f32, y: f32, _radius: u32) -> Rgb {
        self.sprite_at(x, y)
            .map(|sprite| sprite.spec.color)
            .unwrap_or(BACKDROP)
    }

    fn extract_drawable_screen_space(&mut self, drawable: DrawableId) -> Option<DrawableExtraction> {
        let rect = self.stage_rect();
        let sprite = self.sprites.iter().find(|s| s.drawable == drawable)?;
        let center = native_to_stage(sprite.position, &rect, NATIVE_SIZE);
        let width = sprite.spec.width * rect.width / NATIVE_SIZE.0;
        let height = sprite.spec.height * rect.height / NATIVE_SIZE.1;
        let image_width = image_side(width);
        let image_height = image_side(height);
        let color = sprite.spec.color;
        let rgba = [color.r, color.g, color.b, 255]
            .repeat(image_width as usize * image_height as usize);

        Some(DrawableExtraction {
            image_width,
            image_height,
            rgba,
            x: center.x - width * 0.5,
            y: center.y - height * 0.5,
            width,
            height,
        })
    }

    fn resize(&mut self, width: f32, height: f32) {
        debug!(width, height, "renderer_resized");
        self.stage_size = (width, height);
    }

    fn draw(&mut self) {
        self.draws += 1;
    }

    fn emit_answer(&mut self, answer: &str) {
        self.answers.push(answer.to_string());
    }

    fn subscribe(&mut self, kind: RuntimeEventKind) -> ListenerId {
        self.next_listener += 1;
        let id = ListenerId(self.next_listener);
        self.listeners.push((id, kind));
        id
    }

    fn unsubscribe(&mut self, listener: ListenerId) {
        self.listeners.retain(|(id, _)| *id != listener);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sprite(name: &str, x: f32, y: f32) -> SpriteSpec {
        SpriteSpec {
            name: name.to_string(),
            draggable: true,
            x,
            y,
            width: DEFAULT_SPRITE_SIZE,
            height: DEFAULT_SPRITE_SIZE,
            color: Rgb { r: 10, g: 20, b: 30 },
        }
    }

    #[test]
    fn pick_uses_native_y_up_and_topmost_sprite() {
        let mut runtime = ScriptedRuntime::new(&[sprite("Low", 0.0, 0.0), sprite("High", 10.0, 0.0)]);
        let top = runtime.pick(250.0, 180.0).expect("hit");
        assert_eq!(runtime.target_for_drawable(top), Some(TargetId("High".into())));

        let mut runtime = ScriptedRuntime::new(&[sprite("Up", 0.0, 100.0)]);
        assert!(runtime.pick(240.0, 80.0).is_some());
        assert!(runtime.pick(240.0, 280.0).is_none());
    }

    #[test]
    fn go_to_front_reorders_picking() {
        let mut runtime = ScriptedRuntime::new(&[sprite("A", 0.0, 0.0), sprite("B", 0.0, 0.0)]);
        runtime.go_to_front(&TargetId("A".into()));
        let top = runtime.pick(240.0, 180.0).expect("hit");
        assert_eq!(runtime.target_for_drawable(top), Some(TargetId("A".into())));
    }

    #[test]
    fn sprite_info_moves_drag_target_and_notifies_subscribers() {
        let mut runtime = ScriptedRuntime::new(&[sprite("A", 0.0, 0.0), sprite("B", 0.0, 0.0)]);
        runtime.start_drag(&TargetId("B".into()));
        runtime.post_sprite_info(SpriteInfo::forced_position(12.0, -4.0));
        assert!(runtime.drain_events().is_empty());

        runtime.subscribe(RuntimeEventKind::TargetsUpdate);
        runtime.post_sprite_info(SpriteInfo::forced_position(30.0, 5.0));
        assert_eq!(runtime.drain_events(), vec![RuntimeEvent::TargetsUpdate]);

        let summary = runtime.summary();
        assert_eq!((summary.sprites[1].x, summary.sprites[1].y), (30.0, 5.0));
        assert_eq!((summary.sprites[0].x, summary.sprites[0].y), (0.0, 0.0));
    }

    #[test]
    fn unsubscribed_questions_are_dropped() {
        let mut runtime = ScriptedRuntime::new(&[]);
        let listener = runtime.subscribe(RuntimeEventKind::Question);
        runtime.ask("Name?");
        runtime.unsubscribe(listener);
        runtime.ask("Again?");
        assert_eq!(
            runtime.drain_events(),
            vec![RuntimeEvent::Question(Some("Name?".to_string()))]
        );
    }

    #[test]
    fn color_comes_from_sprite_or_backdrop() {
        let mut runtime = ScriptedRuntime::new(&[sprite("A", 0.0, 0.0)]);
        assert_eq!(runtime.extract_color(240.0, 180.0, 20), Rgb { r: 10, g: 20, b: 30 });
        assert_eq!(runtime.extract_color(5.0, 5.0, 20), BACKDROP);
    }

    #[test]
    fn extraction_reports_stage_bounds() {
        let mut runtime = ScriptedRuntime::new(&[sprite("A", 0.0, 0.0)]);
        runtime.resize(240.0, 180.0);
        let art = runtime
            .extract_drawable_screen_space(DrawableId(1))
            .expect("art");
        assert_eq!((art.x, art.y, art.width, art.height), (110.0, 80.0, 20.0, 20.0));
        assert_eq!(art.rgba.len(), 20 * 20 * 4);
    }

    #[test]
    fn oversized_sprite_art_is_clamped() {
        let mut giant = sprite("Giant", 0.0, 0.0);
        giant.width = 1.0e6;
        giant.height = 3.0e5;
        let mut runtime = ScriptedRuntime::new(&[giant]);
        let art = runtime
            .extract_drawable_screen_space(DrawableId(1))
            .expect("art");
        assert_eq!((art.image_width, art.image_height), (MAX_IMAGE_SIDE, MAX_IMAGE_SIDE));
        assert_eq!(art.rgba.len(), 2048 * 2048 * 4);
        assert_eq!(art.width, 1.0e6);
    }
}
