use super::coords::Vec2;
use super::runtime::{
    DrawableExtraction, DrawableId, IoData, ListenerId, Rgb, RuntimeEventKind, SpriteInfo,
    StageRuntime, TargetId, TargetInfo,
};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RuntimeCall {
    GoToFront(TargetId),
    StartDrag(TargetId),
    StopDrag(TargetId),
    SpriteInfo(SpriteInfo),
    Io(IoData),
    Resize(f32, f32),
    Draw,
    Answer(String),
    SetEditingTarget(TargetId),
}

#[derive(Debug, Clone)]
pub(crate) struct FakeSprite {
    pub(crate) drawable: DrawableId,
    pub(crate) info: TargetInfo,
    /// Stage-local pick box: (min, max).
    pub(crate) pick_box: (Vec2, Vec2),
}

/// Records every call; picks by stage-space boxes, topmost last.
#[derive(Debug, Default)]
pub(crate) struct FakeRuntime {
    pub(crate) sprites: Vec<FakeSprite>,
    pub(crate) calls: Vec<RuntimeCall>,
    pub(crate) color: Rgb,
    pub(crate) color_samples: Vec<(f32, f32, u32)>,
    pub(crate) editing_target: Option<TargetId>,
    pub(crate) listeners: Vec<(ListenerId, RuntimeEventKind)>,
    pub(crate) next_listener: u64,
}

impl FakeRuntime {
    pub(crate) fn with_sprite(mut self, name: &str, draggable: bool, center: Vec2) -> Self {
        let drawable = DrawableId(self.sprites.len() as u64 + 1);
        self.sprites.push(FakeSprite {
            drawable,
            info: TargetInfo {
                id: TargetId(name.to_string()),
                name: name.to_string(),
                position: Vec2::new(0.0, 0.0),
                draggable,
            },
            pick_box: (
                Vec2::new(center.x - 10.0, center.y - 10.0),
                Vec2::new(center.x + 10.0, center.y + 10.0),
            ),
        });
        self
    }

    pub(crate) fn set_target_position(&mut self, name: &str, position: Vec2) {
        if let Some(sprite) = self.sprites.iter_mut().find(|s| s.info.name == name) {
            sprite.info.position = position;
        }
    }

    pub(crate) fn sprite_infos(&self) -> Vec<SpriteInfo> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                RuntimeCall::SpriteInfo(info) => Some(*info),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn io(&self) -> Vec<IoData> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                RuntimeCall::Io(data) => Some(*data),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn count(&self, wanted: &RuntimeCall) -> usize {
        self.calls.iter().filter(|call| *call == wanted).count()
    }
}

impl StageRuntime for FakeRuntime {
    fn pick(&mut self, x: f32, y: f32) -> Option<DrawableId> {
        self.sprites
            .iter()
            .rev()
            .find(|sprite| {
                let (min, max) = sprite.pick_box;
                x >= min.x && x <= max.x && y >= min.y && y <= max.y
            })
            .map(|sprite| sprite.drawable)
    }

    fn target_for_drawable(&self, drawable: DrawableId) -> Option<TargetId> {
        self.sprites
            .iter()
            .find(|sprite| sprite.drawable == drawable)
            .map(|sprite| sprite.info.id.clone())
    }

    fn target(&self, id: &TargetId) -> Option<TargetInfo> {
        self.sprites
            .iter()
            .find(|sprite| &sprite.info.id == id)
            .map(|sprite| sprite.info.clone())
    }

    fn targets(&self) -> Vec<TargetInfo> {
        self.sprites.iter().map(|sprite| sprite.info.clone()).collect()
    }

    fn editing_target(&self) -> Option<TargetId> {
        self.editing_target.clone()
    }

    fn set_editing_target(&mut self, id: &TargetId) {
        self.editing_target = Some(id.clone());
        self.calls.push(RuntimeCall::SetEditingTarget(id.clone()));
    }

    fn go_to_front(&mut self, id: &TargetId) {
        self.calls.push(RuntimeCall::GoToFront(id.clone()));
    }

    fn start_drag(&mut self, id: &TargetId) {
        self.calls.push(RuntimeCall::StartDrag(id.clone()));
    }

    fn stop_drag(&mut self, id: &TargetId) {
        self.calls.push(RuntimeCall::StopDrag(id.clone()));
    }

    fn post_sprite_info(&mut self, info: SpriteInfo) {
        self.calls.push(RuntimeCall::SpriteInfo(info));
    }

    fn post_io_data(&mut self, data: IoData) {
        self.calls.push(RuntimeCall::Io(data));
    }

    fn native_size(&self) -> (f32, f32) {
        (480.0, 360.0)
    }

    fn extract_color(&mut self, x: f32, y: f32, radius: u32) -> Rgb {
        self.color_samples.push((x, y, radius));
        self.color
    }

    fn extract_drawable_screen_space(&mut self, drawable: DrawableId) -> Option<DrawableExtraction> {
        let sprite = self.sprites.iter().find(|s| s.drawable == drawable)?;
        let (min, max) = sprite.pick_box;
        Some(DrawableExtraction {
            image_width: 20,
            image_height: 20,
            rgba: vec![0; 20 * 20 * 4],
            x: min.x,
            y: min.y,
            width: max.x - min.x,
            height: max.y - min.y,
        })
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.calls.push(RuntimeCall::Resize(width, height));
    }

    fn draw(&mut self) {
        self.calls.push(RuntimeCall::Draw);
    }

    fn emit_answer(&mut self, answer: &str) {
        self.calls.push(RuntimeCall::Answer(answer.to_string()));
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
