use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::InputConfig;

use super::color_picker::{ColorInfo, ColorPicker};
use super::coords::{stage_to_native, StageRect, Vec2};
use super::runtime::{IoData, MouseData, SpriteInfo, StageRuntime, TargetId, WheelData};
use super::timers::{TimerId, TimerQueue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    Primary,
    Middle,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerSource {
    Mouse(MouseButton),
    Touch,
}

impl PointerSource {
    const fn starts_gesture(self) -> bool {
        matches!(
            self,
            PointerSource::Mouse(MouseButton::Primary) | PointerSource::Touch
        )
    }
}

/// A pointer or touch event in client (page) pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub client: Vec2,
    pub source: PointerSource,
}

impl PointerEvent {
    pub fn mouse(x: f32, y: f32) -> Self {
        Self {
            client: Vec2::new(x, y),
            source: PointerSource::Mouse(MouseButton::Primary),
        }
    }

    pub fn touch(x: f32, y: f32) -> Self {
        Self {
            client: Vec2::new(x, y),
            source: PointerSource::Touch,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum InputTimer {
    HoldToDrag(Vec2),
    ColorPoll,
}

/// Detached art that follows the pointer during an editor-style drag.
///
/// `anchor` places the pick location at the proxy origin, so the proxy is
/// drawn at `anchor + translate`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DragProxy {
    pub anchor: Vec2,
    pub translate: Vec2,
    pub width: f32,
    pub height: f32,
    pub image_width: u32,
    pub image_height: u32,
    #[serde(skip)]
    pub rgba: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DragState {
    pub is_dragging: bool,
    pub drag_id: Option<TargetId>,
    pub drag_offset: Option<Vec2>,
    pub mouse_down_position: Option<Vec2>,
    pub hold_timer_armed: bool,
}

#[derive(Debug, Clone, PartialEq)]
struct ActiveDrag {
    target: TargetId,
    offset: Vec2,
    editor_style: bool,
}

/// Turns raw pointer traffic into runtime IO posts and sprite drags.
#[derive(Debug)]
pub struct PointerInput {
    config: InputConfig,
    timers: TimerQueue<InputTimer>,
    rect: StageRect,
    editor_drag_style: bool,
    mouse_down_position: Option<Vec2>,
    hold_timer: Option<TimerId>,
    drag: Option<ActiveDrag>,
    proxy: Option<DragProxy>,
    color_picker: ColorPicker,
}

impl PointerInput {
    pub fn new(config: InputConfig, rect: StageRect, editor_drag_style: bool) -> Self {
        Self {
            config,
            timers: TimerQueue::new(),
            rect,
            editor_drag_style,
            mouse_down_position: None,
            hold_timer: None,
            drag: None,
            proxy: None,
            color_picker: ColorPicker::default(),
        }
    }

    pub fn rect(&self) -> StageRect {
        self.rect
    }

    pub fn set_rect(&mut self, rect: StageRect) {
        self.rect = rect;
    }

    pub fn set_editor_drag_style(&mut self, enabled: bool) {
        self.editor_drag_style = enabled;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn drag_state(&self) -> DragState {
        DragState {
            is_dragging: self.drag.is_some(),
            drag_id: self.drag.as_ref().map(|drag| drag.target.clone()),
            drag_offset: self.drag.as_ref().map(|drag| drag.offset),
            mouse_down_position: self.mouse_down_position,
            hold_timer_armed: self.hold_timer.is_some(),
        }
    }

    pub fn drag_proxy(&self) -> Option<&DragProxy> {
        self.proxy.as_ref()
    }

    pub fn is_color_picking(&self) -> bool {
        self.color_picker.is_polling()
    }

    pub fn color_info(&self) -> Option<ColorInfo> {
        self.color_picker.info()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn set_color_picking(&mut self, active: bool) {
        if active == self.color_picker.is_polling() {
            return;
        }
        if active {
            let timer = self
                .timers
                .schedule_every(self.config.color_poll_interval(), InputTimer::ColorPoll);
            self.color_picker.start_polling(timer);
            debug!("color_picker_started");
        } else if let Some(timer) = self.color_picker.stop_polling() {
            self.timers.cancel(timer);
            debug!("color_picker_stopped");
        }
    }

    pub fn advance_to(&mut self, now: Duration, runtime: &mut dyn StageRuntime) {
        while let Some((_, timer)) = self.timers.pop_due(now) {
            match timer {
                InputTimer::HoldToDrag(position) => {
                    self.hold_timer = None;
                    if self.mouse_down_position.is_some() {
                        self.start_drag(position, runtime);
                    }
                }
                InputTimer::ColorPoll => {
                    self.color_picker.poll(runtime, self.config.color_picker_radius);
                }
            }
        }
        self.timers.settle_at(now);
    }

    pub fn pointer_down(&mut self, event: PointerEvent, runtime: &mut dyn StageRuntime) {
        let position = self.rect.client_to_stage(event.client);
        if self.color_picker.is_polling() {
            self.color_picker
                .sample_now(runtime, position, self.config.color_picker_radius);
            return;
        }

        if event.source.starts_gesture() {
            self.cancel_hold_timer();
            self.mouse_down_position = Some(position);
            self.hold_timer = Some(
                self.timers
                    .schedule_once(self.config.hold_to_drag(), InputTimer::HoldToDrag(position)),
            );
        }
        runtime.post_io_data(IoData::Mouse(self.mouse_data(position, Some(true), None)));
    }

    pub fn pointer_move(&mut self, event: PointerEvent, runtime: &mut dyn StageRuntime) {
        let position = self.rect.client_to_stage(event.client);
        if self.color_picker.is_polling() {
            self.color_picker.track(position);
        }

        if let Some(down_position) = self.mouse_down_position {
            if self.drag.is_none() {
                if position.distance(down_position) > self.config.drag_threshold_px {
                    self.cancel_hold_timer();
                    self.start_drag(down_position, runtime);
                }
            } else {
                self.continue_drag(position, runtime);
            }
        }

        runtime.post_io_data(IoData::Mouse(self.mouse_data(position, None, None)));
    }

    /// Returns the picked colour as `#rrggbb` when the release completes a
    /// colour pick inside the stage.
    pub fn pointer_up(
        &mut self,
        event: PointerEvent,
        runtime: &mut dyn StageRuntime,
    ) -> Option<String> {
        let position = self.rect.client_to_stage(event.client);
        self.cancel_hold_timer();
        self.mouse_down_position = None;

        let was_dragged = self.drag.is_some();
        if was_dragged {
            self.stop_drag(position, runtime);
        }
        runtime.post_io_data(IoData::Mouse(self.mouse_data(
            position,
            Some(false),
            Some(was_dragged),
        )));

        if self.color_picker.is_polling() && self.rect.contains_stage_point(position) {
            let picked = self.color_picker.take_pick();
            if let Some(color) = &picked {
                info!(color = %color, "color_picked");
            }
            return picked;
        }
        None
    }

    pub fn wheel(&mut self, delta_x: f32, delta_y: f32, runtime: &mut dyn StageRuntime) {
        runtime.post_io_data(IoData::MouseWheel(WheelData { delta_x, delta_y }));
    }

    /// Makes the entity under the pointer the runtime's editing target.
    pub fn double_click(
        &mut self,
        event: PointerEvent,
        runtime: &mut dyn StageRuntime,
    ) -> Option<TargetId> {
        let position = self.rect.client_to_stage(event.client);
        let drawable = runtime.pick(position.x, position.y)?;
        let target = runtime.target_for_drawable(drawable)?;
        runtime.set_editing_target(&target);
        Some(target)
    }

    /// Cancels pending timers and releases an in-flight drag.
    pub fn shutdown(&mut self, runtime: &mut dyn StageRuntime) {
        self.timers.cancel_all();
        self.hold_timer = None;
        self.mouse_down_position = None;
        self.color_picker.stop_polling();
        if let Some(drag) = self.drag.take() {
            if drag.editor_style {
                runtime.post_sprite_info(SpriteInfo::visibility(true));
                self.proxy = None;
            }
            runtime.stop_drag(&drag.target);
        }
    }

    fn start_drag(&mut self, at: Vec2, runtime: &mut dyn StageRuntime) -> bool {
        if self.drag.is_some() {
            return false;
        }
        let Some(drawable) = runtime.pick(at.x, at.y) else {
            return false;
        };
        let Some(target_id) = runtime.target_for_drawable(drawable) else {
            return false;
        };
        let Some(target) = runtime.target(&target_id) else {
            return false;
        };
        if !(self.editor_drag_style || target.draggable) {
            debug!(target_id = %target_id.0, "drag_refused_not_draggable");
            return false;
        }

        runtime.go_to_front(&target_id);
        let native = stage_to_native(at, &self.rect, runtime.native_size());
        let offset = Vec2 {
            x: target.position.x - native.x,
            y: -(target.position.y + native.y),
        };
        runtime.start_drag(&target_id);

        if self.editor_drag_style {
            self.proxy = runtime
                .extract_drawable_screen_space(drawable)
                .map(|art| DragProxy {
                    anchor: Vec2::new(art.x - at.x, art.y - at.y),
                    translate: at,
                    width: art.width,
                    height: art.height,
                    image_width: art.image_width,
                    image_height: art.image_height,
                    rgba: art.rgba,
                });
            runtime.post_sprite_info(SpriteInfo::visibility(false));
            runtime.draw();
        }

        info!(
            target_id = %target_id.0,
            editor_style = self.editor_drag_style,
            "drag_started"
        );
        self.drag = Some(ActiveDrag {
            target: target_id,
            offset,
            editor_style: self.editor_drag_style,
        });
        true
    }

    fn continue_drag(&mut self, position: Vec2, runtime: &mut dyn StageRuntime) {
        let Some(drag) = &self.drag else {
            return;
        };
        if drag.editor_style {
            if let Some(proxy) = self.proxy.as_mut() {
                proxy.translate = position;
            }
        } else {
            let (x, y) = self.runtime_position(position, drag.offset, runtime);
            runtime.post_sprite_info(SpriteInfo::forced_position(x, y));
        }
    }

    fn stop_drag(&mut self, at: Vec2, runtime: &mut dyn StageRuntime) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        if drag.editor_style {
            let mut sprite_info = SpriteInfo::visibility(true);
            if self.rect.contains_stage_point(at) {
                let (x, y) = self.runtime_position(at, drag.offset, runtime);
                sprite_info.x = Some(x);
                sprite_info.y = Some(y);
                sprite_info.force = Some(true);
            }
            runtime.post_sprite_info(sprite_info);
            self.proxy = None;
            runtime.stop_drag(&drag.target);
            runtime.draw();
        } else {
            runtime.stop_drag(&drag.target);
        }
        info!(target_id = %drag.target.0, "drag_stopped");
    }

    /// Runtime position for the dragged entity with the pointer at `position`.
    fn runtime_position(
        &self,
        position: Vec2,
        offset: Vec2,
        runtime: &dyn StageRuntime,
    ) -> (f32, f32) {
        let native = stage_to_native(position, &self.rect, runtime.native_size());
        (native.x + offset.x, -(native.y + offset.y))
    }

    fn cancel_hold_timer(&mut self) {
        if let Some(timer) = self.hold_timer.take() {
            self.timers.cancel(timer);
        }
    }

    fn mouse_data(
        &self,
        position: Vec2,
        is_down: Option<bool>,
        was_dragged: Option<bool>,
    ) -> MouseData {
        MouseData {
            x: position.x,
            y: position.y,
            canvas_width: self.rect.width,
            canvas_height: self.rect.height,
            is_down,
            was_dragged,
        }
    }
}
