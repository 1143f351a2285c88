use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::StageConfig;
use crate::pet::{ActionOutcome, PetAction, PetSimulation, PetSnapshot};

use super::color_picker::ColorInfo;
use super::coords::{native_to_stage, StageRect};
use super::input::{DragProxy, DragState, PointerEvent, PointerInput};
use super::runtime::{
    ListenerId, RuntimeEvent, RuntimeEventKind, StageRuntime, TargetId, TargetInfo,
};

const PET_NAME_MARKER: &str = "pet";

/// Mode flags owned by the host's state store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageFlags {
    pub color_picking: bool,
    pub full_screen: bool,
    pub player_only: bool,
    pub started: bool,
    pub mic_indicator: bool,
}

impl StageFlags {
    pub fn use_editor_drag_style(&self) -> bool {
        !(self.full_screen || self.player_only)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PetControls {
    pub enabled: bool,
    pub disable_feed: bool,
    pub disable_play: bool,
    pub disable_clean: bool,
    pub disable_sleep: bool,
    pub disable_food: bool,
    pub disable_waste: bool,
}

impl Default for PetControls {
    fn default() -> Self {
        Self {
            enabled: true,
            disable_feed: false,
            disable_play: false,
            disable_clean: false,
            disable_sleep: false,
            disable_food: false,
            disable_waste: false,
        }
    }
}

/// Outbound notifications for the host's state store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "notice", content = "value", rename_all = "snake_case")]
pub enum StageNotice {
    ColorPicked(String),
    EditingTargetChanged(TargetId),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageSnapshot {
    pub active: bool,
    pub now_ms: u64,
    pub rect: StageRect,
    pub flags: StageFlags,
    pub pet_controls: PetControls,
    pub pet: PetSnapshot,
    pub drag: DragState,
    pub drag_proxy: Option<DragProxy>,
    pub color_info: Option<ColorInfo>,
    pub question: Option<String>,
}

/// Owns one stage: the runtime it drives, pointer input and the pet.
///
/// Taking the runtime by value keeps a single controller attached to a
/// stage. `teardown` cancels every timer and drops the runtime
/// subscriptions; it is safe to call more than once.
#[derive(Debug)]
pub struct StageController<R: StageRuntime> {
    runtime: R,
    active: bool,
    flags: StageFlags,
    pet_controls: PetControls,
    input: PointerInput,
    pet: PetSimulation,
    question: Option<String>,
    listeners: Vec<ListenerId>,
    notices: Vec<StageNotice>,
}

impl<R: StageRuntime> StageController<R> {
    pub fn activate(mut runtime: R, config: StageConfig, flags: StageFlags, rect: StageRect) -> Self {
        let listeners = vec![
            runtime.subscribe(RuntimeEventKind::Question),
            runtime.subscribe(RuntimeEventKind::TargetsUpdate),
        ];
        runtime.resize(rect.width, rect.height);

        let mut input = PointerInput::new(config.input, rect, flags.use_editor_drag_style());
        input.set_color_picking(flags.color_picking);

        let mut pet = PetSimulation::new(config.pet);
        pet.set_stage_size(rect.width, rect.height);

        info!(
            width = rect.width,
            height = rect.height,
            editor_drag_style = flags.use_editor_drag_style(),
            "stage_activated"
        );

        Self {
            runtime,
            active: true,
            flags,
            pet_controls: PetControls::default(),
            input,
            pet,
            question: None,
            listeners,
            notices: Vec::new(),
        }
    }

    pub fn teardown(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        self.input.shutdown(&mut self.runtime);
        for listener in self.listeners.drain(..) {
            self.runtime.unsubscribe(listener);
        }
        self.pet.shutdown();
        self.question = None;
        info!("stage_torn_down");
    }

    pub fn into_runtime(mut self) -> R {
        self.teardown();
        self.runtime
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    pub fn runtime_mut(&mut self) -> &mut R {
        &mut self.runtime
    }

    pub fn pet(&self) -> &PetSimulation {
        &self.pet
    }

    pub fn input(&self) -> &PointerInput {
        &self.input
    }

    pub fn flags(&self) -> StageFlags {
        self.flags
    }

    pub fn pet_controls(&self) -> PetControls {
        self.pet_controls
    }

    pub fn question(&self) -> Option<&str> {
        self.question.as_deref()
    }

    pub fn now(&self) -> Duration {
        self.pet.now()
    }

    pub fn take_notices(&mut self) -> Vec<StageNotice> {
        std::mem::take(&mut self.notices)
    }

    pub fn advance_to(&mut self, now: Duration) {
        if !self.active {
            return;
        }
        self.input.advance_to(now, &mut self.runtime);
        self.pet.advance_to(now);
    }

    pub fn handle_runtime_event(&mut self, event: RuntimeEvent) {
        if !self.active {
            debug!(kind = ?event.kind(), "runtime_event_after_teardown");
            return;
        }
        match event {
            RuntimeEvent::Question(prompt) => {
                self.question = prompt.filter(|text| !text.is_empty());
                debug!(open = self.question.is_some(), "question_updated");
            }
            RuntimeEvent::TargetsUpdate => self.sync_pet_position(),
        }
    }

    /// Closes the open prompt and hands the answer back to the runtime.
    pub fn answer_question(&mut self, answer: &str) -> bool {
        if self.question.take().is_none() {
            return false;
        }
        self.runtime.emit_answer(answer);
        info!(answer_len = answer.len(), "question_answered");
        true
    }

    pub fn set_flags(&mut self, flags: StageFlags) {
        if !self.active {
            return;
        }
        let layout_changed =
            flags.full_screen != self.flags.full_screen || flags.player_only != self.flags.player_only;
        self.input.set_editor_drag_style(flags.use_editor_drag_style());
        self.input.set_color_picking(flags.color_picking);
        if layout_changed {
            let rect = self.input.rect();
            self.runtime.resize(rect.width, rect.height);
        }
        self.flags = flags;
    }

    pub fn set_pet_controls(&mut self, controls: PetControls) {
        self.pet_controls = controls;
    }

    pub fn set_pet_enabled(&mut self, enabled: bool) {
        self.pet_controls.enabled = enabled;
    }

    pub fn update_rect(&mut self, rect: StageRect) {
        if !self.active {
            return;
        }
        self.input.set_rect(rect);
        self.runtime.resize(rect.width, rect.height);
        self.pet.set_stage_size(rect.width, rect.height);
        debug!(
            left = rect.left,
            top = rect.top,
            width = rect.width,
            height = rect.height,
            "stage_rect_updated"
        );
    }

    pub fn pointer_down(&mut self, event: PointerEvent) {
        if self.active {
            self.input.pointer_down(event, &mut self.runtime);
        }
    }

    pub fn pointer_move(&mut self, event: PointerEvent) {
        if self.active {
            self.input.pointer_move(event, &mut self.runtime);
        }
    }

    pub fn pointer_up(&mut self, event: PointerEvent) {
        if !self.active {
            return;
        }
        if let Some(color) = self.input.pointer_up(event, &mut self.runtime) {
            self.notices.push(StageNotice::ColorPicked(color));
        }
    }

    pub fn wheel(&mut self, delta_x: f32, delta_y: f32) {
        if self.active {
            self.input.wheel(delta_x, delta_y, &mut self.runtime);
        }
    }

    pub fn double_click(&mut self, event: PointerEvent) {
        if !self.active {
            return;
        }
        if let Some(target) = self.input.double_click(event, &mut self.runtime) {
            info!(target_id = %target.0, "editing_target_selected");
            self.notices.push(StageNotice::EditingTargetChanged(target));
        }
    }

    pub fn apply(&mut self, action: PetAction) -> ActionOutcome {
        self.pet.apply(action)
    }

    pub fn snapshot(&self) -> StageSnapshot {
        StageSnapshot {
            active: self.active,
            now_ms: self.now().as_millis() as u64,
            rect: self.input.rect(),
            flags: self.flags,
            pet_controls: self.pet_controls,
            pet: self.pet.snapshot(),
            drag: self.input.drag_state(),
            drag_proxy: self.input.drag_proxy().cloned(),
            color_info: self.input.color_info(),
            question: self.question.clone(),
        }
    }

    fn sync_pet_position(&mut self) {
        let Some(target) = self.find_pet_target() else {
            return;
        };
        let rect = self.input.rect();
        let position = native_to_stage(target.position, &rect, self.runtime.native_size());
        self.pet.observe_pet_moved(position);
    }

    /// First target in runtime order that is either named like a pet or
    /// is the editing target.
    fn find_pet_target(&self) -> Option<TargetInfo> {
        let editing = self.runtime.editing_target();
        self.runtime.targets().into_iter().find(|target| {
            target.name.to_lowercase().contains(PET_NAME_MARKER)
                || editing.as_ref() == Some(&target.id)
        })
    }
}
