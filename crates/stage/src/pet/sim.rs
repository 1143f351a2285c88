use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info};

use crate::app::{TimerId, TimerQueue, Vec2, DEFAULT_STAGE_HEIGHT, DEFAULT_STAGE_WIDTH};
use crate::config::PetConfig;

use super::items::{random_spawn_point, FoodId, FoodItem, FoodKind, WasteId, WasteItem};
use super::needs::{PetNeed, Reaction};
use super::stats::{adjust, PetStats};

const FEED_HUNGER: i32 = -20;
const FEED_CLEANLINESS: i32 = -5;
const FEED_ENERGY: i32 = 5;
const PLAY_HAPPINESS: i32 = 20;
const PLAY_HUNGER: i32 = -5;
const PLAY_ENERGY: i32 = -10;
const CLEAN_CLEANLINESS: i32 = 10;
const CLEAN_ENERGY: i32 = -10;
const SLEEP_ENERGY: i32 = 30;
const SLEEP_HUNGER: i32 = -5;
const COLLECT_ENERGY: i32 = -2;
const WASTE_CLEAR_ENERGY: i32 = -8;
const DECAY_HUNGER: i32 = 3;
const DECAY_CLEANLINESS: i32 = -2;
const DECAY_CLEANLINESS_WITH_WASTE: i32 = -10;
const DECAY_HAPPINESS: i32 = -1;
const DECAY_ENERGY: i32 = -1;
const MOVE_ENERGY_DRAIN_MAX: f32 = 2.0;
const MOVE_CLEANLINESS_DRAIN_MAX: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PetTimer {
    NeedsCheck,
    Decay,
    FoodSpawn,
    WasteSpawn,
    SleepTick,
    ClearSpeech,
    ClearReaction,
    ExpireFood(FoodId),
    RemoveFood(FoodId),
    FinishCollect(FoodId),
    RemoveWaste(WasteId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "id", rename_all = "snake_case")]
pub enum PetAction {
    Feed,
    Play,
    Clean,
    Sleep,
    CollectFood(FoodId),
    CleanWaste(WasteId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RejectReason {
    Stopped,
    Sleeping,
    NoFoodCollected,
    UnknownItem,
    ItemUnavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActionOutcome {
    Applied,
    Rejected(RejectReason),
}

impl ActionOutcome {
    pub fn is_applied(self) -> bool {
        matches!(self, ActionOutcome::Applied)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SleepState {
    pub is_sleeping: bool,
    pub countdown: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PetSnapshot {
    pub stats: PetStats,
    pub collected_food: u32,
    pub food: Vec<FoodItem>,
    pub waste: Vec<WasteItem>,
    pub sleep: SleepState,
    pub reaction: Option<&'static str>,
    pub speech: Option<&'static str>,
    pub pet_position: Vec2,
}

/// The virtual pet living on top of the stage.
///
/// Construction arms the needs-check, decay and spawn intervals; `shutdown`
/// drops every pending timer. All deferred work is keyed by item id and
/// re-validated when it fires.
#[derive(Debug)]
pub struct PetSimulation {
    config: PetConfig,
    rng: StdRng,
    timers: TimerQueue<PetTimer>,
    running: bool,
    stats: PetStats,
    collected_food: u32,
    food: Vec<FoodItem>,
    waste: Vec<WasteItem>,
    next_item_id: u64,
    sleep: SleepState,
    sleep_timer: Option<TimerId>,
    reaction: Option<Reaction>,
    reaction_timer: Option<TimerId>,
    speech: Option<PetNeed>,
    pet_position: Vec2,
    stage_size: (f32, f32),
}

impl PetSimulation {
    pub fn new(config: PetConfig) -> Self {
        let mut timers = TimerQueue::new();
        timers.schedule_every(config.needs_check_interval(), PetTimer::NeedsCheck);
        timers.schedule_every(config.decay_interval(), PetTimer::Decay);
        timers.schedule_every(config.food_spawn_interval(), PetTimer::FoodSpawn);
        timers.schedule_every(config.waste_spawn_interval(), PetTimer::WasteSpawn);

        Self {
            rng: StdRng::seed_from_u64(config.seed),
            stats: PetStats::from_initial(config.initial_stats),
            config,
            timers,
            running: true,
            collected_food: 0,
            food: Vec::new(),
            waste: Vec::new(),
            next_item_id: 1,
            sleep: SleepState::default(),
            sleep_timer: None,
            reaction: None,
            reaction_timer: None,
            speech: None,
            pet_position: Vec2::default(),
            stage_size: (DEFAULT_STAGE_WIDTH, DEFAULT_STAGE_HEIGHT),
        }
    }

    pub fn shutdown(&mut self) {
        if !self.running {
            return;
        }
        self.timers.cancel_all();
        self.sleep_timer = None;
        self.reaction_timer = None;
        self.running = false;
        info!(now_ms = self.now().as_millis() as u64, "pet_shutdown");
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn advance_to(&mut self, now: Duration) {
        while let Some((_, timer)) = self.timers.pop_due(now) {
            self.fire(timer);
        }
        self.timers.settle_at(now);
    }

    pub fn set_stage_size(&mut self, width: f32, height: f32) {
        self.stage_size = (width, height);
    }

    pub fn stats(&self) -> PetStats {
        self.stats
    }

    pub fn collected_food(&self) -> u32 {
        self.collected_food
    }

    pub fn food_items(&self) -> &[FoodItem] {
        &self.food
    }

    pub fn waste_items(&self) -> &[WasteItem] {
        &self.waste
    }

    pub fn sleep(&self) -> SleepState {
        self.sleep
    }

    pub fn reaction_message(&self) -> Option<&'static str> {
        self.reaction.map(Reaction::message)
    }

    pub fn speech_message(&self) -> Option<&'static str> {
        self.speech.map(PetNeed::message)
    }

    pub fn speech_visible(&self) -> bool {
        self.speech.is_some()
    }

    pub fn pet_position(&self) -> Vec2 {
        self.pet_position
    }

    pub fn snapshot(&self) -> PetSnapshot {
        PetSnapshot {
            stats: self.stats,
            collected_food: self.collected_food,
            food: self.food.clone(),
            waste: self.waste.clone(),
            sleep: self.sleep,
            reaction: self.reaction_message(),
            speech: self.speech_message(),
            pet_position: self.pet_position,
        }
    }

    pub fn apply(&mut self, action: PetAction) -> ActionOutcome {
        let outcome = match action {
            PetAction::Feed => self.feed(),
            PetAction::Play => self.play(),
            PetAction::Clean => self.clean(),
            PetAction::Sleep => self.sleep_now(),
            PetAction::CollectFood(id) => self.collect_food(id),
            PetAction::CleanWaste(id) => self.clean_waste(id),
        };
        match outcome {
            ActionOutcome::Applied => info!(?action, stats = ?self.stats, "pet_action"),
            ActionOutcome::Rejected(reason) => debug!(?action, ?reason, "pet_action_rejected"),
        }
        outcome
    }

    pub fn feed(&mut self) -> ActionOutcome {
        if let Err(reason) = self.ensure_awake() {
            return ActionOutcome::Rejected(reason);
        }
        if self.collected_food == 0 {
            self.set_reaction(Reaction::NoFood);
            return ActionOutcome::Rejected(RejectReason::NoFoodCollected);
        }
        adjust(&mut self.stats.hunger, FEED_HUNGER);
        adjust(&mut self.stats.cleanliness, FEED_CLEANLINESS);
        adjust(&mut self.stats.energy, FEED_ENERGY);
        self.collected_food -= 1;
        self.set_reaction(Reaction::Fed);
        ActionOutcome::Applied
    }

    pub fn play(&mut self) -> ActionOutcome {
        if let Err(reason) = self.ensure_awake() {
            return ActionOutcome::Rejected(reason);
        }
        adjust(&mut self.stats.happiness, PLAY_HAPPINESS);
        adjust(&mut self.stats.hunger, PLAY_HUNGER);
        adjust(&mut self.stats.energy, PLAY_ENERGY);
        self.set_reaction(Reaction::Played);
        ActionOutcome::Applied
    }

    pub fn clean(&mut self) -> ActionOutcome {
        if let Err(reason) = self.ensure_awake() {
            return ActionOutcome::Rejected(reason);
        }
        adjust(&mut self.stats.cleanliness, CLEAN_CLEANLINESS);
        adjust(&mut self.stats.energy, CLEAN_ENERGY);
        self.set_reaction(Reaction::Cleaned);
        ActionOutcome::Applied
    }

    pub fn sleep_now(&mut self) -> ActionOutcome {
        if let Err(reason) = self.ensure_awake() {
            return ActionOutcome::Rejected(reason);
        }
        self.sleep = SleepState {
            is_sleeping: true,
            countdown: self.config.sleep_seconds,
        };
        adjust(&mut self.stats.energy, SLEEP_ENERGY);
        adjust(&mut self.stats.hunger, SLEEP_HUNGER);
        self.set_reaction(Reaction::FellAsleep);
        if self.sleep.countdown == 0 {
            self.wake();
        } else {
            self.sleep_timer = Some(
                self.timers
                    .schedule_every(self.config.sleep_tick(), PetTimer::SleepTick),
            );
        }
        ActionOutcome::Applied
    }

    pub fn collect_food(&mut self, id: FoodId) -> ActionOutcome {
        if let Err(reason) = self.ensure_awake() {
            return ActionOutcome::Rejected(reason);
        }
        let Some(item) = self.food.iter_mut().find(|item| item.id == id) else {
            return ActionOutcome::Rejected(RejectReason::UnknownItem);
        };
        if !item.is_active() {
            return ActionOutcome::Rejected(RejectReason::ItemUnavailable);
        }
        item.collected = true;
        self.timers
            .schedule_once(self.config.collect_delay(), PetTimer::FinishCollect(id));
        ActionOutcome::Applied
    }

    pub fn clean_waste(&mut self, id: WasteId) -> ActionOutcome {
        if let Err(reason) = self.ensure_awake() {
            return ActionOutcome::Rejected(reason);
        }
        let Some(item) = self.waste.iter_mut().find(|item| item.id == id) else {
            return ActionOutcome::Rejected(RejectReason::UnknownItem);
        };
        if item.fading {
            return ActionOutcome::Rejected(RejectReason::ItemUnavailable);
        }
        item.fading = true;
        self.timers
            .schedule_once(self.config.fade_out(), PetTimer::RemoveWaste(id));
        self.set_reaction(Reaction::WasteCleared);
        ActionOutcome::Applied
    }

    /// Returns `None` when the field already holds the maximum food count.
    pub fn spawn_food(&mut self) -> Option<FoodId> {
        if !self.running || self.food.len() >= self.config.max_food_items {
            return None;
        }
        let id = FoodId(self.allocate_item_id());
        let position = random_spawn_point(&mut self.rng, self.stage_size, self.config.spawn_margin_px);
        let kind = FoodKind::random(&mut self.rng);
        self.food.push(FoodItem {
            id,
            x: position.x,
            y: position.y,
            kind,
            collected: false,
            fading: false,
        });
        self.timers
            .schedule_once(self.config.food_lifetime(), PetTimer::ExpireFood(id));
        debug!(food_id = id.0, ?kind, x = position.x, y = position.y, "food_spawned");
        Some(id)
    }

    /// At most one waste item exists at a time.
    pub fn spawn_waste(&mut self) -> Option<WasteId> {
        if !self.running || !self.waste.is_empty() {
            return None;
        }
        let id = WasteId(self.allocate_item_id());
        let position = random_spawn_point(&mut self.rng, self.stage_size, self.config.spawn_margin_px);
        self.waste.push(WasteItem {
            id,
            x: position.x,
            y: position.y,
            fading: false,
        });
        debug!(waste_id = id.0, x = position.x, y = position.y, "waste_spawned");
        Some(id)
    }

    /// The pet sprite moved under program control; moving costs a little.
    pub fn observe_pet_moved(&mut self, stage_position: Vec2) {
        self.pet_position = stage_position;
        if !self.running {
            return;
        }
        let energy_drain = (self.rng.gen::<f32>() * MOVE_ENERGY_DRAIN_MAX).round() as i32;
        let cleanliness_drain = (self.rng.gen::<f32>() * MOVE_CLEANLINESS_DRAIN_MAX).round() as i32;
        adjust(&mut self.stats.energy, -energy_drain);
        adjust(&mut self.stats.cleanliness, -cleanliness_drain);
    }

    fn fire(&mut self, timer: PetTimer) {
        match timer {
            PetTimer::NeedsCheck => self.check_needs(),
            PetTimer::Decay => self.decay(),
            PetTimer::FoodSpawn => {
                self.spawn_food();
            }
            PetTimer::WasteSpawn => {
                self.spawn_waste();
            }
            PetTimer::SleepTick => self.tick_sleep(),
            PetTimer::ClearSpeech => self.speech = None,
            PetTimer::ClearReaction => {
                self.reaction = None;
                self.reaction_timer = None;
            }
            PetTimer::ExpireFood(id) => self.expire_food(id),
            PetTimer::RemoveFood(id) => self.food.retain(|item| item.id != id),
            PetTimer::FinishCollect(id) => self.finish_collect(id),
            PetTimer::RemoveWaste(id) => self.remove_waste(id),
        }
    }

    fn check_needs(&mut self) {
        if self.speech.is_some() {
            return;
        }
        if let Some(need) = PetNeed::evaluate(&self.stats) {
            self.speech = Some(need);
            self.timers
                .schedule_once(self.config.speech(), PetTimer::ClearSpeech);
            debug!(?need, "pet_speech");
        }
    }

    fn decay(&mut self) {
        let cleanliness = if self.waste.is_empty() {
            DECAY_CLEANLINESS
        } else {
            DECAY_CLEANLINESS_WITH_WASTE
        };
        adjust(&mut self.stats.hunger, DECAY_HUNGER);
        adjust(&mut self.stats.cleanliness, cleanliness);
        adjust(&mut self.stats.happiness, DECAY_HAPPINESS);
        adjust(&mut self.stats.energy, DECAY_ENERGY);
        debug!(stats = ?self.stats, "pet_decay");
    }

    fn tick_sleep(&mut self) {
        if self.sleep.countdown <= 1 {
            self.wake();
        } else {
            self.sleep.countdown -= 1;
        }
    }

    fn wake(&mut self) {
        if let Some(timer) = self.sleep_timer.take() {
            self.timers.cancel(timer);
        }
        self.sleep = SleepState::default();
        info!("pet_woke_up");
    }

    fn expire_food(&mut self, id: FoodId) {
        let Some(item) = self.food.iter_mut().find(|item| item.id == id) else {
            return;
        };
        if item.collected || item.fading {
            return;
        }
        item.fading = true;
        self.timers
            .schedule_once(self.config.fade_out(), PetTimer::RemoveFood(id));
    }

    fn finish_collect(&mut self, id: FoodId) {
        let Some(index) = self
            .food
            .iter()
            .position(|item| item.id == id && item.collected)
        else {
            debug!(food_id = id.0, "collect_target_gone");
            return;
        };
        self.food.remove(index);
        self.collected_food = self.collected_food.saturating_add(1);
        adjust(&mut self.stats.energy, COLLECT_ENERGY);
    }

    fn remove_waste(&mut self, id: WasteId) {
        let before = self.waste.len();
        self.waste.retain(|item| item.id != id);
        if self.waste.len() != before {
            adjust(&mut self.stats.energy, WASTE_CLEAR_ENERGY);
        }
    }

    fn set_reaction(&mut self, reaction: Reaction) {
        self.reaction = Some(reaction);
        if let Some(previous) = self.reaction_timer.take() {
            self.timers.cancel(previous);
        }
        self.reaction_timer = Some(
            self.timers
                .schedule_once(self.config.reaction(), PetTimer::ClearReaction),
        );
    }

    fn ensure_awake(&self) -> Result<(), RejectReason> {
        if !self.running {
            Err(RejectReason::Stopped)
        } else if self.sleep.is_sleeping {
            Err(RejectReason::Sleeping)
        } else {
            Ok(())
        }
    }

    fn allocate_item_id(&mut self) -> u64 {
        let id = self.next_item_id;
        self.next_item_id += 1;
        id
    }

    #[cfg(test)]
    pub(crate) fn set_stats(&mut self, stats: PetStats) {
        self.stats = stats;
    }

    #[cfg(test)]
    pub(crate) fn set_collected_food(&mut self, count: u32) {
        self.collected_food = count;
    }
}
