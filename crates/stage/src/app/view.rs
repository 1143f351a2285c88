use serde::Serialize;

use crate::pet::{FoodId, PetSnapshot, WasteId};

use super::controller::{PetControls, StageSnapshot};
use super::coords::{StageRect, Vec2};

const LEVEL_HIGH: u8 = 70;
const LEVEL_MID: u8 = 40;
const WASTE_EMOJI: &str = "💩";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatLevel {
    Good,
    Warn,
    Bad,
}

impl StatLevel {
    /// Bar colour band. Hunger reads inverted: a full bar is bad.
    fn classify(value: u8, high_is_bad: bool) -> Self {
        let (high, low) = if high_is_bad {
            (StatLevel::Bad, StatLevel::Good)
        } else {
            (StatLevel::Good, StatLevel::Bad)
        };
        if value > LEVEL_HIGH {
            high
        } else if value > LEVEL_MID {
            StatLevel::Warn
        } else {
            low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatBar {
    pub label: &'static str,
    pub percent: u8,
    pub level: StatLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ButtonView {
    pub label: String,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodView {
    pub id: FoodId,
    pub x: f32,
    pub y: f32,
    pub emoji: &'static str,
    pub fading: bool,
    pub clickable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WasteView {
    pub id: WasteId,
    pub x: f32,
    pub y: f32,
    pub emoji: &'static str,
    pub fading: bool,
    pub clickable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PetPanel {
    pub stats: Vec<StatBar>,
    pub feed: ButtonView,
    pub play: ButtonView,
    pub clean: ButtonView,
    pub sleep: ButtonView,
    pub food: Vec<FoodView>,
    pub waste: Vec<WasteView>,
    pub speech: Option<&'static str>,
    pub reaction: Option<&'static str>,
    pub sleep_banner: Option<String>,
    pub pet_position: Vec2,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoupeView {
    pub x: f32,
    pub y: f32,
    pub color: String,
}

/// Where the editor drag proxy is drawn, in stage-local pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProxyView {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Display-ready state for one frame of the stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageView {
    pub rect: StageRect,
    pub pet: Option<PetPanel>,
    pub loupe: Option<LoupeView>,
    pub color_picker_backdrop: bool,
    pub drag_proxy: Option<ProxyView>,
    pub question: Option<String>,
    pub monitors_draggable: bool,
    pub mic_indicator: bool,
    pub green_flag_overlay: bool,
}

pub fn project(snapshot: &StageSnapshot) -> StageView {
    let flags = snapshot.flags;
    let loupe = if flags.color_picking {
        snapshot.color_info.map(|info| LoupeView {
            x: info.x,
            y: info.y,
            color: info.color.to_hex(),
        })
    } else {
        None
    };

    StageView {
        rect: snapshot.rect,
        pet: snapshot
            .pet_controls
            .enabled
            .then(|| pet_panel(&snapshot.pet, &snapshot.pet_controls)),
        loupe,
        color_picker_backdrop: flags.color_picking,
        drag_proxy: snapshot.drag_proxy.as_ref().map(|proxy| ProxyView {
            x: proxy.anchor.x + proxy.translate.x,
            y: proxy.anchor.y + proxy.translate.y,
            width: proxy.width,
            height: proxy.height,
        }),
        question: snapshot.question.clone(),
        monitors_draggable: flags.use_editor_drag_style(),
        mic_indicator: flags.mic_indicator,
        green_flag_overlay: !flags.started,
    }
}

fn pet_panel(pet: &PetSnapshot, controls: &PetControls) -> PetPanel {
    let sleeping = pet.sleep.is_sleeping;
    let stats = pet.stats;

    PetPanel {
        stats: vec![
            stat_bar("Hunger", stats.hunger, true),
            stat_bar("Cleanliness", stats.cleanliness, false),
            stat_bar("Happiness", stats.happiness, false),
            stat_bar("Energy", stats.energy, false),
        ],
        feed: ButtonView {
            label: format!("Feed ({})", pet.collected_food),
            disabled: pet.collected_food == 0 || sleeping || controls.disable_feed,
        },
        play: button("Play", sleeping || controls.disable_play),
        clean: button("Clean", sleeping || controls.disable_clean),
        sleep: button("Sleep", sleeping || controls.disable_sleep),
        food: pet
            .food
            .iter()
            .map(|item| FoodView {
                id: item.id,
                x: item.x,
                y: item.y,
                emoji: item.kind.emoji(),
                fading: item.fading,
                clickable: !(sleeping || controls.disable_food),
            })
            .collect(),
        waste: pet
            .waste
            .iter()
            .map(|item| WasteView {
                id: item.id,
                x: item.x,
                y: item.y,
                emoji: WASTE_EMOJI,
                fading: item.fading,
                clickable: !(sleeping || controls.disable_waste),
            })
            .collect(),
        speech: pet.speech,
        reaction: pet.reaction,
        sleep_banner: sleeping
            .then(|| format!("Sleeping... Please wait ({})", pet.sleep.countdown)),
        pet_position: pet.pet_position,
    }
}

fn stat_bar(label: &'static str, value: u8, high_is_bad: bool) -> StatBar {
    StatBar {
        label,
        percent: value,
        level: StatLevel::classify(value, high_is_bad),
    }
}

fn button(label: &str, disabled: bool) -> ButtonView {
    ButtonView {
        label: label.to_string(),
        disabled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::color_picker::ColorInfo;
    use crate::app::controller::StageFlags;
    use crate::app::input::{DragProxy, DragState};
    use crate::app::runtime::Rgb;
    use crate::pet::{FoodItem, FoodKind, PetStats, SleepState};

    fn snapshot() -> StageSnapshot {
        StageSnapshot {
            active: true,
            now_ms: 0,
            rect: StageRect::default(),
            flags: StageFlags {
                started: true,
                ..StageFlags::default()
            },
            pet_controls: PetControls::default(),
            pet: PetSnapshot {
                stats: PetStats {
                    hunger: 75,
                    cleanliness: 41,
                    happiness: 40,
                    energy: 100,
                },
                collected_food: 0,
                food: vec![FoodItem {
                    id: FoodId(1),
                    x: 30.0,
                    y: 40.0,
                    kind: FoodKind::Fish,
                    collected: false,
                    fading: false,
                }],
                waste: Vec::new(),
                sleep: SleepState::default(),
                reaction: None,
                speech: None,
                pet_position: Vec2::default(),
            },
            drag: DragState {
                is_dragging: false,
                drag_id: None,
                drag_offset: None,
                mouse_down_position: None,
                hold_timer_armed: false,
            },
            drag_proxy: None,
            color_info: None,
            question: None,
        }
    }

    #[test]
    fn stat_levels_follow_bar_colours() {
        let view = project(&snapshot());
        let levels: Vec<_> = view
            .pet
            .expect("pet panel")
            .stats
            .iter()
            .map(|bar| bar.level)
            .collect();
        assert_eq!(
            levels,
            vec![StatLevel::Bad, StatLevel::Warn, StatLevel::Bad, StatLevel::Good]
        );
        assert_eq!(StatLevel::classify(20, true), StatLevel::Good);
    }

    #[test]
    fn feed_button_shows_count_and_needs_food() {
        let mut snap = snapshot();
        let panel = project(&snap).pet.expect("pet panel");
        assert_eq!(panel.feed.label, "Feed (0)");
        assert!(panel.feed.disabled);
        assert!(!panel.play.disabled);

        snap.pet.collected_food = 2;
        let panel = project(&snap).pet.expect("pet panel");
        assert_eq!(panel.feed.label, "Feed (2)");
        assert!(!panel.feed.disabled);
        assert_eq!(panel.food[0].emoji, "🐟");
    }

    #[test]
    fn sleeping_disables_everything_and_shows_banner() {
        let mut snap = snapshot();
        snap.pet.collected_food = 3;
        snap.pet.sleep = SleepState {
            is_sleeping: true,
            countdown: 12,
        };
        let panel = project(&snap).pet.expect("pet panel");
        assert!(panel.feed.disabled && panel.play.disabled);
        assert!(panel.clean.disabled && panel.sleep.disabled);
        assert!(!panel.food[0].clickable);
        assert_eq!(
            panel.sleep_banner.as_deref(),
            Some("Sleeping... Please wait (12)")
        );
    }

    #[test]
    fn disable_flags_and_pet_toggle() {
        let mut snap = snapshot();
        snap.pet_controls.disable_play = true;
        snap.pet_controls.disable_food = true;
        let panel = project(&snap).pet.expect("pet panel");
        assert!(panel.play.disabled);
        assert!(!panel.food[0].clickable);

        snap.pet_controls.enabled = false;
        assert!(project(&snap).pet.is_none());
    }

    #[test]
    fn overlays_follow_flags() {
        let mut snap = snapshot();
        snap.color_info = Some(ColorInfo {
            x: 5.0,
            y: 6.0,
            color: Rgb { r: 255, g: 0, b: 0 },
        });
        let view = project(&snap);
        assert!(view.loupe.is_none());
        assert!(!view.green_flag_overlay);
        assert!(view.monitors_draggable);

        snap.flags = StageFlags {
            color_picking: true,
            mic_indicator: true,
            full_screen: true,
            ..StageFlags::default()
        };
        let view = project(&snap);
        assert_eq!(view.loupe.map(|loupe| loupe.color), Some("#ff0000".to_string()));
        assert!(view.color_picker_backdrop);
        assert!(view.mic_indicator);
        assert!(view.green_flag_overlay);
        assert!(!view.monitors_draggable);
    }

    #[test]
    fn drag_proxy_is_placed_at_anchor_plus_pointer() {
        let mut snap = snapshot();
        snap.drag_proxy = Some(DragProxy {
            anchor: Vec2::new(-10.0, -12.0),
            translate: Vec2::new(100.0, 50.0),
            width: 20.0,
            height: 24.0,
            image_width: 20,
            image_height: 24,
            rgba: Vec::new(),
        });
        let proxy = project(&snap).drag_proxy.expect("proxy");
        assert_eq!(proxy.x, 90.0);
        assert_eq!(proxy.y, 38.0);
    }
}
