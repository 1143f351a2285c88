use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use stage::{MouseButton, PetControls, StageFlags, StageRect};
use thiserror::Error;

use super::scripted_runtime::SpriteSpec;

pub(crate) const DEMO_SCENARIO: &str = include_str!("../../scenarios/demo.json");

#[derive(Debug, Error)]
pub(crate) enum ScenarioError {
    #[error("failed to read scenario {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse scenario json at {json_path}: {source}")]
    Parse {
        json_path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("scenario step {index} at {at_ms}ms is earlier than the step before it")]
    OutOfOrder { index: usize, at_ms: u64 },
    #[error("scenario step {index} moves unknown sprite {name:?}")]
    UnknownSprite { index: usize, name: String },
}

/// A scripted session: the stage setup plus timestamped host events.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct Scenario {
    #[serde(default)]
    pub(crate) flags: StageFlags,
    #[serde(default)]
    pub(crate) rect: StageRect,
    #[serde(default)]
    pub(crate) pet_controls: PetControls,
    #[serde(default)]
    pub(crate) sprites: Vec<SpriteSpec>,
    #[serde(default)]
    pub(crate) steps: Vec<Step>,
    /// Clock time to run to after the last step.
    #[serde(default)]
    pub(crate) end_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct Step {
    pub(crate) at_ms: u64,
    pub(crate) command: Command,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum Command {
    PointerDown {
        x: f32,
        y: f32,
        #[serde(default)]
        touch: bool,
        #[serde(default)]
        button: Option<MouseButton>,
    },
    PointerMove {
        x: f32,
        y: f32,
    },
    PointerUp {
        x: f32,
        y: f32,
    },
    Wheel {
        delta_x: f32,
        delta_y: f32,
    },
    DoubleClick {
        x: f32,
        y: f32,
    },
    Feed,
    Play,
    Clean,
    Sleep,
    /// Without an id the oldest collectable food item is used.
    CollectFood {
        #[serde(default)]
        id: Option<u64>,
    },
    CleanWaste {
        #[serde(default)]
        id: Option<u64>,
    },
    Ask {
        prompt: String,
    },
    Answer {
        text: String,
    },
    MoveSprite {
        name: String,
        x: f32,
        y: f32,
    },
    SetFlags {
        flags: StageFlags,
    },
    SetPetControls {
        controls: PetControls,
    },
    Resize {
        rect: StageRect,
    },
    Advance,
}

impl Scenario {
    pub(crate) fn from_json_str(raw: &str) -> Result<Self, ScenarioError> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        let scenario: Scenario = serde_path_to_error::deserialize(&mut deserializer).map_err(
            |error| {
                let json_path = error.path().to_string();
                ScenarioError::Parse {
                    json_path,
                    source: error.into_inner(),
                }
            },
        )?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub(crate) fn load_from_path(path: &Path) -> Result<Self, ScenarioError> {
        let raw = fs::read_to_string(path).map_err(|source| ScenarioError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub(crate) fn demo() -> Result<Self, ScenarioError> {
        Self::from_json_str(DEMO_SCENARIO)
    }

    pub(crate) fn last_ms(&self) -> u64 {
        let last_step = self.steps.last().map_or(0, |step| step.at_ms);
        self.end_ms.map_or(last_step, |end| end.max(last_step))
    }

    fn validate(&self) -> Result<(), ScenarioError> {
        let mut previous = 0;
        for (index, step) in self.steps.iter().enumerate() {
            if step.at_ms < previous {
                return Err(ScenarioError::OutOfOrder {
                    index,
                    at_ms: step.at_ms,
                });
            }
            previous = step.at_ms;

            if let Command::MoveSprite { name, .. } = &step.command {
                if !self.sprites.iter().any(|sprite| &sprite.name == name) {
                    return Err(ScenarioError::UnknownSprite {
                        index,
                        name: name.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
