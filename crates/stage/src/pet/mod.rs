mod items;
mod needs;
mod sim;
mod stats;

pub use items::{FoodId, FoodItem, FoodKind, WasteId, WasteItem};
pub use needs::{PetNeed, Reaction};
pub use sim::{ActionOutcome, PetAction, PetSimulation, PetSnapshot, RejectReason, SleepState};
pub use stats::{clamp_stat, PetStats, STAT_MAX, STAT_MIN};
