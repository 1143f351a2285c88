pub mod app;
pub mod config;
pub mod pet;

pub use app::{
    native_to_stage, project, stage_to_native, ColorInfo, DragProxy, DragState, DrawableExtraction,
    DrawableId, IoData, ListenerId, MouseButton, MouseData, PetControls, PointerEvent,
    PointerInput, PointerSource, Rgb, RuntimeEvent, RuntimeEventKind, SpriteInfo, StageController,
    StageFlags, StageNotice, StageRect, StageRuntime, StageSnapshot, StageView, TargetId,
    TargetInfo, TimerId, TimerQueue, Vec2, WheelData, DEFAULT_STAGE_HEIGHT, DEFAULT_STAGE_WIDTH,
};
pub use config::{
    ConfigError, InitialStats, InputConfig, PetConfig, StageConfig, CONFIG_ENV_VAR, SEED_ENV_VAR,
};
pub use pet::{
    ActionOutcome, FoodId, FoodItem, FoodKind, PetAction, PetNeed, PetSimulation, PetSnapshot,
    PetStats, Reaction, RejectReason, SleepState, WasteId, WasteItem,
};
