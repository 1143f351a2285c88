mod color_picker;
mod controller;
mod coords;
mod input;
mod runtime;
mod timers;
mod view;

#[cfg(test)]
pub(crate) mod test_support;

pub use color_picker::ColorInfo;
pub use controller::{PetControls, StageController, StageFlags, StageNotice, StageSnapshot};
pub use coords::{
    native_to_stage, stage_to_native, StageRect, Vec2, DEFAULT_STAGE_HEIGHT, DEFAULT_STAGE_WIDTH,
};
pub use input::{DragProxy, DragState, MouseButton, PointerEvent, PointerInput, PointerSource};
pub use runtime::{
    DrawableExtraction, DrawableId, IoData, ListenerId, MouseData, Rgb, RuntimeEvent,
    RuntimeEventKind, SpriteInfo, StageRuntime, TargetId, TargetInfo, WheelData,
};
pub use timers::{TimerId, TimerQueue};
pub use view::{
    project, ButtonView, FoodView, LoupeView, PetPanel, ProxyView, StageView, StatBar, StatLevel,
    WasteView,
};
