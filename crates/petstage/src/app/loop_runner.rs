use std::process::ExitCode;
use std::time::Duration;

use serde::Serialize;
use stage::{
    project, ActionOutcome, FoodId, MouseButton, PetAction, PointerEvent, PointerSource,
    StageConfig, StageController, StageNotice, StageView, Vec2, WasteId,
};
use tracing::{error, info, warn};

use super::bootstrap::AppWiring;
use super::scenario::{Command, Scenario, Step};
use super::scripted_runtime::{RuntimeSummary, ScriptedRuntime};

type Stage = StageController<ScriptedRuntime>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct ActionRecord {
    pub(crate) at_ms: u64,
    pub(crate) action: PetAction,
    pub(crate) outcome: ActionOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct ScenarioReport {
    pub(crate) final_ms: u64,
    pub(crate) view: StageView,
    pub(crate) notices: Vec<StageNotice>,
    pub(crate) actions: Vec<ActionRecord>,
    pub(crate) runtime: RuntimeSummary,
}

pub(crate) fn run(app: AppWiring) -> ExitCode {
    let report = execute(&app.scenario, app.config);
    match serde_json::to_string_pretty(&report) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "report_encode_failed");
            ExitCode::FAILURE
        }
    }
}

pub(crate) fn execute(scenario: &Scenario, config: StageConfig) -> ScenarioReport {
    let runtime = ScriptedRuntime::new(&scenario.sprites);
    let mut stage = StageController::activate(runtime, config, scenario.flags, scenario.rect);
    stage.set_pet_controls(scenario.pet_controls);

    let mut notices = Vec::new();
    let mut actions = Vec::new();
    for step in &scenario.steps {
        stage.advance_to(Duration::from_millis(step.at_ms));
        pump_runtime_events(&mut stage);
        apply_step(&mut stage, step, &mut actions);
        pump_runtime_events(&mut stage);
        collect_notices(&mut stage, &mut notices);
    }

    let final_ms = scenario.last_ms();
    stage.advance_to(Duration::from_millis(final_ms));
    pump_runtime_events(&mut stage);

    let view = project(&stage.snapshot());
    let runtime = stage.into_runtime();
    info!(
        final_ms,
        steps = scenario.steps.len(),
        notices = notices.len(),
        "scenario_finished"
    );

    ScenarioReport {
        final_ms,
        view,
        notices,
        actions,
        runtime: runtime.summary(),
    }
}

fn pump_runtime_events(stage: &mut Stage) {
    for event in stage.runtime_mut().drain_events() {
        stage.handle_runtime_event(event);
    }
}

/// Plays the host's state store: a picked colour ends colour-pick mode.
fn collect_notices(stage: &mut Stage, notices: &mut Vec<StageNotice>) {
    for notice in stage.take_notices() {
        if let StageNotice::ColorPicked(color) = &notice {
            info!(color = %color, "color_picker_closed");
            let mut flags = stage.flags();
            flags.color_picking = false;
            stage.set_flags(flags);
        }
        notices.push(notice);
    }
}

fn apply_step(stage: &mut Stage, step: &Step, actions: &mut Vec<ActionRecord>) {
    let at_ms = step.at_ms;
    match &step.command {
        Command::PointerDown { x, y, touch, button } => {
            let source = if *touch {
                PointerSource::Touch
            } else {
                PointerSource::Mouse(button.unwrap_or(MouseButton::Primary))
            };
            stage.pointer_down(PointerEvent {
                client: Vec2::new(*x, *y),
                source,
            });
        }
        Command::PointerMove { x, y } => stage.pointer_move(PointerEvent::mouse(*x, *y)),
        Command::PointerUp { x, y } => stage.pointer_up(PointerEvent::mouse(*x, *y)),
        Command::Wheel { delta_x, delta_y } => stage.wheel(*delta_x, *delta_y),
        Command::DoubleClick { x, y } => stage.double_click(PointerEvent::mouse(*x, *y)),
        Command::Feed => record(stage, at_ms, PetAction::Feed, actions),
        Command::Play => record(stage, at_ms, PetAction::Play, actions),
        Command::Clean => record(stage, at_ms, PetAction::Clean, actions),
        Command::Sleep => record(stage, at_ms, PetAction::Sleep, actions),
        Command::CollectFood { id } => {
            let id = id.map(FoodId).or_else(|| {
                stage
                    .pet()
                    .food_items()
                    .iter()
                    .find(|item| item.is_active())
                    .map(|item| item.id)
            });
            match id {
                Some(id) => record(stage, at_ms, PetAction::CollectFood(id), actions),
                None => warn!(at_ms, "no_food_to_collect"),
            }
        }
        Command::CleanWaste { id } => {
            let id = id.map(WasteId).or_else(|| {
                stage
                    .pet()
                    .waste_items()
                    .iter()
                    .find(|item| !item.fading)
                    .map(|item| item.id)
            });
            match id {
                Some(id) => record(stage, at_ms, PetAction::CleanWaste(id), actions),
                None => warn!(at_ms, "no_waste_to_clean"),
            }
        }
        Command::Ask { prompt } => stage.runtime_mut().ask(prompt),
        Command::Answer { text } => {
            if !stage.answer_question(text) {
                warn!(at_ms, "answer_without_question");
            }
        }
        Command::MoveSprite { name, x, y } => {
            stage.runtime_mut().move_sprite(name, Vec2::new(*x, *y));
        }
        Command::SetFlags { flags } => stage.set_flags(*flags),
        Command::SetPetControls { controls } => stage.set_pet_controls(*controls),
        Command::Resize { rect } => stage.update_rect(*rect),
        Command::Advance => {}
    }
}

fn record(stage: &mut Stage, at_ms: u64, action: PetAction, actions: &mut Vec<ActionRecord>) {
    let outcome = stage.apply(action);
    actions.push(ActionRecord {
        at_ms,
        action,
        outcome,
    });
}
