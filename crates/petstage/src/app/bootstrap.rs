use std::env;
use std::path::PathBuf;

use stage::{ConfigError, StageConfig};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::scenario::{Scenario, ScenarioError};

const SCENARIO_ENV_VAR: &str = "PETSTAGE_SCENARIO";

#[derive(Debug, Error)]
pub(crate) enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Scenario(#[from] ScenarioError),
}

pub(crate) struct AppWiring {
    pub(crate) config: StageConfig,
    pub(crate) scenario: Scenario,
}

pub(crate) fn build_app() -> Result<AppWiring, StartupError> {
    init_tracing();
    info!("=== Pet Stage Startup ===");

    let config = StageConfig::from_env()?;
    let scenario = match scenario_path() {
        Some(path) => {
            info!(path = %path.display(), "scenario_selected");
            Scenario::load_from_path(&path)?
        }
        None => {
            info!("scenario_demo_selected");
            Scenario::demo()?
        }
    };

    Ok(AppWiring { config, scenario })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn scenario_path() -> Option<PathBuf> {
    env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| {
            env::var(SCENARIO_ENV_VAR)
                .ok()
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
                .map(PathBuf::from)
        })
}
