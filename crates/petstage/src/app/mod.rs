mod bootstrap;
mod loop_runner;
mod scenario;
mod scripted_runtime;

pub(crate) use bootstrap::build_app;
pub(crate) use loop_runner::run;
