//! Pulse App
//!
//! The dashboards built on `pulse_core` and `pulse_charts`:
//!
//! - [`controller::ExerciseDashboard`]: bar/pie toggle with grouping and brushing
//! - [`survey`]: the static mental health views
//! - `headless_*`: scripted scenarios with assertions and a JSON report
//! - [`config::PulseConfig`]: `pulse.toml`

pub mod config;
pub mod controller;
pub mod headless_assert;
pub mod headless_report;
pub mod headless_runner;
pub mod headless_runtime;
pub mod headless_scenario;
pub mod render;
pub mod survey;

pub use config::PulseConfig;
pub use controller::{ExerciseDashboard, Phase};
pub use headless_report::{HeadlessReport, ReportStatus};
pub use headless_runner::{run_loaded_scenario, run_scenario, RunOutcome};
pub use headless_runtime::HeadlessRunConfig;
pub use headless_scenario::{HeadlessScenario, ScenarioStep};
