//! Scenario runner that drives an [`ExerciseDashboard`] headlessly.

use std::path::Path;

use anyhow::{Context, Result};

use crate::controller::ExerciseDashboard;
use crate::headless_assert::{
    evaluate_assert_bucket, evaluate_assert_highlighted, evaluate_assert_mode,
    evaluate_assert_selection_empty, AssertionResult, DashboardSnapshot,
};
use crate::headless_report::{create_parent_dirs, ensure_relative_output, HeadlessReport};
use crate::headless_runtime::{HeadlessRunConfig, HeadlessRuntime};
use crate::headless_scenario::{HeadlessScenario, ScenarioStep};

/// Final outcome of a scenario run.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Passed { report: HeadlessReport },
    Failed { report: HeadlessReport },
}

impl RunOutcome {
    pub fn report(&self) -> &HeadlessReport {
        match self {
            RunOutcome::Passed { report } => report,
            RunOutcome::Failed { report } => report,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RunOutcome::Failed { .. })
    }
}

/// Logical clock of a run.
#[derive(Debug, Clone, Copy, Default)]
struct Clock {
    frames: u64,
    ms: u64,
}

/// Execute scenario JSON against a loaded dashboard.
pub fn run_scenario(
    dashboard: &mut ExerciseDashboard,
    input: &str,
    runtime_cfg: HeadlessRunConfig,
    snapshot_root: &Path,
) -> Result<RunOutcome> {
    let scenario = HeadlessScenario::from_json(input)?;
    run_loaded_scenario(dashboard, &scenario, runtime_cfg, snapshot_root)
}

/// Execute a pre-loaded scenario. The first failing assertion ends the run.
pub fn run_loaded_scenario(
    dashboard: &mut ExerciseDashboard,
    scenario: &HeadlessScenario,
    runtime_cfg: HeadlessRunConfig,
    snapshot_root: &Path,
) -> Result<RunOutcome> {
    let mut clock = Clock::default();

    for (step_index, step) in scenario.steps.iter().enumerate() {
        tracing::debug!("step {step_index}: {}", step.name());
        let verdict = match step {
            ScenarioStep::ToggleMode => {
                dashboard.toggle_mode()?;
                None
            }
            ScenarioStep::SetGrouping { field } => {
                dashboard.set_grouping(field)?;
                None
            }
            ScenarioStep::Brush { range } => {
                dashboard.brush_end(*range)?;
                None
            }
            ScenarioStep::Drag { from, to } => {
                dashboard.begin_brush(*from);
                dashboard.drag_brush(*to);
                dashboard.end_brush()?;
                None
            }
            ScenarioStep::ClearSelection => {
                dashboard.clear_selection()?;
                None
            }
            ScenarioStep::Wait { ms } => {
                let frames = wait_frames(*ms, runtime_cfg.tick_ms);
                run_frames(dashboard, runtime_cfg, frames, &mut clock)?;
                None
            }
            ScenarioStep::Tick { frames } => {
                run_frames(dashboard, runtime_cfg, *frames, &mut clock)?;
                None
            }
            ScenarioStep::AssertMode { mode } => Some(evaluate_assert_mode(
                *mode,
                &DashboardSnapshot::capture(dashboard),
            )),
            ScenarioStep::AssertSelectionEmpty => Some(evaluate_assert_selection_empty(
                &DashboardSnapshot::capture(dashboard),
            )),
            ScenarioStep::AssertBucket {
                primary,
                secondary,
                value,
            } => Some(evaluate_assert_bucket(
                primary,
                secondary.as_deref(),
                *value,
                &DashboardSnapshot::capture(dashboard),
            )),
            ScenarioStep::AssertHighlighted { count } => Some(evaluate_assert_highlighted(
                *count,
                &DashboardSnapshot::capture(dashboard),
            )),
            ScenarioStep::Snapshot { path } => {
                write_snapshot(dashboard, snapshot_root, path)?;
                None
            }
        };

        if let Some(AssertionResult::Failed { message, .. }) = verdict {
            tracing::warn!("step {step_index} ({}) failed: {message}", step.name());
            let report =
                HeadlessReport::failed(step.name(), step_index, message, clock.frames, clock.ms);
            return Ok(RunOutcome::Failed { report });
        }
    }

    Ok(RunOutcome::Passed {
        report: HeadlessReport::passed(scenario.steps.len(), clock.frames, clock.ms),
    })
}

fn run_frames(
    dashboard: &mut ExerciseDashboard,
    runtime_cfg: HeadlessRunConfig,
    frames: u32,
    clock: &mut Clock,
) -> Result<()> {
    if frames == 0 {
        return Ok(());
    }
    let mut cfg = runtime_cfg;
    cfg.max_frames = frames;
    HeadlessRuntime::run(cfg, |ctx| {
        dashboard.tick(ctx.dt_seconds);
        clock.frames = clock.frames.saturating_add(1);
        clock.ms = clock.ms.saturating_add(runtime_cfg.tick_ms);
    })
}

fn write_snapshot(dashboard: &ExerciseDashboard, root: &Path, path: &Path) -> Result<()> {
    ensure_relative_output(path)?;
    let target = root.join(path);
    create_parent_dirs(&target)?;
    std::fs::write(&target, dashboard.svg())
        .with_context(|| format!("Failed to write snapshot {}", target.display()))?;
    tracing::info!("snapshot written to {}", target.display());
    Ok(())
}

fn wait_frames(wait_ms: u64, tick_ms: u64) -> u32 {
    if wait_ms == 0 {
        return 0;
    }
    let tick = tick_ms.max(1);
    let frames = wait_ms.saturating_add(tick.saturating_sub(1)) / tick;
    frames.min(u32::MAX as u64) as u32
}
