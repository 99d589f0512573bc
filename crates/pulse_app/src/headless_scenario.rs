//! Scenario definition for headless dashboard runs.

use anyhow::{Context, Result};
use pulse_core::ChartMode;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Sequence of control events, frame advances and assertions.
#[derive(Debug, Clone, Deserialize)]
pub struct HeadlessScenario {
    pub steps: Vec<ScenarioStep>,
}

impl HeadlessScenario {
    /// Load a scenario from JSON text.
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Load a scenario from file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("Failed to parse {}", path.display()))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioStep {
    ToggleMode,
    SetGrouping {
        field: String,
    },
    /// A finished brush; `null` clears the selection
    Brush {
        range: Option<(f32, f32)>,
    },
    /// A full pointer drag over the plot area
    Drag {
        from: f32,
        to: f32,
    },
    ClearSelection,
    Wait {
        ms: u64,
    },
    Tick {
        frames: u32,
    },
    AssertMode {
        mode: ChartMode,
    },
    AssertSelectionEmpty,
    AssertBucket {
        primary: String,
        #[serde(default)]
        secondary: Option<String>,
        value: f64,
    },
    AssertHighlighted {
        count: usize,
    },
    /// Write the current scene as SVG
    Snapshot {
        path: PathBuf,
    },
}

impl ScenarioStep {
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioStep::ToggleMode => "toggle_mode",
            ScenarioStep::SetGrouping { .. } => "set_grouping",
            ScenarioStep::Brush { .. } => "brush",
            ScenarioStep::Drag { .. } => "drag",
            ScenarioStep::ClearSelection => "clear_selection",
            ScenarioStep::Wait { .. } => "wait",
            ScenarioStep::Tick { .. } => "tick",
            ScenarioStep::AssertMode { .. } => "assert_mode",
            ScenarioStep::AssertSelectionEmpty => "assert_selection_empty",
            ScenarioStep::AssertBucket { .. } => "assert_bucket",
            ScenarioStep::AssertHighlighted { .. } => "assert_highlighted",
            ScenarioStep::Snapshot { .. } => "snapshot",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_step_kind() {
        let scenario = HeadlessScenario::from_json(
            r#"{ "steps": [
                { "type": "toggle_mode" },
                { "type": "set_grouping", "field": "Gender" },
                { "type": "brush", "range": [100.0, 250.0] },
                { "type": "brush", "range": null },
                { "type": "drag", "from": 90.0, "to": 260.0 },
                { "type": "clear_selection" },
                { "type": "wait", "ms": 100 },
                { "type": "tick", "frames": 60 },
                { "type": "assert_mode", "mode": "pie" },
                { "type": "assert_selection_empty" },
                { "type": "assert_bucket", "primary": "1-2 times a week", "value": 4.0 },
                { "type": "assert_highlighted", "count": 2 },
                { "type": "snapshot", "path": "out/step.svg" }
            ]}"#,
        )
        .unwrap();
        assert_eq!(scenario.steps.len(), 13);
        assert!(matches!(
            scenario.steps[2],
            ScenarioStep::Brush {
                range: Some((a, b))
            } if a == 100.0 && b == 250.0
        ));
        assert!(matches!(
            scenario.steps[8],
            ScenarioStep::AssertMode {
                mode: ChartMode::Pie
            }
        ));
        assert!(matches!(
            &scenario.steps[10],
            ScenarioStep::AssertBucket { secondary: None, .. }
        ));
    }

    #[test]
    fn unknown_step_is_an_error() {
        assert!(HeadlessScenario::from_json(r#"{ "steps": [{ "type": "explode" }] }"#).is_err());
    }
}
