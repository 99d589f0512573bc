//! Pulse configuration file handling

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use pulse_charts::transition::DEFAULT_DURATION_MS;

/// Top-level Pulse configuration (pulse.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PulseConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub exercise: ExerciseConfig,
    #[serde(default)]
    pub mental_health: MentalHealthConfig,
}

/// Dataset locations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DataConfig {
    /// Exercise survey, loaded with typed cells
    #[serde(default = "default_exercise_csv")]
    pub exercise: PathBuf,
    /// Student mental health survey, loaded as raw text
    #[serde(default = "default_mental_health_csv")]
    pub mental_health: PathBuf,
}

fn default_exercise_csv() -> PathBuf {
    PathBuf::from("data/survey 605.csv")
}

fn default_mental_health_csv() -> PathBuf {
    PathBuf::from("data/Student Mental health.csv")
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            exercise: default_exercise_csv(),
            mental_health: default_mental_health_csv(),
        }
    }
}

/// Where rendered SVGs and reports go
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("out")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct MarginConfig {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

/// Bar/pie toggle view
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExerciseConfig {
    #[serde(default = "default_exercise_width")]
    pub width: f32,
    #[serde(default = "default_exercise_height")]
    pub height: f32,
    #[serde(default = "default_exercise_margin")]
    pub margin: MarginConfig,
    /// Columns offered in the grouping selector; empty allows every column
    #[serde(default)]
    pub grouping_options: Vec<String>,
    #[serde(default = "default_duration_ms")]
    pub animation_ms: u32,
}

fn default_exercise_width() -> f32 {
    700.0
}

fn default_exercise_height() -> f32 {
    450.0
}

fn default_exercise_margin() -> MarginConfig {
    MarginConfig {
        top: 60.0,
        right: 300.0,
        bottom: 100.0,
        left: 60.0,
    }
}

fn default_duration_ms() -> u32 {
    DEFAULT_DURATION_MS
}

impl Default for ExerciseConfig {
    fn default() -> Self {
        Self {
            width: default_exercise_width(),
            height: default_exercise_height(),
            margin: default_exercise_margin(),
            grouping_options: Vec::new(),
            animation_ms: default_duration_ms(),
        }
    }
}

/// Static mental health views
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MentalHealthConfig {
    /// Canvas of the condition → treatment flow
    #[serde(default = "default_flow_width")]
    pub flow_width: f32,
    #[serde(default = "default_flow_height")]
    pub flow_height: f32,
}

fn default_flow_width() -> f32 {
    600.0
}

fn default_flow_height() -> f32 {
    400.0
}

impl Default for MentalHealthConfig {
    fn default() -> Self {
        Self {
            flow_width: default_flow_width(),
            flow_height: default_flow_height(),
        }
    }
}

impl PulseConfig {
    /// Load configuration from a file or a directory containing pulse.toml.
    ///
    /// A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let config_path = if path.is_dir() {
            path.join("pulse.toml")
        } else {
            path.to_path_buf()
        };

        if !config_path.exists() {
            tracing::info!(
                "no config at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: PulseConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    fn validate(&self) -> Result<()> {
        let e = &self.exercise;
        anyhow::ensure!(
            e.width > e.margin.left + e.margin.right && e.height > e.margin.top + e.margin.bottom,
            "exercise canvas {}x{} leaves no room inside its margins",
            e.width,
            e.height
        );
        anyhow::ensure!(
            self.mental_health.flow_width > 2.0 && self.mental_health.flow_height > 7.0,
            "flow canvas is too small"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = PulseConfig::from_toml("").unwrap();
        assert_eq!(config.exercise.width, 700.0);
        assert_eq!(config.exercise.margin.right, 300.0);
        assert_eq!(config.exercise.animation_ms, 800);
        assert_eq!(config.mental_health.flow_height, 400.0);
        assert_eq!(config.output.dir, PathBuf::from("out"));
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = PulseConfig::from_toml(
            r#"
            [exercise]
            grouping_options = ["Gender", "Age"]
            animation_ms = 0

            [data]
            exercise = "fixtures/exercise.csv"
            "#,
        )
        .unwrap();
        assert_eq!(config.exercise.grouping_options, ["Gender", "Age"]);
        assert_eq!(config.exercise.animation_ms, 0);
        assert_eq!(config.exercise.height, 450.0);
        assert_eq!(config.data.exercise, PathBuf::from("fixtures/exercise.csv"));
        assert_eq!(
            config.data.mental_health,
            PathBuf::from("data/Student Mental health.csv")
        );
    }

    #[test]
    fn margins_wider_than_canvas_are_rejected() {
        let err = PulseConfig::from_toml("[exercise]\nwidth = 300.0\n").unwrap_err();
        assert!(err.to_string().contains("no room"));
    }

    #[test]
    fn config_round_trips_through_toml() {
        let text = PulseConfig::default().to_toml().unwrap();
        let back = PulseConfig::from_toml(&text).unwrap();
        assert_eq!(back.exercise.margin, default_exercise_margin());
    }
}
