//! Batch rendering of every view to SVG files.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pulse_charts::scene::Scene;
use pulse_charts::svg::to_svg_string;
use pulse_core::{load_csv, LoadOptions};

use crate::config::{ExerciseConfig, PulseConfig};
use crate::controller::ExerciseDashboard;
use crate::survey::{conditions_by_gender_scene, treatment_by_gender_scene, treatment_flow_scene};

/// Render the three mental health views and both exercise charts into `config.output.dir`.
///
/// Returns the written paths.
pub fn render_all(config: &PulseConfig) -> Result<Vec<PathBuf>> {
    let out = &config.output.dir;
    std::fs::create_dir_all(out)
        .with_context(|| format!("Failed to create output directory {}", out.display()))?;
    let mut written = Vec::new();

    let students = load_csv(&config.data.mental_health, LoadOptions::raw())
        .with_context(|| format!("Failed to load {}", config.data.mental_health.display()))?;
    tracing::info!("mental health survey: {} records", students.len());
    for (name, scene) in [
        ("conditions-by-gender.svg", conditions_by_gender_scene(&students)?),
        ("treatment-by-gender.svg", treatment_by_gender_scene(&students)?),
        (
            "treatment-flow.svg",
            treatment_flow_scene(&students, &config.mental_health)?,
        ),
    ] {
        written.push(write_scene(out, name, &scene)?);
    }

    let exercise = ExerciseConfig {
        animation_ms: 0,
        ..config.exercise.clone()
    };
    let mut dashboard = ExerciseDashboard::new(exercise)?;
    dashboard.load_path(&config.data.exercise)?;
    written.push(write_scene(out, "exercise-bars.svg", dashboard.scene())?);
    dashboard.toggle_mode()?;
    written.push(write_scene(out, "exercise-pie.svg", dashboard.scene())?);

    Ok(written)
}

fn write_scene(dir: &Path, name: &str, scene: &Scene) -> Result<PathBuf> {
    let path = dir.join(name);
    std::fs::write(&path, to_svg_string(scene))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("wrote {} ({} marks)", path.display(), scene.len());
    Ok(path)
}
