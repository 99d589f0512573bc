use std::path::PathBuf;

use pulse_app::config::ExerciseConfig;
use pulse_app::survey::EXERCISE_FIELD;
use pulse_app::{run_scenario, ExerciseDashboard, HeadlessRunConfig, ReportStatus, RunOutcome};
use pulse_core::{ChartMode, Dataset};

fn survey() -> Dataset {
    let rows: Vec<[&str; 2]> = vec![
        ["Less than once a week", "Male"],
        ["Less than once a week", "Female"],
        ["Less than once a week", "Female"],
        ["1-2 times a week", "Male"],
        ["1-2 times a week", "Male"],
        ["1-2 times a week", "Female"],
        ["1-2 times a week", "Other"],
        ["3-4 times a week", "Male"],
        ["3-4 times a week", "Female"],
        ["3-4 times a week", "Female"],
    ];
    let rows: Vec<&[&str]> = rows.iter().map(|r| &r[..]).collect();
    Dataset::from_text_rows(&[EXERCISE_FIELD, "Gender"], &rows).unwrap()
}

fn dashboard(animation_ms: u32) -> ExerciseDashboard {
    let config = ExerciseConfig {
        animation_ms,
        ..ExerciseConfig::default()
    };
    let mut dashboard = ExerciseDashboard::new(config).unwrap();
    dashboard.finish_loading(Ok(survey())).unwrap();
    dashboard
}

fn snapshot_root() -> PathBuf {
    std::env::temp_dir().join(format!("pulse-scenarios-{}", std::process::id()))
}

#[test]
fn counts_are_zero_filled_in_declared_order() {
    let mut d = dashboard(0);
    let outcome = run_scenario(
        &mut d,
        r#"{ "steps": [
            { "type": "assert_mode", "mode": "bars" },
            { "type": "assert_bucket", "primary": "Less than once a week", "value": 3 },
            { "type": "assert_bucket", "primary": "1-2 times a week", "value": 4 },
            { "type": "assert_bucket", "primary": "5 or more times a week", "value": 0 },
            { "type": "assert_highlighted", "count": 4 }
        ] }"#,
        HeadlessRunConfig::default(),
        &snapshot_root(),
    )
    .unwrap();

    assert!(!outcome.is_failed(), "{:?}", outcome.report());
    assert_eq!(outcome.report().steps_run, 5);
    let order: Vec<&str> = d.buckets().iter().map(|b| b.primary.as_str()).collect();
    assert_eq!(
        order,
        [
            "Less than once a week",
            "1-2 times a week",
            "3-4 times a week",
            "5 or more times a week",
        ]
    );
}

#[test]
fn changing_grouping_clears_the_selection() {
    let mut d = dashboard(0);
    let outcome = run_scenario(
        &mut d,
        r#"{ "steps": [
            { "type": "brush", "range": [60, 400] },
            { "type": "assert_highlighted", "count": 4 },
            { "type": "set_grouping", "field": "Gender" },
            { "type": "assert_selection_empty" },
            { "type": "assert_bucket", "primary": "1-2 times a week", "secondary": "Male", "value": 2 },
            { "type": "assert_bucket", "primary": "5 or more times a week", "secondary": "Other", "value": 0 },
            { "type": "assert_highlighted", "count": 12 }
        ] }"#,
        HeadlessRunConfig::default(),
        &snapshot_root(),
    )
    .unwrap();

    assert!(!outcome.is_failed(), "{:?}", outcome.report());
    assert_eq!(d.buckets().len(), 12);
}

#[test]
fn pie_mode_ignores_brushes_and_keeps_counts() {
    let mut d = dashboard(0);
    let outcome = run_scenario(
        &mut d,
        r#"{ "steps": [
            { "type": "toggle_mode" },
            { "type": "assert_mode", "mode": "pie" },
            { "type": "brush", "range": [60, 200] },
            { "type": "assert_selection_empty" },
            { "type": "assert_bucket", "primary": "3-4 times a week", "value": 3 },
            { "type": "toggle_mode" },
            { "type": "assert_mode", "mode": "bars" }
        ] }"#,
        HeadlessRunConfig::default(),
        &snapshot_root(),
    )
    .unwrap();

    assert!(!outcome.is_failed(), "{:?}", outcome.report());
    assert_eq!(d.mode(), ChartMode::Bars);
    assert_eq!(d.toggle_label(), "show pie");
}

#[test]
fn first_failed_assertion_stops_the_run() {
    let mut d = dashboard(0);
    let outcome = run_scenario(
        &mut d,
        r#"{ "steps": [
            { "type": "assert_mode", "mode": "bars" },
            { "type": "assert_bucket", "primary": "3-4 times a week", "value": 99 },
            { "type": "toggle_mode" }
        ] }"#,
        HeadlessRunConfig::default(),
        &snapshot_root(),
    )
    .unwrap();

    let RunOutcome::Failed { report } = outcome else {
        panic!("expected a failed run");
    };
    assert_eq!(report.status, ReportStatus::Failed);
    assert_eq!(report.failed_step_index, Some(1));
    assert_eq!(report.assertion.as_deref(), Some("assert_bucket"));
    assert_eq!(d.mode(), ChartMode::Bars);
}

#[test]
fn waiting_runs_the_transition_to_completion() {
    let mut d = dashboard(800);
    assert!(d.is_animating());
    let outcome = run_scenario(
        &mut d,
        r#"{ "steps": [
            { "type": "wait", "ms": 1000 },
            { "type": "snapshot", "path": "bars.svg" }
        ] }"#,
        HeadlessRunConfig::default(),
        &snapshot_root(),
    )
    .unwrap();

    assert!(!outcome.is_failed(), "{:?}", outcome.report());
    assert!(!d.is_animating());
    assert_eq!(outcome.report().elapsed_frames, 63);
    assert_eq!(outcome.report().elapsed_ms, 1008);

    let svg = std::fs::read_to_string(snapshot_root().join("bars.svg")).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("id=\"bar/1-2 times a week\""));
}

#[test]
fn malformed_scenarios_are_rejected() {
    let mut d = dashboard(0);
    let err = run_scenario(
        &mut d,
        r#"{ "steps": [ { "type": "teleport" } ] }"#,
        HeadlessRunConfig::default(),
        &snapshot_root(),
    );
    assert!(err.is_err());
}
