//! Assertion helpers for headless dashboard runs.

use pulse_charts::aggregate::Bucket;
use pulse_core::ChartMode;

use crate::controller::ExerciseDashboard;

const VALUE_TOLERANCE: f64 = 1e-9;

/// Snapshot of dashboard-observable state used for assertions.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub mode: ChartMode,
    pub selection: Option<(f32, f32)>,
    pub buckets: Vec<Bucket>,
    pub highlighted: usize,
}

impl DashboardSnapshot {
    pub fn capture(dashboard: &ExerciseDashboard) -> Self {
        Self {
            mode: dashboard.mode(),
            selection: dashboard.selection().map(|r| (r.low(), r.high())),
            buckets: dashboard.buckets().to_vec(),
            highlighted: dashboard.highlighted_count(),
        }
    }
}

/// Assertion result with structured failure details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssertionResult {
    Passed,
    Failed { code: String, message: String },
}

fn failed(code: &str, message: String) -> AssertionResult {
    AssertionResult::Failed {
        code: code.to_string(),
        message,
    }
}

pub fn evaluate_assert_mode(expected: ChartMode, snapshot: &DashboardSnapshot) -> AssertionResult {
    if snapshot.mode == expected {
        AssertionResult::Passed
    } else {
        failed(
            "mode_mismatch",
            format!("expected mode {expected}, got {}", snapshot.mode),
        )
    }
}

pub fn evaluate_assert_selection_empty(snapshot: &DashboardSnapshot) -> AssertionResult {
    match snapshot.selection {
        None => AssertionResult::Passed,
        Some((low, high)) => failed(
            "selection_present",
            format!("expected no selection, got [{low}, {high}]"),
        ),
    }
}

pub fn evaluate_assert_bucket(
    primary: &str,
    secondary: Option<&str>,
    expected: f64,
    snapshot: &DashboardSnapshot,
) -> AssertionResult {
    let label = match secondary {
        Some(s) => format!("{primary}/{s}"),
        None => primary.to_string(),
    };
    let Some(bucket) = snapshot
        .buckets
        .iter()
        .find(|b| b.primary == primary && b.secondary.as_deref() == secondary)
    else {
        return failed("missing_bucket", format!("{label}: bucket not found"));
    };
    if (bucket.value - expected).abs() <= VALUE_TOLERANCE {
        AssertionResult::Passed
    } else {
        failed(
            "value_mismatch",
            format!("{label}: expected {expected}, got {}", bucket.value),
        )
    }
}

pub fn evaluate_assert_highlighted(
    expected: usize,
    snapshot: &DashboardSnapshot,
) -> AssertionResult {
    if snapshot.highlighted == expected {
        AssertionResult::Passed
    } else {
        failed(
            "highlight_mismatch",
            format!(
                "expected {expected} highlighted bars, got {}",
                snapshot.highlighted
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> DashboardSnapshot {
        DashboardSnapshot {
            mode: ChartMode::Bars,
            selection: Some((10.0, 20.0)),
            buckets: vec![
                Bucket::new("a", None, 4.0),
                Bucket::new("b", Some("x".into()), 1.0),
            ],
            highlighted: 2,
        }
    }

    #[test]
    fn bucket_lookup_respects_secondary() {
        let s = snapshot();
        assert_eq!(evaluate_assert_bucket("a", None, 4.0, &s), AssertionResult::Passed);
        assert_eq!(
            evaluate_assert_bucket("b", Some("x"), 1.0, &s),
            AssertionResult::Passed
        );
        let AssertionResult::Failed { code, .. } = evaluate_assert_bucket("b", None, 1.0, &s)
        else {
            panic!("expected failure");
        };
        assert_eq!(code, "missing_bucket");
    }

    #[test]
    fn failures_carry_both_values() {
        let s = snapshot();
        let AssertionResult::Failed { message, .. } = evaluate_assert_mode(ChartMode::Pie, &s)
        else {
            panic!("expected failure");
        };
        assert_eq!(message, "expected mode pie, got bars");
        assert!(matches!(
            evaluate_assert_selection_empty(&s),
            AssertionResult::Failed { .. }
        ));
        assert_eq!(evaluate_assert_highlighted(2, &s), AssertionResult::Passed);
    }
}
