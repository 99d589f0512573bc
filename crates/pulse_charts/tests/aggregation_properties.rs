use pulse_charts::normalize::group_label;
use pulse_charts::prelude::*;
use pulse_core::{Dataset, PixelRange};

const FREQ: &str = "How often do you exercise in a week?";
const CATEGORIES: [&str; 4] = [
    "Less than once a week",
    "1-2 times a week",
    "3-4 times a week",
    "5 or more times a week",
];

fn exercise_field() -> CategoryField {
    CategoryField::new(FREQ, CATEGORIES).unwrap()
}

fn exercise_rows() -> Dataset {
    let rows: [&[&str]; 10] = [
        &["1-2 times a week", "Male"],
        &["1-2 times a week", "Female"],
        &["3-4 times a week", "Male"],
        &["1-2 times a week", "Male"],
        &["Less than once a week", "Female"],
        &["1-2 times a week", "Female"],
        &["3-4 times a week", "Other"],
        &["Less than once a week", "Male"],
        &["3-4 times a week", "Female"],
        &["Less than once a week", "Male"],
    ];
    Dataset::from_text_rows(&[FREQ, "Gender"], &rows).unwrap()
}

#[test]
fn ungrouped_counts_are_zero_filled_in_declared_order() {
    let buckets = count_buckets(&exercise_rows(), &exercise_field(), &GroupingSpec::Ungrouped);
    let got: Vec<(&str, f64)> = buckets
        .iter()
        .map(|b| (b.primary.as_str(), b.value))
        .collect();
    assert_eq!(
        got,
        [
            ("Less than once a week", 3.0),
            ("1-2 times a week", 4.0),
            ("3-4 times a week", 3.0),
            ("5 or more times a week", 0.0),
        ]
    );
}

#[test]
fn ungrouped_counts_sum_to_record_count() {
    let ds = exercise_rows();
    let buckets = count_buckets(&ds, &exercise_field(), &GroupingSpec::Ungrouped);
    let total: f64 = buckets.iter().map(|b| b.value).sum();
    assert_eq!(total, ds.len() as f64);
}

#[test]
fn grouped_counts_cross_every_category_with_every_group() {
    let ds = exercise_rows();
    let grouping = GroupingSpec::By("Gender".into());
    let buckets = count_buckets(&ds, &exercise_field(), &grouping);
    assert_eq!(buckets.len(), 4 * 3);

    let groups: Vec<_> = secondary_groups(&buckets).into_iter().collect();
    assert_eq!(groups, ["Male", "Female", "Other"]);

    // per-category group counts add back up to the ungrouped count
    let ungrouped = count_buckets(&ds, &exercise_field(), &GroupingSpec::Ungrouped);
    for u in &ungrouped {
        let sum: f64 = buckets
            .iter()
            .filter(|b| b.primary == u.primary)
            .map(|b| b.value)
            .sum();
        assert_eq!(sum, u.value, "{}", u.primary);
    }
    assert!(buckets
        .iter()
        .filter(|b| b.primary == "5 or more times a week")
        .all(|b| b.value == 0.0));
}

#[test]
fn treatment_percentages_add_up_per_group() {
    let ds = Dataset::from_text_rows(
        &["Choose your gender", "Did you seek any specialist for a treatment?"],
        &[
            &["Female", "Yes"],
            &["Female", "No"],
            &["Female", "No"],
            &["male", "No"],
        ],
    )
    .unwrap();
    let buckets = yes_no_percentages_by_group(
        &ds,
        "Choose your gender",
        "Did you seek any specialist for a treatment?",
        group_label,
    );
    assert_eq!(buckets.len(), 4);
    for pair in buckets.chunks(2) {
        assert!((pair[0].value + pair[1].value - 100.0).abs() < 1e-9);
    }
    assert_eq!(buckets[2].primary, "Male");
    assert_eq!(buckets[2].value, 0.0);
    assert!((buckets[0].value - 100.0 / 3.0).abs() < 1e-9);
    assert_eq!(percentage(3.0, 0.0), 0.0);
}

#[test]
fn two_respondents_condition_counts() {
    let ds = Dataset::from_text_rows(
        &[
            "Choose your gender",
            "Do you have Depression?",
            "Do you have Anxiety?",
            "Do you have Panic attack?",
        ],
        &[&["Male", "Yes", "No", "No"], &["Female", "No", "Yes", "Yes"]],
    )
    .unwrap();
    let indicators = [
        Indicator::new("Depression", "Do you have Depression?"),
        Indicator::new("Anxiety", "Do you have Anxiety?"),
        Indicator::new("Panic", "Do you have Panic attack?"),
    ];
    let buckets = indicator_counts_by_group(&ds, "Choose your gender", &indicators, group_label);
    let got: Vec<(String, f64)> = buckets.iter().map(|b| (b.key(), b.value)).collect();
    assert_eq!(
        got,
        [
            ("Male/Depression".to_string(), 1.0),
            ("Male/Anxiety".to_string(), 0.0),
            ("Male/Panic".to_string(), 0.0),
            ("Female/Depression".to_string(), 0.0),
            ("Female/Anxiety".to_string(), 1.0),
            ("Female/Panic".to_string(), 1.0),
        ]
    );
}

#[test]
fn flow_out_weight_matches_condition_yes_count() {
    let ds = Dataset::from_text_rows(
        &["dep", "anx", "panic", "treat"],
        &[
            &["Yes", "Yes", "No", "Yes"],
            &["Yes", "No", "No", "No"],
            &["No", "Yes", "Yes", "No"],
            &["Yes", "No", "Yes", "No"],
        ],
    )
    .unwrap();
    let conditions = [
        Indicator::new("Depression", "dep"),
        Indicator::new("Anxiety", "anx"),
        Indicator::new("Panic", "panic"),
    ];
    let graph = FlowGraph::build(&ds, &conditions, "treat").unwrap();
    assert_eq!(graph.nodes().len(), 5);
    assert_eq!(graph.edges().len(), 6);
    for (i, expected) in [3.0, 2.0, 2.0].into_iter().enumerate() {
        assert_eq!(graph.outgoing_weight(i), expected, "{}", graph.nodes()[i]);
    }
    assert_eq!(graph.weight_between("Panic", SOUGHT_TREATMENT), Some(0.0));
}

#[test]
fn highlighting_is_idempotent_and_clearing_restores_everything() {
    let buckets = count_buckets(&exercise_rows(), &exercise_field(), &GroupingSpec::Ungrouped);
    let chart = BarChartModel::new(buckets, BarChartStyle::default()).unwrap();
    let centers = chart.centers();
    let selection = PixelRange::new(centers[1] - 0.5, centers[2]).unwrap();

    let once = classify_all(&centers, Some(&selection));
    let twice = classify_all(&centers, Some(&selection));
    assert_eq!(once, twice);
    assert_eq!(
        once,
        [
            Highlight::Dimmed,
            Highlight::Selected,
            Highlight::Selected,
            Highlight::Dimmed
        ]
    );

    let mut scene = chart.scene(1.0, Some(&selection));
    chart.restyle(&mut scene, None);
    assert!(scene
        .marks_with_prefix("bar/")
        .all(|m| m.opacity == Highlight::SELECTED_OPACITY));
    assert_eq!(scene, chart.scene(1.0, None));
}
