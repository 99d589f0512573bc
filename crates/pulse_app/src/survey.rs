//! Survey vocabulary and the static mental health views.

use pulse_charts::aggregate::{
    indicator_counts_by_group, yes_no_percentages_by_group, CategoryField, Indicator,
};
use pulse_charts::axis::LegendLayout;
use pulse_charts::bar::{BarChartModel, BarChartStyle, ColorBy, TickCount, TickFormat, YDomain};
use pulse_charts::flow::FlowGraph;
use pulse_charts::normalize::group_label;
use pulse_charts::palette::Palette;
use pulse_charts::sankey::{self, SankeyOptions};
use pulse_charts::scene::Scene;
use pulse_charts::view::{ChartFrame, Margin};
use pulse_core::{Dataset, Grouping, Point};

use crate::config::{ExerciseConfig, MentalHealthConfig};

pub const EXERCISE_FIELD: &str = "How often do you exercise in a week?";
pub const EXERCISE_CATEGORIES: [&str; 4] = [
    "Less than once a week",
    "1-2 times a week",
    "3-4 times a week",
    "5 or more times a week",
];

pub const GENDER_FIELD: &str = "Choose your gender";
pub const TREATMENT_FIELD: &str = "Did you seek any specialist for a treatment?";

pub fn exercise_field() -> anyhow::Result<CategoryField> {
    CategoryField::new(EXERCISE_FIELD, EXERCISE_CATEGORIES)
}

/// Depression, Anxiety and Panic with their yes/no columns.
pub fn conditions() -> [Indicator; 3] {
    [
        Indicator::new("Depression", "Do you have Depression?"),
        Indicator::new("Anxiety", "Do you have Anxiety?"),
        Indicator::new("Panic", "Do you have Panic attack?"),
    ]
}

pub fn exercise_frame(config: &ExerciseConfig) -> ChartFrame {
    let m = config.margin;
    ChartFrame::new(
        config.width,
        config.height,
        Margin::new(m.top, m.right, m.bottom, m.left),
    )
}

pub fn exercise_bar_style(frame: ChartFrame, grouping: &Grouping) -> BarChartStyle {
    let (title, color_by) = match grouping.field_name() {
        None => ("exercise frequency overview".to_string(), ColorBy::Primary),
        Some(field) => (format!("exercise frequency by {field}"), ColorBy::Secondary),
    };
    BarChartStyle {
        legend: right_legend(&frame),
        frame,
        primary_padding_inner: 0.2,
        primary_padding_outer: 0.2,
        secondary_padding: 0.1,
        y_domain: YDomain::FitMax { headroom: 1.1 },
        y_ticks: TickCount::CeilOfMax,
        tick_format: TickFormat::Plain,
        palette: Palette::TABLEAU10,
        color_by,
        x_label_rotate: -45.0,
        title,
        x_title: "exercise frequency".to_string(),
        y_title: "count".to_string(),
    }
}

pub fn exercise_pie_title(grouping: &Grouping) -> String {
    match grouping.field_name() {
        None => "exercise frequency distribution (pie)".to_string(),
        Some(field) => format!("{field} distribution (pie)"),
    }
}

/// Legend column just right of the plot area.
pub fn right_legend(frame: &ChartFrame) -> LegendLayout {
    LegendLayout::Column {
        origin: Point::new(frame.width - frame.margin.right + 20.0, frame.margin.top),
        row_height: 20.0,
    }
}

/// Conditions per gender as grouped bars.
pub fn conditions_by_gender_scene(ds: &Dataset) -> anyhow::Result<Scene> {
    let buckets = indicator_counts_by_group(ds, GENDER_FIELD, &conditions(), group_label);
    let frame = ChartFrame::new(600.0, 400.0, Margin::new(50.0, 30.0, 70.0, 70.0));
    let style = BarChartStyle {
        legend: LegendLayout::Column {
            origin: Point::new(frame.width - frame.margin.right - 100.0, frame.margin.top),
            row_height: 20.0,
        },
        frame,
        primary_padding_inner: 0.2,
        primary_padding_outer: 0.0,
        secondary_padding: 0.1,
        y_domain: YDomain::FitMax { headroom: 1.0 },
        y_ticks: TickCount::Fixed(10),
        tick_format: TickFormat::Plain,
        palette: Palette::CONDITIONS,
        color_by: ColorBy::Secondary,
        x_label_rotate: -40.0,
        title: String::new(),
        x_title: "Gender".to_string(),
        y_title: "Number of people with the condition".to_string(),
    };
    Ok(BarChartModel::new(buckets, style)?.scene(1.0, None))
}

/// Share of each gender that sought treatment, as grouped Yes/No percentage bars.
pub fn treatment_by_gender_scene(ds: &Dataset) -> anyhow::Result<Scene> {
    let buckets = yes_no_percentages_by_group(ds, GENDER_FIELD, TREATMENT_FIELD, group_label);
    let frame = ChartFrame::new(600.0, 460.0, Margin::new(40.0, 30.0, 100.0, 60.0));
    let style = BarChartStyle {
        legend: LegendLayout::Row {
            origin: Point::new(frame.width / 2.0 - 50.0, frame.height - 35.0),
            item_width: 100.0,
        },
        frame,
        primary_padding_inner: 0.2,
        primary_padding_outer: 0.0,
        secondary_padding: 0.1,
        y_domain: YDomain::Fixed { max: 100.0 },
        y_ticks: TickCount::Fixed(10),
        tick_format: TickFormat::Percent,
        palette: Palette::YES_NO,
        color_by: ColorBy::Secondary,
        x_label_rotate: 0.0,
        title: String::new(),
        x_title: "Gender".to_string(),
        y_title: "Percentage of Students".to_string(),
    };
    Ok(BarChartModel::new(buckets, style)?.scene(1.0, None))
}

pub fn treatment_flow(ds: &Dataset) -> anyhow::Result<FlowGraph> {
    FlowGraph::build(ds, &conditions(), TREATMENT_FIELD)
}

/// Condition → treatment sankey.
pub fn treatment_flow_scene(ds: &Dataset, config: &MentalHealthConfig) -> anyhow::Result<Scene> {
    let graph = treatment_flow(ds)?;
    let options = SankeyOptions::for_canvas(config.flow_width, config.flow_height);
    let layout = sankey::layout(&graph, &options)?;
    Ok(layout.scene(config.flow_width, config.flow_height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_charts::scene::Shape;

    fn students() -> Dataset {
        Dataset::from_text_rows(
            &[
                GENDER_FIELD,
                "Do you have Depression?",
                "Do you have Anxiety?",
                "Do you have Panic attack?",
                TREATMENT_FIELD,
            ],
            &[
                &["Male", "Yes", "No", "No", "Yes"],
                &["Female", "No", "Yes", "Yes", "No"],
                &["female ", "Yes", "Yes", "No", "No"],
            ],
        )
        .unwrap()
    }

    #[test]
    fn condition_view_has_one_bar_per_gender_and_condition() {
        let scene = conditions_by_gender_scene(&students()).unwrap();
        assert_eq!(scene.marks_with_prefix("bar/").count(), 6);
        assert!(scene.get("bar/Female/Anxiety").is_some());
        assert!(scene.get("legend/label/2").is_some());
        assert!(scene.get("x-axis/label/Female").is_some());
    }

    #[test]
    fn treatment_view_uses_a_percent_axis() {
        let scene = treatment_by_gender_scene(&students()).unwrap();
        assert!(scene.get("y-axis/label/100%").is_some());
        let Some(Shape::Rect(male_yes)) = scene.get("bar/Male/Yes").map(|m| &m.shape) else {
            panic!("missing Male/Yes bar");
        };
        // 100% reaches the top of the plot area
        assert_eq!(male_yes.y(), 40.0);
    }

    #[test]
    fn flow_view_draws_five_nodes_and_six_links() {
        let scene = treatment_flow_scene(&students(), &MentalHealthConfig::default()).unwrap();
        assert_eq!(scene.marks_with_prefix("node/").count(), 5);
        assert_eq!(scene.marks_with_prefix("link/").count(), 6);
    }

    #[test]
    fn exercise_titles_follow_grouping() {
        let frame = exercise_frame(&ExerciseConfig::default());
        let style = exercise_bar_style(frame, &Grouping::field("Gender"));
        assert_eq!(style.title, "exercise frequency by Gender");
        assert_eq!(exercise_pie_title(&Grouping::None), "exercise frequency distribution (pie)");
        assert_eq!(frame.plot_rect().right(), 400.0);
    }
}
