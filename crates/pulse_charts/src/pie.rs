//! Pie layout
//!
//! Slices are laid out clockwise from 12 o'clock, largest value first, but reported back in
//! input order so slice `i` always belongs to entry `i`.

use std::f64::consts::TAU;

use pulse_core::{Point, Rect};

use crate::aggregate::Bucket;
use crate::axis::{legend_marks, title_mark, LegendLayout};
use crate::format::format_share;
use crate::palette::Palette;
use crate::scene::{z, Mark, PathData, Scene};
use crate::transition::lerp_f32;
use crate::view::ChartFrame;

const FULL_CIRCLE_EPSILON: f32 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PieSlice {
    pub index: usize,
    pub value: f64,
    pub start_angle: f32,
    pub end_angle: f32,
}

impl PieSlice {
    pub fn sweep(&self) -> f32 {
        self.end_angle - self.start_angle
    }
}

/// Start and end angles (radians) for each value.
///
/// Non-positive values get an empty slice. When nothing is positive every slice is empty.
pub fn pie_angles(values: &[f64]) -> Vec<PieSlice> {
    let total: f64 = values.iter().copied().filter(|v| *v > 0.0).sum();
    let k = if total > 0.0 { TAU / total } else { 0.0 };

    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[b].total_cmp(&values[a]));

    let mut slices: Vec<PieSlice> = values
        .iter()
        .enumerate()
        .map(|(index, &value)| PieSlice {
            index,
            value,
            start_angle: 0.0,
            end_angle: 0.0,
        })
        .collect();

    let mut angle = 0.0f64;
    for i in order {
        let v = values[i];
        let next = angle + if v > 0.0 { v * k } else { 0.0 };
        slices[i].start_angle = angle as f32;
        slices[i].end_angle = next as f32;
        angle = next;
    }
    slices
}

fn polar(center: Point, radius: f32, angle: f32) -> Point {
    Point::new(
        center.x + radius * angle.sin(),
        center.y - radius * angle.cos(),
    )
}

/// Filled wedge from `start` to `end` (radians, clockwise from 12 o'clock).
pub fn arc_path(center: Point, radius: f32, start: f32, end: f32) -> PathData {
    let sweep = end - start;
    if radius <= 0.0 || sweep.abs() <= FULL_CIRCLE_EPSILON {
        return PathData::new();
    }

    let p0 = polar(center, radius, start);
    if sweep.abs() >= std::f32::consts::TAU - FULL_CIRCLE_EPSILON {
        let opposite = polar(center, radius, start + std::f32::consts::PI);
        return PathData::new()
            .move_to(p0.x, p0.y)
            .arc_to(radius, true, true, opposite)
            .arc_to(radius, true, true, p0)
            .close();
    }

    let p1 = polar(center, radius, end);
    PathData::new()
        .move_to(p0.x, p0.y)
        .arc_to(radius, sweep.abs() > std::f32::consts::PI, sweep > 0.0, p1)
        .line_to(center.x, center.y)
        .close()
}

/// Pie of aggregated entries with a percentage legend.
#[derive(Clone, Debug)]
pub struct PieChartModel {
    entries: Vec<Bucket>,
    frame: ChartFrame,
    pub palette: Palette,
    pub title: String,
}

impl PieChartModel {
    pub fn new(entries: Vec<Bucket>, frame: ChartFrame) -> anyhow::Result<Self> {
        anyhow::ensure!(
            entries.iter().all(|e| e.value.is_finite() && e.value >= 0.0),
            "PieChartModel does not support negative or non-finite values"
        );
        Ok(Self {
            entries,
            frame,
            palette: Palette::TABLEAU10,
            title: String::new(),
        })
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn entries(&self) -> &[Bucket] {
        &self.entries
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.value).sum()
    }

    pub fn radius(&self) -> f32 {
        self.frame.inner_width().min(self.frame.inner_height()) / 2.0
    }

    /// The pie sits in the top-left corner of the plot area.
    pub fn center(&self) -> Point {
        let r = self.radius();
        Point::new(self.frame.margin.left + r, self.frame.margin.top + r)
    }

    pub fn slices(&self) -> Vec<PieSlice> {
        let values: Vec<f64> = self.entries.iter().map(|e| e.value).collect();
        pie_angles(&values)
    }

    /// `key (share%)` per entry, in entry order.
    pub fn legend_labels(&self) -> Vec<String> {
        let total = self.total();
        self.entries
            .iter()
            .map(|e| format!("{} ({}%)", e.primary, format_share(e.value, total)))
            .collect()
    }

    /// Scene with every slice swept `progress` of the way from its start angle.
    pub fn scene(&self, progress: f32) -> Scene {
        let mut scene = Scene::new(self.frame.width, self.frame.height);
        let (center, radius) = (self.center(), self.radius());

        for slice in self.slices() {
            let end = lerp_f32(slice.start_angle, slice.end_angle, progress);
            let entry = &self.entries[slice.index];
            scene.push(
                Mark::path(
                    format!("slice/{}", entry.key()),
                    arc_path(center, radius, slice.start_angle, end),
                )
                .with_fill(self.palette.color(slice.index))
                .with_z(z::SERIES_FILL),
            );
        }

        let items: Vec<_> = self
            .legend_labels()
            .into_iter()
            .enumerate()
            .map(|(i, label)| (label, self.palette.color(i)))
            .collect();
        let origin = Point::new(
            self.frame.width - self.frame.margin.right + 20.0,
            self.frame.margin.top,
        );
        legend_marks(
            &mut scene,
            "legend",
            LegendLayout::Column {
                origin,
                row_height: 20.0,
            },
            &items,
        );

        if !self.title.is_empty() {
            scene.push(title_mark(&self.frame, &self.title));
        }
        scene
    }

    /// Square bounding the pie.
    pub fn bounds(&self) -> Rect {
        let (c, r) = (self.center(), self.radius());
        Rect::new(c.x - r, c.y - r, r * 2.0, r * 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::Margin;

    fn frame() -> ChartFrame {
        ChartFrame::new(700.0, 450.0, Margin::new(60.0, 300.0, 100.0, 60.0))
    }

    #[test]
    fn largest_value_starts_at_zero_but_order_is_kept() {
        let s = pie_angles(&[1.0, 3.0]);
        assert_eq!(s[0].index, 0);
        assert!((s[1].start_angle - 0.0).abs() < 1e-6);
        assert!((s[1].end_angle - (TAU * 0.75) as f32).abs() < 1e-5);
        assert!((s[0].start_angle - s[1].end_angle).abs() < 1e-6);
        assert!((s[0].end_angle - TAU as f32).abs() < 1e-5);
    }

    #[test]
    fn ties_keep_input_order_and_zeros_are_empty() {
        let s = pie_angles(&[2.0, 0.0, 2.0]);
        assert_eq!(s[0].start_angle, 0.0);
        assert!(s[2].start_angle > 0.0);
        assert_eq!(s[1].sweep(), 0.0);
        assert!(pie_angles(&[0.0, 0.0]).iter().all(|s| s.sweep() == 0.0));
    }

    #[test]
    fn radius_and_center_follow_the_plot_area() {
        let m = PieChartModel::new(vec![Bucket::new("a", None, 1.0)], frame()).unwrap();
        assert_eq!(m.radius(), 145.0);
        assert_eq!(m.center(), Point::new(205.0, 205.0));
    }

    #[test]
    fn legend_reports_one_decimal_shares() {
        let m = PieChartModel::new(
            vec![Bucket::new("a", None, 1.0), Bucket::new("b", None, 2.0)],
            frame(),
        )
        .unwrap();
        assert_eq!(m.legend_labels(), ["a (33.3%)", "b (66.7%)"]);

        let empty = PieChartModel::new(vec![Bucket::new("a", None, 0.0)], frame()).unwrap();
        assert_eq!(empty.legend_labels(), ["a (0.0%)"]);
    }

    #[test]
    fn sweep_progress_grows_slices() {
        let m = PieChartModel::new(
            vec![Bucket::new("a", None, 1.0), Bucket::new("b", None, 1.0)],
            frame(),
        )
        .unwrap();
        let start = m.scene(0.0);
        let done = m.scene(1.0);
        let path = |s: &Scene| match &s.get("slice/a").unwrap().shape {
            crate::scene::Shape::Path(p) => p.clone(),
            _ => unreachable!(),
        };
        assert!(path(&start).is_empty());
        assert!(!path(&done).is_empty());
        assert!(done.get("legend/label/1").is_some());
    }

    #[test]
    fn single_full_slice_draws_a_circle() {
        let p = arc_path(Point::new(0.0, 0.0), 10.0, 0.0, std::f32::consts::TAU);
        assert_eq!(p.to_svg_d(), "M0,-10A10,10,0,1,1,0,10A10,10,0,1,1,0,-10Z");
    }

    #[test]
    fn negative_values_are_rejected() {
        assert!(PieChartModel::new(vec![Bucket::new("a", None, -1.0)], frame()).is_err());
    }
}
