use pulse_core::{Color, Point, Rect};

use crate::scale::{CategoryBand, LinearScale};
use crate::view::ChartFrame;
use crate::scene::{z, Mark, Scene, TextAnchor, TextMark};

const TICK_SIZE: f32 = 6.0;
const TICK_LABEL_SIZE: f32 = 10.0;

#[derive(Clone, Debug, PartialEq)]
pub struct AxisTick {
    pub value: f32,
    pub px: f32,
    pub label: String,
}

/// One tick per band, at the band centre.
pub fn build_band_ticks(band: &CategoryBand) -> Vec<AxisTick> {
    band.labels()
        .enumerate()
        .filter_map(|(i, label)| {
            band.center(label).map(|px| AxisTick {
                value: i as f32,
                px,
                label: label.to_string(),
            })
        })
        .collect()
}

pub fn build_left_ticks<F>(scale: &LinearScale, tick_count: usize, formatter: F) -> Vec<AxisTick>
where
    F: Fn(f32) -> String,
{
    scale
        .ticks(tick_count)
        .into_iter()
        .map(|v| AxisTick {
            value: v,
            px: scale.map(v),
            label: formatter(v),
        })
        .collect()
}

/// Domain line, tick rules and labels of a bottom axis drawn at `y`.
///
/// A non-zero `label_rotate` turns the labels (degrees) and anchors them at their end.
pub fn bottom_axis_marks(
    scene: &mut Scene,
    id: &str,
    ticks: &[AxisTick],
    y: f32,
    x_range: (f32, f32),
    label_rotate: f32,
) {
    scene.push(
        Mark::line(
            format!("{id}/domain"),
            Point::new(x_range.0, y),
            Point::new(x_range.1, y),
        )
        .with_z(z::AXIS_RULES),
    );
    for t in ticks {
        scene.push(
            Mark::line(
                format!("{id}/tick/{}", t.label),
                Point::new(t.px, y),
                Point::new(t.px, y + TICK_SIZE),
            )
            .with_z(z::AXIS_RULES),
        );
        let label_y = y + TICK_SIZE + 3.0 + TICK_LABEL_SIZE;
        let mut text = TextMark::new(Point::new(t.px, label_y), &t.label)
            .size(TICK_LABEL_SIZE)
            .anchor(TextAnchor::Middle);
        if label_rotate != 0.0 {
            text = text.rotate(label_rotate).anchor(TextAnchor::End);
        }
        scene.push(Mark::text(format!("{id}/label/{}", t.label), text).with_z(z::AXIS_LABELS));
    }
}

/// Domain line, tick rules and labels of a left axis drawn at `x`.
pub fn left_axis_marks(
    scene: &mut Scene,
    id: &str,
    ticks: &[AxisTick],
    x: f32,
    y_range: (f32, f32),
) {
    scene.push(
        Mark::line(
            format!("{id}/domain"),
            Point::new(x, y_range.0),
            Point::new(x, y_range.1),
        )
        .with_z(z::AXIS_RULES),
    );
    for t in ticks {
        scene.push(
            Mark::line(
                format!("{id}/tick/{}", t.label),
                Point::new(x - TICK_SIZE, t.px),
                Point::new(x, t.px),
            )
            .with_z(z::AXIS_RULES),
        );
        let text = TextMark::new(
            Point::new(x - TICK_SIZE - 3.0, t.px + TICK_LABEL_SIZE * 0.32),
            &t.label,
        )
        .size(TICK_LABEL_SIZE)
        .anchor(TextAnchor::End);
        scene.push(Mark::text(format!("{id}/label/{}", t.label), text).with_z(z::AXIS_LABELS));
    }
}

/// Swatch-and-label legend entries, stacked vertically or laid out in a row.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LegendLayout {
    Column { origin: Point, row_height: f32 },
    Row { origin: Point, item_width: f32 },
}

impl LegendLayout {
    fn item_origin(&self, i: usize) -> Point {
        match *self {
            LegendLayout::Column { origin, row_height } => {
                Point::new(origin.x, origin.y + row_height * i as f32)
            }
            LegendLayout::Row { origin, item_width } => {
                Point::new(origin.x + item_width * i as f32, origin.y)
            }
        }
    }
}

pub fn legend_marks(scene: &mut Scene, id: &str, layout: LegendLayout, items: &[(String, Color)]) {
    for (i, (label, color)) in items.iter().enumerate() {
        let o = layout.item_origin(i);
        scene.push(
            Mark::rect(format!("{id}/swatch/{i}"), Rect::new(o.x, o.y, 15.0, 15.0))
                .with_fill(*color)
                .with_z(z::LEGEND_SWATCHES),
        );
        scene.push(
            Mark::text(
                format!("{id}/label/{i}"),
                TextMark::new(Point::new(o.x + 20.0, o.y + 12.0), label.as_str()).size(12.0),
            )
            .with_z(z::LEGEND_LABELS),
        );
    }
}

/// Bold chart title centred in the top margin.
pub fn title_mark(frame: &ChartFrame, text: &str) -> Mark {
    let pos = Point::new(frame.width / 2.0, frame.margin.top / 2.0);
    Mark::text(
        "title",
        TextMark::new(pos, text)
            .size(18.0)
            .anchor(TextAnchor::Middle)
            .bold(),
    )
    .with_z(z::TITLES)
}

/// Axis titles: `x` under the bottom axis, `y` rotated along the left edge.
pub fn axis_title_marks(scene: &mut Scene, frame: &ChartFrame, x: &str, y: &str) {
    if !x.is_empty() {
        let pos = Point::new(frame.width / 2.0, frame.height - 20.0);
        scene.push(
            Mark::text("x-title", TextMark::new(pos, x).size(14.0).anchor(TextAnchor::Middle))
                .with_z(z::AXIS_TITLES),
        );
    }
    if !y.is_empty() {
        let pos = Point::new(20.0, frame.height / 2.0);
        scene.push(
            Mark::text(
                "y-title",
                TextMark::new(pos, y)
                    .size(14.0)
                    .anchor(TextAnchor::Middle)
                    .rotate(-90.0),
            )
            .with_z(z::AXIS_TITLES),
        );
    }
}
