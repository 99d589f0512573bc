use indexmap::IndexSet;
use pulse_core::{Color, PixelRange, Point, Rect};

use crate::aggregate::{max_value, Bucket};
use crate::axis::{
    axis_title_marks, bottom_axis_marks, build_band_ticks, build_left_ticks, left_axis_marks,
    legend_marks, title_mark, LegendLayout,
};
use crate::format::{format_percent_tick, format_tick};
use crate::highlight::{classify, Highlight};
use crate::palette::Palette;
use crate::scale::{CategoryBand, LinearScale};
use crate::scene::{z, Mark, Scene};
use crate::transition::lerp_f32;
use crate::view::{ChartFrame, Margin};

/// Id of the brush selection overlay in a bar scene.
pub const SELECTION_MARK: &str = "brush/selection";

/// Upper end of the value axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum YDomain {
    /// `max × headroom`, then rounded outward to tick boundaries
    FitMax { headroom: f32 },
    /// A fixed maximum such as 100 for percentages
    Fixed { max: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickCount {
    Fixed(usize),
    /// One tick per unit of the largest value, rounded up
    CeilOfMax,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TickFormat {
    #[default]
    Plain,
    Percent,
}

/// Which label picks a bar's color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorBy {
    Primary,
    #[default]
    Secondary,
}

#[derive(Clone, Debug)]
pub struct BarChartStyle {
    pub frame: ChartFrame,
    pub primary_padding_inner: f32,
    pub primary_padding_outer: f32,
    pub secondary_padding: f32,
    pub y_domain: YDomain,
    pub y_ticks: TickCount,
    pub tick_format: TickFormat,
    pub palette: Palette,
    pub color_by: ColorBy,
    pub legend: LegendLayout,
    /// Degrees; 0 keeps category labels horizontal
    pub x_label_rotate: f32,
    pub title: String,
    pub x_title: String,
    pub y_title: String,
}

impl Default for BarChartStyle {
    fn default() -> Self {
        let frame = ChartFrame::new(600.0, 400.0, Margin::new(40.0, 30.0, 60.0, 60.0));
        Self {
            legend: LegendLayout::Column {
                origin: Point::new(frame.width - frame.margin.right - 100.0, frame.margin.top),
                row_height: 20.0,
            },
            frame,
            primary_padding_inner: 0.2,
            primary_padding_outer: 0.2,
            secondary_padding: 0.1,
            y_domain: YDomain::FitMax { headroom: 1.0 },
            y_ticks: TickCount::Fixed(10),
            tick_format: TickFormat::Plain,
            palette: Palette::TABLEAU10,
            color_by: ColorBy::Secondary,
            x_label_rotate: 0.0,
            title: String::new(),
            x_title: String::new(),
            y_title: String::new(),
        }
    }
}

/// Final pixel geometry of one bar.
#[derive(Clone, Debug, PartialEq)]
pub struct BarGeometry {
    pub key: String,
    pub value: f64,
    pub rect: Rect,
    /// Horizontal centre, used for brush hit-testing
    pub center_x: f32,
    pub color: Color,
}

/// Simple or grouped bar chart over aggregated buckets.
///
/// Buckets with a secondary label are drawn as grouped bars: one outer band per primary
/// label, split into inner bands per secondary label.
#[derive(Clone, Debug)]
pub struct BarChartModel {
    buckets: Vec<Bucket>,
    primaries: IndexSet<String>,
    secondaries: IndexSet<String>,
    pub style: BarChartStyle,
}

impl BarChartModel {
    pub fn new(buckets: Vec<Bucket>, style: BarChartStyle) -> anyhow::Result<Self> {
        anyhow::ensure!(
            buckets.iter().all(|b| b.value.is_finite() && b.value >= 0.0),
            "BarChartModel does not support negative or non-finite values"
        );
        let grouped = buckets.iter().filter(|b| b.secondary.is_some()).count();
        anyhow::ensure!(
            grouped == 0 || grouped == buckets.len(),
            "BarChartModel buckets must be all grouped or all ungrouped"
        );

        let primaries = buckets.iter().map(|b| b.primary.clone()).collect();
        let secondaries = buckets.iter().filter_map(|b| b.secondary.clone()).collect();
        Ok(Self {
            buckets,
            primaries,
            secondaries,
            style,
        })
    }

    /// Fix the primary axis to a declared category order, so the axis keeps its bands even
    /// when there are no buckets.
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut primaries: IndexSet<String> = categories.into_iter().map(Into::into).collect();
        primaries.extend(self.primaries.drain(..));
        self.primaries = primaries;
        self
    }

    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    pub fn is_grouped(&self) -> bool {
        !self.secondaries.is_empty()
    }

    pub fn plot_rect(&self) -> Rect {
        self.style.frame.plot_rect()
    }

    /// The brush may only move inside the plot area.
    pub fn brush_extent(&self) -> Rect {
        self.plot_rect()
    }

    pub fn primary_band(&self) -> CategoryBand {
        let plot = self.plot_rect();
        CategoryBand::new(
            self.primaries.iter().cloned(),
            plot.x(),
            plot.right(),
            self.style.primary_padding_inner,
            self.style.primary_padding_outer,
        )
    }

    pub fn secondary_band(&self) -> Option<CategoryBand> {
        if !self.is_grouped() {
            return None;
        }
        let outer = self.primary_band().band_width();
        Some(CategoryBand::new(
            self.secondaries.iter().cloned(),
            0.0,
            outer,
            self.style.secondary_padding,
            self.style.secondary_padding,
        ))
    }

    pub fn max_value(&self) -> f64 {
        max_value(&self.buckets)
    }

    pub fn y_scale(&self) -> LinearScale {
        let top = match self.style.y_domain {
            YDomain::FitMax { headroom } => self.max_value() as f32 * headroom,
            YDomain::Fixed { max } => max,
        };
        let plot = self.plot_rect();
        LinearScale::new(0.0, top, plot.bottom(), plot.y()).nice(10)
    }

    pub fn tick_count(&self) -> usize {
        match self.style.y_ticks {
            TickCount::Fixed(n) => n,
            TickCount::CeilOfMax => self.max_value().ceil().max(0.0) as usize,
        }
    }

    fn color_index(&self, bucket: &Bucket) -> usize {
        match (self.style.color_by, &bucket.secondary) {
            (ColorBy::Secondary, Some(s)) => self.secondaries.get_index_of(s).unwrap_or(0),
            _ => self.primaries.get_index_of(&bucket.primary).unwrap_or(0),
        }
    }

    /// Labels and colors listed in the legend.
    pub fn legend_items(&self) -> Vec<(String, Color)> {
        let labels = match self.style.color_by {
            ColorBy::Secondary if self.is_grouped() => &self.secondaries,
            _ => &self.primaries,
        };
        labels
            .iter()
            .enumerate()
            .map(|(i, label)| (label.clone(), self.style.palette.color(i)))
            .collect()
    }

    /// Fully grown bar geometry, in bucket order.
    pub fn bars(&self) -> Vec<BarGeometry> {
        let outer = self.primary_band();
        let inner = self.secondary_band();
        let y = self.y_scale();
        let y0 = y.map(0.0);

        self.buckets
            .iter()
            .filter_map(|b| {
                let x0 = outer.band_start(&b.primary)?;
                let (x, width) = match (&inner, &b.secondary) {
                    (Some(inner), Some(s)) => (x0 + inner.band_start(s)?, inner.band_width()),
                    _ => (x0, outer.band_width()),
                };
                let top = y.map(b.value as f32);
                Some(BarGeometry {
                    key: b.key(),
                    value: b.value,
                    rect: Rect::new(x, top, width, y0 - top),
                    center_x: x + width / 2.0,
                    color: self.style.palette.color(self.color_index(b)),
                })
            })
            .collect()
    }

    pub fn centers(&self) -> Vec<f32> {
        self.bars().iter().map(|b| b.center_x).collect()
    }

    pub fn highlights(&self, selection: Option<&PixelRange>) -> Vec<Highlight> {
        self.bars()
            .iter()
            .map(|b| classify(b.center_x, selection))
            .collect()
    }

    /// Full scene with bars grown `progress` of the way up from the baseline.
    pub fn scene(&self, progress: f32, selection: Option<&PixelRange>) -> Scene {
        let frame = &self.style.frame;
        let plot = self.plot_rect();
        let mut scene = Scene::new(frame.width, frame.height);

        let y = self.y_scale();
        let baseline = y.map(0.0);
        for bar in self.bars() {
            let top = lerp_f32(baseline, bar.rect.y(), progress);
            let rect = Rect::new(bar.rect.x(), top, bar.rect.width(), baseline - top);
            scene.push(
                Mark::rect(bar_mark_id(&bar.key), rect)
                    .with_fill(bar.color)
                    .with_opacity(classify(bar.center_x, selection).opacity())
                    .with_z(z::SERIES_FILL),
            );
        }

        let x_ticks = build_band_ticks(&self.primary_band());
        bottom_axis_marks(
            &mut scene,
            "x-axis",
            &x_ticks,
            plot.bottom(),
            (plot.x(), plot.right()),
            self.style.x_label_rotate,
        );
        let format = match self.style.tick_format {
            TickFormat::Plain => format_tick,
            TickFormat::Percent => format_percent_tick,
        };
        let y_ticks = build_left_ticks(&y, self.tick_count(), format);
        left_axis_marks(&mut scene, "y-axis", &y_ticks, plot.x(), (plot.bottom(), plot.y()));

        legend_marks(&mut scene, "legend", self.style.legend, &self.legend_items());
        axis_title_marks(&mut scene, frame, &self.style.x_title, &self.style.y_title);
        if !self.style.title.is_empty() {
            scene.push(title_mark(frame, &self.style.title));
        }

        self.apply_selection_overlay(&mut scene, selection);
        scene
    }

    /// Recompute bar opacity and the selection overlay without touching geometry.
    pub fn restyle(&self, scene: &mut Scene, selection: Option<&PixelRange>) {
        for bar in self.bars() {
            if let Some(mark) = scene.get_mut(&bar_mark_id(&bar.key)) {
                mark.opacity = classify(bar.center_x, selection).opacity();
            }
        }
        self.apply_selection_overlay(scene, selection);
    }

    fn apply_selection_overlay(&self, scene: &mut Scene, selection: Option<&PixelRange>) {
        match selection {
            Some(range) => {
                let plot = self.plot_rect();
                scene.push(
                    Mark::rect(
                        SELECTION_MARK,
                        Rect::new(range.low(), plot.y(), range.width(), plot.height()),
                    )
                    .with_fill(Color::from_hex(0x777777))
                    .with_opacity(0.3)
                    .with_z(z::OVERLAY),
                );
            }
            None => {
                scene.remove(SELECTION_MARK);
            }
        }
    }
}

pub fn bar_mark_id(key: &str) -> String {
    format!("bar/{key}")
}
