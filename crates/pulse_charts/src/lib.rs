//! Pulse Charts
//!
//! Everything between a loaded survey [`Dataset`](pulse_core::Dataset) and pixels:
//!
//! - **Aggregation**: zero-filled counts, distributions and percentages as ordered buckets
//! - **Flow**: the condition → treatment graph and its sankey layout
//! - **Scales and axes**: band and linear scales, tick generation, legends
//! - **Charts**: bar and pie models producing a retained [`Scene`](scene::Scene)
//! - **Selection**: brush gestures and selection highlighting
//!
//! # Example
//!
//! ```rust
//! use pulse_charts::prelude::*;
//! use pulse_core::{Dataset, PixelRange};
//!
//! let ds = Dataset::from_text_rows(&["freq"], &[&["low"], &["high"], &["low"]]).unwrap();
//! let field = CategoryField::new("freq", ["low", "high"]).unwrap();
//! let buckets = count_buckets(&ds, &field, &GroupingSpec::Ungrouped);
//! assert_eq!(buckets[0].value, 2.0);
//!
//! let chart = BarChartModel::new(buckets, BarChartStyle::default()).unwrap();
//! let first = chart.centers()[0];
//! let selection = PixelRange::new(first - 1.0, first + 1.0);
//! let levels = chart.highlights(selection.as_ref());
//! assert_eq!(levels, [Highlight::Selected, Highlight::Dimmed]);
//! ```

pub mod aggregate;
pub mod axis;
pub mod bar;
pub mod brush;
pub mod flow;
pub mod format;
pub mod highlight;
pub mod normalize;
pub mod palette;
pub mod pie;
pub mod sankey;
pub mod scale;
pub mod scene;
pub mod svg;
pub mod transition;
pub mod view;

pub mod prelude {
    pub use crate::aggregate::{
        count_buckets, distinct_values, distribution, indicator_counts_by_group, max_value,
        percentage, secondary_groups, yes_no_percentages_by_group, Bucket, CategoryField,
        GroupingSpec, Indicator,
    };
    pub use crate::axis::LegendLayout;
    pub use crate::bar::{BarChartModel, BarChartStyle, ColorBy, TickCount, TickFormat, YDomain};
    pub use crate::brush::BrushX;
    pub use crate::flow::{FlowEdge, FlowGraph, DID_NOT_SEEK, SOUGHT_TREATMENT};
    pub use crate::highlight::{classify, classify_all, Highlight};
    pub use crate::palette::Palette;
    pub use crate::pie::PieChartModel;
    pub use crate::sankey::{layout as sankey_layout, SankeyLayout, SankeyOptions};
    pub use crate::scene::{Mark, Scene, SceneDiff};
    pub use crate::svg::to_svg_string;
    pub use crate::transition::{GeometryTransition, DEFAULT_DURATION_MS};
    pub use crate::view::{ChartFrame, Margin};
}
