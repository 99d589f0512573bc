//! Dashboard control events
//!
//! The dashboard has exactly four inputs: the mode toggle, the grouping selector, the
//! clear-selection button and the end of a brush drag.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which chart the exercise view shows
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartMode {
    #[default]
    Bars,
    Pie,
}

impl ChartMode {
    pub fn toggled(self) -> Self {
        match self {
            ChartMode::Bars => ChartMode::Pie,
            ChartMode::Pie => ChartMode::Bars,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ChartMode::Bars => "bars",
            ChartMode::Pie => "pie",
        }
    }
}

impl fmt::Display for ChartMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Secondary grouping dimension chosen in the grouping selector
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Grouping {
    #[default]
    None,
    Field(String),
}

impl Grouping {
    /// Value the selector control uses for "no grouping".
    pub const NONE_VALUE: &'static str = "none";

    pub fn field(name: impl Into<String>) -> Self {
        Grouping::Field(name.into())
    }

    /// Interpret a raw selector value; `"none"` and the empty string mean no grouping.
    pub fn from_control_value(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value == Self::NONE_VALUE {
            Grouping::None
        } else {
            Grouping::Field(value.to_string())
        }
    }

    pub fn field_name(&self) -> Option<&str> {
        match self {
            Grouping::None => None,
            Grouping::Field(name) => Some(name),
        }
    }

    pub fn control_value(&self) -> &str {
        self.field_name().unwrap_or(Self::NONE_VALUE)
    }
}

impl fmt::Display for Grouping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.control_value())
    }
}

/// Non-empty closed pixel interval `[low, high]` along the x axis
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelRange {
    low: f32,
    high: f32,
}

impl PixelRange {
    /// Returns `None` for empty, inverted or non-finite intervals.
    pub fn new(low: f32, high: f32) -> Option<Self> {
        if !low.is_finite() || !high.is_finite() || low >= high {
            return None;
        }
        Some(Self { low, high })
    }

    /// Interpret a brush payload; a null payload is no selection.
    pub fn from_brush(selection: Option<(f32, f32)>) -> Option<Self> {
        selection.and_then(|(low, high)| Self::new(low, high))
    }

    pub fn low(&self) -> f32 {
        self.low
    }

    pub fn high(&self) -> f32 {
        self.high
    }

    pub fn width(&self) -> f32 {
        self.high - self.low
    }

    pub fn contains(&self, x: f32) -> bool {
        x >= self.low && x <= self.high
    }
}

/// Discriminant of a [`ViewEvent`], used in transition history
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    ToggleMode,
    ChangeGrouping,
    ClearSelection,
    BrushEnd,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::ToggleMode => "toggle_mode",
            EventKind::ChangeGrouping => "change_grouping",
            EventKind::ClearSelection => "clear_selection",
            EventKind::BrushEnd => "brush_end",
        }
    }
}

/// A user input delivered to the dashboard
#[derive(Clone, Debug, PartialEq)]
pub enum ViewEvent {
    /// Mode toggle button clicked
    ToggleMode,
    /// Grouping selector changed
    ChangeGrouping(Grouping),
    /// Clear-selection button clicked
    ClearSelection,
    /// Brush drag finished, carrying the pixel interval or null
    BrushEnd(Option<(f32, f32)>),
}

impl ViewEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ViewEvent::ToggleMode => EventKind::ToggleMode,
            ViewEvent::ChangeGrouping(_) => EventKind::ChangeGrouping,
            ViewEvent::ClearSelection => EventKind::ClearSelection,
            ViewEvent::BrushEnd(_) => EventKind::BrushEnd,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_range_rejects_empty_and_inverted() {
        assert!(PixelRange::new(10.0, 10.0).is_none());
        assert!(PixelRange::new(20.0, 10.0).is_none());
        assert!(PixelRange::new(f32::NAN, 10.0).is_none());
        assert!(PixelRange::from_brush(None).is_none());
        let r = PixelRange::from_brush(Some((10.0, 20.0))).unwrap();
        assert!(r.contains(10.0));
        assert!(r.contains(20.0));
        assert!(!r.contains(20.5));
    }

    #[test]
    fn grouping_parses_control_values() {
        assert_eq!(Grouping::from_control_value("none"), Grouping::None);
        assert_eq!(Grouping::from_control_value(""), Grouping::None);
        assert_eq!(
            Grouping::from_control_value("Gender"),
            Grouping::field("Gender")
        );
        assert_eq!(Grouping::None.control_value(), "none");
    }

    #[test]
    fn mode_toggles_back_and_forth() {
        assert_eq!(ChartMode::Bars.toggled(), ChartMode::Pie);
        assert_eq!(ChartMode::Pie.toggled().toggled(), ChartMode::Pie);
    }
}
