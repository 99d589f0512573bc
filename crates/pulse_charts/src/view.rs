use pulse_core::Rect;

/// Space reserved around the plot area for axes, legends and titles.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Margin {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margin {
    pub const fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

/// Canvas size plus margins: the pixel frame a chart draws into.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartFrame {
    pub width: f32,
    pub height: f32,
    pub margin: Margin,
}

impl ChartFrame {
    pub fn new(width: f32, height: f32, margin: Margin) -> Self {
        Self {
            width,
            height,
            margin,
        }
    }

    pub fn inner_width(&self) -> f32 {
        (self.width - self.margin.left - self.margin.right).max(0.0)
    }

    pub fn inner_height(&self) -> f32 {
        (self.height - self.margin.top - self.margin.bottom).max(0.0)
    }

    /// Plot area in canvas pixels.
    pub fn plot_rect(&self) -> Rect {
        Rect::new(
            self.margin.left,
            self.margin.top,
            self.inner_width(),
            self.inner_height(),
        )
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}
