/// 1D brush gesture (X axis), in canvas pixel coordinates.
///
/// Positions are clamped to the brush extent. A drag that ends without any width reports no
/// selection, the same as clicking on the plot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BrushX {
    active: bool,
    start_px: f32,
    cur_px: f32,
    min_px: f32,
    max_px: f32,
}

impl Default for BrushX {
    fn default() -> Self {
        Self::with_extent(f32::NEG_INFINITY, f32::INFINITY)
    }
}

impl BrushX {
    pub fn with_extent(min_px: f32, max_px: f32) -> Self {
        let min_px = if min_px.is_nan() { f32::NEG_INFINITY } else { min_px };
        let max_px = if max_px.is_nan() { f32::INFINITY } else { max_px };
        Self {
            active: false,
            start_px: 0.0,
            cur_px: 0.0,
            min_px: min_px.min(max_px),
            max_px: max_px.max(min_px),
        }
    }

    pub fn extent(&self) -> (f32, f32) {
        (self.min_px, self.max_px)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn anchor_px(&self) -> Option<f32> {
        if self.active {
            Some(self.start_px)
        } else {
            None
        }
    }

    pub fn begin(&mut self, x_px: f32) {
        let x = self.clamp(x_px);
        self.active = true;
        self.start_px = x;
        self.cur_px = x;
    }

    pub fn update(&mut self, x_px: f32) {
        if self.active {
            self.cur_px = self.clamp(x_px);
        }
    }

    pub fn cancel(&mut self) {
        self.active = false;
    }

    pub fn range_px(&self) -> Option<(f32, f32)> {
        if !self.active {
            return None;
        }
        let (a, b) = (self.start_px, self.cur_px);
        Some(if a <= b { (a, b) } else { (b, a) })
    }

    /// End the gesture and return the final interval, or `None` when it has no width.
    pub fn take_final_px(&mut self) -> Option<(f32, f32)> {
        let r = self.range_px();
        self.active = false;
        r.filter(|(a, b)| b > a)
    }

    fn clamp(&self, x: f32) -> f32 {
        x.clamp(self.min_px, self.max_px)
    }
}
