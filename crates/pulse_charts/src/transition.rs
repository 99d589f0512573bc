/// Default length of the bar-rise and pie-sweep animations.
pub const DEFAULT_DURATION_MS: u32 = 800;

pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Cubic in-out easing over `0..=1`.
pub fn ease_cubic_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueTransition {
    start: f32,
    end: f32,
    duration: f32,
    elapsed: f32,
    value: f32,
}

impl ValueTransition {
    pub fn new(start: f32, end: f32, duration_seconds: f32) -> Self {
        let duration = duration_seconds.max(1e-6);
        Self {
            start,
            end,
            duration,
            elapsed: 0.0,
            value: start,
        }
    }

    pub fn step(&mut self, dt_seconds: f32) {
        if self.is_finished() {
            self.value = self.end;
            return;
        }
        self.elapsed = (self.elapsed + dt_seconds.max(0.0)).min(self.duration);
        let t = ease_cubic_in_out(self.elapsed / self.duration);
        self.value = lerp_f32(self.start, self.end, t);
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Eased `0 → 1` progress shared by every mark of a redraw.
///
/// Restarting mid-flight begins again from zero toward the new geometry; there is no
/// separate cancel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeometryTransition {
    duration_seconds: f32,
    inner: ValueTransition,
}

impl GeometryTransition {
    pub fn new(duration_ms: u32) -> Self {
        let duration_seconds = duration_ms as f32 / 1000.0;
        Self {
            duration_seconds,
            inner: ValueTransition::new(0.0, 1.0, duration_seconds),
        }
    }

    /// A transition that is already at its target.
    pub fn finished(duration_ms: u32) -> Self {
        let mut t = Self::new(duration_ms);
        t.finish();
        t
    }

    pub fn restart(&mut self) {
        self.inner = ValueTransition::new(0.0, 1.0, self.duration_seconds);
    }

    pub fn finish(&mut self) {
        self.inner.step(f32::MAX);
    }

    pub fn step(&mut self, dt_seconds: f32) {
        self.inner.step(dt_seconds);
    }

    pub fn progress(&self) -> f32 {
        self.inner.value()
    }

    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }
}

impl Default for GeometryTransition {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION_MS)
    }
}
