use indexmap::IndexSet;

/// Continuous `domain -> range` mapping.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    domain_min: f32,
    domain_max: f32,
    range_min: f32,
    range_max: f32,
}

impl LinearScale {
    pub fn new(domain_min: f32, domain_max: f32, range_min: f32, range_max: f32) -> Self {
        Self {
            domain_min,
            domain_max,
            range_min,
            range_max,
        }
    }

    pub fn domain(&self) -> (f32, f32) {
        (self.domain_min, self.domain_max)
    }

    pub fn range(&self) -> (f32, f32) {
        (self.range_min, self.range_max)
    }

    pub fn map(&self, value: f32) -> f32 {
        let d = self.domain_max - self.domain_min;
        if d.abs() < 1e-12 {
            return self.range_min;
        }
        let t = (value - self.domain_min) / d;
        self.range_min + t * (self.range_max - self.range_min)
    }

    pub fn invert(&self, px: f32) -> f32 {
        let r = self.range_max - self.range_min;
        if r.abs() < 1e-12 {
            return self.domain_min;
        }
        let t = (px - self.range_min) / r;
        self.domain_min + t * (self.domain_max - self.domain_min)
    }

    /// Extend the domain outward to round tick boundaries.
    ///
    /// Only applied once the tick step converges; a degenerate domain is left as is.
    pub fn nice(self, count: usize) -> Self {
        let (mut start, mut stop) = (self.domain_min as f64, self.domain_max as f64);
        if count == 0 || !start.is_finite() || !stop.is_finite() || start == stop {
            return self;
        }
        let reverse = stop < start;
        if reverse {
            std::mem::swap(&mut start, &mut stop);
        }

        let mut prestep = None;
        for _ in 0..10 {
            let Some(step) = tick_increment(start, stop, count as f64) else {
                break;
            };
            if prestep == Some(step) {
                let (lo, hi) = if reverse { (stop, start) } else { (start, stop) };
                return Self {
                    domain_min: lo as f32,
                    domain_max: hi as f32,
                    ..self
                };
            }
            if step > 0.0 {
                start = (start / step).floor() * step;
                stop = (stop / step).ceil() * step;
            } else {
                start = (start * step).ceil() / step;
                stop = (stop * step).floor() / step;
            }
            prestep = Some(step);
        }
        self
    }

    /// Roughly `count` human-friendly tick values (steps of 1, 2 or 5 × 10ⁿ) inside the domain.
    pub fn ticks(&self, count: usize) -> Vec<f32> {
        let (mut start, mut stop) = (self.domain_min as f64, self.domain_max as f64);
        if count == 0 || !start.is_finite() || !stop.is_finite() {
            return Vec::new();
        }
        if start == stop {
            return vec![self.domain_min];
        }
        let reverse = stop < start;
        if reverse {
            std::mem::swap(&mut start, &mut stop);
        }

        let Some((i1, i2, inc)) = tick_spec(start, stop, count as f64) else {
            return Vec::new();
        };
        if i2 < i1 {
            return Vec::new();
        }

        let n = (i2 - i1) as usize + 1;
        let mut out: Vec<f32> = (0..n)
            .map(|i| {
                let k = i1 + i as f64;
                let v = if inc < 0.0 { k / -inc } else { k * inc };
                v as f32
            })
            .collect();
        if reverse {
            out.reverse();
        }
        out
    }
}

fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Tick index bounds and increment. A negative increment means "divide by `-inc`", which
/// keeps fractional steps exact.
fn tick_spec(start: f64, stop: f64, count: f64) -> Option<(f64, f64, f64)> {
    let step = (stop - start) / count.max(0.0);
    if !step.is_finite() || step <= 0.0 {
        return None;
    }
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };

    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let inv = 10f64.powf(-power) / factor;
        i1 = round_half_up(start * inv);
        i2 = round_half_up(stop * inv);
        if i1 / inv < start {
            i1 += 1.0;
        }
        if i2 / inv > stop {
            i2 -= 1.0;
        }
        inc = -inv;
    } else {
        let s = 10f64.powf(power) * factor;
        i1 = round_half_up(start / s);
        i2 = round_half_up(stop / s);
        if i1 * s < start {
            i1 += 1.0;
        }
        if i2 * s > stop {
            i2 -= 1.0;
        }
        inc = s;
    }

    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    Some((i1, i2, inc))
}

fn tick_increment(start: f64, stop: f64, count: f64) -> Option<f64> {
    tick_spec(start, stop, count).map(|(_, _, inc)| inc)
}

/// Evenly spaced bands over a pixel range, centred when outer padding leaves slack.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BandScale {
    count: usize,
    start: f32,
    step: f32,
    band_width: f32,
}

impl BandScale {
    pub fn new(
        count: usize,
        range_min: f32,
        range_max: f32,
        padding_inner: f32,
        padding_outer: f32,
    ) -> Self {
        if count == 0 {
            return Self {
                count: 0,
                start: range_min,
                step: 0.0,
                band_width: 0.0,
            };
        }
        let count_f = count as f32;
        let span = (range_max - range_min).max(0.0);
        let denom = (count_f - padding_inner + 2.0 * padding_outer).max(1.0);
        let step = span / denom;
        let band_width = step * (1.0 - padding_inner).max(0.0);
        let start = range_min + step * padding_outer;
        Self {
            count,
            start,
            step,
            band_width,
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    pub fn band_width(&self) -> f32 {
        self.band_width
    }

    pub fn band_start(&self, idx: usize) -> Option<f32> {
        if idx >= self.count {
            return None;
        }
        Some(self.start + self.step * idx as f32)
    }

    pub fn center(&self, idx: usize) -> Option<f32> {
        self.band_start(idx).map(|x| x + self.band_width * 0.5)
    }
}

/// Band scale keyed by category label instead of index.
///
/// Labels keep their insertion order; a repeated label maps to its first band.
#[derive(Clone, Debug, PartialEq)]
pub struct CategoryBand {
    labels: IndexSet<String>,
    scale: BandScale,
}

impl CategoryBand {
    pub fn new<I, S>(
        labels: I,
        range_min: f32,
        range_max: f32,
        padding_inner: f32,
        padding_outer: f32,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: IndexSet<String> = labels.into_iter().map(Into::into).collect();
        let scale = BandScale::new(
            labels.len(),
            range_min,
            range_max,
            padding_inner,
            padding_outer,
        );
        Self { labels, scale }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.labels.get_index_of(label)
    }

    pub fn band_width(&self) -> f32 {
        self.scale.band_width()
    }

    pub fn band_start(&self, label: &str) -> Option<f32> {
        self.index_of(label).and_then(|i| self.scale.band_start(i))
    }

    pub fn center(&self, label: &str) -> Option<f32> {
        self.index_of(label).and_then(|i| self.scale.center(i))
    }

    pub fn scale(&self) -> &BandScale {
        &self.scale
    }
}
