// Linear axis scales, nice tick generation and the 2D pan/zoom transform
use serde::{Deserialize, Serialize};

// Thresholds for picking a 1/2/5/10 tick step
const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = 1.4142135623730951; // sqrt(2)

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Maps a data interval onto a pixel interval. Either interval may be reversed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub value: f64,
    pub position: f64,
    pub label: String,
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        LinearScale { domain, range }
    }

    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            // Degenerate extent (a single vertical or horizontal line)
            return (r0 + r1) / 2.0;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    pub fn invert(&self, position: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if r1 == r0 {
            return d0;
        }
        d0 + (position - r0) / (r1 - r0) * (d1 - d0)
    }

    /// Scale whose domain is what is visible through `transform`; the range is kept.
    pub fn rescale(&self, transform: &ZoomTransform, axis: Axis) -> LinearScale {
        let (r0, r1) = self.range;
        let (a, b) = match axis {
            Axis::X => (transform.invert_x(r0), transform.invert_x(r1)),
            Axis::Y => (transform.invert_y(r0), transform.invert_y(r1)),
        };
        LinearScale {
            domain: (self.invert(a), self.invert(b)),
            range: self.range,
        }
    }

    pub fn ticks(&self, count: usize) -> Vec<Tick> {
        let (d0, d1) = self.domain;
        let step = tick_step(d0, d1, count).abs();
        let decimals = if step > 0.0 && step.is_finite() {
            (-step.log10().floor()).max(0.0) as usize
        } else {
            0
        };
        ticks(d0, d1, count)
            .into_iter()
            .map(|value| Tick {
                value,
                position: self.apply(value),
                label: format_tick(value, decimals),
            })
            .collect()
    }
}

fn format_tick(value: f64, decimals: usize) -> String {
    let label = format!("{:.*}", decimals, value);
    // Avoid "-0" for values that round to zero
    if label.trim_start_matches('-').chars().all(|c| c == '0' || c == '.') {
        label.trim_start_matches('-').to_string()
    } else {
        label
    }
}

fn tick_increment(start: f64, stop: f64, count: f64) -> (f64, f64, f64) {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    let mut i1: f64;
    let mut i2: f64;
    let inc: f64;
    if power < 0.0 {
        let inv = 10f64.powf(-power) / factor;
        i1 = (start * inv).round();
        i2 = (stop * inv).round();
        if i1 / inv < start {
            i1 += 1.0;
        }
        if i2 / inv > stop {
            i2 -= 1.0;
        }
        inc = -inv;
    } else {
        inc = 10f64.powf(power) * factor;
        i1 = (start / inc).round();
        i2 = (stop / inc).round();
        if i1 * inc < start {
            i1 += 1.0;
        }
        if i2 * inc > stop {
            i2 -= 1.0;
        }
    }

    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_increment(start, stop, count * 2.0);
    }
    (i1, i2, inc)
}

/// Distance between adjacent ticks for the given span and count.
fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    if count == 0 || !start.is_finite() || !stop.is_finite() || start == stop {
        return 0.0;
    }
    let (lo, hi) = if stop < start { (stop, start) } else { (start, stop) };
    let (_, _, inc) = tick_increment(lo, hi, count as f64);
    if inc < 0.0 {
        1.0 / -inc
    } else {
        inc
    }
}

/// Evenly spaced round values covering `[start, stop]`, in the order of the arguments.
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }
    let reverse = stop < start;
    let (lo, hi) = if reverse { (stop, start) } else { (start, stop) };
    let (i1, i2, inc) = tick_increment(lo, hi, count as f64);
    if !(i2 >= i1) {
        return Vec::new();
    }

    let n = (i2 - i1) as usize + 1;
    let mut values: Vec<f64> = (0..n)
        .map(|i| {
            let idx = i1 + i as f64;
            if inc < 0.0 {
                idx / -inc
            } else {
                idx * inc
            }
        })
        .collect();
    if reverse {
        values.reverse();
    }
    values
}

/// Pan/zoom state of the 2D view: screen = data * k + (x, y).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomTransform {
    pub k: f64,
    pub x: f64,
    pub y: f64,
}

impl Default for ZoomTransform {
    fn default() -> Self {
        ZoomTransform::identity()
    }
}

impl ZoomTransform {
    pub fn identity() -> Self {
        ZoomTransform { k: 1.0, x: 0.0, y: 0.0 }
    }

    pub fn apply(&self, point: [f64; 2]) -> [f64; 2] {
        [point[0] * self.k + self.x, point[1] * self.k + self.y]
    }

    pub fn invert(&self, point: [f64; 2]) -> [f64; 2] {
        [self.invert_x(point[0]), self.invert_y(point[1])]
    }

    pub fn invert_x(&self, x: f64) -> f64 {
        (x - self.x) / self.k
    }

    pub fn invert_y(&self, y: f64) -> f64 {
        (y - self.y) / self.k
    }

    /// Multiplies the scale by `factor` while keeping `point` fixed on screen.
    pub fn zoom_at(&self, point: [f64; 2], factor: f64, extent: (f64, f64)) -> ZoomTransform {
        if !factor.is_finite() || factor <= 0.0 {
            return *self;
        }
        // max/min rather than clamp: an inverted extent must not panic
        let k = (self.k * factor).max(extent.0).min(extent.1);
        let anchor = self.invert(point);
        ZoomTransform {
            k,
            x: point[0] - anchor[0] * k,
            y: point[1] - anchor[1] * k,
        }
    }

    pub fn pan(&self, dx: f64, dy: f64) -> ZoomTransform {
        ZoomTransform {
            k: self.k,
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn to_svg_attr(&self) -> String {
        format!("translate({},{}) scale({})", self.x, self.y, self.k)
    }
}
