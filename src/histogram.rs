// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Rank-based coloring.
//!
//! A histogram is a gradient described by control points: a list of
//! breakpoints between 0.0 and 1.0, each paired with a color.  Asked
//! for `n` colors, it walks ranks `0..n` in order, places each rank at
//! `k / (n - 1)` along the gradient, and blends the two control points
//! on either side.  The frame builder hands rank `k` to the `k`-th
//! fastest-escaping sample, so the breakpoints say "this fraction of
//! the escaping samples gets this part of the palette" no matter how
//! the raw escape counts are distributed.

use color::Color;
use errors::ConfigurationError;

/// Breakpoints of the default palette.
pub const DEFAULT_BREAKPOINTS: [f64; 6] = [0.0, 0.75, 0.85, 0.95, 0.99, 1.0];

/// Colors of the default palette: dark gray, light gray, teal-blue,
/// indigo, tan, and pale yellow.
pub const DEFAULT_COLORS: [Color; 6] = [
    Color::rgb(51, 51, 51),
    Color::rgb(179, 179, 179),
    Color::rgb(55, 118, 145),
    Color::rgb(63, 74, 132),
    Color::rgb(145, 121, 82),
    Color::rgb(250, 250, 200),
];

/// A validated gradient.  Once built it never changes; a different
/// palette is a different Histogram.
#[derive(Clone, Debug, PartialEq)]
pub struct Histogram {
    breakpoints: Vec<f64>,
    colors: Vec<Color>,
}

impl Histogram {
    /// Constructor.  Fails unless there are as many breakpoints as
    /// colors, at least two of each, and the breakpoints climb (ties
    /// allowed) from exactly 0.0 to exactly 1.0.
    pub fn new(breakpoints: Vec<f64>, colors: Vec<Color>) -> Result<Histogram, ConfigurationError> {
        if breakpoints.len() != colors.len() {
            return Err(ConfigurationError::LengthMismatch(
                breakpoints.len(),
                colors.len(),
            ));
        }
        if breakpoints.len() < 2 {
            return Err(ConfigurationError::TooFewControlPoints(breakpoints.len()));
        }
        if breakpoints[0] != 0.0 {
            return Err(ConfigurationError::BadStart(breakpoints[0]));
        }
        for (i, pair) in breakpoints.windows(2).enumerate() {
            // written this way round so that a NaN fails too
            if !(pair[1] >= pair[0]) {
                return Err(ConfigurationError::NotAscending(i + 1, pair[1]));
            }
        }
        let last = breakpoints[breakpoints.len() - 1];
        if last != 1.0 {
            return Err(ConfigurationError::BadEnd(last));
        }
        Ok(Histogram {
            breakpoints,
            colors,
        })
    }

    /// The default breakpoints, with a different set of six colors.
    pub fn with_colors(colors: Vec<Color>) -> Result<Histogram, ConfigurationError> {
        Histogram::new(DEFAULT_BREAKPOINTS.to_vec(), colors)
    }

    /// A copy of this histogram with the color at `index` replaced.
    /// Every other slot keeps its color.
    pub fn with_color(&self, index: usize, color: Color) -> Result<Histogram, ConfigurationError> {
        if index >= self.colors.len() {
            return Err(ConfigurationError::IndexOutOfRange(index, self.colors.len()));
        }
        let mut colors = self.colors.clone();
        colors[index] = color;
        Ok(Histogram {
            breakpoints: self.breakpoints.clone(),
            colors,
        })
    }

    /// Positions of the control points.
    pub fn breakpoints(&self) -> &[f64] {
        &self.breakpoints
    }

    /// Colors of the control points.
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// The color at position `p` (in `[0, 1]`) along the gradient.
    pub fn color_at(&self, p: f64) -> Color {
        let last = self.breakpoints.len() - 2;
        // First interval whose upper end reaches p; a p past the end
        // (which the invariants rule out) lands in the last one.
        let i = self.breakpoints[1..]
            .iter()
            .position(|&upper| p <= upper)
            .unwrap_or(last);
        let (low, high) = (self.breakpoints[i], self.breakpoints[i + 1]);
        if high == low {
            return self.colors[i];
        }
        let t = (p - low) / (high - low);
        self.colors[i].lerp(self.colors[i + 1], t)
    }

    /// One color per rank, for `n` ranks, fastest-escaping first.
    pub fn generate(&self, n: usize) -> Vec<Color> {
        let span = if n > 1 { (n - 1) as f64 } else { 1.0 };
        (0..n).map(|k| self.color_at(k as f64 / span)).collect()
    }
}

impl Default for Histogram {
    fn default() -> Histogram {
        Histogram {
            breakpoints: DEFAULT_BREAKPOINTS.to_vec(),
            colors: DEFAULT_COLORS.to_vec(),
        }
    }
}
