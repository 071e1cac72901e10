// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! An 8-bit RGB color, plus the two bits of arithmetic the renderer
//! needs: blending between two colors, and averaging a handful of them.

use image::Rgb;
use num::clamp;
use std::fmt;
use std::str::FromStr;

use errors::ColorParseError;

/// An opaque RGB color.  The default is black, which is also the
/// color of everything inside the set.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

#[inline]
fn channel(v: f64) -> u8 {
    clamp(v.round(), 0.0, 255.0) as u8
}

impl Color {
    /// Black.
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };
    /// White.
    pub const WHITE: Color = Color {
        r: 255,
        g: 255,
        b: 255,
    };

    /// Builds a color from its three channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b }
    }

    /// A neutral gray, where 0.0 is black and 1.0 is white.
    pub fn gray(level: f64) -> Color {
        let v = channel(level * 255.0);
        Color { r: v, g: v, b: v }
    }

    /// Blends `self` toward `other`.  `t = 0.0` is `self`, `t = 1.0`
    /// is `other`; each channel is rounded to the nearest step.
    pub fn lerp(self, other: Color, t: f64) -> Color {
        let mix = |a: u8, b: u8| channel(f64::from(a) + (f64::from(b) - f64::from(a)) * t);
        Color {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
        }
    }

    /// The channel-wise mean of a set of colors, rounded half up.
    /// An empty set averages to black.
    pub fn average<I>(colors: I) -> Color
    where
        I: IntoIterator<Item = Color>,
    {
        let (n, r, g, b) = colors
            .into_iter()
            .fold((0u64, 0u64, 0u64, 0u64), |(n, r, g, b), c| {
                (
                    n + 1,
                    r + u64::from(c.r),
                    g + u64::from(c.g),
                    b + u64::from(c.b),
                )
            });
        if n == 0 {
            return Color::BLACK;
        }
        let mean = |sum: u64| ((sum + n / 2) / n) as u8;
        Color {
            r: mean(r),
            g: mean(g),
            b: mean(b),
        }
    }
}

impl From<Color> for Rgb<u8> {
    fn from(c: Color) -> Rgb<u8> {
        Rgb([c.r, c.g, c.b])
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Accepts `#rrggbb`, with or without the leading hash.
impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Color, ColorParseError> {
        let err = || ColorParseError(s.to_string());
        let hex = s.trim();
        let hex = if hex.starts_with('#') { &hex[1..] } else { hex };
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }
        let part = |range: ::std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16);
        match (part(0..2), part(2..4), part(4..6)) {
            (Ok(r), Ok(g), Ok(b)) => Ok(Color { r, g, b }),
            _ => Err(err()),
        }
    }
}
