// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Sub-pixels, pixels, and the surface they get drawn on.
//!
//! Every pixel of the output is sampled on an `S × S` grid of
//! sub-pixels.  Each sub-pixel carries its divergence and, once the
//! frame has been ranked, its color.  A `Pixel` is a view onto the
//! `S²` sub-pixels that belong to one output pixel.

use image::RgbImage;
use std::cmp::Ordering;
use std::f64;
use std::str::FromStr;

use color::Color;

/// The one drawing primitive the renderer needs from the outside.
pub trait Canvas {
    /// Set the pixel at column `x`, row `y` (row 0 at the top).
    fn set_pixel(&mut self, x: u32, y: u32, color: Color);
}

impl Canvas for RgbImage {
    fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        self.put_pixel(x, y, color.into());
    }
}

/// How a pixel's sub-pixels reach the canvas.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RenderMode {
    /// Every sub-pixel is plotted on its own, on a canvas `S` times
    /// wider and taller than the frame.
    Supersampled,
    /// The sub-pixels are averaged into one color per frame pixel.
    Averaged,
}

impl RenderMode {
    /// Size of the canvas this mode draws a `width × height` frame
    /// sampled at `supersampling` onto.
    pub fn canvas_size(self, width: u32, height: u32, supersampling: u32) -> (u32, u32) {
        match self {
            RenderMode::Supersampled => (width * supersampling, height * supersampling),
            RenderMode::Averaged => (width, height),
        }
    }
}

impl Default for RenderMode {
    fn default() -> RenderMode {
        RenderMode::Supersampled
    }
}

impl FromStr for RenderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<RenderMode, String> {
        match s {
            "supersampled" => Ok(RenderMode::Supersampled),
            "averaged" => Ok(RenderMode::Averaged),
            _ => Err(format!("unknown render mode {:?}", s)),
        }
    }
}

/// One sample of a pixel.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SubPixel {
    value: f64,
    color: Color,
}

impl SubPixel {
    /// A fresh, uncolored (black) sample with the given divergence.
    pub fn new(value: f64) -> SubPixel {
        SubPixel {
            value,
            color: Color::BLACK,
        }
    }

    /// The divergence measured at this sample.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// The assigned color; black until the frame is colored, and
    /// forever black for samples inside the set.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Whether the sample escaped.  Only escaping samples are ranked.
    pub fn diverges(&self) -> bool {
        self.value != f64::INFINITY
    }

    /// Orders samples by divergence, fastest escape first.
    pub fn compare(&self, other: &SubPixel) -> Ordering {
        self.value
            .partial_cmp(&other.value)
            .unwrap_or(Ordering::Equal)
    }

    pub(crate) fn set_color(&mut self, color: Color) {
        self.color = color;
    }
}

impl Default for SubPixel {
    fn default() -> SubPixel {
        SubPixel::new(f64::INFINITY)
    }
}

/// One output pixel: its grid position, and its sub-pixels in
/// horizontal-offset-major order (`i` outer, `j` inner).
#[derive(Copy, Clone, Debug)]
pub struct Pixel<'a> {
    x: u32,
    y: u32,
    supersampling: u32,
    sub_pixels: &'a [SubPixel],
}

impl<'a> Pixel<'a> {
    pub(crate) fn new(
        x: u32,
        y: u32,
        supersampling: u32,
        sub_pixels: &'a [SubPixel],
    ) -> Pixel<'a> {
        debug_assert_eq!(sub_pixels.len(), (supersampling * supersampling) as usize);
        Pixel {
            x,
            y,
            supersampling,
            sub_pixels,
        }
    }

    /// Column.
    pub fn x(&self) -> u32 {
        self.x
    }

    /// Row, counted from the top.
    pub fn y(&self) -> u32 {
        self.y
    }

    /// All `S²` samples.
    pub fn sub_pixels(&self) -> &'a [SubPixel] {
        self.sub_pixels
    }

    /// The sample at horizontal offset `i` and vertical offset `j`.
    pub fn sub_pixel(&self, i: u32, j: u32) -> &'a SubPixel {
        &self.sub_pixels[(i * self.supersampling + j) as usize]
    }

    /// The mean of the sample colors.  Black for a pixel that hasn't
    /// been colored, or that lies entirely inside the set.
    pub fn color(&self) -> Color {
        Color::average(self.sub_pixels.iter().map(SubPixel::color))
    }

    /// Draw this pixel.
    pub fn render<C: Canvas + ?Sized>(&self, canvas: &mut C, mode: RenderMode) {
        match mode {
            RenderMode::Averaged => canvas.set_pixel(self.x, self.y, self.color()),
            RenderMode::Supersampled => {
                let s = self.supersampling;
                for i in 0..s {
                    for j in 0..s {
                        let color = self.sub_pixel(i, j).color();
                        canvas.set_pixel(s * self.x + i, s * self.y + j, color);
                    }
                }
            }
        }
    }
}
