#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelbrot renderer with histogram coloring
//!
//! The Mandelbrot set takes a point on the complex plane and
//! repeatedly squares it, adding the original point back in each
//! time, and measures how quickly the result heads off to infinity.
//! Points that never leave are "in" the set and are painted black;
//! everything else is colored by that escape "velocity."
//!
//! Coloring by raw velocity gives a muddy picture, because almost all
//! of the interesting values are crowded together near the boundary
//! of the set.  Instead, every escaping sample in the frame is ranked,
//! and the rank (not the value) picks the color out of a gradient of
//! control points.  Whatever the zoom, the palette is stretched over
//! whatever is actually on screen.
//!
//! Each pixel is supersampled on a small square grid, so the ranking
//! works on sub-pixels, and the frame can be drawn either at the full
//! supersampled resolution or averaged back down to one color per
//! pixel.

#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;
extern crate crossbeam;
extern crate image;
extern crate itertools;
extern crate num;

pub mod camera;
pub mod color;
pub mod errors;
pub mod frame;
pub mod histogram;
pub mod job;
pub mod mandelbrot;
pub mod pixel;

pub use camera::Camera;
pub use color::Color;
pub use errors::{ColorParseError, ConfigurationError, RenderError};
pub use frame::{render_frame, render_frame_threaded, Dimensions, Frame, SUPERSAMPLING};
pub use histogram::Histogram;
pub use job::{RenderJob, RenderRequest};
pub use mandelbrot::{Divergence, Mandelbrot};
pub use num::Complex;
pub use pixel::{Canvas, Pixel, RenderMode, SubPixel};
