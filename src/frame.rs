// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Builds a frame: evaluates every sub-pixel of the canvas, ranks the
//! ones that escaped, and paints them from the histogram.
//!
//! All of the sub-pixels of a frame live in one contiguous block.
//! Pixel `p` owns the `S²` slots starting at `p * S²`, and pixels are
//! laid out column by column (x outer, y inner).  That layout is also
//! the tie-break order when two samples have the same divergence.

use crossbeam;
use image::RgbImage;
use itertools::iproduct;
use std::panic;

use camera::Camera;
use histogram::Histogram;
use mandelbrot::Divergence;
use pixel::{Canvas, Pixel, RenderMode, SubPixel};

/// Default side of the sampling grid inside each pixel.
pub const SUPERSAMPLING: u32 = 3;

/// The size of a frame in pixels, and how finely each pixel is sampled.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Side of the sampling grid; each pixel gets `supersampling²`
    /// sub-pixels.
    pub supersampling: u32,
}

impl Dimensions {
    /// A `width × height` canvas at the default supersampling.
    pub fn new(width: u32, height: u32) -> Dimensions {
        Dimensions {
            width,
            height,
            supersampling: SUPERSAMPLING,
        }
    }

    /// The same canvas, sampled on a different grid.  The grid must
    /// be at least one sample wide.
    pub fn with_supersampling(self, supersampling: u32) -> Dimensions {
        debug_assert!(supersampling > 0, "supersampling must be at least 1");
        Dimensions {
            supersampling,
            ..self
        }
    }

    /// Width over height, for building a camera that fits.
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    /// Sub-pixels per pixel.
    pub fn samples_per_pixel(&self) -> usize {
        (self.supersampling * self.supersampling) as usize
    }

    /// Pixels in the frame.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Sub-pixels in the frame.
    pub fn sample_count(&self) -> usize {
        self.pixel_count() * self.samples_per_pixel()
    }

    /// Grid position of the pixel stored at `index`.
    fn pixel_at(&self, index: usize) -> (u32, u32) {
        let height = self.height as usize;
        ((index / height) as u32, (index % height) as u32)
    }

    /// Normalized position of sub-sample `(i, j)` of pixel `(x, y)`.
    /// The vertical coordinate is flipped so that row 0 is the top of
    /// the view.
    fn sample_position(&self, x: u32, y: u32, i: u32, j: u32) -> (f64, f64) {
        let s = self.supersampling;
        let width = f64::from(s * self.width);
        let height = f64::from(s * self.height);
        (
            f64::from(s * x + i) / width,
            1.0 - f64::from(s * y + j) / height,
        )
    }
}

/// One rendered image.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    dimensions: Dimensions,
    sub_pixels: Vec<SubPixel>,
    colored: usize,
}

impl Frame {
    /// The frame's size and sampling.
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Every sub-pixel, pixel by pixel.
    pub fn sub_pixels(&self) -> &[SubPixel] {
        &self.sub_pixels
    }

    /// How many sub-pixels escaped and were given a histogram color.
    pub fn colored_count(&self) -> usize {
        self.colored
    }

    /// Every pixel, column by column.
    pub fn pixels<'a>(&'a self) -> impl Iterator<Item = Pixel<'a>> + 'a {
        let dimensions = self.dimensions;
        self.sub_pixels
            .chunks(dimensions.samples_per_pixel())
            .enumerate()
            .map(move |(index, samples)| {
                let (x, y) = dimensions.pixel_at(index);
                Pixel::new(x, y, dimensions.supersampling, samples)
            })
    }

    /// The pixel at column `x`, row `y`, if it is on the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Pixel> {
        let d = self.dimensions;
        if x >= d.width || y >= d.height {
            return None;
        }
        let spp = d.samples_per_pixel();
        let start = (x as usize * d.height as usize + y as usize) * spp;
        Some(Pixel::new(
            x,
            y,
            d.supersampling,
            &self.sub_pixels[start..start + spp],
        ))
    }

    /// Draw every pixel onto `canvas`, which must be at least as large
    /// as `mode.canvas_size(..)` says.
    pub fn render<C: Canvas + ?Sized>(&self, canvas: &mut C, mode: RenderMode) {
        for pixel in self.pixels() {
            pixel.render(canvas, mode);
        }
    }

    /// Draw the frame into a freshly allocated image of the right size.
    pub fn to_image(&self, mode: RenderMode) -> RgbImage {
        let d = self.dimensions;
        let (width, height) = mode.canvas_size(d.width, d.height, d.supersampling);
        let mut image = RgbImage::new(width, height);
        self.render(&mut image, mode);
        image
    }
}

/// Evaluates a run of consecutive pixels, starting with the pixel
/// stored at `first`, into `samples`.
fn evaluate_pixels<D: Divergence + ?Sized>(
    camera: &Camera,
    dimensions: Dimensions,
    evaluator: &D,
    first: usize,
    samples: &mut [SubPixel],
) {
    let s = dimensions.supersampling;
    let spp = dimensions.samples_per_pixel();
    for (offset, pixel) in samples.chunks_mut(spp).enumerate() {
        let (x, y) = dimensions.pixel_at(first + offset);
        for (slot, (i, j)) in pixel.iter_mut().zip(iproduct!(0..s, 0..s)) {
            let (u, v) = dimensions.sample_position(x, y, i, j);
            *slot = SubPixel::new(evaluator.divergence(camera.to_complex(u, v)));
        }
    }
}

/// Ranks every escaping sample, slowest escape last, and paints it
/// with the histogram color for its rank.  Samples inside the set
/// stay black.  Returns the number of samples painted.
fn color_sub_pixels(sub_pixels: &mut [SubPixel], histogram: &Histogram) -> usize {
    let mut ranked: Vec<usize> = sub_pixels
        .iter()
        .enumerate()
        .filter(|&(_, sample)| sample.diverges())
        .map(|(index, _)| index)
        .collect();
    if ranked.is_empty() {
        debug!("no sample escaped; frame stays black");
        return 0;
    }

    // Stable, so equal divergences keep their storage order.
    ranked.sort_by(|&a, &b| sub_pixels[a].compare(&sub_pixels[b]));
    let colors = histogram.generate(ranked.len());
    for (&index, &color) in ranked.iter().zip(colors.iter()) {
        sub_pixels[index].set_color(color);
    }
    ranked.len()
}

fn finish(dimensions: Dimensions, mut sub_pixels: Vec<SubPixel>, histogram: &Histogram) -> Frame {
    trace!("begin color_sub_pixels");
    let colored = color_sub_pixels(&mut sub_pixels, histogram);
    trace!("end color_sub_pixels");
    debug!(
        "colored {} of {} sub-pixels in a {}x{} frame",
        colored,
        sub_pixels.len(),
        dimensions.width,
        dimensions.height
    );
    Frame {
        dimensions,
        sub_pixels,
        colored,
    }
}

/// Renders one frame on the calling thread.
pub fn render_frame<D: Divergence + ?Sized>(
    camera: &Camera,
    dimensions: Dimensions,
    evaluator: &D,
    histogram: &Histogram,
) -> Frame {
    assert!(dimensions.supersampling > 0, "supersampling must be at least 1");
    let mut sub_pixels = vec![SubPixel::default(); dimensions.sample_count()];
    trace!("begin evaluate_pixels");
    evaluate_pixels(camera, dimensions, evaluator, 0, &mut sub_pixels);
    trace!("end evaluate_pixels");
    finish(dimensions, sub_pixels, histogram)
}

/// Renders one frame, spreading the divergence pass over `threads`
/// workers.  Each worker owns a contiguous run of pixels; ranking and
/// coloring wait until every worker is done.  The result is identical
/// to `render_frame`.
pub fn render_frame_threaded<D: Divergence + ?Sized>(
    camera: &Camera,
    dimensions: Dimensions,
    evaluator: &D,
    histogram: &Histogram,
    threads: usize,
) -> Frame {
    let threads = threads.max(1);
    let pixel_count = dimensions.pixel_count();
    if threads == 1 || pixel_count < 2 {
        return render_frame(camera, dimensions, evaluator, histogram);
    }

    assert!(dimensions.supersampling > 0, "supersampling must be at least 1");
    let spp = dimensions.samples_per_pixel();
    let zonesize = (pixel_count + threads - 1) / threads;
    let mut sub_pixels = vec![SubPixel::default(); dimensions.sample_count()];
    debug!(
        "evaluating {} pixels on {} threads, {} pixels each",
        pixel_count, threads, zonesize
    );
    {
        let regions: Vec<&mut [SubPixel]> = sub_pixels.chunks_mut(zonesize * spp).collect();
        let result = crossbeam::scope(|spawner| {
            for (n, region) in regions.into_iter().enumerate() {
                spawner.spawn(move |_| {
                    evaluate_pixels(camera, dimensions, evaluator, n * zonesize, region);
                });
            }
        });
        if let Err(cause) = result {
            panic::resume_unwind(cause);
        }
    }
    finish(dimensions, sub_pixels, histogram)
}

#[cfg(test)]
mod tests {
    use super::*;
    use color::Color;
    use mandelbrot::Mandelbrot;
    use num::Complex;

    #[test]
    fn samples_cover_the_pixel_footprint() {
        let d = Dimensions::new(2, 2).with_supersampling(2);
        assert_eq!(d.sample_position(0, 0, 0, 0), (0.0, 1.0));
        assert_eq!(d.sample_position(0, 0, 1, 1), (0.25, 0.75));
        assert_eq!(d.sample_position(1, 1, 1, 1), (0.75, 0.25));
    }

    #[test]
    fn pixels_are_stored_column_major() {
        let d = Dimensions::new(3, 2);
        assert_eq!(d.pixel_at(0), (0, 0));
        assert_eq!(d.pixel_at(1), (0, 1));
        assert_eq!(d.pixel_at(2), (1, 0));
        assert_eq!(d.pixel_at(5), (2, 1));
    }

    #[test]
    fn every_pixel_gets_a_full_grid() {
        let d = Dimensions::new(5, 3);
        let cam = Camera::home(d.aspect_ratio());
        let frame = render_frame(&cam, d, &Mandelbrot::default(), &Histogram::default());
        assert_eq!(frame.sub_pixels().len(), 5 * 3 * 9);
        let pixels: Vec<Pixel> = frame.pixels().collect();
        assert_eq!(pixels.len(), 15);
        assert!(pixels.iter().all(|p| p.sub_pixels().len() == 9));
        assert_eq!((pixels[4].x(), pixels[4].y()), (1, 1));
        assert!(frame.pixel(5, 0).is_none());
        assert_eq!(
            frame.pixel(1, 1).map(|p| p.sub_pixels()),
            Some(pixels[4].sub_pixels())
        );
    }

    #[test]
    fn ties_keep_storage_order() {
        // Every sample escapes at the same speed; ranks follow storage.
        let flat = |_: Complex<f64>| 5.0;
        let ramp = Histogram::new(vec![0.0, 1.0], vec![Color::BLACK, Color::WHITE]).unwrap();
        let d = Dimensions::new(1, 3).with_supersampling(1);
        let frame = render_frame(&Camera::home(1.0), d, &flat, &ramp);
        let reds: Vec<u8> = frame.sub_pixels().iter().map(|s| s.color().r).collect();
        assert_eq!(reds, vec![0, 128, 255]);
    }

    #[test]
    fn slowest_escape_gets_the_last_color() {
        // Divergence grows toward the top of the view.
        let by_height = |c: Complex<f64>| c.im + 10.0;
        let ramp = Histogram::new(vec![0.0, 1.0], vec![Color::BLACK, Color::WHITE]).unwrap();
        let d = Dimensions::new(1, 3).with_supersampling(1);
        let frame = render_frame(&Camera::home(1.0), d, &by_height, &ramp);
        assert_eq!(frame.pixel(0, 0).map(|p| p.color()), Some(Color::WHITE));
        assert_eq!(frame.pixel(0, 2).map(|p| p.color()), Some(Color::BLACK));
    }

    #[test]
    fn set_members_stay_black() {
        let half = |c: Complex<f64>| if c.re < -0.5 { 1.0 } else { ::std::f64::INFINITY };
        let d = Dimensions::new(4, 1).with_supersampling(1);
        let white = Histogram::new(vec![0.0, 1.0], vec![Color::WHITE, Color::WHITE]).unwrap();
        let frame = render_frame(&Camera::home(4.0), d, &half, &white);
        let colors: Vec<Color> = frame.pixels().map(|p| p.color()).collect();
        assert_eq!(colors, vec![Color::WHITE, Color::WHITE, Color::BLACK, Color::BLACK]);
        assert_eq!(frame.colored_count(), 2);
    }

    #[test]
    fn threads_do_not_change_the_picture() {
        let d = Dimensions::new(23, 17).with_supersampling(2);
        let cam = Camera::new(Complex::new(-0.75, 0.1), 0.5, d.aspect_ratio());
        let m = Mandelbrot::new(200);
        let h = Histogram::default();
        let single = render_frame(&cam, d, &m, &h);
        for threads in &[0, 2, 3, 8, 1000] {
            assert_eq!(render_frame_threaded(&cam, d, &m, &h, *threads), single);
        }
    }

    #[test]
    fn image_size_follows_the_mode() {
        let d = Dimensions::new(4, 3).with_supersampling(2);
        let cam = Camera::home(d.aspect_ratio());
        let frame = render_frame(&cam, d, &Mandelbrot::new(50), &Histogram::default());
        assert_eq!(frame.to_image(RenderMode::Supersampled).dimensions(), (8, 6));
        assert_eq!(frame.to_image(RenderMode::Averaged).dimensions(), (4, 3));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "supersampling must be at least 1")]
    fn supersampling_must_be_positive() {
        Dimensions::new(4, 4).with_supersampling(0);
    }

    #[test]
    #[should_panic(expected = "supersampling must be at least 1")]
    fn frames_refuse_an_empty_sampling_grid() {
        let d = Dimensions {
            width: 4,
            height: 4,
            supersampling: 0,
        };
        render_frame_threaded(
            &Camera::home(1.0),
            d,
            &Mandelbrot::default(),
            &Histogram::default(),
            2,
        );
    }
}
