// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the Camera struct, which describes a rectangle on the
//! complex plane by its center, its width, and the aspect ratio of the
//! image it will be drawn into.  Maps normalized image coordinates
//! (both in `[0, 1]`) to points inside that rectangle.
use num::Complex;

/// Center of the home view, which frames the whole set.
pub const HOME_CENTER: Complex<f64> = Complex { re: -0.5, im: 0.0 };

/// Horizontal extent of the home view on the complex plane.
pub const HOME_WIDTH: f64 = 3.0;

/// A viewport onto the complex plane.  Cameras are never changed in
/// place; a new view is a new Camera.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Camera {
    center: Complex<f64>,
    width: f64,
    aspect_ratio: f64,
}

impl Camera {
    /// Constructor.  The view is centered on `center`, covers `width`
    /// horizontally and `width / aspect_ratio` vertically.  Both
    /// `width` and `aspect_ratio` must be positive, and everything
    /// finite; the caller is expected to have checked.
    pub fn new(center: Complex<f64>, width: f64, aspect_ratio: f64) -> Camera {
        debug_assert!(
            center.re.is_finite() && center.im.is_finite(),
            "camera center must be finite"
        );
        debug_assert!(width.is_finite(), "camera width must be finite");
        debug_assert!(width > 0.0, "camera width must be positive");
        debug_assert!(aspect_ratio > 0.0, "camera aspect ratio must be positive");
        Camera {
            center,
            width,
            aspect_ratio,
        }
    }

    /// The view that shows the whole set, for an image with the given
    /// aspect ratio (image width over image height).
    pub fn home(aspect_ratio: f64) -> Camera {
        Camera::new(HOME_CENTER, HOME_WIDTH, aspect_ratio)
    }

    /// Describes the view by the width and height of the rectangle on
    /// the complex plane, rather than by an aspect ratio.
    pub fn from_extent(center: Complex<f64>, width: f64, height: f64) -> Camera {
        Camera::new(center, width, width / height)
    }

    /// The point at the middle of the view.
    pub fn center(&self) -> Complex<f64> {
        self.center
    }

    /// Horizontal extent on the complex plane.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Vertical extent on the complex plane.
    pub fn height(&self) -> f64 {
        self.width / self.aspect_ratio
    }

    /// Width over height.
    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    /// Given a horizontal fraction `u` and a vertical fraction `v` of
    /// the image, return the matching point on the complex plane.  `v`
    /// runs bottom to top, so callers walking image rows from the top
    /// have to flip it first.
    #[inline]
    pub fn to_complex(&self, u: f64, v: f64) -> Complex<f64> {
        Complex::new(
            self.center.re + (u - 0.5) * self.width,
            self.center.im + (v - 0.5) * self.height(),
        )
    }
}
