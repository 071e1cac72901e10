// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time test.  A point `c` is iterated as `z = z * z + c`
//! starting from zero; the number of steps it takes for `z` to leave
//! the escape circle is its divergence.  Points that are still inside
//! after the iteration limit are treated as members of the set, and
//! get an infinite divergence.

use num::Complex;
use std::f64;

/// Default cap on the number of iterations per point.
pub const MAX_ITERATIONS: usize = 500;

/// Default escape threshold on `|z|²`.  Once `|z| > 2` the orbit is
/// guaranteed to run off to infinity.
pub const ESCAPE_RADIUS_SQ: f64 = 4.0;

/// Anything that can tell how fast a point runs away.  Implementations
/// must be total and deterministic; the frame builder shares one
/// evaluator between all of its worker threads.
pub trait Divergence: Sync {
    /// Returns a finite divergence for points that escape, larger for
    /// slower escapes, and `f64::INFINITY` for points that never do.
    fn divergence(&self, c: Complex<f64>) -> f64;
}

impl<F> Divergence for F
where
    F: Fn(Complex<f64>) -> f64 + Sync,
{
    fn divergence(&self, c: Complex<f64>) -> f64 {
        self(c)
    }
}

/// The naive Mandelbrot escape-time evaluator.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Mandelbrot {
    max_iterations: usize,
    escape_radius_sq: f64,
}

impl Mandelbrot {
    /// An evaluator that gives up after `max_iterations` steps.
    pub fn new(max_iterations: usize) -> Mandelbrot {
        Mandelbrot {
            max_iterations,
            escape_radius_sq: ESCAPE_RADIUS_SQ,
        }
    }

    /// Replaces the escape threshold on `|z|²`.
    pub fn with_escape_radius_sq(self, escape_radius_sq: f64) -> Mandelbrot {
        Mandelbrot {
            escape_radius_sq,
            ..self
        }
    }

    /// The iteration limit.
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// The escape threshold on `|z|²`.
    pub fn escape_radius_sq(&self) -> f64 {
        self.escape_radius_sq
    }
}

impl Default for Mandelbrot {
    fn default() -> Mandelbrot {
        Mandelbrot::new(MAX_ITERATIONS)
    }
}

impl Divergence for Mandelbrot {
    fn divergence(&self, c: Complex<f64>) -> f64 {
        let mut z: Complex<f64> = Complex { re: 0.0, im: 0.0 };
        let mut n = 0;
        while n < self.max_iterations && z.norm_sqr() <= self.escape_radius_sq {
            z = z * z + c;
            n += 1;
        }
        if n == self.max_iterations {
            f64::INFINITY
        } else {
            n as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_never_escapes() {
        let m = Mandelbrot::default();
        assert_eq!(m.divergence(Complex::new(0.0, 0.0)), f64::INFINITY);
    }

    #[test]
    fn interior_points_never_escape() {
        let m = Mandelbrot::default();
        // Main cardioid, period-2 bulb, and the tip of the needle.
        assert!(m.divergence(Complex::new(-0.5, 0.0)).is_infinite());
        assert!(m.divergence(Complex::new(-1.0, 0.0)).is_infinite());
        assert!(m.divergence(Complex::new(-2.0, 0.0)).is_infinite());
    }

    #[test]
    fn far_points_escape_at_once() {
        let m = Mandelbrot::default();
        assert_eq!(m.divergence(Complex::new(3.0, 3.0)), 1.0);
        assert_eq!(m.divergence(Complex::new(-2.0, 1.5)), 1.0);
    }

    #[test]
    fn slower_escape_means_larger_divergence() {
        let m = Mandelbrot::default();
        let near = m.divergence(Complex::new(0.26, 0.0));
        let far = m.divergence(Complex::new(1.0, 0.0));
        assert!(near.is_finite());
        assert!(near > far);
        // 0 -> 1 -> 2 -> 5
        assert_eq!(far, 3.0);
    }

    #[test]
    fn iteration_limit_bounds_the_answer() {
        let m = Mandelbrot::new(2);
        // Escapes on the third step, which the limit never reaches.
        assert!(m.divergence(Complex::new(1.0, 0.0)).is_infinite());
        assert_eq!(m.max_iterations(), 2);
    }

    #[test]
    fn closures_are_evaluators() {
        let constant = |_: Complex<f64>| 7.0;
        assert_eq!(constant.divergence(Complex::new(1.0, 1.0)), 7.0);
    }

    #[test]
    fn escape_radius_is_adjustable() {
        let m = Mandelbrot::default().with_escape_radius_sq(100.0);
        assert_eq!(m.escape_radius_sq(), 100.0);
        // 3+3i: |c|² = 18 is still inside a radius of 10.
        assert_eq!(m.divergence(Complex::new(3.0, 3.0)), 2.0);
    }
}
