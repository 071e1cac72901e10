// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The things that can go wrong.  Divergence itself never fails; what
//! can fail is the color configuration handed in from outside, and a
//! background render that dies before handing back its frame.

/// A histogram configuration that cannot be rendered.  These are
/// raised when the histogram is built, never during a render, and
/// nothing is ever silently clamped into shape.
#[derive(Debug, Fail, PartialEq)]
pub enum ConfigurationError {
    /// The breakpoint count and the color count differ.
    #[fail(display = "{} breakpoints were given for {} colors", _0, _1)]
    LengthMismatch(usize, usize),

    /// A gradient needs at least two ends.
    #[fail(display = "a histogram needs at least two control points, got {}", _0)]
    TooFewControlPoints(usize),

    /// The breakpoint at the given index is lower than its predecessor
    /// (or is not a number at all).
    #[fail(display = "breakpoint {} ({}) is lower than the one before it", _0, _1)]
    NotAscending(usize, f64),

    /// The first breakpoint is not 0.0.
    #[fail(display = "the first breakpoint must be 0.0, got {}", _0)]
    BadStart(f64),

    /// The last breakpoint is not 1.0.
    #[fail(display = "the last breakpoint must be 1.0, got {}", _0)]
    BadEnd(f64),

    /// A color slot past the end of the histogram was addressed.
    #[fail(display = "color slot {} does not exist in a {}-color histogram", _0, _1)]
    IndexOutOfRange(usize, usize),
}

/// A color string that isn't `#rrggbb`.
#[derive(Debug, Fail, PartialEq)]
#[fail(display = "could not parse color {:?}, expected #rrggbb", _0)]
pub struct ColorParseError(pub String);

/// A background render that could not deliver.
#[derive(Debug, Fail, PartialEq)]
pub enum RenderError {
    /// The worker thread went away without sending a frame.
    #[fail(display = "the render worker stopped before producing a frame")]
    WorkerLost,

    /// The frame was already handed out by an earlier poll.
    #[fail(display = "the frame for this render has already been collected")]
    Collected,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_values() {
        let e = ConfigurationError::LengthMismatch(3, 2);
        assert_eq!(format!("{}", e), "3 breakpoints were given for 2 colors");
        let e = ConfigurationError::BadEnd(0.9);
        assert_eq!(format!("{}", e), "the last breakpoint must be 1.0, got 0.9");
        let e = ColorParseError("teal".to_string());
        assert!(format!("{}", e).contains("\"teal\""));
    }
}
