#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelbrot renderer
//!
//! The Mandelbrot set is the set of points c on the complex plane for
//! which repeatedly squaring z and adding c never runs off to
//! infinity.  Points outside the set do run off, some faster than
//! others, and that "velocity" is what gets colored.
//!
//! Counting whole iterations gives the familiar stepped bands of
//! color.  Instead, once an orbit has escaped well past the bailout,
//! a double logarithm of its magnitude tells us how far past the
//! boundary it got on its last step, and subtracting that gives a
//! continuous escape index.  The index walks through a cyclic palette,
//! blending between adjacent stops, so the bands melt into smooth
//! gradients.
//!
//! A Renderer owns a Viewport (a center and a scale) that can be
//! panned and zoomed between frames.

extern crate crossbeam;
extern crate image;
extern crate itertools;
extern crate num;

pub mod config;
pub mod errors;
pub mod escape;
pub mod palette;
pub mod planes;
pub mod renderer;
pub mod viewport;

pub use config::RenderConfig;
pub use errors::RenderError;
pub use escape::{EscapeEvaluator, Smoothing};
pub use palette::{Palette, PixelColor};
pub use planes::{Framing, Pixel, PlaneMapper};
pub use renderer::{Frame, Renderer};
pub use viewport::Viewport;
