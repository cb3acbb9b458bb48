//! The Viewport is the window into the complex plane that a frame
//! will show.  It knows where it is centered and how much of the
//! plane it covers, and it can be moved around and zoomed.

use num::Complex;

/// A pannable, zoomable window onto the complex plane.
///
/// `scale` is the linear size of the view in plane units; at a scale
/// of 1 the default framing shows four units across.  Zooming in makes
/// `scale` smaller.  `aspect_ratio` is height over width of the image
/// the view will be rendered into, and keeps circles circular.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    center: Complex<f64>,
    scale: f64,
    aspect_ratio: f64,
}

impl Viewport {
    /// A viewport centered on the origin at a scale of 1, for an image
    /// of the given pixel size.
    pub fn new(width: usize, height: usize) -> Viewport {
        Viewport::with_position(width, height, Complex::new(0.0, 0.0), 1.0)
    }

    /// A viewport with an explicit center and scale.  The caller is
    /// responsible for handing in a positive scale; `Renderer::new`
    /// checks this before building one.
    pub fn with_position(width: usize, height: usize, center: Complex<f64>, scale: f64) -> Viewport {
        Viewport {
            center,
            scale,
            aspect_ratio: (height as f64) / (width as f64),
        }
    }

    /// The point on the complex plane at the middle of the view.
    pub fn center(&self) -> Complex<f64> {
        self.center
    }

    /// Current scale.  Always strictly positive.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Height over width of the target image.
    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    /// Move the view relative to the current scale.  The vertical
    /// component is flipped: "up" on the plane is "down" in pixel rows.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.center.re += dx * self.scale;
        self.center.im -= dy * self.scale;
    }

    /// Zoom by `factor`.  Factors above 1 zoom in, factors between 0
    /// and 1 zoom out, and anything else is ignored.  A zoom that
    /// would underflow the scale to zero or overflow it to infinity is
    /// ignored as well.
    pub fn zoom(&mut self, factor: f64) {
        if factor <= 0.0 || !factor.is_finite() {
            return;
        }
        let scale = self.scale / factor;
        if scale.is_normal() {
            self.scale = scale;
        }
    }

    /// Recenter the view on an arbitrary point of the plane.
    pub fn recenter(&mut self, center: Complex<f64>) {
        self.center = center;
    }
}
