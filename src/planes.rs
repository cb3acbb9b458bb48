//! Contains the PlaneMapper struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0,
//! and the window onto the complex plane described by a Viewport.
use num::Complex;

use crate::viewport::Viewport;

/// The span multiplier: at a scale of 1, the view is this many plane
/// units across (and this many times the aspect ratio tall).
pub const DEFAULT_SPAN: f64 = 4.0;

/// Describes the width and height of an integral plane that is assumed to start at
/// 0,0 and all values are assumed to be non-negative integers.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntegralPlane(pub usize, pub usize);

/// Describes the column, row of a point in a region.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// How much of the complex plane a viewport of scale 1 covers, along
/// the real and imaginary axes.  The framing is symmetric: the middle
/// of the pixel grid is always the viewport's center.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Framing {
    /// Plane units across the width of the image at scale 1.
    pub span_re: f64,
    /// Plane units down the height of the image at scale 1, before the
    /// aspect ratio is applied.
    pub span_im: f64,
}

impl Default for Framing {
    fn default() -> Self {
        Framing {
            span_re: DEFAULT_SPAN,
            span_im: DEFAULT_SPAN,
        }
    }
}

/// Maps points between the pixel grid and the complex plane for one
/// snapshot of a Viewport.  The mapper copies the viewport, so panning
/// or zooming the original does not affect a mapper already handed to
/// a render.
#[derive(Copy, Clone, Debug)]
pub struct PlaneMapper {
    /// The right-lower corner of the integral cartesian plane.
    /// The left-upper is assumed to be at 0,0
    pub integral_plane: IntegralPlane,
    viewport: Viewport,
    // Plane units per whole image, along each axis.
    extent: (f64, f64),
}

impl PlaneMapper {
    /// Constructor.  Takes the size of the pixel grid, the viewport
    /// being looked through, and the framing constants.
    pub fn new(width: usize, height: usize, viewport: Viewport, framing: Framing) -> PlaneMapper {
        let extent = (
            viewport.scale() * framing.span_re,
            viewport.scale() * viewport.aspect_ratio() * framing.span_im,
        );
        PlaneMapper {
            integral_plane: IntegralPlane(width, height),
            viewport,
            extent,
        }
    }

    /// The total number of points in the integral grid.  Used to
    /// calculate memory needs.
    pub fn len(&self) -> usize {
        self.integral_plane.0 * self.integral_plane.1
    }

    /// Describes that the integral plane is of a size.
    pub fn is_empty(&self) -> bool {
        self.integral_plane.0 == 0 || self.integral_plane.1 == 0
    }

    /// Map fractional pixel coordinates to the complex plane.
    pub fn map(&self, column: f64, row: f64) -> Complex<f64> {
        let center = self.viewport.center();
        Complex::new(
            (column / (self.integral_plane.0 as f64) - 0.5) * self.extent.0 + center.re,
            (row / (self.integral_plane.1 as f64) - 0.5) * self.extent.1 + center.im,
        )
    }

    /// Given a pixel on the integral cartesian plane, map that to a
    /// point on the complex cartesian plane.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        self.map(pixel.0 as f64, pixel.1 as f64)
    }

    /// Given a complex number corresponding to a location on the
    /// complex cartesian plane, map that as closely as possible to a
    /// point on the integral cartesian plane.  Points that land
    /// outside the grid have no pixel.
    pub fn point_to_pixel(&self, point: &Complex<f64>) -> Option<Pixel> {
        let center = self.viewport.center();
        let column = ((point.re - center.re) / self.extent.0 + 0.5) * (self.integral_plane.0 as f64);
        let row = ((point.im - center.im) / self.extent.1 + 0.5) * (self.integral_plane.1 as f64);
        if !(column >= 0.0
            && column < (self.integral_plane.0 as f64)
            && row >= 0.0
            && row < (self.integral_plane.1 as f64))
        {
            return None;
        }
        Some(Pixel(column as usize, row as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    fn close(a: Complex<f64>, b: Complex<f64>) -> bool {
        (a.re - b.re).abs() < EPSILON && (a.im - b.im).abs() < EPSILON
    }

    #[test]
    fn center_pixel_maps_to_center() {
        for scale in &[1.0, 0.5, 1e-6, 37.0] {
            let vp = Viewport::with_position(640, 480, Complex::new(-0.75, 0.1), *scale);
            let pm = PlaneMapper::new(640, 480, vp, Framing::default());
            assert!(close(pm.pixel_to_point(&Pixel(320, 240)), vp.center()));
        }
    }

    #[test]
    fn center_maps_on_odd_sized_grids() {
        let vp = Viewport::with_position(5, 3, Complex::new(0.25, -0.5), 2.0);
        let pm = PlaneMapper::new(5, 3, vp, Framing::default());
        assert!(close(pm.map(2.5, 1.5), vp.center()));
    }

    #[test]
    fn pixel_to_point_on_square_grid() {
        let pm = PlaneMapper::new(4, 4, Viewport::new(4, 4), Framing::default());
        assert!(close(pm.pixel_to_point(&Pixel(0, 0)), Complex::new(-2.0, -2.0)));
        assert!(close(pm.pixel_to_point(&Pixel(2, 2)), Complex::new(0.0, 0.0)));
        assert!(close(pm.pixel_to_point(&Pixel(3, 1)), Complex::new(1.0, -1.0)));
    }

    #[test]
    fn aspect_ratio_squeezes_the_imaginary_axis() {
        let pm = PlaneMapper::new(400, 200, Viewport::new(400, 200), Framing::default());
        assert!(close(pm.pixel_to_point(&Pixel(0, 0)), Complex::new(-2.0, -1.0)));
    }

    #[test]
    fn custom_framing_changes_the_span() {
        let framing = Framing {
            span_re: 1.0,
            span_im: 1.0,
        };
        let pm = PlaneMapper::new(4, 4, Viewport::new(4, 4), framing);
        assert!(close(pm.pixel_to_point(&Pixel(0, 0)), Complex::new(-0.5, -0.5)));
    }

    #[test]
    fn point_to_pixel_inverts_pixel_to_point() {
        let vp = Viewport::with_position(640, 640, Complex::new(0.3, 0.3), 0.5);
        let pm = PlaneMapper::new(640, 640, vp, Framing::default());
        assert_eq!(pm.point_to_pixel(&Complex::new(0.3, 0.3)), Some(Pixel(320, 320)));
        assert_eq!(pm.point_to_pixel(&Complex::new(-0.7, -0.7)), Some(Pixel(0, 0)));
    }

    #[test]
    fn point_to_pixel_rejects_points_off_the_grid() {
        let pm = PlaneMapper::new(4, 4, Viewport::new(4, 4), Framing::default());
        assert_eq!(pm.point_to_pixel(&Complex::new(2.0, 0.0)), None);
        assert_eq!(pm.point_to_pixel(&Complex::new(0.0, -2.5)), None);
        assert_eq!(pm.point_to_pixel(&Complex::new(std::f64::NAN, 0.0)), None);
    }

    #[test]
    fn planemapper_knows_its_size() {
        let pm = PlaneMapper::new(5, 3, Viewport::new(5, 3), Framing::default());
        assert_eq!(pm.len(), 15);
        assert!(!pm.is_empty());
    }
}
