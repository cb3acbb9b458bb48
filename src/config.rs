//! Construction parameters for a Renderer.

use num::Complex;

use crate::errors::RenderError;
use crate::escape::{Smoothing, DEFAULT_SPREAD};
use crate::palette::Palette;
use crate::planes::Framing;

/// Default output width in pixels.
pub const DEFAULT_WIDTH: usize = 320;
/// Default output height in pixels.
pub const DEFAULT_HEIGHT: usize = 260;
/// Default per-pixel iteration budget.
pub const DEFAULT_ITERATIONS: usize = 80;

/// Everything needed to build a Renderer.  The grid part (width,
/// height, max_iterations) is fixed for the life of the renderer; the
/// center and scale only seed its viewport.
#[derive(Clone, Debug)]
pub struct RenderConfig {
    /// Image width in pixels.
    pub width: usize,
    /// Image height in pixels.
    pub height: usize,
    /// Iteration budget per pixel.
    pub max_iterations: usize,
    /// Initial center of the viewport.
    pub center: Complex<f64>,
    /// Initial scale of the viewport.
    pub scale: f64,
    /// Palette spread divisor.
    pub spread: f64,
    /// Smoothing variant for the escape index.
    pub smoothing: Smoothing,
    /// Plane units covered at scale 1.
    pub framing: Framing,
    /// Color table.
    pub palette: Palette,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            max_iterations: DEFAULT_ITERATIONS,
            center: Complex::new(0.0, 0.0),
            scale: 1.0,
            spread: DEFAULT_SPREAD,
            smoothing: Smoothing::default(),
            framing: Framing::default(),
            palette: Palette::default(),
        }
    }
}

fn invalid(msg: &str) -> Result<(), RenderError> {
    Err(RenderError::InvalidGridConfig(msg.to_string()))
}

impl RenderConfig {
    /// A default configuration for an image of the given size.
    pub fn with_size(width: usize, height: usize) -> RenderConfig {
        RenderConfig {
            width,
            height,
            ..RenderConfig::default()
        }
    }

    /// Reject anything that cannot produce an image.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.width == 0 || self.height == 0 {
            return invalid("Width and height must both be greater than zero");
        }
        if self.width > (u32::max_value() as usize) || self.height > (u32::max_value() as usize) {
            return invalid("Width and height must fit in 32 bits");
        }
        if self.max_iterations == 0 {
            return invalid("The iteration count must be greater than zero");
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return invalid("The scale must be a positive number");
        }
        if !(self.spread.is_finite() && self.spread > 0.0) {
            return invalid("The spread must be a positive number");
        }
        if !(self.center.re.is_finite() && self.center.im.is_finite()) {
            return invalid("The center must be a finite point");
        }
        if !(self.framing.span_re.is_finite()
            && self.framing.span_re > 0.0
            && self.framing.span_im.is_finite()
            && self.framing.span_im > 0.0)
        {
            return invalid("The framing spans must be positive numbers");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(RenderConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_sized_grids_are_rejected() {
        assert!(RenderConfig::with_size(0, 10).validate().is_err());
        assert!(RenderConfig::with_size(10, 0).validate().is_err());
    }

    #[test]
    fn zero_iterations_are_rejected() {
        let config = RenderConfig {
            max_iterations: 0,
            ..RenderConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn bad_scale_and_spread_are_rejected() {
        for bad in &[0.0, -1.0, std::f64::NAN, std::f64::INFINITY] {
            let scaled = RenderConfig {
                scale: *bad,
                ..RenderConfig::default()
            };
            assert!(scaled.validate().is_err());
            let spread = RenderConfig {
                spread: *bad,
                ..RenderConfig::default()
            };
            assert!(spread.validate().is_err());
        }
    }
}
