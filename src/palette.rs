//! Palette interpolation.  A continuous escape index picks two
//! adjacent stops in a cyclic color table and blends between them.

use crate::errors::RenderError;

/// A single RGB pixel.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PixelColor(pub u8, pub u8, pub u8);

impl From<[u8; 3]> for PixelColor {
    fn from(rgb: [u8; 3]) -> Self {
        PixelColor(rgb[0], rgb[1], rgb[2])
    }
}

// Solarized, ramped from base03 up to base3 and back down again so the
// cycle wraps without a seam.
const SOLARIZED: [[u8; 3]; 15] = [
    [0x00, 0x2b, 0x36],
    [0x07, 0x36, 0x42],
    [0x58, 0x6e, 0x75],
    [0x65, 0x7b, 0x83],
    [0x83, 0x94, 0x96],
    [0x93, 0xa1, 0xa1],
    [0xee, 0xe8, 0xd5],
    [0xfd, 0xf6, 0xe3],
    [0xee, 0xe8, 0xd5],
    [0x93, 0xa1, 0xa1],
    [0x83, 0x94, 0x96],
    [0x65, 0x7b, 0x83],
    [0x58, 0x6e, 0x75],
    [0x07, 0x36, 0x42],
    [0x00, 0x2b, 0x36],
];

/// Linear interpolation from x to y by i, where i is between 0 and 1.
#[inline]
pub fn lerp(i: f64, x: f64, y: f64) -> f64 {
    i * (y - x) + x
}

/// An ordered, cyclic table of color stops.  Owned by a renderer and
/// only ever read once the renderer is built.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    stops: Vec<[u8; 3]>,
}

impl Default for Palette {
    fn default() -> Self {
        Palette::solarized()
    }
}

impl Palette {
    /// The default fifteen-stop table.
    pub fn solarized() -> Palette {
        Palette {
            stops: SOLARIZED.to_vec(),
        }
    }

    /// A palette from arbitrary stops.  There must be at least one.
    pub fn new(stops: Vec<[u8; 3]>) -> Result<Palette, RenderError> {
        if stops.is_empty() {
            return Err(RenderError::InvalidGridConfig(
                "A palette needs at least one color stop".to_string(),
            ));
        }
        Ok(Palette { stops })
    }

    /// Number of stops in one cycle.
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// The stop at `index`, wrapping around the table.
    pub fn stop(&self, index: usize) -> PixelColor {
        PixelColor::from(self.stops[index % self.stops.len()])
    }

    /// Blend the two stops on either side of `index`.  Negative or
    /// non-finite indices are treated as 0.
    pub fn apply(&self, index: f64) -> PixelColor {
        let index = if index.is_finite() { index.max(0.0) } else { 0.0 };
        let frac = index.fract();
        let lo = (index.floor() as usize) % self.stops.len();
        let hi = (lo + 1) % self.stops.len();
        let (cx, cy) = (self.stops[lo], self.stops[hi]);
        let channel = |n: usize| lerp(frac, f64::from(cx[n]), f64::from(cy[n])) as u8;
        PixelColor(channel(0), channel(1), channel(2))
    }
}
