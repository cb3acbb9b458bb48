// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelbrot renderer
//!
//! Every pixel of the image is mapped to a point on the complex
//! plane, that point is iterated until it escapes (or the budget runs
//! out), and the continuous escape index is run through the palette.
//! No pixel depends on any other, so the rows can be handed out to as
//! many threads as you like.

use image::png::PNGEncoder;
use image::ColorType;
use itertools::iproduct;
use num::Complex;
use std::fs;
use std::iter::Enumerate;
use std::path::Path;
use std::slice::ChunksMut;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::config::RenderConfig;
use crate::errors::RenderError;
use crate::escape::EscapeEvaluator;
use crate::palette::{Palette, PixelColor};
use crate::planes::{Framing, Pixel, PlaneMapper};
use crate::viewport::Viewport;

type RowQueue<'a> = Arc<Mutex<Enumerate<ChunksMut<'a, PixelColor>>>>;

/// A finished, row-major grid of colors.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    width: usize,
    height: usize,
    pixels: Vec<PixelColor>,
}

impl Frame {
    /// Wrap an existing pixel grid.  The shape is not checked until the
    /// frame is encoded.
    pub fn new(width: usize, height: usize, pixels: Vec<PixelColor>) -> Frame {
        Frame {
            width,
            height,
            pixels,
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// All of the pixels, row by row.
    pub fn pixels(&self) -> &[PixelColor] {
        &self.pixels
    }

    /// The color at column, row, if that is inside the frame.
    pub fn get(&self, column: usize, row: usize) -> Option<PixelColor> {
        if column >= self.width || row >= self.height {
            return None;
        }
        self.pixels.get(row * self.width + column).cloned()
    }

    /// Iterate over the rows of the frame.
    pub fn rows(&self) -> std::slice::Chunks<PixelColor> {
        self.pixels.chunks(self.width.max(1))
    }

    /// Flatten to `height * width * 3` bytes of RGB.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for p in &self.pixels {
            bytes.extend_from_slice(&[p.0, p.1, p.2]);
        }
        bytes
    }

    /// Encode the frame as a PNG byte stream.
    pub fn encode_png(&self) -> Result<Vec<u8>, RenderError> {
        if self.width == 0 || self.height == 0 || self.pixels.len() != self.width * self.height {
            return Err(RenderError::EncodingFailure(format!(
                "{} pixels cannot fill a {}x{} image",
                self.pixels.len(),
                self.width,
                self.height
            )));
        }
        let mut encoded: Vec<u8> = Vec::new();
        PNGEncoder::new(&mut encoded)
            .encode(
                &self.to_rgb_bytes(),
                self.width as u32,
                self.height as u32,
                ColorType::RGB(8),
            )
            .map_err(|e| RenderError::EncodingFailure(e.to_string()))?;
        Ok(encoded)
    }

    /// Encode the frame as a PNG and write it to `path`.
    pub fn write_png<P: AsRef<Path>>(&self, path: P) -> Result<(), RenderError> {
        let encoded = self.encode_png()?;
        fs::write(path.as_ref(), &encoded)?;
        tracing::info!(path = %path.as_ref().display(), bytes = encoded.len(), "wrote image");
        Ok(())
    }
}

/// Owns a viewport and the fixed parameters of the grid, and turns
/// the current view into Frames.  Rendering borrows the renderer
/// immutably and panning or zooming borrows it mutably, so the view
/// can never change in the middle of a frame.
#[derive(Clone, Debug)]
pub struct Renderer {
    width: usize,
    height: usize,
    limit: usize,
    viewport: Viewport,
    framing: Framing,
    evaluator: EscapeEvaluator,
    palette: Palette,
}

impl Renderer {
    /// Validate the configuration and build a renderer from it.
    pub fn new(config: RenderConfig) -> Result<Self, RenderError> {
        config.validate()?;
        Ok(Renderer {
            width: config.width,
            height: config.height,
            limit: config.max_iterations,
            viewport: Viewport::with_position(
                config.width,
                config.height,
                config.center,
                config.scale,
            ),
            framing: config.framing,
            evaluator: EscapeEvaluator::new(config.spread, config.smoothing),
            palette: config.palette,
        })
    }

    /// Image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Iteration budget per pixel.
    pub fn max_iterations(&self) -> usize {
        self.limit
    }

    /// The current view.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Move the view; see `Viewport::pan`.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.viewport.pan(dx, dy);
    }

    /// Zoom the view; see `Viewport::zoom`.
    pub fn zoom(&mut self, factor: f64) {
        self.viewport.zoom(factor);
    }

    /// Recenter the view on whatever point the given pixel currently
    /// shows.
    pub fn focus(&mut self, pixel: &Pixel) {
        let point = self.plane().pixel_to_point(pixel);
        self.viewport.recenter(point);
    }

    /// Which pixel of the current view shows `point`, if any.
    pub fn locate(&self, point: &Complex<f64>) -> Option<Pixel> {
        self.plane().point_to_pixel(point)
    }

    // A mapper for the view as it stands right now.
    fn plane(&self) -> PlaneMapper {
        PlaneMapper::new(self.width, self.height, self.viewport, self.framing)
    }

    fn pixel(&self, plane: &PlaneMapper, column: usize, row: usize) -> PixelColor {
        let point = plane.pixel_to_point(&Pixel(column, row));
        self.palette.apply(self.evaluator.escape(point, self.limit))
    }

    fn render_row(&self, plane: &PlaneMapper, row: usize, pixels: &mut [PixelColor]) {
        for (column, pixel) in pixels.iter_mut().enumerate() {
            *pixel = self.pixel(plane, column, row);
        }
    }

    /// The main function for single-threaded rendering.
    #[tracing::instrument(
        skip(self),
        fields(
            width = self.width,
            height = self.height,
            spread = self.evaluator.spread(),
            smoothing = ?self.evaluator.smoothing(),
            stops = self.palette.len()
        )
    )]
    pub fn render(&self) -> Frame {
        let plane = self.plane();
        tracing::debug!(limit = self.limit, "rendering");
        let pixels = iproduct!(0..self.height, 0..self.width)
            .map(|(row, column)| self.pixel(&plane, column, row))
            .collect();
        Frame::new(self.width, self.height, pixels)
    }

    /// A multi-threaded version of the render function that takes a
    /// thread count.  Produces exactly the same Frame as `render`.
    pub fn render_threaded(&self, threads: usize) -> Result<Frame, RenderError> {
        self.render_cancellable(threads, &AtomicBool::new(false))
    }

    /// Threaded render that gives up between rows once `cancel` is
    /// set.
    #[tracing::instrument(
        skip(self, cancel),
        fields(
            width = self.width,
            height = self.height,
            spread = self.evaluator.spread(),
            smoothing = ?self.evaluator.smoothing(),
            stops = self.palette.len()
        )
    )]
    pub fn render_cancellable(
        &self,
        threads: usize,
        cancel: &AtomicBool,
    ) -> Result<Frame, RenderError> {
        let plane = self.plane();
        let threads = threads.max(1);
        tracing::debug!(limit = self.limit, "rendering");
        let mut pixels = vec![PixelColor(0, 0, 0); plane.len()];
        {
            let rows: RowQueue = Arc::new(Mutex::new(pixels.chunks_mut(self.width).enumerate()));
            let plane = &plane;
            crossbeam::scope(|spawner| {
                for _ in 0..threads {
                    let rows = rows.clone();
                    spawner.spawn(move |_| loop {
                        if cancel.load(Ordering::Relaxed) {
                            break;
                        }
                        let row = match rows.lock() {
                            Ok(mut rows) => rows.next(),
                            Err(_) => None,
                        };
                        match row {
                            Some((row, pixels)) => self.render_row(plane, row, pixels),
                            None => {
                                break;
                            }
                        }
                    });
                }
            })
            .map_err(|_| RenderError::WorkerPanic)?;
        }
        if cancel.load(Ordering::Relaxed) {
            tracing::debug!("render cancelled");
            return Err(RenderError::Cancelled);
        }
        tracing::debug!("render complete");
        Ok(Frame::new(self.width, self.height, pixels))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny() -> Renderer {
        Renderer::new(RenderConfig {
            max_iterations: 10,
            ..RenderConfig::with_size(4, 4)
        })
        .unwrap()
    }

    #[test]
    fn renders_the_whole_grid() {
        let renderer = Renderer::new(RenderConfig::with_size(7, 5)).unwrap();
        let frame = renderer.render();
        assert_eq!(frame.width(), 7);
        assert_eq!(frame.height(), 5);
        assert_eq!(frame.pixels().len(), 35);
        assert_eq!(frame.to_rgb_bytes().len(), 7 * 5 * 3);
        assert_eq!(frame.rows().count(), 5);
    }

    #[test]
    fn four_by_four_is_reproducible() {
        let renderer = tiny();
        let first = renderer.render();
        let second = renderer.render();
        assert_eq!(first, second);
        // pixel (2, 2) is the origin, which is inside the set: 10 / 2 = 5
        assert_eq!(first.get(2, 2), Some(renderer.palette.stop(5)));
    }

    #[test]
    fn threaded_matches_sequential() {
        let renderer = Renderer::new(RenderConfig::with_size(33, 17)).unwrap();
        let single = renderer.render();
        for threads in 1..5 {
            assert_eq!(renderer.render_threaded(threads).unwrap(), single);
        }
    }

    #[test]
    fn zero_threads_still_renders() {
        let renderer = tiny();
        assert_eq!(renderer.render_threaded(0).unwrap(), renderer.render());
    }

    #[test]
    fn cancelled_render_reports_cancellation() {
        let renderer = tiny();
        let cancel = AtomicBool::new(true);
        match renderer.render_cancellable(2, &cancel) {
            Err(RenderError::Cancelled) => {}
            other => panic!("expected cancellation, got {:?}", other),
        }
    }

    #[test]
    fn invalid_grids_are_rejected_up_front() {
        assert!(Renderer::new(RenderConfig::with_size(0, 4)).is_err());
        let no_budget = RenderConfig {
            max_iterations: 0,
            ..RenderConfig::default()
        };
        assert!(Renderer::new(no_budget).is_err());
    }

    #[test]
    fn zooming_changes_the_picture() {
        let mut renderer = Renderer::new(RenderConfig::with_size(16, 16)).unwrap();
        let before = renderer.render();
        renderer.zoom(4.0);
        renderer.pan(0.1, 0.0);
        assert_ne!(renderer.render(), before);
    }

    #[test]
    fn focus_recenters_on_the_pixel() {
        let mut renderer = tiny();
        let target = renderer.plane().pixel_to_point(&Pixel(1, 3));
        renderer.focus(&Pixel(1, 3));
        assert_eq!(renderer.viewport().center(), target);
        assert_eq!(renderer.locate(&target), Some(Pixel(2, 2)));
    }

    #[test]
    fn get_outside_the_frame_is_none() {
        let frame = tiny().render();
        assert_eq!(frame.get(4, 0), None);
        assert_eq!(frame.get(0, 4), None);
    }

    #[test]
    fn encodes_a_png() {
        let encoded = tiny().render().encode_png().unwrap();
        assert_eq!(&encoded[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn malformed_frames_fail_to_encode() {
        let frame = Frame::new(2, 2, vec![PixelColor(0, 0, 0); 3]);
        match frame.encode_png() {
            Err(RenderError::EncodingFailure(_)) => {}
            other => panic!("expected an encoding failure, got {:?}", other),
        }
    }

    #[test]
    fn writes_a_png_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.png");
        tiny().render().write_png(&path).unwrap();
        assert!(fs::metadata(&path).unwrap().len() > 8);
    }
}
