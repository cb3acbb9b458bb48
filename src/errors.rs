//! Errors a render can surface to its caller.  Numeric trouble inside
//! the escape calculation never shows up here; it is recovered per
//! pixel by the evaluator.

use failure::Fail;
use std::io;

/// Everything that can go wrong between configuring a renderer and
/// getting an image onto disk.
#[derive(Debug, Fail)]
pub enum RenderError {
    /// The grid or viewport parameters cannot describe an image.
    #[fail(display = "invalid grid configuration: {}", _0)]
    InvalidGridConfig(String),

    /// The frame was computed, but could not be handed to the encoder.
    #[fail(display = "could not encode image: {}", _0)]
    EncodingFailure(String),

    /// Writing the encoded image failed.
    #[fail(display = "I/O error: {}", _0)]
    Io(#[cause] io::Error),

    /// A cancellable render was told to stop before it finished.
    #[fail(display = "render cancelled")]
    Cancelled,

    /// One of the scoped render threads panicked.
    #[fail(display = "a render worker panicked")]
    WorkerPanic,
}

impl From<io::Error> for RenderError {
    fn from(err: io::Error) -> Self {
        RenderError::Io(err)
    }
}
