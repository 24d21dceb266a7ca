use thiserror::Error;

/// Errors raised by [`crate::PixelBuffer`] accessors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// A coordinate fell outside `[0, width) x [0, height)`
    #[error("pixel ({x}, {y}) is outside the {width}x{height} buffer")]
    OutOfBounds {
        x: i64,
        y: i64,
        width: usize,
        height: usize,
    },

    /// A buffer or region was requested with a zero side
    #[error("invalid buffer dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    /// Raw pixel data does not hold exactly width * height * 4 bytes
    #[error("expected {expected} bytes of RGBA data, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
}

/// Errors raised by the flood fill engine
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FillError {
    /// The seed point is negative or outside the buffer; rejected before any work
    #[error("fill seed ({x}, {y}) is outside the {width}x{height} canvas")]
    InvalidSeed {
        x: f32,
        y: f32,
        width: usize,
        height: usize,
    },

    #[error(transparent)]
    Buffer(#[from] BufferError),
}
