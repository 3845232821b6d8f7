//! Everything that can go wrong with a render.  Configuration
//! problems are caught before any sample is computed; I/O problems
//! can only happen once the finished buffer is being written.

use std::io;

/// The error type for every fallible operation in the crate.
#[derive(Debug, Fail)]
pub enum RenderError {
    /// The grid must have at least one sample per axis.
    #[fail(display = "resolution must be at least 1, got {}", _0)]
    BadResolution(usize),

    /// The region must have a positive, finite size.
    #[fail(display = "half size must be a positive finite number, got {}", _0)]
    BadHalfSize(f64),

    /// The center must be an ordinary point of the plane.
    #[fail(display = "center must be a finite point, got {},{}", _0, _1)]
    BadCenter(f64, f64),

    /// At least one iteration is needed to tell anything apart.
    #[fail(display = "iteration limit must be at least 1, got {}", _0)]
    BadIterations(usize),

    /// A resampled image must have at least one pixel.
    #[fail(display = "output scale must be at least 1, got {}", _0)]
    BadScale(u32),

    /// Cropping the last row and column off a one-sample grid would
    /// leave nothing to draw.
    #[fail(display = "cannot crop the edge of a {}x{} grid", _0, _0)]
    CropTooSmall(usize),

    /// The palette name did not match any known palette.
    #[fail(display = "unknown palette '{}'", _0)]
    UnknownPalette(String),

    /// The fractal name did not match any known map.
    #[fail(display = "unknown fractal '{}'", _0)]
    UnknownFractal(String),

    /// One of the threads filling the grid died before finishing.
    #[fail(display = "a render worker panicked")]
    Worker,

    /// The output file could not be created or written.
    #[fail(display = "could not write {}: {}", path, cause)]
    Io {
        /// The file we were trying to write.
        path: String,
        /// What the operating system or encoder reported.
        #[cause]
        cause: io::Error,
    },
}
