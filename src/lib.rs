#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Burning Ship renderer
//!
//! The Burning Ship is a close cousin of the Mandelbrot set.  Both
//! take a point `c` on the complex plane, start an orbit at zero, and
//! repeatedly square the orbit and add `c`, measuring how quickly the
//! orbit runs off to infinity.  That "velocity" is the number used to
//! color the image.  The Burning Ship differs in one detail: before
//! squaring, it folds the orbit into the first quadrant by taking the
//! absolute value of both its parts.  That single fold turns the
//! smooth bulbs of the Mandelbrot into the jagged hull and masts that
//! give the fractal its name.
//!
//! A render runs in three passes.  The Viewport lays a square grid
//! of samples over the plane; the FrameAssembler runs the escape test
//! on every sample and collects the counts; and a Palette turns each
//! count into a color.  The result is written out as a PNG, resampled
//! first if a different output size was asked for.

extern crate crossbeam;
#[macro_use]
extern crate failure;
extern crate image;
#[macro_use]
extern crate log;
extern crate num;
extern crate num_cpus;
extern crate tempfile;

pub mod config;
pub mod errors;
pub mod escape;
pub mod frame;
pub mod output;
pub mod palette;
pub mod planes;

pub use config::Config;
pub use errors::RenderError;
pub use escape::{iterate, BurningShip, FractalKind, FractalMap, Mandelbrot};
pub use frame::{render, EdgePolicy, FrameAssembler, IterationGrid, PixelBuffer};
pub use palette::{linear_map, Color, Palette, PaletteKind};
pub use planes::Viewport;

/// The main function, and primary entry point: check the
/// configuration, render the frame, and write it to disk.
pub fn run(config: &Config) -> Result<(), RenderError> {
    let assembler = config.assembler()?;
    let pixels = assembler.render(config.threads)?;
    output::write_png(&config.output, &pixels, config.output_scale)
}

/// The number of threads to use when none is asked for.
pub fn default_threads() -> usize {
    num_cpus::get()
}
