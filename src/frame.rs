// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Frame assembly
//!
//! The FrameAssembler walks the Viewport's sample grid, runs the
//! escape test on every sample, and stores the counts in a
//! pre-sized grid.  Only once that grid is complete does it hand
//! the counts, one by one, to the palette.  Each cell depends only
//! on its own sample, so the grid can be cut into horizontal bands
//! and each band filled by its own thread without any locking.

extern crate crossbeam;

use std::slice::{Chunks, ChunksMut};

use errors::RenderError;
use escape::{iterate, FractalKind, FractalMap};
use palette::{Color, Palette, PaletteKind};
use planes::{Pixel, Viewport};

/// A rectangular, row-major block of cells, addressed by (row, column).
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

/// Escape counts, one per sample.
pub type IterationGrid = Grid<usize>;

/// Colors, one per sample, ready for encoding.
pub type PixelBuffer = Grid<Color>;

impl<T: Clone> Grid<T> {
    /// A grid of the given shape with every cell set to `fill`.
    pub fn new(width: usize, height: usize, fill: T) -> Grid<T> {
        Grid {
            width,
            height,
            cells: vec![fill; width * height],
        }
    }
}

impl<T> Grid<T> {
    /// A grid over existing row-major cells, or None if there are not
    /// exactly `width * height` of them.
    pub fn from_cells(width: usize, height: usize, cells: Vec<T>) -> Option<Grid<T>> {
        if cells.len() == width * height {
            Some(Grid {
                width,
                height,
                cells,
            })
        } else {
            None
        }
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The cell at `pixel`, if it lies inside the grid.
    pub fn get(&self, pixel: &Pixel) -> Option<&T> {
        if pixel.0 < self.height && pixel.1 < self.width {
            self.cells.get(pixel.0 * self.width + pixel.1)
        } else {
            None
        }
    }

    /// All cells, top row first.
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    /// The rows of the grid, top to bottom.
    pub fn rows(&self) -> Chunks<T> {
        self.cells.chunks(self.width.max(1))
    }

    fn rows_mut(&mut self) -> ChunksMut<T> {
        self.cells.chunks_mut(self.width.max(1))
    }

    /// Build a grid of the same shape by transforming every cell.
    pub fn map<U, F: Fn(&T) -> U>(&self, f: F) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            cells: self.cells.iter().map(f).collect(),
        }
    }
}

/// What to do with the last row and column of samples.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum EdgePolicy {
    /// Render every sample: the buffer is `resolution` square.
    Keep,
    /// Drop the last row and the last column: the buffer is
    /// `resolution - 1` square.
    CropLast,
}

impl Default for EdgePolicy {
    fn default() -> Self {
        EdgePolicy::Keep
    }
}

/// Everything needed to turn a Viewport into a PixelBuffer.  Once
/// built, this object should not be mutable.
#[derive(Debug)]
pub struct FrameAssembler<F = FractalKind, P = PaletteKind> {
    viewport: Viewport,
    max_iterations: usize,
    fractal: F,
    palette: P,
    edge: EdgePolicy,
}

impl<F: FractalMap, P: Palette> FrameAssembler<F, P> {
    /// Requires the region to sample, the iteration limit, the map
    /// that defines the fractal, the palette, and what to do with
    /// the last row and column.
    pub fn new(
        viewport: Viewport,
        max_iterations: usize,
        fractal: F,
        palette: P,
        edge: EdgePolicy,
    ) -> Result<Self, RenderError> {
        if max_iterations == 0 {
            return Err(RenderError::BadIterations(max_iterations));
        }
        if edge == EdgePolicy::CropLast && viewport.resolution < 2 {
            return Err(RenderError::CropTooSmall(viewport.resolution));
        }
        Ok(FrameAssembler {
            viewport,
            max_iterations,
            fractal,
            palette,
            edge,
        })
    }

    /// The region being sampled.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// The iteration limit.
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// The side length of the finished buffer.
    pub fn side(&self) -> usize {
        match self.edge {
            EdgePolicy::Keep => self.viewport.resolution,
            EdgePolicy::CropLast => self.viewport.resolution - 1,
        }
    }

    /// Fill the iteration grid on the calling thread.  The grid is
    /// zipped against the Viewport's rows, so a cropped grid simply
    /// never asks for the samples it has no room for.
    pub fn iterations(&self) -> IterationGrid {
        let side = self.side();
        let mut grid = Grid::new(side, side, 0);
        for (cells, samples) in grid.rows_mut().zip(self.viewport.rows()) {
            for (cell, c) in cells.iter_mut().zip(samples) {
                *cell = iterate(&self.fractal, c, self.max_iterations);
            }
        }
        grid
    }

    /// Fill the iteration grid using up to `threads` workers.  Each
    /// worker owns a contiguous band of rows, so every count lands in
    /// the same cell it would have in `iterations`.
    pub fn iterations_threaded(&self, threads: usize) -> Result<IterationGrid, RenderError> {
        let side = self.side();
        let mut grid = Grid::new(side, side, 0);
        if side == 0 {
            return Ok(grid);
        }
        let threads = threads.max(1).min(side);
        let band_rows = (side + threads - 1) / threads;
        debug!(
            "filling {}x{} grid in bands of {} rows on {} threads",
            side, side, band_rows, threads
        );

        crossbeam::scope(|spawner| {
            for (band, cells) in grid.cells.chunks_mut(band_rows * side).enumerate() {
                spawner.spawn(move |_| {
                    let first = band * band_rows;
                    for (offset, row) in cells.chunks_mut(side).enumerate() {
                        let samples = self.viewport.row(first + offset);
                        for (cell, c) in row.iter_mut().zip(samples) {
                            *cell = iterate(&self.fractal, c, self.max_iterations);
                        }
                    }
                });
            }
        })
        .map_err(|_| RenderError::Worker)?;
        Ok(grid)
    }

    /// Color a finished iteration grid.
    pub fn colorize(&self, counts: &IterationGrid) -> PixelBuffer {
        counts.map(|count| self.palette.color(*count, self.max_iterations))
    }

    /// Render the whole frame: sample, iterate, color.
    pub fn render(&self, threads: usize) -> Result<PixelBuffer, RenderError> {
        info!(
            "rendering {}x{} samples around {} with {} iterations",
            self.viewport.resolution, self.viewport.resolution, self.viewport.center, self.max_iterations
        );
        let counts = if threads > 1 {
            self.iterations_threaded(threads)?
        } else {
            self.iterations()
        };
        let pixels = self.colorize(&counts);
        info!("rendered {}x{} buffer", pixels.width(), pixels.height());
        Ok(pixels)
    }
}

/// Render a Burning Ship frame on the calling thread, keeping every
/// sample.
pub fn render<P: Palette>(
    viewport: &Viewport,
    max_iterations: usize,
    palette: P,
) -> Result<PixelBuffer, RenderError> {
    FrameAssembler::new(
        *viewport,
        max_iterations,
        FractalKind::BurningShip,
        palette,
        EdgePolicy::Keep,
    )?
    .render(1)
}
