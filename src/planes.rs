//! Contains the Viewport struct, which describes a square region of
//! the complex plane centered on an arbitrary point, and the pixel
//! grid laid over it.  The Viewport hands out rows of sample points,
//! one complex number per pixel, top row first.
use num::Complex;

use errors::RenderError;

/// Describes the row and column of a cell in the pixel grid.  Rows
/// run top to bottom, columns left to right.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// The square region of the complex plane we sample, and how finely.
/// Once built, a Viewport is never mutated.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    /// The point at the middle of the region.
    pub center: Complex<f64>,
    /// Half the width (and half the height) of the region.
    pub half_size: f64,
    /// The number of samples along each axis.
    pub resolution: usize,
    step: f64,
}

impl Viewport {
    /// Constructor.  Rejects empty grids, non-positive sizes, and
    /// anything that isn't a finite number, since none of those can
    /// be rendered meaningfully.
    pub fn new(
        center: Complex<f64>,
        half_size: f64,
        resolution: usize,
    ) -> Result<Viewport, RenderError> {
        if !center.re.is_finite() || !center.im.is_finite() {
            return Err(RenderError::BadCenter(center.re, center.im));
        }
        if !half_size.is_finite() || half_size <= 0.0 {
            return Err(RenderError::BadHalfSize(half_size));
        }
        if resolution == 0 {
            return Err(RenderError::BadResolution(resolution));
        }
        Ok(Viewport {
            center,
            half_size,
            resolution,
            step: 2.0 * half_size / (resolution as f64),
        })
    }

    /// The distance between two neighbouring samples on either axis.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// The lower-left corner of the region; the first sample of the
    /// first row.
    pub fn origin(&self) -> Complex<f64> {
        Complex::new(
            self.center.re - self.half_size,
            self.center.im - self.half_size,
        )
    }

    /// Given a pixel of the grid, return the complex number sampled
    /// there.  Samples are addressed by integer index rather than by
    /// accumulating `step`, so every axis holds exactly `resolution`
    /// samples no matter how the division rounds.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        let origin = self.origin();
        Complex::new(
            origin.re + (pixel.1 as f64) * self.step,
            origin.im + (pixel.0 as f64) * self.step,
        )
    }

    /// All rows of the grid, top to bottom.  The iterator is lazy and
    /// can be cloned to start over.
    pub fn rows(&self) -> Rows {
        Rows {
            viewport: *self,
            next: 0,
        }
    }

    /// A single row of samples, left to right.
    pub fn row(&self, index: usize) -> Row {
        Row {
            viewport: *self,
            row: index,
            next: 0,
        }
    }
}

/// Iterator over the rows of a Viewport.
#[derive(Clone, Debug)]
pub struct Rows {
    viewport: Viewport,
    next: usize,
}

impl Iterator for Rows {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        if self.next >= self.viewport.resolution {
            return None;
        }
        let row = self.viewport.row(self.next);
        self.next += 1;
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.viewport.resolution - self.next;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Rows {}

/// Iterator over the samples of one row of a Viewport.
#[derive(Clone, Debug)]
pub struct Row {
    viewport: Viewport,
    row: usize,
    next: usize,
}

impl Iterator for Row {
    type Item = Complex<f64>;

    fn next(&mut self) -> Option<Complex<f64>> {
        if self.next >= self.viewport.resolution {
            return None;
        }
        let point = self.viewport.pixel_to_point(&Pixel(self.row, self.next));
        self.next += 1;
        Some(point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.viewport.resolution - self.next;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Row {}
