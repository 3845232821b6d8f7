//! The escape-time test.  Start an orbit at zero, apply the fractal's
//! map over and over, and count how many steps pass before the orbit
//! leaves the circle of radius two.  Points whose orbits never leave
//! within the iteration limit are treated as inside the set.

use num::Complex;
use std::str::FromStr;

use errors::RenderError;

/// Once an orbit is further than this from the origin it can never
/// come back.
pub const ESCAPE_RADIUS: f64 = 2.0;

/// The map that defines a fractal family: given the current orbit
/// value `z` and the sample point `c`, produce the next orbit value.
pub trait FractalMap: Sync {
    /// One step of the recurrence.
    fn apply(&self, z: Complex<f64>, c: Complex<f64>) -> Complex<f64>;
}

/// The Burning Ship: fold the orbit into the first quadrant, then
/// square it and add `c`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct BurningShip;

impl FractalMap for BurningShip {
    #[inline]
    fn apply(&self, z: Complex<f64>, c: Complex<f64>) -> Complex<f64> {
        let folded = Complex::new(z.re.abs(), z.im.abs());
        folded * folded + c
    }
}

/// The classic quadratic map, z² + c.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Mandelbrot;

impl FractalMap for Mandelbrot {
    #[inline]
    fn apply(&self, z: Complex<f64>, c: Complex<f64>) -> Complex<f64> {
        z * z + c
    }
}

/// The maps that can be chosen by name on the command line.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FractalKind {
    /// See [`BurningShip`](struct.BurningShip.html).
    BurningShip,
    /// See [`Mandelbrot`](struct.Mandelbrot.html).
    Mandelbrot,
}

impl FractalKind {
    /// Every name `from_str` accepts.
    pub const NAMES: &'static [&'static str] = &["burning-ship", "mandelbrot"];
}

impl Default for FractalKind {
    fn default() -> Self {
        FractalKind::BurningShip
    }
}

impl FractalMap for FractalKind {
    #[inline]
    fn apply(&self, z: Complex<f64>, c: Complex<f64>) -> Complex<f64> {
        match *self {
            FractalKind::BurningShip => BurningShip.apply(z, c),
            FractalKind::Mandelbrot => Mandelbrot.apply(z, c),
        }
    }
}

impl FromStr for FractalKind {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "burning-ship" => Ok(FractalKind::BurningShip),
            "mandelbrot" => Ok(FractalKind::Mandelbrot),
            _ => Err(RenderError::UnknownFractal(s.to_string())),
        }
    }
}

/// Returns the number of steps it took the orbit of `c` to escape,
/// or `max_iterations` if it never did.  The escape test is applied
/// to each orbit value before the map is, so the starting zero
/// counts as step 0 and a point that escapes immediately returns 1.
pub fn iterate<F: FractalMap + ?Sized>(map: &F, c: Complex<f64>, max_iterations: usize) -> usize {
    let mut z = Complex::new(0.0_f64, 0.0_f64);
    for i in 0..max_iterations {
        if z.norm() > ESCAPE_RADIUS {
            return i;
        }
        z = map.apply(z, c);
    }
    max_iterations
}
