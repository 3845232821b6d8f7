//! Run configuration, and the small parsers the command line uses to
//! fill it in.

use num::Complex;
use std::path::PathBuf;
use std::str::FromStr;

use errors::RenderError;
use escape::FractalKind;
use frame::{EdgePolicy, FrameAssembler};
use palette::PaletteKind;
use planes::Viewport;

/// Given a string and a separator, returns the two values separated
/// by the separator.
pub fn parse_pair<T: FromStr>(s: &str, separator: char) -> Option<(T, T)> {
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

/// A specific implementation of parse_pair using a comma and
/// expecting floating point numbers.
pub fn parse_complex(s: &str) -> Option<Complex<f64>> {
    match parse_pair(s, ',') {
        Some((re, im)) => Some(Complex { re, im }),
        None => None,
    }
}

/// Everything one run needs to know.  Nothing here is checked until
/// `assembler` is called.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// The middle of the rendered region.
    pub center: Complex<f64>,
    /// Half the side of the rendered region.
    pub half_size: f64,
    /// Samples per axis.
    pub resolution: usize,
    /// Iteration limit per sample.
    pub max_iterations: usize,
    /// How counts become colors.
    pub palette: PaletteKind,
    /// Which map to iterate.
    pub fractal: FractalKind,
    /// Where the PNG goes.
    pub output: PathBuf,
    /// If set, the side of the resampled output image.
    pub output_scale: Option<u32>,
    /// Worker threads for the escape pass.
    pub threads: usize,
    /// Whether to drop the last row and column.
    pub edge: EdgePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            center: Complex::new(-1.75, -0.03),
            half_size: 0.06,
            resolution: 1024,
            max_iterations: 72,
            palette: PaletteKind::default(),
            fractal: FractalKind::default(),
            output: PathBuf::from("burningShip.png"),
            output_scale: None,
            threads: ::default_threads(),
            edge: EdgePolicy::default(),
        }
    }
}

impl Config {
    /// Check every option and build the assembler for this run.  Any
    /// problem is reported here, before a single sample is computed
    /// and before the output file is touched.
    pub fn assembler(&self) -> Result<FrameAssembler, RenderError> {
        if let Some(0) = self.output_scale {
            return Err(RenderError::BadScale(0));
        }
        let viewport = Viewport::new(self.center, self.half_size, self.resolution)?;
        FrameAssembler::new(
            viewport,
            self.max_iterations,
            self.fractal,
            self.palette,
            self.edge,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_pair_splits_on_separator() {
        assert_eq!(parse_pair::<usize>("800x600", 'x'), Some((800, 600)));
        assert_eq!(parse_pair::<f64>("-1.75,-0.03", ','), Some((-1.75, -0.03)));
        assert_eq!(parse_pair::<usize>("800", 'x'), None);
        assert_eq!(parse_pair::<usize>("800xabc", 'x'), None);
    }

    #[test]
    fn parse_complex_reads_both_parts() {
        assert_eq!(parse_complex("-1.75,-0.03"), Some(Complex::new(-1.75, -0.03)));
        assert_eq!(parse_complex("1.0"), None);
    }

    #[test]
    fn default_config_is_valid() {
        let fa = Config::default().assembler().unwrap();
        assert_eq!(fa.side(), 1024);
        assert_eq!(fa.max_iterations(), 72);
    }

    #[test]
    fn default_threads_match_command_line() {
        assert_eq!(Config::default().threads, ::default_threads());
        assert!(Config::default().threads >= 1);
    }

    #[test]
    fn bad_options_fail_before_rendering() {
        let bad = vec![
            Config { resolution: 0, ..Config::default() },
            Config { half_size: 0.0, ..Config::default() },
            Config { half_size: -0.5, ..Config::default() },
            Config { max_iterations: 0, ..Config::default() },
            Config { output_scale: Some(0), ..Config::default() },
            Config { center: Complex::new(::std::f64::NAN, 0.0), ..Config::default() },
            Config { resolution: 1, edge: EdgePolicy::CropLast, ..Config::default() },
        ];
        for config in &bad {
            assert!(config.assembler().is_err(), "{:?} should not validate", config);
        }
    }
}
