extern crate burningship;
extern crate clap;
extern crate env_logger;
#[macro_use]
extern crate log;

use burningship::config::{parse_complex, parse_pair};
use burningship::{Config, EdgePolicy, FractalKind, PaletteKind};
use clap::{App, Arg, ArgMatches};
use std::path::PathBuf;
use std::str::FromStr;

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + PartialOrd>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

fn validate_positive(s: &str, isnotanumber_err: &str, isnotpositive_err: &str) -> Result<(), String> {
    match f64::from_str(s) {
        Ok(f) if f.is_finite() && f > 0.0 => Ok(()),
        Ok(_) => Err(isnotpositive_err.to_string()),
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const OUTPUT: &str = "output";
const CENTER: &str = "center";
const SIZE: &str = "size";
const RESOLUTION: &str = "resolution";
const ITERATIONS: &str = "iterations";
const PALETTE: &str = "palette";
const FRACTAL: &str = "fractal";
const SCALE: &str = "scale";
const THREADS: &str = "threads";
const CROP_EDGE: &str = "crop-edge";

fn args<'a>(default_threads: &'a str) -> ArgMatches<'a> {
    let max_threads = burningship::default_threads();

    App::new("burningship")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Burning Ship fractal renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output PNG file"),
        )
        .arg(
            Arg::with_name(CENTER)
                .required(false)
                .long(CENTER)
                .short("c")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-1.75,-0.03")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse center point"))
                .help("Center of the rendered region, as re,im"),
        )
        .arg(
            Arg::with_name(SIZE)
                .required(false)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("0.06")
                .validator(|s| {
                    validate_positive(
                        &s,
                        "Could not parse region size",
                        "Region size must be a positive number",
                    )
                })
                .help("Half the width of the rendered region"),
        )
        .arg(
            Arg::with_name(RESOLUTION)
                .required(false)
                .long(RESOLUTION)
                .short("r")
                .takes_value(true)
                .default_value("1024")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        65_536,
                        "Could not parse resolution",
                        "Resolution must be between 1 and 65536",
                    )
                })
                .help("Samples along each axis"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .required(false)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("72")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        1_000_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 1000000",
                    )
                })
                .help("Iteration limit per sample"),
        )
        .arg(
            Arg::with_name(PALETTE)
                .required(false)
                .long(PALETTE)
                .short("p")
                .takes_value(true)
                .possible_values(PaletteKind::NAMES)
                .default_value("banded-filter")
                .help("Palette used to color escaped points"),
        )
        .arg(
            Arg::with_name(FRACTAL)
                .required(false)
                .long(FRACTAL)
                .short("f")
                .takes_value(true)
                .possible_values(FractalKind::NAMES)
                .default_value("burning-ship")
                .help("Map to iterate"),
        )
        .arg(
            Arg::with_name(SCALE)
                .required(false)
                .long(SCALE)
                .takes_value(true)
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        65_536,
                        "Could not parse output scale",
                        "Output scale must be between 1 and 65536",
                    )
                })
                .help("Resample the image to SCALE x SCALE pixels before writing"),
        )
        .arg(
            Arg::with_name(THREADS)
                .required(false)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .default_value(default_threads)
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of threads to use in solver"),
        )
        .arg(
            Arg::with_name(CROP_EDGE)
                .long(CROP_EDGE)
                .help("Drop the last row and column of samples"),
        )
        .get_matches()
}

fn config(matches: &ArgMatches) -> Result<Config, String> {
    // The validators above have already run, so these only fail on
    // values clap itself should have rejected.
    let value = |name: &str| matches.value_of(name).ok_or(format!("Missing {}", name));
    let center = parse_complex(value(CENTER)?).ok_or("Error parsing center point")?;
    let half_size = f64::from_str(value(SIZE)?).map_err(|e| e.to_string())?;
    let resolution = usize::from_str(value(RESOLUTION)?).map_err(|e| e.to_string())?;
    let max_iterations = usize::from_str(value(ITERATIONS)?).map_err(|e| e.to_string())?;
    let palette = PaletteKind::from_str(value(PALETTE)?).map_err(|e| e.to_string())?;
    let fractal = FractalKind::from_str(value(FRACTAL)?).map_err(|e| e.to_string())?;
    let threads = usize::from_str(value(THREADS)?).map_err(|e| e.to_string())?;
    let output_scale = match matches.value_of(SCALE) {
        Some(s) => Some(u32::from_str(s).map_err(|e| e.to_string())?),
        None => None,
    };
    let edge = if matches.is_present(CROP_EDGE) {
        EdgePolicy::CropLast
    } else {
        EdgePolicy::Keep
    };

    Ok(Config {
        center,
        half_size,
        resolution,
        max_iterations,
        palette,
        fractal,
        output: PathBuf::from(value(OUTPUT)?),
        output_scale,
        threads,
        edge,
    })
}

fn main() {
    env_logger::init();

    let default_threads = burningship::default_threads().to_string();
    let matches = args(&default_threads);
    let config = match config(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration failure: {}", e);
            std::process::exit(1);
        }
    };
    debug!("{:?}", config);

    if let Err(e) = burningship::run(&config) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
