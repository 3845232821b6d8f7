// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Palettes turn an iteration count into a color.
//!
//! Every palette agrees on one thing: a point that never escaped is
//! painted pure black, so the body of the set always stands out from
//! the bands around it.  What the escaped points look like is up to
//! the palette.  Three are provided:
//!
//! * `banded-filter` paints slow escapers a fixed rust-red accent and
//!   runs everything else through a duotone filter, fast escapers
//!   dark blue-gray and slower ones warm brown.
//! * `linear-grayscale` cycles through gray shades, two steps per
//!   iteration.
//! * `wrapped-tint` stretches the gray shade toward white per channel
//!   and then wraps it around modulo 255.  The wrap is what gives the
//!   image its hard color bands.

use std::str::FromStr;

use errors::RenderError;

/// An RGBA color, eight bits per channel.  Alpha is always opaque.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Color {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
    /// Alpha
    pub a: u8,
}

impl Color {
    /// The color of every point inside the set.
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    /// An opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b, a: 255 }
    }

    /// The channels in the order the PNG encoder wants them.
    pub fn channels(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Map `value` from the range `old_min..=old_max` onto
/// `new_min..=new_max`, truncating toward zero.  The new range may run
/// backwards.
///
/// # Panics
///
/// Panics if `old_min == old_max`; the old range must have a width.
pub fn linear_map(value: usize, old_min: usize, old_max: usize, new_min: u8, new_max: u8) -> u8 {
    assert_ne!(old_min, old_max, "linear_map needs a non-empty source range");
    let (value, old_min, old_max) = (value as f64, old_min as f64, old_max as f64);
    let (new_min, new_max) = (f64::from(new_min), f64::from(new_max));
    ((value - old_min) * (new_max - new_min) / (old_max - old_min) + new_min) as u8
}

/// A pure mapping from an iteration count to a color.
pub trait Palette: Sync {
    /// The color of a point that escaped after `count` steps, where
    /// `count < max_iterations`.
    fn escaped(&self, count: usize, max_iterations: usize) -> Color;

    /// The color of a point, black if it never escaped.
    fn color(&self, count: usize, max_iterations: usize) -> Color {
        if count >= max_iterations {
            Color::BLACK
        } else {
            self.escaped(count, max_iterations)
        }
    }
}

/// The gray ramp shared by two of the palettes: two shades darker per
/// iteration, wrapping every 255.
fn cycling_shade(count: usize) -> usize {
    255 - (2 * count) % 255
}

const ACCENT: Color = Color::rgb(159, 43, 12);
const ACCENT_FRACTION: f64 = 0.4;

/// Slow escapers get a fixed accent; the rest are shaded and pushed
/// through a duotone filter.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct BandedFilter;

impl Palette for BandedFilter {
    fn escaped(&self, count: usize, max_iterations: usize) -> Color {
        if count > (max_iterations as f64 * ACCENT_FRACTION) as usize {
            return ACCENT;
        }
        let shade = linear_map(count, 0, max_iterations, 255, 0) as usize;
        Color::rgb(
            linear_map(shade, 0, 255, 114, 20),
            linear_map(shade, 0, 255, 31, 28),
            linear_map(shade, 0, 255, 9, 60),
        )
    }
}

/// Gray shades, cycling.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct LinearGrayscale;

impl Palette for LinearGrayscale {
    fn escaped(&self, count: usize, _max_iterations: usize) -> Color {
        let shade = cycling_shade(count) as u8;
        Color::rgb(shade, shade, shade)
    }
}

/// Per-channel floor of the stretch toward white.
const TINT_FLOOR: (u8, u8, u8) = (96, 64, 128);

/// Gray shades stretched toward white per channel, then wrapped.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct WrappedTint;

impl WrappedTint {
    fn wrap(channel: u8) -> u8 {
        ((2 * usize::from(channel) + 3) % 255) as u8
    }
}

impl Palette for WrappedTint {
    fn escaped(&self, count: usize, _max_iterations: usize) -> Color {
        let shade = cycling_shade(count);
        Color::rgb(
            WrappedTint::wrap(linear_map(shade, 0, 255, TINT_FLOOR.0, 255)),
            WrappedTint::wrap(linear_map(shade, 0, 255, TINT_FLOOR.1, 255)),
            WrappedTint::wrap(linear_map(shade, 0, 255, TINT_FLOOR.2, 255)),
        )
    }
}

/// The palettes that can be chosen by name on the command line.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PaletteKind {
    /// See [`BandedFilter`](struct.BandedFilter.html).
    BandedFilter,
    /// See [`LinearGrayscale`](struct.LinearGrayscale.html).
    LinearGrayscale,
    /// See [`WrappedTint`](struct.WrappedTint.html).
    WrappedTint,
}

impl PaletteKind {
    /// Every name `from_str` accepts.
    pub const NAMES: &'static [&'static str] =
        &["banded-filter", "linear-grayscale", "wrapped-tint"];
}

impl Default for PaletteKind {
    fn default() -> Self {
        PaletteKind::BandedFilter
    }
}

impl Palette for PaletteKind {
    fn escaped(&self, count: usize, max_iterations: usize) -> Color {
        match *self {
            PaletteKind::BandedFilter => BandedFilter.escaped(count, max_iterations),
            PaletteKind::LinearGrayscale => LinearGrayscale.escaped(count, max_iterations),
            PaletteKind::WrappedTint => WrappedTint.escaped(count, max_iterations),
        }
    }
}

impl FromStr for PaletteKind {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "banded-filter" => Ok(PaletteKind::BandedFilter),
            "linear-grayscale" => Ok(PaletteKind::LinearGrayscale),
            "wrapped-tint" => Ok(PaletteKind::WrappedTint),
            _ => Err(RenderError::UnknownPalette(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [PaletteKind; 3] = [
        PaletteKind::BandedFilter,
        PaletteKind::LinearGrayscale,
        PaletteKind::WrappedTint,
    ];

    #[test]
    fn interior_is_black_for_every_palette() {
        for palette in &ALL {
            for max in &[1, 2, 72, 255, 1000] {
                assert_eq!(palette.color(*max, *max), Color::BLACK);
            }
        }
    }

    #[test]
    fn colors_are_opaque() {
        for palette in &ALL {
            for n in 0..=72 {
                assert_eq!(palette.color(n, 72).a, 255);
            }
        }
    }

    #[test]
    fn linear_map_hits_endpoints() {
        assert_eq!(linear_map(0, 0, 72, 255, 0), 255);
        assert_eq!(linear_map(72, 0, 72, 255, 0), 0);
        assert_eq!(linear_map(0, 0, 255, 114, 20), 114);
        assert_eq!(linear_map(255, 0, 255, 114, 20), 20);
        assert_eq!(linear_map(10, 10, 20, 0, 100), 0);
        assert_eq!(linear_map(20, 10, 20, 0, 100), 100);
    }

    #[test]
    fn linear_map_truncates() {
        // 255 - 36 * 255 / 72 = 127.5
        assert_eq!(linear_map(36, 0, 72, 255, 0), 127);
        // 1 * 10 / 3 = 3.33
        assert_eq!(linear_map(1, 0, 3, 0, 10), 3);
    }

    #[test]
    #[should_panic]
    fn linear_map_rejects_empty_range() {
        linear_map(5, 3, 3, 0, 255);
    }

    #[test]
    fn banded_filter_accents_slow_escapers() {
        // 40% of 72 is 28.8, which truncates to 28.
        assert_eq!(BandedFilter.color(29, 72), Color::rgb(159, 43, 12));
        assert_eq!(BandedFilter.color(71, 72), Color::rgb(159, 43, 12));
        assert_ne!(BandedFilter.color(28, 72), Color::rgb(159, 43, 12));
    }

    #[test]
    fn banded_filter_shades_fast_escapers() {
        // Shade 255 maps to the far end of every channel.
        assert_eq!(BandedFilter.color(0, 72), Color::rgb(20, 28, 60));
        // shade = 255 - 18 * 255 / 72 = 191.25 -> 191
        // r = 114 - 191 * 94 / 255 = 43.59
        // g = 31 - 191 * 3 / 255 = 28.75
        // b = 9 + 191 * 51 / 255 = 47.2
        assert_eq!(BandedFilter.color(18, 72), Color::rgb(43, 28, 47));
    }

    #[test]
    fn grayscale_cycles() {
        assert_eq!(LinearGrayscale.color(0, 72), Color::rgb(255, 255, 255));
        assert_eq!(LinearGrayscale.color(10, 72), Color::rgb(235, 235, 235));
        // 2 * 127 = 254
        assert_eq!(LinearGrayscale.color(127, 200), Color::rgb(1, 1, 1));
        // 2 * 128 = 256, which wraps to 1
        assert_eq!(LinearGrayscale.color(128, 200), Color::rgb(254, 254, 254));
    }

    #[test]
    fn grayscale_channels_match() {
        for n in 0..1000 {
            let c = LinearGrayscale.color(n, 1000);
            assert!(c.r == c.g && c.g == c.b);
        }
    }

    #[test]
    fn wrapped_tint_never_reaches_full_channel() {
        for n in 0..2000 {
            let c = WrappedTint.color(n, 2000);
            assert!(c.r < 255 && c.g < 255 && c.b < 255, "{} gave {:?}", n, c);
        }
    }

    #[test]
    fn wrapped_tint_wraps() {
        // Shade 255 stretches to 255 on every channel; 2 * 255 + 3 = 513,
        // and 513 mod 255 = 3.
        assert_eq!(WrappedTint.color(0, 72), Color::rgb(3, 3, 3));
        assert_eq!(WrappedTint::wrap(126), 0);
        assert_eq!(WrappedTint::wrap(0), 3);
    }

    #[test]
    fn kind_dispatches_to_palette() {
        for n in 0..72 {
            assert_eq!(PaletteKind::BandedFilter.color(n, 72), BandedFilter.color(n, 72));
            assert_eq!(PaletteKind::LinearGrayscale.color(n, 72), LinearGrayscale.color(n, 72));
            assert_eq!(PaletteKind::WrappedTint.color(n, 72), WrappedTint.color(n, 72));
        }
    }

    #[test]
    fn kind_parses_known_names() {
        for name in PaletteKind::NAMES {
            assert!(name.parse::<PaletteKind>().is_ok());
        }
        assert_eq!(
            "wrapped-tint".parse::<PaletteKind>().unwrap(),
            PaletteKind::WrappedTint
        );
        assert!("sepia".parse::<PaletteKind>().is_err());
    }
}
