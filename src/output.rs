//! Writes a finished PixelBuffer to disk as an RGBA PNG, optionally
//! resampling it first.  The image is encoded into a temporary file
//! beside the destination and only renamed over it once encoding has
//! succeeded, so a failed run never leaves a truncated image behind
//! and never damages a file that was already there.

use image::imageops::{resize, FilterType};
use image::png::PNGEncoder;
use image::{ColorType, Pixel, Rgba, RgbaImage};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

use errors::RenderError;
use frame::PixelBuffer;

fn io_error(path: &Path, cause: io::Error) -> RenderError {
    RenderError::Io {
        path: path.display().to_string(),
        cause,
    }
}

/// Flatten the buffer into an image, resampling it to `scale` x
/// `scale` with a Lanczos filter if asked to.
pub fn to_image(pixels: &PixelBuffer, scale: Option<u32>) -> Result<RgbaImage, RenderError> {
    if let Some(0) = scale {
        return Err(RenderError::BadScale(0));
    }
    let width = pixels.width();
    let cells = pixels.cells();
    let image = RgbaImage::from_fn(width as u32, pixels.height() as u32, |x, y| {
        let c = cells[y as usize * width + x as usize];
        Rgba::from_channels(c.r, c.g, c.b, c.a)
    });
    match scale {
        Some(side) => {
            debug!(
                "resampling {}x{} to {}x{}",
                image.width(),
                image.height(),
                side,
                side
            );
            Ok(resize(&image, side, side, FilterType::Lanczos3))
        }
        None => Ok(image),
    }
}

/// Run `write` against a temporary file in the same directory as
/// `path`, and move the result into place only if it succeeds.  On
/// failure the temporary file is dropped, which deletes it, and
/// whatever was at `path` before is left alone.
fn write_atomically<F>(path: &Path, write: F) -> io::Result<()>
where
    F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(staged.as_file_mut());
        write(&mut writer)?;
        writer.flush()?;
    }
    staged.as_file().sync_all()?;
    staged.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Write the buffer to `path`.  The file at `path` is either the
/// complete new image or untouched.
pub fn write_png(path: &Path, pixels: &PixelBuffer, scale: Option<u32>) -> Result<(), RenderError> {
    let image = to_image(pixels, scale)?;
    write_atomically(path, |writer| {
        PNGEncoder::new(writer).encode(&image, image.width(), image.height(), ColorType::RGBA(8))
    })
    .map_err(|cause| io_error(path, cause))?;
    info!("wrote {}x{} image to {}", image.width(), image.height(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use frame::Grid;
    use image::{GenericImageView, Pixel};
    use palette::Color;
    use std::fs;
    use std::io::{self, Write};
    use tempfile::tempdir;

    fn checkerboard(side: usize) -> PixelBuffer {
        let cells = (0..side * side)
            .map(|i| {
                if (i / side + i % side) % 2 == 0 {
                    Color::rgb(255, 255, 255)
                } else {
                    Color::BLACK
                }
            })
            .collect();
        Grid::from_cells(side, side, cells).unwrap()
    }

    #[test]
    fn to_image_keeps_channels() {
        let image = to_image(&checkerboard(4), None).unwrap();
        assert_eq!(image.dimensions(), (4, 4));
        assert_eq!(image.get_pixel(0, 0).channels(), &[255u8, 255, 255, 255][..]);
        assert_eq!(image.get_pixel(1, 0).channels(), &[0u8, 0, 0, 255][..]);
    }

    #[test]
    fn to_image_resamples() {
        let image = to_image(&checkerboard(4), Some(16)).unwrap();
        assert_eq!(image.dimensions(), (16, 16));
    }

    #[test]
    fn to_image_rejects_zero_scale() {
        assert!(to_image(&checkerboard(4), Some(0)).is_err());
    }

    #[test]
    fn writes_readable_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ship.png");
        write_png(&path, &checkerboard(8), None).unwrap();
        let image = image::open(&path).unwrap();
        assert_eq!(image.dimensions(), (8, 8));
        let image = image.to_rgba();
        assert_eq!(image.get_pixel(0, 0).channels(), &[255u8, 255, 255, 255][..]);
        assert_eq!(image.get_pixel(0, 1).channels(), &[0u8, 0, 0, 255][..]);
    }

    #[test]
    fn writes_resampled_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ship.png");
        write_png(&path, &checkerboard(8), Some(32)).unwrap();
        assert_eq!(image::open(&path).unwrap().dimensions(), (32, 32));
    }

    #[test]
    fn failed_write_leaves_no_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("ship.png");
        match write_png(&path, &checkerboard(4), None) {
            Err(RenderError::Io { .. }) => {}
            other => panic!("expected an I/O error, got {:?}", other),
        }
        assert!(!path.exists());
    }

    #[test]
    fn replaces_existing_file_on_success() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ship.png");
        fs::write(&path, b"not a png").unwrap();
        write_png(&path, &checkerboard(8), None).unwrap();
        assert_eq!(image::open(&path).unwrap().dimensions(), (8, 8));
    }

    #[test]
    fn failed_write_keeps_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ship.png");
        let original = vec![7u8; 100];
        fs::write(&path, &original).unwrap();

        let result = write_atomically(&path, |writer| {
            writer.write_all(&[137, 80, 78, 71, 13, 10, 26, 10])?;
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        });

        assert!(result.is_err());
        assert_eq!(fs::read(&path).unwrap(), original);
        // Nothing but the original is left in the directory.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn failed_write_leaves_no_new_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ship.png");
        let result = write_atomically(&path, |_| {
            Err(io::Error::new(io::ErrorKind::Other, "encoder failed"))
        });
        assert!(result.is_err());
        assert!(!path.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
