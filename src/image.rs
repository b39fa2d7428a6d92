use std::path::Path;

use anyhow::{ensure, Context, Result};
use baker::Raster;
use exr::prelude::*;

/// Writes `raster` as an OpenEXR RGBA image with half-float channels. Row 0 of the raster is the
/// top line of the image.
pub fn write_exr(path: &Path, raster: &Raster) -> Result<()> {
    ensure!(
        raster.pixels.len() == raster.width * raster.height,
        "raster has {} pixels, expected {}x{}",
        raster.pixels.len(),
        raster.width,
        raster.height
    );
    write_rgba_file(path, raster.width, raster.height, |x, y| {
        let [r, g, b, a] = raster.get(x, y);
        (
            f16::from_f32(r),
            f16::from_f32(g),
            f16::from_f32(b),
            f16::from_f32(a),
        )
    })
    .with_context(|| format!("cannot write image {}", path.display()))?;
    log::info!(
        "Wrote {}x{} normal map to {}",
        raster.width,
        raster.height,
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn written_pixels_read_back() {
        let raster = Raster {
            width: 3,
            height: 2,
            pixels: vec![
                [0.5, 0.5, 1.0, 1.0],
                [0.25, 0.5, 0.75, 1.0],
                [0.0, 1.0, 0.5, 1.0],
                [1.0, 0.0, 0.0, 1.0],
                [0.125, 0.375, 0.875, 1.0],
                [0.5, 0.5, 1.0, 1.0],
            ],
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("normals.exr");
        write_exr(&path, &raster).unwrap();

        let image = read_first_rgba_layer_from_file(
            &path,
            |resolution, _| vec![[0.0f32; 4]; resolution.width() * resolution.height()],
            |pixels, position, (r, g, b, a): (f32, f32, f32, f32)| {
                pixels[position.y() * 3 + position.x()] = [r, g, b, a];
            },
        )
        .unwrap();
        // All values above are exact in half precision.
        assert_eq!(image.layer_data.channel_data.pixels, raster.pixels);
    }

    #[test]
    fn mismatched_raster_is_rejected() {
        let raster = Raster {
            width: 2,
            height: 2,
            pixels: vec![[0.0; 4]; 3],
        };
        let dir = tempfile::tempdir().unwrap();
        assert!(write_exr(&dir.path().join("bad.exr"), &raster).is_err());
    }
}
