use std::num::NonZeroUsize;

use anyhow::{Context, Result};
use av1_fullpel_me::{Pixel, Plane};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro128StarStar;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PictureContent {
    /// Uniform noise, every block unique.
    Noise { seed: u8 },
    /// One smooth bright blob over a dark background.
    Blob { cx: f64, cy: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestPictureConfig {
    pub width: usize,
    pub height: usize,
    /// Border on every side, in samples.
    pub pad: usize,
    pub content: PictureContent,
}

fn dimensions(config: &TestPictureConfig) -> Result<(NonZeroUsize, NonZeroUsize)> {
    Ok((
        NonZeroUsize::new(config.width).context("picture width must be positive")?,
        NonZeroUsize::new(config.height).context("picture height must be positive")?,
    ))
}

fn blob(x: usize, y: usize, cx: f64, cy: f64, peak: f64) -> f64 {
    let (dx, dy) = (x as f64 - cx, y as f64 - cy);
    peak * (-(dx * dx + dy * dy) / 200.0).exp()
}

pub fn generate_picture(config: &TestPictureConfig) -> Result<Plane<u8>> {
    let (width, height) = dimensions(config)?;
    Ok(match config.content {
        PictureContent::Noise { seed } => {
            let mut rng = Xoshiro128StarStar::from_seed([seed; 16]);
            Plane::from_fn(width, height, config.pad, config.pad, |_, _| rng.random())
        }
        PictureContent::Blob { cx, cy } => {
            Plane::from_fn(width, height, config.pad, config.pad, |x, y| {
                16 + blob(x, y, cx, cy, 220.0) as u8
            })
        }
    })
}

pub fn generate_picture_16bit(config: &TestPictureConfig) -> Result<Plane<u16>> {
    let (width, height) = dimensions(config)?;
    Ok(match config.content {
        PictureContent::Noise { seed } => {
            let mut rng = Xoshiro128StarStar::from_seed([seed; 16]);
            Plane::from_fn(width, height, config.pad, config.pad, |_, _| {
                rng.random_range(0..1024)
            })
        }
        PictureContent::Blob { cx, cy } => {
            Plane::from_fn(width, height, config.pad, config.pad, |x, y| {
                64 + blob(x, y, cx, cy, 3900.0) as u16
            })
        }
    })
}

/// Copies the `size` square at `from` over the one at `to`.
pub fn copy_block<T: Pixel>(
    plane: &mut Plane<T>,
    from: (usize, usize),
    to: (usize, usize),
    size: usize,
) {
    for y in 0..size {
        for x in 0..size {
            let value = plane.get(from.0 + x, from.1 + y);
            plane.set(to.0 + x, to.1 + y, value);
        }
    }
    plane.pad();
}

/// The `width`x`height` block at `(x, y)` as its own unpadded plane.
pub fn extract_block<T: Pixel>(
    plane: &Plane<T>,
    x: usize,
    y: usize,
    width: usize,
    height: usize,
) -> Result<Plane<T>> {
    let width = NonZeroUsize::new(width).context("block width must be positive")?;
    let height = NonZeroUsize::new(height).context("block height must be positive")?;
    Ok(Plane::from_fn(width, height, 0, 0, |bx, by| {
        plane.get(x + bx, y + by)
    }))
}
