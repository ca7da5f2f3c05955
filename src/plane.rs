
use std::num::NonZeroUsize;

use anyhow::{Result, bail};

use crate::{mv::MotionVector, util::Pixel};

/// An owned picture plane surrounded by a border of replicated edge samples.
///
/// Motion search reads reference blocks that may hang over the picture
/// edge, so reference planes are stored with `hpad`/`vpad` samples of
/// padding on every side.
#[derive(Debug, Clone)]
pub struct Plane<T: Pixel> {
    data: Vec<T>,
    width: NonZeroUsize,
    height: NonZeroUsize,
    hpad: usize,
    vpad: usize,
    stride: NonZeroUsize,
}

impl<T: Pixel> Plane<T> {
    #[must_use]
    pub fn new(width: NonZeroUsize, height: NonZeroUsize, hpad: usize, vpad: usize) -> Self {
        let stride = width.saturating_add(2 * hpad);
        let rows = height.get() + 2 * vpad;
        Self {
            data: vec![T::default(); stride.get() * rows],
            width,
            height,
            hpad,
            vpad,
            stride,
        }
    }

    /// Builds a padded plane from `width * height` samples in raster order.
    pub fn from_samples(
        width: NonZeroUsize,
        height: NonZeroUsize,
        hpad: usize,
        vpad: usize,
        samples: &[T],
    ) -> Result<Self> {
        if samples.len() != width.get() * height.get() {
            bail!(
                "Plane of {}x{} needs {} samples, got {}.",
                width,
                height,
                width.get() * height.get(),
                samples.len()
            );
        }
        let mut plane = Self::new(width, height, hpad, vpad);
        for (y, row) in samples.chunks_exact(width.get()).enumerate() {
            let start = plane.index_of(0, y);
            plane.data[start..start + width.get()].copy_from_slice(row);
        }
        plane.pad();
        Ok(plane)
    }

    /// Builds a padded plane whose sample at `(x, y)` is `f(x, y)`.
    pub fn from_fn(
        width: NonZeroUsize,
        height: NonZeroUsize,
        hpad: usize,
        vpad: usize,
        mut f: impl FnMut(usize, usize) -> T,
    ) -> Self {
        let mut plane = Self::new(width, height, hpad, vpad);
        for y in 0..height.get() {
            for x in 0..width.get() {
                let index = plane.index_of(x, y);
                plane.data[index] = f(x, y);
            }
        }
        plane.pad();
        plane
    }

    #[must_use]
    pub fn width(&self) -> NonZeroUsize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> NonZeroUsize {
        self.height
    }

    #[must_use]
    pub fn hpad(&self) -> usize {
        self.hpad
    }

    #[must_use]
    pub fn vpad(&self) -> usize {
        self.vpad
    }

    #[must_use]
    pub fn stride(&self) -> NonZeroUsize {
        self.stride
    }

    #[must_use]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> T {
        self.data[self.index_of(x, y)]
    }

    /// Writes one sample inside the picture area. Call [`Plane::pad`]
    /// afterwards if the sample lies on an edge.
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let index = self.index_of(x, y);
        self.data[index] = value;
    }

    /// A view whose origin is the picture sample at `(x, y)`.
    #[must_use]
    pub fn view(&self, x: usize, y: usize) -> PlaneView<'_, T> {
        PlaneView {
            data: &self.data,
            stride: self.stride,
            origin: self.index_of(x, y),
        }
    }

    fn index_of(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width.get() && y < self.height.get());
        (self.vpad + y) * self.stride.get() + self.hpad + x
    }

    /// Extends the edge samples into the border.
    ///
    /// Corners take the nearest corner sample, the top and bottom borders
    /// replicate the first and last rows, the left and right borders the
    /// first and last columns.
    pub fn pad(&mut self) {
        let pitch = self.stride.get();
        let (width, height) = (self.width.get(), self.height.get());
        let (hpad, vpad) = (self.hpad, self.vpad);
        let pfoff = vpad * pitch + hpad;

        for y in 0..height {
            let row = pfoff + y * pitch;
            let left = self.data[row];
            let right = self.data[row + width - 1];
            self.data[row - hpad..row].fill(left);
            self.data[row + width..row + width + hpad].fill(right);
        }

        // rows are copied whole, so the corners come along
        let first_row = pfoff - hpad;
        let last_row = first_row + (height - 1) * pitch;
        for y in 0..vpad {
            self.data
                .copy_within(first_row..first_row + pitch, y * pitch);
            self.data
                .copy_within(last_row..last_row + pitch, last_row + (y + 1) * pitch);
        }
    }
}

/// A borrowed window into a plane: a buffer, its stride, and the index of
/// the sample a zero displacement refers to.
///
/// Candidate blocks are addressed relative to the origin, either by motion
/// vector or by a precomputed linear offset. Callers keep displacements
/// inside limits derived from the buffer's padding, so every addressed block
/// lies inside `data`.
#[derive(Debug, Clone, Copy)]
pub struct PlaneView<'a, T: Pixel> {
    data: &'a [T],
    stride: NonZeroUsize,
    origin: usize,
}

impl<'a, T: Pixel> PlaneView<'a, T> {
    pub fn new(data: &'a [T], stride: NonZeroUsize, origin: usize) -> Result<Self> {
        if origin >= data.len() {
            bail!(
                "View origin {origin} is outside a buffer of {} samples.",
                data.len()
            );
        }
        Ok(Self {
            data,
            stride,
            origin,
        })
    }

    #[must_use]
    pub fn stride(&self) -> NonZeroUsize {
        self.stride
    }

    /// Linear offset of a full-pel displacement from the origin.
    #[must_use]
    pub fn offset_of(&self, mv: MotionVector) -> isize {
        mv.row as isize * self.stride.get() as isize + mv.col as isize
    }

    /// The samples starting at the origin.
    #[must_use]
    pub fn block(&self) -> &'a [T] {
        &self.data[self.origin..]
    }

    /// The samples starting `offset` positions away from the origin.
    #[must_use]
    pub fn at_offset(&self, offset: isize) -> &'a [T] {
        let index = self.origin.wrapping_add_signed(offset);
        debug_assert!(
            index < self.data.len(),
            "offset {offset} from origin {} leaves the buffer",
            self.origin
        );
        &self.data[index..]
    }

    /// The samples of the block displaced by a full-pel motion vector.
    #[must_use]
    pub fn at_mv(&self, mv: MotionVector) -> &'a [T] {
        self.at_offset(self.offset_of(mv))
    }
}
