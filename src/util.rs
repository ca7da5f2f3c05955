
pub mod math;
pub mod sad;
pub mod variance;

use std::fmt::Debug;

pub use sad::{get_sad, get_sad_x4};
pub use variance::get_variance;

/// A single sample of a picture plane.
///
/// Implemented for `u8` (8-bit content) and `u16` (high bit depth content).
pub trait Pixel: Clone + Copy + Debug + Default + PartialEq + Eq + Send + Sync + 'static {
    /// Number of bytes this sample contributes to a block hash.
    const HASH_BYTES: usize;

    #[must_use]
    fn to_i32(self) -> i32;

    /// Writes the little-endian bytes of this sample into `out[..HASH_BYTES]`.
    fn write_hash_bytes(self, out: &mut [u8]);
}

impl Pixel for u8 {
    const HASH_BYTES: usize = 1;

    fn to_i32(self) -> i32 {
        i32::from(self)
    }

    fn write_hash_bytes(self, out: &mut [u8]) {
        out[0] = self;
    }
}

impl Pixel for u16 {
    const HASH_BYTES: usize = 2;

    fn to_i32(self) -> i32 {
        i32::from(self)
    }

    fn write_hash_bytes(self, out: &mut [u8]) {
        out[..2].copy_from_slice(&self.to_le_bytes());
    }
}
