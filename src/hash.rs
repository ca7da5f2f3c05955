pub mod crc;


use std::{collections::HashMap, num::NonZeroUsize};

use anyhow::{Result, bail};

use crate::{
    hash::crc::BlockHasher,
    intrabc::IntraBcArea,
    mv::MotionVector,
    plane::Plane,
    search::BlockContext,
    util::{Pixel, math::log2_exact},
};

/// Bits of the first CRC kept in the bucket key, below the size index.
const HASH_KEY_BITS: u32 = 16;
const HASH_KEY_MASK: u32 = (1 << HASH_KEY_BITS) - 1;

/// A block of the reference picture and its two hash values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHashEntry {
    pub x: usize,
    pub y: usize,
    /// Bucket key: low bits of the first CRC plus the block size index.
    pub hash_value1: u32,
    /// The second CRC, telling apart blocks sharing a bucket.
    pub hash_value2: u32,
}

/// Buckets of reference blocks keyed by `hash_value1`, in insertion order.
///
/// Built before any search of the picture runs and only read afterwards.
#[derive(Debug, Clone, Default)]
pub struct HashIndex {
    buckets: HashMap<u32, Vec<BlockHashEntry>>,
}

impl HashIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entry: BlockHashEntry) {
        self.buckets.entry(entry.hash_value1).or_default().push(entry);
    }

    #[must_use]
    pub fn count(&self, hash_value1: u32) -> usize {
        self.bucket(hash_value1).len()
    }

    #[must_use]
    pub fn bucket(&self, hash_value1: u32) -> &[BlockHashEntry] {
        self.buckets.get(&hash_value1).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Total number of entries over all buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Indexes every `block_size` square fully inside the picture area of
    /// `plane`.
    ///
    /// Blocks whose rows or columns are each a single value are only kept at
    /// positions aligned to the block grid, so flat areas don't flood the
    /// buckets.
    pub fn from_plane<T: Pixel>(plane: &Plane<T>, block_size: usize) -> Result<Self> {
        let Some(size_index) = hash_size_index(block_size) else {
            bail!(
                "Invalid block size for hashing, must be a power of two from 4 to 128, got \
                 {block_size}."
            );
        };

        let mut index = Self::new();
        let (width, height) = (plane.width().get(), plane.height().get());
        if block_size > width || block_size > height {
            return Ok(index);
        }

        let hasher = BlockHasher::new();
        let mut level = HashLevel::from_plane(plane, &hasher);
        while level.size < block_size {
            level = level.grow(width, height, &hasher);
        }

        let size_mask = block_size - 1;
        for y in 0..=height - block_size {
            for x in 0..=width - block_size {
                let pos = y * width + x;
                let flat = level.row_same[pos] || level.col_same[pos];
                let aligned = x & size_mask == 0 && y & size_mask == 0;
                if !flat || aligned {
                    index.insert(BlockHashEntry {
                        x,
                        y,
                        hash_value1: (level.hash1[pos] & HASH_KEY_MASK)
                            + (size_index << HASH_KEY_BITS),
                        hash_value2: level.hash2[pos],
                    });
                }
            }
        }

        Ok(index)
    }
}

/// Position of a square hash block size in 4, 8, .., 128.
#[must_use]
pub fn hash_size_index(block_size: usize) -> Option<u32> {
    (block_size.is_power_of_two() && (4..=128).contains(&block_size))
        .then(|| log2_exact(block_size) - 2)
}

/// `(hash_value1, hash_value2)` of the `block_size` square at the start of
/// `src`, or `None` for sizes that are not hashed.
#[must_use]
pub fn block_hash<T: Pixel>(
    hasher: &BlockHasher,
    src: &[T],
    stride: NonZeroUsize,
    block_size: usize,
) -> Option<(u32, u32)> {
    let size_index = hash_size_index(block_size)?;
    let stride = stride.get();

    let mut width = block_size / 2;
    let mut hash1 = Vec::with_capacity(width * width);
    let mut hash2 = Vec::with_capacity(width * width);
    for y in (0..block_size).step_by(2) {
        for x in (0..block_size).step_by(2) {
            let (crc1, crc2) = hash_2x2(hasher, src, y * stride + x, stride);
            hash1.push(crc1);
            hash2.push(crc2);
        }
    }

    while width > 1 {
        let half = width / 2;
        let mut next1 = Vec::with_capacity(half * half);
        let mut next2 = Vec::with_capacity(half * half);
        for y in 0..half {
            for x in 0..half {
                let idx = 2 * y * width + 2 * x;
                let quad = [idx, idx + 1, idx + width, idx + width + 1];
                let (crc1, crc2) =
                    hasher.combine(quad.map(|i| hash1[i]), quad.map(|i| hash2[i]));
                next1.push(crc1);
                next2.push(crc2);
            }
        }
        hash1 = next1;
        hash2 = next2;
        width = half;
    }

    Some(((hash1[0] & HASH_KEY_MASK) + (size_index << HASH_KEY_BITS), hash2[0]))
}

fn samples_2x2<T: Pixel>(src: &[T], at: usize, stride: usize) -> [T; 4] {
    [src[at], src[at + 1], src[at + stride], src[at + stride + 1]]
}

fn hash_2x2<T: Pixel>(hasher: &BlockHasher, src: &[T], at: usize, stride: usize) -> (u32, u32) {
    let mut bytes = [0u8; 8];
    for (i, sample) in samples_2x2(src, at, stride).into_iter().enumerate() {
        sample.write_hash_bytes(&mut bytes[i * T::HASH_BYTES..]);
    }
    hasher.hash_bytes(&bytes[..4 * T::HASH_BYTES])
}

/// Hashes of the `size` square at every picture position, indexed by
/// `y * width + x`. Entries whose square would leave the picture are unused.
struct HashLevel {
    size: usize,
    hash1: Vec<u32>,
    hash2: Vec<u32>,
    /// Every row of the square holds a single value.
    row_same: Vec<bool>,
    /// Every column of the square holds a single value.
    col_same: Vec<bool>,
}

impl HashLevel {
    fn from_plane<T: Pixel>(plane: &Plane<T>, hasher: &BlockHasher) -> Self {
        let (width, height) = (plane.width().get(), plane.height().get());
        let len = width * height;
        let mut level = Self {
            size: 2,
            hash1: vec![0; len],
            hash2: vec![0; len],
            row_same: vec![false; len],
            col_same: vec![false; len],
        };

        let picture = plane.view(0, 0);
        let stride = plane.stride().get();
        for y in 0..height - 1 {
            for x in 0..width - 1 {
                let pos = y * width + x;
                let at = y * stride + x;
                let p = samples_2x2(picture.block(), at, stride);
                level.row_same[pos] = p[0] == p[1] && p[2] == p[3];
                level.col_same[pos] = p[0] == p[2] && p[1] == p[3];
                (level.hash1[pos], level.hash2[pos]) =
                    hash_2x2(hasher, picture.block(), at, stride);
            }
        }
        level
    }

    fn grow(&self, width: usize, height: usize, hasher: &BlockHasher) -> Self {
        let size = self.size * 2;
        let half = self.size;
        let quarter = self.size / 2;
        let len = width * height;
        let mut next = Self {
            size,
            hash1: vec![0; len],
            hash2: vec![0; len],
            row_same: vec![false; len],
            col_same: vec![false; len],
        };
        if size > width || size > height {
            return next;
        }

        for y in 0..=height - size {
            for x in 0..=width - size {
                let pos = y * width + x;
                let below = pos + half * width;
                let quad = [pos, pos + half, below, below + half];
                (next.hash1[pos], next.hash2[pos]) =
                    hasher.combine(quad.map(|i| self.hash1[i]), quad.map(|i| self.hash2[i]));

                // overlapping halves cover every row and column of the square
                next.row_same[pos] = [
                    pos,
                    pos + quarter,
                    pos + half,
                    below,
                    below + quarter,
                    below + half,
                ]
                .iter()
                .all(|&i| self.row_same[i]);
                let middle = pos + quarter * width;
                next.col_same[pos] = [
                    pos,
                    pos + half,
                    middle,
                    middle + half,
                    below,
                    below + half,
                ]
                .iter()
                .all(|&i| self.col_same[i]);
            }
        }
        next
    }
}

/// Looks the source block up in `index` and returns the cheapest exact
/// match inside the limits, scored with variance plus rate against `ref_mv`
/// (1/8 pel).
///
/// `(x, y)` is the block's picture position. With `intra` set the index is
/// of the current picture: the block always finds itself, and candidates
/// must be causally valid for the area.
pub fn duplicate_block_search<T: Pixel>(
    ctx: &BlockContext<'_, T>,
    index: &HashIndex,
    hasher: &BlockHasher,
    x: usize,
    y: usize,
    intra: Option<&IntraBcArea>,
    ref_mv: MotionVector,
) -> Option<(MotionVector, u64)> {
    let bsize = ctx.fns.bsize;
    if !bsize.is_square() {
        return None;
    }
    let (hash_value1, hash_value2) =
        block_hash(hasher, ctx.src.block(), ctx.src.stride(), bsize.width())?;

    let bucket = index.bucket(hash_value1);
    if bucket.len() <= usize::from(intra.is_some()) {
        return None;
    }

    let mut best: Option<(MotionVector, u64)> = None;
    for entry in bucket.iter().filter(|entry| entry.hash_value2 == hash_value2) {
        let mv = MotionVector::new(entry.y as i32 - y as i32, entry.x as i32 - x as i32);
        if let Some(area) = intra
            && !area.allows(mv.to_eighth_pel(), x, y, bsize)
        {
            continue;
        }
        if !ctx.limits.contains(mv) {
            continue;
        }
        let cost = ctx.mvpred_var(mv, ref_mv);
        if best.is_none_or(|(_, best_cost)| cost < best_cost) {
            best = Some((mv, cost));
        }
    }
    best
}
