
use anyhow::{Result, bail};
use bitflags::bitflags;
use smallvec::SmallVec;

/// Number of rings in the diamond search geometry.
pub const MAX_MVSEARCH_STEPS: usize = 11;
/// Radius of the coarsest diamond ring, in full pels.
pub const MAX_FIRST_STEP: i32 = 1 << (MAX_MVSEARCH_STEPS - 1);

pub const MIN_RANGE: i32 = 7;
pub const MAX_RANGE: i32 = 256;
pub const MIN_INTERVAL: i32 = 1;
pub const MAX_MESH_STEP: usize = 4;

/// Iterations of the refining search run after the diamond stage.
pub const DEFAULT_REFINE_RANGE: usize = 8;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchMethod {
    FastDiamond = 0,
    FastHex = 1,
    Hex = 2,
    Square = 3,
    BigDia = 4,
    #[default]
    Nstep = 5,
}

impl TryFrom<i64> for SearchMethod {
    type Error = anyhow::Error;

    fn try_from(val: i64) -> Result<Self> {
        Ok(match val {
            0 => Self::FastDiamond,
            1 => Self::FastHex,
            2 => Self::Hex,
            3 => Self::Square,
            4 => Self::BigDia,
            5 => Self::Nstep,
            _ => bail!("Invalid value for 'search_method', must be 0-5, got {val}."),
        })
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SearchFlags: u8 {
        /// Block copy within the current picture.
        const INTRA = 0b0000_0001;
        const HASH_SEARCH = 0b0000_0010;
    }
}

/// One entry of the mesh schedule: scan `±range` around the center every
/// `interval` samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshPattern {
    pub range: i32,
    pub interval: i32,
}

impl MeshPattern {
    #[must_use]
    pub const fn new(range: i32, interval: i32) -> Self {
        Self { range, interval }
    }

    /// Whether this pattern may open a mesh search.
    #[must_use]
    pub fn is_valid_start(&self) -> bool {
        (MIN_RANGE..=MAX_RANGE).contains(&self.range)
            && (MIN_INTERVAL..=self.range).contains(&self.interval)
    }
}

impl TryFrom<(i64, i64)> for MeshPattern {
    type Error = anyhow::Error;

    fn try_from((range, interval): (i64, i64)) -> Result<Self> {
        let Ok(range) = i32::try_from(range) else {
            bail!("Invalid value for 'range', must fit in 32 bits, got {range}.");
        };
        let Ok(interval) = i32::try_from(interval) else {
            bail!("Invalid value for 'interval', must fit in 32 bits, got {interval}.");
        };
        if range < 1 {
            bail!("Invalid value for 'range', must be positive, got {range}.");
        }
        if interval < 1 {
            bail!("Invalid value for 'interval', must be positive, got {interval}.");
        }
        Ok(Self { range, interval })
    }
}

/// Coarse to fine list of mesh patterns.
///
/// Only the shape of the list and the refinement patterns are checked here.
/// Whether the first pattern is usable is decided by the mesh search, which
/// reports an unusable schedule as "no result".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshSchedule {
    patterns: SmallVec<[MeshPattern; MAX_MESH_STEP]>,
}

impl MeshSchedule {
    pub fn new(patterns: &[MeshPattern]) -> Result<Self> {
        if patterns.is_empty() {
            bail!("Mesh schedule needs at least one pattern.");
        }
        if patterns.len() > MAX_MESH_STEP {
            bail!(
                "Mesh schedule has {} patterns, at most {} are allowed.",
                patterns.len(),
                MAX_MESH_STEP
            );
        }
        if let Some(bad) = patterns[1..]
            .iter()
            .find(|pattern| pattern.range < 0 || pattern.interval < MIN_INTERVAL)
        {
            bail!(
                "Invalid mesh pattern, range must be non-negative and interval positive, got \
                 range {} interval {}.",
                bad.range,
                bad.interval
            );
        }
        Ok(Self {
            patterns: SmallVec::from_slice(patterns),
        })
    }

    #[must_use]
    pub fn patterns(&self) -> &[MeshPattern] {
        &self.patterns
    }

    #[must_use]
    pub fn first(&self) -> MeshPattern {
        self.patterns[0]
    }

    /// Coarse to fine schedule that scores a fraction of the positions the
    /// default one does. Can settle on a local optimum in noisy content.
    #[must_use]
    pub fn fast() -> Self {
        Self {
            patterns: SmallVec::from_slice(&[
                MeshPattern::new(64, 4),
                MeshPattern::new(28, 2),
                MeshPattern::new(15, 1),
                MeshPattern::new(7, 1),
            ]),
        }
    }
}

/// Every full pel position within `MAX_RANGE` of the center, in one pass.
impl Default for MeshSchedule {
    fn default() -> Self {
        Self {
            patterns: SmallVec::from_slice(&[
                MeshPattern::new(MAX_RANGE, 1),
                MeshPattern::new(MAX_RANGE, 1),
            ]),
        }
    }
}

/// When the dispatcher escalates to the mesh search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MeshPolicy {
    #[default]
    Always,
    /// Escalate only when the diamond cost exceeds `threshold` scaled down
    /// to the block area (`threshold` is given for 128x128 blocks).
    Thresholded { threshold: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    pub method: SearchMethod,
    pub mesh_schedule: MeshSchedule,
    pub mesh_policy: MeshPolicy,
    pub refine_range: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            method: SearchMethod::Nstep,
            mesh_schedule: MeshSchedule::default(),
            mesh_policy: MeshPolicy::Always,
            refine_range: DEFAULT_REFINE_RANGE,
        }
    }
}
