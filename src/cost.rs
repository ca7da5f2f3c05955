
use anyhow::{Result, bail};

use crate::{
    mv::{MotionVector, MvJoint},
    util::math::round_power_of_two,
};

/// Largest component magnitude the component cost tables cover, in 1/8 pel.
pub const MV_MAX: i32 = (1 << 14) - 1;
/// Length of a component cost table.
pub const MV_VALS: usize = (2 * MV_MAX + 1) as usize;
pub const MV_JOINTS: usize = 4;

/// Bit costs are stored scaled by `1 << AV1_PROB_COST_SHIFT`.
pub const AV1_PROB_COST_SHIFT: u32 = 9;
const RDDIV_BITS: u32 = 7;
const RD_EPB_SHIFT: u32 = 6;
const PIXEL_TRANSFORM_ERROR_SCALE: u32 = 4;
const RD_COST_SHIFT: u32 =
    RDDIV_BITS + AV1_PROB_COST_SHIFT - RD_EPB_SHIFT + PIXEL_TRANSFORM_ERROR_SCALE;

/// Entropy coder estimates of the bits needed to code an MV difference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MvCostTables {
    joint: [u32; MV_JOINTS],
    row: Vec<u32>,
    col: Vec<u32>,
}

impl MvCostTables {
    /// `row` and `col` are indexed by component value plus [`MV_MAX`].
    pub fn new(joint: [u32; MV_JOINTS], row: Vec<u32>, col: Vec<u32>) -> Result<Self> {
        if row.len() != MV_VALS {
            bail!(
                "Row cost table needs {} entries, got {}.",
                MV_VALS,
                row.len()
            );
        }
        if col.len() != MV_VALS {
            bail!(
                "Column cost table needs {} entries, got {}.",
                MV_VALS,
                col.len()
            );
        }
        Ok(Self { joint, row, col })
    }

    /// Tables whose component cost grows with the bit length of the
    /// component magnitude, as an exp-Golomb style code would.
    #[must_use]
    pub fn from_magnitude_model() -> Self {
        let component: Vec<u32> = (-MV_MAX..=MV_MAX)
            .map(|v| {
                if v == 0 {
                    return 0;
                }
                // magnitude class plus sign
                let bits = 2 * (u32::BITS - v.unsigned_abs().leading_zeros()) + 1;
                bits << AV1_PROB_COST_SHIFT
            })
            .collect();
        let bit = 1 << AV1_PROB_COST_SHIFT;
        Self {
            joint: [bit, 2 * bit, 2 * bit, 2 * bit],
            row: component.clone(),
            col: component,
        }
    }

    /// Cost of coding `diff` (1/8 pel): joint class plus both components.
    #[must_use]
    pub fn bitcost(&self, diff: MotionVector) -> u64 {
        let joint = self.joint[diff.joint() as usize];
        u64::from(joint)
            + u64::from(self.row[component_index(diff.row)])
            + u64::from(self.col[component_index(diff.col)])
    }

    #[must_use]
    pub fn joint_cost(&self, joint: MvJoint) -> u32 {
        self.joint[joint as usize]
    }
}

fn component_index(value: i32) -> usize {
    (value.clamp(-MV_MAX, MV_MAX) + MV_MAX) as usize
}

/// Weights bit costs into distortion units for one block search.
///
/// Without tables the model is cost-free and every MV costs nothing.
#[derive(Debug, Clone, Copy)]
pub struct MvCostModel<'a> {
    tables: Option<&'a MvCostTables>,
    pub sad_per_bit: u32,
    pub error_per_bit: u32,
}

impl<'a> MvCostModel<'a> {
    #[must_use]
    pub fn new(tables: Option<&'a MvCostTables>, sad_per_bit: u32, error_per_bit: u32) -> Self {
        Self {
            tables,
            sad_per_bit,
            error_per_bit,
        }
    }

    #[must_use]
    pub fn cost_free() -> Self {
        Self::new(None, 0, 0)
    }

    #[must_use]
    pub fn tables(&self) -> Option<&'a MvCostTables> {
        self.tables
    }

    /// Rate term added to a variance, both MVs in 1/8 pel.
    #[must_use]
    pub fn rd_cost(&self, mv: MotionVector, ref_mv: MotionVector) -> u64 {
        self.tables.map_or(0, |tables| {
            round_power_of_two(
                tables.bitcost(mv - ref_mv) * u64::from(self.error_per_bit),
                RD_COST_SHIFT,
            )
        })
    }

    /// Rate term added to a SAD, both MVs in full pel.
    #[must_use]
    pub fn sad_cost(&self, mv: MotionVector, ref_mv: MotionVector) -> u64 {
        self.tables.map_or(0, |tables| {
            round_power_of_two(
                tables.bitcost((mv - ref_mv).to_eighth_pel()) * u64::from(self.sad_per_bit),
                AV1_PROB_COST_SHIFT,
            )
        })
    }
}
