use super::{CardEffect, Condition};

/// Block gain clause; block is always granted to the source.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BlockSpec {
    /// Multiple of the source's block power.
    pub multiplier: f64,
    /// Extra multiple of block power per point of charge held.
    pub per_charge: f64,
    pub bonus: Option<BonusBlock>,
}

impl BlockSpec {
    pub fn new(multiplier: f64) -> Self {
        Self {
            multiplier,
            ..Self::default()
        }
    }
}

impl Default for BlockSpec {
    fn default() -> Self {
        Self {
            multiplier: 1.0,
            per_charge: 0.0,
            bonus: None,
        }
    }
}

/// Sub-effect that fires only while `condition` holds.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BonusBlock {
    pub condition: Condition,
    pub effect: Box<CardEffect>,
}
