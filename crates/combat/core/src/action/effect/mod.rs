//! Card effect grammar.
//!
//! A [`CardEffect`] is a struct of independent optional clauses. The
//! interpreter in [`crate::action::execute`] resolves whichever clauses are
//! present in a fixed order; absent clauses are skipped. Sub-effects nest by
//! boxing another `CardEffect`.
mod block;
mod cards;
mod condition;
mod damage;
mod enemy;
mod interactive;
mod resonance;
mod resource;
mod status;

pub use block::{BlockSpec, BonusBlock};
pub use cards::{CardManipulation, DiscardSpec};
pub use condition::{Condition, ConditionalEffect};
pub use damage::{ChargeConsumption, DamageSpec, HIGH_HEALTH_RATIO, LOW_HEALTH_RATIO, OnKill};
pub use enemy::EnemyEffectSpec;
pub use interactive::{DiscoverSource, InteractiveSpec, TraceMode};
pub use resonance::{Resonance, ResonanceBonus, ResonanceTrigger};
pub use resource::ResourceSpec;
pub use status::{ConsumeStatusSpec, StatusApplication};

use crate::action::TargetClass;
use crate::state::ConstructId;

/// Composite effect attached to a card, a status, a construct or an enemy.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CardEffect {
    /// Target class used when the command does not name a target.
    pub target: Option<TargetClass>,
    pub resonance: Option<Resonance>,
    pub damage: Option<DamageSpec>,
    pub block: Option<BlockSpec>,
    pub consume_status: Option<ConsumeStatusSpec>,
    pub apply_status: Vec<StatusApplication>,
    pub resources: Option<ResourceSpec>,
    pub conditional: Option<ConditionalEffect>,
    pub cards: Option<CardManipulation>,
    pub interactive: Option<InteractiveSpec>,
    /// Construct template to deploy.
    pub deploy: Option<ConstructId>,
    /// Extras only meaningful when an enemy resolves the effect.
    pub enemy: Option<EnemyEffectSpec>,
}

impl CardEffect {
    pub fn damage(multiplier: f64) -> Self {
        Self {
            target: Some(TargetClass::Enemy),
            damage: Some(DamageSpec::new(multiplier)),
            ..Self::default()
        }
    }

    pub fn block(multiplier: f64) -> Self {
        Self {
            block: Some(BlockSpec::new(multiplier)),
            ..Self::default()
        }
    }

    pub fn status(application: StatusApplication) -> Self {
        Self {
            target: Some(TargetClass::Enemy),
            apply_status: vec![application],
            ..Self::default()
        }
    }

    pub fn resources(resources: ResourceSpec) -> Self {
        Self {
            resources: Some(resources),
            ..Self::default()
        }
    }

    pub fn with_target(mut self, target: TargetClass) -> Self {
        self.target = Some(target);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
