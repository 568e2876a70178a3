use crate::state::EnemyId;

/// Extras resolved only when an enemy is the source.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EnemyEffectSpec {
    /// Random discards from the player's hand.
    pub force_discard: usize,
    /// Enemy templates to bring in; overflow waits in the reinforcement queue.
    pub summon: Vec<EnemyId>,
    /// HP the enemy loses after acting.
    pub recoil: i32,
    /// Change to the enemy's own entropy meter.
    pub entropy: i32,
}
