//! Passive bonuses granted by the player's equipment.
//!
//! Equipment rolls happen outside combat; the engine only reads the resolved
//! bonuses.

/// A chance-based status proc.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProcChance {
    /// Percent chance, 0..=100.
    pub chance: u32,
    pub stacks: i32,
}

/// Reward granted every `every` cards played in a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Milestone {
    pub every: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub draw: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub heal: i32,
}

/// Aggregated equipment passives.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EquipmentBonuses {
    pub on_hit_burn: Option<ProcChance>,
    pub on_hit_bleed: Option<ProcChance>,
    /// Minimum pierce multiplier, in percent, for the first attack each turn.
    pub first_attack_pierce: u32,
    /// Extra burn damage dealt by the player's burns, in percent.
    pub burn_damage_bonus: u32,
    /// Reduction of DoT damage taken by the player, in percent.
    pub dot_reduction: u32,
    /// Gain one charge every N debuffs applied in a turn (0 disables).
    pub charge_every_n_debuffs: u32,
    /// CP discount on the first attack each turn.
    pub first_attack_discount: i32,
    /// Extra block from skill cards, in percent.
    pub skill_block_bonus: u32,
    pub play_milestone: Option<Milestone>,
    /// HP restored whenever a power card resolves.
    pub power_heal: i32,
    /// Cards drawn on the first discard of each turn.
    pub first_discard_draw: u32,
    /// Share of block kept at turn start, in percent (0 clears it).
    pub block_retention: u32,
}
