/// Combat tuning constants and runtime-tunable parameters.
///
/// Loaded from `config.toml` by `combat-content`; every field has a default so
/// partial files are accepted.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Cards drawn at the start of every player turn.
    pub draw_per_turn: u32,
    /// Hand size cap; draws stop and generated cards overflow to discard.
    pub max_hand_size: usize,
    /// Cap for the player's charge counter.
    pub max_charge: u32,
    /// Player entropy lost at end of turn.
    pub entropy_decay: u32,
    /// HP paid per point of cost for overclock cards.
    pub overclock_hp_per_cp: i32,

    /// Aggro weight of the player when an enemy picks a single target.
    pub player_aggro_weight: u32,
    /// Aggro weight of each alive player-owned construct.
    pub construct_aggro_weight: u32,
    /// Enemies alive at once before reinforcements wait in the queue.
    pub max_active_enemies: usize,

    /// Flat damage added against vulnerable targets, as a fraction of attack.
    pub vulnerable_bonus: f64,
    /// Outgoing damage reduction for weakened attackers.
    pub weak_reduction: f64,
    /// Share of the pierce portion that survives block bypass.
    pub pierce_efficiency: f64,
    /// Retaliation multiplier for counter-stance.
    pub counter_multiplier: f64,

    /// Burn tick rate: stacks × source attack × rate.
    pub burn_rate: f64,
    /// Poison tick rate: fraction of max HP.
    pub poison_rate: f64,
    /// Percent chance that a burn on the player crits.
    pub burn_crit_chance: u32,
    pub crit_multiplier: f64,
    /// Overheat stacks at which the status detonates at turn start.
    pub overheat_threshold: i32,
    pub overheat_damage_per_stack: i32,

    /// Maximum nesting of sub-effects within one command.
    pub max_effect_depth: u32,
}

impl CombatConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of constructs alive at once (all owners combined).
    pub const MAX_CONSTRUCTS: usize = 3;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_DRAW_PER_TURN: u32 = 5;
    pub const DEFAULT_MAX_HAND_SIZE: usize = 10;
    pub const DEFAULT_MAX_CHARGE: u32 = 10;
    pub const DEFAULT_MAX_EFFECT_DEPTH: u32 = 8;

    pub fn new() -> Self {
        Self {
            draw_per_turn: Self::DEFAULT_DRAW_PER_TURN,
            max_hand_size: Self::DEFAULT_MAX_HAND_SIZE,
            max_charge: Self::DEFAULT_MAX_CHARGE,
            entropy_decay: 1,
            overclock_hp_per_cp: 2,
            player_aggro_weight: 3,
            construct_aggro_weight: 1,
            max_active_enemies: 3,
            vulnerable_bonus: 0.5,
            weak_reduction: 0.25,
            pierce_efficiency: 0.5,
            counter_multiplier: 1.0,
            burn_rate: 0.15,
            poison_rate: 0.10,
            burn_crit_chance: 10,
            crit_multiplier: 1.5,
            overheat_threshold: 5,
            overheat_damage_per_stack: 2,
            max_effect_depth: Self::DEFAULT_MAX_EFFECT_DEPTH,
        }
    }

    pub fn with_draw_per_turn(mut self, draw_per_turn: u32) -> Self {
        self.draw_per_turn = draw_per_turn;
        self
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}
