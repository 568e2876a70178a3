use super::CardEffect;

/// Target HP ratio at or below which `low_health_bonus` applies.
pub const LOW_HEALTH_RATIO: f64 = 0.5;
/// Target HP ratio at or above which `high_health_bonus` applies.
pub const HIGH_HEALTH_RATIO: f64 = 0.75;

/// Attack damage clause.
///
/// Base damage is `attack × multiplier`; the bonus fields are additive
/// fractions applied per target.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DamageSpec {
    pub multiplier: f64,
    pub hits: u32,
    /// Share of damage that ignores block.
    pub pierce_multiplier: f64,
    pub consume_charge: Option<ChargeConsumption>,
    pub bonus_vs_bleed: f64,
    pub bonus_vs_debuffed: f64,
    pub low_health_bonus: f64,
    pub high_health_bonus: f64,
    /// Fires against the target when HP damage was dealt.
    pub on_hp_damage: Option<Box<CardEffect>>,
    /// Fires when block swallowed the whole hit.
    pub on_blocked: Option<Box<CardEffect>>,
    pub on_kill: Option<OnKill>,
}

impl DamageSpec {
    pub fn new(multiplier: f64) -> Self {
        Self {
            multiplier,
            ..Self::default()
        }
    }

    pub fn with_pierce(mut self, pierce_multiplier: f64) -> Self {
        self.pierce_multiplier = pierce_multiplier;
        self
    }
}

impl Default for DamageSpec {
    fn default() -> Self {
        Self {
            multiplier: 1.0,
            hits: 1,
            pierce_multiplier: 0.0,
            consume_charge: None,
            bonus_vs_bleed: 0.0,
            bonus_vs_debuffed: 0.0,
            low_health_bonus: 0.0,
            high_health_bonus: 0.0,
            on_hp_damage: None,
            on_blocked: None,
            on_kill: None,
        }
    }
}

/// Spends player charge for extra damage.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ChargeConsumption {
    /// Maximum charge consumed.
    pub max: u32,
    /// Extra damage per charge, as a multiple of attack.
    pub per_charge: f64,
    /// Cards drawn when any charge was consumed.
    pub draw: u32,
    /// Random discards when any charge was consumed.
    pub discard: u32,
}

impl Default for ChargeConsumption {
    fn default() -> Self {
        Self {
            max: u32::MAX,
            per_charge: 0.0,
            draw: 0,
            discard: 0,
        }
    }
}

/// Kill hook, evaluated when a hit takes the target to 0 HP.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OnKill {
    pub heal: i32,
    pub draw: u32,
    /// Re-run the damage clause against a freshly picked target.
    pub recast: bool,
}
