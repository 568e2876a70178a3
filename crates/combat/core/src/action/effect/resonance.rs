use crate::state::{CardKeywords, CardType, LastPlayed};

use super::{CardEffect, ResourceSpec};

/// Bonus merged into an effect when the previously played card matches.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Resonance {
    pub previous: ResonanceTrigger,
    pub bonus: ResonanceBonus,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ResonanceTrigger {
    CardType(CardType),
    Keyword(CardKeywords),
}

impl ResonanceTrigger {
    pub fn matches(&self, last: Option<&LastPlayed>) -> bool {
        match (self, last) {
            (_, None) => false,
            (Self::CardType(card_type), Some(last)) => last.card_type == *card_type,
            (Self::Keyword(keywords), Some(last)) => last.keywords.intersects(*keywords),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ResonanceBonus {
    pub damage_multiplier: f64,
    pub block_multiplier: f64,
    pub cp_gain: i32,
    pub draw: u32,
}

impl ResonanceBonus {
    /// Adds the bonus onto `effect`. Damage and block bonuses only extend
    /// clauses that already exist.
    pub fn merge_into(&self, effect: &mut CardEffect) {
        if let Some(damage) = effect.damage.as_mut() {
            damage.multiplier += self.damage_multiplier;
        }
        if let Some(block) = effect.block.as_mut() {
            block.multiplier += self.block_multiplier;
        }
        if self.cp_gain != 0 || self.draw != 0 {
            let resources = effect.resources.get_or_insert_with(ResourceSpec::default);
            resources.gain_cp += self.cp_gain;
            resources.draw += self.draw;
        }
    }
}
