//! Card instances and the four card zones.

use std::collections::VecDeque;

use bitflags::bitflags;

use super::{CardId, CardInstanceId};

/// Broad category of a card; only attacks run the damage step.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CardType {
    Attack,
    Skill,
    Power,
}

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Legendary,
}

bitflags! {
    /// Keywords that change how a card is paid for or routed after play.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct CardKeywords: u8 {
        /// Moved to exhaust instead of discard after play.
        const EXHAUST    = 1 << 0;
        /// Returns to hand after play.
        const RETURN     = 1 << 1;
        /// Discarded from hand at end of turn, firing its discard effect.
        const ETHEREAL   = 1 << 2;
        /// Costs one more for every earlier play this combat.
        const ESCALATING = 1 << 3;
        /// Paid with HP instead of CP.
        const OVERCLOCK  = 1 << 4;
    }
}

/// A card instance inside a combat.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatCard {
    pub instance_id: CardInstanceId,
    pub card_id: CardId,
    /// Cost for this instance until it is played or the combat ends.
    pub cost_override: Option<i32>,
    /// Exhausted after play and dropped between waves.
    pub temporary: bool,
}

impl CombatCard {
    pub fn new(instance_id: CardInstanceId, card_id: CardId) -> Self {
        Self {
            instance_id,
            card_id,
            cost_override: None,
            temporary: false,
        }
    }

    pub fn with_cost_override(mut self, cost: i32) -> Self {
        self.cost_override = Some(cost.max(0));
        self
    }

    pub fn temporary(mut self) -> Self {
        self.temporary = true;
        self
    }
}

/// Identifies one of the four card zones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Zone {
    Deck,
    Hand,
    Discard,
    Exhaust,
}

/// Disjoint ordered card zones. The front of `deck` is the top.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CardZones {
    pub deck: VecDeque<CombatCard>,
    pub hand: Vec<CombatCard>,
    pub discard: Vec<CombatCard>,
    pub exhaust: Vec<CombatCard>,
}

impl CardZones {
    pub fn total(&self) -> usize {
        self.deck.len() + self.hand.len() + self.discard.len() + self.exhaust.len()
    }

    pub fn hand_card(&self, instance_id: CardInstanceId) -> Option<&CombatCard> {
        self.hand.iter().find(|c| c.instance_id == instance_id)
    }

    pub fn take_from_hand(&mut self, instance_id: CardInstanceId) -> Option<CombatCard> {
        let index = self.hand.iter().position(|c| c.instance_id == instance_id)?;
        Some(self.hand.remove(index))
    }

    pub fn take_from_discard(&mut self, instance_id: CardInstanceId) -> Option<CombatCard> {
        let index = self
            .discard
            .iter()
            .position(|c| c.instance_id == instance_id)?;
        Some(self.discard.remove(index))
    }

    pub fn zone_of(&self, instance_id: CardInstanceId) -> Option<Zone> {
        let matches = |c: &CombatCard| c.instance_id == instance_id;
        if self.deck.iter().any(matches) {
            Some(Zone::Deck)
        } else if self.hand.iter().any(matches) {
            Some(Zone::Hand)
        } else if self.discard.iter().any(matches) {
            Some(Zone::Discard)
        } else if self.exhaust.iter().any(matches) {
            Some(Zone::Exhaust)
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &CombatCard> {
        self.deck
            .iter()
            .chain(self.hand.iter())
            .chain(self.discard.iter())
            .chain(self.exhaust.iter())
    }
}

/// What resonance looks at: the card resolved immediately before.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LastPlayed {
    pub card_id: CardId,
    pub card_type: CardType,
    pub keywords: CardKeywords,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: u32) -> CombatCard {
        CombatCard::new(CardInstanceId(id), CardId::from("strike"))
    }

    #[test]
    fn zones_track_membership() {
        let mut zones = CardZones::default();
        zones.deck.push_back(card(1));
        zones.hand.push(card(2));
        zones.discard.push(card(3));

        assert_eq!(zones.total(), 3);
        assert_eq!(zones.zone_of(CardInstanceId(2)), Some(Zone::Hand));
        assert_eq!(zones.zone_of(CardInstanceId(9)), None);

        let taken = zones.take_from_hand(CardInstanceId(2)).unwrap();
        assert_eq!(taken.instance_id, CardInstanceId(2));
        assert!(zones.take_from_hand(CardInstanceId(2)).is_none());
        assert_eq!(zones.total(), 2);
    }

    #[test]
    fn keywords_combine() {
        let keywords = CardKeywords::EXHAUST | CardKeywords::OVERCLOCK;
        assert!(keywords.contains(CardKeywords::OVERCLOCK));
        assert!(!keywords.contains(CardKeywords::RETURN));
    }
}
