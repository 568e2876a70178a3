use crate::action::CardEffect;
use crate::state::{CardId, CardKeywords, CardType, Rarity};

pub trait CardOracle: Send + Sync {
    fn card(&self, id: &CardId) -> Option<CardDefinition>;

    /// All card ids, in a stable order.
    fn card_ids(&self) -> Vec<CardId>;
}

/// Immutable card template.
///
/// Player cards and enemy action cards share this shape; enemies ignore the
/// cost fields.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CardDefinition {
    pub id: CardId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub cost: i32,
    pub card_type: CardType,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rarity: Rarity,
    #[cfg_attr(feature = "serde", serde(default))]
    pub keywords: CardKeywords,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effect: CardEffect,
    /// Charge spent on play (the play is refused without it).
    #[cfg_attr(feature = "serde", serde(default))]
    pub charge_cost: u32,
    /// Entropy spent on play.
    #[cfg_attr(feature = "serde", serde(default))]
    pub entropy_cost: u32,
    /// Bleed percent the player suffers before the card resolves.
    #[cfg_attr(feature = "serde", serde(default))]
    pub self_bleed: i32,
    /// Fired when the card is discarded from hand.
    #[cfg_attr(feature = "serde", serde(default))]
    pub on_discard: Option<CardEffect>,
}

impl CardDefinition {
    pub fn new(id: impl Into<String>, cost: i32, card_type: CardType, effect: CardEffect) -> Self {
        let id = CardId::new(id);
        Self {
            name: id.to_string(),
            id,
            cost,
            card_type,
            rarity: Rarity::Common,
            keywords: CardKeywords::empty(),
            effect,
            charge_cost: 0,
            entropy_cost: 0,
            self_bleed: 0,
            on_discard: None,
        }
    }

    pub fn with_keywords(mut self, keywords: CardKeywords) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    pub fn with_on_discard(mut self, effect: CardEffect) -> Self {
        self.on_discard = Some(effect);
        self
    }

    pub fn has(&self, keyword: CardKeywords) -> bool {
        self.keywords.contains(keyword)
    }
}
