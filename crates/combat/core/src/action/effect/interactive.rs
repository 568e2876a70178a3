use crate::state::{CardId, CardKeywords, CardType, Rarity};

use super::CardEffect;

/// Clauses that pause resolution and wait for a player selection.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum InteractiveSpec {
    /// Pick one of a fixed list of cards to create in hand.
    Generate {
        options: Vec<CardId>,
        #[cfg_attr(feature = "serde", serde(default))]
        cost_delta: i32,
        #[cfg_attr(feature = "serde", serde(default))]
        temporary: bool,
    },
    /// Sample `count` options from a filtered pool and pick one.
    Discover {
        count: usize,
        source: DiscoverSource,
        #[cfg_attr(feature = "serde", serde(default))]
        cost_delta: i32,
        #[cfg_attr(feature = "serde", serde(default))]
        temporary: bool,
    },
    /// Pick one of several sub-effects to resolve.
    EffectChoice { options: Vec<CardEffect> },
    /// Pick a card from discard matching the filter.
    Trace {
        #[cfg_attr(feature = "serde", serde(default))]
        card_type: Option<CardType>,
        mode: TraceMode,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DiscoverSource {
    /// Templates of the cards in deck and discard.
    OwnedCards,
    /// The global card table, filtered.
    Pool {
        #[cfg_attr(feature = "serde", serde(default))]
        rarity: Option<Rarity>,
        #[cfg_attr(feature = "serde", serde(default))]
        card_type: Option<CardType>,
        #[cfg_attr(feature = "serde", serde(default))]
        keyword: Option<CardKeywords>,
    },
}

/// What happens to the traced card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TraceMode {
    /// Resolve a temporary zero-cost copy immediately.
    PlayCopy,
    /// Move the card into hand with its cost shifted by `cost_delta`.
    ReturnToHand { cost_delta: i32 },
}
