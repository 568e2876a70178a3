use crate::state::CardId;

use super::CardEffect;

/// Card creation and zone manipulation.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CardManipulation {
    /// Overflow past the hand limit goes to discard.
    pub add_to_hand: Vec<CardId>,
    /// The deck is reshuffled after insertion.
    pub add_to_deck: Vec<CardId>,
    pub add_to_discard: Vec<CardId>,
    pub discard: Option<DiscardSpec>,
    /// Ask the player to put this many hand cards on top of the deck.
    pub return_to_deck: usize,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiscardSpec {
    pub count: usize,
    /// Discard at random instead of prompting the player.
    #[cfg_attr(feature = "serde", serde(default))]
    pub random: bool,
    /// Fired once per discarded card.
    #[cfg_attr(feature = "serde", serde(default))]
    pub on_discard: Option<Box<CardEffect>>,
}
