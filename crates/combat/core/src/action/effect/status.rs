use crate::state::{CardId, StatusId};

/// Removes stacks of a status and converts them into other resources.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConsumeStatusSpec {
    pub status: StatusId,
    /// Stacks to remove; `None` removes all of them.
    #[cfg_attr(feature = "serde", serde(default))]
    pub stacks: Option<i32>,
    /// Consume from the source instead of the target.
    #[cfg_attr(feature = "serde", serde(default))]
    pub from_self: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub damage_per_stack: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub heal_per_stack: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub block_per_stack: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub cp_per_stack: i32,
    /// Copy the stacks left on the target onto every other alive enemy.
    #[cfg_attr(feature = "serde", serde(default))]
    pub spread_remaining: bool,
    /// Multiply the stacks left on the target (values below 2 are ignored).
    #[cfg_attr(feature = "serde", serde(default))]
    pub multiply_remaining: i32,
}

impl ConsumeStatusSpec {
    pub fn new(status: StatusId) -> Self {
        Self {
            status,
            stacks: None,
            from_self: false,
            damage_per_stack: 0,
            heal_per_stack: 0,
            block_per_stack: 0,
            cp_per_stack: 0,
            spread_remaining: false,
            multiply_remaining: 0,
        }
    }
}

/// Applies a status to the targets, or to the source with `on_self`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusApplication {
    pub status: StatusId,
    #[cfg_attr(feature = "serde", serde(default = "one"))]
    pub value: i32,
    /// Ignored by stacking ids.
    #[cfg_attr(feature = "serde", serde(default = "one"))]
    pub duration: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub on_self: bool,
    /// Cards a `conjure` status hands out when it ticks.
    #[cfg_attr(feature = "serde", serde(default))]
    pub pending_cards: Vec<CardId>,
}

#[cfg(feature = "serde")]
fn one() -> i32 {
    1
}

impl StatusApplication {
    pub fn new(status: StatusId, value: i32, duration: i32) -> Self {
        Self {
            status,
            value,
            duration,
            on_self: false,
            pending_cards: Vec::new(),
        }
    }

    pub fn on_self(mut self) -> Self {
        self.on_self = true;
        self
    }

    pub fn with_pending_cards(mut self, cards: Vec<CardId>) -> Self {
        self.pending_cards = cards;
        self
    }
}
