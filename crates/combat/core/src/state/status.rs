//! Status effects carried by combatants.
//!
//! A status is identified by a fixed [`StatusId`]; the id alone decides whether
//! re-applying it stacks `value` or refreshes `duration`, whether it decays,
//! and whether it is a buff or a debuff.

use crate::state::CardId;

/// Duration at or above which a buff is permanent until consumed.
pub const PERMANENT_DURATION: i32 = 999;

/// Known status effect identifiers.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StatusId {
    // ========================================================================
    // Damage over time (stacking, never decays by duration)
    // ========================================================================
    /// Percent of max HP per tick, one stack lost per tick.
    Bleed,
    /// Flat share of max HP per tick, one stack lost per tick.
    Poison,
    /// Scales with the applier's attack; stacks halve each tick.
    Burn,
    /// Attacks on the holder splash to other enemies, one stack per hit.
    Chaining,

    // ========================================================================
    // Debuffs
    // ========================================================================
    /// Takes extra flat damage from attacks.
    Vulnerable,
    /// Deals reduced attack damage.
    Weak,
    /// Next attack costs `value` more, consumed on play.
    Jammed,
    /// Detonates for self-damage once enough stacks accumulate.
    Overheat,

    // ========================================================================
    // Buffs
    // ========================================================================
    /// Next attack deals `value` percent more damage, then the buff is removed.
    Empower,
    /// Next enemy attack against the player is mirrored back.
    Counter,
    /// Grants `value` charge at the start of each turn.
    Capacitor,
    /// Draws `value` extra cards at the start of each turn.
    Foresight,
    /// Delivers the cards held in `data` to hand at the start of next turn.
    Conjure,
}

/// Whether a status helps or hinders its holder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StatusKind {
    Buff,
    Debuff,
}

impl StatusId {
    /// Stacking ids accumulate `value`; the others refresh `duration`.
    pub const fn is_stacking(self) -> bool {
        matches!(
            self,
            Self::Bleed
                | Self::Poison
                | Self::Burn
                | Self::Chaining
                | Self::Jammed
                | Self::Overheat
                | Self::Empower
                | Self::Capacitor
        )
    }

    pub const fn kind(self) -> StatusKind {
        match self {
            Self::Empower | Self::Counter | Self::Capacitor | Self::Foresight | Self::Conjure => {
                StatusKind::Buff
            }
            _ => StatusKind::Debuff,
        }
    }
}

/// Extra payload for statuses that must remember state between turns.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StatusData {
    /// Cards to create in hand when the status fires.
    PendingCards(Vec<CardId>),
}

/// A single status effect instance on a combatant.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub id: StatusId,
    pub name: String,
    pub kind: StatusKind,
    pub duration: i32,
    pub value: i32,
    /// Attack of the applier at application time.
    pub source_attack: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub data: Option<StatusData>,
}

impl StatusEffect {
    pub fn new(id: StatusId, value: i32, duration: i32) -> Self {
        Self {
            id,
            name: id.to_string(),
            kind: id.kind(),
            duration,
            value,
            source_attack: 0,
            data: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_source_attack(mut self, source_attack: i32) -> Self {
        self.source_attack = source_attack;
        self
    }

    pub fn with_data(mut self, data: StatusData) -> Self {
        self.data = Some(data);
        self
    }

    pub fn is_permanent(&self) -> bool {
        self.kind == StatusKind::Buff && self.duration >= PERMANENT_DURATION
    }

    /// Stack count: `value` for stacking ids, remaining `duration` otherwise.
    pub fn stacks(&self) -> i32 {
        if self.id.is_stacking() {
            self.value
        } else {
            self.duration
        }
    }

    /// True once the effect should be dropped from its holder.
    pub fn is_spent(&self) -> bool {
        if self.id.is_stacking() {
            self.value <= 0
        } else {
            !self.is_permanent() && self.duration <= 0
        }
    }
}

/// Ordered list of status effects on a combatant (insertion order).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct StatusEffects {
    effects: Vec<StatusEffect>,
}

impl StatusEffects {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, id: StatusId) -> Option<&StatusEffect> {
        self.effects.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: StatusId) -> Option<&mut StatusEffect> {
        self.effects.iter_mut().find(|e| e.id == id)
    }

    pub fn has(&self, id: StatusId) -> bool {
        self.get(id).is_some()
    }

    pub fn stacks(&self, id: StatusId) -> i32 {
        self.get(id).map(StatusEffect::stacks).unwrap_or(0)
    }

    pub fn has_debuff(&self) -> bool {
        self.effects.iter().any(|e| e.kind == StatusKind::Debuff)
    }

    /// Adds an effect honouring the stacking rule of its id.
    ///
    /// Stacking ids add `value` (the newest attack snapshot wins); other ids
    /// keep the longer `duration`.
    pub fn apply(&mut self, effect: StatusEffect) {
        if let Some(existing) = self.get_mut(effect.id) {
            if effect.id.is_stacking() {
                existing.value += effect.value;
                existing.source_attack = existing.source_attack.max(effect.source_attack);
            } else {
                existing.duration = existing.duration.max(effect.duration);
                existing.value = existing.value.max(effect.value);
            }
            if effect.data.is_some() {
                existing.data = effect.data;
            }
            return;
        }
        self.effects.push(effect);
    }

    /// Removes up to `count` stacks and returns how many were removed.
    pub fn consume(&mut self, id: StatusId, count: i32) -> i32 {
        let Some(effect) = self.get_mut(id) else {
            return 0;
        };
        let removed = count.min(effect.stacks()).max(0);
        if id.is_stacking() {
            effect.value -= removed;
        } else {
            effect.duration -= removed;
        }
        self.remove_spent();
        removed
    }

    pub fn remove(&mut self, id: StatusId) -> Option<StatusEffect> {
        let index = self.effects.iter().position(|e| e.id == id)?;
        Some(self.effects.remove(index))
    }

    pub fn remove_spent(&mut self) {
        self.effects.retain(|e| !e.is_spent());
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [StatusEffect] {
        &mut self.effects
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
