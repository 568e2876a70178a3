//! Narration feed and presentation signals.
//!
//! Both are part of the serialized state: the feed is append-only with
//! increasing ids, and animation triggers are consumed by the presentation
//! layer via [`CombatState::take_animation_triggers`](super::CombatState::take_animation_triggers).

/// Category of a narration entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LogKind {
    Info,
    Damage,
    Block,
    Heal,
    Status,
    Card,
    /// A card instance entered a zone from outside the initial deck.
    CardCreated,
    Enemy,
    Construct,
    Victory,
    Defeat,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogEntry {
    pub id: u64,
    pub turn: u32,
    pub kind: LogKind,
    pub message: String,
}

/// Append-only narration with a per-encounter id counter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatLog {
    next_id: u64,
    entries: Vec<LogEntry>,
}

impl CombatLog {
    pub fn push(&mut self, turn: u32, kind: LogKind, message: impl Into<String>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(LogEntry {
            id,
            turn,
            kind,
            message: message.into(),
        });
        id
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    pub fn count(&self, kind: LogKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AnimationKind {
    Hit,
    Block,
    Heal,
    Status,
    Death,
    Summon,
    Shake,
}

/// Signal for the presentation layer. `key` grows monotonically so repeated
/// signals of the same kind are distinguishable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnimationTrigger {
    pub kind: AnimationKind,
    pub key: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_ids_increase_monotonically() {
        let mut log = CombatLog::default();
        let a = log.push(1, LogKind::Info, "start");
        let b = log.push(1, LogKind::Damage, "hit");
        assert!(b > a);
        assert_eq!(log.len(), 2);
        assert_eq!(log.count(LogKind::Damage), 1);
    }
}
