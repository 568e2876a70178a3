use crate::state::StatusId;

pub trait StatusOracle: Send + Sync {
    fn status(&self, id: StatusId) -> Option<StatusTemplate>;
}

/// Display data for a status id. Behaviour is fixed by the id itself.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusTemplate {
    pub id: StatusId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
}
