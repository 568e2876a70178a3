/// Resource and utility clause.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ResourceSpec {
    pub draw: u32,
    /// Capped at `CombatConfig::max_charge`.
    pub gain_charge: u32,
    /// Capped at the player's max CP.
    pub gain_cp: i32,
    pub gain_entropy: u32,
    pub heal: i32,
    /// Mirror the next enemy attack against the player.
    pub counter_stance: bool,
}
