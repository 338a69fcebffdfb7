use serde::{Deserialize, Serialize};

/// Base stats of one species. Only the four stats Struggle battles care about are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Species {
    pub no: u32,
    pub name: String,
    pub base_hp: u16,
    pub base_atk: u16,
    pub base_def: u16,
    pub base_spe: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NatureTarget {
    None,
    Atk,
    Def,
    Spe,
}

impl NatureTarget {
    pub const BOOSTABLE: [NatureTarget; 3] =
        [NatureTarget::Atk, NatureTarget::Def, NatureTarget::Spe];
}

/// Held item / move set variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Knows Heal Pulse and spends every PP healing the opponent before falling back to Struggle.
    HealPulse,
    /// Holds Leftovers: 1/16 max HP at the end of every turn it acted in.
    Leftovers,
}

impl Strategy {
    pub const ALL: [Strategy; 2] = [Strategy::HealPulse, Strategy::Leftovers];

    pub fn initial_heal_uses(self) -> u8 {
        match self {
            Strategy::HealPulse => crate::regulation::HEAL_PULSE_PP,
            Strategy::Leftovers => 0,
        }
    }

    /// HP restored to the holder at the end of a turn.
    // Rounds down; at level 50 max HP is always >= 16 so this never hits zero.
    pub fn end_of_turn_heal(self, max_hp: u16) -> u16 {
        match self {
            Strategy::HealPulse => 0,
            Strategy::Leftovers => max_hp / 16,
        }
    }
}

/// Everything about how one combatant is raised.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BreedingConfig {
    pub no: u32,
    pub level: u8,
    pub ev_hp: u16,
    pub ev_atk: u16,
    pub ev_def: u16,
    pub ev_spe: u16,
    pub iv_hp: u8,
    pub iv_atk: u8,
    pub iv_def: u8,
    pub iv_spe: u8,
    pub nature_up: NatureTarget,
    pub nature_down: NatureTarget,
    pub strategy: Strategy,
}

impl BreedingConfig {
    pub fn ev_total(&self) -> u32 {
        self.ev_hp as u32 + self.ev_atk as u32 + self.ev_def as u32 + self.ev_spe as u32
    }

    /// Nature multiplier for `target`, in tenths.
    pub fn nature_tenths(&self, target: NatureTarget) -> u32 {
        if self.nature_up == target {
            11
        } else if self.nature_down == target {
            9
        } else {
            10
        }
    }
}

/// Compiled, immutable battle stats. Per-battle HP and PP live in [`crate::battle::Battler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Combatant {
    pub level: u8,
    pub max_hp: u16,
    pub atk: u16,
    pub def: u16,
    pub spe: u16,
    pub strategy: Strategy,
}

/// Indices into the breeding list of a sweep; `first < second`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Matchup {
    pub first: usize,
    pub second: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub matchup: Matchup,
    /// Estimated probability that `matchup.first` wins.
    pub win_rate: f64,
    pub trials: usize,
}
