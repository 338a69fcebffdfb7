//! Format rules for level-50 Struggle singles.

pub const POKE_LEVEL: u8 = 50;

pub const IV_MIN: u8 = 0;
pub const IV_MAX: u8 = 31;

pub const EV_MIN: u16 = 0;
pub const EV_MAX: u16 = 252;
pub const EV_TOTAL: u16 = 508;

/// Smallest EV step that can move a stat at all.
pub const EV_GRANULARITY: u16 = 4;

/// Heal Pulse has 10 PP, 16 with three PP Ups.
pub const HEAL_PULSE_PP: u8 = 16;

pub const STRUGGLE_POWER: u32 = 50;

/// Critical hits land on `gen_range(0..CRIT_DENOMINATOR) == 0`.
pub const CRIT_DENOMINATOR: u32 = 24;

/// Damage rolls are `0..DAMAGE_ROLLS`, i.e. 85%..=100%.
pub const DAMAGE_ROLLS: u32 = 16;

pub const MAX_TURNS: usize = 1000;

/// Species taken into the default sweep, by display name.
pub const AVAILABLE_POKEMONS: &[&str] = &[
    "Clefable",
    "Wigglytuff",
    "Slowbro",
    "Slowbro (Galar)",
    "Meganium",
    "Slowking",
    "Slowking (Galar)",
    "Smeargle",
    "Blissey",
    "Gardevoir",
    "Chimecho",
    "Latias",
    "Latios",
    "Lucario",
    "Gallade",
    "Gothitelle",
    "Clawitzer",
    "Hatterene",
    "Indeedee (F)",
];
