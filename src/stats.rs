use crate::error::ConfigError;
use crate::model::{BreedingConfig, Combatant, NatureTarget, Species};
use crate::regulation::{EV_MAX, EV_TOTAL, IV_MAX};
use crate::species::SpeciesTable;

pub fn calc_hp(base: u16, iv: u8, ev: u16, level: u8) -> u16 {
    let ev_quarter = (ev / 4) as u32;
    let base_value = base as u32 * 2 + iv as u32 + ev_quarter;
    let intermediate = (base_value * level as u32) / 100;
    (intermediate + level as u32 + 10) as u16
}

/// Non-HP stat. The nature is applied to the finished stat and floored once,
/// with the multiplier given in tenths (11 = 1.1, 9 = 0.9).
pub fn calc_stat(base: u16, iv: u8, ev: u16, level: u8, nature_tenths: u32) -> u16 {
    let ev_quarter = (ev / 4) as u32;
    let base_value = base as u32 * 2 + iv as u32 + ev_quarter;
    let intermediate = (base_value * level as u32) / 100;
    ((intermediate + 5) * nature_tenths / 10) as u16
}

/// Compiles a breeding config against its species. No range checks; see [`compile`].
pub fn compile_with_species(breeding: &BreedingConfig, species: &Species) -> Combatant {
    let level = breeding.level;
    Combatant {
        level,
        max_hp: calc_hp(species.base_hp, breeding.iv_hp, breeding.ev_hp, level),
        atk: calc_stat(
            species.base_atk,
            breeding.iv_atk,
            breeding.ev_atk,
            level,
            breeding.nature_tenths(NatureTarget::Atk),
        ),
        def: calc_stat(
            species.base_def,
            breeding.iv_def,
            breeding.ev_def,
            level,
            breeding.nature_tenths(NatureTarget::Def),
        ),
        spe: calc_stat(
            species.base_spe,
            breeding.iv_spe,
            breeding.ev_spe,
            level,
            breeding.nature_tenths(NatureTarget::Spe),
        ),
        strategy: breeding.strategy,
    }
}

/// Looks up the species, checks the config against the format caps and compiles it.
pub fn compile(
    table: &SpeciesTable,
    breeding: &BreedingConfig,
) -> Result<Combatant, ConfigError> {
    let species = table.get(breeding.no)?;
    validate(breeding)?;
    Ok(compile_with_species(breeding, species))
}

pub fn validate(breeding: &BreedingConfig) -> Result<(), ConfigError> {
    if !(1..=100).contains(&breeding.level) {
        return Err(ConfigError::LevelOutOfRange(breeding.level));
    }
    for (stat, value) in [
        ("HP", breeding.ev_hp),
        ("Atk", breeding.ev_atk),
        ("Def", breeding.ev_def),
        ("Spe", breeding.ev_spe),
    ] {
        if value > EV_MAX {
            return Err(ConfigError::EffortOverCap { stat, value, cap: EV_MAX });
        }
    }
    let total = breeding.ev_total();
    if total > EV_TOTAL as u32 {
        return Err(ConfigError::EffortTotalOverCap { total, cap: EV_TOTAL });
    }
    for (stat, value) in [
        ("HP", breeding.iv_hp),
        ("Atk", breeding.iv_atk),
        ("Def", breeding.iv_def),
        ("Spe", breeding.iv_spe),
    ] {
        if value > IV_MAX {
            return Err(ConfigError::IndividualOverCap { stat, value, cap: IV_MAX });
        }
    }
    if breeding.nature_up != NatureTarget::None && breeding.nature_up == breeding.nature_down {
        return Err(ConfigError::NatureConflict(breeding.nature_up));
    }
    Ok(())
}
