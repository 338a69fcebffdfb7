use crate::model::Combatant;
use crate::regulation::{CRIT_DENOMINATOR, DAMAGE_ROLLS, STRUGGLE_POWER};

/// Gen 5+ damage formula without modifiers other than crit and the random roll.
///
/// `random` is the roll index in `0..=15` (85%..=100%). Every `/` floors and the
/// evaluation order is fixed; moving the crit or the roll changes results by 1.
pub fn calc_damage(
    level: u8,
    power: u32,
    attack: u16,
    defend: u16,
    critical: bool,
    random: u32,
) -> u32 {
    let level = level as u32;
    let attack = attack as u32;
    let defend = defend.max(1) as u32;
    let mut base = 2 * level / 5 + 2;
    base *= power;
    base *= attack;
    base /= defend;
    base /= 50;
    base += 2;
    base * (critical as u32 + 2) / 2 * (random + 85) / 100
}

pub fn struggle_damage(
    attacker: &Combatant,
    defender: &Combatant,
    critical: bool,
    random: u32,
) -> u32 {
    calc_damage(attacker.level, STRUGGLE_POWER, attacker.atk, defender.def, critical, random)
}

/// Every Struggle outcome of `attacker` into `defender` with its probability.
/// Equal damage values are merged.
pub fn struggle_distribution(attacker: &Combatant, defender: &Combatant) -> Vec<(u32, f64)> {
    let crit_p = 1.0 / CRIT_DENOMINATOR as f64;
    let roll_p = 1.0 / DAMAGE_ROLLS as f64;
    let mut out: Vec<(u32, f64)> = Vec::new();
    for (critical, p) in [(false, 1.0 - crit_p), (true, crit_p)] {
        for random in 0..DAMAGE_ROLLS {
            let damage = struggle_damage(attacker, defender, critical, random);
            let weight = p * roll_p;
            match out.iter_mut().find(|(d, _)| *d == damage) {
                Some((_, acc)) => *acc += weight,
                None => out.push((damage, weight)),
            }
        }
    }
    out
}

/// Non-critical damage spread between the lowest and highest roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageRange {
    pub min: u32,
    pub max: u32,
}

impl DamageRange {
    pub fn struggle(attacker: &Combatant, defender: &Combatant) -> Self {
        Self {
            min: struggle_damage(attacker, defender, false, 0),
            max: struggle_damage(attacker, defender, false, DAMAGE_ROLLS - 1),
        }
    }

    /// Percent of `hp`, rounded to one decimal.
    pub fn percent_of(&self, hp: u16) -> (f64, f64) {
        let pct = |d: u32| (d as f64 / hp.max(1) as f64 * 1000.0).round() / 10.0;
        (pct(self.min), pct(self.max))
    }

    /// `min-max(min%-max%)`, the layout of the damage table.
    pub fn describe(&self, hp: u16) -> String {
        let (lo, hi) = self.percent_of(hp);
        format!("{}-{}({lo:.1}-{hi:.1})", self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Strategy;

    #[test]
    fn pinned_reference_value() {
        assert_eq!(calc_damage(50, 50, 100, 100, false, 0), 20);
        assert_eq!(calc_damage(50, 50, 100, 100, false, 15), 24);
        assert_eq!(calc_damage(50, 50, 100, 100, true, 15), 36);
    }

    #[test]
    fn truncation_order_is_preserved() {
        // base = 22 * 50 * 178 / 90 / 50 + 2 = 45; 45 * 3 / 2 = 67; 67 * 85 / 100 = 56
        assert_eq!(calc_damage(50, 50, 178, 90, true, 0), 56);
        assert_eq!(calc_damage(50, 50, 178, 90, false, 0), 38);
    }

    #[test]
    fn minimum_damage_is_one() {
        assert_eq!(calc_damage(50, 50, 1, 500, false, 0), 1);
    }

    #[test]
    fn distribution_sums_to_one() {
        let mon = Combatant {
            level: 50,
            max_hp: 150,
            atk: 100,
            def: 100,
            spe: 100,
            strategy: Strategy::Leftovers,
        };
        let dist = struggle_distribution(&mon, &mon);
        let total: f64 = dist.iter().map(|(_, p)| p).sum();
        assert!((total - 1.0).abs() < 1e-12);
        assert!(dist.iter().all(|(d, _)| (20..=36).contains(d)));
    }

    #[test]
    fn describe_formats_percentages() {
        let range = DamageRange { min: 20, max: 24 };
        assert_eq!(range.describe(207), "20-24(9.7-11.6)");
    }
}
