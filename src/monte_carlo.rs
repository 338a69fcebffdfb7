use crate::battle::{Battle, BattleResult, Side};
use crate::model::{Combatant, Matchup, SimulationResult};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Plays `trials` independent battles and returns the share won by `first`.
/// A battle that hits the turn ceiling counts as half a win.
pub fn monte_carlo<R: Rng + ?Sized>(
    first: &Combatant,
    second: &Combatant,
    rng: &mut R,
    trials: usize,
) -> f64 {
    if trials == 0 {
        return 0.0;
    }
    let mut battle = Battle::new(first, second);
    let mut first_wins = 0u64;
    let mut ties = 0u64;
    for _ in 0..trials {
        battle.reset();
        match battle.run(rng) {
            BattleResult::Winner(Side::First) => first_wins += 1,
            BattleResult::Winner(Side::Second) => {}
            BattleResult::TurnLimit => ties += 1,
        }
    }
    (first_wins as f64 + 0.5 * ties as f64) / trials as f64
}

/// Per-matchup seed, so a cell's result does not depend on which worker ran it.
pub fn matchup_seed(seed: u64, matchup: Matchup) -> u64 {
    seed ^ ((matchup.first as u64) << 32) ^ (matchup.second as u64)
}

pub fn run_matchup(
    combatants: &[Combatant],
    matchup: Matchup,
    trials: usize,
    seed: u64,
) -> SimulationResult {
    let mut rng = SmallRng::seed_from_u64(matchup_seed(seed, matchup));
    let win_rate = monte_carlo(
        &combatants[matchup.first],
        &combatants[matchup.second],
        &mut rng,
        trials,
    );
    tracing::debug!(first = matchup.first, second = matchup.second, win_rate, "matchup done");
    SimulationResult {
        matchup,
        win_rate,
        trials,
    }
}
