//! Enumerates the canonical breeding archetypes and evaluates every unordered
//! pair of them on a worker pool.

use crate::error::ConfigError;
use crate::model::{BreedingConfig, Combatant, Matchup, NatureTarget, SimulationResult, Strategy};
use crate::monte_carlo::run_matchup;
use crate::optimizer::optimize_hb;
use crate::regulation::{EV_MAX, EV_MIN, EV_TOTAL, IV_MAX, IV_MIN, POKE_LEVEL};
use crate::report::ResultSink;
use crate::species::SpeciesTable;
use crate::stats::compile;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::sync::mpsc;

/// Rayon pool size for a sweep. `workers == 0` uses the global pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkerPool {
    pub workers: usize,
}

impl WorkerPool {
    pub fn with_workers(workers: usize) -> Self {
        Self { workers }
    }

    pub fn install<F, R>(&self, f: F) -> anyhow::Result<R>
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        if self.workers == 0 {
            Ok(f())
        } else {
            let pool = ThreadPoolBuilder::new().num_threads(self.workers).build()?;
            Ok(pool.install(f))
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SweepOptions {
    pub trials: usize,
    pub seed: u64,
    pub pool: WorkerPool,
}

#[derive(Clone, Copy)]
struct Evs {
    hp: u16,
    atk: u16,
    def: u16,
    spe: u16,
}

fn breeding(
    no: u32,
    evs: Evs,
    iv_spe: u8,
    nature_up: NatureTarget,
    nature_down: NatureTarget,
    strategy: Strategy,
) -> BreedingConfig {
    BreedingConfig {
        no,
        level: POKE_LEVEL,
        ev_hp: evs.hp,
        ev_atk: evs.atk,
        ev_def: evs.def,
        ev_spe: evs.spe,
        iv_hp: IV_MAX,
        iv_atk: IV_MAX,
        iv_def: IV_MAX,
        iv_spe,
        nature_up,
        nature_down,
        strategy,
    }
}

/// All archetypes of every named species, 19 per species and strategy.
pub fn enumerate_breeding(
    table: &SpeciesTable,
    names: &[&str],
) -> Result<Vec<BreedingConfig>, ConfigError> {
    let mut out = Vec::new();
    for name in names {
        let poke = table.get_by_name(name)?;
        let hb = |budget: u16| optimize_hb(poke.base_hp, IV_MAX, poke.base_def, IV_MAX, budget);
        for strategy in Strategy::ALL {
            // Offense maxed in A and/or S, bulk from what is left.
            for (atk, spe) in [(EV_MAX, EV_MAX), (EV_MAX, EV_MIN), (EV_MIN, EV_MAX)] {
                let (hp, def) = hb(EV_TOTAL - atk - spe);
                for up in NatureTarget::BOOSTABLE {
                    out.push(breeding(
                        poke.no,
                        Evs { hp, atk, def, spe },
                        IV_MAX,
                        up,
                        NatureTarget::None,
                        strategy,
                    ));
                }
            }
            // Bulk maxed, the leftover 4 into A or S.
            let remain = EV_TOTAL - EV_MAX - EV_MAX;
            for (atk, spe) in [(remain, 0), (0, remain)] {
                for up in NatureTarget::BOOSTABLE {
                    out.push(breeding(
                        poke.no,
                        Evs { hp: EV_MAX, atk, def: EV_MAX, spe },
                        IV_MAX,
                        up,
                        NatureTarget::None,
                        strategy,
                    ));
                }
            }
            // Minimum speed: A252 with optimized bulk, then maxed bulk with the rest in A.
            let (hp, def) = hb(EV_TOTAL - EV_MAX);
            let slow_sets = [
                Evs { hp, atk: EV_MAX, def, spe: 0 },
                Evs { hp: EV_MAX, atk: EV_TOTAL - 2 * EV_MAX, def: EV_MAX, spe: 0 },
            ];
            for evs in slow_sets {
                for up in [NatureTarget::Atk, NatureTarget::Def] {
                    out.push(breeding(
                        poke.no,
                        evs,
                        IV_MIN,
                        up,
                        NatureTarget::Spe,
                        strategy,
                    ));
                }
            }
        }
    }
    Ok(out)
}

pub fn compile_all(
    table: &SpeciesTable,
    breedings: &[BreedingConfig],
) -> Result<Vec<Combatant>, ConfigError> {
    breedings.iter().map(|b| compile(table, b)).collect()
}

/// Every unordered pair `first < second`.
pub fn all_matchups(len: usize) -> Vec<Matchup> {
    let mut out = Vec::with_capacity(len * len.saturating_sub(1) / 2);
    for first in 0..len {
        for second in (first + 1)..len {
            out.push(Matchup { first, second });
        }
    }
    out
}

/// Runs every matchup in parallel and hands results to `sink` as they finish,
/// in completion order. Returns the number of results delivered.
///
/// A sink error stops the workers: the result channel is bounded, so at most a
/// couple of results per worker are computed after the failure.
pub fn run_sweep(
    combatants: &[Combatant],
    options: &SweepOptions,
    sink: &mut dyn ResultSink,
) -> anyhow::Result<usize> {
    let SweepOptions { trials, seed, pool } = *options;
    let matchups = all_matchups(combatants.len());
    tracing::info!(
        combatants = combatants.len(),
        matchups = matchups.len(),
        trials,
        workers = pool.workers,
        "starting sweep"
    );
    let delivered = drive(
        matchups,
        |matchup| run_matchup(combatants, matchup, trials, seed),
        pool,
        sink,
    )?;
    tracing::info!(delivered, "sweep finished");
    Ok(delivered)
}

fn drive<F>(
    matchups: Vec<Matchup>,
    run: F,
    pool: WorkerPool,
    sink: &mut dyn ResultSink,
) -> anyhow::Result<usize>
where
    F: Fn(Matchup) -> SimulationResult + Sync,
{
    let total = matchups.len();
    let threads = match pool.workers {
        0 => rayon::current_num_threads(),
        n => n,
    };
    let (tx, rx) = mpsc::sync_channel(2 * threads);
    let run = &run;
    let delivered = std::thread::scope(|scope| -> anyhow::Result<usize> {
        let workers = scope.spawn(move || {
            pool.install(|| {
                // Fails once the receiver is gone, which cancels the remaining matchups.
                matchups
                    .par_iter()
                    .try_for_each_with(tx, |tx, &matchup| tx.send(run(matchup)))
            })
        });

        let report_every = (total / 10).max(1);
        let mut done = 0usize;
        for result in rx {
            sink.accept(result)?;
            done += 1;
            if done % report_every == 0 {
                tracing::info!(done, total, "sweep progress");
            }
        }
        workers
            .join()
            .map_err(|_| anyhow::anyhow!("sweep worker panicked"))??
            .map_err(|_| anyhow::anyhow!("result channel closed before the sweep finished"))?;
        Ok(done)
    })?;

    sink.finish()?;
    Ok(delivered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regulation::AVAILABLE_POKEMONS;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn nineteen_archetypes_per_strategy() {
        let table = SpeciesTable::builtin();
        let breedings = enumerate_breeding(&table, &["Lucario"]).unwrap();
        assert_eq!(breedings.len(), 38);
        assert!(breedings.iter().all(|b| b.ev_total() <= EV_TOTAL as u32));
        assert!(compile_all(&table, &breedings).is_ok());
    }

    #[test]
    fn slow_archetypes_drop_speed() {
        let table = SpeciesTable::builtin();
        let breedings = enumerate_breeding(&table, &["Slowbro"]).unwrap();
        let slow: Vec<_> = breedings
            .iter()
            .filter(|b| b.nature_down == NatureTarget::Spe)
            .collect();
        assert_eq!(slow.len(), 8);
        assert!(slow.iter().all(|b| b.iv_spe == IV_MIN && b.ev_spe == 0));
    }

    #[test]
    fn unknown_species_fails_enumeration() {
        let table = SpeciesTable::builtin();
        assert!(matches!(
            enumerate_breeding(&table, &["Mew"]),
            Err(ConfigError::UnknownSpeciesName(_))
        ));
    }

    #[test]
    fn default_roster_compiles() {
        let table = SpeciesTable::builtin();
        let breedings = enumerate_breeding(&table, AVAILABLE_POKEMONS).unwrap();
        assert_eq!(breedings.len(), AVAILABLE_POKEMONS.len() * 38);
        assert!(compile_all(&table, &breedings).is_ok());
    }

    #[test]
    fn matchups_are_unordered_pairs() {
        let m = all_matchups(4);
        assert_eq!(m.len(), 6);
        assert!(m.iter().all(|m| m.first < m.second));
        assert!(all_matchups(1).is_empty());
        assert!(all_matchups(0).is_empty());
    }

    struct FailAt {
        seen: usize,
        fail_at: usize,
    }

    impl ResultSink for FailAt {
        fn accept(&mut self, _result: SimulationResult) -> anyhow::Result<()> {
            self.seen += 1;
            if self.seen == self.fail_at {
                anyhow::bail!("disk full");
            }
            Ok(())
        }
    }

    fn counted_run(count: &AtomicUsize, matchup: Matchup) -> SimulationResult {
        count.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(std::time::Duration::from_millis(1));
        SimulationResult {
            matchup,
            win_rate: 0.5,
            trials: 1,
        }
    }

    #[test]
    fn sink_failure_cancels_remaining_matchups() {
        let workers = 2;
        let count = AtomicUsize::new(0);
        let mut sink = FailAt { seen: 0, fail_at: 1 };
        let err = drive(
            all_matchups(40),
            |m| counted_run(&count, m),
            WorkerPool::with_workers(workers),
            &mut sink,
        )
        .unwrap_err();
        assert!(err.to_string().contains("disk full"));
        assert_eq!(sink.seen, 1);
        // Channel capacity plus one in-flight matchup per worker, with slack
        // for tasks that started before the cancel was observed.
        let computed = count.load(Ordering::SeqCst);
        assert!(computed <= 8 * workers, "computed {computed} of 780 matchups");
    }

    #[test]
    fn drive_delivers_everything_when_the_sink_accepts() {
        let count = AtomicUsize::new(0);
        let mut results: Vec<SimulationResult> = Vec::new();
        let delivered = drive(
            all_matchups(12),
            |m| counted_run(&count, m),
            WorkerPool::with_workers(3),
            &mut results,
        )
        .unwrap();
        assert_eq!(delivered, 66);
        assert_eq!(results.len(), 66);
        assert_eq!(count.load(Ordering::SeqCst), 66);
    }
}
