use rand::rngs::SmallRng;
use rand::SeedableRng;
use struggle_win_table::markov::exact_win_probability;
use struggle_win_table::model::{BreedingConfig, Combatant, NatureTarget, SimulationResult, Strategy};
use struggle_win_table::monte_carlo::{monte_carlo, run_matchup};
use struggle_win_table::report::ResultSink;
use struggle_win_table::species::SpeciesTable;
use struggle_win_table::stats::compile;
use struggle_win_table::sweep::{
    all_matchups, compile_all, enumerate_breeding, run_sweep, SweepOptions, WorkerPool,
};

fn make_mon(max_hp: u16, atk: u16, def: u16, spe: u16, strategy: Strategy) -> Combatant {
    Combatant {
        level: 50,
        max_hp,
        atk,
        def,
        spe,
        strategy,
    }
}

#[test]
fn single_trial_is_all_or_nothing() {
    let a = make_mon(150, 110, 90, 100, Strategy::Leftovers);
    let b = make_mon(170, 90, 110, 100, Strategy::HealPulse);
    for seed in 0..20 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let rate = monte_carlo(&a, &b, &mut rng, 1);
        assert!(rate == 0.0 || rate == 1.0, "got {rate}");
    }
}

#[test]
fn converges_to_exact_enumeration() {
    // Few reachable states: two hits from either side end it.
    let a = make_mon(40, 60, 60, 70, Strategy::Leftovers);
    let b = make_mon(48, 55, 50, 80, Strategy::Leftovers);
    let exact = exact_win_probability(&a, &b);
    let mut rng = SmallRng::seed_from_u64(151);
    let estimate = monte_carlo(&a, &b, &mut rng, 20_000);
    assert!(
        (estimate - exact).abs() < 0.02,
        "monte carlo {estimate} vs exact {exact}"
    );
}

#[test]
fn converges_with_heal_pulse_on_both_sides() {
    let a = make_mon(60, 70, 60, 50, Strategy::HealPulse);
    let b = make_mon(64, 65, 55, 50, Strategy::HealPulse);
    let exact = exact_win_probability(&a, &b);
    let mut rng = SmallRng::seed_from_u64(7);
    let estimate = monte_carlo(&a, &b, &mut rng, 20_000);
    assert!(
        (estimate - exact).abs() < 0.02,
        "monte carlo {estimate} vs exact {exact}"
    );
}

#[test]
fn mirror_match_is_near_half() {
    let table = SpeciesTable::builtin();
    let breeding = BreedingConfig {
        no: table.get_by_name("Lucario").unwrap().no,
        level: 50,
        ev_hp: 4,
        ev_atk: 252,
        ev_def: 0,
        ev_spe: 252,
        iv_hp: 31,
        iv_atk: 31,
        iv_def: 31,
        iv_spe: 31,
        nature_up: NatureTarget::Atk,
        nature_down: NatureTarget::None,
        strategy: Strategy::Leftovers,
    };
    let mon = compile(&table, &breeding).unwrap();
    let mut rng = SmallRng::seed_from_u64(151);
    let rate = monte_carlo(&mon, &mon, &mut rng, 20_000);
    assert!((rate - 0.5).abs() < 0.02, "expected near 0.5, got {rate}");
}

fn small_roster() -> Vec<Combatant> {
    let table = SpeciesTable::builtin();
    let breedings = enumerate_breeding(&table, &["Gallade", "Blissey"]).unwrap();
    let combatants = compile_all(&table, &breedings).unwrap();
    combatants.into_iter().step_by(9).collect()
}

fn sorted(mut results: Vec<SimulationResult>) -> Vec<SimulationResult> {
    results.sort_by_key(|r| (r.matchup.first, r.matchup.second));
    results
}

#[test]
fn sweep_covers_every_pair_once() {
    let roster = small_roster();
    let options = SweepOptions {
        trials: 20,
        seed: 151,
        pool: WorkerPool::with_workers(2),
    };
    let mut results: Vec<SimulationResult> = Vec::new();
    let delivered = run_sweep(&roster, &options, &mut results).unwrap();
    let expected = all_matchups(roster.len());
    assert_eq!(delivered, expected.len());
    let results = sorted(results);
    let got: Vec<_> = results.iter().map(|r| r.matchup).collect();
    assert_eq!(got, expected);
    assert!(results.iter().all(|r| r.trials == 20 && (0.0..=1.0).contains(&r.win_rate)));
}

#[test]
fn sweep_result_does_not_depend_on_worker_count() {
    let roster = small_roster();
    let run = |workers| {
        let options = SweepOptions {
            trials: 20,
            seed: 99,
            pool: WorkerPool::with_workers(workers),
        };
        let mut results: Vec<SimulationResult> = Vec::new();
        run_sweep(&roster, &options, &mut results).unwrap();
        sorted(results)
    };
    let single = run(1);
    assert_eq!(single, run(3));
    for result in &single {
        assert_eq!(*result, run_matchup(&roster, result.matchup, 20, 99));
    }
}

struct FailingSink {
    seen: usize,
}

impl ResultSink for FailingSink {
    fn accept(&mut self, _result: SimulationResult) -> anyhow::Result<()> {
        self.seen += 1;
        if self.seen == 3 {
            anyhow::bail!("disk full");
        }
        Ok(())
    }
}

#[test]
fn sink_errors_stop_the_sweep() {
    let roster = small_roster();
    let options = SweepOptions {
        trials: 5,
        seed: 1,
        pool: WorkerPool::default(),
    };
    let mut sink = FailingSink { seen: 0 };
    let err = run_sweep(&roster, &options, &mut sink).unwrap_err();
    assert!(err.to_string().contains("disk full"));
    assert_eq!(sink.seen, 3);
}
