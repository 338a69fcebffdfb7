pub mod battle;
pub mod damage;
pub mod error;
pub mod markov;
pub mod model;
pub mod monte_carlo;
pub mod optimizer;
pub mod regulation;
pub mod report;
pub mod species;
pub mod stats;
pub mod sweep;

use crate::model::{BreedingConfig, NatureTarget, SimulationResult, Strategy};
use crate::regulation::{AVAILABLE_POKEMONS, EV_MAX, IV_MAX, IV_MIN, POKE_LEVEL};
use crate::report::{write_damage_table, write_win_table, JsonLinesSink, WinTable};
use crate::species::SpeciesTable;
use crate::sweep::{compile_all, enumerate_breeding, run_sweep, SweepOptions, WorkerPool};
use anyhow::Context;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Win-rate table over every archetype pair.
    Sweep,
    /// Struggle damage ranges between one attacker and the roster.
    DamageTable,
    /// Print the optimized HP/Def split for a few budgets.
    Optimize,
}

#[derive(Debug, Clone)]
pub struct CliOptions {
    pub command: Command,
    pub species_path: Option<PathBuf>,
    pub trials: usize,
    pub seed: u64,
    pub workers: usize,
    pub output_path: PathBuf,
    pub stream: bool,
    pub attacker: String,
}

impl Default for CliOptions {
    fn default() -> Self {
        CliOptions {
            command: Command::Sweep,
            species_path: None,
            trials: 1000,
            seed: 151,
            workers: 0,
            output_path: PathBuf::from("win_table.json"),
            stream: false,
            attacker: "Slowbro (Galar)".to_string(),
        }
    }
}

pub fn load_species(path: Option<&Path>) -> anyhow::Result<SpeciesTable> {
    match path {
        Some(path) => SpeciesTable::from_json_path(path),
        None => Ok(SpeciesTable::builtin()),
    }
}

/// Slow physical wall: H4 A252 B252, minimum speed, +Atk -Spe.
fn damage_table_attacker(table: &SpeciesTable, name: &str) -> anyhow::Result<BreedingConfig> {
    Ok(BreedingConfig {
        no: table.get_by_name(name)?.no,
        level: POKE_LEVEL,
        ev_hp: 4,
        ev_atk: EV_MAX,
        ev_def: EV_MAX,
        ev_spe: 0,
        iv_hp: IV_MAX,
        iv_atk: IV_MAX,
        iv_def: IV_MAX,
        iv_spe: IV_MIN,
        nature_up: NatureTarget::Atk,
        nature_down: NatureTarget::Spe,
        strategy: Strategy::HealPulse,
    })
}

pub fn run(opts: CliOptions) -> anyhow::Result<()> {
    if opts.trials == 0 {
        anyhow::bail!("--trials must be > 0");
    }
    let table = load_species(opts.species_path.as_deref())?;
    match opts.command {
        Command::Sweep => {
            let breedings = enumerate_breeding(&table, AVAILABLE_POKEMONS)?;
            let combatants = compile_all(&table, &breedings)?;
            let options = SweepOptions {
                trials: opts.trials,
                seed: opts.seed,
                pool: WorkerPool::with_workers(opts.workers),
            };
            if opts.stream {
                let file = std::fs::File::create(&opts.output_path).with_context(|| {
                    format!("Failed to create {}", opts.output_path.display())
                })?;
                let mut sink = JsonLinesSink::new(std::io::BufWriter::new(file));
                run_sweep(&combatants, &options, &mut sink)?;
            } else {
                let mut results: Vec<SimulationResult> = Vec::new();
                run_sweep(&combatants, &options, &mut results)?;
                let win_table = WinTable {
                    breedings: &breedings,
                    results: &results,
                    n_matches: opts.trials,
                };
                write_win_table(&win_table, &opts.output_path)?;
            }
            println!(
                "Wrote {} archetypes x {} trials to {}",
                breedings.len(),
                opts.trials,
                opts.output_path.display()
            );
        }
        Command::DamageTable => {
            let mine = damage_table_attacker(&table, &opts.attacker)?;
            let rows = report::damage_table(&table, &mine, AVAILABLE_POKEMONS)?;
            write_damage_table(&rows, &opts.output_path)?;
            println!("Wrote {} rows to {}", rows.len(), opts.output_path.display());
        }
        Command::Optimize => {
            for name in AVAILABLE_POKEMONS {
                let poke = table.get_by_name(name)?;
                for budget in [4, 252, 508] {
                    let (hp, def) =
                        optimizer::optimize_hb(poke.base_hp, IV_MAX, poke.base_def, IV_MAX, budget);
                    println!("{name}\ttotal {budget}\tH{hp} B{def}");
                }
            }
        }
    }
    Ok(())
}
