use crate::damage::DamageRange;
use crate::error::ConfigError;
use crate::model::{BreedingConfig, NatureTarget, SimulationResult, Strategy};
use crate::optimizer::optimize_hb;
use crate::regulation::{EV_MAX, EV_TOTAL, IV_MAX, POKE_LEVEL};
use crate::species::SpeciesTable;
use crate::stats::compile;
use anyhow::Context;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Consumer of finished matchups. Results arrive in completion order.
pub trait ResultSink {
    fn accept(&mut self, result: SimulationResult) -> anyhow::Result<()>;

    fn finish(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

impl ResultSink for Vec<SimulationResult> {
    fn accept(&mut self, result: SimulationResult) -> anyhow::Result<()> {
        self.push(result);
        Ok(())
    }
}

/// Writes one JSON object per line as results come in.
pub struct JsonLinesSink<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ResultSink for JsonLinesSink<W> {
    fn accept(&mut self, result: SimulationResult) -> anyhow::Result<()> {
        serde_json::to_writer(&mut self.out, &result)?;
        self.out.write_all(b"\n")?;
        Ok(())
    }

    fn finish(&mut self) -> anyhow::Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

/// A finished sweep: the breedings (indexed by the matchups) and their results.
#[derive(Debug, Serialize)]
pub struct WinTable<'a> {
    pub breedings: &'a [BreedingConfig],
    pub results: &'a [SimulationResult],
    pub n_matches: usize,
}

pub fn write_win_table(table: &WinTable<'_>, path: &Path) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create win table at {}", path.display()))?;
    serde_json::to_writer(std::io::BufWriter::new(file), table)
        .with_context(|| format!("Failed to write win table to {}", path.display()))?;
    Ok(())
}

pub const ATTACK_COLUMNS: [&str; 4] = ["attack_0", "attack_256", "attack_504", "attack_504_up"];
pub const DEFEND_COLUMNS: [&str; 3] = ["defend_0", "defend_252", "defend_252_up"];

/// One opponent's line of the damage table: our Struggle into it under four
/// bulk spreads, and its Struggle into us under three attack spreads.
#[derive(Debug, Clone, PartialEq)]
pub struct DamageTableRow {
    pub enemy: String,
    pub attack: [String; 4],
    pub defend: [String; 3],
}

fn plain_breeding(
    no: u32,
    ev_hp: u16,
    ev_atk: u16,
    ev_def: u16,
    nature_up: NatureTarget,
    strategy: Strategy,
) -> BreedingConfig {
    BreedingConfig {
        no,
        level: POKE_LEVEL,
        ev_hp,
        ev_atk,
        ev_def,
        ev_spe: 0,
        iv_hp: IV_MAX,
        iv_atk: IV_MAX,
        iv_def: IV_MAX,
        iv_spe: IV_MAX,
        nature_up,
        nature_down: NatureTarget::None,
        strategy,
    }
}

pub fn damage_table(
    table: &SpeciesTable,
    mine: &BreedingConfig,
    enemies: &[&str],
) -> Result<Vec<DamageTableRow>, ConfigError> {
    let me = compile(table, mine)?;
    let mut rows = Vec::with_capacity(enemies.len());
    for name in enemies {
        let poke = table.get_by_name(name)?;
        let spreads = [
            (0, false),
            (EV_TOTAL - EV_MAX, false),
            (2 * EV_MAX, false),
            (2 * EV_MAX, true),
        ];
        let mut attack: [String; 4] = Default::default();
        for (cell, (budget, def_up)) in attack.iter_mut().zip(spreads) {
            let (ev_hp, ev_def) = optimize_hb(poke.base_hp, IV_MAX, poke.base_def, IV_MAX, budget);
            let up = if def_up { NatureTarget::Def } else { NatureTarget::None };
            let enemy = compile(table, &plain_breeding(poke.no, ev_hp, 0, ev_def, up, mine.strategy))?;
            *cell = DamageRange::struggle(&me, &enemy).describe(enemy.max_hp);
        }
        let mut defend: [String; 3] = Default::default();
        let spreads = [(0, false), (EV_MAX, false), (EV_MAX, true)];
        for (cell, (ev_atk, atk_up)) in defend.iter_mut().zip(spreads) {
            let up = if atk_up { NatureTarget::Atk } else { NatureTarget::None };
            let enemy = compile(table, &plain_breeding(poke.no, 0, ev_atk, 0, up, mine.strategy))?;
            *cell = DamageRange::struggle(&enemy, &me).describe(me.max_hp);
        }
        rows.push(DamageTableRow {
            enemy: name.to_string(),
            attack,
            defend,
        });
    }
    Ok(rows)
}

pub fn write_damage_table(rows: &[DamageTableRow], path: &Path) -> anyhow::Result<()> {
    let mut out = String::from("enemy");
    for col in ATTACK_COLUMNS.iter().chain(DEFEND_COLUMNS.iter()) {
        out.push(',');
        out.push_str(col);
    }
    for row in rows {
        out.push('\n');
        out.push_str(&row.enemy);
        for cell in row.attack.iter().chain(row.defend.iter()) {
            out.push(',');
            out.push_str(cell);
        }
    }
    std::fs::write(path, &out)
        .with_context(|| format!("Failed to write damage table to {}", path.display()))?;
    Ok(())
}
