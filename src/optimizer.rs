//! HP/Def EV split that maximizes physical bulk at level 50.
//!
//! At level 50 a stat is `(2*base + iv + ev/4) / 2 + c`, so with `x = ev/8`
//! HP is roughly `A + x + 60` and Def `B + y + 5`, where `A = base_hp + iv_hp/2`
//! and `B = base_def + iv_def/2`. Bulk is their product. The continuous problem
//! is solved exactly, then the HP allocation is snapped onto the `8n + 4` lattice
//! and whatever is left of the budget goes to Def.

use crate::regulation::{EV_GRANULARITY, EV_MAX};

/// `EV_MAX / 8`: the largest useful `x` for one stat.
const X_CAP: f64 = EV_MAX as f64 / 8.0;

const HP_OFFSET: f64 = 60.0;
const DEF_OFFSET: f64 = 5.0;

fn bulk(a: f64, b: f64, x: f64, y: f64) -> f64 {
    (a + x + HP_OFFSET) * (b + y + DEF_OFFSET)
}

/// Continuous optimum `(x, y)` on `x + y = min(budget/8, 2*cap)`, `0 <= x, y <= cap`.
pub fn continuous_optimum(
    base_hp: u16,
    iv_hp: u8,
    base_def: u16,
    iv_def: u8,
    budget: u16,
) -> (f64, f64) {
    let a = base_hp as f64 + iv_hp as f64 / 2.0;
    let b = base_def as f64 + iv_def as f64 / 2.0;
    let total = (budget as f64 / 8.0).min(2.0 * X_CAP);

    // Feasible x on the active boundary.
    let lo = (total - X_CAP).max(0.0);
    let hi = total.min(X_CAP);

    // Stationary point of (a + x + 60)(b + total - x + 5).
    let stationary = (b + DEF_OFFSET + total - a - HP_OFFSET) / 2.0;

    // Ties keep the earlier candidate, and larger x comes first so HP wins ties.
    let candidates = [stationary, X_CAP, total - X_CAP, 0.0];
    let mut best = (hi, total - hi);
    let mut best_bulk = f64::NEG_INFINITY;
    for x in candidates {
        let x = x.clamp(lo, hi);
        let y = total - x;
        let value = bulk(a, b, x, y);
        if value > best_bulk {
            best_bulk = value;
            best = (x, y);
        }
    }
    best
}

/// Largest `8n + 4` not above `limit`. `limit` must be at least 4.
fn lattice_floor(limit: u16) -> u16 {
    (limit - 4) / 8 * 8 + 4
}

/// Smallest `8n + 4` at or above `target`.
fn lattice_ceil(target: f64) -> u16 {
    let n = ((target - 4.0) / 8.0).ceil().max(0.0);
    (n as u16).saturating_mul(8).saturating_add(4)
}

/// Returns `(ev_hp, ev_def)` for the given remaining budget.
///
/// `ev_hp` is always `8n + 4` (or 0 when the budget is below 4 EVs), both values
/// stay within [`EV_MAX`], and their sum never exceeds `budget`.
pub fn optimize_hb(
    base_hp: u16,
    iv_hp: u8,
    base_def: u16,
    iv_def: u8,
    budget: u16,
) -> (u16, u16) {
    if budget < EV_GRANULARITY {
        return (0, 0);
    }
    let (x, _) = continuous_optimum(base_hp, iv_hp, base_def, iv_def, budget);
    let ev_hp = lattice_ceil(x * 8.0).min(lattice_floor(budget.min(EV_MAX)));
    let ev_def = (budget - ev_hp).min(EV_MAX);
    (ev_hp, ev_def)
}
