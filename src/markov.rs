//! Exact win probability by enumerating start-of-turn states.
//!
//! Every turn either spends a Heal Pulse use or costs both sides HP (Struggle
//! deals at least 1, recoil is at least the Leftovers heal), so the state graph
//! is acyclic and a memoized recursion visits each state once.

use crate::battle::{end_of_turn, resolve_action, speed_order, Battler, Side};
use crate::damage::struggle_distribution;
use crate::model::Combatant;
use std::collections::HashMap;

struct ExactSolver<'a> {
    combatants: [&'a Combatant; 2],
    /// `damage[i]`: Struggle outcomes when side `i` attacks.
    damage: [Vec<(u32, f64)>; 2],
    order: Option<[Side; 2]>,
    memo: HashMap<[Battler; 2], f64>,
}

impl<'a> ExactSolver<'a> {
    fn new(first: &'a Combatant, second: &'a Combatant) -> Self {
        ExactSolver {
            combatants: [first, second],
            damage: [
                struggle_distribution(first, second),
                struggle_distribution(second, first),
            ],
            order: speed_order(first, second),
            memo: HashMap::new(),
        }
    }

    fn value(&mut self, state: [Battler; 2]) -> f64 {
        if let Some(&v) = self.memo.get(&state) {
            return v;
        }
        let v = match self.order {
            Some(order) => self.action(state, order, 0),
            None => {
                0.5 * self.action(state, [Side::First, Side::Second], 0)
                    + 0.5 * self.action(state, [Side::Second, Side::First], 0)
            }
        };
        self.memo.insert(state, v);
        v
    }

    fn action(&mut self, state: [Battler; 2], order: [Side; 2], step: usize) -> f64 {
        if step == order.len() {
            let mut next = state;
            end_of_turn(self.combatants, &mut next, order);
            return self.value(next);
        }
        let actor = order[step];
        if state[actor.index()].heal_uses > 0 {
            let mut next = state;
            resolve_action(self.combatants, &mut next, actor, || 0);
            return self.action(next, order, step + 1);
        }
        let mut total = 0.0;
        for i in 0..self.damage[actor.index()].len() {
            let (damage, p) = self.damage[actor.index()][i];
            let mut next = state;
            total += p * match resolve_action(self.combatants, &mut next, actor, || damage) {
                Some(Side::First) => 1.0,
                Some(Side::Second) => 0.0,
                None => self.action(next, order, step + 1),
            };
        }
        total
    }
}

/// Probability that `first` beats `second` from full HP.
pub fn exact_win_probability(first: &Combatant, second: &Combatant) -> f64 {
    let mut solver = ExactSolver::new(first, second);
    solver.value([Battler::fresh(first), Battler::fresh(second)])
}
