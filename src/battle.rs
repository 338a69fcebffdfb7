use crate::damage::struggle_damage;
use crate::model::Combatant;
use crate::regulation::{CRIT_DENOMINATOR, DAMAGE_ROLLS, MAX_TURNS};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Side {
    First,
    Second,
}

impl Side {
    pub fn index(self) -> usize {
        match self {
            Side::First => 0,
            Side::Second => 1,
        }
    }

    pub fn opponent(self) -> Side {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum BattlePhase {
    Ongoing,
    Decided(Side),
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum BattleResult {
    Winner(Side),
    /// Turn ceiling reached without a winner.
    TurnLimit,
}

/// The part of a combatant that changes during a battle.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Battler {
    pub current_hp: u16,
    pub heal_uses: u8,
}

impl Battler {
    pub fn fresh(combatant: &Combatant) -> Self {
        Battler {
            current_hp: combatant.max_hp,
            heal_uses: combatant.strategy.initial_heal_uses(),
        }
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    fn heal(&mut self, amount: u16, max_hp: u16) {
        self.current_hp = self.current_hp.saturating_add(amount).min(max_hp);
    }

    fn take(&mut self, amount: u32) {
        self.current_hp = (self.current_hp as u32).saturating_sub(amount) as u16;
    }
}

/// Moves first on strictly higher speed; `None` on a speed tie.
pub fn speed_order(first: &Combatant, second: &Combatant) -> Option<[Side; 2]> {
    if first.spe > second.spe {
        Some([Side::First, Side::Second])
    } else if second.spe > first.spe {
        Some([Side::Second, Side::First])
    } else {
        None
    }
}

/// Resolves one action of `actor`. `roll_damage` is only called when the actor
/// struggles. Returns the winner if the action ended the battle.
pub(crate) fn resolve_action(
    combatants: [&Combatant; 2],
    battlers: &mut [Battler; 2],
    actor: Side,
    roll_damage: impl FnOnce() -> u32,
) -> Option<Side> {
    let target = actor.opponent();
    let (a, t) = (actor.index(), target.index());
    if battlers[a].heal_uses > 0 {
        battlers[a].heal_uses -= 1;
        let target_max = combatants[t].max_hp;
        battlers[t].heal(target_max.div_ceil(2), target_max);
        tracing::trace!(?actor, hp = battlers[t].current_hp, "heal pulse");
        return None;
    }

    let damage = roll_damage();
    battlers[t].take(damage);
    tracing::trace!(?actor, damage, hp = battlers[t].current_hp, "struggle");
    if battlers[t].is_fainted() {
        return Some(actor);
    }
    battlers[a].take((combatants[a].max_hp / 4) as u32);
    if battlers[a].is_fainted() {
        return Some(target);
    }
    None
}

/// End-of-turn healing, in move order.
pub(crate) fn end_of_turn(
    combatants: [&Combatant; 2],
    battlers: &mut [Battler; 2],
    order: [Side; 2],
) {
    for side in order {
        let idx = side.index();
        let max_hp = combatants[idx].max_hp;
        let amount = combatants[idx].strategy.end_of_turn_heal(max_hp);
        battlers[idx].heal(amount, max_hp);
    }
}

/// A 1v1 Struggle battle. Both sides act on fixed rules; only the RNG decides.
pub struct Battle<'a> {
    combatants: [&'a Combatant; 2],
    battlers: [Battler; 2],
    turn: usize,
    phase: BattlePhase,
}

impl<'a> Battle<'a> {
    pub fn new(first: &'a Combatant, second: &'a Combatant) -> Self {
        Battle {
            combatants: [first, second],
            battlers: [Battler::fresh(first), Battler::fresh(second)],
            turn: 0,
            phase: BattlePhase::Ongoing,
        }
    }

    /// Restores both sides to full HP and full Heal Pulse PP.
    pub fn reset(&mut self) {
        self.battlers = [
            Battler::fresh(self.combatants[0]),
            Battler::fresh(self.combatants[1]),
        ];
        self.turn = 0;
        self.phase = BattlePhase::Ongoing;
    }

    pub fn battler(&self, side: Side) -> &Battler {
        &self.battlers[side.index()]
    }

    pub fn combatant(&self, side: Side) -> &Combatant {
        self.combatants[side.index()]
    }

    pub fn turn(&self) -> usize {
        self.turn
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    /// Move order for this turn. A speed tie is settled by one coin flip for
    /// the whole turn.
    pub fn turn_order<R: Rng + ?Sized>(&self, rng: &mut R) -> [Side; 2] {
        speed_order(self.combatants[0], self.combatants[1]).unwrap_or_else(|| {
            if rng.gen_range(0..2) == 0 {
                [Side::First, Side::Second]
            } else {
                [Side::Second, Side::First]
            }
        })
    }

    /// Plays one full turn. Does nothing once the battle is decided.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> BattlePhase {
        if let BattlePhase::Decided(_) = self.phase {
            return self.phase;
        }
        self.turn += 1;
        let order = self.turn_order(rng);
        tracing::trace!(turn = self.turn, ?order, "turn start");
        for actor in order {
            let attacker = self.combatants[actor.index()];
            let defender = self.combatants[actor.opponent().index()];
            let winner = resolve_action(self.combatants, &mut self.battlers, actor, || {
                let critical = rng.gen_range(0..CRIT_DENOMINATOR) == 0;
                let random = rng.gen_range(0..DAMAGE_ROLLS);
                struggle_damage(attacker, defender, critical, random)
            });
            if let Some(winner) = winner {
                self.phase = BattlePhase::Decided(winner);
                return self.phase;
            }
        }
        end_of_turn(self.combatants, &mut self.battlers, order);
        self.phase
    }

    /// Plays turns until someone wins or [`MAX_TURNS`] is reached.
    pub fn run<R: Rng + ?Sized>(&mut self, rng: &mut R) -> BattleResult {
        while self.turn < MAX_TURNS {
            if let BattlePhase::Decided(winner) = self.step(rng) {
                return BattleResult::Winner(winner);
            }
        }
        BattleResult::TurnLimit
    }
}

/// Runs one battle from full HP.
pub fn simulate<R: Rng + ?Sized>(
    first: &Combatant,
    second: &Combatant,
    rng: &mut R,
) -> BattleResult {
    Battle::new(first, second).run(rng)
}

pub fn simulate_battle(first: &Combatant, second: &Combatant, seed: u64) -> BattleResult {
    let mut rng = SmallRng::seed_from_u64(seed);
    simulate(first, second, &mut rng)
}
