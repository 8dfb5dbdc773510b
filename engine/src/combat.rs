// ═══════════════════════════════════════════════════════════════════════
// Combat — one round of blows per queued battle
//
//   base      = size × quality
//   inflicted = base/6 + ⌊base/6 × U⌋,  U ∈ [0, 1)
//   inflicted += trunc(inflicted × weight), never below 0
//   damage    = opponent's inflicted / own quality
// ═══════════════════════════════════════════════════════════════════════

use crate::config::Rules;
use crate::error::CombatError;
use crate::map::RegionGraph;
use crate::types::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;

/// Deterministic RNG for one turn.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Reject battle lists that can't be fought: unknown armies, an army
/// fighting itself, or an army attacking twice.
/// Returns attacker → defender.
pub fn check_battles<'a>(armies: &Armies, battles: &'a [Battle]) -> Result<BTreeMap<&'a ArmyId, &'a ArmyId>, CombatError> {
    let mut attacks = BTreeMap::new();
    for battle in battles {
        for id in [&battle.attacker, &battle.defender] {
            if !armies.contains_key(id) {
                return Err(CombatError::UnknownArmy(id.clone()));
            }
        }
        if battle.attacker == battle.defender {
            return Err(CombatError::SelfBattle(battle.attacker.clone()));
        }
        if attacks.insert(&battle.attacker, &battle.defender).is_some() {
            return Err(CombatError::MultipleAttacks(battle.attacker.clone()));
        }
    }
    Ok(attacks)
}

/// Damage multipliers for (attacker, defender), summed from three terms:
/// a defended side facing an undefended one adds its terrain defense bonus,
/// the attacker carries the attack penalty of the edge it strikes across,
/// and the attacker adds the modifier for the battle's context.
pub fn battle_weights(
    attacker: &Army,
    defender: &Army,
    context: Context,
    graph: &RegionGraph,
    rules: &Rules,
) -> (CombatModifier, CombatModifier) {
    let bonus = |army: &Army| graph.terrain(&army.region).map_or(0.0, |t| rules.defense_bonus(t));
    let across = graph.edge(&attacker.region, &defender.region).map_or(0.0, |e| e.attack_penalty());

    let (mut wa, mut wb) = (across, 0.0);
    if defender.defending() && !attacker.defending() {
        wb += bonus(defender);
    } else if attacker.defending() && !defender.defending() {
        wa += bonus(attacker);
    }
    wa += rules.context_modifier(context);
    (wa, wb)
}

/// Damage one side deals before its opponent's quality is applied.
pub fn inflicted_damage(size: u32, quality: u32, roll: f64, weight: CombatModifier) -> u32 {
    let sixth = u64::from(size) * u64::from(quality) / 6;
    let exact = u64::from(size) * u64::from(quality);
    let luck = (exact as f64 / 6.0 * roll).floor() as u64;
    let raw = (sixth + luck) as f64;
    let weighted = raw + (raw * f64::from(weight)).trunc();
    weighted.max(0.0).min(f64::from(u32::MAX)) as u32
}

/// Apply one exchange of blows. Destruction is checked first, attacker
/// before defender, then the side that dealt less loses a point of morale.
pub fn exchange(a: &mut Army, b: &mut Army, inflicted_a: u32, inflicted_b: u32) -> CombatEvent {
    let damage_to_a = inflicted_b / a.quality.max(1);
    let damage_to_b = inflicted_a / b.quality.max(1);

    if damage_to_a >= a.size {
        a.size = 0;
        b.size = b.size.saturating_sub(damage_to_b);
        return CombatEvent { target: a.id.clone(), by: b.id.clone(), outcome: CombatOutcome::Destroyed };
    }
    if damage_to_b >= b.size {
        b.size = 0;
        a.size = a.size.saturating_sub(damage_to_a);
        return CombatEvent { target: b.id.clone(), by: a.id.clone(), outcome: CombatOutcome::Destroyed };
    }

    a.size -= damage_to_a;
    b.size -= damage_to_b;

    let (loser, winner) = match inflicted_a.cmp(&inflicted_b) {
        std::cmp::Ordering::Greater => (b, a),
        std::cmp::Ordering::Less => (a, b),
        std::cmp::Ordering::Equal => {
            return CombatEvent { target: a.id.clone(), by: b.id.clone(), outcome: CombatOutcome::Draw };
        }
    };
    loser.morale = loser.morale.saturating_sub(1);
    let outcome = if loser.morale == 0 { CombatOutcome::Routed } else { CombatOutcome::Defeated };
    CombatEvent { target: loser.id.clone(), by: winner.id.clone(), outcome }
}

/// Fight every battle once, in list order, mutating size and morale in
/// place. The list is checked as a whole first; on error nothing changes.
///
/// Later battles see the sizes left by earlier ones. An army already at
/// size 0 deals no damage and is reported DESTROYED again.
pub fn resolve_battles<R: Rng + ?Sized>(
    armies: &mut Armies,
    graph: &RegionGraph,
    rules: &Rules,
    battles: &[Battle],
    rng: &mut R,
) -> Result<Vec<CombatEvent>, CombatError> {
    check_battles(armies, battles)?;
    let mut events = Vec::with_capacity(battles.len());

    for battle in battles {
        let fetch = |id: &ArmyId| armies.get(id).cloned().ok_or_else(|| CombatError::UnknownArmy(id.clone()));
        let mut a = fetch(&battle.attacker)?;
        let mut b = fetch(&battle.defender)?;

        let (wa, wb) = battle_weights(&a, &b, battle.context, graph, rules);
        let roll_a: f64 = rng.gen();
        let roll_b: f64 = rng.gen();
        let inflicted_a = inflicted_damage(a.size, a.quality, roll_a, wa);
        let inflicted_b = inflicted_damage(b.size, b.quality, roll_b, wb);

        let event = exchange(&mut a, &mut b, inflicted_a, inflicted_b);
        tracing::debug!(
            attacker = %a.id,
            defender = %b.id,
            inflicted_a,
            inflicted_b,
            target = %event.target,
            outcome = %event.outcome,
            "battle resolved"
        );

        armies.insert(a.id.clone(), a);
        armies.insert(b.id.clone(), b);
        events.push(event);
    }

    Ok(events)
}
