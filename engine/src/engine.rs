// ═══════════════════════════════════════════════════════════════════════
// Turn Engine — resolves one turn of simultaneous march orders
//
// Architecture:
//   The engine is a pure function of (world, armies, orders, rng). It never
//   does I/O and never decides orders itself. All work happens on a clone
//   of the caller's army store, which replaces the caller's copy only when the
//   whole turn succeeded.
//
// Flow:
//   1. validate: reject the batch if any order is malformed
//   2. schedule: sort orders by movement priority
//   3. marches: commit moves, queue battles, cancel blocked orders
//   4. combat: one round per battle, in queue order
//   5. supply: re-mark every surviving army
// ═══════════════════════════════════════════════════════════════════════

use crate::combat::resolve_battles;
use crate::config::Rules;
use crate::conflict::resolve_moves;
use crate::diplomacy::DiplomacyTable;
use crate::error::TurnError;
use crate::map::RegionGraph;
use crate::schedule::schedule_orders;
use crate::supply::evaluate_supply;
use crate::types::*;
use crate::validate::validate_orders;
use rand::Rng;

/// The read-only world a turn is resolved against.
#[derive(Debug, Clone, Copy)]
pub struct TurnContext<'w> {
    pub graph: &'w RegionGraph,
    pub diplomacy: &'w DiplomacyTable,
    pub rules: &'w Rules,
}

impl<'w> TurnContext<'w> {
    pub fn new(graph: &'w RegionGraph, diplomacy: &'w DiplomacyTable, rules: &'w Rules) -> Self {
        TurnContext { graph, diplomacy, rules }
    }
}

/// Resolve one turn. On success `armies` holds the post-turn state; on
/// error it is exactly as it was passed in.
pub fn resolve_turn<R: Rng + ?Sized>(
    ctx: TurnContext<'_>,
    armies: &mut Armies,
    orders: &[MarchOrder],
    rng: &mut R,
) -> Result<TurnReport, TurnError> {
    validate_orders(armies, ctx.graph, orders)?;

    let mut working = armies.clone();
    for army in working.values_mut() {
        army.combat_state = CombatState::None;
    }

    let scheduled = schedule_orders(ctx.graph, &working, ctx.rules, orders);
    let marches = resolve_moves(&mut working, ctx.diplomacy, &scheduled);
    let combat = resolve_battles(&mut working, ctx.graph, ctx.rules, &marches.battles, rng)?;
    evaluate_supply(ctx.graph, ctx.diplomacy, &mut working, ctx.rules.supply.mode);

    tracing::debug!(
        orders = orders.len(),
        battles = marches.battles.len(),
        cancelled = marches.cancelled.len(),
        "turn resolved"
    );

    let events = marches
        .events
        .into_iter()
        .map(TurnEvent::March)
        .chain(combat.into_iter().map(TurnEvent::Combat))
        .collect();

    *armies = working;
    Ok(TurnReport { events, battles: marches.battles, cancelled: marches.cancelled })
}
