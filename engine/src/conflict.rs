// ═══════════════════════════════════════════════════════════════════════
// Conflict resolution — apply scheduled marches against current occupants
// ═══════════════════════════════════════════════════════════════════════

use crate::diplomacy::DiplomacyTable;
use crate::schedule::ScheduledOrder;
use crate::types::*;

/// What the march pass produced, before any combat.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarchResolution {
    pub events: Vec<MarchEvent>,
    pub battles: Vec<Battle>,
    pub cancelled: Vec<CancelledOrder>,
}

/// How the first occupant of a destination relates to the marching house.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Occupancy {
    Empty,
    Enemy(ArmyId),
    Ally,
    Neutral,
}

fn occupancy(armies: &Armies, diplomacy: &DiplomacyTable, mover: &Army, dst: &RegionId) -> Occupancy {
    let Some(first) = armies_within(armies, dst).find(|a| a.id != mover.id) else {
        return Occupancy::Empty;
    };
    if diplomacy.is_enemy(&mover.house, &first.house) {
        Occupancy::Enemy(first.id.clone())
    } else if diplomacy.is_ally(&mover.house, &first.house) {
        Occupancy::Ally
    } else {
        Occupancy::Neutral
    }
}

/// Walk the scheduled orders in priority order, moving armies in `armies`
/// as each order commits. Later orders see the regions earlier ones left.
pub fn resolve_moves(armies: &mut Armies, diplomacy: &DiplomacyTable, scheduled: &[ScheduledOrder]) -> MarchResolution {
    let mut out = MarchResolution::default();

    for ScheduledOrder { order, priority, .. } in scheduled {
        let Some(mover) = armies.get(&order.army) else {
            continue;
        };

        if mover.in_combat() {
            tracing::debug!(army = %order.army, "order dropped, army already engaged");
            out.cancelled.push(CancelledOrder { order: order.clone(), reason: CancelReason::AlreadyEngaged });
            continue;
        }

        let event = |context| MarchEvent {
            army: order.army.clone(),
            src: order.src.clone(),
            dst: order.dst.clone(),
            context,
        };

        match occupancy(armies, diplomacy, mover, &order.dst) {
            Occupancy::Enemy(defender) => {
                let context = if order.context.is_hostile_intent() { Context::Attack } else { Context::SurpriseAttack };
                tracing::debug!(army = %order.army, defender = %defender, region = %order.dst, priority, %context, "battle queued");
                if let Some(a) = armies.get_mut(&order.army) {
                    a.set_in_combat();
                }
                if let Some(d) = armies.get_mut(&defender) {
                    d.set_in_combat();
                }
                out.battles.push(Battle::new(order.army.clone(), defender, context));
                out.events.push(event(context));
            }
            Occupancy::Neutral => {
                tracing::debug!(army = %order.army, region = %order.dst, "march cancelled, neutral army present");
                out.events.push(event(Context::CancelNeutralPresent));
                out.cancelled.push(CancelledOrder { order: order.clone(), reason: CancelReason::NeutralPresent });
            }
            Occupancy::Ally | Occupancy::Empty => {
                tracing::debug!(army = %order.army, region = %order.dst, priority, "march committed");
                if let Some(a) = armies.get_mut(&order.army) {
                    a.region = order.dst.clone();
                }
                out.events.push(event(Context::March));
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diplomacy::{OfficialStatus, Relation, RelationStatus};

    fn army(id: &str, house: &str, region: &str) -> Army {
        Army {
            id: id.into(),
            name: id.into(),
            house: house.into(),
            morale: 3,
            size: 10,
            quality: 2,
            combat_state: CombatState::None,
            defense_state: DefenseState::None,
            supply: SupplyStatus::Supplied,
            region: region.into(),
            home: region.into(),
        }
    }

    fn diplomacy() -> DiplomacyTable {
        let mut d = DiplomacyTable::new();
        for h in ["red", "blue", "green", "grey"] {
            d.add_house(h.into(), h);
        }
        d.set_relation(&"red".into(), &"blue".into(), Relation::new(OfficialStatus::Enemy, RelationStatus::Hatred));
        d.set_relation(&"red".into(), &"green".into(), Relation::new(OfficialStatus::Allied, RelationStatus::Friendly));
        d
    }

    fn sched(orders: Vec<MarchOrder>) -> Vec<ScheduledOrder> {
        orders
            .into_iter()
            .enumerate()
            .map(|(index, order)| ScheduledOrder { index, priority: 100, order })
            .collect()
    }

    fn store(list: Vec<Army>) -> Armies {
        list.into_iter().map(|a| (a.id.clone(), a)).collect()
    }

    #[test]
    fn test_march_into_sequence_sees_earlier_moves() {
        let mut armies = store(vec![army("r1", "red", "a"), army("b1", "blue", "c")]);
        let orders = sched(vec![
            MarchOrder::new("r1", "a", "b", Context::March),
            MarchOrder::new("b1", "c", "b", Context::March),
        ]);
        let res = resolve_moves(&mut armies, &diplomacy(), &orders);
        assert_eq!(res.events[0].context, Context::March);
        assert_eq!(res.events[1].context, Context::SurpriseAttack);
        assert_eq!(res.battles, vec![Battle::new("b1".into(), "r1".into(), Context::SurpriseAttack)]);
        assert_eq!(armies["r1"].region.as_str(), "b");
        assert_eq!(armies["b1"].region.as_str(), "c");
    }

    #[test]
    fn test_engaged_army_order_dropped_silently() {
        let mut armies = store(vec![army("r1", "red", "a"), army("b1", "blue", "b")]);
        let orders = sched(vec![
            MarchOrder::new("r1", "a", "b", Context::Attack),
            MarchOrder::new("b1", "b", "c", Context::March),
        ]);
        let res = resolve_moves(&mut armies, &diplomacy(), &orders);
        assert_eq!(res.events.len(), 1);
        assert_eq!(res.cancelled.len(), 1);
        assert_eq!(res.cancelled[0].reason, CancelReason::AlreadyEngaged);
        assert_eq!(armies["b1"].region.as_str(), "b");
    }

    #[test]
    fn test_first_occupant_by_id_decides() {
        // "g1" sorts before "n1", so the ally is seen first
        let mut armies = store(vec![army("r1", "red", "a"), army("g1", "green", "b"), army("n1", "grey", "b")]);
        let res = resolve_moves(&mut armies, &diplomacy(), &sched(vec![MarchOrder::new("r1", "a", "b", Context::March)]));
        assert_eq!(res.events[0].context, Context::March);
        assert_eq!(armies["r1"].region.as_str(), "b");
    }

    #[test]
    fn test_dead_armies_do_not_occupy() {
        let mut dead = army("b1", "blue", "b");
        dead.size = 0;
        let mut armies = store(vec![army("r1", "red", "a"), dead]);
        let res = resolve_moves(&mut armies, &diplomacy(), &sched(vec![MarchOrder::new("r1", "a", "b", Context::Attack)]));
        assert!(res.battles.is_empty());
        assert_eq!(res.events[0].context, Context::March);
    }

    #[test]
    fn test_redirect_attack_counts_as_attack() {
        let mut armies = store(vec![army("r1", "red", "a"), army("b1", "blue", "b")]);
        let res = resolve_moves(
            &mut armies,
            &diplomacy(),
            &sched(vec![MarchOrder::new("r1", "a", "b", Context::RedirectAttack)]),
        );
        assert_eq!(res.events[0].context, Context::Attack);
        assert_eq!(res.battles[0].context, Context::Attack);
        assert!(armies["r1"].in_combat());
        assert!(armies["b1"].in_combat());
    }
}
