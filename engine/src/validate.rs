// ═══════════════════════════════════════════════════════════════════════
// Order validation — reject a malformed batch before anything moves
// ═══════════════════════════════════════════════════════════════════════

use crate::error::ValidationError;
use crate::map::RegionGraph;
use crate::types::*;
use std::collections::BTreeSet;

/// Check every order against the army store and the graph.
/// The first failing order rejects the whole batch.
pub fn validate_orders(armies: &Armies, graph: &RegionGraph, orders: &[MarchOrder]) -> Result<(), ValidationError> {
    let mut seen: BTreeSet<&ArmyId> = BTreeSet::new();

    for (index, order) in orders.iter().enumerate() {
        let Some(army) = armies.get(&order.army) else {
            return Err(ValidationError::UnknownArmy { index, army: order.army.clone() });
        };

        if !graph.contains(&order.src) {
            return Err(ValidationError::UnknownSource { index, region: order.src.clone() });
        }
        if army.region != order.src {
            return Err(ValidationError::SourceMismatch {
                army: army.id.clone(),
                actual: army.region.clone(),
                src: order.src.clone(),
            });
        }

        if !graph.contains(&order.dst) {
            return Err(ValidationError::UnknownDestination { index, region: order.dst.clone() });
        }

        let links = graph.edges(&army.region).filter(|e| e.dst == order.dst).count();
        if links != 1 {
            return Err(ValidationError::NotAdjacent { src: army.region.clone(), dst: order.dst.clone() });
        }

        if !seen.insert(&order.army) {
            return Err(ValidationError::DuplicateOrder(order.army.clone()));
        }
    }

    Ok(())
}
