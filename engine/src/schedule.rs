// ═══════════════════════════════════════════════════════════════════════
// Priority scheduling — who gets to a contested region first
// priority = base − (terrain penalty + boundary penalty [+ army size])
// ═══════════════════════════════════════════════════════════════════════

use crate::config::Rules;
use crate::map::RegionGraph;
use crate::types::*;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledOrder {
    /// Position in the submitted batch.
    pub index: usize,
    pub priority: i32,
    pub order: MarchOrder,
}

/// Movement cost of an order. Lookups that miss read as zero.
pub fn order_penalty(graph: &RegionGraph, armies: &Armies, rules: &Rules, order: &MarchOrder) -> i32 {
    let terrain = match (graph.terrain(&order.src), graph.terrain(&order.dst)) {
        (Some(src), Some(dst)) => rules.terrain_penalty(src, dst),
        _ => 0,
    };
    let boundary = graph.edge(&order.src, &order.dst).map_or(0, |e| e.move_penalty());
    let size = if rules.priority.size_penalty {
        armies.get(&order.army).map_or(0, |a| i32::try_from(a.size).unwrap_or(i32::MAX))
    } else {
        0
    };
    terrain.saturating_add(boundary).saturating_add(size)
}

pub fn order_priority(graph: &RegionGraph, armies: &Armies, rules: &Rules, order: &MarchOrder) -> i32 {
    rules.priority.base.saturating_sub(order_penalty(graph, armies, rules, order))
}

/// Drain the batch through a max-heap. Highest priority first; equal
/// priorities keep submission order.
pub fn schedule_orders(graph: &RegionGraph, armies: &Armies, rules: &Rules, orders: &[MarchOrder]) -> Vec<ScheduledOrder> {
    let mut heap: BinaryHeap<(i32, Reverse<usize>)> = orders
        .iter()
        .enumerate()
        .map(|(index, order)| (order_priority(graph, armies, rules, order), Reverse(index)))
        .collect();

    let mut scheduled = Vec::with_capacity(orders.len());
    while let Some((priority, Reverse(index))) = heap.pop() {
        let order = orders[index].clone();
        tracing::trace!(army = %order.army, dst = %order.dst, priority, "order scheduled");
        scheduled.push(ScheduledOrder { index, priority, order });
    }
    scheduled
}
