// ═══════════════════════════════════════════════════════════════════════
// Navigation — path queries and legal order enumeration
// ═══════════════════════════════════════════════════════════════════════

use crate::diplomacy::DiplomacyTable;
use crate::map::{Edge, RegionGraph};
use crate::types::*;
use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap, VecDeque};

/// Breadth-first path from `src` to `dst`, entering only regions accepted by
/// `filter`. Returns the regions visited after `src` (empty when already
/// there), or `None` when `dst` can't be reached.
pub fn shortest_path<F>(graph: &RegionGraph, src: &RegionId, dst: &RegionId, filter: F) -> Option<Vec<RegionId>>
where
    F: Fn(&RegionId) -> bool,
{
    if !graph.contains(src) || !graph.contains(dst) {
        return None;
    }
    if src == dst {
        return Some(Vec::new());
    }

    let mut came_from: BTreeMap<RegionId, RegionId> = BTreeMap::new();
    let mut visited: BTreeSet<&RegionId> = BTreeSet::new();
    let mut queue: VecDeque<&RegionId> = VecDeque::new();

    visited.insert(src);
    queue.push_back(src);

    while let Some(current) = queue.pop_front() {
        for next in graph.neighbors(current) {
            if visited.contains(next) || !filter(next) {
                continue;
            }
            visited.insert(next);
            came_from.insert(next.clone(), current.clone());
            if next == dst {
                return Some(rebuild(&came_from, src, dst));
            }
            queue.push_back(next);
        }
    }

    None
}

/// Least-cost path using a caller-supplied edge weight.
/// Returns the total cost and the regions after `src`, like `shortest_path`.
pub fn cheapest_path<W>(graph: &RegionGraph, src: &RegionId, dst: &RegionId, weigh: W) -> Option<(u32, Vec<RegionId>)>
where
    W: Fn(&Edge) -> u32,
{
    if !graph.contains(src) || !graph.contains(dst) {
        return None;
    }
    if src == dst {
        return Some((0, Vec::new()));
    }

    let mut best: BTreeMap<RegionId, u32> = BTreeMap::new();
    let mut came_from: BTreeMap<RegionId, RegionId> = BTreeMap::new();
    let mut settled: BTreeSet<RegionId> = BTreeSet::new();
    let mut open = BinaryHeap::new();

    best.insert(src.clone(), 0);
    open.push(Reverse((0u32, src.clone())));

    while let Some(Reverse((cost, current))) = open.pop() {
        if &current == dst {
            return Some((cost, rebuild(&came_from, src, dst)));
        }
        if !settled.insert(current.clone()) {
            continue;
        }

        for edge in graph.edges(&current) {
            if settled.contains(&edge.dst) {
                continue;
            }
            let tentative = cost.saturating_add(weigh(edge));
            if best.get(&edge.dst).map_or(true, |&known| tentative < known) {
                best.insert(edge.dst.clone(), tentative);
                came_from.insert(edge.dst.clone(), current.clone());
                open.push(Reverse((tentative, edge.dst.clone())));
            }
        }
    }

    None
}

fn rebuild(came_from: &BTreeMap<RegionId, RegionId>, src: &RegionId, dst: &RegionId) -> Vec<RegionId> {
    let mut path = vec![dst.clone()];
    let mut current = dst;
    while let Some(prev) = came_from.get(current) {
        if prev == src {
            break;
        }
        path.push(prev.clone());
        current = prev;
    }
    path.reverse();
    path
}

/// Regions an army could be ordered into this turn.
pub fn valid_destinations(graph: &RegionGraph, armies: &Armies, army: &ArmyId) -> Vec<RegionId> {
    match armies.get(army) {
        Some(a) if !a.is_destroyed() => graph.neighbors(&a.region).cloned().collect(),
        _ => Vec::new(),
    }
}

/// Every legal order for an army: one per outgoing edge, ATTACK where a live
/// enemy stands in the destination and MARCH otherwise.
pub fn candidate_orders(
    graph: &RegionGraph,
    diplomacy: &DiplomacyTable,
    armies: &Armies,
    army: &ArmyId,
) -> Vec<MarchOrder> {
    let Some(mover) = armies.get(army) else {
        return Vec::new();
    };

    valid_destinations(graph, armies, army)
        .into_iter()
        .map(|dst| {
            let hostile = armies_within(armies, &dst).any(|other| diplomacy.is_enemy(&mover.house, &other.house));
            let context = if hostile { Context::Attack } else { Context::March };
            MarchOrder {
                army: army.clone(),
                src: mover.region.clone(),
                dst,
                context,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{Boundary, RegionDef};

    fn ids(v: &[RegionId]) -> Vec<&str> {
        v.iter().map(|r| r.as_str()).collect()
    }

    // a - b - c
    // |       |
    // d ----- e
    fn ring() -> RegionGraph {
        let def = |id: &str, n: &[&str]| RegionDef {
            id: id.into(),
            terrain: Terrain::Plain,
            capacity: 2,
            neighbors: n.iter().map(|s| RegionId::from(*s)).collect(),
        };
        RegionGraph::from_defs(vec![
            def("a", &["b", "d"]),
            def("b", &["a", "c"]),
            def("c", &["b", "e"]),
            def("d", &["a", "e"]),
            def("e", &["c", "d"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_bfs_shortest() {
        let g = ring();
        let p = shortest_path(&g, &"a".into(), &"c".into(), |_| true).unwrap();
        assert_eq!(ids(&p), vec!["b", "c"]);
    }

    #[test]
    fn test_bfs_same_region_is_empty() {
        let g = ring();
        assert_eq!(shortest_path(&g, &"a".into(), &"a".into(), |_| true), Some(vec![]));
    }

    #[test]
    fn test_bfs_filter_forces_detour() {
        let g = ring();
        let p = shortest_path(&g, &"a".into(), &"c".into(), |r| r.as_str() != "b").unwrap();
        assert_eq!(ids(&p), vec!["d", "e", "c"]);
        assert!(shortest_path(&g, &"a".into(), &"c".into(), |r| !matches!(r.as_str(), "b" | "e")).is_none());
    }

    #[test]
    fn test_dijkstra_avoids_river() {
        let mut g = ring();
        let river = Boundary::River { name: "trident".into(), movement_penalty: 10, attack_penalty: 0.0 };
        g.incorporate_boundary(&river, &["a".into(), "b".into()]).unwrap();
        let (cost, p) = cheapest_path(&g, &"a".into(), &"c".into(), |e| 1 + e.move_penalty().max(0) as u32).unwrap();
        assert_eq!(ids(&p), vec!["d", "e", "c"]);
        assert_eq!(cost, 3);
    }

    #[test]
    fn test_dijkstra_same_region_matches_bfs() {
        let g = ring();
        let (cost, p) = cheapest_path(&g, &"c".into(), &"c".into(), |_| 1).unwrap();
        assert_eq!(cost, 0);
        assert!(p.is_empty());
        assert_eq!(shortest_path(&g, &"c".into(), &"c".into(), |_| true), Some(p));
    }

    #[test]
    fn test_candidate_orders_mark_enemies() {
        use crate::diplomacy::{OfficialStatus, Relation, RelationStatus};

        let g = ring();
        let mut d = DiplomacyTable::new();
        d.add_house("stark".into(), "Stark");
        d.add_house("bolton".into(), "Bolton");
        d.set_relation(&"stark".into(), &"bolton".into(), Relation::new(OfficialStatus::Enemy, RelationStatus::Hatred));

        let mut armies = Armies::new();
        for (id, house, region) in [("robb", "stark", "a"), ("ramsay", "bolton", "d")] {
            armies.insert(
                id.into(),
                Army {
                    id: id.into(),
                    name: id.to_string(),
                    house: house.into(),
                    morale: 3,
                    size: 10,
                    quality: 2,
                    combat_state: CombatState::None,
                    defense_state: DefenseState::None,
                    supply: SupplyStatus::Supplied,
                    region: region.into(),
                    home: region.into(),
                },
            );
        }

        let orders = candidate_orders(&g, &d, &armies, &"robb".into());
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].dst.as_str(), "b");
        assert_eq!(orders[0].context, Context::March);
        assert_eq!(orders[1].dst.as_str(), "d");
        assert_eq!(orders[1].context, Context::Attack);
        assert!(candidate_orders(&g, &d, &armies, &"nobody".into()).is_empty());
    }
}
