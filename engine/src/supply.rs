// ═══════════════════════════════════════════════════════════════════════
// Supply — can an army still trace a line home?
// ═══════════════════════════════════════════════════════════════════════

use crate::config::SupplyMode;
use crate::diplomacy::DiplomacyTable;
use crate::map::RegionGraph;
use crate::navigation::shortest_path;
use crate::types::*;
use std::collections::BTreeSet;

/// Regions holding a live army of a house at war with `house`.
pub fn enemy_held_regions(armies: &Armies, diplomacy: &DiplomacyTable, house: &HouseId) -> BTreeSet<RegionId> {
    armies
        .values()
        .filter(|a| !a.is_destroyed() && diplomacy.is_enemy(house, &a.house))
        .map(|a| a.region.clone())
        .collect()
}

/// Supply status of one army under the given mode.
pub fn supply_status(
    graph: &RegionGraph,
    diplomacy: &DiplomacyTable,
    armies: &Armies,
    army: &Army,
    mode: SupplyMode,
) -> SupplyStatus {
    if army.region == army.home {
        return SupplyStatus::Supplied;
    }

    let supplied = match mode {
        SupplyMode::HomeOnly => false,
        SupplyMode::Reachable => safe_path_len(graph, diplomacy, armies, army).is_some(),
        SupplyMode::Shortest => {
            let open = shortest_path(graph, &army.region, &army.home, |_| true).map(|p| p.len());
            match (safe_path_len(graph, diplomacy, armies, army), open) {
                (Some(safe), Some(open)) => safe <= open,
                _ => false,
            }
        }
    };

    if supplied {
        SupplyStatus::Supplied
    } else {
        SupplyStatus::CutOff
    }
}

fn safe_path_len(graph: &RegionGraph, diplomacy: &DiplomacyTable, armies: &Armies, army: &Army) -> Option<usize> {
    let blocked = enemy_held_regions(armies, diplomacy, &army.house);
    shortest_path(graph, &army.region, &army.home, |r| !blocked.contains(r)).map(|p| p.len())
}

/// Re-mark every army. Destroyed armies are left as they are.
pub fn evaluate_supply(graph: &RegionGraph, diplomacy: &DiplomacyTable, armies: &mut Armies, mode: SupplyMode) {
    let view: &Armies = armies;
    let updates: Vec<(ArmyId, SupplyStatus)> = view
        .values()
        .filter(|a| !a.is_destroyed())
        .map(|a| (a.id.clone(), supply_status(graph, diplomacy, view, a, mode)))
        .collect();

    for (id, status) in updates {
        if let Some(army) = armies.get_mut(&id) {
            if army.supply != status {
                tracing::debug!(army = %id, ?status, "supply changed");
            }
            army.supply = status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diplomacy::{OfficialStatus, Relation, RelationStatus};
    use crate::map::RegionDef;

    // home ── mid ── front
    //   └── far ── back ──┘
    fn graph() -> RegionGraph {
        let def = |id: &str, n: &[&str]| RegionDef {
            id: id.into(),
            terrain: Terrain::Plain,
            capacity: 2,
            neighbors: n.iter().map(|s| RegionId::from(*s)).collect(),
        };
        RegionGraph::from_defs(vec![
            def("home", &["mid", "far"]),
            def("mid", &["home", "front"]),
            def("front", &["mid", "back"]),
            def("far", &["home", "back"]),
            def("back", &["far", "front"]),
        ])
        .unwrap()
    }

    fn army(id: &str, house: &str, region: &str, home: &str) -> Army {
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
            home: home.into(),
        }
    }

    fn diplomacy() -> DiplomacyTable {
        let mut d = DiplomacyTable::new();
        d.add_house("red".into(), "Red");
        d.add_house("blue".into(), "Blue");
        d.set_relation(&"red".into(), &"blue".into(), Relation::new(OfficialStatus::Enemy, RelationStatus::Hatred));
        d
    }

    fn store(list: Vec<Army>) -> Armies {
        list.into_iter().map(|a| (a.id.clone(), a)).collect()
    }

    #[test]
    fn test_home_region_is_always_supplied() {
        let g = graph();
        let armies = store(vec![army("r", "red", "home", "home")]);
        for mode in [SupplyMode::HomeOnly, SupplyMode::Reachable, SupplyMode::Shortest] {
            assert_eq!(supply_status(&g, &diplomacy(), &armies, &armies["r"], mode), SupplyStatus::Supplied);
        }
    }

    #[test]
    fn test_home_only_cuts_off_everywhere_else() {
        let g = graph();
        let armies = store(vec![army("r", "red", "mid", "home")]);
        assert_eq!(supply_status(&g, &diplomacy(), &armies, &armies["r"], SupplyMode::HomeOnly), SupplyStatus::CutOff);
    }

    #[test]
    fn test_detour_is_enough_when_reachable() {
        let g = graph();
        let armies = store(vec![army("r", "red", "front", "home"), army("b", "blue", "mid", "mid")]);
        let d = diplomacy();
        assert_eq!(supply_status(&g, &d, &armies, &armies["r"], SupplyMode::Reachable), SupplyStatus::Supplied);
        // Safe route is 3 steps, the open route 2
        assert_eq!(supply_status(&g, &d, &armies, &armies["r"], SupplyMode::Shortest), SupplyStatus::CutOff);
    }

    #[test]
    fn test_surrounded_army_is_cut_off() {
        let g = graph();
        let mut armies = store(vec![
            army("r", "red", "front", "home"),
            army("b1", "blue", "mid", "mid"),
            army("b2", "blue", "back", "back"),
        ]);
        evaluate_supply(&g, &diplomacy(), &mut armies, SupplyMode::Reachable);
        assert!(armies["r"].is_cut_off());
        // Blue armies sit on their own homes
        assert!(!armies["b1"].is_cut_off());
    }

    #[test]
    fn test_destroyed_enemy_does_not_block() {
        let g = graph();
        let mut dead = army("b1", "blue", "mid", "mid");
        dead.size = 0;
        let mut armies = store(vec![army("r", "red", "front", "home"), dead, army("b2", "blue", "back", "back")]);
        evaluate_supply(&g, &diplomacy(), &mut armies, SupplyMode::Shortest);
        assert!(!armies["r"].is_cut_off());
    }
}
