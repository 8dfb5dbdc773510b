// ═══════════════════════════════════════════════════════════════════════
// Scenario setup — parse a TOML scenario and build the world it describes
// ═══════════════════════════════════════════════════════════════════════

use crate::config::Rules;
use crate::diplomacy::{DiplomacyTable, Relation};
use crate::engine::TurnContext;
use crate::error::SetupError;
use crate::map::{Boundary, RegionDef, RegionGraph};
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Scenario bundled with the engine.
pub const SAMPLE_SCENARIO: &str = include_str!("../data/sample.toml");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionEntry {
    #[serde(default)]
    pub terrain: Terrain,
    #[serde(default = "default_capacity")]
    pub capacity: u32,
    pub neighbors: Vec<RegionId>,
}

fn default_capacity() -> u32 {
    1
}

/// A river or wall laid along pairs of bordering regions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryEntry {
    pub borders: Vec<RegionId>,
    #[serde(default)]
    pub movement_penalty: i32,
    #[serde(default)]
    pub attack_penalty: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmyEntry {
    #[serde(default)]
    pub name: Option<String>,
    pub house: HouseId,
    pub region: RegionId,
    /// Defaults to the starting region.
    #[serde(default)]
    pub home: Option<RegionId>,
    pub morale: u32,
    pub size: u32,
    pub quality: u32,
    #[serde(default)]
    pub defending: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// House id → display name.
    #[serde(default)]
    pub houses: BTreeMap<HouseId, String>,
    #[serde(default)]
    pub regions: BTreeMap<RegionId, RegionEntry>,
    #[serde(default)]
    pub rivers: BTreeMap<String, BoundaryEntry>,
    #[serde(default)]
    pub walls: BTreeMap<String, BoundaryEntry>,
    /// house → house → relation. Each pair only needs declaring once.
    #[serde(default)]
    pub relations: BTreeMap<HouseId, BTreeMap<HouseId, Relation>>,
    #[serde(default)]
    pub armies: BTreeMap<ArmyId, ArmyEntry>,
    #[serde(default)]
    pub rules: Rules,
    #[serde(default)]
    pub orders: Vec<MarchOrder>,
}

/// Everything a turn needs, built and checked.
#[derive(Debug, Clone)]
pub struct World {
    pub graph: RegionGraph,
    pub diplomacy: DiplomacyTable,
    pub armies: Armies,
    pub rules: Rules,
}

impl World {
    pub fn context(&self) -> TurnContext<'_> {
        TurnContext::new(&self.graph, &self.diplomacy, &self.rules)
    }
}

impl Scenario {
    pub fn from_toml_str(s: &str) -> Result<Self, SetupError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SetupError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn sample() -> Result<Self, SetupError> {
        Self::from_toml_str(SAMPLE_SCENARIO)
    }

    pub fn build(&self) -> Result<World, SetupError> {
        self.rules.check()?;
        let graph = self.build_graph()?;
        let diplomacy = self.build_diplomacy()?;
        let armies = self.init_armies(&graph, &diplomacy)?;
        tracing::debug!(regions = graph.len(), armies = armies.len(), "scenario built");
        Ok(World { graph, diplomacy, armies, rules: self.rules.clone() })
    }

    pub fn orders(&self) -> Vec<MarchOrder> {
        self.orders.clone()
    }

    fn build_graph(&self) -> Result<RegionGraph, SetupError> {
        let defs = self.regions.iter().map(|(id, entry)| RegionDef {
            id: id.clone(),
            terrain: entry.terrain,
            capacity: entry.capacity,
            neighbors: entry.neighbors.clone(),
        });
        let mut graph = RegionGraph::from_defs(defs)?;

        for (name, entry) in &self.rivers {
            let river = Boundary::River {
                name: name.clone(),
                movement_penalty: entry.movement_penalty,
                attack_penalty: entry.attack_penalty,
            };
            graph.incorporate_boundary(&river, &entry.borders)?;
        }
        for (name, entry) in &self.walls {
            let wall = Boundary::Wall {
                name: name.clone(),
                movement_penalty: entry.movement_penalty,
                attack_penalty: entry.attack_penalty,
            };
            graph.incorporate_boundary(&wall, &entry.borders)?;
        }
        Ok(graph)
    }

    fn build_diplomacy(&self) -> Result<DiplomacyTable, SetupError> {
        let mut table = DiplomacyTable::new();
        for (id, name) in &self.houses {
            table.add_house(id.clone(), name.clone());
        }
        for (a, row) in &self.relations {
            for (b, relation) in row {
                for house in [a, b] {
                    if !table.contains(house) {
                        return Err(SetupError::UnknownRelationHouse(house.clone()));
                    }
                }
                table.set_relation(a, b, *relation);
            }
        }
        Ok(table)
    }

    /// Bind each army to the graph; symbolic region ids must resolve.
    fn init_armies(&self, graph: &RegionGraph, diplomacy: &DiplomacyTable) -> Result<Armies, SetupError> {
        let mut armies = Armies::new();
        for (id, entry) in &self.armies {
            if !graph.contains(&entry.region) {
                return Err(SetupError::UnknownStartingRegion { army: id.clone(), region: entry.region.clone() });
            }
            let home = entry.home.clone().unwrap_or_else(|| entry.region.clone());
            if !graph.contains(&home) {
                return Err(SetupError::UnknownHomeRegion { army: id.clone(), region: home });
            }
            if !diplomacy.contains(&entry.house) {
                return Err(SetupError::UnknownArmyHouse { army: id.clone(), house: entry.house.clone() });
            }
            if entry.quality == 0 {
                return Err(SetupError::ZeroQuality(id.clone()));
            }

            let army = Army {
                id: id.clone(),
                name: entry.name.clone().unwrap_or_else(|| id.to_string()),
                house: entry.house.clone(),
                morale: entry.morale,
                size: entry.size,
                quality: entry.quality,
                combat_state: CombatState::None,
                defense_state: if entry.defending { DefenseState::Defended } else { DefenseState::None },
                supply: SupplyStatus::Supplied,
                region: entry.region.clone(),
                home,
            };
            armies.insert(id.clone(), army);
        }
        Ok(armies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GraphError;

    const SMALL: &str = r#"
        [houses]
        stark = "House Stark"
        lannister = "House Lannister"

        [regions.winterfell]
        terrain = "plain"
        capacity = 3
        neighbors = ["moat_cailin"]

        [regions.moat_cailin]
        terrain = "MOUNTAIN"
        neighbors = ["winterfell"]

        [walls.moat]
        borders = ["winterfell", "moat_cailin"]
        movement_penalty = 20
        attack_penalty = -0.2

        [relations.stark.lannister]
        official_status = "ENEMY"
        relation_status = "hatred"

        [armies.north]
        house = "stark"
        region = "winterfell"
        morale = 3
        size = 30
        quality = 3

        [armies.west]
        name = "Western host"
        house = "lannister"
        region = "moat_cailin"
        home = "winterfell"
        morale = 4
        size = 30
        quality = 3
        defending = true

        [[orders]]
        army = "north"
        src = "winterfell"
        dst = "moat_cailin"
        context = "ATTACK"
    "#;

    #[test]
    fn test_build_small_scenario() {
        let scenario = Scenario::from_toml_str(SMALL).unwrap();
        let world = scenario.build().unwrap();

        assert_eq!(world.graph.len(), 2);
        let edge = world.graph.edge(&"winterfell".into(), &"moat_cailin".into()).unwrap();
        assert_eq!(edge.move_penalty(), 20);
        assert_eq!(world.graph.terrain(&"moat_cailin".into()), Some(Terrain::Mountain));

        assert!(world.diplomacy.is_enemy(&"lannister".into(), &"stark".into()));

        let north = &world.armies["north"];
        assert_eq!(north.name, "north");
        assert_eq!(north.home.as_str(), "winterfell");
        assert_eq!(north.strength(), 93);
        let west = &world.armies["west"];
        assert_eq!(west.name, "Western host");
        assert!(west.defending());

        let orders = scenario.orders();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].context, Context::Attack);
    }

    #[test]
    fn test_unknown_starting_region() {
        let src = SMALL.replace("region = \"winterfell\"", "region = \"the_wall\"");
        let err = Scenario::from_toml_str(&src).unwrap().build().unwrap_err();
        assert!(matches!(err, SetupError::UnknownStartingRegion { .. }));
    }

    #[test]
    fn test_unknown_relation_house() {
        let src = SMALL.replace("[relations.stark.lannister]", "[relations.stark.greyjoy]");
        let err = Scenario::from_toml_str(&src).unwrap().build().unwrap_err();
        assert!(matches!(err, SetupError::UnknownRelationHouse(h) if h.as_str() == "greyjoy"));
    }

    #[test]
    fn test_graph_errors_surface() {
        let src = SMALL.replace("neighbors = [\"winterfell\"]", "neighbors = [\"moat_cailin\"]");
        let err = Scenario::from_toml_str(&src).unwrap().build().unwrap_err();
        assert!(matches!(err, SetupError::Graph(GraphError::NeighborItself(_))));
    }

    #[test]
    fn test_zero_quality_rejected() {
        let src = SMALL.replace("quality = 3\n\n        [armies.west]", "quality = 0\n\n        [armies.west]");
        let err = Scenario::from_toml_str(&src).unwrap().build().unwrap_err();
        assert!(matches!(err, SetupError::ZeroQuality(a) if a.as_str() == "north"));
    }

    #[test]
    fn test_bad_toml() {
        assert!(matches!(Scenario::from_toml_str("[regions"), Err(SetupError::Toml(_))));
    }

    #[test]
    fn test_sample_scenario_builds() {
        let scenario = Scenario::sample().unwrap();
        let world = scenario.build().unwrap();
        assert!(!world.armies.is_empty());
        assert!(!scenario.orders().is_empty());
    }
}
