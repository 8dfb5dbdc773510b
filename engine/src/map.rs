// ═══════════════════════════════════════════════════════════════════════
// Region graph — regions, symmetric edges, river/wall boundaries
// Regions live in an id-keyed arena; armies refer to them by id only.
// ═══════════════════════════════════════════════════════════════════════

use crate::error::GraphError;
use crate::types::{RegionId, Terrain};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Feature on an edge that slows movement and weakens attacks across it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Boundary {
    #[default]
    None,
    River { name: String, movement_penalty: i32, attack_penalty: f32 },
    Wall { name: String, movement_penalty: i32, attack_penalty: f32 },
}

impl Boundary {
    pub fn move_penalty(&self) -> i32 {
        match self {
            Boundary::None => 0,
            Boundary::River { movement_penalty, .. } | Boundary::Wall { movement_penalty, .. } => *movement_penalty,
        }
    }

    pub fn attack_penalty(&self) -> f32 {
        match self {
            Boundary::None => 0.0,
            Boundary::River { attack_penalty, .. } | Boundary::Wall { attack_penalty, .. } => *attack_penalty,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Boundary::None => None,
            Boundary::River { name, .. } | Boundary::Wall { name, .. } => Some(name),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Boundary::None)
    }
}

/// Directed connection src → dst.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub src: RegionId,
    pub dst: RegionId,
    pub boundary: Boundary,
}

impl Edge {
    pub fn move_penalty(&self) -> i32 {
        self.boundary.move_penalty()
    }

    pub fn attack_penalty(&self) -> f32 {
        self.boundary.attack_penalty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: RegionId,
    pub terrain: Terrain,
    /// Number of armies the region supports.
    pub capacity: u32,
    /// Outgoing edges keyed by destination.
    pub edges: BTreeMap<RegionId, Edge>,
}

/// Static description of a region before it is wired into the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionDef {
    pub id: RegionId,
    pub terrain: Terrain,
    pub capacity: u32,
    pub neighbors: Vec<RegionId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionGraph {
    regions: BTreeMap<RegionId, Region>,
}

impl RegionGraph {
    /// Build the graph and connect every region to its listed neighbors.
    /// Neighbor lists must be mutual.
    pub fn from_defs(defs: impl IntoIterator<Item = RegionDef>) -> Result<Self, GraphError> {
        let defs: Vec<RegionDef> = defs.into_iter().collect();

        let mut regions = BTreeMap::new();
        for def in &defs {
            let region = Region {
                id: def.id.clone(),
                terrain: def.terrain,
                capacity: def.capacity,
                edges: BTreeMap::new(),
            };
            if regions.insert(def.id.clone(), region).is_some() {
                return Err(GraphError::DuplicateRegion(def.id.clone()));
            }
        }

        let lookup: BTreeMap<&RegionId, &RegionDef> = defs.iter().map(|d| (&d.id, d)).collect();
        let mut graph = RegionGraph { regions };

        for def in &defs {
            if def.neighbors.is_empty() {
                return Err(GraphError::NoNeighbors(def.id.clone()));
            }
            for neighbor in &def.neighbors {
                if *neighbor == def.id {
                    return Err(GraphError::NeighborItself(def.id.clone()));
                }
                let Some(other) = lookup.get(neighbor) else {
                    return Err(GraphError::NeighborMissing {
                        region: def.id.clone(),
                        neighbor: neighbor.clone(),
                    });
                };
                if !other.neighbors.contains(&def.id) {
                    return Err(GraphError::NeighborMismatch {
                        region: def.id.clone(),
                        neighbor: neighbor.clone(),
                    });
                }
                graph.connect(&def.id, neighbor);
            }
        }

        Ok(graph)
    }

    /// One edge per direction. Existing edges keep their boundary.
    fn connect(&mut self, a: &RegionId, b: &RegionId) {
        for (src, dst) in [(a, b), (b, a)] {
            if let Some(region) = self.regions.get_mut(src) {
                region.edges.entry(dst.clone()).or_insert_with(|| Edge {
                    src: src.clone(),
                    dst: dst.clone(),
                    boundary: Boundary::None,
                });
            }
        }
    }

    /// Assign a boundary to each bordering pair, in both directions.
    /// `borders` is read two at a time: `[a, b, c, d]` bounds a–b and c–d.
    pub fn incorporate_boundary(&mut self, boundary: &Boundary, borders: &[RegionId]) -> Result<(), GraphError> {
        let label = boundary.name().unwrap_or("unnamed").to_string();
        if borders.len() % 2 != 0 {
            return Err(GraphError::OddBorderCount(label));
        }

        for pair in borders.chunks(2) {
            let (a, b) = (&pair[0], &pair[1]);
            for region in [a, b] {
                if !self.regions.contains_key(region) {
                    return Err(GraphError::BorderMissing { boundary: label, region: region.clone() });
                }
            }
            let (Some(forward), Some(back)) = (self.edge(a, b), self.edge(b, a)) else {
                return Err(GraphError::InvalidBorderPair { boundary: label, a: a.clone(), b: b.clone() });
            };
            for edge in [forward, back] {
                if !edge.boundary.is_none() {
                    return Err(GraphError::BoundaryAlreadyAssigned {
                        src: edge.src.clone(),
                        dst: edge.dst.clone(),
                    });
                }
            }
            for (src, dst) in [(a, b), (b, a)] {
                if let Some(edge) = self.regions.get_mut(src).and_then(|r| r.edges.get_mut(dst)) {
                    edge.boundary = boundary.clone();
                }
            }
        }
        Ok(())
    }

    pub fn region(&self, id: &RegionId) -> Option<&Region> {
        self.regions.get(id)
    }

    pub fn contains(&self, id: &RegionId) -> bool {
        self.regions.contains_key(id)
    }

    /// Outgoing edges of a region, ordered by destination id.
    pub fn edges<'a>(&'a self, id: &RegionId) -> impl Iterator<Item = &'a Edge> + 'a {
        self.regions.get(id).into_iter().flat_map(|r| r.edges.values())
    }

    pub fn edge(&self, src: &RegionId, dst: &RegionId) -> Option<&Edge> {
        self.regions.get(src).and_then(|r| r.edges.get(dst))
    }

    pub fn neighbors<'a>(&'a self, id: &RegionId) -> impl Iterator<Item = &'a RegionId> + 'a {
        self.edges(id).map(|e| &e.dst)
    }

    pub fn terrain(&self, id: &RegionId) -> Option<Terrain> {
        self.regions.get(id).map(|r| r.terrain)
    }

    pub fn region_ids(&self) -> impl Iterator<Item = &RegionId> {
        self.regions.keys()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
