//! Error types for the engine.
//!
//! Validation and structural errors are returned to the caller as values;
//! nothing in the engine logs or retries them.

use crate::types::{ArmyId, HouseId, RegionId};

/// Region graph and boundary construction failures.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("duplicate region id {0}")]
    DuplicateRegion(RegionId),

    #[error("region {0} can't neighbor itself")]
    NeighborItself(RegionId),

    #[error("region {0} has no neighbors")]
    NoNeighbors(RegionId),

    #[error("region {region} lists unknown neighbor {neighbor}")]
    NeighborMissing { region: RegionId, neighbor: RegionId },

    #[error("neighbor {neighbor} doesn't reference region {region}")]
    NeighborMismatch { region: RegionId, neighbor: RegionId },

    #[error("boundary {0} has an odd number of borders")]
    OddBorderCount(String),

    #[error("boundary {boundary} references unknown region {region}")]
    BorderMissing { boundary: String, region: RegionId },

    #[error("boundary {boundary} pairs non-adjacent regions {a} and {b}")]
    InvalidBorderPair { boundary: String, a: RegionId, b: RegionId },

    #[error("edge {src} to {dst} already has a boundary assigned")]
    BoundaryAlreadyAssigned { src: RegionId, dst: RegionId },
}

/// Scenario loading and army initialization failures.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("army {army} starting region {region} does not exist")]
    UnknownStartingRegion { army: ArmyId, region: RegionId },

    #[error("army {army} home region {region} does not exist")]
    UnknownHomeRegion { army: ArmyId, region: RegionId },

    #[error("army {army} belongs to unknown house {house}")]
    UnknownArmyHouse { army: ArmyId, house: HouseId },

    #[error("army {0} must have a positive quality")]
    ZeroQuality(ArmyId),

    #[error("relation references unknown house {0}")]
    UnknownRelationHouse(HouseId),

    #[error("combat modifier {key} = {value} is outside [-1, 1]")]
    ModifierOutOfRange { key: String, value: f32 },
}

/// Order batch rejected before any order was applied.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("order {index} had invalid army id {army}")]
    UnknownArmy { index: usize, army: ArmyId },

    #[error("order {index} has invalid src id {region}")]
    UnknownSource { index: usize, region: RegionId },

    #[error("army {army} region {actual} doesn't match src {src}")]
    SourceMismatch { army: ArmyId, actual: RegionId, src: RegionId },

    #[error("order {index} has invalid destination id {region}")]
    UnknownDestination { index: usize, region: RegionId },

    #[error("none of region {src} edges lead to destination {dst}")]
    NotAdjacent { src: RegionId, dst: RegionId },

    #[error("army {0} was given more than one order")]
    DuplicateOrder(ArmyId),
}

/// Structural problems in a battle list; no battle is resolved.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum CombatError {
    #[error("there cannot be multiple attack battles for army {0}")]
    MultipleAttacks(ArmyId),

    #[error("battle references unknown army {0}")]
    UnknownArmy(ArmyId),

    #[error("army {0} can't fight itself")]
    SelfBattle(ArmyId),
}

/// Anything that aborts a turn. The caller's army store is left untouched.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TurnError {
    #[error("invalid orders: {0}")]
    Validation(#[from] ValidationError),

    #[error("combat aborted: {0}")]
    Combat(#[from] CombatError),
}
