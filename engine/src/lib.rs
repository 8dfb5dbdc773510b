pub mod types;
pub mod error;
pub mod map;
pub mod diplomacy;
pub mod config;
pub mod navigation;
pub mod validate;
pub mod schedule;
pub mod conflict;
pub mod combat;
pub mod supply;
pub mod engine;
pub mod setup;


pub use types::*;
pub use error::{CombatError, GraphError, SetupError, TurnError, ValidationError};
pub use config::Rules;
pub use diplomacy::DiplomacyTable;
pub use map::RegionGraph;
pub use engine::{resolve_turn, TurnContext};
pub use setup::{Scenario, World};
pub use combat::seeded_rng;
