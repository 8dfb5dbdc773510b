// ═══════════════════════════════════════════════════════════════════════
// Rules — movement penalties, combat modifiers, scheduling and supply knobs
// Every table is optional; a missing entry reads as zero.
// ═══════════════════════════════════════════════════════════════════════

use crate::error::SetupError;
use crate::types::{CombatModifier, Context, Terrain};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const BASE_PRIORITY: i32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Penalty {
    #[serde(default, alias = "movementPenalty")]
    pub movement_penalty: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorityRules {
    /// Subtract the marching army's size from its priority.
    pub size_penalty: bool,
    pub base: i32,
}

impl Default for PriorityRules {
    fn default() -> Self {
        PriorityRules { size_penalty: false, base: BASE_PRIORITY }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupplyMode {
    /// Supplied only while standing on the home region.
    HomeOnly,
    /// Supplied while some enemy-free path leads home.
    #[default]
    Reachable,
    /// Like `Reachable`, but the safe path may not be longer than the
    /// unrestricted shortest path home.
    Shortest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SupplyRules {
    pub mode: SupplyMode,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// src terrain → dst terrain → penalty.
    #[serde(alias = "Terrain_Penalties")]
    pub terrain_penalties: BTreeMap<Terrain, BTreeMap<Terrain, Penalty>>,
    #[serde(alias = "Defense_Bonuses")]
    pub defense_bonuses: BTreeMap<Terrain, CombatModifier>,
    #[serde(alias = "Context_Modifiers")]
    pub context_modifiers: BTreeMap<Context, CombatModifier>,
    pub priority: PriorityRules,
    pub supply: SupplyRules,
}

impl Rules {
    /// The classic table: climbing is slow, mountains defend well and
    /// being caught by surprise hurts.
    pub fn standard() -> Self {
        let mut rules = Rules::default();
        for (src, dst, p) in [
            (Terrain::Plain, Terrain::Mountain, 30),
            (Terrain::Mountain, Terrain::Plain, 10),
            (Terrain::Plain, Terrain::Plain, 0),
            (Terrain::Mountain, Terrain::Mountain, 50),
        ] {
            rules
                .terrain_penalties
                .entry(src)
                .or_default()
                .insert(dst, Penalty { movement_penalty: p });
        }
        rules.defense_bonuses.insert(Terrain::Plain, 0.0);
        rules.defense_bonuses.insert(Terrain::Hill, 0.1);
        rules.defense_bonuses.insert(Terrain::Mountain, 0.3);
        rules.context_modifiers.insert(Context::SurpriseAttack, -0.3);
        rules
    }

    pub fn from_toml_str(s: &str) -> Result<Self, SetupError> {
        let rules: Rules = toml::from_str(s)?;
        rules.check()?;
        Ok(rules)
    }

    /// Combat modifiers are fractions of inflicted damage.
    pub fn check(&self) -> Result<(), SetupError> {
        let bonuses = self.defense_bonuses.iter().map(|(t, v)| (format!("{t:?}"), *v));
        let contexts = self.context_modifiers.iter().map(|(c, v)| (c.to_string(), *v));
        for (key, value) in bonuses.chain(contexts) {
            if !(-1.0..=1.0).contains(&value) {
                return Err(SetupError::ModifierOutOfRange { key, value });
            }
        }
        Ok(())
    }

    pub fn terrain_penalty(&self, src: Terrain, dst: Terrain) -> i32 {
        self.terrain_penalties
            .get(&src)
            .and_then(|row| row.get(&dst))
            .map_or(0, |p| p.movement_penalty)
    }

    pub fn defense_bonus(&self, terrain: Terrain) -> CombatModifier {
        self.defense_bonuses.get(&terrain).copied().unwrap_or(0.0)
    }

    pub fn context_modifier(&self, context: Context) -> CombatModifier {
        self.context_modifiers.get(&context).copied().unwrap_or(0.0)
    }
}
