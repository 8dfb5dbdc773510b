// ═══════════════════════════════════════════════════════════════════════
// Core types — armies, orders, events, battles
// ═══════════════════════════════════════════════════════════════════════

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ── Identifiers ────────────────────────────────────────────────────────
// Symbolic ids straight from the scenario file. Ordered so that every map
// keyed by them iterates deterministically.

macro_rules! string_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                $name(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.pad(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name(s.to_string())
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(ArmyId);
string_id!(RegionId);
string_id!(HouseId);

// ── Enums ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Terrain {
    #[default]
    #[serde(alias = "PLAIN")]
    Plain,
    #[serde(alias = "HILL")]
    Hill,
    #[serde(alias = "FOREST")]
    Forest,
    #[serde(alias = "MOUNTAIN")]
    Mountain,
}

impl Terrain {
    pub const ALL: [Terrain; 4] = [Terrain::Plain, Terrain::Hill, Terrain::Forest, Terrain::Mountain];
}

/// Context of a march order, and of the event it resolves into.
/// The last five variants only ever appear on events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Context {
    #[serde(alias = "march")]
    March,
    #[serde(alias = "attack")]
    Attack,
    #[serde(alias = "retreat")]
    Retreat,
    #[serde(alias = "redirect_attack")]
    RedirectAttack,
    #[serde(alias = "cancel_neutral_present")]
    CancelNeutralPresent,
    #[serde(alias = "strategic_retreat")]
    StrategicRetreat,
    #[serde(alias = "attack_pursuit")]
    AttackPursuit,
    #[serde(alias = "caught_attack")]
    CaughtAttack,
    #[serde(alias = "surprise_attack")]
    SurpriseAttack,
    #[serde(alias = "surprise_retreat")]
    SurpriseRetreat,
}

impl Context {
    /// Whether the order expresses intent to fight whoever holds the destination.
    pub fn is_hostile_intent(self) -> bool {
        matches!(self, Context::Attack | Context::Retreat | Context::RedirectAttack)
    }
}

impl std::fmt::Display for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Context::March => "MARCH",
            Context::Attack => "ATTACK",
            Context::Retreat => "RETREAT",
            Context::RedirectAttack => "REDIRECT_ATTACK",
            Context::CancelNeutralPresent => "CANCEL_NEUTRAL_PRESENT",
            Context::StrategicRetreat => "STRATEGIC_RETREAT",
            Context::AttackPursuit => "ATTACK_PURSUIT",
            Context::CaughtAttack => "CAUGHT_ATTACK",
            Context::SurpriseAttack => "SURPRISE_ATTACK",
            Context::SurpriseRetreat => "SURPRISE_RETREAT",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CombatState {
    #[default]
    None,
    Engaged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DefenseState {
    #[default]
    None,
    Defended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SupplyStatus {
    #[default]
    Supplied,
    CutOff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CombatOutcome {
    Destroyed,
    Routed,
    Defeated,
    Draw,
}

impl std::fmt::Display for CombatOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CombatOutcome::Destroyed => write!(f, "DESTROYED"),
            CombatOutcome::Routed => write!(f, "ROUTED"),
            CombatOutcome::Defeated => write!(f, "DEFEATED"),
            CombatOutcome::Draw => write!(f, "DRAW"),
        }
    }
}

/// Fractional weight applied to inflicted damage: `inflicted += inflicted * w`.
pub type CombatModifier = f32;

// ── Army ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Army {
    pub id: ArmyId,
    pub name: String,
    pub house: HouseId,
    pub morale: u32,
    pub size: u32,
    pub quality: u32,
    pub combat_state: CombatState,
    pub defense_state: DefenseState,
    pub supply: SupplyStatus,
    pub region: RegionId,
    pub home: RegionId,
}

impl Army {
    /// Derived fighting value; never stored.
    pub fn strength(&self) -> u32 {
        self.size.saturating_mul(self.quality).saturating_add(self.morale)
    }

    pub fn is_destroyed(&self) -> bool {
        self.size == 0
    }

    pub fn in_combat(&self) -> bool {
        self.combat_state == CombatState::Engaged
    }

    /// Engagement is one-way within a turn.
    pub fn set_in_combat(&mut self) {
        self.combat_state = CombatState::Engaged;
    }

    pub fn defending(&self) -> bool {
        self.defense_state == DefenseState::Defended
    }

    pub fn set_defending(&mut self) {
        self.defense_state = DefenseState::Defended;
    }

    pub fn is_cut_off(&self) -> bool {
        self.supply == SupplyStatus::CutOff
    }
}

/// The army store: id → army, iterated in id order.
pub type Armies = BTreeMap<ArmyId, Army>;

/// Live armies standing in a region, in id order.
pub fn armies_within<'a>(armies: &'a Armies, region: &'a RegionId) -> impl Iterator<Item = &'a Army> + 'a {
    armies.values().filter(move |a| &a.region == region && !a.is_destroyed())
}

// ── Orders & events ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarchOrder {
    pub army: ArmyId,
    pub src: RegionId,
    pub dst: RegionId,
    #[serde(default = "default_context")]
    pub context: Context,
}

fn default_context() -> Context {
    Context::March
}

impl MarchOrder {
    pub fn new(army: impl Into<String>, src: impl Into<String>, dst: impl Into<String>, context: Context) -> Self {
        MarchOrder {
            army: ArmyId::new(army),
            src: RegionId::new(src),
            dst: RegionId::new(dst),
            context,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarchEvent {
    pub army: ArmyId,
    pub src: RegionId,
    pub dst: RegionId,
    pub context: Context,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatEvent {
    /// The army the outcome happened to (for DRAW, the attacker).
    pub target: ArmyId,
    pub by: ArmyId,
    pub outcome: CombatOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TurnEvent {
    March(MarchEvent),
    Combat(CombatEvent),
}

/// Two armies locked together for exactly one round of combat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Battle {
    pub attacker: ArmyId,
    pub defender: ArmyId,
    pub context: Context,
}

impl Battle {
    pub fn new(attacker: ArmyId, defender: ArmyId, context: Context) -> Self {
        Battle { attacker, defender, context }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelReason {
    /// The army was already fighting when its order came up.
    AlreadyEngaged,
    /// A neutral army holds the destination.
    NeutralPresent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelledOrder {
    pub order: MarchOrder,
    pub reason: CancelReason,
}

/// Everything one resolved turn produced, in resolution order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnReport {
    pub events: Vec<TurnEvent>,
    pub battles: Vec<Battle>,
    pub cancelled: Vec<CancelledOrder>,
}

impl TurnReport {
    pub fn march_events(&self) -> impl Iterator<Item = &MarchEvent> {
        self.events.iter().filter_map(|e| match e {
            TurnEvent::March(m) => Some(m),
            TurnEvent::Combat(_) => None,
        })
    }

    pub fn combat_events(&self) -> impl Iterator<Item = &CombatEvent> {
        self.events.iter().filter_map(|e| match e {
            TurnEvent::Combat(c) => Some(c),
            TurnEvent::March(_) => None,
        })
    }
}
