// ═══════════════════════════════════════════════════════════════════════
// Diplomacy — houses and the relation held between each pair of them
// ═══════════════════════════════════════════════════════════════════════

use crate::types::HouseId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What the houses have publicly declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OfficialStatus {
    #[serde(alias = "ALLIED")]
    Allied,
    #[serde(alias = "ENEMY")]
    Enemy,
    #[default]
    #[serde(alias = "NEUTRAL")]
    Neutral,
}

/// How the houses actually feel about each other. Informational only;
/// combat and arbitration read the official status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RelationStatus {
    #[serde(alias = "FRIENDLY")]
    Friendly,
    #[serde(alias = "HATRED")]
    Hatred,
    #[default]
    #[serde(alias = "UNKNOWN")]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Relation {
    #[serde(default)]
    pub official_status: OfficialStatus,
    #[serde(default)]
    pub relation_status: RelationStatus,
}

impl Relation {
    pub fn new(official_status: OfficialStatus, relation_status: RelationStatus) -> Self {
        Relation { official_status, relation_status }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct House {
    pub id: HouseId,
    pub name: String,
}

/// Relation table shared by both houses of a pair: setting a→b also sets b→a.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiplomacyTable {
    houses: BTreeMap<HouseId, House>,
    relations: BTreeMap<(HouseId, HouseId), Relation>,
}

fn pair_key(a: &HouseId, b: &HouseId) -> (HouseId, HouseId) {
    if a <= b {
        (a.clone(), b.clone())
    } else {
        (b.clone(), a.clone())
    }
}

impl DiplomacyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_house(&mut self, id: HouseId, name: impl Into<String>) {
        let name = name.into();
        self.houses.insert(id.clone(), House { id, name });
    }

    pub fn house(&self, id: &HouseId) -> Option<&House> {
        self.houses.get(id)
    }

    pub fn houses(&self) -> impl Iterator<Item = &House> {
        self.houses.values()
    }

    pub fn contains(&self, id: &HouseId) -> bool {
        self.houses.contains_key(id)
    }

    pub fn set_relation(&mut self, a: &HouseId, b: &HouseId, relation: Relation) {
        if a == b {
            return;
        }
        self.relations.insert(pair_key(a, b), relation);
    }

    /// Undeclared pairs are neutral strangers; a house is its own ally.
    pub fn relation(&self, a: &HouseId, b: &HouseId) -> Relation {
        if a == b {
            return Relation::new(OfficialStatus::Allied, RelationStatus::Friendly);
        }
        self.relations.get(&pair_key(a, b)).copied().unwrap_or_default()
    }

    pub fn is_enemy(&self, a: &HouseId, b: &HouseId) -> bool {
        self.relation(a, b).official_status == OfficialStatus::Enemy
    }

    pub fn is_ally(&self, a: &HouseId, b: &HouseId) -> bool {
        self.relation(a, b).official_status == OfficialStatus::Allied
    }

    /// Houses officially at war with `house`, in id order.
    pub fn enemies_of<'a>(&'a self, house: &'a HouseId) -> impl Iterator<Item = &'a HouseId> + 'a {
        self.houses.keys().filter(move |other| self.is_enemy(house, other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> DiplomacyTable {
        let mut d = DiplomacyTable::new();
        d.add_house(HouseId::from("stark"), "House Stark");
        d.add_house(HouseId::from("lannister"), "House Lannister");
        d.add_house(HouseId::from("tully"), "House Tully");
        d.set_relation(
            &HouseId::from("lannister"),
            &HouseId::from("stark"),
            Relation::new(OfficialStatus::Enemy, RelationStatus::Hatred),
        );
        d.set_relation(
            &HouseId::from("stark"),
            &HouseId::from("tully"),
            Relation::new(OfficialStatus::Allied, RelationStatus::Friendly),
        );
        d
    }

    #[test]
    fn test_relation_is_shared_by_the_pair() {
        let d = table();
        let s = HouseId::from("stark");
        let l = HouseId::from("lannister");
        assert!(d.is_enemy(&s, &l));
        assert!(d.is_enemy(&l, &s));
        assert_eq!(d.relation(&s, &l).relation_status, RelationStatus::Hatred);
    }

    #[test]
    fn test_same_house_is_allied() {
        let d = table();
        let s = HouseId::from("stark");
        assert!(d.is_ally(&s, &s));
        assert!(!d.is_enemy(&s, &s));
    }

    #[test]
    fn test_undeclared_pair_is_neutral() {
        let d = table();
        let l = HouseId::from("lannister");
        let t = HouseId::from("tully");
        assert!(!d.is_ally(&l, &t));
        assert!(!d.is_enemy(&l, &t));
        assert_eq!(d.relation(&l, &t), Relation::default());
    }

    #[test]
    fn test_enemies_of() {
        let d = table();
        let s = HouseId::from("stark");
        let enemies: Vec<&str> = d.enemies_of(&s).map(|h| h.as_str()).collect();
        assert_eq!(enemies, vec!["lannister"]);
    }

    #[test]
    fn test_relation_can_be_replaced() {
        let mut d = table();
        let s = HouseId::from("stark");
        let l = HouseId::from("lannister");
        d.set_relation(&s, &l, Relation::new(OfficialStatus::Neutral, RelationStatus::Unknown));
        assert!(!d.is_enemy(&l, &s));
    }
}
