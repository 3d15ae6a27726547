use serde::{Deserialize, Serialize};

/// Identifier for an unlockable area of the hub (e.g. "central-plaza").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AreaId(pub String);

impl AreaId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AreaId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl std::fmt::Display for AreaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier for a collectible item (e.g. "elemental-crystal").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier for an objective. The set of objectives is fixed at startup;
/// ids are never added or removed at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectiveId(pub String);

impl ObjectiveId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ObjectiveId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl std::fmt::Display for ObjectiveId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Tag attached to every physics body at creation.
///
/// Overlap handlers match on this exhaustively to decide what an
/// intersection means, instead of inspecting opaque user data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyTag {
    /// The player capsule.
    Player,
    /// A teleporter door sensor; unlocks `area` when activated.
    Teleporter { area: AreaId },
    /// A collectible sensor; adds `item` to the inventory when touched.
    Crystal { item: ItemId },
    /// Static scenery with no gameplay effect (terrain, rocks).
    Scenery,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn area_id_from_str() {
        let id = AreaId::from("central-plaza");
        assert_eq!(id.as_str(), "central-plaza");
        assert_eq!(id.to_string(), "central-plaza");
    }

    #[test]
    fn ids_are_ordered() {
        let mut set = BTreeSet::new();
        set.insert(AreaId::from("sky-garden"));
        set.insert(AreaId::from("central-plaza"));
        set.insert(AreaId::from("central-plaza"));

        let ordered: Vec<&str> = set.iter().map(|a| a.as_str()).collect();
        assert_eq!(ordered, vec!["central-plaza", "sky-garden"]);
    }

    #[test]
    fn body_tag_distinguishes_doors() {
        let tag = BodyTag::Teleporter {
            area: AreaId::from("crystal-cavern"),
        };
        match tag {
            BodyTag::Teleporter { area } => assert_eq!(area.as_str(), "crystal-cavern"),
            _ => panic!("wrong tag"),
        }
    }
}
