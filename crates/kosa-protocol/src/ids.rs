use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Terrain;

/// Player ID is the seat index handed out at join time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u8);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {}", self.0)
    }
}

/// Field IDs are the short board names used in the YAML data (`m6`, `t8`, `F`, `black`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(pub String);

impl FieldId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A board location as it is recorded in events: the id together with its terrain.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Field {
    pub id: FieldId,
    pub terrain: Terrain,
}

impl Field {
    pub fn new(id: impl Into<String>, terrain: Terrain) -> Self {
        Self {
            id: FieldId::new(id),
            terrain,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.id, self.terrain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_displays_id_and_terrain() {
        let field = Field::new("m6", Terrain::Mountain);
        assert_eq!(field.to_string(), "m6:MOUNTAIN");
        assert_eq!(Field::new("black", Terrain::Homebase).to_string(), "black:HOMEBASE");
    }

    #[test]
    fn player_id_is_transparent_on_the_wire() {
        let json = serde_json::to_string(&PlayerId(3)).expect("encode");
        assert_eq!(json, "3");
    }
}
