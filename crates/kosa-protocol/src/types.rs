use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Field;

/// Failure to read one of the named domain values from text.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown {kind}: {value}")]
    Unknown { kind: &'static str, value: String },
}

/// Closed enums whose wire form is their upper-case (or faction/mat lower-case) name.
macro_rules! named_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $label:literal {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "&'static str")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub const fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $name {
            type Err = ParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    _ => Err(ParseError::Unknown {
                        kind: $label,
                        value: s.to_string(),
                    }),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = ParseError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$name> for &'static str {
            fn from(value: $name) -> Self {
                value.name()
            }
        }
    };
}

named_enum! {
    ResourceKind, "resource kind" {
        Metal => "METAL",
        Food => "FOOD",
        Oil => "OIL",
        Wood => "WOOD",
    }
}

named_enum! {
    Terrain, "terrain" {
        Mountain => "MOUNTAIN",
        Farm => "FARM",
        Tundra => "TUNDRA",
        Forest => "FOREST",
        Village => "VILLAGE",
        Lake => "LAKE",
        Factory => "FACTORY",
        Homebase => "HOMEBASE",
    }
}

impl Terrain {
    /// Resource a worker produces on this terrain. Villages recruit workers instead.
    pub const fn produces(self) -> Option<ResourceKind> {
        match self {
            Terrain::Mountain => Some(ResourceKind::Metal),
            Terrain::Farm => Some(ResourceKind::Food),
            Terrain::Tundra => Some(ResourceKind::Oil),
            Terrain::Forest => Some(ResourceKind::Wood),
            Terrain::Village | Terrain::Lake | Terrain::Factory | Terrain::Homebase => None,
        }
    }
}

named_enum! {
    /// Primary actions, the top row of a player mat.
    TopAction, "top action" {
        Bolster => "BOLSTER",
        Produce => "PRODUCE",
        Move => "MOVE",
        Trade => "TRADE",
    }
}

named_enum! {
    /// Secondary actions, the bottom row of a player mat.
    BottomAction, "bottom action" {
        Upgrade => "UPGRADE",
        Deploy => "DEPLOY",
        Build => "BUILD",
        Enlist => "ENLIST",
    }
}

impl BottomAction {
    /// Every secondary action is paid in one fixed resource kind.
    pub const fn cost_kind(self) -> ResourceKind {
        match self {
            BottomAction::Upgrade => ResourceKind::Oil,
            BottomAction::Deploy => ResourceKind::Metal,
            BottomAction::Build => ResourceKind::Wood,
            BottomAction::Enlist => ResourceKind::Food,
        }
    }
}

/// An action category: either a primary (top) or a secondary (bottom) action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Action {
    Top(TopAction),
    Bottom(BottomAction),
}

impl Action {
    pub fn all() -> impl Iterator<Item = Action> {
        TopAction::ALL
            .iter()
            .copied()
            .map(Action::Top)
            .chain(BottomAction::ALL.iter().copied().map(Action::Bottom))
    }

    pub const fn is_top(self) -> bool {
        matches!(self, Action::Top(_))
    }

    pub const fn is_bottom(self) -> bool {
        matches!(self, Action::Bottom(_))
    }
}

impl From<TopAction> for Action {
    fn from(action: TopAction) -> Self {
        Action::Top(action)
    }
}

impl From<BottomAction> for Action {
    fn from(action: BottomAction) -> Self {
        Action::Bottom(action)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Top(top) => top.fmt(f),
            Action::Bottom(bottom) => bottom.fmt(f),
        }
    }
}

impl FromStr for Action {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(top) = s.parse::<TopAction>() {
            return Ok(Action::Top(top));
        }
        if let Ok(bottom) = s.parse::<BottomAction>() {
            return Ok(Action::Bottom(bottom));
        }
        Err(ParseError::Unknown {
            kind: "action",
            value: s.to_string(),
        })
    }
}

impl TryFrom<String> for Action {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Action> for String {
    fn from(action: Action) -> Self {
        action.to_string()
    }
}

named_enum! {
    BuildingKind, "building" {
        Armory => "ARMORY",
        Mill => "MILL",
        Mine => "MINE",
        Monument => "MONUMENT",
    }
}

named_enum! {
    RecruitReward, "recruit reward" {
        Power => "POWER",
        Coins => "COINS",
        Popularity => "POPULARITY",
        CombatCards => "COMBAT_CARDS",
    }
}

named_enum! {
    /// Milestones, in the order they are checked and handed out.
    Star, "star" {
        AllUpgrades => "ALL_UPGRADES",
        AllMechs => "ALL_MECHS",
        AllBuildings => "ALL_BUILDINGS",
        AllRecruits => "ALL_RECRUITS",
        AllWorkers => "ALL_WORKERS",
        Objective => "OBJECTIVE",
        FirstCombatWin => "FIRST_COMBAT_WIN",
        SecondCombatWin => "SECOND_COMBAT_WIN",
        MaxPopularity => "MAX_POPULARITY",
        MaxPower => "MAX_POWER",
    }
}

named_enum! {
    Faction, "faction" {
        Black => "black",
        Red => "red",
        Blue => "blue",
        Yellow => "yellow",
        White => "white",
        Purple => "purple",
        Green => "green",
    }
}

named_enum! {
    MatKind, "player mat" {
        Industrial => "industrial",
        Engineering => "engineering",
        Militant => "militant",
        Patriotic => "patriotic",
        Innovative => "innovative",
        Mechanical => "mechanical",
        Agricultural => "agricultural",
    }
}

/// A combat card in a player's hand; only its value matters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CombatCard(pub u8);

/// One resource token lying on a board field.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Resource {
    pub location: Field,
    pub kind: ResourceKind,
}

impl Resource {
    pub fn new(location: Field, kind: ResourceKind) -> Self {
        Self { location, kind }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.location, self.kind)
    }
}

/// A structure on the board, attributed to whoever built it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Building {
    pub kind: BuildingKind,
    pub location: Field,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for star in Star::ALL {
            assert_eq!(star.name().parse::<Star>(), Ok(*star));
        }
        for faction in Faction::ALL {
            assert_eq!(faction.to_string().parse::<Faction>(), Ok(*faction));
        }
        assert!("orange".parse::<Faction>().is_err());
    }

    #[test]
    fn actions_parse_from_either_row() {
        assert_eq!("MOVE".parse::<Action>(), Ok(Action::Top(TopAction::Move)));
        assert_eq!("ENLIST".parse::<Action>(), Ok(Action::Bottom(BottomAction::Enlist)));
        assert!(matches!(
            "DANCE".parse::<Action>(),
            Err(ParseError::Unknown { kind: "action", .. })
        ));
        assert_eq!(Action::all().count(), 8);
    }

    #[test]
    fn enums_use_their_names_on_the_wire() {
        let json = serde_json::to_string(&Star::MaxPower).expect("encode");
        assert_eq!(json, "\"MAX_POWER\"");
        let kind: ResourceKind = serde_json::from_str("\"WOOD\"").expect("decode");
        assert_eq!(kind, ResourceKind::Wood);
        let action: Action = serde_json::from_str("\"BUILD\"").expect("decode");
        assert_eq!(action, Action::Bottom(BottomAction::Build));
    }

    #[test]
    fn resource_displays_location_and_kind() {
        let resource = Resource::new(Field::new("t8", Terrain::Tundra), ResourceKind::Wood);
        assert_eq!(resource.to_string(), "t8:TUNDRA:WOOD");
    }

    #[test]
    fn secondary_costs_and_production() {
        assert_eq!(BottomAction::Build.cost_kind(), ResourceKind::Wood);
        assert_eq!(BottomAction::Upgrade.cost_kind(), ResourceKind::Oil);
        assert_eq!(Terrain::Tundra.produces(), Some(ResourceKind::Oil));
        assert_eq!(Terrain::Village.produces(), None);
    }
}
