use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ParseError;

/// Workers are numbered from 1 in the order they are put on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Worker(pub u8);

/// Mechs are numbered from 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Mech(pub u8);

/// Anything a player can place on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Unit {
    Character,
    Worker(Worker),
    Mech(Mech),
}

impl Unit {
    pub const fn as_worker(self) -> Option<Worker> {
        match self {
            Unit::Worker(worker) => Some(worker),
            _ => None,
        }
    }

    pub const fn as_mech(self) -> Option<Mech> {
        match self {
            Unit::Mech(mech) => Some(mech),
            _ => None,
        }
    }
}

impl From<Worker> for Unit {
    fn from(worker: Worker) -> Self {
        Unit::Worker(worker)
    }
}

impl From<Mech> for Unit {
    fn from(mech: Mech) -> Self {
        Unit::Mech(mech)
    }
}

fn parse_numbered(s: &str, prefix: &str, kind: &'static str) -> Result<u8, ParseError> {
    s.strip_prefix(prefix)
        .and_then(|n| n.parse::<u8>().ok())
        .filter(|n| *n > 0)
        .ok_or_else(|| ParseError::Unknown {
            kind,
            value: s.to_string(),
        })
}

impl fmt::Display for Worker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WORKER_{}", self.0)
    }
}

impl FromStr for Worker {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_numbered(s, "WORKER_", "worker").map(Worker)
    }
}

impl fmt::Display for Mech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MECH_{}", self.0)
    }
}

impl FromStr for Mech {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_numbered(s, "MECH_", "mech").map(Mech)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Character => f.write_str("CHARACTER"),
            Unit::Worker(worker) => worker.fmt(f),
            Unit::Mech(mech) => mech.fmt(f),
        }
    }
}

impl FromStr for Unit {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "CHARACTER" {
            return Ok(Unit::Character);
        }
        if s.starts_with("WORKER_") {
            return s.parse().map(Unit::Worker);
        }
        if s.starts_with("MECH_") {
            return s.parse().map(Unit::Mech);
        }
        Err(ParseError::Unknown {
            kind: "unit",
            value: s.to_string(),
        })
    }
}

macro_rules! string_wire_form {
    ($($ty:ty),+) => {
        $(
            impl TryFrom<String> for $ty {
                type Error = ParseError;

                fn try_from(value: String) -> Result<Self, Self::Error> {
                    value.parse()
                }
            }

            impl From<$ty> for String {
                fn from(value: $ty) -> Self {
                    value.to_string()
                }
            }
        )+
    };
}

string_wire_form!(Worker, Mech, Unit);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn units_display_like_board_labels() {
        assert_eq!(Unit::Character.to_string(), "CHARACTER");
        assert_eq!(Unit::Worker(Worker(3)).to_string(), "WORKER_3");
        assert_eq!(Unit::Mech(Mech(1)).to_string(), "MECH_1");
    }

    #[test]
    fn units_parse_back() {
        assert_eq!("WORKER_8".parse::<Unit>(), Ok(Unit::Worker(Worker(8))));
        assert_eq!("MECH_4".parse::<Unit>(), Ok(Unit::Mech(Mech(4))));
        assert!("WORKER_0".parse::<Unit>().is_err());
        assert!("WORKER_x".parse::<Unit>().is_err());
        assert!("HORSE".parse::<Unit>().is_err());
    }

    #[test]
    fn units_serialize_as_strings() {
        let json = serde_json::to_string(&Unit::Mech(Mech(2))).expect("encode");
        assert_eq!(json, "\"MECH_2\"");
        let unit: Unit = serde_json::from_str("\"CHARACTER\"").expect("decode");
        assert_eq!(unit, Unit::Character);
    }
}
