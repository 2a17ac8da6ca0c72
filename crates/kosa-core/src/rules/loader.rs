use std::collections::BTreeMap;

use kosa_protocol::FieldId;
use thiserror::Error;

use crate::board::Board;
use crate::config::EngineConfig;
use crate::rules::{FactionSetup, PlayerMat, RawBoard, RawFactions, RawMats, Rules};

#[derive(Debug, Error)]
pub enum RulesError {
    #[error("yaml parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("missing referenced id: {0}")]
    MissingId(String),
    #[error("{from} lists {to} as a neighbour, but not the other way round")]
    AsymmetricEdge { from: String, to: String },
    #[error("river between {from} and {to}, which are not adjacent")]
    RiverWithoutEdge { from: String, to: String },
    #[error("player mat {0} must list every action in exactly one column")]
    InvalidMat(String),
    #[error("utf-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0} seats requested, but player ids only go up to {max}", max = u8::MAX)]
    TooManySeats(usize),
}

pub enum RulesSource<'a> {
    Embedded,
    /// Directory holding `board.yaml`, `mats.yaml`, `factions.yaml` and optionally `config.yaml`.
    Path(String),
    Bytes {
        board: &'a [u8],
        mats: &'a [u8],
        factions: &'a [u8],
        config: Option<&'a [u8]>,
    },
}

pub fn load_rules(source: RulesSource<'_>) -> Result<Rules, RulesError> {
    match source {
        RulesSource::Embedded => {
            let board_yaml = include_str!("../../data/board.yaml");
            let mats_yaml = include_str!("../../data/mats.yaml");
            let factions_yaml = include_str!("../../data/factions.yaml");
            parse_rules(board_yaml, mats_yaml, factions_yaml, None)
        }
        RulesSource::Path(path) => {
            let board_yaml = std::fs::read_to_string(format!("{path}/board.yaml"))?;
            let mats_yaml = std::fs::read_to_string(format!("{path}/mats.yaml"))?;
            let factions_yaml = std::fs::read_to_string(format!("{path}/factions.yaml"))?;
            let config_yaml = match std::fs::read_to_string(format!("{path}/config.yaml")) {
                Ok(yaml) => Some(yaml),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
                Err(e) => return Err(e.into()),
            };
            parse_rules(
                &board_yaml,
                &mats_yaml,
                &factions_yaml,
                config_yaml.as_deref(),
            )
        }
        RulesSource::Bytes {
            board,
            mats,
            factions,
            config,
        } => parse_rules(
            std::str::from_utf8(board)?,
            std::str::from_utf8(mats)?,
            std::str::from_utf8(factions)?,
            config.map(std::str::from_utf8).transpose()?,
        ),
    }
}

fn parse_rules(
    board_yaml: &str,
    mats_yaml: &str,
    factions_yaml: &str,
    config_yaml: Option<&str>,
) -> Result<Rules, RulesError> {
    let raw_board: RawBoard = serde_yaml::from_str(board_yaml)?;
    let raw_mats: RawMats = serde_yaml::from_str(mats_yaml)?;
    let raw_factions: RawFactions = serde_yaml::from_str(factions_yaml)?;
    let config = match config_yaml {
        Some(s) => serde_yaml::from_str(s)?,
        None => EngineConfig::default(),
    };

    let board = Board::new(
        raw_board.fields.into_iter().map(|(id, field)| {
            (
                FieldId(id),
                field.terrain,
                field.neighbours.into_iter().map(FieldId).collect(),
            )
        }),
        raw_board
            .rivers
            .into_iter()
            .map(|[a, b]| (FieldId(a), FieldId(b))),
    )?;

    let mats = raw_mats
        .mats
        .into_iter()
        .map(|(kind, raw)| PlayerMat::compile(kind, raw).map(|mat| (kind, mat)))
        .collect::<Result<BTreeMap<_, _>, _>>()?;

    let lookup = |id: &str| {
        board
            .get(id)
            .ok_or_else(|| RulesError::MissingId(id.to_string()))
    };
    let mut factions = BTreeMap::new();
    for (faction, raw) in raw_factions.factions {
        let home = lookup(&raw.home)?;
        let workers = raw
            .workers
            .iter()
            .map(|id| lookup(id))
            .collect::<Result<Vec<_>, _>>()?;
        factions.insert(
            faction,
            FactionSetup {
                faction,
                home,
                workers,
                power: raw.power,
                combat_cards: raw.combat_cards,
            },
        );
    }

    Ok(Rules {
        board,
        mats,
        factions,
        config,
    })
}
