use serde::{Deserialize, Serialize};

use crate::{
    Action, BottomAction, BuildingKind, FieldId, Mech, RecruitReward, Resource, ResourceKind,
    TopAction, Unit, Worker,
};

/// One concrete, fully-specified move a player can make. Fully serializable.
///
/// The engine enumerates these for the current position and accepts any of them back.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ActionOption {
    // Move column
    Move { unit: Unit, destination: FieldId },
    GainCoins,

    // Bolster column
    BolsterPower,
    BolsterCombatCards,

    // Trade column
    TradeResources {
        worker: Worker,
        kind1: ResourceKind,
        kind2: ResourceKind,
    },
    TradePopularity,

    Produce { field1: FieldId, field2: FieldId },

    // Secondary actions, each paid with the listed resources
    Build {
        worker: Worker,
        building: BuildingKind,
        resources: Vec<Resource>,
    },
    Deploy {
        worker: Worker,
        mech: Mech,
        resources: Vec<Resource>,
    },
    Enlist {
        bottom: BottomAction,
        reward: RecruitReward,
        resources: Vec<Resource>,
    },
    Upgrade {
        top: TopAction,
        bottom: BottomAction,
        resources: Vec<Resource>,
    },
}

impl ActionOption {
    /// Action category this option is taken under.
    pub fn action(&self) -> Action {
        match self {
            ActionOption::Move { .. } | ActionOption::GainCoins => Action::Top(TopAction::Move),
            ActionOption::BolsterPower | ActionOption::BolsterCombatCards => {
                Action::Top(TopAction::Bolster)
            }
            ActionOption::TradeResources { .. } | ActionOption::TradePopularity => {
                Action::Top(TopAction::Trade)
            }
            ActionOption::Produce { .. } => Action::Top(TopAction::Produce),
            ActionOption::Build { .. } => Action::Bottom(BottomAction::Build),
            ActionOption::Deploy { .. } => Action::Bottom(BottomAction::Deploy),
            ActionOption::Enlist { .. } => Action::Bottom(BottomAction::Enlist),
            ActionOption::Upgrade { .. } => Action::Bottom(BottomAction::Upgrade),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gain_coins_is_a_move_action() {
        assert_eq!(ActionOption::GainCoins.action(), Action::Top(TopAction::Move));
        assert_eq!(
            ActionOption::TradePopularity.action(),
            Action::Top(TopAction::Trade)
        );
    }

    #[test]
    fn options_decode_from_client_json() {
        let json = r#"{"type":"Produce","field1":"m6","field2":"t8"}"#;
        let option: ActionOption = serde_json::from_str(json).expect("decode");
        assert_eq!(
            option,
            ActionOption::Produce {
                field1: FieldId::new("m6"),
                field2: FieldId::new("t8"),
            }
        );

        let json = r#"{"type":"TradeResources","worker":"WORKER_1","kind1":"WOOD","kind2":"OIL"}"#;
        let option: ActionOption = serde_json::from_str(json).expect("decode");
        assert!(matches!(
            option,
            ActionOption::TradeResources {
                worker: Worker(1),
                kind1: ResourceKind::Wood,
                kind2: ResourceKind::Oil,
            }
        ));
    }
}
