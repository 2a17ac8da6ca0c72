//! Engine limits and scoring tables

use serde::{Deserialize, Serialize};

/// Numeric limits the command layer enforces.
///
/// Defaults match the printed game; a rules directory may override them in `config.yaml`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Power ceiling
    pub max_power: i32,
    /// Popularity ceiling
    pub max_popularity: i32,
    /// Workers a player can have on the board
    pub max_workers: u8,
    /// Mechs a player can have on the board
    pub max_mechs: u8,
    /// Produce costs one power from this many workers on
    pub produce_power_threshold: usize,
    /// Produce costs one popularity from this many workers on
    pub produce_popularity_threshold: usize,
    /// Produce costs one coin from this many workers on
    pub produce_coins_threshold: usize,
    /// Stars that end the game
    pub star_limit: usize,
    /// Buildings needed for the all-buildings star
    pub building_count: usize,
    /// Enlistments needed for the all-recruits star
    pub recruit_count: usize,
    /// Upgrades needed for the all-upgrades star
    pub upgrade_count: usize,
    /// Power gained by one bolster
    pub bolster_power: i32,
    /// Value of the combat card gained by one bolster
    pub combat_card_value: u8,
    /// Steps a unit may take in one move
    pub move_distance: u32,
    /// Popularity tiers, lowest first
    pub score_tiers: Vec<ScoreTier>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_power: 16,
            max_popularity: 18,
            max_workers: 8,
            max_mechs: 4,
            produce_power_threshold: 4,
            produce_popularity_threshold: 6,
            produce_coins_threshold: 8,
            star_limit: 6,
            building_count: 4,
            recruit_count: 4,
            upgrade_count: 6,
            bolster_power: 2,
            combat_card_value: 2,
            move_distance: 1,
            score_tiers: vec![
                ScoreTier::new(0, 3, 2, 1),
                ScoreTier::new(7, 4, 3, 2),
                ScoreTier::new(13, 5, 4, 3),
            ],
        }
    }
}

/// Coins awarded per scoring category once a player's popularity reaches `min_popularity`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTier {
    pub min_popularity: i32,
    pub per_star: i32,
    pub per_territory: i32,
    /// Paid for every two resources.
    pub per_resource_pair: i32,
}

impl ScoreTier {
    pub const fn new(
        min_popularity: i32,
        per_star: i32,
        per_territory: i32,
        per_resource_pair: i32,
    ) -> Self {
        Self {
            min_popularity,
            per_star,
            per_territory,
            per_resource_pair,
        }
    }
}

impl EngineConfig {
    /// Highest tier the popularity reaches; popularity below every tier gets the lowest.
    pub fn score_tier(&self, popularity: i32) -> ScoreTier {
        self.score_tiers
            .iter()
            .copied()
            .filter(|tier| popularity >= tier.min_popularity)
            .last()
            .or_else(|| self.score_tiers.first().copied())
            .unwrap_or(ScoreTier::new(0, 0, 0, 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn popularity_selects_tier() {
        let config = EngineConfig::default();
        assert_eq!(config.score_tier(0).per_star, 3);
        assert_eq!(config.score_tier(6).per_star, 3);
        assert_eq!(config.score_tier(7).per_territory, 3);
        assert_eq!(config.score_tier(12).per_resource_pair, 2);
        assert_eq!(config.score_tier(18), ScoreTier::new(13, 5, 4, 3));
        assert_eq!(config.score_tier(-2).per_star, 3);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config: EngineConfig = serde_yaml::from_str("max_power: 20\n").expect("parse");
        assert_eq!(config.max_power, 20);
        assert_eq!(config.max_popularity, 18);
        assert_eq!(config.score_tiers.len(), 3);
    }
}
