//! Engine configuration
//!
//! All numeric thresholds of the progression rules live here: the level
//! curve, streak bonus bands, tier multipliers, reward tiers and the daily
//! login grant. The *shape* of the rules (fixed-step curve, step function,
//! multiplicative composition with a single rounding) is fixed in code;
//! the numbers are product knobs, loadable from `~/.mentora/config.toml`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::{RewardTier, SubscriptionTier};

/// Top-level configuration for the progression engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressionConfig {
    #[serde(default)]
    pub levels: LevelCurve,

    #[serde(default)]
    pub streak: StreakConfig,

    #[serde(default)]
    pub multipliers: MultiplierConfig,

    /// Referral milestones, ordered by threshold
    #[serde(default = "default_reward_tiers")]
    pub reward_tiers: Vec<RewardTier>,

    /// Base XP for the once-per-day login grant
    #[serde(default = "default_daily_login_xp")]
    pub daily_login_xp: i64,
}

/// Fixed-step level curve with a title ladder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelCurve {
    /// XP per level; level = total_xp / step + 1
    #[serde(default = "default_xp_per_level")]
    pub xp_per_level: i64,

    /// Titles by minimum level, ordered ascending
    #[serde(default = "default_titles")]
    pub titles: Vec<LevelTitle>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelTitle {
    pub min_level: u32,
    pub title: String,
}

impl LevelCurve {
    /// Title for a level: the highest ladder entry at or below it
    pub fn title_for(&self, level: u32) -> &str {
        self.titles
            .iter()
            .rev()
            .find(|t| level >= t.min_level)
            .map(|t| t.title.as_str())
            .unwrap_or("Learner")
    }
}

/// Streak bonus bands: no bonus below the first band, then a step function
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakConfig {
    /// Bands ordered by `min_days` ascending; the highest band at or below
    /// the streak count applies
    #[serde(default = "default_streak_bands")]
    pub bands: Vec<StreakBand>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakBand {
    pub min_days: u32,
    pub bonus: f64,
}

impl StreakConfig {
    /// Streak bonus multiplier for a streak count (1.0 below the first band)
    pub fn bonus_for(&self, streak_count: u32) -> f64 {
        self.bands
            .iter()
            .rev()
            .find(|b| streak_count >= b.min_days)
            .map(|b| b.bonus)
            .unwrap_or(1.0)
    }
}

/// XP multiplier per subscription tier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiplierConfig {
    #[serde(default = "default_free_multiplier")]
    pub free: f64,
    #[serde(default = "default_plus_multiplier")]
    pub plus: f64,
    #[serde(default = "default_pro_multiplier")]
    pub pro: f64,
    #[serde(default = "default_max_multiplier")]
    pub max: f64,
    #[serde(default = "default_ultra_multiplier")]
    pub ultra: f64,
}

impl MultiplierConfig {
    pub fn for_tier(&self, tier: SubscriptionTier) -> f64 {
        match tier {
            SubscriptionTier::Free => self.free,
            SubscriptionTier::Plus => self.plus,
            SubscriptionTier::Pro => self.pro,
            SubscriptionTier::Max => self.max,
            SubscriptionTier::Ultra => self.ultra,
        }
    }
}

impl ProgressionConfig {
    /// Load configuration from a TOML file, or defaults if the file does
    /// not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        Ok(config)
    }

    /// Default config file location (~/.mentora/config.toml)
    pub fn default_path() -> PathBuf {
        data_dir().join("config.toml")
    }

    /// Look up a reward tier by id
    pub fn reward_tier(&self, tier_id: &str) -> Option<&RewardTier> {
        self.reward_tiers.iter().find(|t| t.id == tier_id)
    }
}

/// Application data directory (~/.mentora)
pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".mentora")
}

fn default_xp_per_level() -> i64 {
    100
}

fn default_titles() -> Vec<LevelTitle> {
    let ladder = [
        (1, "Newcomer"),
        (3, "Learner"),
        (6, "Scholar"),
        (10, "Achiever"),
        (15, "Expert"),
        (25, "Sage"),
        (40, "Luminary"),
    ];
    ladder
        .iter()
        .map(|(min_level, title)| LevelTitle {
            min_level: *min_level,
            title: title.to_string(),
        })
        .collect()
}

fn default_streak_bands() -> Vec<StreakBand> {
    vec![
        StreakBand {
            min_days: 3,
            bonus: 1.1,
        },
        StreakBand {
            min_days: 5,
            bonus: 1.2,
        },
        StreakBand {
            min_days: 7,
            bonus: 1.3,
        },
    ]
}

fn default_reward_tiers() -> Vec<RewardTier> {
    vec![
        RewardTier {
            id: "referrals_5".to_string(),
            threshold: 5,
            bonus_coins: 20,
        },
        RewardTier {
            id: "referrals_10".to_string(),
            threshold: 10,
            bonus_coins: 50,
        },
        RewardTier {
            id: "referrals_25".to_string(),
            threshold: 25,
            bonus_coins: 150,
        },
    ]
}

fn default_daily_login_xp() -> i64 {
    10
}

fn default_free_multiplier() -> f64 {
    1.0
}

fn default_plus_multiplier() -> f64 {
    1.1
}

fn default_pro_multiplier() -> f64 {
    1.25
}

fn default_max_multiplier() -> f64 {
    1.5
}

fn default_ultra_multiplier() -> f64 {
    2.0
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            levels: LevelCurve::default(),
            streak: StreakConfig::default(),
            multipliers: MultiplierConfig::default(),
            reward_tiers: default_reward_tiers(),
            daily_login_xp: default_daily_login_xp(),
        }
    }
}

impl Default for LevelCurve {
    fn default() -> Self {
        Self {
            xp_per_level: default_xp_per_level(),
            titles: default_titles(),
        }
    }
}

impl Default for StreakConfig {
    fn default() -> Self {
        Self {
            bands: default_streak_bands(),
        }
    }
}

impl Default for MultiplierConfig {
    fn default() -> Self {
        Self {
            free: default_free_multiplier(),
            plus: default_plus_multiplier(),
            pro: default_pro_multiplier(),
            max: default_max_multiplier(),
            ultra: default_ultra_multiplier(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_streak_bonus_bands() {
        let config = StreakConfig::default();
        assert_eq!(config.bonus_for(0), 1.0);
        assert_eq!(config.bonus_for(2), 1.0);
        assert_eq!(config.bonus_for(3), 1.1);
        assert_eq!(config.bonus_for(4), 1.1);
        assert_eq!(config.bonus_for(5), 1.2);
        assert_eq!(config.bonus_for(7), 1.3);
        assert_eq!(config.bonus_for(100), 1.3);
    }

    #[test]
    fn test_title_ladder() {
        let curve = LevelCurve::default();
        assert_eq!(curve.title_for(1), "Newcomer");
        assert_eq!(curve.title_for(2), "Newcomer");
        assert_eq!(curve.title_for(3), "Learner");
        assert_eq!(curve.title_for(99), "Luminary");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ProgressionConfig = toml::from_str(
            r#"
            daily_login_xp = 25

            [levels]
            xp_per_level = 250
            "#,
        )
        .unwrap();

        assert_eq!(config.daily_login_xp, 25);
        assert_eq!(config.levels.xp_per_level, 250);
        // Everything else falls back to defaults
        assert_eq!(config.multipliers.pro, 1.25);
        assert_eq!(config.reward_tiers.len(), 3);
        assert_eq!(config.streak.bands.len(), 3);
    }

    #[test]
    fn test_reward_tier_lookup() {
        let config = ProgressionConfig::default();
        assert_eq!(config.reward_tier("referrals_5").unwrap().bonus_coins, 20);
        assert!(config.reward_tier("referrals_99").is_none());
    }
}
