//! Achievement definitions and metadata
//!
//! All achievements are defined here with their unlock rules and XP
//! rewards.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::domain::XpSource;

/// Unique identifier for each achievement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AchievementId {
    // Milestones
    FirstSteps,
    Xp500,
    Xp1000,
    Xp5000,
    Level5,
    Level10,

    // Activity
    Conversationalist,
    ChatterBox,
    GameOn,
    Challenger,
    Bookworm,
    Collector,
    Quotable,
    Explorer,

    // Streaks
    OnFire,
    WeekWarrior,
    MonthlyMaster,

    // Social
    Ambassador,
    SuperAmbassador,
}

impl AchievementId {
    /// Get the string ID for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstSteps => "first_steps",
            Self::Xp500 => "xp_500",
            Self::Xp1000 => "xp_1000",
            Self::Xp5000 => "xp_5000",
            Self::Level5 => "level_5",
            Self::Level10 => "level_10",
            Self::Conversationalist => "conversationalist",
            Self::ChatterBox => "chatter_box",
            Self::GameOn => "game_on",
            Self::Challenger => "challenger",
            Self::Bookworm => "bookworm",
            Self::Collector => "collector",
            Self::Quotable => "quotable",
            Self::Explorer => "explorer",
            Self::OnFire => "on_fire",
            Self::WeekWarrior => "week_warrior",
            Self::MonthlyMaster => "monthly_master",
            Self::Ambassador => "ambassador",
            Self::SuperAmbassador => "super_ambassador",
        }
    }

    /// Parse from a database string
    pub fn parse(s: &str) -> Option<Self> {
        ACHIEVEMENT_INDEX.get(s).map(|a| a.id)
    }
}

/// Catalog keyed by storage tag
static ACHIEVEMENT_INDEX: Lazy<HashMap<&'static str, &'static Achievement>> =
    Lazy::new(|| ACHIEVEMENTS.iter().map(|a| (a.id.as_str(), a)).collect());

/// Achievement category for grouping in UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AchievementCategory {
    Milestone,
    Activity,
    Streak,
    Social,
}

impl AchievementCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Milestone => "Milestones",
            Self::Activity => "Activities",
            Self::Streak => "Streaks",
            Self::Social => "Social",
        }
    }
}

/// Declarative unlock condition over a user's aggregate stats
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnlockRule {
    TotalXpAtLeast(i64),
    LevelAtLeast(u32),
    /// Applies to the live streak, so a lapsed streak cannot unlock it
    StreakAtLeast(u32),
    SourceCountAtLeast(XpSource, u64),
    SourceXpAtLeast(XpSource, i64),
    DistinctSourcesAtLeast(u64),
    ReferralsAtLeast(u32),
}

/// Achievement definition with all metadata
#[derive(Debug, Clone)]
pub struct Achievement {
    pub id: AchievementId,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub category: AchievementCategory,
    pub xp_reward: i64,
    pub rule: UnlockRule,
}

/// All achievement definitions
pub static ACHIEVEMENTS: &[Achievement] = &[
    // === MILESTONES ===
    Achievement {
        id: AchievementId::FirstSteps,
        name: "First Steps",
        description: "Earn your first XP",
        icon: "🎯",
        category: AchievementCategory::Milestone,
        xp_reward: 10,
        rule: UnlockRule::TotalXpAtLeast(1),
    },
    Achievement {
        id: AchievementId::Xp500,
        name: "Getting Somewhere",
        description: "Reach 500 XP",
        icon: "📈",
        category: AchievementCategory::Milestone,
        xp_reward: 25,
        rule: UnlockRule::TotalXpAtLeast(500),
    },
    Achievement {
        id: AchievementId::Xp1000,
        name: "Dedicated",
        description: "Reach 1,000 XP",
        icon: "💪",
        category: AchievementCategory::Milestone,
        xp_reward: 50,
        rule: UnlockRule::TotalXpAtLeast(1000),
    },
    Achievement {
        id: AchievementId::Xp5000,
        name: "Scholar's Path",
        description: "Reach 5,000 XP",
        icon: "🏆",
        category: AchievementCategory::Milestone,
        xp_reward: 150,
        rule: UnlockRule::TotalXpAtLeast(5000),
    },
    Achievement {
        id: AchievementId::Level5,
        name: "Climbing",
        description: "Reach level 5",
        icon: "⭐",
        category: AchievementCategory::Milestone,
        xp_reward: 30,
        rule: UnlockRule::LevelAtLeast(5),
    },
    Achievement {
        id: AchievementId::Level10,
        name: "Double Digits",
        description: "Reach level 10",
        icon: "🌟",
        category: AchievementCategory::Milestone,
        xp_reward: 75,
        rule: UnlockRule::LevelAtLeast(10),
    },
    // === ACTIVITY ===
    Achievement {
        id: AchievementId::Conversationalist,
        name: "Conversationalist",
        description: "Finish 10 tutor conversations",
        icon: "💬",
        category: AchievementCategory::Activity,
        xp_reward: 25,
        rule: UnlockRule::SourceCountAtLeast(XpSource::ChatCompletion, 10),
    },
    Achievement {
        id: AchievementId::ChatterBox,
        name: "Chatterbox",
        description: "Finish 100 tutor conversations",
        icon: "🗣️",
        category: AchievementCategory::Activity,
        xp_reward: 100,
        rule: UnlockRule::SourceCountAtLeast(XpSource::ChatCompletion, 100),
    },
    Achievement {
        id: AchievementId::GameOn,
        name: "Game On",
        description: "Play 3 learning games",
        icon: "🎮",
        category: AchievementCategory::Activity,
        xp_reward: 25,
        rule: UnlockRule::SourceCountAtLeast(XpSource::GameCompletion, 3),
    },
    Achievement {
        id: AchievementId::Challenger,
        name: "Challenger",
        description: "Complete 10 challenges",
        icon: "⚔️",
        category: AchievementCategory::Activity,
        xp_reward: 50,
        rule: UnlockRule::SourceCountAtLeast(XpSource::ChallengeCompletion, 10),
    },
    Achievement {
        id: AchievementId::Bookworm,
        name: "Bookworm",
        description: "Earn 100 XP from lessons",
        icon: "📚",
        category: AchievementCategory::Activity,
        xp_reward: 25,
        rule: UnlockRule::SourceXpAtLeast(XpSource::LessonCompletion, 100),
    },
    Achievement {
        id: AchievementId::Collector,
        name: "Collector",
        description: "Bookmark 20 items",
        icon: "🔖",
        category: AchievementCategory::Activity,
        xp_reward: 15,
        rule: UnlockRule::SourceCountAtLeast(XpSource::Bookmark, 20),
    },
    Achievement {
        id: AchievementId::Quotable,
        name: "Quotable",
        description: "Share 5 quotes",
        icon: "✒️",
        category: AchievementCategory::Activity,
        xp_reward: 15,
        rule: UnlockRule::SourceCountAtLeast(XpSource::QuoteShare, 5),
    },
    Achievement {
        id: AchievementId::Explorer,
        name: "Explorer",
        description: "Earn XP from 5 different activities",
        icon: "🗺️",
        category: AchievementCategory::Activity,
        xp_reward: 50,
        rule: UnlockRule::DistinctSourcesAtLeast(5),
    },
    // === STREAKS ===
    Achievement {
        id: AchievementId::OnFire,
        name: "On Fire",
        description: "Maintain a 3-day streak",
        icon: "🔥",
        category: AchievementCategory::Streak,
        xp_reward: 30,
        rule: UnlockRule::StreakAtLeast(3),
    },
    Achievement {
        id: AchievementId::WeekWarrior,
        name: "Week Warrior",
        description: "Maintain a 7-day streak",
        icon: "📅",
        category: AchievementCategory::Streak,
        xp_reward: 75,
        rule: UnlockRule::StreakAtLeast(7),
    },
    Achievement {
        id: AchievementId::MonthlyMaster,
        name: "Monthly Master",
        description: "Maintain a 30-day streak",
        icon: "👑",
        category: AchievementCategory::Streak,
        xp_reward: 300,
        rule: UnlockRule::StreakAtLeast(30),
    },
    // === SOCIAL ===
    Achievement {
        id: AchievementId::Ambassador,
        name: "Ambassador",
        description: "Refer a friend who joins",
        icon: "🤝",
        category: AchievementCategory::Social,
        xp_reward: 50,
        rule: UnlockRule::ReferralsAtLeast(1),
    },
    Achievement {
        id: AchievementId::SuperAmbassador,
        name: "Super Ambassador",
        description: "Refer 10 friends who join",
        icon: "🌍",
        category: AchievementCategory::Social,
        xp_reward: 200,
        rule: UnlockRule::ReferralsAtLeast(10),
    },
];

impl Achievement {
    /// Get achievement definition by ID
    pub fn get(id: AchievementId) -> &'static Achievement {
        ACHIEVEMENTS
            .iter()
            .find(|a| a.id == id)
            .expect("All achievements should be defined")
    }

    /// Look up a definition by its storage tag
    pub fn by_tag(tag: &str) -> Option<&'static Achievement> {
        ACHIEVEMENT_INDEX.get(tag).copied()
    }

    /// Get total number of achievements
    pub fn total_count() -> usize {
        ACHIEVEMENTS.len()
    }
}
