//! 徽章目录服务
//!
//! 目录基本是静态的：内置十个徽章，按名称幂等写入。

use std::sync::Arc;

use tracing::{info, instrument};

use crate::error::{CoreError, Result};
use crate::models::{Badge, BadgeCategory, BadgeRule, BadgeSeed, SeedReport};
use crate::repository::BadgeRepositoryTrait;

/// 默认列表条数
pub const DEFAULT_BADGE_LIMIT: i64 = 50;

/// 内置徽章
pub const DEFAULT_BADGES: [BadgeSeed; 10] = [
    BadgeSeed {
        name: "Pet Guardian",
        description: "For users who successfully adopt pets through the platform",
        icon: "🏠",
        criteria: "Successfully adopt a pet through PawHaven",
        category: BadgeCategory::Adoption,
        points_required: 10,
        rule_key: Some(BadgeRule::PetGuardian),
    },
    BadgeSeed {
        name: "Super Helper",
        description: "For users who assist with multiple adoptions",
        icon: "⭐",
        criteria: "Help facilitate 5+ successful adoptions",
        category: BadgeCategory::Adoption,
        points_required: 50,
        rule_key: Some(BadgeRule::SuperHelper),
    },
    BadgeSeed {
        name: "First Responder",
        description: "For users who quickly respond to urgent adoption needs",
        icon: "🚨",
        criteria: "Respond to 3+ urgent adoption posts within 24 hours",
        category: BadgeCategory::Adoption,
        points_required: 30,
        rule_key: None,
    },
    BadgeSeed {
        name: "Big Fan",
        description: "For users who frequently engage with posts and show support",
        icon: "❤️",
        criteria: "Like and interact with 50+ posts",
        category: BadgeCategory::Community,
        points_required: 25,
        rule_key: None,
    },
    BadgeSeed {
        name: "Community Leader",
        description: "For users who create helpful blog posts and guide others",
        icon: "👑",
        criteria: "Publish 5+ helpful blog posts or guides",
        category: BadgeCategory::Community,
        points_required: 100,
        rule_key: Some(BadgeRule::CommunityLeader),
    },
    BadgeSeed {
        name: "Loyal Supporter",
        description: "For users who have been active for 6+ months",
        icon: "🏆",
        criteria: "Maintain active account for 6+ months",
        category: BadgeCategory::Community,
        points_required: 60,
        rule_key: None,
    },
    BadgeSeed {
        name: "Generous Donor",
        description: "For users who make significant monetary contributions",
        icon: "💰",
        criteria: "Donate $500+ to pet medical care",
        category: BadgeCategory::Donation,
        points_required: 500,
        rule_key: Some(BadgeRule::GenerousDonor),
    },
    BadgeSeed {
        name: "Item Supporter",
        description: "For users who donate food, toys, and supplies",
        icon: "🎁",
        criteria: "Donate 10+ items (food, toys, supplies)",
        category: BadgeCategory::Donation,
        points_required: 100,
        rule_key: Some(BadgeRule::ItemSupporter),
    },
    BadgeSeed {
        name: "Emergency Aid",
        description: "For users who help with medical emergency posts",
        icon: "🚑",
        criteria: "Contribute to 3+ emergency medical fundraisers",
        category: BadgeCategory::Donation,
        points_required: 200,
        rule_key: None,
    },
    BadgeSeed {
        name: "Volunteer",
        description: "For users who actively help with pet care and adoption events",
        icon: "🤝",
        criteria: "Participate in 3+ volunteer events or activities",
        category: BadgeCategory::Volunteer,
        points_required: 150,
        rule_key: None,
    },
];

pub struct BadgeCatalog<B>
where
    B: BadgeRepositoryTrait,
{
    badge_repo: Arc<B>,
}

impl<B> BadgeCatalog<B>
where
    B: BadgeRepositoryTrait,
{
    pub fn new(badge_repo: Arc<B>) -> Self {
        Self { badge_repo }
    }

    /// 写入内置徽章，已存在的按名称覆盖
    #[instrument(skip(self))]
    pub async fn seed(&self) -> Result<SeedReport> {
        let mut report = SeedReport::default();
        for seed in &DEFAULT_BADGES {
            if self.badge_repo.upsert_seed(seed).await? {
                report.created += 1;
            } else {
                report.updated += 1;
            }
        }

        info!(
            created = report.created,
            updated = report.updated,
            "徽章目录已写入"
        );
        Ok(report)
    }

    pub async fn list(&self, category: Option<BadgeCategory>, limit: Option<i64>) -> Result<Vec<Badge>> {
        let limit = limit.unwrap_or(DEFAULT_BADGE_LIMIT).clamp(1, 200);
        self.badge_repo.list_badges(category, limit).await
    }

    pub async fn get(&self, badge_id: i64) -> Result<Badge> {
        self.badge_repo
            .get_badge(badge_id)
            .await?
            .ok_or(CoreError::BadgeNotFound(badge_id))
    }
}
