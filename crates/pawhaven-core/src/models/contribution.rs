//! 贡献流水相关实体
//!
//! 流水只追加不修改，用户总积分为全部流水 points_earned 之和

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::ContributionType;

/// 一条贡献流水
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Contribution {
    pub id: i64,
    pub user_id: i64,
    pub contribution_type: ContributionType,
    /// 外部业务引用（如帖子、订单 ID）
    pub contribution_id: String,
    pub points_earned: i32,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// 新增贡献参数
#[derive(Debug, Clone)]
pub struct NewContribution {
    pub user_id: i64,
    pub contribution_type: ContributionType,
    pub contribution_id: String,
    pub points_earned: i32,
    pub description: String,
}

/// 按类型聚合的流水统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct ContributionTally {
    pub contribution_type: ContributionType,
    pub count: i64,
    pub points: i64,
}

/// 用户贡献快照
///
/// 徽章评估和统计展示共用
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContributionSnapshot {
    tallies: Vec<ContributionTally>,
}

impl ContributionSnapshot {
    pub fn new(tallies: Vec<ContributionTally>) -> Self {
        Self { tallies }
    }

    pub fn total_points(&self) -> i64 {
        self.tallies.iter().map(|t| t.points).sum()
    }

    pub fn count(&self, contribution_type: ContributionType) -> i64 {
        self.find(contribution_type).map_or(0, |t| t.count)
    }

    pub fn points(&self, contribution_type: ContributionType) -> i64 {
        self.find(contribution_type).map_or(0, |t| t.points)
    }

    fn find(&self, contribution_type: ContributionType) -> Option<&ContributionTally> {
        self.tallies
            .iter()
            .find(|t| t.contribution_type == contribution_type)
    }
}

/// 各类型贡献次数
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContributionStats {
    pub adoption: i64,
    pub donation: i64,
    pub item_donation: i64,
    pub blog_post: i64,
    pub volunteer: i64,
}

impl From<&ContributionSnapshot> for ContributionStats {
    fn from(snapshot: &ContributionSnapshot) -> Self {
        Self {
            adoption: snapshot.count(ContributionType::Adoption),
            donation: snapshot.count(ContributionType::Donation),
            item_donation: snapshot.count(ContributionType::ItemDonation),
            blog_post: snapshot.count(ContributionType::BlogPost),
            volunteer: snapshot.count(ContributionType::Volunteer),
        }
    }
}

/// 用户积分与徽章统计
#[derive(Debug, Clone, Serialize)]
pub struct UserStats {
    pub total_points: i64,
    pub badge_count: i64,
    pub contribution_stats: ContributionStats,
}
