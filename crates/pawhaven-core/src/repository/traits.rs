//! 仓储 Trait 定义
//!
//! 徽章评估链路依赖抽象而非具体实现，支持 mock 测试

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    Badge, BadgeCategory, BadgeSeed, Contribution, ContributionSnapshot, ContributionType,
    NewContribution, UserBadge, UserBadgeDetail,
};

/// 贡献流水仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContributionRepositoryTrait: Send + Sync {
    async fn create(&self, contribution: &NewContribution) -> Result<Contribution>;
    async fn total_points(&self, user_id: i64) -> Result<i64>;
    async fn count_by_type(&self, user_id: i64, contribution_type: ContributionType)
    -> Result<i64>;
    async fn snapshot(&self, user_id: i64) -> Result<ContributionSnapshot>;
}

/// 徽章目录仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BadgeRepositoryTrait: Send + Sync {
    async fn get_badge(&self, id: i64) -> Result<Option<Badge>>;
    async fn list_badges(&self, category: Option<BadgeCategory>, limit: i64) -> Result<Vec<Badge>>;
    async fn list_all_badges(&self) -> Result<Vec<Badge>>;
    /// 按名称写入种子条目，返回是否为新建
    async fn upsert_seed(&self, seed: &BadgeSeed) -> Result<bool>;
}

/// 用户徽章仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserBadgeRepositoryTrait: Send + Sync {
    async fn held_badge_ids(&self, user_id: i64) -> Result<Vec<i64>>;
    /// 授予徽章，已持有时返回 None
    async fn award(&self, user_id: i64, badge_id: i64) -> Result<Option<UserBadge>>;
    async fn list_user_badges(&self, user_id: i64) -> Result<Vec<UserBadgeDetail>>;
    async fn count_user_badges(&self, user_id: i64) -> Result<i64>;
}
