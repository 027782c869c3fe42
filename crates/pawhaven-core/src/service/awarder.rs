//! 徽章授予服务
//!
//! 每次记录贡献后同步执行一次评估：
//!
//! 1. 读取用户贡献快照、徽章目录和已持有徽章
//! 2. `plan_awards` 计算尚未持有且已满足条件的徽章（纯函数，与遍历顺序无关）
//! 3. 逐个写入 user_badges，唯一约束冲突视为已持有，不计为新授予
//!
//! 条件分两类：`points_required > 0` 的徽章按累计积分判断；
//! 绑定了 `rule_key` 的徽章按对应类型的次数或积分判断。
//! 目录中缺少某条规则对应的徽章时该规则直接跳过。

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{info, instrument};

use pawhaven_shared::observability::metrics;

use crate::error::{CoreError, Result};
use crate::models::{
    AwardSource, AwardedBadge, Badge, BadgeRule, ContributionSnapshot, ContributionType,
};
use crate::repository::{
    BadgeRepositoryTrait, ContributionRepositoryTrait, UserBadgeRepositoryTrait,
};
use crate::service::dto::BadgeAssignment;

/// 具名规则门槛
mod thresholds {
    pub const PET_GUARDIAN_ADOPTIONS: i64 = 1;
    pub const SUPER_HELPER_ADOPTIONS: i64 = 5;
    pub const GENEROUS_DONOR_POINTS: i64 = 500;
    pub const ITEM_SUPPORTER_DONATIONS: i64 = 10;
    pub const COMMUNITY_LEADER_POSTS: i64 = 5;
}

/// 具名规则是否满足
pub fn rule_satisfied(rule: BadgeRule, snapshot: &ContributionSnapshot) -> bool {
    use thresholds::*;

    match rule {
        BadgeRule::PetGuardian => {
            snapshot.count(ContributionType::Adoption) >= PET_GUARDIAN_ADOPTIONS
        }
        BadgeRule::SuperHelper => {
            snapshot.count(ContributionType::Adoption) >= SUPER_HELPER_ADOPTIONS
        }
        BadgeRule::GenerousDonor => {
            snapshot.points(ContributionType::Donation) >= GENEROUS_DONOR_POINTS
        }
        BadgeRule::ItemSupporter => {
            snapshot.count(ContributionType::ItemDonation) >= ITEM_SUPPORTER_DONATIONS
        }
        BadgeRule::CommunityLeader => {
            snapshot.count(ContributionType::BlogPost) >= COMMUNITY_LEADER_POSTS
        }
    }
}

/// 计算本次应授予的徽章
///
/// 已持有的徽章直接跳过。积分规则优先于具名规则，同一徽章只出现一次。
pub fn plan_awards<'a>(
    catalog: &'a [Badge],
    held: &HashSet<i64>,
    snapshot: &ContributionSnapshot,
) -> Vec<(&'a Badge, AwardSource)> {
    let total_points = snapshot.total_points();

    catalog
        .iter()
        .filter(|badge| !held.contains(&badge.id))
        .filter_map(|badge| {
            if badge.has_points_threshold() && total_points >= i64::from(badge.points_required) {
                return Some((badge, AwardSource::Points));
            }
            badge
                .rule_key
                .filter(|rule| rule_satisfied(*rule, snapshot))
                .map(|_| (badge, AwardSource::Rule))
        })
        .collect()
}

/// 一次评估的结果
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub total_points: i64,
    pub awarded: Vec<AwardedBadge>,
}

/// 徽章授予服务
pub struct BadgeAwarder<C, B, U>
where
    C: ContributionRepositoryTrait,
    B: BadgeRepositoryTrait,
    U: UserBadgeRepositoryTrait,
{
    contribution_repo: Arc<C>,
    badge_repo: Arc<B>,
    user_badge_repo: Arc<U>,
}

impl<C, B, U> BadgeAwarder<C, B, U>
where
    C: ContributionRepositoryTrait,
    B: BadgeRepositoryTrait,
    U: UserBadgeRepositoryTrait,
{
    pub fn new(contribution_repo: Arc<C>, badge_repo: Arc<B>, user_badge_repo: Arc<U>) -> Self {
        Self {
            contribution_repo,
            badge_repo,
            user_badge_repo,
        }
    }

    /// 评估并授予用户新满足条件的徽章
    ///
    /// 重复执行是幂等的：已持有的徽章不会再次写入。
    #[instrument(skip(self))]
    pub async fn evaluate(&self, user_id: i64) -> Result<Evaluation> {
        let snapshot = self.contribution_repo.snapshot(user_id).await?;
        let catalog = self.badge_repo.list_all_badges().await?;
        let held: HashSet<i64> = self
            .user_badge_repo
            .held_badge_ids(user_id)
            .await?
            .into_iter()
            .collect();

        let mut awarded = Vec::new();
        for (badge, source) in plan_awards(&catalog, &held, &snapshot) {
            // 并发评估时可能已被另一请求写入
            if self.user_badge_repo.award(user_id, badge.id).await?.is_none() {
                continue;
            }

            metrics::record_badge_award(source.as_str());
            info!(
                user_id,
                badge_id = badge.id,
                badge = %badge.name,
                source = source.as_str(),
                "徽章已授予"
            );
            awarded.push(AwardedBadge {
                badge: badge.clone(),
                source,
            });
        }

        Ok(Evaluation {
            total_points: snapshot.total_points(),
            awarded,
        })
    }

    /// 运营手动授予
    ///
    /// 用户不存在由外键约束映射为 `UserNotFound`。
    #[instrument(skip(self))]
    pub async fn assign(&self, user_id: i64, badge_id: i64) -> Result<BadgeAssignment> {
        let badge = self
            .badge_repo
            .get_badge(badge_id)
            .await?
            .ok_or(CoreError::BadgeNotFound(badge_id))?;

        let user_badge = self
            .user_badge_repo
            .award(user_id, badge_id)
            .await?
            .ok_or(CoreError::BadgeAlreadyHeld { user_id, badge_id })?;

        metrics::record_badge_award(AwardSource::Manual.as_str());
        info!(user_id, badge_id, badge = %badge.name, "徽章已手动授予");

        Ok(BadgeAssignment { user_badge, badge })
    }
}
