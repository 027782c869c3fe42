//! 贡献流水服务
//!
//! 记录贡献后在同一请求内触发徽章评估。流水先行落库，
//! 评估失败只记录告警，不影响已写入的流水。

use std::sync::Arc;

use tracing::{info, instrument, warn};

use pawhaven_shared::observability::metrics;

use crate::error::{CoreError, Result};
use crate::models::{
    ContributionStats, ContributionType, NewContribution, UserBadgeDetail, UserStats,
};
use crate::repository::{
    BadgeRepositoryTrait, ContributionRepositoryTrait, UserBadgeRepositoryTrait,
};
use crate::service::awarder::BadgeAwarder;
use crate::service::dto::ContributionReceipt;

pub struct ContributionLedger<C, B, U>
where
    C: ContributionRepositoryTrait,
    B: BadgeRepositoryTrait,
    U: UserBadgeRepositoryTrait,
{
    contribution_repo: Arc<C>,
    user_badge_repo: Arc<U>,
    awarder: Arc<BadgeAwarder<C, B, U>>,
}

impl<C, B, U> ContributionLedger<C, B, U>
where
    C: ContributionRepositoryTrait,
    B: BadgeRepositoryTrait,
    U: UserBadgeRepositoryTrait,
{
    pub fn new(
        contribution_repo: Arc<C>,
        user_badge_repo: Arc<U>,
        awarder: Arc<BadgeAwarder<C, B, U>>,
    ) -> Self {
        Self {
            contribution_repo,
            user_badge_repo,
            awarder,
        }
    }

    /// 记录一次贡献并评估徽章
    #[instrument(skip(self, contribution), fields(
        user_id = contribution.user_id,
        contribution_type = %contribution.contribution_type,
    ))]
    pub async fn record(&self, mut contribution: NewContribution) -> Result<ContributionReceipt> {
        contribution.contribution_id = contribution.contribution_id.trim().to_string();
        if contribution.contribution_id.is_empty() {
            return Err(CoreError::Validation(
                "contribution_id is required".to_string(),
            ));
        }
        if contribution.points_earned < 0 {
            return Err(CoreError::Validation(
                "points_earned must not be negative".to_string(),
            ));
        }

        let recorded = self.contribution_repo.create(&contribution).await?;
        metrics::record_contribution(recorded.contribution_type.as_str());
        info!(
            contribution_id = recorded.id,
            points = recorded.points_earned,
            "贡献已记录"
        );

        let user_id = recorded.user_id;
        let (total_points, newly_awarded) = match self.awarder.evaluate(user_id).await {
            Ok(evaluation) => (Some(evaluation.total_points), evaluation.awarded),
            Err(e) => {
                warn!(user_id, error = %e, "徽章评估失败，贡献记录不受影响");
                metrics::record_badge_evaluation_failure();
                (self.fallback_total_points(user_id).await, Vec::new())
            }
        };

        Ok(ContributionReceipt {
            contribution: recorded,
            total_points,
            newly_awarded,
        })
    }

    pub async fn total_points(&self, user_id: i64) -> Result<i64> {
        self.contribution_repo.total_points(user_id).await
    }

    /// 评估失败后回读总积分，回读失败时返回 None
    async fn fallback_total_points(&self, user_id: i64) -> Option<i64> {
        match self.contribution_repo.total_points(user_id).await {
            Ok(total) => Some(total),
            Err(e) => {
                warn!(user_id, error = %e, "总积分回读失败");
                None
            }
        }
    }

    pub async fn count_by_type(
        &self,
        user_id: i64,
        contribution_type: ContributionType,
    ) -> Result<i64> {
        self.contribution_repo
            .count_by_type(user_id, contribution_type)
            .await
    }

    /// 用户已获徽章，最近授予的在前
    pub async fn user_badges(&self, user_id: i64) -> Result<Vec<UserBadgeDetail>> {
        self.user_badge_repo.list_user_badges(user_id).await
    }

    /// 积分、徽章数与各类型贡献次数
    pub async fn stats(&self, user_id: i64) -> Result<UserStats> {
        let snapshot = self.contribution_repo.snapshot(user_id).await?;
        let badge_count = self.user_badge_repo.count_user_badges(user_id).await?;

        Ok(UserStats {
            total_points: snapshot.total_points(),
            badge_count,
            contribution_stats: ContributionStats::from(&snapshot),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::models::{
        Badge, BadgeCategory, BadgeRule, Contribution, ContributionSnapshot, ContributionTally,
        UserBadge,
    };
    use crate::repository::{
        MockBadgeRepositoryTrait, MockContributionRepositoryTrait, MockUserBadgeRepositoryTrait,
    };
    use chrono::Utc;

    type Ledger = ContributionLedger<
        MockContributionRepositoryTrait,
        MockBadgeRepositoryTrait,
        MockUserBadgeRepositoryTrait,
    >;

    fn new_contribution(contribution_type: ContributionType, points: i32) -> NewContribution {
        NewContribution {
            user_id: 7,
            contribution_type,
            contribution_id: "post-42".to_string(),
            points_earned: points,
            description: "Adopted Luna".to_string(),
        }
    }

    fn stored(contribution: &NewContribution, id: i64) -> Contribution {
        Contribution {
            id,
            user_id: contribution.user_id,
            contribution_type: contribution.contribution_type,
            contribution_id: contribution.contribution_id.clone(),
            points_earned: contribution.points_earned,
            description: contribution.description.clone(),
            created_at: Utc::now(),
        }
    }

    fn pet_guardian() -> Badge {
        Badge {
            id: 1,
            name: "Pet Guardian".to_string(),
            description: String::new(),
            icon: String::new(),
            criteria: String::new(),
            category: BadgeCategory::Adoption,
            points_required: 10,
            rule_key: Some(BadgeRule::PetGuardian),
            created_at: Utc::now(),
        }
    }

    /// 内存中的流水与徽章，模拟真实的累加与唯一约束
    fn build_ledger(
        contributions: MockContributionRepositoryTrait,
        badges: MockBadgeRepositoryTrait,
        user_badges: MockUserBadgeRepositoryTrait,
    ) -> Ledger {
        let contributions = Arc::new(contributions);
        let user_badges = Arc::new(user_badges);
        let awarder = Arc::new(BadgeAwarder::new(
            contributions.clone(),
            Arc::new(badges),
            user_badges.clone(),
        ));
        ContributionLedger::new(contributions, user_badges, awarder)
    }

    fn in_memory_contributions(log: Arc<Mutex<Vec<Contribution>>>) -> MockContributionRepositoryTrait {
        let mut repo = MockContributionRepositoryTrait::new();

        let writer = log.clone();
        repo.expect_create().returning(move |c| {
            let mut rows = writer.lock().unwrap();
            let row = stored(c, rows.len() as i64 + 1);
            rows.push(row.clone());
            Ok(row)
        });

        let reader = log.clone();
        repo.expect_snapshot().returning(move |user_id| {
            let rows = reader.lock().unwrap();
            let tallies = ContributionType::ALL
                .iter()
                .filter_map(|&t| {
                    let matching: Vec<_> = rows
                        .iter()
                        .filter(|r| r.user_id == user_id && r.contribution_type == t)
                        .collect();
                    (!matching.is_empty()).then(|| ContributionTally {
                        contribution_type: t,
                        count: matching.len() as i64,
                        points: matching.iter().map(|r| i64::from(r.points_earned)).sum(),
                    })
                })
                .collect();
            Ok(ContributionSnapshot::new(tallies))
        });

        let totals = log;
        repo.expect_total_points().returning(move |user_id| {
            let rows = totals.lock().unwrap();
            Ok(rows
                .iter()
                .filter(|r| r.user_id == user_id)
                .map(|r| i64::from(r.points_earned))
                .sum())
        });

        repo
    }

    fn in_memory_user_badges(held: Arc<Mutex<Vec<(i64, i64)>>>) -> MockUserBadgeRepositoryTrait {
        let mut repo = MockUserBadgeRepositoryTrait::new();

        let reader = held.clone();
        repo.expect_held_badge_ids().returning(move |user_id| {
            let rows = reader.lock().unwrap();
            Ok(rows
                .iter()
                .filter(|(u, _)| *u == user_id)
                .map(|(_, b)| *b)
                .collect())
        });

        let writer = held;
        repo.expect_award().returning(move |user_id, badge_id| {
            let mut rows = writer.lock().unwrap();
            if rows.contains(&(user_id, badge_id)) {
                return Ok(None);
            }
            rows.push((user_id, badge_id));
            Ok(Some(UserBadge {
                id: rows.len() as i64,
                user_id,
                badge_id,
                assigned_at: Utc::now(),
            }))
        });

        repo
    }

    #[tokio::test]
    async fn test_record_rejects_blank_reference() {
        let mut contributions = MockContributionRepositoryTrait::new();
        contributions.expect_create().never();
        let ledger = build_ledger(
            contributions,
            MockBadgeRepositoryTrait::new(),
            MockUserBadgeRepositoryTrait::new(),
        );

        let mut input = new_contribution(ContributionType::Adoption, 10);
        input.contribution_id = "   ".to_string();
        let err = ledger.record(input).await.unwrap_err();

        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_record_rejects_negative_points() {
        let mut contributions = MockContributionRepositoryTrait::new();
        contributions.expect_create().never();
        let ledger = build_ledger(
            contributions,
            MockBadgeRepositoryTrait::new(),
            MockUserBadgeRepositoryTrait::new(),
        );

        let err = ledger
            .record(new_contribution(ContributionType::Volunteer, -5))
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_first_adoption_awards_pet_guardian_once() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let held = Arc::new(Mutex::new(Vec::new()));
        let mut badges = MockBadgeRepositoryTrait::new();
        badges
            .expect_list_all_badges()
            .returning(|| Ok(vec![pet_guardian()]));

        let ledger = build_ledger(
            in_memory_contributions(log.clone()),
            badges,
            in_memory_user_badges(held.clone()),
        );

        let first = ledger
            .record(new_contribution(ContributionType::Adoption, 10))
            .await
            .unwrap();
        assert_eq!(first.total_points, Some(10));
        assert_eq!(first.newly_awarded.len(), 1);
        assert_eq!(first.newly_awarded[0].badge.name, "Pet Guardian");

        let second = ledger
            .record(new_contribution(ContributionType::Adoption, 10))
            .await
            .unwrap();
        assert_eq!(second.total_points, Some(20));
        assert!(second.newly_awarded.is_empty());
        assert_eq!(held.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_total_points_is_order_independent() {
        let sequences = [[5, 10, 20], [20, 5, 10], [10, 20, 5]];

        for points in sequences {
            let mut badges = MockBadgeRepositoryTrait::new();
            badges.expect_list_all_badges().returning(|| Ok(Vec::new()));
            let ledger = build_ledger(
                in_memory_contributions(Arc::new(Mutex::new(Vec::new()))),
                badges,
                in_memory_user_badges(Arc::new(Mutex::new(Vec::new()))),
            );

            let mut last = 0;
            for p in points {
                last = ledger
                    .record(new_contribution(ContributionType::Volunteer, p))
                    .await
                    .unwrap()
                    .total_points
                    .unwrap();
            }
            assert_eq!(last, 35);
        }
    }

    #[tokio::test]
    async fn test_evaluation_failure_keeps_contribution() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut badges = MockBadgeRepositoryTrait::new();
        badges
            .expect_list_all_badges()
            .returning(|| Err(CoreError::Internal("catalog unavailable".to_string())));

        let ledger = build_ledger(
            in_memory_contributions(log.clone()),
            badges,
            MockUserBadgeRepositoryTrait::new(),
        );

        let receipt = ledger
            .record(new_contribution(ContributionType::Donation, 30))
            .await
            .unwrap();

        assert_eq!(receipt.contribution.points_earned, 30);
        assert_eq!(receipt.total_points, Some(30));
        assert!(receipt.newly_awarded.is_empty());
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unhealthy_store_still_returns_recorded_contribution() {
        let mut contributions = MockContributionRepositoryTrait::new();
        contributions
            .expect_create()
            .times(1)
            .returning(|c| Ok(stored(c, 1)));
        contributions
            .expect_snapshot()
            .returning(|_| Err(CoreError::Internal("db down".to_string())));
        contributions
            .expect_total_points()
            .returning(|_| Err(CoreError::Internal("db down".to_string())));
        let mut badges = MockBadgeRepositoryTrait::new();
        badges.expect_list_all_badges().returning(|| Ok(vec![pet_guardian()]));
        let mut user_badges = MockUserBadgeRepositoryTrait::new();
        user_badges.expect_held_badge_ids().returning(|_| Ok(Vec::new()));

        let ledger = build_ledger(contributions, badges, user_badges);
        let receipt = ledger
            .record(new_contribution(ContributionType::Adoption, 10))
            .await
            .unwrap();

        assert_eq!(receipt.contribution.id, 1);
        assert_eq!(receipt.total_points, None);
        assert!(receipt.newly_awarded.is_empty());
    }

    #[tokio::test]
    async fn test_stats() {
        let mut contributions = MockContributionRepositoryTrait::new();
        contributions.expect_snapshot().returning(|_| {
            Ok(ContributionSnapshot::new(vec![
                ContributionTally {
                    contribution_type: ContributionType::Adoption,
                    count: 2,
                    points: 20,
                },
                ContributionTally {
                    contribution_type: ContributionType::BlogPost,
                    count: 1,
                    points: 5,
                },
            ]))
        });
        let mut user_badges = MockUserBadgeRepositoryTrait::new();
        user_badges.expect_count_user_badges().returning(|_| Ok(3));

        let ledger = build_ledger(contributions, MockBadgeRepositoryTrait::new(), user_badges);
        let stats = ledger.stats(7).await.unwrap();

        assert_eq!(stats.total_points, 25);
        assert_eq!(stats.badge_count, 3);
        assert_eq!(stats.contribution_stats.adoption, 2);
        assert_eq!(stats.contribution_stats.blog_post, 1);
        assert_eq!(stats.contribution_stats.volunteer, 0);
    }
}
