//! 贡献流水仓储
//!
//! 只追加写入，聚合查询按 (user_id, contribution_type) 索引

use async_trait::async_trait;
use sqlx::PgPool;

use super::traits::ContributionRepositoryTrait;
use crate::error::{Result, missing_user};
use crate::models::{
    Contribution, ContributionSnapshot, ContributionTally, ContributionType, NewContribution,
};

pub struct ContributionRepository {
    pool: PgPool,
}

impl ContributionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 追加一条流水
    pub async fn create(&self, contribution: &NewContribution) -> Result<Contribution> {
        let row = sqlx::query_as::<_, Contribution>(
            r#"
            INSERT INTO user_contributions
                (user_id, contribution_type, contribution_id, points_earned, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, contribution_type, contribution_id, points_earned,
                      description, created_at
            "#,
        )
        .bind(contribution.user_id)
        .bind(contribution.contribution_type)
        .bind(&contribution.contribution_id)
        .bind(contribution.points_earned)
        .bind(&contribution.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| missing_user(e, contribution.user_id))?;

        Ok(row)
    }

    /// 用户总积分
    pub async fn total_points(&self, user_id: i64) -> Result<i64> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(points_earned), 0)::BIGINT
            FROM user_contributions
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    pub async fn count_by_type(
        &self,
        user_id: i64,
        contribution_type: ContributionType,
    ) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM user_contributions
            WHERE user_id = $1 AND contribution_type = $2
            "#,
        )
        .bind(user_id)
        .bind(contribution_type)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// 按类型聚合次数与积分
    pub async fn snapshot(&self, user_id: i64) -> Result<ContributionSnapshot> {
        let tallies = sqlx::query_as::<_, ContributionTally>(
            r#"
            SELECT contribution_type,
                   COUNT(*) AS count,
                   COALESCE(SUM(points_earned), 0)::BIGINT AS points
            FROM user_contributions
            WHERE user_id = $1
            GROUP BY contribution_type
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ContributionSnapshot::new(tallies))
    }
}

#[async_trait]
impl ContributionRepositoryTrait for ContributionRepository {
    async fn create(&self, contribution: &NewContribution) -> Result<Contribution> {
        self.create(contribution).await
    }

    async fn total_points(&self, user_id: i64) -> Result<i64> {
        self.total_points(user_id).await
    }

    async fn count_by_type(
        &self,
        user_id: i64,
        contribution_type: ContributionType,
    ) -> Result<i64> {
        self.count_by_type(user_id, contribution_type).await
    }

    async fn snapshot(&self, user_id: i64) -> Result<ContributionSnapshot> {
        self.snapshot(user_id).await
    }
}
