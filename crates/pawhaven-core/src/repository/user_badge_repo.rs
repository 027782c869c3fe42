//! 用户徽章仓储
//!
//! (user_id, badge_id) 由唯一约束保证至多一行，授予使用 ON CONFLICT DO NOTHING，
//! 并发的重复授予不会产生第二行。

use async_trait::async_trait;
use sqlx::PgPool;

use super::traits::UserBadgeRepositoryTrait;
use crate::error::{Result, missing_user};
use crate::models::{UserBadge, UserBadgeDetail};

pub struct UserBadgeRepository {
    pool: PgPool,
}

impl UserBadgeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ==================== 查询操作 ====================

    pub async fn held_badge_ids(&self, user_id: i64) -> Result<Vec<i64>> {
        let ids = sqlx::query_scalar::<_, i64>(
            "SELECT badge_id FROM user_badges WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    /// 用户徽章及详情，最近获得的在前
    pub async fn list_user_badges(&self, user_id: i64) -> Result<Vec<UserBadgeDetail>> {
        let badges = sqlx::query_as::<_, UserBadgeDetail>(
            r#"
            SELECT ub.id, ub.user_id, ub.badge_id, ub.assigned_at,
                   b.name, b.description, b.icon, b.category, b.points_required
            FROM user_badges ub
            JOIN badges b ON b.id = ub.badge_id
            WHERE ub.user_id = $1
            ORDER BY ub.assigned_at DESC, ub.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(badges)
    }

    pub async fn count_user_badges(&self, user_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_badges WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // ==================== 写入操作 ====================

    /// 授予徽章
    ///
    /// 冲突时不返回行，调用方据此判断是否为新授予
    pub async fn award(&self, user_id: i64, badge_id: i64) -> Result<Option<UserBadge>> {
        let awarded = sqlx::query_as::<_, UserBadge>(
            r#"
            INSERT INTO user_badges (user_id, badge_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, badge_id) DO NOTHING
            RETURNING id, user_id, badge_id, assigned_at
            "#,
        )
        .bind(user_id)
        .bind(badge_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| missing_user(e, user_id))?;

        Ok(awarded)
    }
}

#[async_trait]
impl UserBadgeRepositoryTrait for UserBadgeRepository {
    async fn held_badge_ids(&self, user_id: i64) -> Result<Vec<i64>> {
        self.held_badge_ids(user_id).await
    }

    async fn award(&self, user_id: i64, badge_id: i64) -> Result<Option<UserBadge>> {
        self.award(user_id, badge_id).await
    }

    async fn list_user_badges(&self, user_id: i64) -> Result<Vec<UserBadgeDetail>> {
        self.list_user_badges(user_id).await
    }

    async fn count_user_badges(&self, user_id: i64) -> Result<i64> {
        self.count_user_badges(user_id).await
    }
}
