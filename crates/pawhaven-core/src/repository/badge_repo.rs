//! 徽章目录仓储

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use super::traits::BadgeRepositoryTrait;
use crate::error::Result;
use crate::models::{Badge, BadgeCategory, BadgeSeed};

pub struct BadgeRepository {
    pool: PgPool,
}

impl BadgeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_badge(&self, id: i64) -> Result<Option<Badge>> {
        let badge = sqlx::query_as::<_, Badge>(
            r#"
            SELECT id, name, description, icon, criteria, category, points_required,
                   rule_key, created_at
            FROM badges
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(badge)
    }

    /// 按分类筛选，按名称排序
    pub async fn list_badges(
        &self,
        category: Option<BadgeCategory>,
        limit: i64,
    ) -> Result<Vec<Badge>> {
        let badges = sqlx::query_as::<_, Badge>(
            r#"
            SELECT id, name, description, icon, criteria, category, points_required,
                   rule_key, created_at
            FROM badges
            WHERE ($1::varchar IS NULL OR category = $1)
            ORDER BY name
            LIMIT $2
            "#,
        )
        .bind(category)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(badges)
    }

    /// 完整目录，供资格评估使用
    pub async fn list_all_badges(&self) -> Result<Vec<Badge>> {
        let badges = sqlx::query_as::<_, Badge>(
            r#"
            SELECT id, name, description, icon, criteria, category, points_required,
                   rule_key, created_at
            FROM badges
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(badges)
    }

    /// 按唯一名称插入或更新
    ///
    /// `xmax = 0` 仅对本语句新插入的行成立
    pub async fn upsert_seed(&self, seed: &BadgeSeed) -> Result<bool> {
        let row = sqlx::query(
            r#"
            INSERT INTO badges (name, description, icon, criteria, category, points_required, rule_key)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (name) DO UPDATE SET
                description = EXCLUDED.description,
                icon = EXCLUDED.icon,
                criteria = EXCLUDED.criteria,
                category = EXCLUDED.category,
                points_required = EXCLUDED.points_required,
                rule_key = EXCLUDED.rule_key
            RETURNING (xmax = 0) AS inserted
            "#,
        )
        .bind(seed.name)
        .bind(seed.description)
        .bind(seed.icon)
        .bind(seed.criteria)
        .bind(seed.category)
        .bind(seed.points_required)
        .bind(seed.rule_key)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get("inserted"))
    }
}

#[async_trait]
impl BadgeRepositoryTrait for BadgeRepository {
    async fn get_badge(&self, id: i64) -> Result<Option<Badge>> {
        self.get_badge(id).await
    }

    async fn list_badges(&self, category: Option<BadgeCategory>, limit: i64) -> Result<Vec<Badge>> {
        self.list_badges(category, limit).await
    }

    async fn list_all_badges(&self) -> Result<Vec<Badge>> {
        self.list_all_badges().await
    }

    async fn upsert_seed(&self, seed: &BadgeSeed) -> Result<bool> {
        self.upsert_seed(seed).await
    }
}
