//! 用户徽章相关实体定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::badge::Badge;
use super::enums::{AwardSource, BadgeCategory};

/// 用户持有的徽章
///
/// 每个 (user_id, badge_id) 至多一行，只新增不更新
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserBadge {
    pub id: i64,
    pub user_id: i64,
    pub badge_id: i64,
    pub assigned_at: DateTime<Utc>,
}

/// 用户徽章及徽章详情（联表查询）
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserBadgeDetail {
    pub id: i64,
    pub user_id: i64,
    pub badge_id: i64,
    pub assigned_at: DateTime<Utc>,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub category: BadgeCategory,
    pub points_required: i32,
}

/// 一次新授予的徽章
#[derive(Debug, Clone, Serialize)]
pub struct AwardedBadge {
    pub badge: Badge,
    pub source: AwardSource,
}
