//! 徽章目录实体

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{BadgeCategory, BadgeRule};

/// 徽章定义
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Badge {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub criteria: String,
    pub category: BadgeCategory,
    pub points_required: i32,
    /// 绑定的具名规则，纯积分徽章为空
    pub rule_key: Option<BadgeRule>,
    pub created_at: DateTime<Utc>,
}

impl Badge {
    /// 积分门槛规则是否适用
    ///
    /// 门槛为 0 的徽章只能通过具名规则或手动授予获得
    pub fn has_points_threshold(&self) -> bool {
        self.points_required > 0
    }
}

/// 目录种子条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeSeed {
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub criteria: &'static str,
    pub category: BadgeCategory,
    pub points_required: i32,
    pub rule_key: Option<BadgeRule>,
}

/// 种子写入结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub created: usize,
    pub updated: usize,
}
