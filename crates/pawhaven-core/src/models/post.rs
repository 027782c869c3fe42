//! 帖子相关实体定义
//!
//! 包含帖子、进展更新、评论、收藏，以及募捐目标的状态约束

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use super::enums::{PetSize, PostStatus, PostType};
use super::money::ensure_storable;
use crate::error::{CoreError, Result};

/// 帖子
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub user_id: i64,
    #[serde(rename = "type")]
    pub post_type: PostType,
    pub title: String,
    pub description: String,
    pub pet_type: Option<String>,
    pub pet_age: Option<i32>,
    pub pet_size: Option<PetSize>,
    pub pet_species: Option<String>,
    pub donation_goal: Option<Decimal>,
    pub current_amount: Decimal,
    pub status: PostStatus,
    pub donations_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// 是否接受新的捐赠
    pub fn accepts_donations(&self) -> bool {
        self.post_type == PostType::Donation
            && self.status == PostStatus::Active
            && self.donations_enabled
    }

    /// 计入一笔已确认的捐赠金额
    ///
    /// 金额必须为正，累加后的总额须能写回金额列；累加后立即检查募捐目标。
    pub fn apply_verified_amount(&mut self, amount: Decimal) -> Result<()> {
        if amount <= Decimal::ZERO {
            return Err(CoreError::Validation(
                "Donation amount must be greater than zero".to_string(),
            ));
        }
        let total = self.current_amount + amount;
        ensure_storable(total, "current_amount")?;
        self.current_amount = total;
        self.enforce_goal();
        Ok(())
    }

    /// 目标达成后关闭捐赠并完结帖子
    ///
    /// 只会关闭，不会重新开启。
    pub fn enforce_goal(&mut self) {
        if is_goal_reached(self.current_amount, self.donation_goal) {
            self.donations_enabled = false;
            self.status = PostStatus::Completed;
        }
    }

    pub fn donation_progress(&self) -> f64 {
        donation_progress(self.current_amount, self.donation_goal)
    }
}

/// 募捐进度百分比，封顶 100，无目标时为 0
pub fn donation_progress(current: Decimal, goal: Option<Decimal>) -> f64 {
    match goal {
        Some(goal) if goal > Decimal::ZERO => {
            let pct = current / goal * Decimal::ONE_HUNDRED;
            let pct = pct.min(Decimal::ONE_HUNDRED).round_dp(2);
            pct.to_f64().unwrap_or(0.0)
        }
        _ => 0.0,
    }
}

/// 目标为正且已筹金额不低于目标
pub fn is_goal_reached(current: Decimal, goal: Option<Decimal>) -> bool {
    goal.is_some_and(|goal| goal > Decimal::ZERO && current >= goal)
}

/// 发帖参数
#[derive(Debug, Clone)]
pub struct NewPost {
    pub post_type: PostType,
    pub title: String,
    pub description: String,
    pub pet_type: Option<String>,
    pub pet_age: Option<i32>,
    pub pet_size: Option<PetSize>,
    pub pet_species: Option<String>,
    pub donation_goal: Option<Decimal>,
}

/// 帖子编辑，None 表示保持原值
#[derive(Debug, Clone, Default)]
pub struct PostPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub post_type: Option<PostType>,
    pub pet_type: Option<String>,
    pub pet_age: Option<i32>,
    pub pet_size: Option<PetSize>,
    pub pet_species: Option<String>,
    pub donation_goal: Option<Decimal>,
}

impl PostPatch {
    /// 合并到已有帖子
    ///
    /// 空白标题和描述被忽略；募捐目标只对募捐帖生效。
    pub fn apply_to(self, post: &mut Post) {
        if let Some(title) = self.title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()) {
            post.title = title;
        }
        if let Some(desc) = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
        {
            post.description = desc;
        }
        if let Some(post_type) = self.post_type {
            post.post_type = post_type;
        }
        if self.pet_type.is_some() {
            post.pet_type = self.pet_type;
        }
        if self.pet_age.is_some() {
            post.pet_age = self.pet_age;
        }
        if self.pet_size.is_some() {
            post.pet_size = self.pet_size;
        }
        if self.pet_species.is_some() {
            post.pet_species = self.pet_species;
        }
        if post.post_type == PostType::Donation && self.donation_goal.is_some() {
            post.donation_goal = self.donation_goal;
        }
        post.enforce_goal();
    }
}

/// 帖子进展更新
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PostUpdate {
    pub id: i64,
    pub post_id: i64,
    pub user_id: i64,
    pub update_text: String,
    pub created_at: DateTime<Utc>,
}

/// 评论
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub user_id: i64,
    /// 评论者用户名（联表返回）
    pub username: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 收藏
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bookmark {
    pub id: i64,
    pub user_id: i64,
    pub post_id: i64,
    pub created_at: DateTime<Utc>,
}
