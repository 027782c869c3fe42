//! 服务层数据传输对象
//!
//! 定义服务层与外部交互使用的 DTO，与内部领域模型解耦

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{AwardedBadge, Badge, Contribution, DonationStatus, Post, UserBadge};

/// 记录贡献的结果
#[derive(Debug, Clone, Serialize)]
pub struct ContributionReceipt {
    pub contribution: Contribution,
    /// 当前总积分，评估与回读都失败时为空
    pub total_points: Option<i64>,
    /// 本次新获得的徽章，评估失败时为空
    pub newly_awarded: Vec<AwardedBadge>,
}

/// 手动授予结果
#[derive(Debug, Clone, Serialize)]
pub struct BadgeAssignment {
    pub user_badge: UserBadge,
    pub badge: Badge,
}

/// 在线捐赠请求
#[derive(Debug, Clone)]
pub struct CreateDonation {
    pub post_id: i64,
    pub amount: Decimal,
    pub payment_method: String,
    pub reference_id: String,
    pub message: String,
}

/// 线下捐赠请求，需提交凭证
#[derive(Debug, Clone)]
pub struct CreateManualDonation {
    pub post_id: i64,
    pub amount: Decimal,
    pub receipt_image: String,
    pub message: String,
}

/// 确认操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerifyAction {
    Verify,
    Reject,
}

impl VerifyAction {
    pub fn target_status(self) -> DonationStatus {
        match self {
            Self::Verify => DonationStatus::Verified,
            Self::Reject => DonationStatus::Rejected,
        }
    }
}

/// 手动捐赠审核操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewAction {
    Approve,
    Reject,
}

impl ReviewAction {
    pub fn target_status(self) -> DonationStatus {
        match self {
            Self::Approve => DonationStatus::Verified,
            Self::Reject => DonationStatus::Rejected,
        }
    }
}

/// 帖子及募捐进度
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    #[serde(flatten)]
    pub post: Post,
    pub donation_progress: f64,
}

impl From<Post> for PostView {
    fn from(post: Post) -> Self {
        let donation_progress = post.donation_progress();
        Self {
            post,
            donation_progress,
        }
    }
}

/// 收藏状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BookmarkState {
    pub bookmarked: bool,
}
