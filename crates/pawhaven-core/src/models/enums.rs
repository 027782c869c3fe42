//! 领域枚举类型定义
//!
//! 所有枚举都支持数据库（sqlx）和 JSON（serde）序列化，
//! 数据库列统一为 varchar，取值与 JSON 一致。

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 贡献类型
///
/// 每一条贡献流水都属于五种类型之一
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "varchar", rename_all = "snake_case")]
pub enum ContributionType {
    /// 领养
    Adoption,
    /// 资金捐赠
    Donation,
    /// 物资捐赠
    ItemDonation,
    /// 发布博客
    BlogPost,
    /// 志愿服务
    Volunteer,
}

impl ContributionType {
    pub const ALL: [ContributionType; 5] = [
        Self::Adoption,
        Self::Donation,
        Self::ItemDonation,
        Self::BlogPost,
        Self::Volunteer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Adoption => "adoption",
            Self::Donation => "donation",
            Self::ItemDonation => "item_donation",
            Self::BlogPost => "blog_post",
            Self::Volunteer => "volunteer",
        }
    }
}

impl fmt::Display for ContributionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContributionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Invalid contribution type: {s}"))
    }
}

/// 徽章分类
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum BadgeCategory {
    Adoption,
    Donation,
    #[default]
    Community,
    Volunteer,
}

/// 具名徽章规则
///
/// 与积分门槛无关的按类型统计规则，通过徽章目录上的 `rule_key` 列绑定到具体徽章。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "varchar", rename_all = "snake_case")]
pub enum BadgeRule {
    /// 至少一次领养
    PetGuardian,
    /// 至少五次领养
    SuperHelper,
    /// 资金捐赠累计积分不少于 500
    GenerousDonor,
    /// 至少十次物资捐赠
    ItemSupporter,
    /// 至少五篇博客
    CommunityLeader,
}

/// 帖子类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum PostType {
    /// 领养帖
    Adoption,
    /// 募捐帖
    Donation,
}

/// 帖子状态
///
/// active -> completed 由募捐目标达成触发，单向不可逆
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Active,
    Completed,
    Cancelled,
}

/// 宠物体型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum PetSize {
    Small,
    Medium,
    Large,
}

/// 捐赠状态
///
/// pending -> verified | rejected，两个终态都不可再变更
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum DonationStatus {
    #[default]
    Pending,
    Verified,
    Rejected,
}

impl DonationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Verified => "verified",
            Self::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// 物资类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum ItemType {
    Food,
    Toy,
    Accessory,
}

/// 物资状态
///
/// available -> claimed 只发生一次
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum ItemStatus {
    #[default]
    Available,
    Claimed,
    Collected,
}

/// 上门取件的物资类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum VolunteerItemType {
    Food,
    Toys,
    Accessories,
    Mixed,
}

/// 上门取件进度
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum VolunteerStatus {
    #[default]
    Pending,
    Assigned,
    Collected,
    Completed,
}

/// 徽章授予来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AwardSource {
    /// 累计积分达到门槛
    Points,
    /// 具名规则命中
    Rule,
    /// 运营手动授予
    Manual,
}

impl AwardSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Points => "points",
            Self::Rule => "rule",
            Self::Manual => "manual",
        }
    }
}
