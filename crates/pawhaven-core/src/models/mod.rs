//! 领域模型
//!
//! 包含用户、帖子、捐赠、贡献流水、徽章、博客与物资的实体定义

pub mod badge;
pub mod blog;
pub mod contribution;
pub mod donation;
pub mod enums;
pub mod item;
pub mod money;
pub mod post;
pub mod user;
pub mod user_badge;

// 重新导出常用类型
pub use badge::{Badge, BadgeSeed, SeedReport};
pub use blog::{Blog, BlogPatch, NewBlog, normalize_tags};
pub use contribution::{
    Contribution, ContributionSnapshot, ContributionStats, ContributionTally, NewContribution,
    UserStats,
};
pub use donation::{
    Donation, MANUAL_PAYMENT_METHOD, NewDonation, PostDonationSummary, generate_reference,
};
pub use enums::{
    AwardSource, BadgeCategory, BadgeRule, ContributionType, DonationStatus, ItemStatus, ItemType,
    PetSize, PostStatus, PostType, VolunteerItemType, VolunteerStatus,
};
pub use item::{Item, NewItem, NewVolunteerDonation, VolunteerDonation};
pub use money::ensure_storable;
pub use post::{
    Bookmark, Comment, NewPost, Post, PostPatch, PostUpdate, donation_progress, is_goal_reached,
};
pub use user::{Actor, NewUser, ProfilePatch, User};
pub use user_badge::{AwardedBadge, UserBadge, UserBadgeDetail};
