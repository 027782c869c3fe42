//! 服务层
//!
//! 实现业务逻辑，协调仓储层与事务。
//!
//! ## 模块结构
//!
//! - `dto`: 数据传输对象定义
//! - `awarder`: 徽章资格评估与授予
//! - `ledger`: 贡献流水记录与积分统计
//! - `catalog`: 徽章目录种子与查询
//! - `blog_service`: 博客
//! - `donation_service`: 捐赠状态机
//! - `item_service`: 物资认领与上门取件
//! - `post_service`: 帖子、评论与收藏
//! - `user_service`: 注册登录与用户管理

pub mod awarder;
pub mod blog_service;
pub mod catalog;
pub mod donation_service;
pub mod dto;
pub mod item_service;
pub mod ledger;
pub mod post_service;
pub mod user_service;

pub use awarder::{BadgeAwarder, Evaluation, plan_awards, rule_satisfied};
pub use blog_service::BlogService;
pub use catalog::{BadgeCatalog, DEFAULT_BADGES};
pub use donation_service::DonationService;
pub use dto::*;
pub use item_service::ItemService;
pub use ledger::ContributionLedger;
pub use post_service::PostService;
pub use user_service::{UserService, hash_password, verify_password};
