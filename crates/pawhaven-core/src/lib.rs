//! PawHaven 领域服务
//!
//! 宠物领养平台的业务核心，HTTP 层只做参数转换。
//!
//! ## 核心功能
//!
//! - **贡献流水**：记录积分行为，统计总积分与各类型次数
//! - **徽章授予**：记录贡献后同步评估积分门槛与具名规则，(用户, 徽章) 至多一行
//! - **捐赠状态机**：pending -> verified / rejected，确认时在事务内计入帖子金额
//! - **募捐目标**：已筹金额达到目标后关闭捐赠并完结帖子，单向不可逆
//! - **用户与帖子**：注册登录、资料、帖子、评论与收藏
//! - **博客与物资**：博客发布，物资认领，上门取件的志愿者指派
//!
//! ## 模块结构
//!
//! - `models`: 领域模型定义
//! - `error`: 错误类型定义
//! - `repository`: 数据库仓储层
//! - `service`: 业务服务层

pub mod error;
pub mod models;
pub mod repository;
pub mod service;

pub use error::{CoreError, Result};
pub use models::*;
pub use repository::{
    BadgeRepository, BlogRepository, CommentRepository, ContributionRepository,
    DonationRepository, ItemRepository, PostRepository, UserBadgeRepository, UserRepository,
};
pub use service::{
    BadgeAwarder, BadgeCatalog, BlogService, ContributionLedger, DonationService, ItemService,
    PostService, UserService, dto,
};

/// PostgreSQL 仓储上的徽章授予服务
pub type PgBadgeAwarder = BadgeAwarder<ContributionRepository, BadgeRepository, UserBadgeRepository>;

/// PostgreSQL 仓储上的贡献流水服务
pub type PgContributionLedger =
    ContributionLedger<ContributionRepository, BadgeRepository, UserBadgeRepository>;

/// PostgreSQL 仓储上的徽章目录
pub type PgBadgeCatalog = BadgeCatalog<BadgeRepository>;
