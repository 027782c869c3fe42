//! 数据库仓储层
//!
//! 提供所有实体的数据访问接口，封装 SQL 操作细节。
//!
//! ## 设计原则
//!
//! - 仓储只负责数据持久化，不包含业务逻辑
//! - 使用 SQLx 进行类型安全的数据库操作
//! - 事务控制由调用方（服务层）决定，事务内操作接收 `&mut PgConnection`
//! - 徽章评估链路上的仓储定义 trait 接口以支持 mock 测试

mod badge_repo;
mod blog_repo;
mod comment_repo;
mod contribution_repo;
mod donation_repo;
mod item_repo;
mod post_repo;
mod traits;
mod user_badge_repo;
mod user_repo;

pub use badge_repo::BadgeRepository;
pub use blog_repo::BlogRepository;
pub use comment_repo::CommentRepository;
pub use contribution_repo::ContributionRepository;
pub use donation_repo::DonationRepository;
pub use item_repo::ItemRepository;
pub use post_repo::PostRepository;
pub use traits::*;
pub use user_badge_repo::UserBadgeRepository;
pub use user_repo::UserRepository;
