//! 应用状态定义
//!
//! 包含 Axum 路由共享的应用状态

use std::sync::Arc;

use pawhaven_core::{
    BadgeRepository, BlogRepository, BlogService, CommentRepository, ContributionRepository,
    DonationRepository, DonationService, ItemRepository, ItemService, PgBadgeAwarder,
    PgBadgeCatalog, PgContributionLedger, PostRepository, PostService, UserBadgeRepository,
    UserRepository, UserService,
};
use sqlx::PgPool;

use crate::auth::{JwtConfig, JwtManager};

/// Axum 应用共享状态
///
/// 服务在进程启动时装配一次，通过 Arc 在 handler 间共享
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL 连接池
    pub pool: PgPool,
    pub jwt: Arc<JwtManager>,
    pub users: Arc<UserService>,
    pub posts: Arc<PostService>,
    pub donations: Arc<DonationService>,
    pub blogs: Arc<BlogService>,
    pub items: Arc<ItemService>,
    pub ledger: Arc<PgContributionLedger>,
    pub awarder: Arc<PgBadgeAwarder>,
    pub catalog: Arc<PgBadgeCatalog>,
}

impl AppState {
    /// 基于连接池装配所有仓储与服务
    pub fn new(pool: PgPool, jwt_config: JwtConfig) -> Self {
        let user_repo = Arc::new(UserRepository::new(pool.clone()));
        let post_repo = Arc::new(PostRepository::new(pool.clone()));
        let comment_repo = Arc::new(CommentRepository::new(pool.clone()));
        let donation_repo = Arc::new(DonationRepository::new(pool.clone()));
        let contribution_repo = Arc::new(ContributionRepository::new(pool.clone()));
        let badge_repo = Arc::new(BadgeRepository::new(pool.clone()));
        let user_badge_repo = Arc::new(UserBadgeRepository::new(pool.clone()));
        let blog_repo = Arc::new(BlogRepository::new(pool.clone()));
        let item_repo = Arc::new(ItemRepository::new(pool.clone()));

        let awarder = Arc::new(PgBadgeAwarder::new(
            contribution_repo.clone(),
            badge_repo.clone(),
            user_badge_repo.clone(),
        ));
        let ledger = Arc::new(PgContributionLedger::new(
            contribution_repo,
            user_badge_repo,
            awarder.clone(),
        ));

        Self {
            jwt: Arc::new(JwtManager::new(jwt_config)),
            users: Arc::new(UserService::new(user_repo.clone())),
            posts: Arc::new(PostService::new(
                pool.clone(),
                post_repo.clone(),
                comment_repo,
            )),
            donations: Arc::new(DonationService::new(pool.clone(), donation_repo, post_repo)),
            blogs: Arc::new(BlogService::new(blog_repo)),
            items: Arc::new(ItemService::new(pool.clone(), item_repo, user_repo)),
            ledger,
            awarder,
            catalog: Arc::new(PgBadgeCatalog::new(badge_repo)),
            pool,
        }
    }
}
