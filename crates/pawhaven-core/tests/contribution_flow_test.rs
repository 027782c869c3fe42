//! 贡献流水与徽章授予集成测试
//!
//! 唯一约束与外键行为无法通过 mock 覆盖，需要真实 PostgreSQL。
//!
//! ## 运行方式
//!
//! ```bash
//! DATABASE_URL=postgres://... cargo test -p pawhaven-core --test contribution_flow_test -- --ignored
//! ```

use std::sync::Arc;

use fake::Fake;
use fake::faker::name::en::FirstName;
use sqlx::PgPool;

use pawhaven_core::error::CoreError;
use pawhaven_core::service::{BadgeAwarder, BadgeCatalog, ContributionLedger};
use pawhaven_core::{
    BadgeRepository, ContributionRepository, ContributionType, NewContribution, PgBadgeAwarder,
    PgContributionLedger, UserBadgeRepository, UserRepository,
};
use pawhaven_shared::database::MIGRATOR;

// ==================== 辅助函数 ====================

fn database_url() -> String {
    std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests")
}

async fn setup_pool() -> PgPool {
    let pool = PgPool::connect(&database_url())
        .await
        .expect("数据库连接失败");
    MIGRATOR.run(&pool).await.expect("迁移失败");
    pool
}

struct Services {
    ledger: PgContributionLedger,
    awarder: Arc<PgBadgeAwarder>,
}

async fn setup_services(pool: &PgPool) -> Services {
    let contributions = Arc::new(ContributionRepository::new(pool.clone()));
    let badges = Arc::new(BadgeRepository::new(pool.clone()));
    let user_badges = Arc::new(UserBadgeRepository::new(pool.clone()));

    BadgeCatalog::new(badges.clone())
        .seed()
        .await
        .expect("徽章目录写入失败");

    let awarder = Arc::new(BadgeAwarder::new(
        contributions.clone(),
        badges,
        user_badges.clone(),
    ));
    Services {
        ledger: ContributionLedger::new(contributions, user_badges, awarder.clone()),
        awarder,
    }
}

/// 创建一个唯一的测试用户
async fn create_user(pool: &PgPool) -> i64 {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    let first_name: String = FirstName().fake();
    UserRepository::new(pool.clone())
        .create(
            &format!("it_{}", &suffix[..12]),
            &format!("it_{suffix}@example.com"),
            "not-a-real-hash",
            &first_name,
            "Tester",
        )
        .await
        .expect("创建测试用户失败")
        .id
}

async fn user_badge_rows(pool: &PgPool, user_id: i64, badge_name: &str) -> i64 {
    sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM user_badges ub
        JOIN badges b ON b.id = ub.badge_id
        WHERE ub.user_id = $1 AND b.name = $2
        "#,
    )
    .bind(user_id)
    .bind(badge_name)
    .fetch_one(pool)
    .await
    .expect("查询用户徽章失败")
}

fn contribution(
    user_id: i64,
    contribution_type: ContributionType,
    points: i32,
) -> NewContribution {
    NewContribution {
        user_id,
        contribution_type,
        contribution_id: uuid::Uuid::new_v4().to_string(),
        points_earned: points,
        description: "integration test".to_string(),
    }
}

// ==================== 测试用例 ====================

#[tokio::test]
#[ignore = "需要 PostgreSQL"]
async fn test_first_adoption_awards_only_pet_guardian() {
    let pool = setup_pool().await;
    let services = setup_services(&pool).await;
    let user_id = create_user(&pool).await;

    let receipt = services
        .ledger
        .record(contribution(user_id, ContributionType::Adoption, 10))
        .await
        .unwrap();

    assert_eq!(receipt.total_points, Some(10));
    let names: Vec<_> = receipt
        .newly_awarded
        .iter()
        .map(|a| a.badge.name.as_str())
        .collect();
    assert_eq!(names, vec!["Pet Guardian"]);
}

#[tokio::test]
#[ignore = "需要 PostgreSQL"]
async fn test_second_adoption_does_not_duplicate_badge() {
    let pool = setup_pool().await;
    let services = setup_services(&pool).await;
    let user_id = create_user(&pool).await;

    for _ in 0..2 {
        services
            .ledger
            .record(contribution(user_id, ContributionType::Adoption, 10))
            .await
            .unwrap();
    }
    services.awarder.evaluate(user_id).await.unwrap();

    assert_eq!(user_badge_rows(&pool, user_id, "Pet Guardian").await, 1);
}

#[tokio::test]
#[ignore = "需要 PostgreSQL"]
async fn test_total_points_is_exact_sum() {
    let pool = setup_pool().await;
    let services = setup_services(&pool).await;
    let user_id = create_user(&pool).await;

    let points = [3, 0, 17, 40];
    for (i, p) in points.iter().enumerate() {
        let contribution_type = ContributionType::ALL[i % ContributionType::ALL.len()];
        services
            .ledger
            .record(contribution(user_id, contribution_type, *p))
            .await
            .unwrap();
    }

    assert_eq!(services.ledger.total_points(user_id).await.unwrap(), 60);
    let stats = services.ledger.stats(user_id).await.unwrap();
    assert_eq!(stats.total_points, 60);
    assert_eq!(stats.contribution_stats.adoption, 1);
    assert_eq!(stats.contribution_stats.blog_post, 1);
}

#[tokio::test]
#[ignore = "需要 PostgreSQL"]
async fn test_concurrent_evaluation_awards_once() {
    let pool = setup_pool().await;
    let services = setup_services(&pool).await;
    let user_id = create_user(&pool).await;

    // 直接写入流水，绕过 record 内的同步评估
    ContributionRepository::new(pool.clone())
        .create(&contribution(user_id, ContributionType::Volunteer, 200))
        .await
        .unwrap();

    let awarder = services.awarder.clone();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let awarder = awarder.clone();
            tokio::spawn(async move { awarder.evaluate(user_id).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(user_badge_rows(&pool, user_id, "Emergency Aid").await, 1);
}

#[tokio::test]
#[ignore = "需要 PostgreSQL"]
async fn test_assign_conflicts_and_missing_user() {
    let pool = setup_pool().await;
    let services = setup_services(&pool).await;
    let user_id = create_user(&pool).await;

    let volunteer_id: i64 = sqlx::query_scalar("SELECT id FROM badges WHERE name = 'Volunteer'")
        .fetch_one(&pool)
        .await
        .unwrap();

    services.awarder.assign(user_id, volunteer_id).await.unwrap();
    let err = services
        .awarder
        .assign(user_id, volunteer_id)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::BadgeAlreadyHeld { .. }));

    let err = services
        .awarder
        .assign(i64::MAX, volunteer_id)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::UserNotFound(_)));
}

#[tokio::test]
#[ignore = "需要 PostgreSQL"]
async fn test_seed_is_idempotent() {
    let pool = setup_pool().await;
    let catalog = BadgeCatalog::new(Arc::new(BadgeRepository::new(pool.clone())));

    catalog.seed().await.unwrap();
    let report = catalog.seed().await.unwrap();

    assert_eq!(report.created, 0);
    assert_eq!(report.updated, 10);
}
