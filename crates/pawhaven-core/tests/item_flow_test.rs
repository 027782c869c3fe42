//! 博客、物资认领与上门取件集成测试
//!
//! ## 运行方式
//!
//! ```bash
//! DATABASE_URL=postgres://... cargo test -p pawhaven-core --test item_flow_test -- --ignored
//! ```

use std::sync::Arc;

use sqlx::PgPool;

use pawhaven_core::error::CoreError;
use pawhaven_core::{
    Actor, BlogPatch, BlogRepository, BlogService, ItemRepository, ItemService, ItemStatus,
    ItemType, NewBlog, NewItem, NewVolunteerDonation, UserRepository, VolunteerItemType,
    VolunteerStatus,
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

fn item_service(pool: &PgPool) -> ItemService {
    ItemService::new(
        pool.clone(),
        Arc::new(ItemRepository::new(pool.clone())),
        Arc::new(UserRepository::new(pool.clone())),
    )
}

fn blog_service(pool: &PgPool) -> BlogService {
    BlogService::new(Arc::new(BlogRepository::new(pool.clone())))
}

async fn create_user(pool: &PgPool, is_staff: bool) -> Actor {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    let user = UserRepository::new(pool.clone())
        .create(
            &format!("it_{}", &suffix[..12]),
            &format!("it_{suffix}@example.com"),
            "not-a-real-hash",
            "Integration",
            "Tester",
        )
        .await
        .expect("创建测试用户失败");

    if is_staff {
        sqlx::query("UPDATE users SET is_staff = TRUE WHERE id = $1")
            .bind(user.id)
            .execute(pool)
            .await
            .expect("设置运营标记失败");
    }
    Actor {
        user_id: user.id,
        is_staff,
    }
}

fn dog_bed() -> NewItem {
    NewItem {
        title: "Large dog bed".to_string(),
        description: "Washed, barely used".to_string(),
        item_type: ItemType::Accessory,
        location: "Riverside".to_string(),
        contact_info: "555-0199".to_string(),
    }
}

fn kibble_pickup() -> NewVolunteerDonation {
    NewVolunteerDonation {
        item_type: VolunteerItemType::Food,
        description: "Three sealed bags of kibble".to_string(),
        quantity: "3 bags".to_string(),
        estimated_value: None,
        pickup_location: "12 Elm St".to_string(),
        contact_number: "555-0100".to_string(),
        available_times: "Weekends".to_string(),
        special_instructions: String::new(),
    }
}

// ==================== 物资认领 ====================

#[tokio::test]
#[ignore = "需要 PostgreSQL"]
async fn test_item_can_only_be_claimed_once() {
    let pool = setup_pool().await;
    let service = item_service(&pool);
    let donor = create_user(&pool, false).await;
    let first = create_user(&pool, false).await;
    let second = create_user(&pool, false).await;

    let item = service.create(donor.user_id, dog_bed()).await.unwrap();
    assert_eq!(item.status, ItemStatus::Available);

    let (a, b) = tokio::join!(
        service.claim(first.user_id, item.id),
        service.claim(second.user_id, item.id),
    );
    let outcomes = [a, b];
    let winners: Vec<_> = outcomes.iter().filter_map(|r| r.as_ref().ok()).collect();
    assert_eq!(winners.len(), 1);
    assert_eq!(winners[0].status, ItemStatus::Claimed);
    assert!(winners[0].claimed_at.is_some());
    assert!(
        outcomes
            .iter()
            .any(|r| matches!(r, Err(CoreError::ItemAlreadyClaimed(id)) if *id == item.id))
    );

    let listed = service.list_available(None, Some(200)).await.unwrap();
    assert!(listed.iter().all(|i| i.id != item.id));
}

#[tokio::test]
#[ignore = "需要 PostgreSQL"]
async fn test_claiming_missing_item_is_not_found() {
    let pool = setup_pool().await;
    let user = create_user(&pool, false).await;

    let err = item_service(&pool).claim(user.user_id, i64::MAX).await.unwrap_err();
    assert!(matches!(err, CoreError::ItemNotFound(_)));
}

// ==================== 上门取件 ====================

#[tokio::test]
#[ignore = "需要 PostgreSQL"]
async fn test_pickup_assignment_and_progress() {
    let pool = setup_pool().await;
    let service = item_service(&pool);
    let donor = create_user(&pool, false).await;
    let volunteer = create_user(&pool, false).await;
    let staff = create_user(&pool, true).await;

    let pickup = service
        .create_volunteer_donation(donor.user_id, kibble_pickup())
        .await
        .unwrap();
    assert_eq!(pickup.status, VolunteerStatus::Pending);

    // 未指派前志愿者无权更新
    let err = service
        .update_volunteer_status(volunteer, pickup.id, VolunteerStatus::Collected)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Forbidden(_)));

    let assigned = service
        .assign_volunteer(staff, pickup.id, Some(volunteer.user_id))
        .await
        .unwrap();
    assert_eq!(assigned.status, VolunteerStatus::Assigned);
    assert_eq!(assigned.assigned_volunteer, Some(volunteer.user_id));

    let collected = service
        .update_volunteer_status(volunteer, pickup.id, VolunteerStatus::Collected)
        .await
        .unwrap();
    assert!(collected.collected_at.is_some());

    // 被指派的志愿者能在列表中看到这条登记
    let mine = service
        .list_volunteer_donations(&volunteer, None, None)
        .await
        .unwrap();
    assert!(mine.iter().any(|d| d.id == pickup.id));

    let err = service
        .update_volunteer_status(donor, pickup.id, VolunteerStatus::Completed)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Forbidden(_)));

    let unassigned = service.assign_volunteer(staff, pickup.id, None).await.unwrap();
    assert_eq!(unassigned.status, VolunteerStatus::Pending);
    assert_eq!(unassigned.assigned_at, None);
}

#[tokio::test]
#[ignore = "需要 PostgreSQL"]
async fn test_assigning_unknown_volunteer_is_not_found() {
    let pool = setup_pool().await;
    let service = item_service(&pool);
    let donor = create_user(&pool, false).await;
    let staff = create_user(&pool, true).await;
    let pickup = service
        .create_volunteer_donation(donor.user_id, kibble_pickup())
        .await
        .unwrap();

    let err = service
        .assign_volunteer(staff, pickup.id, Some(i64::MAX))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::UserNotFound(_)));
}

// ==================== 博客 ====================

#[tokio::test]
#[ignore = "需要 PostgreSQL"]
async fn test_blog_lifecycle() {
    let pool = setup_pool().await;
    let service = blog_service(&pool);
    let author = create_user(&pool, false).await;
    let staff = create_user(&pool, true).await;

    let blog = service
        .create(
            author.user_id,
            NewBlog {
                title: "First week with a rescue".to_string(),
                content: "She hid under the bed for two days.".to_string(),
                image: None,
                tags: vec!["adoption".to_string(), "dogs".to_string()],
            },
        )
        .await
        .unwrap();
    assert_eq!(blog.tags, vec!["adoption", "dogs"]);

    let patch = || BlogPatch {
        tags: Some(vec!["rescue".to_string()]),
        ..Default::default()
    };
    let err = service.update(author, blog.id, patch()).await.unwrap_err();
    assert!(matches!(err, CoreError::Forbidden(_)));

    let updated = service.update(staff, blog.id, patch()).await.unwrap();
    assert_eq!(updated.tags, vec!["rescue"]);
    assert_eq!(updated.title, blog.title);

    service.delete(staff, blog.id).await.unwrap();
    let err = service.get(blog.id).await.unwrap_err();
    assert!(matches!(err, CoreError::BlogNotFound(_)));
}
