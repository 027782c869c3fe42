//! 路由配置模块
//!
//! 定义所有 REST API 端点的路由映射

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::{handlers, state::AppState};

/// 账户与运营后台路由
///
/// 挂载在 /api/auth，兼容旧客户端时也挂载在 /api/users
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/test", get(handlers::auth::test_connection))
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout))
        .route("/profile", get(handlers::auth::profile))
        .route("/profile/update", put(handlers::auth::update_profile))
        .route("/password/change", post(handlers::auth::change_password))
        // 运营后台
        .route("/admin/users", get(handlers::admin::list_users))
        .route("/admin/users/{id}", delete(handlers::admin::delete_user))
        .route(
            "/admin/users/{id}/toggle-status",
            post(handlers::admin::toggle_user_status),
        )
        .route("/admin/posts", get(handlers::admin::list_posts))
        .route("/admin/posts/{id}", delete(handlers::admin::delete_post))
        .route("/admin/comments", get(handlers::admin::list_comments))
        .route(
            "/admin/comments/{id}",
            delete(handlers::admin::delete_comment),
        )
}

/// 帖子路由
///
/// 挂载在 /api/posts，也挂载在 /api/pets
pub fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::posts::list_posts))
        .route("/create", post(handlers::posts::create_post))
        .route("/bookmarks", get(handlers::posts::list_bookmarks))
        .route(
            "/comments/{id}/delete",
            delete(handlers::posts::delete_comment),
        )
        .route("/{id}", get(handlers::posts::get_post))
        .route("/{id}/update", post(handlers::posts::add_update))
        .route("/{id}/updates", get(handlers::posts::list_updates))
        .route("/{id}/edit", put(handlers::posts::edit_post))
        .route("/{id}/delete", delete(handlers::posts::delete_post))
        .route("/{id}/comments", get(handlers::posts::list_comments))
        .route("/{id}/comment", post(handlers::posts::add_comment))
        .route("/{id}/bookmark", post(handlers::posts::toggle_bookmark))
        .route(
            "/{id}/bookmark-status",
            get(handlers::posts::bookmark_status),
        )
}

/// 捐赠路由
pub fn donation_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::donations::list_donations))
        .route("/create", post(handlers::donations::create_donation))
        .route(
            "/create-manual",
            post(handlers::donations::create_manual_donation),
        )
        .route(
            "/admin/pending",
            get(handlers::donations::list_pending_manual),
        )
        .route("/user", get(handlers::donations::list_user_donations))
        .route(
            "/post/{post_id}",
            get(handlers::donations::list_post_donations),
        )
        .route("/{id}", get(handlers::donations::get_donation))
        .route("/{id}/verify", post(handlers::donations::verify_donation))
        .route("/{id}/review", put(handlers::donations::review_donation))
}

/// 徽章路由
pub fn badge_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::badges::list_badges))
        .route("/user", get(handlers::badges::my_badges))
        .route("/user/{user_id}", get(handlers::badges::user_badges))
        .route("/assign", post(handlers::badges::assign_badge))
        .route(
            "/contribution",
            post(handlers::badges::record_contribution),
        )
        .route("/stats", get(handlers::badges::stats))
        .route("/seed", post(handlers::badges::seed_catalog))
        .route("/{id}", get(handlers::badges::get_badge))
}

/// 博客路由
pub fn blog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::blogs::list_blogs))
        .route("/create", post(handlers::blogs::create_blog))
        .route("/{id}", get(handlers::blogs::get_blog))
        .route("/{id}/update", put(handlers::blogs::update_blog))
        .route("/{id}/delete", delete(handlers::blogs::delete_blog))
}

/// 物资与上门取件路由
pub fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::items::list_items))
        .route("/create", post(handlers::items::create_item))
        .route("/{id}/claim", post(handlers::items::claim_item))
        .route(
            "/volunteer-donations",
            get(handlers::items::list_volunteer_donations),
        )
        .route(
            "/volunteer-donations/create",
            post(handlers::items::create_volunteer_donation),
        )
        .route(
            "/volunteer-donations/{id}/assign",
            put(handlers::items::assign_volunteer),
        )
        .route(
            "/volunteer-donations/{id}/status",
            put(handlers::items::update_volunteer_status),
        )
}

/// 构建完整的 API 路由
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/users", auth_routes())
        .nest("/posts", post_routes())
        .nest("/pets", post_routes())
        .nest("/donations", donation_routes())
        .nest("/badges", badge_routes())
        .nest("/blogs", blog_routes())
        .nest("/items", item_routes())
}
