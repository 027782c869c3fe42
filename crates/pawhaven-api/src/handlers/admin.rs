//! 运营后台处理器
//!
//! 用户、帖子与评论的全量管理，全部要求运营身份

use axum::{Json, extract::State};
use pawhaven_core::dto::PostView;
use pawhaven_core::{Comment, User};

use crate::dto::{ApiResponse, PaginationParams};
use crate::error::Result;
use crate::extract::{ApiPath, ApiQuery};
use crate::middleware::StaffUser;
use crate::state::AppState;

/// GET /api/auth/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    staff: StaffUser,
    ApiQuery(page): ApiQuery<PaginationParams>,
) -> Result<Json<ApiResponse<Vec<User>>>> {
    let users = state
        .users
        .list_users(&staff.actor(), page.limit, page.offset)
        .await?;
    Ok(Json(ApiResponse::list(users)))
}

/// DELETE /api/auth/admin/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    staff: StaffUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiResponse<()>>> {
    state.users.delete_user(&staff.actor(), id).await?;
    Ok(Json(ApiResponse::message("User deleted successfully")))
}

/// 启用或停用账户
///
/// POST /api/auth/admin/users/{id}/toggle-status
pub async fn toggle_user_status(
    State(state): State<AppState>,
    staff: StaffUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiResponse<User>>> {
    let user = state.users.toggle_status(&staff.actor(), id).await?;
    let message = if user.is_active {
        "User activated successfully"
    } else {
        "User deactivated successfully"
    };
    Ok(Json(ApiResponse::success_with_message(user, message)))
}

/// 全部帖子，不限状态
///
/// GET /api/auth/admin/posts
pub async fn list_posts(
    State(state): State<AppState>,
    staff: StaffUser,
    ApiQuery(page): ApiQuery<PaginationParams>,
) -> Result<Json<ApiResponse<Vec<PostView>>>> {
    let posts = state
        .posts
        .list_all(&staff.actor(), page.limit, page.offset)
        .await?;
    Ok(Json(ApiResponse::list(posts)))
}

/// DELETE /api/auth/admin/posts/{id}
pub async fn delete_post(
    State(state): State<AppState>,
    staff: StaffUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiResponse<()>>> {
    state.posts.delete(staff.actor(), id).await?;
    Ok(Json(ApiResponse::message("Post deleted successfully")))
}

/// GET /api/auth/admin/comments
pub async fn list_comments(
    State(state): State<AppState>,
    staff: StaffUser,
    ApiQuery(page): ApiQuery<PaginationParams>,
) -> Result<Json<ApiResponse<Vec<Comment>>>> {
    let comments = state
        .posts
        .list_all_comments(&staff.actor(), page.limit, page.offset)
        .await?;
    Ok(Json(ApiResponse::list(comments)))
}

/// DELETE /api/auth/admin/comments/{id}
pub async fn delete_comment(
    State(state): State<AppState>,
    staff: StaffUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiResponse<()>>> {
    state.posts.delete_comment(staff.actor(), id).await?;
    Ok(Json(ApiResponse::message("Comment deleted successfully")))
}
