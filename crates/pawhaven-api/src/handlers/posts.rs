//! 帖子处理器
//!
//! 帖子浏览与发布、进展更新、评论和收藏

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use pawhaven_core::dto::{BookmarkState, PostView};
use pawhaven_core::{Bookmark, Comment, PostUpdate};
use validator::Validate;

use crate::dto::{
    ApiResponse, CommentRequest, CreatePostRequest, EditPostRequest, PostListQuery,
    PostUpdateRequest,
};
use crate::error::Result;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// 帖子列表，默认只含进行中的帖子
///
/// GET /api/posts/
pub async fn list_posts(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PostListQuery>,
) -> Result<Json<ApiResponse<Vec<PostView>>>> {
    let posts = state
        .posts
        .list(query.post_type, query.status, query.limit)
        .await?;
    Ok(Json(ApiResponse::list(posts)))
}

/// GET /api/posts/{id}
pub async fn get_post(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiResponse<PostView>>> {
    let post = state.posts.get(id).await?;
    Ok(Json(ApiResponse::success(post)))
}

/// POST /api/posts/create
pub async fn create_post(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiJson(req): ApiJson<CreatePostRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PostView>>)> {
    req.validate()?;

    let post = state.posts.create(current.id(), req.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            post,
            "Post created successfully",
        )),
    ))
}

/// PUT /api/posts/{id}/edit
pub async fn edit_post(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<EditPostRequest>,
) -> Result<Json<ApiResponse<PostView>>> {
    req.validate()?;

    let post = state.posts.edit(current.actor(), id, req.into()).await?;
    Ok(Json(ApiResponse::success_with_message(
        post,
        "Post updated successfully",
    )))
}

/// DELETE /api/posts/{id}/delete
pub async fn delete_post(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiResponse<()>>> {
    state.posts.delete(current.actor(), id).await?;
    Ok(Json(ApiResponse::message("Post deleted successfully")))
}

// ==================== 进展更新 ====================

/// POST /api/posts/{id}/update
pub async fn add_update(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<PostUpdateRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PostUpdate>>)> {
    req.validate()?;

    let update = state
        .posts
        .add_update(current.actor(), id, &req.update_text)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            update,
            "Update added successfully",
        )),
    ))
}

/// GET /api/posts/{id}/updates
pub async fn list_updates(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiResponse<Vec<PostUpdate>>>> {
    let updates = state.posts.list_updates(id).await?;
    Ok(Json(ApiResponse::list(updates)))
}

// ==================== 评论 ====================

/// GET /api/posts/{id}/comments
pub async fn list_comments(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiResponse<Vec<Comment>>>> {
    let comments = state.posts.list_comments(id).await?;
    Ok(Json(ApiResponse::list(comments)))
}

/// POST /api/posts/{id}/comment
pub async fn add_comment(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<CommentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Comment>>)> {
    req.validate()?;

    let comment = state
        .posts
        .add_comment(current.id(), id, &req.content)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            comment,
            "Comment created successfully",
        )),
    ))
}

/// DELETE /api/posts/comments/{id}/delete
pub async fn delete_comment(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiResponse<()>>> {
    state.posts.delete_comment(current.actor(), id).await?;
    Ok(Json(ApiResponse::message("Comment deleted successfully")))
}

// ==================== 收藏 ====================

/// 切换收藏
///
/// POST /api/posts/{id}/bookmark
pub async fn toggle_bookmark(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiResponse<BookmarkState>>> {
    let bookmark = state.posts.toggle_bookmark(current.id(), id).await?;
    let message = if bookmark.bookmarked {
        "Post bookmarked successfully"
    } else {
        "Bookmark removed successfully"
    };
    Ok(Json(ApiResponse::success_with_message(bookmark, message)))
}

/// GET /api/posts/bookmarks
pub async fn list_bookmarks(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<ApiResponse<Vec<Bookmark>>>> {
    let bookmarks = state.posts.list_bookmarks(current.id()).await?;
    Ok(Json(ApiResponse::list(bookmarks)))
}

/// 匿名访问返回未收藏
///
/// GET /api/posts/{id}/bookmark-status
pub async fn bookmark_status(
    State(state): State<AppState>,
    current: Option<CurrentUser>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiResponse<BookmarkState>>> {
    let status = state
        .posts
        .bookmark_status(current.map(|u| u.id()), id)
        .await?;
    Ok(Json(ApiResponse::success(status)))
}
