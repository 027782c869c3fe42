//! 博客处理器

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use pawhaven_core::Blog;
use validator::Validate;

use crate::dto::{ApiResponse, BlogListQuery, CreateBlogRequest, UpdateBlogRequest};
use crate::error::Result;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// GET /api/blogs/
pub async fn list_blogs(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<BlogListQuery>,
) -> Result<Json<ApiResponse<Vec<Blog>>>> {
    let blogs = state.blogs.list(query.limit).await?;
    Ok(Json(ApiResponse::list(blogs)))
}

/// GET /api/blogs/{id}
pub async fn get_blog(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiResponse<Blog>>> {
    let blog = state.blogs.get(id).await?;
    Ok(Json(ApiResponse::success(blog)))
}

/// POST /api/blogs/create
pub async fn create_blog(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiJson(req): ApiJson<CreateBlogRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Blog>>)> {
    req.validate()?;

    let blog = state.blogs.create(current.id(), req.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            blog,
            "Blog created successfully",
        )),
    ))
}

/// 运营部分更新
///
/// PUT /api/blogs/{id}/update
pub async fn update_blog(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<UpdateBlogRequest>,
) -> Result<Json<ApiResponse<Blog>>> {
    req.validate()?;

    let blog = state.blogs.update(current.actor(), id, req.into()).await?;
    Ok(Json(ApiResponse::success_with_message(
        blog,
        "Blog updated successfully",
    )))
}

/// DELETE /api/blogs/{id}/delete
pub async fn delete_blog(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiResponse<()>>> {
    state.blogs.delete(current.actor(), id).await?;
    Ok(Json(ApiResponse::message("Blog deleted successfully")))
}
