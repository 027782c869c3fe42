//! 徽章处理器
//!
//! 目录查询、用户徽章、手动授予与贡献记录

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use pawhaven_core::dto::{BadgeAssignment, ContributionReceipt};
use pawhaven_core::{Badge, SeedReport, UserBadgeDetail, UserStats};
use tracing::info;
use validator::Validate;

use crate::dto::{ApiResponse, AssignBadgeRequest, BadgeListQuery, RecordContributionRequest};
use crate::error::Result;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::{CurrentUser, StaffUser};
use crate::state::AppState;

/// 徽章目录
///
/// GET /api/badges/
pub async fn list_badges(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<BadgeListQuery>,
) -> Result<Json<ApiResponse<Vec<Badge>>>> {
    let badges = state.catalog.list(query.category, query.limit).await?;
    Ok(Json(ApiResponse::list(badges)))
}

/// GET /api/badges/{id}
pub async fn get_badge(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiResponse<Badge>>> {
    let badge = state.catalog.get(id).await?;
    Ok(Json(ApiResponse::success(badge)))
}

/// 当前用户的徽章
///
/// GET /api/badges/user
pub async fn my_badges(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<ApiResponse<Vec<UserBadgeDetail>>>> {
    let badges = state.ledger.user_badges(current.id()).await?;
    Ok(Json(ApiResponse::list(badges)))
}

/// 指定用户的徽章
///
/// GET /api/badges/user/{user_id}
pub async fn user_badges(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<i64>,
) -> Result<Json<ApiResponse<Vec<UserBadgeDetail>>>> {
    let badges = state.ledger.user_badges(user_id).await?;
    Ok(Json(ApiResponse::list(badges)))
}

/// 运营手动授予
///
/// POST /api/badges/assign
pub async fn assign_badge(
    State(state): State<AppState>,
    staff: StaffUser,
    ApiJson(req): ApiJson<AssignBadgeRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BadgeAssignment>>)> {
    let assignment = state.awarder.assign(req.user_id, req.badge_id).await?;
    info!(
        user_id = req.user_id,
        badge_id = req.badge_id,
        admin_id = staff.id(),
        "徽章已手动授予"
    );
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            assignment,
            "Badge assigned successfully",
        )),
    ))
}

/// 记录贡献并评估徽章
///
/// POST /api/badges/contribution
pub async fn record_contribution(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiJson(req): ApiJson<RecordContributionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ContributionReceipt>>)> {
    req.validate()?;

    let receipt = state
        .ledger
        .record(req.into_contribution(current.id()))
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            receipt,
            "Contribution recorded successfully",
        )),
    ))
}

/// 当前用户的积分统计
///
/// GET /api/badges/stats
pub async fn stats(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<ApiResponse<UserStats>>> {
    let stats = state.ledger.stats(current.id()).await?;
    Ok(Json(ApiResponse::success(stats)))
}

/// 写入内置徽章目录
///
/// POST /api/badges/seed
pub async fn seed_catalog(
    State(state): State<AppState>,
    staff: StaffUser,
) -> Result<Json<ApiResponse<SeedReport>>> {
    let report = state.catalog.seed().await?;
    info!(admin_id = staff.id(), "徽章目录已由运营写入");
    Ok(Json(ApiResponse::success_with_message(
        report,
        "Badge catalog seeded",
    )))
}
