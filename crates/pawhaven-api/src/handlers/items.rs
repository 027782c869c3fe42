//! 物资处理器
//!
//! 物资发布与认领，上门取件登记与志愿者跟进

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use pawhaven_core::{Item, VolunteerDonation};
use validator::Validate;

use crate::dto::{
    ApiResponse, AssignVolunteerRequest, CreateItemRequest, CreateVolunteerDonationRequest,
    ItemListQuery, PaginationParams, VolunteerStatusRequest,
};
use crate::error::Result;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// 可认领的物资
///
/// GET /api/items/
pub async fn list_items(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ItemListQuery>,
) -> Result<Json<ApiResponse<Vec<Item>>>> {
    let items = state
        .items
        .list_available(query.item_type, query.limit)
        .await?;
    Ok(Json(ApiResponse::list(items)))
}

/// POST /api/items/create
pub async fn create_item(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiJson(req): ApiJson<CreateItemRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Item>>)> {
    req.validate()?;

    let item = state.items.create(current.id(), req.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            item,
            "Item created successfully",
        )),
    ))
}

/// POST /api/items/{id}/claim
pub async fn claim_item(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiResponse<Item>>> {
    let item = state.items.claim(current.id(), id).await?;
    Ok(Json(ApiResponse::success_with_message(
        item,
        "Item claimed successfully",
    )))
}

// ==================== 上门取件 ====================

/// 运营看到全部，其他用户看到自己登记或被指派的
///
/// GET /api/items/volunteer-donations
pub async fn list_volunteer_donations(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiQuery(params): ApiQuery<PaginationParams>,
) -> Result<Json<ApiResponse<Vec<VolunteerDonation>>>> {
    let donations = state
        .items
        .list_volunteer_donations(&current.actor(), params.limit, params.offset)
        .await?;
    Ok(Json(ApiResponse::list(donations)))
}

/// POST /api/items/volunteer-donations/create
pub async fn create_volunteer_donation(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiJson(req): ApiJson<CreateVolunteerDonationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<VolunteerDonation>>)> {
    req.validate()?;

    let donation = state
        .items
        .create_volunteer_donation(current.id(), req.into())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            donation,
            "Volunteer donation created successfully. A volunteer will contact you soon.",
        )),
    ))
}

/// PUT /api/items/volunteer-donations/{id}/assign
pub async fn assign_volunteer(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<AssignVolunteerRequest>,
) -> Result<Json<ApiResponse<VolunteerDonation>>> {
    let donation = state
        .items
        .assign_volunteer(current.actor(), id, req.volunteer_id)
        .await?;
    Ok(Json(ApiResponse::success_with_message(
        donation,
        "Volunteer assignment updated successfully",
    )))
}

/// PUT /api/items/volunteer-donations/{id}/status
pub async fn update_volunteer_status(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<VolunteerStatusRequest>,
) -> Result<Json<ApiResponse<VolunteerDonation>>> {
    let donation = state
        .items
        .update_volunteer_status(current.actor(), id, req.status)
        .await?;
    Ok(Json(ApiResponse::success_with_message(
        donation,
        "Donation status updated successfully",
    )))
}
