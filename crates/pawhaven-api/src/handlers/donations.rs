//! 捐赠处理器
//!
//! 在线捐赠即时确认，线下捐赠待运营审核

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use pawhaven_core::{Donation, PostDonationSummary};
use validator::Validate;

use crate::dto::{
    ApiResponse, CreateDonationRequest, CreateManualDonationRequest, DonationListQuery,
    ReviewDonationRequest, VerifyDonationRequest,
};
use crate::error::{ApiError, Result};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::{CurrentUser, StaffUser};
use crate::state::AppState;

/// GET /api/donations/
pub async fn list_donations(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<DonationListQuery>,
) -> Result<Json<ApiResponse<Vec<Donation>>>> {
    let status = query.status_filter().map_err(ApiError::Validation)?;
    let donations = state
        .donations
        .list(query.post_id, status, query.limit)
        .await?;
    Ok(Json(ApiResponse::list(donations)))
}

/// GET /api/donations/{id}
pub async fn get_donation(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiResponse<Donation>>> {
    let donation = state.donations.get(id).await?;
    Ok(Json(ApiResponse::success(donation)))
}

/// 在线捐赠
///
/// POST /api/donations/create
pub async fn create_donation(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiJson(req): ApiJson<CreateDonationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Donation>>)> {
    req.validate()?;

    let donation = state.donations.create(current.id(), req.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            donation,
            "Donation completed successfully! Your contribution has been added to the pet's funding.",
        )),
    ))
}

/// 线下捐赠
///
/// POST /api/donations/create-manual
pub async fn create_manual_donation(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiJson(req): ApiJson<CreateManualDonationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Donation>>)> {
    req.validate()?;

    let donation = state
        .donations
        .create_manual(current.id(), req.into())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            donation,
            "Manual donation submitted successfully. It will be reviewed by an admin.",
        )),
    ))
}

/// 待审核的线下捐赠
///
/// GET /api/donations/admin/pending
pub async fn list_pending_manual(
    State(state): State<AppState>,
    staff: StaffUser,
) -> Result<Json<ApiResponse<Vec<Donation>>>> {
    let donations = state.donations.list_pending_manual(&staff.actor()).await?;
    Ok(Json(ApiResponse::list(donations)))
}

/// 当前用户的捐赠
///
/// GET /api/donations/user
pub async fn list_user_donations(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<ApiResponse<Vec<Donation>>>> {
    let donations = state.donations.list_for_donor(current.id()).await?;
    Ok(Json(ApiResponse::list(donations)))
}

/// 帖子的已确认捐赠与汇总
///
/// GET /api/donations/post/{post_id}
pub async fn list_post_donations(
    State(state): State<AppState>,
    ApiPath(post_id): ApiPath<i64>,
) -> Result<Json<ApiResponse<PostDonationSummary>>> {
    let summary = state.donations.list_for_post(post_id).await?;
    Ok(Json(ApiResponse::success(summary)))
}

/// POST /api/donations/{id}/verify
pub async fn verify_donation(
    State(state): State<AppState>,
    staff: StaffUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<VerifyDonationRequest>,
) -> Result<Json<ApiResponse<Donation>>> {
    let donation = state.donations.verify(staff.actor(), id, req.action).await?;
    let message = format!("Donation {} successfully", donation.status.as_str());
    Ok(Json(ApiResponse::success_with_message(donation, message)))
}

/// PUT /api/donations/{id}/review
pub async fn review_donation(
    State(state): State<AppState>,
    staff: StaffUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<ReviewDonationRequest>,
) -> Result<Json<ApiResponse<Donation>>> {
    let donation = state
        .donations
        .review(staff.actor(), id, req.action, req.admin_notes.as_deref())
        .await?;
    let message = format!("Donation {} successfully", donation.status.as_str());
    Ok(Json(ApiResponse::success_with_message(donation, message)))
}
