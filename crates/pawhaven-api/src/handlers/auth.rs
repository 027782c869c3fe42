//! 账户相关的 HTTP 处理器
//!
//! 注册、登录、登出与个人资料维护。Token 无状态，登出只返回确认信息。

use axum::{Json, extract::State, http::StatusCode};
use pawhaven_core::{NewUser, User};
use serde_json::{Value, json};
use tracing::info;
use validator::Validate;

use crate::dto::{
    ApiResponse, AuthPayload, ChangePasswordRequest, LoginRequest, RegisterRequest,
    UpdateProfileRequest,
};
use crate::error::Result;
use crate::extract::ApiJson;
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// 连通性检查
///
/// GET /api/auth/test
pub async fn test_connection() -> Json<Value> {
    Json(json!({ "message": "API is working", "status": "ok" }))
}

/// 注册
///
/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthPayload>>)> {
    req.validate()?;

    let user = state.users.register(NewUser::from(req)).await?;
    let payload = issue_token(&state, user)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            payload,
            "User registered successfully",
        )),
    ))
}

/// 登录
///
/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<ApiResponse<AuthPayload>>> {
    req.validate()?;

    let user = state.users.login(&req.email, &req.password).await?;
    let payload = issue_token(&state, user)?;

    Ok(Json(ApiResponse::success_with_message(
        payload,
        "Login successful",
    )))
}

/// 登出
///
/// POST /api/auth/logout
pub async fn logout() -> Json<ApiResponse<()>> {
    Json(ApiResponse::message("Successfully logged out"))
}

/// 当前用户资料
///
/// GET /api/auth/profile
pub async fn profile(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<ApiResponse<User>>> {
    let user = state.users.profile(current.id()).await?;
    Ok(Json(ApiResponse::success(user)))
}

/// 更新资料
///
/// PUT /api/auth/profile/update
pub async fn update_profile(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiJson(req): ApiJson<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<User>>> {
    req.validate()?;

    let user = state.users.update_profile(current.id(), req.into()).await?;
    Ok(Json(ApiResponse::success_with_message(
        user,
        "Profile updated successfully",
    )))
}

/// 修改密码
///
/// POST /api/auth/password/change
pub async fn change_password(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiJson(req): ApiJson<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<()>>> {
    req.validate()?;

    state
        .users
        .change_password(current.id(), &req.old_password, &req.new_password)
        .await?;
    Ok(Json(ApiResponse::message("Password changed successfully")))
}

fn issue_token(state: &AppState, user: User) -> Result<AuthPayload> {
    let (token, expires_at) = state.jwt.generate_token(&user)?;
    info!(user_id = user.id, "Token 已签发");
    Ok(AuthPayload {
        user,
        token,
        expires_at,
    })
}
