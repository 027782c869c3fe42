//! JWT 认证中间件
//!
//! 解析 Bearer Token 并把当前用户注入请求扩展。中间件本身不拒绝请求，
//! 缺失或无效的 Token 按匿名请求处理，由处理器上的提取器决定是否需要身份。

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use pawhaven_core::User;
use tracing::{debug, warn};

use crate::middleware::extractors::CurrentUser;
use crate::state::AppState;

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(user) = resolve_user(&state, request.headers()).await {
        request.extensions_mut().insert(CurrentUser(user));
    }
    next.run(request).await
}

/// Token 对应的用户必须存在且处于启用状态
async fn resolve_user(state: &AppState, headers: &HeaderMap) -> Option<User> {
    let bearer = headers.typed_get::<Authorization<Bearer>>()?;

    let claims = match state.jwt.verify_token(bearer.token()) {
        Ok(claims) => claims,
        Err(e) => {
            debug!(error = %e, "Token 无效，按匿名请求处理");
            return None;
        }
    };
    let user_id = claims.user_id().ok()?;

    match state.users.find(user_id).await {
        Ok(Some(user)) if user.is_active => Some(user),
        Ok(_) => {
            debug!(user_id, "Token 对应的用户不存在或已停用");
            None
        }
        Err(e) => {
            warn!(user_id, error = %e, "查询 Token 用户失败");
            None
        }
    }
}
