//! HTTP 层错误类型定义
//!
//! 领域错误原样包裹，另加认证与请求解析阶段的错误

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pawhaven_core::CoreError;
use serde_json::json;

const GENERIC_MESSAGE: &str = "Internal server error";

/// HTTP 层错误类型
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] CoreError),

    // 认证错误
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),

    // 请求错误
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),

    // 系统错误
    #[error("内部错误: {0}")]
    Internal(String),
}

impl ApiError {
    /// 返回对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Core(err) => core_status(err),
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 返回错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Core(err) => err.error_code(),
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn is_system_error(&self) -> bool {
        match self {
            Self::Core(err) => !err.is_business_error(),
            Self::Internal(_) => true,
            _ => false,
        }
    }
}

fn core_status(err: &CoreError) -> StatusCode {
    if err.is_not_found() {
        return StatusCode::NOT_FOUND;
    }
    if err.is_conflict() {
        return StatusCode::CONFLICT;
    }
    match err {
        CoreError::Validation(_) | CoreError::DonationsClosed(_) => StatusCode::BAD_REQUEST,
        CoreError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        CoreError::AccountDisabled | CoreError::Forbidden(_) => StatusCode::FORBIDDEN,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 系统级错误只返回通用提示，详细信息仅记录日志
        let message = if self.is_system_error() {
            tracing::error!(error = %self, code = self.error_code(), "请求处理失败");
            GENERIC_MESSAGE.to_string()
        } else {
            self.to_string()
        };

        let body = json!({
            "success": false,
            "error": message,
            "code": self.error_code(),
        });

        (status, axum::Json(body)).into_response()
    }
}

/// 从 validator 错误转换
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

/// HTTP 层 Result 类型别名
pub type Result<T> = std::result::Result<T, ApiError>;
