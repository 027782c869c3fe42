//! 响应 DTO 定义
//!
//! 所有 REST API 的响应体结构

use pawhaven_core::User;
use serde::Serialize;

/// API 统一响应
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// 列表响应附带条数
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
}

impl<T> ApiResponse<T> {
    /// 创建成功响应
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            total: None,
        }
    }

    /// 创建带提示信息的成功响应
    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
            total: None,
        }
    }
}

impl<T> ApiResponse<Vec<T>> {
    /// 列表响应，total 为本次返回的条数
    pub fn list(items: Vec<T>) -> Self {
        let total = items.len();
        Self {
            success: true,
            data: Some(items),
            message: None,
            total: Some(total),
        }
    }
}

impl ApiResponse<()> {
    /// 只有提示信息的成功响应
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
            total: None,
        }
    }
}

/// 注册与登录的响应体
#[derive(Debug, Serialize)]
pub struct AuthPayload {
    pub user: User,
    pub token: String,
    pub expires_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope() {
        let body = serde_json::to_value(ApiResponse::success(json!({"id": 1}))).unwrap();
        assert_eq!(body, json!({"success": true, "data": {"id": 1}}));
    }

    #[test]
    fn test_list_envelope_carries_total() {
        let body = serde_json::to_value(ApiResponse::list(vec![1, 2, 3])).unwrap();
        assert_eq!(body["total"], 3);
        assert_eq!(body["data"], json!([1, 2, 3]));
    }

    #[test]
    fn test_message_envelope() {
        let body = serde_json::to_value(ApiResponse::message("Logout successful")).unwrap();
        assert_eq!(body, json!({"success": true, "message": "Logout successful"}));
    }
}
