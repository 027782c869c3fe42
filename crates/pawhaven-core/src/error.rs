//! 领域服务错误类型
//!
//! 业务错误（校验、未找到、无权限、冲突）由边界层转换为结构化响应；
//! 系统错误（数据库、内部）只记录日志，对外返回通用提示。

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    // === 校验 ===
    #[error("{0}")]
    Validation(String),

    // === 未找到 ===
    #[error("User not found")]
    UserNotFound(i64),

    #[error("Post not found")]
    PostNotFound(i64),

    #[error("Donation not found")]
    DonationNotFound(i64),

    #[error("Badge not found")]
    BadgeNotFound(i64),

    #[error("Comment not found")]
    CommentNotFound(i64),

    #[error("Blog not found")]
    BlogNotFound(i64),

    #[error("Item not found")]
    ItemNotFound(i64),

    #[error("Donation not found")]
    VolunteerDonationNotFound(i64),

    // === 认证与授权 ===
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is disabled")]
    AccountDisabled,

    #[error("{0}")]
    Forbidden(String),

    // === 冲突 ===
    #[error("User with this email already exists")]
    EmailTaken,

    #[error("Username already taken")]
    UsernameTaken,

    #[error("User already has this badge")]
    BadgeAlreadyHeld { user_id: i64, badge_id: i64 },

    #[error("Donation has already been reviewed")]
    DonationAlreadyReviewed(i64),

    #[error("Item is already claimed")]
    ItemAlreadyClaimed(i64),

    // === 业务前置条件 ===
    #[error("Donations are not accepted for this post")]
    DonationsClosed(i64),

    // === 系统错误 ===
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),

    #[error("密码哈希失败: {0}")]
    PasswordHash(String),

    #[error("内部错误: {0}")]
    Internal(String),
}

/// 领域服务 Result 类型别名
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// 检查是否为业务错误（非系统错误）
    pub fn is_business_error(&self) -> bool {
        !matches!(
            self,
            Self::Database(_) | Self::PasswordHash(_) | Self::Internal(_)
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_)
                | Self::PostNotFound(_)
                | Self::DonationNotFound(_)
                | Self::BadgeNotFound(_)
                | Self::CommentNotFound(_)
                | Self::BlogNotFound(_)
                | Self::ItemNotFound(_)
                | Self::VolunteerDonationNotFound(_)
        )
    }

    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::EmailTaken
                | Self::UsernameTaken
                | Self::BadgeAlreadyHeld { .. }
                | Self::DonationAlreadyReviewed(_)
                | Self::ItemAlreadyClaimed(_)
        )
    }

    /// 获取错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::PostNotFound(_) => "POST_NOT_FOUND",
            Self::DonationNotFound(_) => "DONATION_NOT_FOUND",
            Self::BadgeNotFound(_) => "BADGE_NOT_FOUND",
            Self::CommentNotFound(_) => "COMMENT_NOT_FOUND",
            Self::BlogNotFound(_) => "BLOG_NOT_FOUND",
            Self::ItemNotFound(_) => "ITEM_NOT_FOUND",
            Self::VolunteerDonationNotFound(_) => "VOLUNTEER_DONATION_NOT_FOUND",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::AccountDisabled => "ACCOUNT_DISABLED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::BadgeAlreadyHeld { .. } => "BADGE_ALREADY_HELD",
            Self::DonationAlreadyReviewed(_) => "DONATION_ALREADY_REVIEWED",
            Self::ItemAlreadyClaimed(_) => "ITEM_ALREADY_CLAIMED",
            Self::DonationsClosed(_) => "DONATIONS_CLOSED",
            Self::Database(_) => "DATABASE_ERROR",
            Self::PasswordHash(_) => "PASSWORD_HASH_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// 唯一约束冲突的约束名，用于把并发注册的冲突映射回业务错误
pub(crate) fn unique_violation(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            Some(db.constraint().unwrap_or_default().to_string())
        }
        _ => None,
    }
}

/// 外键指向的用户不存在时映射为 `UserNotFound`
pub(crate) fn missing_user(err: sqlx::Error, user_id: i64) -> CoreError {
    match &err {
        sqlx::Error::Database(db)
            if db.is_foreign_key_violation()
                && db.constraint().is_some_and(|c| c.contains("user_id")) =>
        {
            CoreError::UserNotFound(user_id)
        }
        _ => CoreError::Database(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_variants() -> Vec<CoreError> {
        vec![
            CoreError::Validation("bad".to_string()),
            CoreError::UserNotFound(1),
            CoreError::PostNotFound(1),
            CoreError::DonationNotFound(1),
            CoreError::BadgeNotFound(1),
            CoreError::CommentNotFound(1),
            CoreError::BlogNotFound(1),
            CoreError::ItemNotFound(1),
            CoreError::VolunteerDonationNotFound(1),
            CoreError::InvalidCredentials,
            CoreError::AccountDisabled,
            CoreError::Forbidden("no".to_string()),
            CoreError::EmailTaken,
            CoreError::UsernameTaken,
            CoreError::BadgeAlreadyHeld { user_id: 1, badge_id: 2 },
            CoreError::DonationAlreadyReviewed(1),
            CoreError::ItemAlreadyClaimed(1),
            CoreError::DonationsClosed(1),
            CoreError::Database(sqlx::Error::RowNotFound),
            CoreError::PasswordHash("x".to_string()),
            CoreError::Internal("x".to_string()),
        ]
    }

    #[test]
    fn test_error_codes_are_unique() {
        let mut codes: Vec<_> = all_variants().iter().map(|e| e.error_code()).collect();
        let total = codes.len();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), total);
    }

    #[test]
    fn test_error_classification() {
        for err in all_variants() {
            let system = matches!(
                err,
                CoreError::Database(_) | CoreError::PasswordHash(_) | CoreError::Internal(_)
            );
            assert_eq!(err.is_business_error(), !system, "{err:?}");
        }
        assert!(CoreError::PostNotFound(3).is_not_found());
        assert!(!CoreError::EmailTaken.is_not_found());
        assert!(CoreError::BadgeAlreadyHeld { user_id: 1, badge_id: 1 }.is_conflict());
        assert!(!CoreError::InvalidCredentials.is_conflict());
        assert!(CoreError::ItemAlreadyClaimed(4).is_conflict());
        assert!(CoreError::VolunteerDonationNotFound(4).is_not_found());
    }

    #[test]
    fn test_client_messages() {
        assert_eq!(
            CoreError::BadgeAlreadyHeld { user_id: 1, badge_id: 1 }.to_string(),
            "User already has this badge"
        );
        assert_eq!(CoreError::EmailTaken.to_string(), "User with this email already exists");
        assert_eq!(CoreError::InvalidCredentials.to_string(), "Invalid credentials");
    }
}
