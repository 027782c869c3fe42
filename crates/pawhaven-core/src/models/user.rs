//! 用户实体

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 平台用户
///
/// 密码哈希只在仓储和认证流程内流转，序列化时跳过
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub location: String,
    pub bio: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn actor(&self) -> Actor {
        Actor {
            user_id: self.id,
            is_staff: self.is_staff,
        }
    }
}

/// 当前操作者
///
/// 服务层授权检查只需要用户 ID 与运营标记
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: i64,
    pub is_staff: bool,
}

impl Actor {
    /// 本人或运营可操作
    pub fn can_manage(&self, owner_id: i64) -> bool {
        self.is_staff || self.user_id == owner_id
    }
}

/// 注册参数
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// 资料修改，None 表示保持原值
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfilePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
}
