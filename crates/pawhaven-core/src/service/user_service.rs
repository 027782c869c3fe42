//! 用户服务
//!
//! 注册、登录、资料维护与运营端的用户管理。密码使用 bcrypt 加盐哈希，
//! 哈希计算放到阻塞线程池执行。

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::error::{CoreError, Result, unique_violation};
use crate::models::{Actor, NewUser, ProfilePatch, User};
use crate::repository::UserRepository;

/// 默认分页大小
pub const DEFAULT_USER_LIMIT: i64 = 50;

const MIN_PASSWORD_LEN: usize = 8;

/// 计算密码哈希
pub async fn hash_password(password: &str) -> Result<String> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| CoreError::Internal(e.to_string()))?
        .map_err(|e| CoreError::PasswordHash(e.to_string()))
}

/// 校验密码，损坏的哈希视为不匹配
pub async fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let password = password.to_string();
    let hash = hash.to_string();
    let verified = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| CoreError::Internal(e.to_string()))?;

    match verified {
        Ok(ok) => Ok(ok),
        Err(e) => {
            warn!(error = %e, "密码哈希无法解析");
            Ok(false)
        }
    }
}

fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(CoreError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

fn ensure_staff(actor: &Actor) -> Result<()> {
    if !actor.is_staff {
        return Err(CoreError::Forbidden("Admin access required".to_string()));
    }
    Ok(())
}

pub struct UserService {
    user_repo: Arc<UserRepository>,
}

impl UserService {
    pub fn new(user_repo: Arc<UserRepository>) -> Self {
        Self { user_repo }
    }

    // ==================== 认证 ====================

    /// 注册新用户
    ///
    /// 先查邮箱再查用户名；并发注册时由唯一约束兜底。
    #[instrument(skip(self, new_user), fields(username = %new_user.username))]
    pub async fn register(&self, new_user: NewUser) -> Result<User> {
        let username = new_user.username.trim().to_string();
        let email = new_user.email.trim().to_lowercase();
        if username.is_empty() || email.is_empty() {
            return Err(CoreError::Validation(
                "Username and email are required".to_string(),
            ));
        }
        validate_password(&new_user.password)?;

        if self.user_repo.email_exists(&email).await? {
            return Err(CoreError::EmailTaken);
        }
        if self.user_repo.username_exists(&username).await? {
            return Err(CoreError::UsernameTaken);
        }

        let password_hash = hash_password(&new_user.password).await?;
        let user = self
            .user_repo
            .create(
                &username,
                &email,
                &password_hash,
                new_user.first_name.trim(),
                new_user.last_name.trim(),
            )
            .await
            .map_err(|e| {
                let constraint = match &e {
                    CoreError::Database(db) => unique_violation(db),
                    _ => None,
                };
                match constraint {
                    Some(c) if c.contains("email") => CoreError::EmailTaken,
                    Some(_) => CoreError::UsernameTaken,
                    None => e,
                }
            })?;

        info!(user_id = user.id, "用户已注册");
        Ok(user)
    }

    /// 邮箱密码登录
    ///
    /// 邮箱不存在与密码错误返回同一错误。
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let user = self
            .user_repo
            .find_by_email(email.trim())
            .await?
            .ok_or(CoreError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash).await? {
            return Err(CoreError::InvalidCredentials);
        }
        if !user.is_active {
            return Err(CoreError::AccountDisabled);
        }

        info!(user_id = user.id, "用户已登录");
        Ok(user)
    }

    // ==================== 资料 ====================

    pub async fn find(&self, id: i64) -> Result<Option<User>> {
        self.user_repo.find_by_id(id).await
    }

    pub async fn profile(&self, id: i64) -> Result<User> {
        self.user_repo
            .find_by_id(id)
            .await?
            .ok_or(CoreError::UserNotFound(id))
    }

    pub async fn update_profile(&self, id: i64, patch: ProfilePatch) -> Result<User> {
        self.user_repo
            .update_profile(id, &patch)
            .await?
            .ok_or(CoreError::UserNotFound(id))
    }

    #[instrument(skip(self, old_password, new_password))]
    pub async fn change_password(
        &self,
        id: i64,
        old_password: &str,
        new_password: &str,
    ) -> Result<()> {
        let user = self.profile(id).await?;
        if !verify_password(old_password, &user.password_hash).await? {
            return Err(CoreError::Validation("Invalid old password".to_string()));
        }
        validate_password(new_password)?;

        let password_hash = hash_password(new_password).await?;
        self.user_repo.update_password(id, &password_hash).await?;
        info!(user_id = id, "密码已修改");
        Ok(())
    }

    // ==================== 运营管理 ====================

    pub async fn list_users(&self, actor: &Actor, limit: Option<i64>, offset: Option<i64>) -> Result<Vec<User>> {
        ensure_staff(actor)?;
        let limit = limit.unwrap_or(DEFAULT_USER_LIMIT).clamp(1, 200);
        self.user_repo.list(limit, offset.unwrap_or(0).max(0)).await
    }

    #[instrument(skip(self))]
    pub async fn delete_user(&self, actor: &Actor, id: i64) -> Result<()> {
        ensure_staff(actor)?;
        if actor.user_id == id {
            return Err(CoreError::Validation(
                "Cannot delete your own account".to_string(),
            ));
        }
        if !self.user_repo.delete(id).await? {
            return Err(CoreError::UserNotFound(id));
        }
        info!(user_id = id, admin_id = actor.user_id, "用户已删除");
        Ok(())
    }

    /// 启用或停用账户
    #[instrument(skip(self))]
    pub async fn toggle_status(&self, actor: &Actor, id: i64) -> Result<User> {
        ensure_staff(actor)?;
        if actor.user_id == id {
            return Err(CoreError::Validation(
                "Cannot modify your own account status".to_string(),
            ));
        }
        let user = self
            .user_repo
            .toggle_active(id)
            .await?
            .ok_or(CoreError::UserNotFound(id))?;
        info!(user_id = id, is_active = user.is_active, "账户状态已切换");
        Ok(user)
    }
}
