//! 身份提取器
//!
//! 从认证中间件注入的请求扩展中读取当前用户

use std::convert::Infallible;

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::request::Parts;
use pawhaven_core::{Actor, User};

use crate::error::ApiError;

/// 已登录用户，未登录时返回 401
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    pub fn id(&self) -> i64 {
        self.0.id
    }

    pub fn actor(&self) -> Actor {
        self.0.actor()
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))
    }
}

/// 匿名访问时为 None
impl<S> OptionalFromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<CurrentUser>().cloned())
    }
}

/// 运营用户，未登录 401，非运营 403
#[derive(Debug, Clone)]
pub struct StaffUser(pub User);

impl StaffUser {
    pub fn id(&self) -> i64 {
        self.0.id
    }

    pub fn actor(&self) -> Actor {
        self.0.actor()
    }
}

impl<S> FromRequestParts<S> for StaffUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) =
            <CurrentUser as FromRequestParts<S>>::from_request_parts(parts, state).await?;
        if !user.is_staff {
            return Err(ApiError::Forbidden("Admin access required".to_string()));
        }
        Ok(StaffUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};
    use chrono::Utc;

    fn user(is_staff: bool) -> User {
        User {
            id: 5,
            username: "rescuer".to_string(),
            email: "rescuer@example.com".to_string(),
            password_hash: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            location: String::new(),
            bio: String::new(),
            is_active: true,
            is_staff,
            is_superuser: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn parts(current: Option<User>) -> Parts {
        let (mut parts, _) = Request::builder().uri("/").body(()).unwrap().into_parts();
        if let Some(user) = current {
            parts.extensions.insert(CurrentUser(user));
        }
        parts
    }

    #[tokio::test]
    async fn test_current_user_requires_login() {
        let mut anonymous = parts(None);
        let err = <CurrentUser as FromRequestParts<()>>::from_request_parts(&mut anonymous, &())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);

        let mut signed_in = parts(Some(user(false)));
        let current = <CurrentUser as FromRequestParts<()>>::from_request_parts(&mut signed_in, &())
            .await
            .unwrap();
        assert_eq!(current.id(), 5);
        assert!(!current.actor().is_staff);
    }

    #[tokio::test]
    async fn test_optional_current_user() {
        let mut anonymous = parts(None);
        let current =
            <CurrentUser as OptionalFromRequestParts<()>>::from_request_parts(&mut anonymous, &())
                .await
                .unwrap();
        assert!(current.is_none());

        let mut signed_in = parts(Some(user(false)));
        let current =
            <CurrentUser as OptionalFromRequestParts<()>>::from_request_parts(&mut signed_in, &())
                .await
                .unwrap();
        assert_eq!(current.map(|u| u.id()), Some(5));
    }

    #[tokio::test]
    async fn test_staff_user() {
        let mut anonymous = parts(None);
        let err = StaffUser::from_request_parts(&mut anonymous, &()).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);

        let mut member = parts(Some(user(false)));
        let err = StaffUser::from_request_parts(&mut member, &()).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.to_string(), "Admin access required");

        let mut staff = parts(Some(user(true)));
        let staff = StaffUser::from_request_parts(&mut staff, &()).await.unwrap();
        assert!(staff.actor().is_staff);
    }
}
