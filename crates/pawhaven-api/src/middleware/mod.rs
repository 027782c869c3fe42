//! 中间件模块
//!
//! 提供 JWT 认证中间件与身份提取器

mod auth;
mod extractors;

pub use auth::auth_middleware;
pub use extractors::{CurrentUser, StaffUser};
