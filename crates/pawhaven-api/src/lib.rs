//! PawHaven HTTP 服务
//!
//! 宠物领养平台的 REST API：账户、帖子、捐赠与徽章。
//!
//! ## 模块结构
//!
//! - `auth`: JWT 签发与验证
//! - `middleware`: 认证中间件与身份提取器
//! - `dto`: 请求和响应的数据传输对象
//! - `error`: 错误类型与响应信封
//! - `extract`: 请求体与路径、查询参数的解析
//! - `handlers`: HTTP 请求处理器
//! - `routes`: 路由配置
//! - `state`: 应用状态
//!
//! ## 技术栈
//!
//! - Web 框架：Axum
//! - 数据验证：validator
//! - 认证：jsonwebtoken (HS256)

pub mod auth;
pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use dto::{ApiResponse, AuthPayload};
pub use error::{ApiError, Result};
pub use state::AppState;
