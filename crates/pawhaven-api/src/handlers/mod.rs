//! HTTP 请求处理器模块
//!
//! 处理器只做参数转换与身份提取，业务规则在领域服务中

pub mod admin;
pub mod auth;
pub mod badges;
pub mod blogs;
pub mod donations;
pub mod items;
pub mod posts;
