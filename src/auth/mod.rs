//! 登录与令牌校验
//!
//! 用户名/密码换取 HS256 JWT，受保护路由通过 [`require_auth`] 中间件校验 Bearer 令牌。

pub mod middleware;
pub mod token;
pub mod users;

pub use middleware::{require_auth, CurrentUser};
pub use token::{Claims, TokenIssuer};
pub use users::{User, UserDirectory};
