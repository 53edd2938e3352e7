use crate::auth::User;
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

/// 已通过认证的当前用户，放在请求扩展中供 handler 读取
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Bearer 令牌校验中间件
pub async fn require_auth(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(auth) = bearer.ok_or(AppError::Unauthorized)?;
    let claims = state.tokens.verify(auth.token())?;

    let user = state.users.get(&claims.sub).ok_or(AppError::Unauthorized)?;
    if user.disabled {
        return Err(AppError::InactiveUser);
    }

    req.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(req).await)
}
