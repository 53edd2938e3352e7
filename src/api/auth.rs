use crate::auth::{CurrentUser, User};
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Json, State},
    Extension, Form,
};
use serde::{Deserialize, Serialize};

/// 登录表单（application/x-www-form-urlencoded）
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

/// POST /token
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>, AppError> {
    let Some(user) = state.users.authenticate(&form.username, &form.password) else {
        tracing::warn!("Failed login for {}", form.username);
        return Err(AppError::InvalidCredentials);
    };

    let access_token = state.tokens.issue(&user.username)?;
    tracing::info!("Issued token for {}", user.username);

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer",
        expires_in: state.tokens.ttl().num_seconds(),
    }))
}

/// GET /users/me
pub async fn me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<User> {
    Json(user)
}
