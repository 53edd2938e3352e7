use crate::auth::{TokenIssuer, User, UserDirectory};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::service::{ClientStore, SettingsStore};
use std::sync::Arc;

/// 共享状态：通过 axum `State` 注入所有 handler
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<SettingsStore>,
    pub clients: Arc<ClientStore>,
    pub users: Arc<UserDirectory>,
    pub tokens: Arc<TokenIssuer>,
}

impl AppState {
    pub fn new(settings: SettingsStore, users: UserDirectory, tokens: TokenIssuer) -> Self {
        Self {
            settings: Arc::new(settings),
            clients: Arc::new(ClientStore::new()),
            users: Arc::new(users),
            tokens: Arc::new(tokens),
        }
    }

    /// 按配置构建：加载价目表、注册管理员账号
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let settings = match &config.pricing.settings_path {
            Some(path) => SettingsStore::from_json_file(path)?,
            None => SettingsStore::default(),
        };

        let users = UserDirectory::new();
        users.add_user(
            User {
                username: config.auth.admin_username.clone(),
                email: None,
                full_name: Some("Admin User".to_string()),
                disabled: false,
            },
            &config.auth.admin_password,
        )?;

        let tokens = TokenIssuer::new(config.auth.jwt_secret.as_bytes(), config.auth.token_ttl_minutes);

        Ok(Self::new(settings, users, tokens))
    }
}
