use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 应用配置
///
/// 加载顺序：内置默认值 -> 可选的 `quote.{toml,json,yaml}` -> `QUOTE_` 前缀环境变量，
/// 嵌套字段用双下划线分隔，如 `QUOTE_SERVER__PORT=9000`、`QUOTE_AUTH__JWT_SECRET=...`。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_minutes: u32,
    pub admin_username: String,
    pub admin_password: String,
}

// 启动日志会打印配置，密钥不落日志
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"***")
            .field("token_ttl_minutes", &self.token_ttl_minutes)
            .field("admin_username", &self.admin_username)
            .field("admin_password", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PricingConfig {
    /// 初始价目表JSON文件；为空时使用内置默认价目
    pub settings_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8000,
            },
            auth: AuthConfig {
                jwt_secret: "change-me-in-production".to_string(),
                token_ttl_minutes: 15,
                admin_username: "admin".to_string(),
                admin_password: "admin123".to_string(),
            },
            pricing: PricingConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// 从配置文件与环境变量加载
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let defaults = Self::default();

        config::Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default("auth.jwt_secret", defaults.auth.jwt_secret)?
            .set_default("auth.token_ttl_minutes", i64::from(defaults.auth.token_ttl_minutes))?
            .set_default("auth.admin_username", defaults.auth.admin_username)?
            .set_default("auth.admin_password", defaults.auth.admin_password)?
            .set_default("logging.level", defaults.logging.level)?
            .add_source(config::File::with_name("quote").required(false))
            .add_source(
                config::Environment::with_prefix("QUOTE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_defaults_without_sources() {
        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.auth.token_ttl_minutes, 15);
        assert!(config.pricing.settings_path.is_none());
    }

    #[test]
    fn debug_hides_secrets() {
        let rendered = format!("{:?}", AppConfig::default());
        assert!(!rendered.contains("admin123"));
        assert!(!rendered.contains("change-me-in-production"));
    }
}
