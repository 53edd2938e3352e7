use crate::error::AppError;
use dashmap::DashMap;
use serde::Serialize;

/// 对外展示的用户信息
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub username: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub disabled: bool,
}

#[derive(Debug, Clone)]
struct UserRecord {
    user: User,
    password_hash: String,
}

/// 用户目录（进程内），密码以 bcrypt 哈希保存
#[derive(Debug)]
pub struct UserDirectory {
    users: DashMap<String, UserRecord>,
    cost: u32,
}

impl Default for UserDirectory {
    fn default() -> Self {
        Self::with_cost(bcrypt::DEFAULT_COST)
    }
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定 bcrypt 计算成本（4..=31）
    pub fn with_cost(cost: u32) -> Self {
        Self {
            users: DashMap::new(),
            cost,
        }
    }

    /// 新增或覆盖用户
    pub fn add_user(&self, user: User, password: &str) -> Result<(), AppError> {
        let password_hash = bcrypt::hash(password, self.cost)?;
        tracing::info!("Registered user {}", user.username);
        self.users.insert(user.username.clone(), UserRecord { user, password_hash });
        Ok(())
    }

    pub fn get(&self, username: &str) -> Option<User> {
        self.users.get(username).map(|r| r.user.clone())
    }

    /// 校验用户名密码，成功返回用户（停用状态由调用方判断）
    pub fn authenticate(&self, username: &str, password: &str) -> Option<User> {
        let (user, password_hash) = self
            .users
            .get(username)
            .map(|r| (r.user.clone(), r.password_hash.clone()))?;
        match bcrypt::verify(password, &password_hash) {
            Ok(true) => Some(user),
            Ok(false) => None,
            Err(e) => {
                tracing::warn!("Stored hash for {} is unreadable: {}", username, e);
                None
            }
        }
    }

    pub fn set_disabled(&self, username: &str, disabled: bool) -> bool {
        match self.users.get_mut(username) {
            Some(mut record) => {
                record.user.disabled = disabled;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str) -> User {
        User {
            username: name.into(),
            email: Some(format!("{}@example.com", name)),
            full_name: None,
            disabled: false,
        }
    }

    fn directory() -> UserDirectory {
        UserDirectory::with_cost(4)
    }

    #[test]
    fn authenticates_with_correct_password_only() {
        let dir = directory();
        dir.add_user(user("admin"), "admin123").unwrap();
        assert_eq!(dir.authenticate("admin", "admin123").unwrap().username, "admin");
        assert!(dir.authenticate("admin", "admin124").is_none());
        assert!(dir.authenticate("ghost", "admin123").is_none());
    }

    #[test]
    fn stores_bcrypt_hash_not_password() {
        let dir = directory();
        dir.add_user(user("admin"), "admin123").unwrap();
        dir.add_user(user("other"), "admin123").unwrap();
        let a = dir.users.get("admin").unwrap().password_hash.clone();
        let b = dir.users.get("other").unwrap().password_hash.clone();
        assert!(a.starts_with("$2"));
        assert!(!a.contains("admin123"));
        assert_ne!(a, b);
    }

    #[test]
    fn invalid_cost_is_an_error() {
        let dir = UserDirectory::with_cost(2);
        assert!(dir.add_user(user("admin"), "admin123").is_err());
        assert!(dir.get("admin").is_none());
    }

    #[test]
    fn disabling_is_reflected() {
        let dir = directory();
        dir.add_user(user("user1"), "user123").unwrap();
        assert!(dir.set_disabled("user1", true));
        assert!(dir.get("user1").unwrap().disabled);
        assert!(!dir.set_disabled("nobody", true));
    }
}
