use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientStatus {
    #[default]
    Active,
    Inactive,
    Pending,
}

impl ClientStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientStatus::Active => "active",
            ClientStatus::Inactive => "inactive",
            ClientStatus::Pending => "pending",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientType {
    #[default]
    Individual,
    Business,
    Enterprise,
}

impl ClientType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientType::Individual => "individual",
            ClientType::Business => "business",
            ClientType::Enterprise => "enterprise",
        }
    }
}

/// 地址
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

impl Default for Address {
    fn default() -> Self {
        Self {
            street: String::new(),
            city: String::new(),
            state: String::new(),
            zip_code: String::new(),
            country: "USA".to_string(),
        }
    }
}

/// 客户档案
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub address: Address,
    pub status: ClientStatus,
    pub client_type: ClientType,
    pub credit_limit: f64,
    pub total_orders: u32,
    pub total_revenue: f64,
    pub last_order_date: Option<DateTime<Utc>>,
    pub notes: String,
    pub tags: Vec<String>,
    pub referral_source: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
}

/// 新建客户请求体
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientCreate {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub address: Address,
    pub status: ClientStatus,
    pub client_type: ClientType,
    pub credit_limit: f64,
    pub notes: String,
    pub tags: Vec<String>,
    pub referral_source: String,
}

/// 更新客户请求体（仅覆盖提供的字段）
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub address: Option<Address>,
    pub status: Option<ClientStatus>,
    pub client_type: Option<ClientType>,
    pub credit_limit: Option<f64>,
    pub notes: Option<String>,
    pub tags: Option<Vec<String>>,
    pub referral_source: Option<String>,
}

/// 客户列表查询条件
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientQuery {
    pub skip: usize,
    pub limit: Option<usize>,
    pub search: Option<String>,
    pub status: Option<ClientStatus>,
    #[serde(alias = "client_type")]
    pub client_type: Option<ClientType>,
}

/// 客户统计概览
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientOverview {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub total_revenue: f64,
    pub total_orders: u64,
    pub avg_order_value: f64,
}
