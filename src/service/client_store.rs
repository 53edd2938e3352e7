use crate::error::AppError;
use crate::models::{Client, ClientCreate, ClientOverview, ClientQuery, ClientStatus, ClientUpdate};
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::io::Write;
use uuid::Uuid;

pub const DEFAULT_PAGE_LIMIT: usize = 100;
pub const MAX_PAGE_LIMIT: usize = 1000;

/// 客户档案管理（进程内存储）
///
/// `emails` 为邮箱唯一索引，通过 entry API 原子占位，避免并发创建重复邮箱。
#[derive(Debug, Default)]
pub struct ClientStore {
    clients: DashMap<Uuid, Client>,
    emails: DashMap<String, Uuid>,
}

fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_email(email: &str) -> Result<(), AppError> {
    let valid = match email.trim().split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(AppError::Validation(format!("invalid email address: {}", email)))
    }
}

fn validate_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        Err(AppError::Validation("name must not be empty".into()))
    } else {
        Ok(())
    }
}

fn validate_credit_limit(limit: f64) -> Result<(), AppError> {
    if limit.is_finite() && limit >= 0.0 {
        Ok(())
    } else {
        Err(AppError::Validation("creditLimit must be a non-negative number".into()))
    }
}

fn matches_search(client: &Client, needle: &str) -> bool {
    [&client.name, &client.email, &client.company, &client.phone]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

impl ClientStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// 新建客户，邮箱重复时报错
    pub fn create(&self, data: ClientCreate, actor: &str) -> Result<Client, AppError> {
        validate_name(&data.name)?;
        validate_email(&data.email)?;
        validate_credit_limit(data.credit_limit)?;

        let id = Uuid::new_v4();
        match self.emails.entry(email_key(&data.email)) {
            Entry::Occupied(_) => return Err(AppError::Validation("Email already exists".into())),
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }

        let now = Utc::now();
        let client = Client {
            id,
            name: data.name.trim().to_string(),
            email: data.email.trim().to_string(),
            phone: data.phone,
            company: data.company,
            address: data.address,
            status: data.status,
            client_type: data.client_type,
            credit_limit: data.credit_limit,
            total_orders: 0,
            total_revenue: 0.0,
            last_order_date: None,
            notes: data.notes,
            tags: data.tags,
            referral_source: data.referral_source,
            created_at: now,
            updated_at: now,
            created_by: Some(actor.to_string()),
            updated_by: Some(actor.to_string()),
        };

        self.clients.insert(id, client.clone());
        tracing::info!("Client {} created by {}", id, actor);
        Ok(client)
    }

    pub fn get(&self, id: Uuid) -> Result<Client, AppError> {
        self.clients
            .get(&id)
            .map(|c| c.value().clone())
            .ok_or_else(|| AppError::NotFound("Client not found".into()))
    }

    /// 按创建时间排序的全部客户
    fn sorted(&self) -> Vec<Client> {
        let mut all: Vec<Client> = self.clients.iter().map(|c| c.value().clone()).collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        all
    }

    /// 条件查询（分页 + 模糊搜索 + 状态/类型过滤）
    pub fn list(&self, query: &ClientQuery) -> Result<Vec<Client>, AppError> {
        let limit = query.limit.unwrap_or(DEFAULT_PAGE_LIMIT);
        if limit == 0 || limit > MAX_PAGE_LIMIT {
            return Err(AppError::Validation(format!(
                "limit must be between 1 and {}",
                MAX_PAGE_LIMIT
            )));
        }

        let needle = query
            .search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        Ok(self
            .sorted()
            .into_iter()
            .filter(|c| query.status.map_or(true, |s| c.status == s))
            .filter(|c| query.client_type.map_or(true, |t| c.client_type == t))
            .filter(|c| needle.as_deref().map_or(true, |n| matches_search(c, n)))
            .skip(query.skip)
            .take(limit)
            .collect())
    }

    /// 部分更新；修改邮箱时检查重复
    pub fn update(&self, id: Uuid, changes: ClientUpdate, actor: &str) -> Result<Client, AppError> {
        let current = self.get(id)?;

        if let Some(name) = &changes.name {
            validate_name(name)?;
        }
        if let Some(limit) = changes.credit_limit {
            validate_credit_limit(limit)?;
        }

        // (新邮箱, 是否占用了新的索引键)；仅大小写变化时沿用原索引
        let new_email = match &changes.email {
            Some(email) => {
                validate_email(email)?;
                let key = email_key(email);
                let reserved = key != email_key(&current.email);
                if reserved {
                    match self.emails.entry(key) {
                        Entry::Occupied(_) => return Err(AppError::Validation("Email already exists".into())),
                        Entry::Vacant(slot) => {
                            slot.insert(id);
                        }
                    }
                }
                Some((email.trim().to_string(), reserved))
            }
            None => None,
        };

        let Some(mut entry) = self.clients.get_mut(&id) else {
            // 期间客户已被删除，释放刚占用的邮箱
            if let Some((email, true)) = &new_email {
                self.emails.remove(&email_key(email));
            }
            return Err(AppError::NotFound("Client not found".into()));
        };
        let client = entry.value_mut();

        if let Some((email, reserved)) = new_email {
            if reserved {
                self.emails.remove(&email_key(&client.email));
            }
            client.email = email;
        }
        if let Some(name) = changes.name {
            client.name = name.trim().to_string();
        }
        if let Some(phone) = changes.phone {
            client.phone = phone;
        }
        if let Some(company) = changes.company {
            client.company = company;
        }
        if let Some(address) = changes.address {
            client.address = address;
        }
        if let Some(status) = changes.status {
            client.status = status;
        }
        if let Some(client_type) = changes.client_type {
            client.client_type = client_type;
        }
        if let Some(limit) = changes.credit_limit {
            client.credit_limit = limit;
        }
        if let Some(notes) = changes.notes {
            client.notes = notes;
        }
        if let Some(tags) = changes.tags {
            client.tags = tags;
        }
        if let Some(source) = changes.referral_source {
            client.referral_source = source;
        }
        client.updated_at = Utc::now();
        client.updated_by = Some(actor.to_string());

        Ok(client.clone())
    }

    /// 记录一笔订单，更新客户统计
    pub fn record_order(&self, id: Uuid, amount: f64, at: DateTime<Utc>) -> Result<Client, AppError> {
        if !(amount.is_finite() && amount >= 0.0) {
            return Err(AppError::Validation("order amount must be a non-negative number".into()));
        }
        let mut entry = self
            .clients
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("Client not found".into()))?;
        let client = entry.value_mut();
        client.total_orders += 1;
        client.total_revenue += amount;
        client.last_order_date = Some(client.last_order_date.map_or(at, |prev| prev.max(at)));
        client.updated_at = Utc::now();
        Ok(client.clone())
    }

    pub fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let (_, client) = self
            .clients
            .remove(&id)
            .ok_or_else(|| AppError::NotFound("Client not found".into()))?;
        self.emails.remove(&email_key(&client.email));
        tracing::info!("Client {} deleted", id);
        Ok(())
    }

    /// 客户统计概览
    pub fn overview(&self) -> ClientOverview {
        let mut overview = ClientOverview {
            total: 0,
            active: 0,
            inactive: 0,
            total_revenue: 0.0,
            total_orders: 0,
            avg_order_value: 0.0,
        };

        for entry in self.clients.iter() {
            let client = entry.value();
            overview.total += 1;
            if client.status == ClientStatus::Active {
                overview.active += 1;
            }
            overview.total_revenue += client.total_revenue;
            overview.total_orders += u64::from(client.total_orders);
        }

        overview.inactive = overview.total - overview.active;
        if overview.total_orders > 0 {
            overview.avg_order_value = overview.total_revenue / overview.total_orders as f64;
        }
        overview
    }

    /// 导出全部客户为CSV
    pub fn export_csv<W: Write>(&self, writer: W) -> Result<usize, csv::Error> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record([
            "id",
            "name",
            "email",
            "phone",
            "company",
            "status",
            "client_type",
            "credit_limit",
            "total_orders",
            "total_revenue",
            "city",
            "country",
            "tags",
            "created_at",
        ])?;

        let clients = self.sorted();
        for c in &clients {
            wtr.write_record(&[
                c.id.to_string(),
                c.name.clone(),
                c.email.clone(),
                c.phone.clone(),
                c.company.clone(),
                c.status.as_str().to_string(),
                c.client_type.as_str().to_string(),
                c.credit_limit.to_string(),
                c.total_orders.to_string(),
                c.total_revenue.to_string(),
                c.address.city.clone(),
                c.address.country.clone(),
                c.tags.join(";"),
                c.created_at.to_rfc3339(),
            ])?;
        }

        wtr.flush()?;
        Ok(clients.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClientType;

    fn new_client(name: &str, email: &str) -> ClientCreate {
        ClientCreate {
            name: name.into(),
            email: email.into(),
            ..Default::default()
        }
    }

    #[test]
    fn create_rejects_duplicate_email_case_insensitively() {
        let store = ClientStore::new();
        store.create(new_client("Asha", "asha@example.com"), "admin").unwrap();
        let err = store
            .create(new_client("Other", "ASHA@example.com"), "admin")
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg == "Email already exists"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn create_validates_input() {
        let store = ClientStore::new();
        assert!(store.create(new_client("", "a@b.com"), "admin").is_err());
        assert!(store.create(new_client("Ravi", "not-an-email"), "admin").is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn list_filters_and_pages() {
        let store = ClientStore::new();
        store.create(new_client("Kiran Prints", "kiran@prints.in"), "admin").unwrap();
        store
            .create(
                ClientCreate {
                    client_type: ClientType::Business,
                    company: "Lotus Media".into(),
                    ..new_client("Meera", "meera@lotus.in")
                },
                "admin",
            )
            .unwrap();
        store
            .create(
                ClientCreate {
                    status: ClientStatus::Inactive,
                    ..new_client("Dev", "dev@example.com")
                },
                "admin",
            )
            .unwrap();

        let by_company = store
            .list(&ClientQuery {
                search: Some("lotus".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(by_company.len(), 1);
        assert_eq!(by_company[0].name, "Meera");

        let inactive = store
            .list(&ClientQuery {
                status: Some(ClientStatus::Inactive),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(inactive.len(), 1);

        let page = store
            .list(&ClientQuery {
                skip: 1,
                limit: Some(1),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(page.len(), 1);

        assert!(store
            .list(&ClientQuery {
                limit: Some(0),
                ..Default::default()
            })
            .is_err());
    }

    #[test]
    fn update_changes_email_and_frees_old_one() {
        let store = ClientStore::new();
        let c = store.create(new_client("Asha", "asha@example.com"), "admin").unwrap();
        let updated = store
            .update(
                c.id,
                ClientUpdate {
                    email: Some("asha@newmail.com".into()),
                    notes: Some("prefers matt finish".into()),
                    ..Default::default()
                },
                "user1",
            )
            .unwrap();
        assert_eq!(updated.email, "asha@newmail.com");
        assert_eq!(updated.updated_by.as_deref(), Some("user1"));

        store.create(new_client("Reuse", "asha@example.com"), "admin").unwrap();
        assert!(store.create(new_client("Dup", "asha@newmail.com"), "admin").is_err());
    }

    #[test]
    fn update_keeps_case_only_email_change() {
        let store = ClientStore::new();
        let c = store.create(new_client("Asha", "asha@example.com"), "admin").unwrap();
        let updated = store
            .update(
                c.id,
                ClientUpdate {
                    email: Some(" Asha@Example.com ".into()),
                    ..Default::default()
                },
                "admin",
            )
            .unwrap();
        assert_eq!(updated.email, "Asha@Example.com");
        assert_eq!(store.get(c.id).unwrap().email, "Asha@Example.com");

        // 索引仍指向该客户
        assert!(store.create(new_client("Dup", "asha@example.com"), "admin").is_err());
        store.delete(c.id).unwrap();
        store.create(new_client("Reuse", "asha@example.com"), "admin").unwrap();
    }

    #[test]
    fn update_of_missing_client_leaves_email_free() {
        let store = ClientStore::new();
        let err = store
            .update(
                Uuid::new_v4(),
                ClientUpdate {
                    email: Some("ghost@example.com".into()),
                    ..Default::default()
                },
                "admin",
            )
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        store.create(new_client("Ghost", "ghost@example.com"), "admin").unwrap();
    }

    #[test]
    fn update_to_taken_email_fails() {
        let store = ClientStore::new();
        store.create(new_client("A", "a@example.com"), "admin").unwrap();
        let b = store.create(new_client("B", "b@example.com"), "admin").unwrap();
        let err = store
            .update(
                b.id,
                ClientUpdate {
                    email: Some("a@example.com".into()),
                    ..Default::default()
                },
                "admin",
            )
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(store.get(b.id).unwrap().email, "b@example.com");
    }

    #[test]
    fn delete_then_get_is_not_found() {
        let store = ClientStore::new();
        let c = store.create(new_client("Asha", "asha@example.com"), "admin").unwrap();
        store.delete(c.id).unwrap();
        assert!(matches!(store.get(c.id), Err(AppError::NotFound(_))));
        assert!(store.delete(c.id).is_err());
    }

    #[test]
    fn overview_averages_orders() {
        let store = ClientStore::new();
        assert_eq!(store.overview().avg_order_value, 0.0);

        let a = store.create(new_client("A", "a@example.com"), "admin").unwrap();
        store
            .create(
                ClientCreate {
                    status: ClientStatus::Pending,
                    ..new_client("B", "b@example.com")
                },
                "admin",
            )
            .unwrap();
        store.record_order(a.id, 1200.0, Utc::now()).unwrap();
        store.record_order(a.id, 800.0, Utc::now()).unwrap();

        let overview = store.overview();
        assert_eq!(overview.total, 2);
        assert_eq!(overview.active, 1);
        assert_eq!(overview.inactive, 1);
        assert_eq!(overview.total_orders, 2);
        assert_eq!(overview.avg_order_value, 1000.0);
    }

    #[test]
    fn export_writes_header_and_rows() {
        let store = ClientStore::new();
        store
            .create(
                ClientCreate {
                    tags: vec!["vip".into(), "books".into()],
                    ..new_client("Asha", "asha@example.com")
                },
                "admin",
            )
            .unwrap();
        let mut buf = Vec::new();
        assert_eq!(store.export_csv(&mut buf).unwrap(), 1);
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("id,name,email"));
        assert!(lines.next().unwrap().contains("asha@example.com"));
        assert!(text.contains("vip;books"));
    }
}
