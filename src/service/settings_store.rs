use crate::error::AppError;
use crate::models::{BindingOption, LaminationType, PaperType, PriceListSettings};
use std::path::Path;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// 价目表存储
///
/// 写操作整体替换内部的 `Arc`，计算方持有的快照不受后续修改影响。
#[derive(Debug, Default)]
pub struct SettingsStore {
    current: RwLock<Arc<PriceListSettings>>,
}

impl SettingsStore {
    pub fn new(settings: PriceListSettings) -> Self {
        Self {
            current: RwLock::new(Arc::new(settings)),
        }
    }

    /// 从JSON文件加载初始价目表
    pub fn from_json_file(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| AppError::Internal(format!("read {}: {}", path.display(), e)))?;
        let settings: PriceListSettings = serde_json::from_str(&raw)
            .map_err(|e| AppError::Validation(format!("invalid price list {}: {}", path.display(), e)))?;
        validate(&settings)?;
        tracing::info!(
            "Loaded price list from {}: {} paper types, {} binding options",
            path.display(),
            settings.paper_types.len(),
            settings.binding_options.len()
        );
        Ok(Self::new(settings))
    }

    fn read(&self) -> RwLockReadGuard<'_, Arc<PriceListSettings>> {
        self.current.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Arc<PriceListSettings>> {
        self.current.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// 当前价目表快照
    pub fn snapshot(&self) -> Arc<PriceListSettings> {
        Arc::clone(&self.read())
    }

    /// 整体替换
    pub fn replace(&self, settings: PriceListSettings) -> Result<Arc<PriceListSettings>, AppError> {
        validate(&settings)?;
        let next = Arc::new(settings);
        *self.write() = Arc::clone(&next);
        tracing::info!("Price list replaced");
        Ok(next)
    }

    /// 在当前价目表副本上修改后换入
    fn update<F>(&self, f: F) -> Arc<PriceListSettings>
    where
        F: FnOnce(&mut PriceListSettings),
    {
        let mut guard = self.write();
        let mut next = PriceListSettings::clone(&guard);
        f(&mut next);
        *guard = Arc::new(next);
        Arc::clone(&guard)
    }

    pub fn upsert_binding_option(&self, option: BindingOption) -> Result<Arc<PriceListSettings>, AppError> {
        validate_binding(&option)?;
        Ok(self.update(|s| {
            match s.binding_options.iter().position(|b| b.id == option.id) {
                Some(idx) => s.binding_options[idx] = option,
                None => s.binding_options.push(option),
            }
        }))
    }

    pub fn remove_binding_option(&self, id: &str) -> Result<Arc<PriceListSettings>, AppError> {
        if self.read().find_binding_option(id).is_none() {
            return Err(AppError::NotFound(format!("binding option {}", id)));
        }
        Ok(self.update(|s| s.binding_options.retain(|b| b.id != id)))
    }

    pub fn upsert_paper_type(&self, paper: PaperType) -> Result<Arc<PriceListSettings>, AppError> {
        validate_paper(&paper)?;
        Ok(self.update(|s| {
            match s.paper_types.iter().position(|p| p.id == paper.id) {
                Some(idx) => s.paper_types[idx] = paper,
                None => s.paper_types.push(paper),
            }
        }))
    }

    pub fn set_lamination_rate(
        &self,
        kind: LaminationType,
        rate: f64,
    ) -> Result<Arc<PriceListSettings>, AppError> {
        if kind == LaminationType::None {
            return Err(AppError::Validation("lamination type 'none' has no rate".into()));
        }
        non_negative("lamination rate", rate)?;
        Ok(self.update(|s| {
            s.lamination_costs.insert(kind, rate);
        }))
    }
}

fn non_negative(field: &str, value: f64) -> Result<(), AppError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(AppError::Validation(format!("{} must be a non-negative number", field)))
    }
}

fn non_empty_id(kind: &str, id: &str) -> Result<(), AppError> {
    if id.trim().is_empty() {
        Err(AppError::Validation(format!("{} id must not be empty", kind)))
    } else {
        Ok(())
    }
}

fn validate_binding(option: &BindingOption) -> Result<(), AppError> {
    non_empty_id("binding option", &option.id)?;
    non_negative("baseCost", option.base_cost)?;
    non_negative("perUnitCost", option.per_unit_cost)
}

fn validate_paper(paper: &PaperType) -> Result<(), AppError> {
    non_empty_id("paper type", &paper.id)?;
    non_negative("costPerSheet", paper.cost_per_sheet)
}

fn validate(settings: &PriceListSettings) -> Result<(), AppError> {
    for option in &settings.binding_options {
        validate_binding(option)?;
    }
    for paper in &settings.paper_types {
        validate_paper(paper)?;
    }
    for (kind, rate) in &settings.lamination_costs {
        non_negative(kind.as_str(), *rate)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binding(id: &str, base: f64) -> BindingOption {
        BindingOption {
            id: id.into(),
            name: id.to_uppercase(),
            base_cost: base,
            per_unit_cost: 1.0,
        }
    }

    #[test]
    fn snapshots_are_isolated_from_later_writes() {
        let store = SettingsStore::default();
        let before = store.snapshot();
        store.upsert_binding_option(binding("perfect", 999.0)).unwrap();

        assert_eq!(before.find_binding_option("perfect").unwrap().base_cost, 250.0);
        assert_eq!(store.snapshot().find_binding_option("perfect").unwrap().base_cost, 999.0);
    }

    #[test]
    fn upsert_appends_new_options() {
        let store = SettingsStore::default();
        let count = store.snapshot().binding_options.len();
        store.upsert_binding_option(binding("wire-o", 120.0)).unwrap();
        assert_eq!(store.snapshot().binding_options.len(), count + 1);
    }

    #[test]
    fn remove_unknown_option_is_not_found() {
        let store = SettingsStore::default();
        assert!(matches!(store.remove_binding_option("nope"), Err(AppError::NotFound(_))));
        store.remove_binding_option("spiral").unwrap();
        assert!(store.snapshot().find_binding_option("spiral").is_none());
    }

    #[test]
    fn rejects_negative_costs() {
        let store = SettingsStore::default();
        assert!(matches!(
            store.upsert_binding_option(binding("bad", -1.0)),
            Err(AppError::Validation(_))
        ));
        assert!(store.set_lamination_rate(LaminationType::Matt, f64::NAN).is_err());
        assert!(store.set_lamination_rate(LaminationType::None, 1.0).is_err());
    }

    #[test]
    fn lamination_rate_update_is_visible() {
        let store = SettingsStore::default();
        store.set_lamination_rate(LaminationType::Gloss, 0.45).unwrap();
        assert_eq!(store.snapshot().lamination_rate(LaminationType::Gloss), 0.45);
    }

    #[test]
    fn loads_from_json_file() {
        let path = std::env::temp_dir().join(format!("price-list-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            r#"{"bindingOptions": [{"id": "case", "name": "Case", "baseCost": 3000, "perUnitCost": 10}]}"#,
        )
        .unwrap();
        let store = SettingsStore::from_json_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let snapshot = store.snapshot();
        assert_eq!(snapshot.binding_options.len(), 1);
        assert_eq!(snapshot.find_binding_option("case").unwrap().per_unit_cost, 10.0);
        assert!(!snapshot.paper_types.is_empty());
    }
}
