use crate::models::LaminationType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 旧版纸张类型（按张定价，矩阵计算缺参时的兜底）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperType {
    pub id: String,
    pub name: String,
    pub cost_per_sheet: f64,
}

/// 装订方式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingOption {
    pub id: String,
    pub name: String,
    pub base_cost: f64,
    pub per_unit_cost: f64,
}

/// 价目表：由设置存储持有，计算时以快照形式传入
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PriceListSettings {
    pub paper_types: Vec<PaperType>,
    pub binding_options: Vec<BindingOption>,
    /// 覆膜类型 -> 每100平方英寸单价
    pub lamination_costs: BTreeMap<LaminationType, f64>,
}

impl Default for PriceListSettings {
    fn default() -> Self {
        let paper = |id: &str, name: &str, cost_per_sheet: f64| PaperType {
            id: id.to_string(),
            name: name.to_string(),
            cost_per_sheet,
        };
        let binding = |id: &str, name: &str, base_cost: f64, per_unit_cost: f64| BindingOption {
            id: id.to_string(),
            name: name.to_string(),
            base_cost,
            per_unit_cost,
        };

        Self {
            paper_types: vec![
                paper("offset-80", "Offset 80 GSM", 0.5),
                paper("art-100", "Art Paper 100 GSM", 0.75),
                paper("art-130", "Art Paper 130 GSM", 1.0),
                paper("art-170", "Art Paper 170 GSM", 1.25),
            ],
            binding_options: vec![
                binding("saddle-stitch", "Saddle Stitch", 100.0, 1.0),
                binding("perfect", "Perfect Binding", 250.0, 2.0),
                binding("spiral", "Spiral Binding", 150.0, 1.5),
            ],
            lamination_costs: LaminationType::ALL
                .iter()
                .map(|kind| (*kind, fallback_lamination_rate(*kind)))
                .collect(),
        }
    }
}

/// 价目表缺少某覆膜单价时使用的内置费率
pub fn fallback_lamination_rate(kind: LaminationType) -> f64 {
    match kind {
        LaminationType::None => 0.0,
        LaminationType::Matt => 0.25,
        LaminationType::Gloss => 0.35,
        LaminationType::ThermalMatt | LaminationType::ThermalGloss => 0.65,
    }
}

impl PriceListSettings {
    pub fn find_paper_type(&self, id: &str) -> Option<&PaperType> {
        self.paper_types.iter().find(|p| p.id == id)
    }

    pub fn find_binding_option(&self, id: &str) -> Option<&BindingOption> {
        self.binding_options.iter().find(|b| b.id == id)
    }

    /// 覆膜单价：价目表中缺失或为0时回退到内置费率
    pub fn lamination_rate(&self, kind: LaminationType) -> f64 {
        match self.lamination_costs.get(&kind) {
            Some(rate) if *rate > 0.0 => *rate,
            _ => fallback_lamination_rate(kind),
        }
    }
}
