use serde::{Deserialize, Serialize};

/// 报价明细（计算结果，无标识、不落库）
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub material_cost: f64,
    pub pre_press_setup_cost: f64,
    pub press_cost: f64,
    /// 含包装运输费
    pub finishing_cost: f64,
    /// 包装运输费（已计入 finishing_cost，仅用于展示）
    pub additional_costs: f64,
    pub subtotal: f64,
    pub tax_amount: f64,
    pub discount: f64,
    pub rush_fee: f64,
    pub grand_total: f64,
    pub cost_per_unit: f64,
}
