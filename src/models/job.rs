use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 纸张定价模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GsmPriceMode {
    /// 每公斤单价固定
    #[default]
    Flat,
    /// 超过基准克重后每克线性加价
    Slope,
    /// 按克重查表
    Custom,
}

/// 覆膜类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LaminationType {
    #[default]
    None,
    Matt,
    Gloss,
    ThermalMatt,
    ThermalGloss,
}

impl LaminationType {
    pub const ALL: [LaminationType; 4] = [
        LaminationType::Matt,
        LaminationType::Gloss,
        LaminationType::ThermalMatt,
        LaminationType::ThermalGloss,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LaminationType::None => "none",
            LaminationType::Matt => "matt",
            LaminationType::Gloss => "gloss",
            LaminationType::ThermalMatt => "thermal-matt",
            LaminationType::ThermalGloss => "thermal-gloss",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "none" => Some(LaminationType::None),
            "matt" => Some(LaminationType::Matt),
            "gloss" => Some(LaminationType::Gloss),
            "thermal-matt" => Some(LaminationType::ThermalMatt),
            "thermal-gloss" => Some(LaminationType::ThermalGloss),
            _ => None,
        }
    }
}

/// 印刷机费用来源：按工时计价或直接填写整单印刷费，二选一
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "lowercase")]
pub enum PressCostModel {
    #[serde(rename_all = "camelCase")]
    Hourly {
        make_ready_time: f64,
        estimated_print_run_time: f64,
        press_hourly_rate: f64,
    },
    #[serde(rename_all = "camelCase")]
    Flat { full_printing_cost: f64 },
}

impl Default for PressCostModel {
    fn default() -> Self {
        PressCostModel::Flat { full_printing_cost: 0.0 }
    }
}

/// 印刷作业规格（每次计算的不可变快照）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobSpecification {
    // 基本信息
    pub quantity: u32,
    pub number_of_colors: u32,
    pub is_double_sided: bool,
    pub sheet_size_id: String,
    pub custom_sheet_width: Option<f64>,
    pub custom_sheet_height: Option<f64>,
    pub paper_type_id: Option<String>,

    // 纸张定价
    pub paper_gsm: Option<u32>,
    pub gsm_price_mode: GsmPriceMode,
    pub paper_cost_per_kg: Option<f64>,
    pub paper_cost_increase_per_gsm: Option<f64>,
    pub custom_cost_matrix: Option<BTreeMap<u32, f64>>,
    pub wastage_percentage: f64,

    // 印前
    pub design_setup_fee: f64,
    pub plate_cost: f64,
    pub proofing_charges: f64,

    // 印刷
    pub press: PressCostModel,

    // 后道工序
    pub folding_required: bool,
    pub number_of_folds: u32,
    pub cutting_required: bool,
    pub number_of_cuts: u32,
    pub binding_option_id: Option<String>,
    pub lamination_type: LaminationType,
    pub is_double_sided_lamination: bool,
    pub embossing_required: bool,
    pub foiling_required: bool,
    pub packaging_delivery_cost: f64,

    // 税费/折扣/加急
    pub tax_percentage: f64,
    pub discount_percentage: f64,
    pub rush_fee_percentage: f64,
}

impl Default for JobSpecification {
    fn default() -> Self {
        Self {
            quantity: 0,
            number_of_colors: 1,
            is_double_sided: false,
            sheet_size_id: "a4".to_string(),
            custom_sheet_width: None,
            custom_sheet_height: None,
            paper_type_id: None,
            paper_gsm: None,
            gsm_price_mode: GsmPriceMode::Flat,
            paper_cost_per_kg: None,
            paper_cost_increase_per_gsm: None,
            custom_cost_matrix: None,
            wastage_percentage: 5.0,
            design_setup_fee: 0.0,
            plate_cost: 0.0,
            proofing_charges: 0.0,
            press: PressCostModel::default(),
            folding_required: false,
            number_of_folds: 0,
            cutting_required: false,
            number_of_cuts: 0,
            binding_option_id: None,
            lamination_type: LaminationType::None,
            is_double_sided_lamination: false,
            embossing_required: false,
            foiling_required: false,
            packaging_delivery_cost: 0.0,
            tax_percentage: 18.0,
            discount_percentage: 0.0,
            rush_fee_percentage: 0.0,
        }
    }
}

/// 表单字段更新操作（替代按字段名动态赋值）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum JobUpdate {
    Quantity(u32),
    NumberOfColors(u32),
    DoubleSided(bool),
    SheetSize(String),
    CustomDimensions { width: Option<f64>, height: Option<f64> },
    PaperType(Option<String>),
    PaperGsm(Option<u32>),
    PriceMode(GsmPriceMode),
    PaperCostPerKg(Option<f64>),
    PaperCostIncreasePerGsm(Option<f64>),
    #[serde(rename_all = "camelCase")]
    CustomCostEntry { gsm: u32, cost_per_kg: Option<f64> },
    WastagePercentage(f64),
    DesignSetupFee(f64),
    PlateCost(f64),
    ProofingCharges(f64),
    Press(PressCostModel),
    Folding { required: bool, folds: u32 },
    Cutting { required: bool, cuts: u32 },
    BindingOption(Option<String>),
    #[serde(rename_all = "camelCase")]
    Lamination { kind: LaminationType, double_sided: bool },
    Embossing(bool),
    Foiling(bool),
    PackagingDeliveryCost(f64),
    TaxPercentage(f64),
    DiscountPercentage(f64),
    RushFeePercentage(f64),
}

impl JobSpecification {
    /// 应用单个字段更新
    pub fn apply(&mut self, update: JobUpdate) {
        match update {
            JobUpdate::Quantity(v) => self.quantity = v,
            JobUpdate::NumberOfColors(v) => self.number_of_colors = v,
            JobUpdate::DoubleSided(v) => self.is_double_sided = v,
            JobUpdate::SheetSize(id) => self.sheet_size_id = id,
            JobUpdate::CustomDimensions { width, height } => {
                self.custom_sheet_width = width;
                self.custom_sheet_height = height;
            }
            JobUpdate::PaperType(id) => self.paper_type_id = id,
            JobUpdate::PaperGsm(v) => self.paper_gsm = v,
            JobUpdate::PriceMode(mode) => self.gsm_price_mode = mode,
            JobUpdate::PaperCostPerKg(v) => self.paper_cost_per_kg = v,
            JobUpdate::PaperCostIncreasePerGsm(v) => self.paper_cost_increase_per_gsm = v,
            JobUpdate::CustomCostEntry { gsm, cost_per_kg } => {
                let matrix = self.custom_cost_matrix.get_or_insert_with(BTreeMap::new);
                match cost_per_kg {
                    Some(cost) => {
                        matrix.insert(gsm, cost);
                    }
                    None => {
                        matrix.remove(&gsm);
                    }
                }
            }
            JobUpdate::WastagePercentage(v) => self.wastage_percentage = v,
            JobUpdate::DesignSetupFee(v) => self.design_setup_fee = v,
            JobUpdate::PlateCost(v) => self.plate_cost = v,
            JobUpdate::ProofingCharges(v) => self.proofing_charges = v,
            JobUpdate::Press(model) => self.press = model,
            JobUpdate::Folding { required, folds } => {
                self.folding_required = required;
                self.number_of_folds = folds;
            }
            JobUpdate::Cutting { required, cuts } => {
                self.cutting_required = required;
                self.number_of_cuts = cuts;
            }
            JobUpdate::BindingOption(id) => self.binding_option_id = id,
            JobUpdate::Lamination { kind, double_sided } => {
                self.lamination_type = kind;
                self.is_double_sided_lamination = double_sided;
            }
            JobUpdate::Embossing(v) => self.embossing_required = v,
            JobUpdate::Foiling(v) => self.foiling_required = v,
            JobUpdate::PackagingDeliveryCost(v) => self.packaging_delivery_cost = v,
            JobUpdate::TaxPercentage(v) => self.tax_percentage = v,
            JobUpdate::DiscountPercentage(v) => self.discount_percentage = v,
            JobUpdate::RushFeePercentage(v) => self.rush_fee_percentage = v,
        }
    }

    /// 依次应用一组更新，返回新的规格
    pub fn with_updates<I>(mut self, updates: I) -> Self
    where
        I: IntoIterator<Item = JobUpdate>,
    {
        for update in updates {
            self.apply(update);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_form_defaults() {
        let job: JobSpecification = serde_json::from_str(r#"{"quantity": 250}"#).unwrap();
        assert_eq!(job.quantity, 250);
        assert_eq!(job.sheet_size_id, "a4");
        assert_eq!(job.wastage_percentage, 5.0);
        assert_eq!(job.tax_percentage, 18.0);
        assert_eq!(job.press, PressCostModel::Flat { full_printing_cost: 0.0 });
    }

    #[test]
    fn press_model_is_tagged() {
        let json = r#"{"quantity": 1, "press": {"model": "hourly", "makeReadyTime": 1.5, "estimatedPrintRunTime": 2, "pressHourlyRate": 800}}"#;
        let job: JobSpecification = serde_json::from_str(json).unwrap();
        assert_eq!(
            job.press,
            PressCostModel::Hourly {
                make_ready_time: 1.5,
                estimated_print_run_time: 2.0,
                press_hourly_rate: 800.0,
            }
        );
    }

    #[test]
    fn custom_matrix_keys_parse_from_strings() {
        let json = r#"{"gsmPriceMode": "custom", "customCostMatrix": {"130": 140.0, "300": 175.5}}"#;
        let job: JobSpecification = serde_json::from_str(json).unwrap();
        let matrix = job.custom_cost_matrix.unwrap();
        assert_eq!(matrix.get(&300), Some(&175.5));
        assert_eq!(job.gsm_price_mode, GsmPriceMode::Custom);
    }

    #[test]
    fn lamination_type_wire_names() {
        let kind: LaminationType = serde_json::from_str(r#""thermal-gloss""#).unwrap();
        assert_eq!(kind, LaminationType::ThermalGloss);
        assert_eq!(LaminationType::parse(kind.as_str()), Some(kind));
    }

    #[test]
    fn updates_apply_in_order() {
        let job = JobSpecification::default().with_updates([
            JobUpdate::Quantity(500),
            JobUpdate::SheetSize("custom".into()),
            JobUpdate::CustomDimensions { width: Some(200.0), height: Some(300.0) },
            JobUpdate::CustomCostEntry { gsm: 150, cost_per_kg: Some(160.0) },
            JobUpdate::CustomCostEntry { gsm: 200, cost_per_kg: Some(170.0) },
            JobUpdate::CustomCostEntry { gsm: 150, cost_per_kg: None },
            JobUpdate::Quantity(750),
        ]);
        assert_eq!(job.quantity, 750);
        assert_eq!(job.sheet_size_id, "custom");
        assert_eq!(job.custom_sheet_width, Some(200.0));
        let matrix = job.custom_cost_matrix.unwrap();
        assert_eq!(matrix.len(), 1);
        assert_eq!(matrix.get(&200), Some(&170.0));
    }

    #[test]
    fn update_deserializes_from_form_payload() {
        let update: JobUpdate =
            serde_json::from_str(r#"{"field": "lamination", "value": {"kind": "gloss", "doubleSided": true}}"#)
                .unwrap();
        let mut job = JobSpecification::default();
        job.apply(update);
        assert_eq!(job.lamination_type, LaminationType::Gloss);
        assert!(job.is_double_sided_lamination);
    }
}
