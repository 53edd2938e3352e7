use crate::models::sheet::find_sheet_size;
use crate::models::{
    CostBreakdown, GsmPriceMode, JobSpecification, LaminationType, PressCostModel,
    PriceListSettings, CUSTOM_SHEET_ID,
};
use crate::service::paper_matrix::{cost_per_sheet, PaperPricing};

/// 折页单价（每折每份）
pub const FOLD_UNIT_RATE: f64 = 1.0;
/// 裁切单价（每刀，与数量无关）
pub const CUT_FLAT_RATE: f64 = 500.0;
pub const EMBOSSING_BASE: f64 = 100.0;
pub const EMBOSSING_PER_UNIT: f64 = 0.2;
pub const FOILING_BASE: f64 = 150.0;
pub const FOILING_PER_UNIT: f64 = 0.3;
/// 自定义克重表模式下未填每公斤单价时的默认值
pub const DEFAULT_COST_PER_KG: f64 = 150.0;

const MM_PER_INCH: f64 = 25.4;
/// 覆膜费率按每100平方英寸计
const LAMINATION_AREA_UNIT_SQ_IN: f64 = 100.0;

/// 非法或负数输入按0处理
fn amount(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

fn percent_of(base: f64, percentage: f64) -> f64 {
    base * amount(percentage) / 100.0
}

/// 计算报价明细
///
/// 纯函数：不读全局状态、不修改入参，相同输入得到相同输出。
/// 缺失或不一致的定价参数退化为更粗粒度的成本来源，不会报错。
pub fn compute_breakdown(job: &JobSpecification, settings: &PriceListSettings) -> CostBreakdown {
    let quantity = f64::from(job.quantity);
    let dimensions = resolve_dimensions(job);

    // 1-3. 材料费
    let sheets_needed = quantity * (1.0 + amount(job.wastage_percentage) / 100.0);
    let unit_sheet_cost = resolve_cost_per_sheet(job, settings, dimensions);
    let material_cost = sheets_needed * unit_sheet_cost;

    // 4. 印前：双面印刷每色需要两块版
    let sides = if job.is_double_sided { 2.0 } else { 1.0 };
    let pre_press_setup_cost = amount(job.design_setup_fee)
        + amount(job.plate_cost) * f64::from(job.number_of_colors) * sides
        + amount(job.proofing_charges);

    // 5. 印刷
    let press_cost = press_cost(&job.press);

    // 6. 后道
    let finishing_cost = finishing_cost(job, settings, dimensions);

    // 7-10. 汇总
    let subtotal = material_cost + pre_press_setup_cost + press_cost + finishing_cost;
    let tax_amount = percent_of(subtotal, job.tax_percentage);
    let discount = percent_of(subtotal, job.discount_percentage);
    let rush_fee = percent_of(subtotal, job.rush_fee_percentage);
    let grand_total = subtotal + tax_amount - discount + rush_fee;
    let cost_per_unit = if job.quantity > 0 {
        grand_total / quantity
    } else {
        0.0
    };

    tracing::debug!(
        quantity = job.quantity,
        sheets_needed,
        unit_sheet_cost,
        subtotal,
        grand_total,
        "breakdown computed"
    );

    CostBreakdown {
        material_cost,
        pre_press_setup_cost,
        press_cost,
        finishing_cost,
        additional_costs: amount(job.packaging_delivery_cost),
        subtotal,
        tax_amount,
        discount,
        rush_fee,
        grand_total,
        cost_per_unit,
    }
}

/// 实际纸张尺寸（毫米）：优先自定义宽高，否则取标准尺寸
pub fn resolve_dimensions(job: &JobSpecification) -> Option<(f64, f64)> {
    if job.sheet_size_id == CUSTOM_SHEET_ID {
        if let (Some(w), Some(h)) = (job.custom_sheet_width, job.custom_sheet_height) {
            if amount(w) > 0.0 && amount(h) > 0.0 {
                return Some((w, h));
            }
        }
    }

    find_sheet_size(&job.sheet_size_id)
        .filter(|size| size.width_mm > 0.0 && size.height_mm > 0.0)
        .map(|size| (size.width_mm, size.height_mm))
}

/// 单张纸成本：参数齐全时走矩阵计算，否则回退到旧版纸张类型单价
fn resolve_cost_per_sheet(
    job: &JobSpecification,
    settings: &PriceListSettings,
    dimensions: Option<(f64, f64)>,
) -> f64 {
    if let (Some(gsm), Some((width, height))) = (job.paper_gsm, dimensions) {
        if gsm > 0 {
            let cost_per_kg = job.paper_cost_per_kg.map(amount).filter(|c| *c > 0.0);
            let increase = job.paper_cost_increase_per_gsm.map(amount).filter(|c| *c > 0.0);
            let matrix = job.custom_cost_matrix.as_ref().filter(|m| !m.is_empty());

            let pricing = match (job.gsm_price_mode, cost_per_kg, increase, matrix) {
                (GsmPriceMode::Flat, Some(_), _, _) => Some(PaperPricing::Flat),
                (GsmPriceMode::Slope, Some(_), Some(step), _) => Some(PaperPricing::slope(step)),
                (GsmPriceMode::Custom, _, _, Some(m)) => Some(PaperPricing::Custom(m)),
                _ => None,
            };

            if let Some(pricing) = pricing {
                let base = cost_per_kg.unwrap_or(DEFAULT_COST_PER_KG);
                return cost_per_sheet(width, height, gsm, base, pricing);
            }

            tracing::debug!(
                mode = ?job.gsm_price_mode,
                "paper pricing parameters incomplete, using paper type cost"
            );
        }
    }

    job.paper_type_id
        .as_deref()
        .and_then(|id| settings.find_paper_type(id))
        .map(|paper| amount(paper.cost_per_sheet))
        .unwrap_or(0.0)
}

/// 印刷费：工时模型或整单固定费
pub fn press_cost(model: &PressCostModel) -> f64 {
    match *model {
        PressCostModel::Hourly {
            make_ready_time,
            estimated_print_run_time,
            press_hourly_rate,
        } => (amount(make_ready_time) + amount(estimated_print_run_time)) * amount(press_hourly_rate),
        PressCostModel::Flat { full_printing_cost } => amount(full_printing_cost),
    }
}

fn finishing_cost(
    job: &JobSpecification,
    settings: &PriceListSettings,
    dimensions: Option<(f64, f64)>,
) -> f64 {
    let quantity = f64::from(job.quantity);
    let mut total = 0.0;

    if job.folding_required {
        total += f64::from(job.number_of_folds) * quantity * FOLD_UNIT_RATE;
    }

    if job.cutting_required {
        total += f64::from(job.number_of_cuts) * CUT_FLAT_RATE;
    }

    if let Some(binding) = job
        .binding_option_id
        .as_deref()
        .and_then(|id| settings.find_binding_option(id))
    {
        total += amount(binding.base_cost) + amount(binding.per_unit_cost) * quantity;
    }

    total += lamination_cost(job, settings, dimensions);

    if job.embossing_required {
        total += EMBOSSING_BASE + EMBOSSING_PER_UNIT * quantity;
    }

    if job.foiling_required {
        total += FOILING_BASE + FOILING_PER_UNIT * quantity;
    }

    total + amount(job.packaging_delivery_cost)
}

/// 覆膜费按面积计：rate × 数量 × 面数 × 平方英寸 / 100
fn lamination_cost(
    job: &JobSpecification,
    settings: &PriceListSettings,
    dimensions: Option<(f64, f64)>,
) -> f64 {
    if job.lamination_type == LaminationType::None {
        return 0.0;
    }

    let rate = settings.lamination_rate(job.lamination_type);
    let sides = if job.is_double_sided_lamination { 2.0 } else { 1.0 };
    let area_sq_in = dimensions
        .map(|(w, h)| (w / MM_PER_INCH) * (h / MM_PER_INCH))
        .unwrap_or(0.0);

    rate * f64::from(job.quantity) * sides * area_sq_in / LAMINATION_AREA_UNIT_SQ_IN
}
