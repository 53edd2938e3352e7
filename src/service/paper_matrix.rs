use crate::models::sheet::{standard_sheet_sizes, SheetSize, GSM_LADDER};
use crate::models::GsmPriceMode;
use indexmap::{Equivalent, IndexMap};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;

/// 斜率定价的基准克重
pub const BASE_GSM: u32 = 80;

/// 每公斤单价的推导方式
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaperPricing<'a> {
    Flat,
    Slope { increase_per_gsm: f64, base_gsm: u32 },
    Custom(&'a BTreeMap<u32, f64>),
}

impl<'a> PaperPricing<'a> {
    /// 以 80g 为基准的斜率定价
    pub fn slope(increase_per_gsm: f64) -> Self {
        PaperPricing::Slope {
            increase_per_gsm,
            base_gsm: BASE_GSM,
        }
    }

    /// 由定价模式和参数组装（缺失的斜率视为0，缺失的矩阵视为空表）
    pub fn from_mode(
        mode: GsmPriceMode,
        increase_per_gsm: Option<f64>,
        custom_matrix: Option<&'a BTreeMap<u32, f64>>,
    ) -> Self {
        match (mode, custom_matrix) {
            (GsmPriceMode::Flat, _) => PaperPricing::Flat,
            (GsmPriceMode::Slope, _) => PaperPricing::slope(increase_per_gsm.unwrap_or(0.0)),
            (GsmPriceMode::Custom, Some(matrix)) => PaperPricing::Custom(matrix),
            (GsmPriceMode::Custom, None) => PaperPricing::Flat,
        }
    }

    /// 实际每公斤单价；负数或非法单价按0处理，自定义表中的非法项视为缺失
    pub fn effective_cost_per_kg(&self, gsm: u32, cost_per_kg: f64) -> f64 {
        let base = price(cost_per_kg);
        match *self {
            PaperPricing::Flat => base,
            PaperPricing::Slope {
                increase_per_gsm,
                base_gsm,
            } => {
                if gsm > base_gsm {
                    base + f64::from(gsm - base_gsm) * price(increase_per_gsm)
                } else {
                    base
                }
            }
            PaperPricing::Custom(matrix) => {
                match matrix.get(&gsm).copied().filter(|c| c.is_finite() && *c > 0.0) {
                    Some(cost) => cost,
                    None => {
                        tracing::debug!(gsm, cost_per_kg, "no custom price for gsm, using base cost per kg");
                        base
                    }
                }
            }
        }
    }
}

fn price(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// 单张纸重量（公斤）
pub fn sheet_weight_kg(width_mm: f64, height_mm: f64, gsm: u32) -> f64 {
    let area_m2 = (width_mm / 1000.0) * (height_mm / 1000.0);
    area_m2 * f64::from(gsm) / 1000.0
}

/// 单张纸成本
///
/// 尺寸或克重为0（或非法）时返回0。
pub fn cost_per_sheet(
    width_mm: f64,
    height_mm: f64,
    gsm: u32,
    cost_per_kg: f64,
    pricing: PaperPricing<'_>,
) -> f64 {
    let valid = |v: f64| v.is_finite() && v > 0.0;
    if gsm == 0 || !valid(width_mm) || !valid(height_mm) {
        return 0.0;
    }
    sheet_weight_kg(width_mm, height_mm, gsm) * pricing.effective_cost_per_kg(gsm, cost_per_kg)
}

/// 矩阵中的一行（一个标准尺寸在各克重下的单张成本）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixRow {
    pub size_id: &'static str,
    pub name: &'static str,
    pub width_mm: f64,
    pub height_mm: f64,
    pub costs: IndexMap<u32, f64>,
}

/// 以借用的尺寸id查询 `(&'static str, u32)` 键，哈希与元组一致
#[derive(Hash)]
struct CellRef<'a>(&'a str, u32);

impl Equivalent<(&'static str, u32)> for CellRef<'_> {
    fn equivalent(&self, key: &(&'static str, u32)) -> bool {
        self.0 == key.0 && self.1 == key.1
    }
}

/// 标准尺寸 × 克重阶梯 的单张成本表，按目录顺序保存
#[derive(Debug, Clone, PartialEq)]
pub struct PaperCostMatrix {
    cells: IndexMap<(&'static str, u32), f64>,
}

impl PaperCostMatrix {
    /// 生成展示用矩阵
    pub fn generate(cost_per_kg: f64, pricing: PaperPricing<'_>) -> Self {
        let sizes: Vec<&'static SheetSize> = standard_sheet_sizes().collect();

        let cells: Vec<((&'static str, u32), f64)> = sizes
            .par_iter()
            .flat_map_iter(|size| {
                GSM_LADDER.iter().map(move |&gsm| {
                    let cost = cost_per_sheet(size.width_mm, size.height_mm, gsm, cost_per_kg, pricing);
                    ((size.id, gsm), cost)
                })
            })
            .collect();

        Self {
            cells: cells.into_iter().collect(),
        }
    }

    pub fn get(&self, size_id: &str, gsm: u32) -> Option<f64> {
        self.cells.get(&CellRef(size_id, gsm)).copied()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// 按尺寸分组的行视图
    pub fn rows(&self) -> Vec<MatrixRow> {
        standard_sheet_sizes()
            .map(|size| MatrixRow {
                size_id: size.id,
                name: size.name,
                width_mm: size.width_mm,
                height_mm: size.height_mm,
                costs: GSM_LADDER
                    .iter()
                    .filter_map(|&gsm| self.cells.get(&(size.id, gsm)).map(|c| (gsm, *c)))
                    .collect(),
            })
            .collect()
    }

    /// 导出CSV：每个尺寸一行，每个克重一列
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut wtr = csv::Writer::from_writer(writer);

        let mut header = vec!["size".to_string(), "width_mm".to_string(), "height_mm".to_string()];
        header.extend(GSM_LADDER.iter().map(|g| format!("{}gsm", g)));
        wtr.write_record(&header)?;

        for row in self.rows() {
            let mut record = vec![
                row.name.to_string(),
                row.width_mm.to_string(),
                row.height_mm.to_string(),
            ];
            record.extend(row.costs.values().map(|c| format!("{:.4}", c)));
            wtr.write_record(&record)?;
        }

        wtr.flush()?;
        Ok(())
    }
}
