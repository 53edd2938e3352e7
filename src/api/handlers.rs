use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::models::{CostBreakdown, GsmPriceMode, JobSpecification, SheetSize, GSM_LADDER, SHEET_SIZES};
use crate::service::paper_matrix::MatrixRow;
use crate::service::{compute_breakdown, PaperCostMatrix, PaperPricing};
use crate::state::AppState;
use axum::{
    extract::{Json, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Extension,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 报价计算：读取当前价目表快照后调用计算引擎
pub async fn calculate(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(job): Json<JobSpecification>,
) -> Json<CostBreakdown> {
    let settings = state.settings.snapshot();
    let breakdown = compute_breakdown(&job, &settings);

    tracing::info!(
        user = %user.username,
        quantity = job.quantity,
        grand_total = breakdown.grand_total,
        "Quote calculated"
    );
    Json(breakdown)
}

/// 标准尺寸目录
pub async fn sheet_sizes() -> Json<Vec<SheetSize>> {
    Json(SHEET_SIZES.to_vec())
}

/// 克重阶梯
pub async fn gsm_ladder() -> Json<Vec<u32>> {
    Json(GSM_LADDER.to_vec())
}

/// 纸张矩阵请求体
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixRequest {
    pub cost_per_kg: f64,
    #[serde(default)]
    pub gsm_price_mode: GsmPriceMode,
    pub paper_cost_increase_per_gsm: Option<f64>,
    pub custom_cost_matrix: Option<BTreeMap<u32, f64>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FormatQuery {
    pub format: Option<String>,
}

/// 纸张矩阵响应体
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixResponse {
    pub gsm_ladder: Vec<u32>,
    pub rows: Vec<MatrixRow>,
}

/// 生成 标准尺寸 × 克重 单张成本矩阵，`?format=csv` 时返回CSV
pub async fn paper_matrix(
    Query(query): Query<FormatQuery>,
    Json(req): Json<MatrixRequest>,
) -> Result<Response, AppError> {
    if !(req.cost_per_kg.is_finite() && req.cost_per_kg >= 0.0) {
        return Err(AppError::Validation("costPerKg must be a non-negative number".into()));
    }

    let pricing = PaperPricing::from_mode(
        req.gsm_price_mode,
        req.paper_cost_increase_per_gsm,
        req.custom_cost_matrix.as_ref(),
    );
    let matrix = PaperCostMatrix::generate(req.cost_per_kg, pricing);

    match query.format.as_deref() {
        None | Some("json") => Ok(Json(MatrixResponse {
            gsm_ladder: GSM_LADDER.to_vec(),
            rows: matrix.rows(),
        })
        .into_response()),
        Some("csv") => {
            let mut buf = Vec::new();
            matrix.write_csv(&mut buf)?;
            Ok(([(header::CONTENT_TYPE, "text/csv; charset=utf-8")], buf).into_response())
        }
        Some(other) => Err(AppError::Validation(format!("unsupported format: {}", other))),
    }
}
