use crate::error::AppError;
use crate::models::{BindingOption, LaminationType, PaperType, PriceListSettings};
use crate::state::AppState;
use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingOptionBody {
    pub name: String,
    pub base_cost: f64,
    pub per_unit_cost: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperTypeBody {
    pub name: String,
    pub cost_per_sheet: f64,
}

#[derive(Debug, Deserialize)]
pub struct LaminationRateBody {
    pub rate: f64,
}

pub async fn get_settings(State(state): State<AppState>) -> Json<PriceListSettings> {
    Json(PriceListSettings::clone(&state.settings.snapshot()))
}

pub async fn replace_settings(
    State(state): State<AppState>,
    Json(settings): Json<PriceListSettings>,
) -> Result<Json<PriceListSettings>, AppError> {
    let updated = state.settings.replace(settings)?;
    Ok(Json(PriceListSettings::clone(&updated)))
}

pub async fn upsert_binding_option(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<BindingOptionBody>,
) -> Result<Json<PriceListSettings>, AppError> {
    let updated = state.settings.upsert_binding_option(BindingOption {
        id,
        name: body.name,
        base_cost: body.base_cost,
        per_unit_cost: body.per_unit_cost,
    })?;
    Ok(Json(PriceListSettings::clone(&updated)))
}

pub async fn remove_binding_option(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.settings.remove_binding_option(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn upsert_paper_type(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<PaperTypeBody>,
) -> Result<Json<PriceListSettings>, AppError> {
    let updated = state.settings.upsert_paper_type(PaperType {
        id,
        name: body.name,
        cost_per_sheet: body.cost_per_sheet,
    })?;
    Ok(Json(PriceListSettings::clone(&updated)))
}

pub async fn set_lamination_rate(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Json(body): Json<LaminationRateBody>,
) -> Result<Json<PriceListSettings>, AppError> {
    let kind = LaminationType::parse(&kind)
        .ok_or_else(|| AppError::Validation(format!("unknown lamination type: {}", kind)))?;
    let updated = state.settings.set_lamination_rate(kind, body.rate)?;
    Ok(Json(PriceListSettings::clone(&updated)))
}
