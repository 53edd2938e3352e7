use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::models::{Client, ClientCreate, ClientOverview, ClientQuery, ClientUpdate};
use crate::state::AppState;
use axum::{
    extract::{Json, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

fn parse_client_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::Validation("Invalid client ID format".into()))
}

pub async fn list_clients(
    State(state): State<AppState>,
    Query(query): Query<ClientQuery>,
) -> Result<Json<Vec<Client>>, AppError> {
    Ok(Json(state.clients.list(&query)?))
}

pub async fn create_client(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(data): Json<ClientCreate>,
) -> Result<(StatusCode, Json<Client>), AppError> {
    let client = state.clients.create(data, &user.username)?;
    Ok((StatusCode::CREATED, Json(client)))
}

pub async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Client>, AppError> {
    let id = parse_client_id(&id)?;
    Ok(Json(state.clients.get(id)?))
}

pub async fn update_client(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(changes): Json<ClientUpdate>,
) -> Result<Json<Client>, AppError> {
    let id = parse_client_id(&id)?;
    Ok(Json(state.clients.update(id, changes, &user.username)?))
}

pub async fn delete_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_client_id(&id)?;
    state.clients.delete(id)?;
    Ok(Json(json!({ "message": "Client deleted successfully" })))
}

/// 订单记录请求体，`orderDate` 缺省为当前时间
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBody {
    pub amount: f64,
    pub order_date: Option<DateTime<Utc>>,
}

pub async fn record_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<OrderBody>,
) -> Result<Json<Client>, AppError> {
    let id = parse_client_id(&id)?;
    let at = body.order_date.unwrap_or_else(Utc::now);
    Ok(Json(state.clients.record_order(id, body.amount, at)?))
}

pub async fn export_clients(State(state): State<AppState>) -> Result<Response, AppError> {
    let mut buf = Vec::new();
    let rows = state.clients.export_csv(&mut buf)?;
    tracing::info!("Exported {} clients", rows);

    let filename = format!("clients_{}.csv", Utc::now().format("%Y%m%d_%H%M%S"));
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename={}", filename)),
        ],
        buf,
    )
        .into_response())
}

pub async fn analytics_overview(State(state): State<AppState>) -> Json<ClientOverview> {
    Json(state.clients.overview())
}
