pub mod auth;
pub mod clients;
pub mod handlers;
pub mod settings;

use crate::auth::require_auth;
use crate::state::AppState;
use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

/// 组装全部路由：公开路由 + 需要 Bearer 令牌的路由
pub fn build_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/token", post(auth::login))
        .route("/catalog/sheet-sizes", get(handlers::sheet_sizes))
        .route("/catalog/gsm", get(handlers::gsm_ladder));

    let protected = Router::new()
        .route("/users/me", get(auth::me))
        .route("/calculate", post(handlers::calculate))
        .route("/paper-matrix", post(handlers::paper_matrix))
        .route(
            "/settings",
            get(settings::get_settings).put(settings::replace_settings),
        )
        .route(
            "/settings/binding-options/:id",
            put(settings::upsert_binding_option).delete(settings::remove_binding_option),
        )
        .route("/settings/paper-types/:id", put(settings::upsert_paper_type))
        .route("/settings/lamination/:kind", put(settings::set_lamination_rate))
        .route(
            "/api/database/clients",
            get(clients::list_clients).post(clients::create_client),
        )
        // 静态段优先于 :id 匹配
        .route("/api/database/clients/export", get(clients::export_clients))
        .route(
            "/api/database/clients/:id",
            get(clients::get_client)
                .put(clients::update_client)
                .delete(clients::delete_client),
        )
        .route("/api/database/clients/:id/orders", post(clients::record_order))
        .route("/api/database/analytics/overview", get(clients::analytics_overview))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    public.merge(protected).with_state(state)
}
