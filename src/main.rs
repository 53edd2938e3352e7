use offset_quote::{build_router, AppConfig, AppState};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, Level};
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载配置
    let config = AppConfig::from_env()?;

    // 初始化日志 - 使用本地时间格式
    let level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .with_max_level(level)
        .init();

    info!("Starting server with config: {:?}", config);

    // 价目表、客户档案、账号与令牌
    let state = AppState::from_config(&config)?;
    info!(
        "Price list loaded: {} paper types, {} binding options",
        state.settings.snapshot().paper_types.len(),
        state.settings.snapshot().binding_options.len()
    );

    // 构建路由
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // 启动服务器
    let addr = config.bind_addr();
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  POST /token                 - Login (form)");
    info!("  POST /calculate             - Quote cost breakdown");
    info!("  POST /paper-matrix          - Paper cost matrix (?format=csv)");
    info!("  GET  /settings              - Price list");
    info!("  GET  /api/database/clients  - Client records");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
