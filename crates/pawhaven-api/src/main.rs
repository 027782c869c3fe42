//! PawHaven HTTP 服务入口
//!
//! 加载配置、初始化可观测性、连接数据库并启动 REST API。

use axum::{
    Json, Router,
    extract::{Request, State},
    http::{HeaderValue, header},
    middleware::{self, Next},
    response::Response,
    routing::get,
};
use pawhaven_api::{auth::JwtConfig, middleware::auth_middleware, routes, state::AppState};
use pawhaven_shared::{
    config::{AppConfig, CorsConfig},
    database::Database,
    observability::{self, middleware as obs_middleware},
};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

const SERVICE_NAME: &str = "pawhaven-api";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 统一加载配置：default.toml -> {env}.toml -> pawhaven-api.toml -> 环境变量
    let config = AppConfig::load(SERVICE_NAME)?;

    let obs_config = config
        .observability
        .clone()
        .with_service_name(&config.service_name);
    let _guard = observability::init(&obs_config).await?;

    info!(
        environment = %config.environment,
        "Starting {} on {}",
        SERVICE_NAME,
        config.server_addr()
    );

    // 生产环境必须注入 JWT 密钥
    if config.auth.uses_default_secret() {
        if config.is_production() {
            anyhow::bail!("PAWHAVEN_AUTH__JWT_SECRET must be set in production environment");
        }
        warn!("Using default JWT secret - set PAWHAVEN_AUTH__JWT_SECRET for production");
    }

    let db = Database::connect(&config.database).await?;
    if config.database.run_migrations {
        db.migrate().await?;
    }

    let state = AppState::new(db.pool().clone(), JwtConfig::from(&config.auth));

    if config.catalog.seed_on_startup {
        let report = state.catalog.seed().await?;
        info!(
            created = report.created,
            updated = report.updated,
            "Badge catalog seeded on startup"
        );
    }

    let app = Router::new()
        .nest("/api", routes::api_routes())
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .layer(middleware::from_fn(security_headers))
        .layer(cors_layer(&config.cors, config.is_production()))
        // 认证中间件：解析 Bearer Token，无效 Token 按匿名处理
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        // 可观测性中间件：请求追踪和指标收集
        .layer(middleware::from_fn(obs_middleware::http_tracing))
        .layer(middleware::from_fn(obs_middleware::request_id))
        .with_state(state);

    let listener = TcpListener::bind(config.server_addr()).await?;
    info!("Listening on {}", config.server_addr());

    // 优雅关闭：收到 SIGTERM 或 Ctrl+C 后停止接收新连接，等待已有请求处理完毕
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");

    Ok(())
}

/// 按配置构建 CORS 层
fn cors_layer(config: &CorsConfig, production: bool) -> CorsLayer {
    if config.allows_any() {
        if production {
            warn!("CORS allowed_origins=\"*\" 在生产环境中不安全，请设置为具体域名");
        }
        info!("CORS allowed_origins: * (all origins)");
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    info!("CORS allowed_origins: {}", config.allowed_origins);
    let origins: Vec<HeaderValue> = config
        .origins()
        .iter()
        .filter_map(|s| s.parse::<HeaderValue>().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// 为所有响应注入 HTTP 安全头
async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(header::X_XSS_PROTECTION, HeaderValue::from_static("0"));
    response
}

/// 监听关闭信号
///
/// 收到 SIGTERM 或 Ctrl+C 任一信号后返回，触发 axum 的优雅关闭流程。
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "注册 Ctrl+C 处理器失败");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "注册 SIGTERM 处理器失败");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown..."),
        _ = terminate => info!("Received SIGTERM, initiating graceful shutdown..."),
    }
}

/// 存活探针：服务进程正常即返回 ok
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": SERVICE_NAME
    }))
}

/// 就绪探针：检查数据库连接是否可用
async fn readiness_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let db_ok = Database::from_pool(state.pool.clone())
        .health_check()
        .await
        .is_ok();

    Json(serde_json::json!({
        "status": if db_ok { "ok" } else { "degraded" },
        "service": SERVICE_NAME,
        "checks": {
            "database": if db_ok { "ok" } else { "fail" }
        }
    }))
}
