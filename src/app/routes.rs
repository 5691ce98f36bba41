// ==========================================
// 缝纫车间生产看板 - 路由
// ==========================================
// 页面: /, /user, /grafik, /database
// 接口: /api/*
// 其余路径: 静态文件目录 (ServeDir)
// ==========================================

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::app::http_handlers as h;
use crate::app::state::AppState;

/// 构建完整路由
pub fn build_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.public_dir);

    Router::new()
        // 页面
        .route("/", get(h::root))
        .route("/user", get(h::user_page))
        .route("/grafik", get(h::grafik_page))
        .route("/database", get(h::database_page))
        // 生产记录
        .route("/api/add", post(h::add_record))
        .route("/api/update/:id", put(h::update_record))
        .route("/api/delete/:id", delete(h::delete_record))
        .route("/api/data", get(h::list_records))
        // 图表与排行
        .route("/api/grafik-data", get(h::grafik_data))
        .route("/api/update-rankings", post(h::update_rankings))
        .route("/api/rankings", get(h::rankings))
        .route("/healthz", get(h::healthz))
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
