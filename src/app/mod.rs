// ==========================================
// 缝纫车间生产看板 - 应用层
// ==========================================
// 职责: HTTP 集成 (axum), 连接浏览器与后端
// ==========================================

pub mod http_handlers;
pub mod routes;
pub mod state;
pub mod views;

// 重导出
pub use routes::build_router;
pub use state::AppState;
