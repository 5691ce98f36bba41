// ==========================================
// 缝纫车间生产看板 - 核心库
// ==========================================
// 技术栈: axum + Rust + SQLite
// 系统定位: 车间生产录入、站点统计、月度排行
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "uz");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 汇总与排行
pub mod engine;

// 配置层 - 进程配置、站点表、运行期参数
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 性能统计
pub mod perf;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - HTTP 集成
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{RecordStatus, StationKind};

// 领域实体
pub use domain::{BandTotal, DailyTotal, MonthlyRanking, ProductionRecord};

// 引擎
pub use engine::{Aggregator, RankingEngine, RankingScheduler, TimeWindow};

// API
pub use api::{DashboardApi, ProductionApi};

// 应用
pub use app::{build_router, AppState};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "Tikuv Nazorati";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
