// ==========================================
// 缝纫车间生产看板 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、日历规则
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod calendar;
pub mod production;
pub mod ranking;
pub mod types;

// 重导出核心类型
pub use production::{BandTotal, DailyTotal, ProductionRecord, RecordChange};
pub use ranking::{MonthlyRanking, DEFAULT_RANKING_TOP_N};
pub use types::{RecordStatus, StationKind};
