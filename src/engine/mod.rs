// ==========================================
// 缝纫车间生产看板 - 引擎层
// ==========================================
// 职责: 汇总统计、月度排行、排行调度
// 红线: Engine 不拼 SQL
// ==========================================

pub mod aggregator;
pub mod ranking;
pub mod scheduler;

// 重导出核心引擎
pub use aggregator::{
    Aggregator, ChartSummary, MaxStation, MonthlyStats, PercentagePolicy, StationStat, TimeWindow,
};
pub use ranking::RankingEngine;
pub use scheduler::RankingScheduler;
