// ==========================================
// 缝纫车间生产看板 - API 数据传输对象
// ==========================================
// 请求体: JSON 或表单均可, quantity 允许数字或数字字符串
// 响应体: camelCase 字段, 与看板前端脚本保持一致
// ==========================================

use crate::domain::production::{DailyTotal, ProductionRecord};
use crate::domain::ranking::MonthlyRanking;
use crate::engine::aggregator::{ChartSummary, MaxStation, MonthlyStats, TimeWindow};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ==========================================
// 请求
// ==========================================

/// 新增记录请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddRecordRequest {
    pub band: Option<String>,
    pub quantity: Option<Value>,
}

/// 修改数量请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: Option<Value>,
}

/// 图表查询参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GrafikQuery {
    pub period: Option<String>,
}

/// 排行查询参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RankingsQuery {
    pub month: Option<String>,
}

// ==========================================
// 响应
// ==========================================

/// 图表数据 (/api/grafik-data)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartView {
    pub period: TimeWindow,
    #[serde(flatten)]
    pub summary: ChartSummary,
}

/// /grafik 页面数据
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrafikOverview {
    pub today: ChartSummary,
    pub monthly_stats: MonthlyStats,
    pub rankings: Vec<MonthlyRanking>,
}

/// /database 页面数据
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseOverview {
    pub records: Vec<ProductionRecord>,
    pub total_records: i64,
    pub daily_rollup: Vec<DailyTotal>,
}

/// 排行快照
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingsView {
    pub month: String,
    pub rankings: Vec<MonthlyRanking>,
}

impl GrafikOverview {
    /// 读取失败时页面使用的空数据
    pub fn empty(month: &str) -> Self {
        Self {
            today: ChartSummary {
                chart_data: Vec::new(),
                total_all: 0,
                max_band: MaxStation::none(),
            },
            monthly_stats: MonthlyStats {
                month: month.to_string(),
                total_quantity: 0,
                active_days: 0,
                daily_average: 0,
                best_station: MaxStation::none(),
            },
            rankings: Vec::new(),
        }
    }
}

impl DatabaseOverview {
    /// 读取失败时页面使用的空数据
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            total_records: 0,
            daily_rollup: Vec::new(),
        }
    }
}
