// ==========================================
// 缝纫车间生产看板 - 月度排行领域模型
// ==========================================
// 红线: 每月最多 N 行, 名次从 1 连续递增
// 生命周期: 按月整批替换, 不做单行修改
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 默认排行榜长度
pub const DEFAULT_RANKING_TOP_N: usize = 3;

// ==========================================
// MonthlyRanking - 月度排行快照行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRanking {
    pub band: String,              // 站点标识 (仅缝纫站)
    pub total_quantity: i64,       // 当月累计数量
    pub rank: u32,                 // 名次 (1..N)
    pub month: String,             // 月份键 YYYY-MM
    pub created_at: NaiveDateTime, // 快照生成时间
}

/// 比较两份快照是否等价 (忽略生成时间)
pub fn same_snapshot(a: &[MonthlyRanking], b: &[MonthlyRanking]) -> bool {
    a.len() == b.len()
        && a.iter().zip(b.iter()).all(|(x, y)| {
            x.band == y.band
                && x.total_quantity == y.total_quantity
                && x.rank == y.rank
                && x.month == y.month
        })
}
