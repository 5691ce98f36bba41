// ==========================================
// 缝纫车间生产看板 - 月度排行引擎
// ==========================================
// 职责: 统计本月缝纫站累计数量, 取前 N 名, 整批替换当月快照
// 输入: 本月按站点汇总 (排除 deleted)
// 输出: monthly_rankings 快照
// 红线: 仅缝纫站参与排行; 名次从 1 连续递增
// ==========================================

use crate::config::stations::{is_sewing_band, sewing_band_number};
use crate::domain::calendar::{is_last_day_of_month, month_key, month_start, to_stored_precision};
use crate::domain::production::BandTotal;
use crate::domain::ranking::MonthlyRanking;
use crate::repository::{MonthlyRankingRepository, ProductionRecordRepository, RepositoryResult};
use chrono::NaiveDateTime;
use std::cmp::Reverse;
use std::sync::Arc;
use tracing::{error, info, instrument};

/// 对本月汇总排序并截取前 N 名
///
/// # 参数
/// - `sums`: 本月按站点汇总
/// - `top_n`: 排行长度
/// - `month`: 月份键
/// - `created_at`: 快照生成时间
///
/// # 返回
/// 按数量降序的快照行; 同量时按站点序号升序
pub fn rank_sewing_totals(
    sums: &[BandTotal],
    top_n: usize,
    month: &str,
    created_at: NaiveDateTime,
) -> Vec<MonthlyRanking> {
    let created_at = to_stored_precision(created_at);
    let mut eligible: Vec<&BandTotal> = sums.iter().filter(|s| is_sewing_band(&s.band)).collect();

    eligible.sort_by_key(|s| {
        (
            Reverse(s.total_quantity),
            sewing_band_number(&s.band).unwrap_or(u32::MAX),
            s.band.clone(),
        )
    });

    eligible
        .into_iter()
        .take(top_n)
        .enumerate()
        .map(|(idx, s)| MonthlyRanking {
            band: s.band.clone(),
            total_quantity: s.total_quantity,
            rank: idx as u32 + 1,
            month: month.to_string(),
            created_at,
        })
        .collect()
}

// ==========================================
// RankingEngine - 月度排行引擎
// ==========================================
pub struct RankingEngine {
    record_repo: Arc<ProductionRecordRepository>,
    ranking_repo: Arc<MonthlyRankingRepository>,
    top_n: usize,
}

impl RankingEngine {
    /// 构造函数
    ///
    /// # 参数
    /// - `record_repo`: 生产记录仓储
    /// - `ranking_repo`: 月度排行仓储
    /// - `top_n`: 排行长度 (来自 config_kv.ranking_top_n)
    pub fn new(
        record_repo: Arc<ProductionRecordRepository>,
        ranking_repo: Arc<MonthlyRankingRepository>,
        top_n: usize,
    ) -> Self {
        Self {
            record_repo,
            ranking_repo,
            top_n,
        }
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// 重新计算本月排行并替换快照
    ///
    /// # 参数
    /// - `now`: 当前本地时间 (决定月份窗口)
    ///
    /// # 返回
    /// 新写入的快照 (可能为空)
    #[instrument(skip(self))]
    pub fn recompute(&self, now: NaiveDateTime) -> RepositoryResult<Vec<MonthlyRanking>> {
        let month = month_key(now.date());
        let sums = self.record_repo.sum_by_band(Some(month_start(now.date())))?;

        let rankings = rank_sewing_totals(&sums, self.top_n, &month, now);
        let written = self.ranking_repo.replace_month(&month, &rankings)?;

        info!(month = %month, rows = written, "月度排行已更新");
        Ok(rankings)
    }

    /// 月末自动重算 (失败只记日志)
    ///
    /// # 返回
    /// - Some(snapshot): 今天是月末且重算成功
    /// - None: 非月末, 或重算失败
    pub fn recompute_if_month_end(&self, now: NaiveDateTime) -> Option<Vec<MonthlyRanking>> {
        if !is_last_day_of_month(now.date()) {
            return None;
        }

        match self.recompute(now) {
            Ok(rankings) => Some(rankings),
            Err(e) => {
                error!(error = %e, "月末排行重算失败");
                None
            }
        }
    }

    /// 查询指定月份的快照
    pub fn snapshot_for(&self, month: &str) -> RepositoryResult<Vec<MonthlyRanking>> {
        self.ranking_repo.find_by_month(month)
    }
}
