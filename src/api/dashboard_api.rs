// ==========================================
// 缝纫车间生产看板 - 看板 API
// ==========================================
// 职责: 图表汇总、月度统计、逐日汇总、月度排行
// 架构: API 层 → Engine 层 (Aggregator / RankingEngine) → Repository 层
// ==========================================

use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::info;

use crate::api::dto::{ChartView, DatabaseOverview, GrafikOverview, RankingsView};
use crate::api::error::ApiResult;
use crate::domain::calendar::{month_key, month_start};
use crate::domain::ranking::MonthlyRanking;
use crate::engine::aggregator::{Aggregator, ChartSummary, MonthlyStats, TimeWindow};
use crate::engine::ranking::RankingEngine;
use crate::repository::ProductionRecordRepository;

/// /database 页面展示的记录条数
pub const DATABASE_PAGE_LIMIT: usize = 500;

// ==========================================
// DashboardApi - 看板 API
// ==========================================
pub struct DashboardApi {
    record_repo: Arc<ProductionRecordRepository>,
    ranking_engine: Arc<RankingEngine>,
    aggregator: Arc<Aggregator>,
}

impl DashboardApi {
    /// 创建新的 DashboardApi 实例
    ///
    /// # 参数
    /// - record_repo: 生产记录仓储
    /// - ranking_engine: 月度排行引擎
    /// - aggregator: 汇总引擎 (持有站点表)
    pub fn new(
        record_repo: Arc<ProductionRecordRepository>,
        ranking_engine: Arc<RankingEngine>,
        aggregator: Arc<Aggregator>,
    ) -> Self {
        Self {
            record_repo,
            ranking_engine,
            aggregator,
        }
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    // ==========================================
    // 图表
    // ==========================================

    /// 指定窗口的站点图表
    ///
    /// # 参数
    /// - window: 统计窗口 (今日按固定目标, 本月/全部按相对平均)
    /// - now: 当前本地时间
    pub fn chart_data(&self, window: TimeWindow, now: NaiveDateTime) -> ApiResult<ChartView> {
        let sums = self.record_repo.sum_by_band(window.lower_bound(now))?;
        let summary = self
            .aggregator
            .build_chart(&sums, window.percentage_policy());

        Ok(ChartView {
            period: window,
            summary,
        })
    }

    /// 本月统计
    pub fn monthly_stats(&self, now: NaiveDateTime) -> ApiResult<MonthlyStats> {
        let since = month_start(now.date());
        let daily = self.record_repo.daily_totals(since)?;
        let month_sums = self.record_repo.sum_by_band(Some(since))?;

        Ok(self
            .aggregator
            .monthly_stats(&month_key(now.date()), &daily, &month_sums))
    }

    /// /grafik 页面: 今日图表 + 本月统计 + 本月排行
    pub fn grafik_overview(&self, now: NaiveDateTime) -> ApiResult<GrafikOverview> {
        let today: ChartSummary = self.chart_data(TimeWindow::Today, now)?.summary;
        let monthly_stats = self.monthly_stats(now)?;
        let rankings = self.ranking_engine.snapshot_for(&month_key(now.date()))?;

        Ok(GrafikOverview {
            today,
            monthly_stats,
            rankings,
        })
    }

    // ==========================================
    // 记录表
    // ==========================================

    /// /database 页面: 最近 500 条记录 + 本月逐日汇总
    pub fn database_overview(&self, now: NaiveDateTime) -> ApiResult<DatabaseOverview> {
        let records = self.record_repo.find_recent(Some(DATABASE_PAGE_LIMIT))?;
        let total_records = self.record_repo.count_all()?;
        let daily_rollup = self.record_repo.daily_totals(month_start(now.date()))?;

        Ok(DatabaseOverview {
            records,
            total_records,
            daily_rollup,
        })
    }

    // ==========================================
    // 月度排行
    // ==========================================

    /// 立即重算本月排行
    pub fn update_rankings(&self, now: NaiveDateTime) -> ApiResult<Vec<MonthlyRanking>> {
        let rankings = self.ranking_engine.recompute(now)?;
        info!(rows = rankings.len(), "手动更新月度排行");
        Ok(rankings)
    }

    /// 查询排行快照
    ///
    /// # 参数
    /// - month: 月份键 YYYY-MM, None 表示本月
    pub fn rankings_for(&self, month: Option<&str>, now: NaiveDateTime) -> ApiResult<RankingsView> {
        let month = match month.map(str::trim).filter(|m| !m.is_empty()) {
            Some(m) => m.to_string(),
            None => month_key(now.date()),
        };
        let rankings = self.ranking_engine.snapshot_for(&month)?;

        Ok(RankingsView { month, rankings })
    }
}
