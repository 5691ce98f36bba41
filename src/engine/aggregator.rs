// ==========================================
// 缝纫车间生产看板 - 汇总引擎
// ==========================================
// 职责: 站点累计、百分比归一化、最大站点、月度统计
// 输入: 仓储层汇总行 (BandTotal / DailyTotal)
// 输出: 图表条目 + 汇总
// 红线: Engine 不拼 SQL, 时间窗口下界由调用方传入仓储
// ==========================================

use crate::config::stations::{StationSpec, StationTable};
use crate::domain::calendar::{day_start, month_start};
use crate::domain::production::{BandTotal, DailyTotal};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 固定目标百分比上限
pub const FIXED_TARGET_CAP: i64 = 150;

/// 超额部分最多计入的百分点
pub const OVERSHOOT_ALLOWANCE: f64 = 50.0;

/// 相对平均百分比上限
pub const RELATIVE_AVERAGE_CAP: i64 = 100;

// ==========================================
// TimeWindow - 统计时间窗口
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    #[serde(rename = "all")]
    AllTime, // 全部历史
    #[default]
    Today, // 今日 00:00 起
    #[serde(rename = "month")]
    CurrentMonth, // 本月 1 日 00:00 起
}

impl TimeWindow {
    /// 解析查询参数 (today / month / all)
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "today" => Some(TimeWindow::Today),
            "month" => Some(TimeWindow::CurrentMonth),
            "all" => Some(TimeWindow::AllTime),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::AllTime => "all",
            TimeWindow::Today => "today",
            TimeWindow::CurrentMonth => "month",
        }
    }

    /// 窗口下界 (含), None 表示不设下界
    pub fn lower_bound(&self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        match self {
            TimeWindow::AllTime => None,
            TimeWindow::Today => Some(day_start(now.date())),
            TimeWindow::CurrentMonth => Some(month_start(now.date())),
        }
    }

    /// 窗口对应的百分比口径
    ///
    /// 日视图按固定目标, 月/全部视图按相对平均
    pub fn percentage_policy(&self) -> PercentagePolicy {
        match self {
            TimeWindow::Today => PercentagePolicy::FixedTarget,
            TimeWindow::CurrentMonth | TimeWindow::AllTime => PercentagePolicy::RelativeAverage,
        }
    }
}

// ==========================================
// PercentagePolicy - 百分比口径
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PercentagePolicy {
    RelativeAverage, // 相对全站平均, 上限 100
    FixedTarget,     // 相对日目标, 超额压缩, 上限 150
}

/// 四舍五入 (0.5 向上)
pub fn round_half_up(x: f64) -> i64 {
    (x + 0.5).floor() as i64
}

/// 数量累加, 溢出时停在 i64 上下限
pub fn saturating_total<I>(quantities: I) -> i64
where
    I: IntoIterator<Item = i64>,
{
    quantities
        .into_iter()
        .fold(0i64, |acc, q| acc.saturating_add(q))
}

/// 相对平均百分比
///
/// # 参数
/// - `quantity`: 站点数量
/// - `total`: 全部站点合计
/// - `station_count`: 站点数
///
/// # 返回
/// `min(100, round(q / (total / n) * 100))`, 平均为 0 时返回 0
pub fn relative_average_percentage(quantity: i64, total: i64, station_count: usize) -> i64 {
    if station_count == 0 {
        return 0;
    }
    let average = total as f64 / station_count as f64;
    if average <= 0.0 {
        return 0;
    }
    round_half_up(quantity as f64 / average * 100.0).min(RELATIVE_AVERAGE_CAP)
}

/// 固定目标百分比
///
/// 超过 100 的部分最多计入 50 个百分点, 结果不超过 150
pub fn fixed_target_percentage(quantity: i64, target: i64) -> i64 {
    if target <= 0 {
        return 0;
    }
    let mut raw = quantity as f64 / target as f64 * 100.0;
    if raw > 100.0 {
        raw = 100.0 + (raw - 100.0).min(OVERSHOOT_ALLOWANCE);
    }
    round_half_up(raw).min(FIXED_TARGET_CAP)
}

// ==========================================
// 输出模型
// ==========================================

/// 单站点图表条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationStat {
    pub band: String,
    pub quantity: i64,
    pub target: i64,
    pub percentage: i64,
    pub color: String,
    #[serde(rename = "type")]
    pub kind_label: String, // tikuv / dazmol / upakovka
}

/// 数量最大的站点
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaxStation {
    pub band: String,
    pub quantity: i64,
}

impl MaxStation {
    /// 无数据时的占位值
    pub fn none() -> Self {
        Self {
            band: "-".to_string(),
            quantity: 0,
        }
    }
}

/// 图表汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSummary {
    pub chart_data: Vec<StationStat>,
    pub total_all: i64,
    pub max_band: MaxStation,
}

/// 月度统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyStats {
    pub month: String,
    pub total_quantity: i64,
    pub active_days: i64,
    pub daily_average: i64,
    pub best_station: MaxStation,
}

/// 取第一个严格最大的条目 (从左到右归约)
pub fn max_station(stats: &[StationStat]) -> MaxStation {
    let mut iter = stats.iter();
    let Some(first) = iter.next() else {
        return MaxStation::none();
    };

    let best = iter.fold(first, |max, item| {
        if item.quantity > max.quantity {
            item
        } else {
            max
        }
    });

    MaxStation {
        band: best.band.clone(),
        quantity: best.quantity,
    }
}

// ==========================================
// Aggregator - 汇总引擎
// ==========================================
pub struct Aggregator {
    stations: StationTable,
}

impl Aggregator {
    pub fn new(stations: StationTable) -> Self {
        Self { stations }
    }

    pub fn stations(&self) -> &StationTable {
        &self.stations
    }

    /// 按站点表顺序展开汇总行
    ///
    /// 无记录的站点补 0, 站点表以外的标识被忽略
    pub fn station_totals<'a>(&'a self, sums: &[BandTotal]) -> Vec<(&'a StationSpec, i64)> {
        let by_band: HashMap<&str, i64> = sums
            .iter()
            .map(|s| (s.band.as_str(), s.total_quantity))
            .collect();

        self.stations
            .iter()
            .map(|spec| (spec, by_band.get(spec.id.as_str()).copied().unwrap_or(0)))
            .collect()
    }

    /// 构建图表汇总
    ///
    /// # 参数
    /// - `sums`: 窗口内按站点汇总的数量 (已排除 deleted)
    /// - `policy`: 百分比口径
    pub fn build_chart(&self, sums: &[BandTotal], policy: PercentagePolicy) -> ChartSummary {
        let totals = self.station_totals(sums);
        let total_all = saturating_total(totals.iter().map(|(_, q)| *q));
        let station_count = totals.len();

        let chart_data: Vec<StationStat> = totals
            .into_iter()
            .map(|(spec, quantity)| {
                let percentage = match policy {
                    PercentagePolicy::RelativeAverage => {
                        relative_average_percentage(quantity, total_all, station_count)
                    }
                    PercentagePolicy::FixedTarget => {
                        fixed_target_percentage(quantity, spec.daily_target)
                    }
                };
                StationStat {
                    band: spec.id.clone(),
                    quantity,
                    target: spec.daily_target,
                    percentage,
                    color: spec.color.clone(),
                    kind_label: spec.kind.label().to_string(),
                }
            })
            .collect();

        let max_band = max_station(&chart_data);

        ChartSummary {
            chart_data,
            total_all,
            max_band,
        }
    }

    /// 月度统计
    ///
    /// # 参数
    /// - `month`: 月份键
    /// - `daily`: 本月逐日汇总
    /// - `month_sums`: 本月按站点汇总
    pub fn monthly_stats(
        &self,
        month: &str,
        daily: &[DailyTotal],
        month_sums: &[BandTotal],
    ) -> MonthlyStats {
        let total_quantity = saturating_total(daily.iter().map(|d| d.total_quantity));
        let active_days = daily.iter().filter(|d| d.record_count > 0).count() as i64;
        let daily_average = if active_days > 0 {
            round_half_up(total_quantity as f64 / active_days as f64)
        } else {
            0
        };

        let chart = self.build_chart(month_sums, PercentagePolicy::RelativeAverage);
        let best_station = if chart.total_all > 0 {
            chart.max_band
        } else {
            MaxStation::none()
        };

        MonthlyStats {
            month: month.to_string(),
            total_quantity,
            active_days,
            daily_average,
            best_station,
        }
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(StationTable::standard())
    }
}
