// ==========================================
// 缝纫车间生产看板 - 生产记录 API
// ==========================================
// 职责: 新增 / 修改数量 / 软删除 / 列表
// 红线: 记录永不物理删除; 修改与删除只覆写字段并迁移状态
// 月末规则: 月末当天新增成功后顺带重算月度排行 (失败不影响新增结果)
// ==========================================

use std::sync::Arc;

use chrono::NaiveDateTime;
use serde_json::Value;
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::production::{ProductionRecord, RecordChange};
use crate::engine::ranking::RankingEngine;
use crate::i18n::t;
use crate::repository::ProductionRecordRepository;

/// /user 页面展示的记录条数
pub const USER_PAGE_LIMIT: usize = 100;

/// 按 parseInt 语义解析数量
///
/// - 数字: 取整数部分
/// - 字符串: 忽略前导空白, 取可选符号 + 连续数字前缀
/// - 其他或无数字前缀: InvalidInput
pub fn parse_quantity(value: &Value) -> ApiResult<i64> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i)
            } else if let Some(f) = n.as_f64().filter(|f| f.is_finite()) {
                Ok(f.trunc() as i64)
            } else {
                Err(ApiError::InvalidInput(format!("quantity 超出范围: {}", n)))
            }
        }
        Value::String(s) => parse_int_prefix(s)
            .ok_or_else(|| ApiError::InvalidInput(format!("quantity 无法解析: {:?}", s))),
        other => Err(ApiError::InvalidInput(format!("quantity 类型错误: {}", other))),
    }
}

fn parse_int_prefix(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits_len = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
    if digits_len == 0 {
        return None;
    }

    let magnitude: i64 = rest[..digits_len].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

// ==========================================
// ProductionApi - 生产记录 API
// ==========================================
pub struct ProductionApi {
    record_repo: Arc<ProductionRecordRepository>,
    ranking_engine: Arc<RankingEngine>,
}

impl ProductionApi {
    /// 创建新的 ProductionApi 实例
    ///
    /// # 参数
    /// - record_repo: 生产记录仓储
    /// - ranking_engine: 月度排行引擎 (月末新增时使用)
    pub fn new(
        record_repo: Arc<ProductionRecordRepository>,
        ranking_engine: Arc<RankingEngine>,
    ) -> Self {
        Self {
            record_repo,
            ranking_engine,
        }
    }

    /// 新增记录
    ///
    /// # 参数
    /// - band: 站点标识 (不校验是否属于站点表)
    /// - quantity: 数量 (不校验范围)
    /// - now: 当前本地时间
    ///
    /// # 返回
    /// - Ok(ProductionRecord): 已保存的记录 (status=added)
    pub fn add_record(
        &self,
        band: &str,
        quantity: i64,
        now: NaiveDateTime,
    ) -> ApiResult<ProductionRecord> {
        let record = ProductionRecord::new_added(
            band.to_string(),
            quantity,
            t("operation.added"),
            now,
        );
        self.record_repo.insert(&record)?;

        info!(record_id = %record.id, band = %record.band, quantity, "新增生产记录");

        if self.ranking_engine.recompute_if_month_end(now).is_some() {
            info!(band = %record.band, "月末新增已触发排行重算");
        }

        Ok(record)
    }

    /// 修改数量
    ///
    /// # 返回
    /// - Ok(ProductionRecord): 覆写后的记录 (status=updated)
    /// - Err(ApiError::NotFound): 记录不存在
    pub fn update_quantity(
        &self,
        record_id: &str,
        quantity: i64,
        now: NaiveDateTime,
    ) -> ApiResult<ProductionRecord> {
        let change = RecordChange::quantity_update(quantity, t("operation.updated"), now);
        let record = self
            .record_repo
            .apply_change(record_id, &change)?
            .ok_or_else(|| ApiError::NotFound(format!("记录(id={})不存在", record_id)))?;

        info!(record_id, quantity, "修改生产记录数量");
        Ok(record)
    }

    /// 软删除记录
    ///
    /// # 返回
    /// - Ok(ProductionRecord): 覆写后的记录 (status=deleted, 数量保留)
    /// - Err(ApiError::NotFound): 记录不存在
    pub fn delete_record(&self, record_id: &str, now: NaiveDateTime) -> ApiResult<ProductionRecord> {
        let change = RecordChange::soft_delete(t("operation.deleted"), now);
        let record = self
            .record_repo
            .apply_change(record_id, &change)?
            .ok_or_else(|| ApiError::NotFound(format!("记录(id={})不存在", record_id)))?;

        info!(record_id, band = %record.band, "软删除生产记录");
        Ok(record)
    }

    /// 全部记录 (含已删除), 新的在前
    pub fn list_records(&self) -> ApiResult<Vec<ProductionRecord>> {
        Ok(self.record_repo.find_recent(None)?)
    }

    /// 最近 limit 条记录 (含已删除), 新的在前
    pub fn recent_records(&self, limit: usize) -> ApiResult<Vec<ProductionRecord>> {
        Ok(self.record_repo.find_recent(Some(limit))?)
    }
}
