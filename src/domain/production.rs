// ==========================================
// 缝纫车间生产看板 - 生产记录领域模型
// ==========================================
// 红线: 记录只做字段覆写 + 状态迁移, 不保留历史版本
// 对齐: production_records 表
// ==========================================

use crate::domain::calendar::{record_stamp, to_stored_precision};
use crate::domain::types::RecordStatus;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// ProductionRecord - 生产记录
// ==========================================
// JSON 字段名与看板前端保持一致 (_id / createdAt)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionRecord {
    #[serde(rename = "_id")]
    pub id: String,                // 记录ID (UUID)
    pub band: String,              // 站点标识 (不做枚举校验)
    pub quantity: i64,             // 数量
    pub status: RecordStatus,      // 记录状态
    pub operation: String,         // 最近一次操作的说明
    pub date: String,              // 最近一次操作的日期 dd/mm/yyyy
    pub time: String,              // 最近一次操作的时间 HH:MM
    #[serde(rename = "createdAt")]
    pub created_at: NaiveDateTime, // 创建时间 (只写一次)
}

impl ProductionRecord {
    /// 创建一条状态为 added 的新记录
    ///
    /// # 参数
    /// - `band`: 站点标识
    /// - `quantity`: 数量
    /// - `operation`: 操作说明 (已本地化)
    /// - `now`: 当前本地时间
    pub fn new_added(band: String, quantity: i64, operation: String, now: NaiveDateTime) -> Self {
        let (date, time) = record_stamp(now);
        Self {
            id: Uuid::new_v4().to_string(),
            band,
            quantity,
            status: RecordStatus::Added,
            operation,
            date,
            time,
            created_at: to_stored_precision(now),
        }
    }

    /// 是否计入统计
    pub fn is_counted(&self) -> bool {
        self.status.is_counted()
    }
}

// ==========================================
// RecordChange - 记录覆写内容
// ==========================================
// 用途: update / delete 时一次性覆写的字段集合
#[derive(Debug, Clone)]
pub struct RecordChange {
    pub quantity: Option<i64>, // None 表示数量不变 (删除)
    pub status: RecordStatus,
    pub operation: String,
    pub date: String,
    pub time: String,
}

impl RecordChange {
    /// 修改数量
    pub fn quantity_update(quantity: i64, operation: String, now: NaiveDateTime) -> Self {
        let (date, time) = record_stamp(now);
        Self {
            quantity: Some(quantity),
            status: RecordStatus::Updated,
            operation,
            date,
            time,
        }
    }

    /// 软删除
    pub fn soft_delete(operation: String, now: NaiveDateTime) -> Self {
        let (date, time) = record_stamp(now);
        Self {
            quantity: None,
            status: RecordStatus::Deleted,
            operation,
            date,
            time,
        }
    }
}

// ==========================================
// 汇总读模型
// ==========================================

/// 单站点累计数量（SUM ... GROUP BY band）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BandTotal {
    pub band: String,
    pub total_quantity: i64,
}

/// 单日累计（按创建日期分组）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTotal {
    pub day: chrono::NaiveDate,
    pub total_quantity: i64,
    pub record_count: i64,
}
