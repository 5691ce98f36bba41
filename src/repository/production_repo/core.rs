use crate::db::{format_timestamp, parse_timestamp};
use crate::domain::production::{ProductionRecord, RecordChange};
use crate::domain::types::RecordStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// ProductionRecordRepository - 生产记录仓储
// ==========================================

/// 生产记录仓储
/// 职责: 管理 production_records 表的写入与查询
pub struct ProductionRecordRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProductionRecordRepository {
    /// 从共享连接创建仓储实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    pub(super) fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 写入操作
    // ==========================================

    /// 插入新记录
    pub fn insert(&self, record: &ProductionRecord) -> RepositoryResult<String> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"
            INSERT INTO production_records (
                record_id, band, quantity, status, operation,
                op_date, op_time, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                record.id,
                record.band,
                record.quantity,
                record.status.as_str(),
                record.operation,
                record.date,
                record.time,
                format_timestamp(record.created_at),
            ],
        )?;

        Ok(record.id.clone())
    }

    /// 覆写记录字段并迁移状态
    ///
    /// # 返回
    /// - Ok(Some(ProductionRecord)): 覆写后的记录
    /// - Ok(None): 记录不存在
    pub fn apply_change(
        &self,
        record_id: &str,
        change: &RecordChange,
    ) -> RepositoryResult<Option<ProductionRecord>> {
        let conn = self.get_conn()?;

        let affected = conn.execute(
            r#"
            UPDATE production_records
            SET quantity = COALESCE(?1, quantity),
                status = ?2,
                operation = ?3,
                op_date = ?4,
                op_time = ?5
            WHERE record_id = ?6
            "#,
            params![
                change.quantity,
                change.status.as_str(),
                change.operation,
                change.date,
                change.time,
                record_id,
            ],
        )?;

        if affected == 0 {
            return Ok(None);
        }

        Self::find_by_id_with(&conn, record_id)
    }

    // ==========================================
    // 行映射
    // ==========================================

    pub(super) fn map_row(row: &Row) -> rusqlite::Result<ProductionRecord> {
        let status_str: String = row.get(3)?;
        let status = RecordStatus::from_str(&status_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                3,
                Type::Text,
                Box::new(RepositoryError::FieldValueError {
                    field: "status".to_string(),
                    message: status_str.clone(),
                }),
            )
        })?;

        let created_at_str: String = row.get(7)?;
        let created_at = parse_timestamp(&created_at_str).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(7, Type::Text, Box::new(e))
        })?;

        Ok(ProductionRecord {
            id: row.get(0)?,
            band: row.get(1)?,
            quantity: row.get(2)?,
            status,
            operation: row.get(4)?,
            date: row.get(5)?,
            time: row.get(6)?,
            created_at,
        })
    }
}
