use super::core::ProductionRecordRepository;
use crate::db::format_timestamp;
use crate::domain::production::{BandTotal, DailyTotal, ProductionRecord};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult};

const SELECT_COLUMNS: &str = r#"
    SELECT record_id, band, quantity, status, operation,
           op_date, op_time, created_at
    FROM production_records
"#;

impl ProductionRecordRepository {
    // ==========================================
    // 查询操作
    // ==========================================

    /// 按 record_id 查询单条记录（含已软删除）
    pub fn find_by_id(&self, record_id: &str) -> RepositoryResult<Option<ProductionRecord>> {
        let conn = self.get_conn()?;
        Self::find_by_id_with(&conn, record_id)
    }

    pub(super) fn find_by_id_with(
        conn: &Connection,
        record_id: &str,
    ) -> RepositoryResult<Option<ProductionRecord>> {
        let sql = format!("{SELECT_COLUMNS} WHERE record_id = ?1");
        let record = conn
            .query_row(&sql, params![record_id], Self::map_row)
            .optional()?;
        Ok(record)
    }

    /// 按创建时间倒序查询记录（含已软删除）
    ///
    /// # 参数
    /// - limit: 最多返回条数，None 表示全部
    pub fn find_recent(&self, limit: Option<usize>) -> RepositoryResult<Vec<ProductionRecord>> {
        let conn = self.get_conn()?;

        // SQLite 中 LIMIT -1 表示不限制
        let limit = limit.map(|l| l as i64).unwrap_or(-1);
        let sql = format!("{SELECT_COLUMNS} ORDER BY created_at DESC, rowid DESC LIMIT ?1");

        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map(params![limit], Self::map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(records)
    }

    /// 记录总数（含已软删除）
    pub fn count_all(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM production_records", [], |row| row.get(0))?;
        Ok(count)
    }

    // ==========================================
    // 汇总查询
    // ==========================================

    /// 按站点汇总数量（排除 deleted）
    ///
    /// # 参数
    /// - since: 创建时间下界（含），None 表示全部历史
    ///
    /// # 返回
    /// 只包含有记录的站点，按站点标识排序
    pub fn sum_by_band(&self, since: Option<NaiveDateTime>) -> RepositoryResult<Vec<BandTotal>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT band, COALESCE(SUM(quantity), 0)
            FROM production_records
            WHERE status != 'deleted'
              AND (?1 IS NULL OR created_at >= ?1)
            GROUP BY band
            ORDER BY band
            "#,
        )?;

        let totals = stmt
            .query_map(params![since.map(format_timestamp)], |row| {
                Ok(BandTotal {
                    band: row.get(0)?,
                    total_quantity: row.get(1)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(totals)
    }

    /// 按自然日汇总数量与记录数（排除 deleted）
    ///
    /// # 参数
    /// - since: 创建时间下界（含）
    ///
    /// # 返回
    /// 按日期升序
    pub fn daily_totals(&self, since: NaiveDateTime) -> RepositoryResult<Vec<DailyTotal>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT substr(created_at, 1, 10) AS day,
                   COALESCE(SUM(quantity), 0),
                   COUNT(*)
            FROM production_records
            WHERE status != 'deleted'
              AND created_at >= ?1
            GROUP BY day
            ORDER BY day
            "#,
        )?;

        let rows = stmt
            .query_map(params![format_timestamp(since)], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, i64>(2)?,
                ))
            })?
            .collect::<SqliteResult<Vec<_>>>()?;

        rows.into_iter()
            .map(|(day, total_quantity, record_count)| {
                let day = NaiveDate::parse_from_str(&day, "%Y-%m-%d").map_err(|e| {
                    RepositoryError::FieldValueError {
                        field: "created_at".to_string(),
                        message: e.to_string(),
                    }
                })?;
                Ok(DailyTotal {
                    day,
                    total_quantity,
                    record_count,
                })
            })
            .collect()
    }
}
