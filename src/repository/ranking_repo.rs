// ==========================================
// 缝纫车间生产看板 - 月度排行数据仓储
// ==========================================
// 对齐: monthly_rankings 表
// 红线: 按月整批替换（同一事务内 DELETE + INSERT）
// ==========================================

use crate::db::{format_timestamp, parse_timestamp};
use crate::domain::ranking::MonthlyRanking;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

// ==========================================
// MonthlyRankingRepository - 月度排行仓储
// ==========================================

/// 月度排行仓储
/// 职责: 月度快照的原子替换与查询
pub struct MonthlyRankingRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MonthlyRankingRepository {
    /// 从共享连接创建仓储实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 替换指定月份的排行快照
    ///
    /// # 参数
    /// - month: 月份键 YYYY-MM
    /// - rankings: 新快照（名次须为 1..N 连续）
    ///
    /// # 返回
    /// - Ok(usize): 写入的行数
    ///
    /// # 说明
    /// - 删除与插入在同一事务中提交，失败时整体回滚
    pub fn replace_month(&self, month: &str, rankings: &[MonthlyRanking]) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        tx.execute("DELETE FROM monthly_rankings WHERE month = ?1", params![month])?;

        let mut count = 0;
        for ranking in rankings {
            if ranking.month != month {
                return Err(RepositoryError::FieldValueError {
                    field: "month".to_string(),
                    message: format!("快照月份不一致: {} != {}", ranking.month, month),
                });
            }

            tx.execute(
                r#"
                INSERT INTO monthly_rankings (month, rank, band, total_quantity, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![
                    ranking.month,
                    ranking.rank,
                    ranking.band,
                    ranking.total_quantity,
                    format_timestamp(ranking.created_at),
                ],
            )?;
            count += 1;
        }

        tx.commit()
            .map_err(|e| RepositoryError::TransactionError(e.to_string()))?;
        Ok(count)
    }

    /// 查询指定月份的排行快照（按名次升序）
    pub fn find_by_month(&self, month: &str) -> RepositoryResult<Vec<MonthlyRanking>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT month, rank, band, total_quantity, created_at
            FROM monthly_rankings
            WHERE month = ?1
            ORDER BY rank
            "#,
        )?;

        let rankings = stmt
            .query_map(params![month], |row| {
                let created_at_str: String = row.get(4)?;
                let created_at = parse_timestamp(&created_at_str).map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e))
                })?;

                Ok(MonthlyRanking {
                    month: row.get(0)?,
                    rank: row.get(1)?,
                    band: row.get(2)?,
                    total_quantity: row.get(3)?,
                    created_at,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(rankings)
    }
}
