// ==========================================
// 缝纫车间生产看板 - 仓储层错误类型
// ==========================================
// 覆盖: 连接锁 / 事务 / SQL 执行 / 落库值解析
// ==========================================

use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 共享连接的 Mutex 已中毒
    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    /// 排行快照替换的事务提交失败
    #[error("数据库事务失败: {0}")]
    TransactionError(String),

    #[error("数据库查询失败: {0}")]
    QueryError(String),

    /// 库中的值无法还原为领域类型 (时间戳 / 状态 / 月份键)
    #[error("字段值错误 (field={field}): {message}")]
    FieldValueError { field: String, message: String },
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => RepositoryError::QueryError(msg),
            other => RepositoryError::QueryError(other.to_string()),
        }
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;
