// ==========================================
// 缝纫车间生产看板 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换Repository错误
// 说明: 错误详情只进服务端日志, 客户端只看到固定的本地化文案
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    // ==========================================
    // 运行时错误
    // ==========================================
    /// 阻塞任务 panic 或被取消
    #[error("任务执行失败: {0}")]
    TaskFailed(String),
}

impl ApiError {
    /// 是否为"记录不存在"
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
// 仓储错误一律视为数据访问失败, 原始信息保留在消息里
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        ApiError::DatabaseError(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
