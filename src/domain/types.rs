// ==========================================
// 缝纫车间生产看板 - 领域类型定义
// ==========================================
// 记录状态: added / updated / deleted (软删除标记)
// 站点类型: 缝纫 / 熨烫 / 包装
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 记录状态 (Record Status)
// ==========================================
// 红线: 记录永不物理删除, deleted 仅为状态标记
// 序列化格式: lowercase (与数据库一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Added,   // 新增
    Updated, // 已修改数量
    Deleted, // 已软删除
}

impl RecordStatus {
    /// 转换为字符串 (用于数据库存储)
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Added => "added",
            RecordStatus::Updated => "updated",
            RecordStatus::Deleted => "deleted",
        }
    }

    /// 从字符串解析
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "added" => Some(RecordStatus::Added),
            "updated" => Some(RecordStatus::Updated),
            "deleted" => Some(RecordStatus::Deleted),
            _ => None,
        }
    }

    /// 是否计入汇总
    pub fn is_counted(&self) -> bool {
        !matches!(self, RecordStatus::Deleted)
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 站点类型 (Station Kind)
// ==========================================
// 14 个缝纫站 + 2 个后整站 (熨烫、包装)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StationKind {
    Sewing,    // 缝纫
    Ironing,   // 熨烫
    Packaging, // 包装
}

impl StationKind {
    /// 对外展示的类型标签 (图表 JSON 的 type 字段)
    pub fn label(&self) -> &'static str {
        match self {
            StationKind::Sewing => "tikuv",
            StationKind::Ironing => "dazmol",
            StationKind::Packaging => "upakovka",
        }
    }
}

impl fmt::Display for StationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
