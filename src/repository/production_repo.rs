// ==========================================
// 缝纫车间生产看板 - 生产记录数据仓储
// ==========================================
// 对齐: production_records 表
// 红线: 只做软删除（status = deleted），不执行 DELETE
// ==========================================

mod core;
mod queries;


pub use self::core::ProductionRecordRepository;
