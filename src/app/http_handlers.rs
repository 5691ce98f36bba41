// ==========================================
// 缝纫车间生产看板 - HTTP 处理器（按域拆分）
// ==========================================
// 职责: axum 处理器, 连接 HTTP 请求与 API 层
// ==========================================

mod charts;
mod common;
mod pages;
mod records;

pub use charts::*;
pub use common::{HttpError, JsonOrForm};
pub use pages::*;
pub use records::*;
