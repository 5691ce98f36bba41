// ==========================================
// 缝纫车间生产看板 - 配置层
// ==========================================
// 职责: 进程配置（环境变量）+ 运行期参数（config_kv）+ 站点表
// ==========================================

pub mod app_config;
pub mod config_manager;
pub mod stations;

// 重导出核心配置
pub use app_config::{get_default_db_path, AppConfig};
pub use config_manager::{config_keys, ConfigManager};
pub use stations::{is_sewing_band, StationSpec, StationTable, IRONING_STATION, PACKAGING_STATION};
