// ==========================================
// 缝纫车间生产看板 - 站点配置表
// ==========================================
// 职责: 唯一的站点清单（标识、类型、日目标、颜色）
// 红线: HTML 页面与 JSON 接口必须共用本表，禁止各自维护副本
// ==========================================

use crate::domain::types::StationKind;
use once_cell::sync::Lazy;
use regex::Regex;

/// 熨烫站标识
pub const IRONING_STATION: &str = "Dazmol bandi";

/// 包装站标识
pub const PACKAGING_STATION: &str = "Upakovka bandi";

/// 缝纫站数量
pub const SEWING_STATION_COUNT: usize = 14;

/// 缝纫站默认日目标
pub const DEFAULT_SEWING_TARGET: i64 = 1000;

/// 后整站（熨烫/包装）默认日目标
pub const DEFAULT_FINISHING_TARGET: i64 = 500;

/// 缝纫站调色板（按序号循环取色）
pub const SEWING_PALETTE: [&str; 14] = [
    "#5EB344", "#FCB72A", "#F8821A", "#E0393E", "#963D97", "#069CDB", "#2A9D8F",
    "#457B9D", "#E9C46A", "#F4A261", "#E76F51", "#264653", "#2A9D8F", "#E63946",
];

/// 熨烫站固定颜色
pub const IRONING_COLOR: &str = "#A8DADC";

/// 包装站固定颜色
pub const PACKAGING_COLOR: &str = "#1D3557";

// 缝纫站标识规则: 数字前缀 + "-band"
static SEWING_BAND_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+-band$").expect("sewing band pattern"));

// ==========================================
// StationSpec - 单个站点配置
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct StationSpec {
    pub id: String,         // 站点标识
    pub kind: StationKind,  // 站点类型
    pub daily_target: i64,  // 日目标数量
    pub color: String,      // 图表颜色
}

// ==========================================
// StationTable - 站点配置表
// ==========================================
#[derive(Debug, Clone)]
pub struct StationTable {
    stations: Vec<StationSpec>,
}

impl StationTable {
    /// 标准 16 站配置（默认日目标）
    pub fn standard() -> Self {
        Self::with_targets(DEFAULT_SEWING_TARGET, DEFAULT_FINISHING_TARGET)
    }

    /// 使用指定日目标构建 16 站配置
    ///
    /// # 参数
    /// - `sewing_target`: 缝纫站日目标
    /// - `finishing_target`: 熨烫/包装站日目标
    pub fn with_targets(sewing_target: i64, finishing_target: i64) -> Self {
        let mut stations: Vec<StationSpec> = (1..=SEWING_STATION_COUNT)
            .map(|n| StationSpec {
                id: format!("{}-band", n),
                kind: StationKind::Sewing,
                daily_target: sewing_target,
                color: SEWING_PALETTE[(n - 1) % SEWING_PALETTE.len()].to_string(),
            })
            .collect();

        stations.push(StationSpec {
            id: IRONING_STATION.to_string(),
            kind: StationKind::Ironing,
            daily_target: finishing_target,
            color: IRONING_COLOR.to_string(),
        });
        stations.push(StationSpec {
            id: PACKAGING_STATION.to_string(),
            kind: StationKind::Packaging,
            daily_target: finishing_target,
            color: PACKAGING_COLOR.to_string(),
        });

        Self { stations }
    }

    /// 按固定顺序遍历站点
    pub fn iter(&self) -> impl Iterator<Item = &StationSpec> {
        self.stations.iter()
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// 按标识查找站点
    pub fn get(&self, band: &str) -> Option<&StationSpec> {
        self.stations.iter().find(|s| s.id == band)
    }
}

impl Default for StationTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// 是否为可参与排行的缝纫站
///
/// 规则: 标识匹配 `^\d+-band$` 且不是熨烫/包装站
pub fn is_sewing_band(band: &str) -> bool {
    band != IRONING_STATION && band != PACKAGING_STATION && SEWING_BAND_PATTERN.is_match(band)
}

/// 缝纫站序号（用于同量排序）
pub fn sewing_band_number(band: &str) -> Option<u32> {
    band.strip_suffix("-band")?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_layout() {
        let table = StationTable::standard();
        assert_eq!(table.len(), 16);

        let ids: Vec<&str> = table.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids[0], "1-band");
        assert_eq!(ids[13], "14-band");
        assert_eq!(ids[14], IRONING_STATION);
        assert_eq!(ids[15], PACKAGING_STATION);
    }

    #[test]
    fn test_targets_by_kind() {
        let table = StationTable::standard();
        assert_eq!(table.get("7-band").unwrap().daily_target, 1000);
        assert_eq!(table.get(IRONING_STATION).unwrap().daily_target, 500);
        assert_eq!(table.get(PACKAGING_STATION).unwrap().daily_target, 500);
        assert!(table.get("15-band").is_none());
    }

    #[test]
    fn test_colors_are_fixed_for_finishing_stations() {
        let table = StationTable::standard();
        assert_eq!(table.get("1-band").unwrap().color, SEWING_PALETTE[0]);
        assert_eq!(table.get("14-band").unwrap().color, SEWING_PALETTE[13]);
        assert_eq!(table.get(IRONING_STATION).unwrap().color, IRONING_COLOR);
        assert_eq!(table.get(PACKAGING_STATION).unwrap().color, PACKAGING_COLOR);
        assert_ne!(IRONING_COLOR, PACKAGING_COLOR);
    }

    #[test]
    fn test_is_sewing_band() {
        assert!(is_sewing_band("1-band"));
        assert!(is_sewing_band("14-band"));
        assert!(is_sewing_band("21-band"));
        assert!(!is_sewing_band(IRONING_STATION));
        assert!(!is_sewing_band(PACKAGING_STATION));
        assert!(!is_sewing_band("band"));
        assert!(!is_sewing_band("x-band"));
    }

    #[test]
    fn test_sewing_band_number() {
        assert_eq!(sewing_band_number("12-band"), Some(12));
        assert_eq!(sewing_band_number(IRONING_STATION), None);
    }
}
