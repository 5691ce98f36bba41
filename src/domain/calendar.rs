// ==========================================
// 缝纫车间生产看板 - 日历工具
// ==========================================
// 所有时间均为服务器本地时间 (NaiveDateTime)
// 统计窗口以自然日 / 自然月为边界
// ==========================================

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, SubsecRound};

/// 记录中 date 字段的格式 (dd/mm/yyyy)
pub const RECORD_DATE_FORMAT: &str = "%d/%m/%Y";

/// 记录中 time 字段的格式 (HH:MM)
pub const RECORD_TIME_FORMAT: &str = "%H:%M";

/// 月份键格式 (YYYY-MM)
pub const MONTH_KEY_FORMAT: &str = "%Y-%m";

/// 服务器本地当前时间
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// 截断到微秒 (与落库的时间戳精度一致)
pub fn to_stored_precision(ts: NaiveDateTime) -> NaiveDateTime {
    ts.trunc_subsecs(6)
}

/// 当日零点
pub fn day_start(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// 当月 1 日零点
pub fn month_start(date: NaiveDate) -> NaiveDateTime {
    day_start(date.with_day(1).unwrap_or(date))
}

/// 月份键, 例如 2026-10
pub fn month_key(date: NaiveDate) -> String {
    date.format(MONTH_KEY_FORMAT).to_string()
}

/// 是否为当月最后一天
pub fn is_last_day_of_month(date: NaiveDate) -> bool {
    (date + Duration::days(1)).month() != date.month()
}

/// 生成记录的 (date, time) 展示字段
pub fn record_stamp(now: NaiveDateTime) -> (String, String) {
    (
        now.format(RECORD_DATE_FORMAT).to_string(),
        now.format(RECORD_TIME_FORMAT).to_string(),
    )
}
