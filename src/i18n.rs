// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持乌兹别克语（默认）和英文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

/// 已提供翻译的语言
pub const SUPPORTED_LOCALES: [&str; 2] = ["uz", "en"];

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"uz" 或 "en"）, 不支持的代码回退为 "uz"
pub fn set_locale(locale: &str) {
    if SUPPORTED_LOCALES.contains(&locale) {
        rust_i18n::set_locale(locale);
    } else {
        tracing::warn!(locale, "不支持的语言, 使用 uz");
        rust_i18n::set_locale(SUPPORTED_LOCALES[0]);
    }
}

/// 翻译消息（无参数）
///
/// # 示例
/// ```no_run
/// use sewing_tracker::i18n::t;
/// let msg = t("api.add_success");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

// rust-i18n 的 locale 为全局状态，且 Rust 测试默认并行执行；
// 切换 locale 的测试需持有此锁。
#[cfg(test)]
pub(crate) static LOCALE_TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
