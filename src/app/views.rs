// ==========================================
// 缝纫车间生产看板 - 服务端页面
// ==========================================
// /user     录入 + 最近记录
// /grafik   今日站点图表 + 本月统计 + 本月排行
// /database 记录表 + 本月逐日汇总
// 所有动态文本必须经过 escape_html; 嵌入脚本的 JSON 必须经过 json_for_script
// ==========================================

use std::fmt::Write;

use serde::Serialize;

use crate::api::dto::{DatabaseOverview, GrafikOverview};
use crate::config::stations::StationTable;
use crate::domain::calendar::RECORD_DATE_FORMAT;
use crate::domain::production::ProductionRecord;
use crate::engine::aggregator::StationStat;
use crate::i18n::{current_locale, t};

/// HTML 转义
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// 序列化为可直接嵌入 <script> 的 JSON
pub fn json_for_script<T: Serialize>(value: &T) -> String {
    match serde_json::to_string(value) {
        Ok(json) => json.replace("</", "<\\/"),
        Err(e) => {
            tracing::error!(error = %e, "页面数据序列化失败");
            "null".to_string()
        }
    }
}

fn layout(title: &str, body: &str, script: &str) -> String {
    let title = escape_html(title);
    format!(
        "<!doctype html><html lang=\"{lang}\"><head><meta charset=\"utf-8\">\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
<title>{title}</title><link rel=\"stylesheet\" href=\"/css/style.css\"></head><body>\
<nav><a href=\"/user\">{user}</a> | <a href=\"/grafik\">{grafik}</a> | <a href=\"/database\">{database}</a></nav>\
<main><h1>{title}</h1>{body}</main>\
<script>{script}</script></body></html>",
        lang = escape_html(&current_locale()),
        user = escape_html(&t("page.user_title")),
        grafik = escape_html(&t("page.grafik_title")),
        database = escape_html(&t("page.database_title")),
    )
}

fn records_table(records: &[ProductionRecord], with_actions: bool) -> String {
    if records.is_empty() {
        return format!("<p class=\"empty\">{}</p>", escape_html(&t("page.empty")));
    }

    let mut html = String::from("<table class=\"records\"><thead><tr>");
    for key in [
        "page.band",
        "page.quantity",
        "page.status",
        "page.operation",
        "page.date",
        "page.time",
    ] {
        let _ = write!(html, "<th>{}</th>", escape_html(&t(key)));
    }
    if with_actions {
        html.push_str("<th></th>");
    }
    html.push_str("</tr></thead><tbody>");

    for r in records {
        let _ = write!(
            html,
            "<tr class=\"status-{status}\" data-id=\"{id}\"><td>{band}</td><td>{quantity}</td>\
<td>{status}</td><td>{operation}</td><td>{date}</td><td>{time}</td>",
            status = r.status.as_str(),
            id = escape_html(&r.id),
            band = escape_html(&r.band),
            quantity = r.quantity,
            operation = escape_html(&r.operation),
            date = escape_html(&r.date),
            time = escape_html(&r.time),
        );
        if with_actions {
            if r.is_counted() {
                let _ = write!(
                    html,
                    "<td><button class=\"edit\" data-id=\"{id}\">{edit}</button> \
<button class=\"delete\" data-id=\"{id}\">{delete}</button></td>",
                    id = escape_html(&r.id),
                    edit = escape_html(&t("page.edit")),
                    delete = escape_html(&t("page.delete")),
                );
            } else {
                html.push_str("<td></td>");
            }
        }
        html.push_str("</tr>");
    }

    html.push_str("</tbody></table>");
    html
}

fn station_bars(stats: &[StationStat]) -> String {
    let mut html = String::from("<div class=\"chart\">");
    for s in stats {
        // 百分比上限 150, 对应满宽
        let width = (s.percentage.clamp(0, 150) as f64 / 1.5).round();
        let _ = write!(
            html,
            "<div class=\"bar-row\" data-band=\"{band}\"><span class=\"label\">{band}</span>\
<div class=\"bar\"><div class=\"fill\" style=\"width:{width}%;background:{color}\"></div></div>\
<span class=\"value\">{quantity} / {target} ({percentage}%)</span></div>",
            band = escape_html(&s.band),
            width = width,
            color = escape_html(&s.color),
            quantity = s.quantity,
            target = s.target,
            percentage = s.percentage,
        );
    }
    html.push_str("</div>");
    html
}

// ==========================================
// /user
// ==========================================

const USER_SCRIPT: &str = r#"
const send = (method, url, body) => fetch(url, {
  method, headers: { "Content-Type": "application/json" },
  body: body ? JSON.stringify(body) : undefined,
}).then(r => r.json()).then(res => { if (!res.success) alert(res.message); location.reload(); });
document.getElementById("add-form").addEventListener("submit", e => {
  e.preventDefault();
  const f = e.target;
  send("POST", "/api/add", { band: f.band.value, quantity: f.quantity.value });
});
document.querySelectorAll("button.edit").forEach(b => b.addEventListener("click", () => {
  const q = prompt(PAGE.quantityLabel);
  if (q !== null && q !== "") send("PUT", "/api/update/" + b.dataset.id, { quantity: q });
}));
document.querySelectorAll("button.delete").forEach(b => b.addEventListener("click", () => {
  if (confirm(PAGE.confirmDelete)) send("DELETE", "/api/delete/" + b.dataset.id);
}));
"#;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UserPageLabels {
    quantity_label: String,
    confirm_delete: String,
}

/// 渲染 /user 页面
pub fn render_user_page(records: &[ProductionRecord], stations: &StationTable) -> String {
    let mut options = String::new();
    for spec in stations.iter() {
        let _ = write!(
            options,
            "<option value=\"{id}\">{id}</option>",
            id = escape_html(&spec.id)
        );
    }

    let body = format!(
        "<form id=\"add-form\"><label>{band} <select name=\"band\">{options}</select></label> \
<label>{quantity} <input name=\"quantity\" type=\"number\" min=\"0\" required></label> \
<button type=\"submit\">{add}</button></form>{table}",
        band = escape_html(&t("page.band")),
        quantity = escape_html(&t("page.quantity")),
        add = escape_html(&t("page.add")),
        table = records_table(records, true),
    );

    let labels = UserPageLabels {
        quantity_label: t("page.quantity"),
        confirm_delete: t("page.confirm_delete"),
    };
    let script = format!("const PAGE = {};{}", json_for_script(&labels), USER_SCRIPT);

    layout(&t("page.user_title"), &body, &script)
}

// ==========================================
// /grafik
// ==========================================

const GRAFIK_SCRIPT: &str = r#"
setInterval(() => fetch("/api/grafik-data?period=today").then(r => r.json()).then(res => {
  if (!res.success) return;
  res.chartData.forEach(s => {
    const row = document.querySelector('.bar-row[data-band="' + CSS.escape(s.band) + '"]');
    if (!row) return;
    row.querySelector(".fill").style.width = Math.round(Math.min(150, Math.max(0, s.percentage)) / 1.5) + "%";
    row.querySelector(".value").textContent = s.quantity + " / " + s.target + " (" + s.percentage + "%)";
  });
  document.getElementById("total-all").textContent = res.totalAll;
}), 30000);
"#;

/// 渲染 /grafik 页面
pub fn render_grafik_page(overview: &GrafikOverview) -> String {
    let today = &overview.today;
    let stats = &overview.monthly_stats;

    let mut ranking_rows = String::new();
    for r in &overview.rankings {
        let _ = write!(
            ranking_rows,
            "<tr><td>{rank}</td><td>{band}</td><td>{total}</td></tr>",
            rank = r.rank,
            band = escape_html(&r.band),
            total = r.total_quantity,
        );
    }
    let rankings = if ranking_rows.is_empty() {
        format!("<p class=\"empty\">{}</p>", escape_html(&t("page.empty")))
    } else {
        format!(
            "<table class=\"rankings\"><thead><tr><th>{}</th><th>{}</th><th>{}</th></tr></thead>\
<tbody>{}</tbody></table>",
            escape_html(&t("page.rank")),
            escape_html(&t("page.band")),
            escape_html(&t("page.quantity")),
            ranking_rows
        )
    };

    let body = format!(
        "<section class=\"summary\"><p>{total_label}: <strong id=\"total-all\">{total}</strong></p>\
<p>{max_label}: <strong>{max_band}</strong> ({max_quantity})</p></section>\
{bars}\
<section class=\"monthly\"><h2>{monthly_label} ({month})</h2><ul>\
<li>{total_label}: {month_total}</li><li>{active_label}: {active_days}</li>\
<li>{avg_label}: {daily_average}</li><li>{max_label}: {best_band} ({best_quantity})</li></ul></section>\
<section class=\"ranking\"><h2>{rankings_label}</h2>{rankings}</section>",
        total_label = escape_html(&t("page.total")),
        total = today.total_all,
        max_label = escape_html(&t("page.max_band")),
        max_band = escape_html(&today.max_band.band),
        max_quantity = today.max_band.quantity,
        bars = station_bars(&today.chart_data),
        monthly_label = escape_html(&t("page.monthly_stats")),
        month = escape_html(&stats.month),
        month_total = stats.total_quantity,
        active_label = escape_html(&t("page.active_days")),
        active_days = stats.active_days,
        avg_label = escape_html(&t("page.daily_average")),
        daily_average = stats.daily_average,
        best_band = escape_html(&stats.best_station.band),
        best_quantity = stats.best_station.quantity,
        rankings_label = escape_html(&t("page.rankings")),
        rankings = rankings,
    );

    layout(&t("page.grafik_title"), &body, GRAFIK_SCRIPT)
}

// ==========================================
// /database
// ==========================================

/// 渲染 /database 页面
pub fn render_database_page(overview: &DatabaseOverview) -> String {
    let mut rollup = String::new();
    for d in &overview.daily_rollup {
        let _ = write!(
            rollup,
            "<tr><td>{day}</td><td>{total}</td><td>{count}</td></tr>",
            day = d.day.format(RECORD_DATE_FORMAT),
            total = d.total_quantity,
            count = d.record_count,
        );
    }
    let rollup = if rollup.is_empty() {
        format!("<p class=\"empty\">{}</p>", escape_html(&t("page.empty")))
    } else {
        format!(
            "<table class=\"rollup\"><thead><tr><th>{}</th><th>{}</th><th>{}</th></tr></thead>\
<tbody>{}</tbody></table>",
            escape_html(&t("page.date")),
            escape_html(&t("page.total")),
            escape_html(&t("page.records")),
            rollup
        )
    };

    let body = format!(
        "<p>{records_label}: {total_records}</p>{table}\
<section class=\"rollup\"><h2>{rollup_label}</h2>{rollup}</section>",
        records_label = escape_html(&t("page.records")),
        total_records = overview.total_records,
        table = records_table(&overview.records, false),
        rollup_label = escape_html(&t("page.daily_rollup")),
        rollup = rollup,
    );

    layout(&t("page.database_title"), &body, "")
}
