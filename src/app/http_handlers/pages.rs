use axum::extract::State;
use axum::response::{Html, Redirect};

use crate::api::dto::{DatabaseOverview, GrafikOverview};
use crate::api::production_api::USER_PAGE_LIMIT;
use crate::app::state::AppState;
use crate::app::views;
use crate::domain::calendar::{local_now, month_key};

use super::common::run_blocking;

// ==========================================
// 页面
// ==========================================
// 读取失败时记录日志并渲染空页面, 不返回错误状态码

/// GET / → /user
pub async fn root() -> Redirect {
    Redirect::to("/user")
}

/// GET /user
pub async fn user_page(State(state): State<AppState>) -> Html<String> {
    let api = state.production_api.clone();
    let records = run_blocking("http.user_page", move || api.recent_records(USER_PAGE_LIMIT))
        .await
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "加载最近记录失败");
            Vec::new()
        });

    Html(views::render_user_page(
        &records,
        state.dashboard_api.aggregator().stations(),
    ))
}

/// GET /grafik
pub async fn grafik_page(State(state): State<AppState>) -> Html<String> {
    let now = local_now();

    let api = state.dashboard_api.clone();
    let overview = run_blocking("http.grafik_page", move || api.grafik_overview(now))
        .await
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "加载图表数据失败");
            GrafikOverview::empty(&month_key(now.date()))
        });

    Html(views::render_grafik_page(&overview))
}

/// GET /database
pub async fn database_page(State(state): State<AppState>) -> Html<String> {
    let api = state.dashboard_api.clone();
    let overview = run_blocking("http.database_page", move || api.database_overview(local_now()))
        .await
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "加载记录表失败");
            DatabaseOverview::empty()
        });

    Html(views::render_database_page(&overview))
}
