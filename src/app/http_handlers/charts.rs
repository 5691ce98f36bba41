use axum::extract::{Query, State};
use axum::response::IntoResponse;

use crate::api::dto::{GrafikQuery, RankingsQuery};
use crate::app::state::AppState;
use crate::domain::calendar::local_now;
use crate::engine::aggregator::TimeWindow;
use crate::i18n::t;

use super::common::{fail, ok, ok_data, run_blocking, HttpError, NoBody};

// ==========================================
// 图表与排行相关接口
// ==========================================

/// GET /api/grafik-data?period=today|month|all
///
/// 未识别的 period 按 today 处理
pub async fn grafik_data(
    State(state): State<AppState>,
    Query(query): Query<GrafikQuery>,
) -> Result<impl IntoResponse, HttpError> {
    let window = query
        .period
        .as_deref()
        .and_then(TimeWindow::parse)
        .unwrap_or_default();

    let api = state.dashboard_api.clone();
    let view = run_blocking("http.grafik_data", move || api.chart_data(window, local_now()))
        .await
        .map_err(fail("api.grafik_failed"))?;

    Ok(ok(None, view))
}

/// POST /api/update-rankings
///
/// 立即重算本月排行, 返回新快照
pub async fn update_rankings(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, HttpError> {
    let api = state.dashboard_api.clone();
    let rankings = run_blocking("http.update_rankings", move || api.update_rankings(local_now()))
        .await
        .map_err(fail("api.rankings_failed"))?;

    Ok(ok_data(Some(t("api.rankings_success")), rankings))
}

/// GET /api/rankings?month=YYYY-MM
pub async fn rankings(
    State(state): State<AppState>,
    Query(query): Query<RankingsQuery>,
) -> Result<impl IntoResponse, HttpError> {
    let api = state.dashboard_api.clone();
    let view = run_blocking("http.rankings", move || {
        api.rankings_for(query.month.as_deref(), local_now())
    })
    .await
    .map_err(fail("api.data_failed"))?;

    Ok(ok_data(None, view))
}

/// GET /healthz
pub async fn healthz() -> impl IntoResponse {
    ok(None, NoBody {})
}
