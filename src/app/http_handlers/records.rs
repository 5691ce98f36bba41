use axum::extract::{Path, State};
use axum::response::IntoResponse;

use crate::api::dto::{AddRecordRequest, UpdateQuantityRequest};
use crate::api::error::ApiError;
use crate::api::parse_quantity;
use crate::app::state::AppState;
use crate::domain::calendar::local_now;
use crate::i18n::t;

use super::common::{fail, ok_data, run_blocking, HttpError, JsonOrForm};

// ==========================================
// 生产记录相关接口
// ==========================================

/// POST /api/add
///
/// # 请求体
/// - band: 站点标识 (缺省存为空串)
/// - quantity: 数量 (数字或数字字符串)
pub async fn add_record(
    State(state): State<AppState>,
    JsonOrForm(req): JsonOrForm<AddRecordRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let fail = fail("api.add_failed");

    let band = req.band.unwrap_or_default();
    let quantity = req
        .quantity
        .ok_or_else(|| ApiError::InvalidInput("缺少 quantity".to_string()))
        .and_then(|v| parse_quantity(&v))
        .map_err(&fail)?;

    let api = state.production_api.clone();
    let record = run_blocking("http.add_record", move || {
        api.add_record(&band, quantity, local_now())
    })
    .await
    .map_err(&fail)?;

    Ok(ok_data(Some(t("api.add_success")), record))
}

/// PUT /api/update/:id
pub async fn update_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonOrForm(req): JsonOrForm<UpdateQuantityRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let fail = fail("api.update_failed");

    let quantity = req
        .quantity
        .ok_or_else(|| ApiError::InvalidInput("缺少 quantity".to_string()))
        .and_then(|v| parse_quantity(&v))
        .map_err(&fail)?;

    let api = state.production_api.clone();
    let record = run_blocking("http.update_record", move || {
        api.update_quantity(&id, quantity, local_now())
    })
    .await
    .map_err(&fail)?;

    Ok(ok_data(Some(t("api.update_success")), record))
}

/// DELETE /api/delete/:id
///
/// 软删除: 记录保留, 状态改为 deleted
pub async fn delete_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    let api = state.production_api.clone();
    let record = run_blocking("http.delete_record", move || api.delete_record(&id, local_now()))
        .await
        .map_err(fail("api.delete_failed"))?;

    Ok(ok_data(Some(t("api.delete_success")), record))
}

/// GET /api/data
///
/// 全部记录 (含已删除), 新的在前
pub async fn list_records(State(state): State<AppState>) -> Result<impl IntoResponse, HttpError> {
    let api = state.production_api.clone();
    let records = run_blocking("http.list_records", move || api.list_records())
        .await
        .map_err(fail("api.data_failed"))?;

    Ok(ok_data(None, records))
}
