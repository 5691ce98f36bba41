use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::i18n::t;
use crate::perf::PerfGuard;

// ==========================================
// 公共工具：响应信封、错误映射、请求体解析
// ==========================================

/// 统一响应信封 `{ success, message?, ...body }`
#[derive(Debug, Serialize)]
pub(super) struct Envelope<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub body: T,
}

/// `{ data: ... }` 载荷
#[derive(Debug, Serialize)]
pub(super) struct DataBody<T: Serialize> {
    pub data: T,
}

/// 空载荷
#[derive(Debug, Serialize)]
pub(super) struct NoBody {}

/// 成功响应
pub(super) fn ok<T: Serialize>(message: Option<String>, body: T) -> Json<Envelope<T>> {
    Json(Envelope {
        success: true,
        message,
        body,
    })
}

/// 成功响应 (带 data 字段)
pub(super) fn ok_data<T: Serialize>(
    message: Option<String>,
    data: T,
) -> Json<Envelope<DataBody<T>>> {
    ok(message, DataBody { data })
}

fn failure_response(status: StatusCode, message: String) -> Response {
    (
        status,
        Json(Envelope {
            success: false,
            message: Some(message),
            body: NoBody {},
        }),
    )
        .into_response()
}

// ==========================================
// HttpError - 处理器错误
// ==========================================
// 记录不存在 → 404 + common.not_found
// 其他错误   → 500 + 各操作固定文案
// 错误详情只写日志
#[derive(Debug)]
pub struct HttpError {
    source: ApiError,
    failure_key: &'static str,
}

impl HttpError {
    pub fn new(source: ApiError, failure_key: &'static str) -> Self {
        Self {
            source,
            failure_key,
        }
    }

    pub fn status(&self) -> StatusCode {
        if self.source.is_not_found() {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::NOT_FOUND {
            tracing::warn!(error = %self.source, "请求的记录不存在");
            failure_response(status, t("common.not_found"))
        } else {
            tracing::error!(error = %self.source, key = self.failure_key, "请求处理失败");
            failure_response(status, t(self.failure_key))
        }
    }
}

/// 生成错误映射闭包
pub(super) fn fail(failure_key: &'static str) -> impl Fn(ApiError) -> HttpError {
    move |err| HttpError::new(err, failure_key)
}

/// 在阻塞线程池中执行同步 API 调用
///
/// 仓储层持有 rusqlite 连接锁, 不能占用 async 工作线程;
/// `PerfGuard` 的 SQL 计数是线程局部的, 须在阻塞线程内创建
pub(super) async fn run_blocking<T, F>(op: &'static str, task: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let _perf = PerfGuard::new(op);
        task()
    })
    .await
    .map_err(|e| ApiError::TaskFailed(e.to_string()))?
}

// ==========================================
// JsonOrForm - 请求体提取器
// ==========================================
// application/x-www-form-urlencoded → 表单
// 其他 → 按 JSON 解析 (不要求 Content-Type)
// 空请求体 → T::default()
pub struct JsonOrForm<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonOrForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default + Send,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.starts_with("application/x-www-form-urlencoded"))
            .unwrap_or(false);

        if is_form {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|e| bad_request(e.body_text()))?;
            return Ok(JsonOrForm(value));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| bad_request(e.body_text()))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(JsonOrForm(T::default()));
        }

        serde_json::from_slice(&bytes)
            .map(JsonOrForm)
            .map_err(|e| bad_request(e.to_string()))
    }
}

fn bad_request(detail: String) -> Response {
    tracing::warn!(detail = %detail, "请求体解析失败");
    failure_response(StatusCode::BAD_REQUEST, t("common.invalid_request"))
}
