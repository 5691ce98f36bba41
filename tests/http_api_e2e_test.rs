// ==========================================
// HTTP 接口端到端测试
// ==========================================
// 职责: 通过完整路由验证录入、修改、软删除、图表与页面
// 方式: tower::ServiceExt::oneshot 直接驱动 Router, 不监听端口
// 说明: 处理器使用真实本地时间, 断言只依赖"今天"窗口
// ==========================================


#[cfg(test)]
mod http_api_e2e_test {
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use axum::Router;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use sewing_tracker::app::build_router;

    use crate::test_helpers::{setup_app, TestApp};

    // ==========================================
    // 测试辅助函数
    // ==========================================

    fn setup() -> (TestApp, Router) {
        let app = setup_app();
        let router = build_router(app.state.clone());
        (app, router)
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = router
            .clone()
            .oneshot(request)
            .await
            .expect("路由调用失败");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("读取响应体失败")
            .to_bytes();
        (status, bytes.to_vec())
    }

    async fn send_json(router: &Router, method: Method, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let (status, bytes) = send(router, request).await;
        (status, serde_json::from_slice(&bytes).expect("响应不是 JSON"))
    }

    async fn get_json(router: &Router, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let (status, bytes) = send(router, request).await;
        (status, serde_json::from_slice(&bytes).expect("响应不是 JSON"))
    }

    fn station<'a>(chart: &'a Value, band: &str) -> &'a Value {
        chart["chartData"]
            .as_array()
            .expect("chartData 不是数组")
            .iter()
            .find(|s| s["band"] == band)
            .unwrap_or_else(|| panic!("图表中缺少站点 {}", band))
    }

    // ==========================================
    // 测试1: 新增记录 → 今日图表
    // ==========================================

    #[tokio::test]
    async fn test_add_record_reflected_in_today_chart() {
        let (_app, router) = setup();

        let (status, body) = send_json(
            &router,
            Method::POST,
            "/api/add",
            json!({ "band": "1-band", "quantity": 600 }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Ma'lumot muvaffaqiyatli saqlandi");
        assert_eq!(body["data"]["band"], "1-band");
        assert_eq!(body["data"]["quantity"], 600);
        assert_eq!(body["data"]["status"], "added");
        assert_eq!(body["data"]["operation"], "Yangi ish qo'shildi");
        assert!(body["data"]["_id"].as_str().is_some());

        let (status, chart) = get_json(&router, "/api/grafik-data?period=today").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(chart["success"], true);
        assert_eq!(chart["period"], "today");
        assert_eq!(chart["chartData"].as_array().unwrap().len(), 16);
        assert_eq!(chart["totalAll"], 600);
        assert_eq!(chart["maxBand"]["band"], "1-band");
        assert_eq!(chart["maxBand"]["quantity"], 600);

        let first = station(&chart, "1-band");
        assert_eq!(first["quantity"], 600);
        assert_eq!(first["target"], 1000);
        assert_eq!(first["percentage"], 60);
        assert_eq!(first["type"], "tikuv");
    }

    #[tokio::test]
    async fn test_finishing_station_uses_finishing_target() {
        let (_app, router) = setup();

        let (status, _) = send_json(
            &router,
            Method::POST,
            "/api/add",
            json!({ "band": "Dazmol bandi", "quantity": "600" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, chart) = get_json(&router, "/api/grafik-data").await;
        assert_eq!(chart["period"], "today");

        let ironing = station(&chart, "Dazmol bandi");
        assert_eq!(ironing["target"], 500);
        assert_eq!(ironing["percentage"], 120);
        assert_eq!(ironing["type"], "dazmol");
    }

    #[tokio::test]
    async fn test_add_record_accepts_form_body() {
        let (_app, router) = setup();

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/add")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("band=Upakovka+bandi&quantity=75"))
            .unwrap();
        let (status, bytes) = send(&router, request).await;
        let body: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["band"], "Upakovka bandi");
        assert_eq!(body["data"]["quantity"], 75);
    }

    // ==========================================
    // 测试2: 错误映射
    // ==========================================

    #[tokio::test]
    async fn test_unparsable_quantity_returns_add_failure() {
        let (_app, router) = setup();

        let (status, body) = send_json(
            &router,
            Method::POST,
            "/api/add",
            json!({ "band": "1-band", "quantity": "abc" }),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Saqlashda xatolik yuz berdi");

        let (_, data) = get_json(&router, "/api/data").await;
        assert!(data["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_band_is_stored_empty() {
        let (_app, router) = setup();

        let (status, body) =
            send_json(&router, Method::POST, "/api/add", json!({ "quantity": 5 })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["band"], "");
        assert_eq!(body["data"]["quantity"], 5);

        let (_, data) = get_json(&router, "/api/data").await;
        assert_eq!(data["data"].as_array().unwrap().len(), 1);

        // 站点表以外的标识不计入图表
        let (_, grafik) = get_json(&router, "/api/grafik-data?period=all").await;
        assert_eq!(grafik["totalAll"], 0);
    }

    #[tokio::test]
    async fn test_missing_quantity_returns_add_failure() {
        let (_app, router) = setup();

        let (status, body) =
            send_json(&router, Method::POST, "/api/add", json!({ "band": "1-band" })).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Saqlashda xatolik yuz berdi");
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let (_app, router) = setup();

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/add")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, bytes) = send(&router, request).await;
        let body: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "So'rov ma'lumotlari noto'g'ri");
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let (_app, router) = setup();

        let (status, body) = send_json(
            &router,
            Method::PUT,
            "/api/update/does-not-exist",
            json!({ "quantity": 10 }),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Ma'lumot topilmadi");
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_not_found() {
        let (_app, router) = setup();

        let request = Request::builder()
            .method(Method::DELETE)
            .uri("/api/delete/does-not-exist")
            .body(Body::empty())
            .unwrap();
        let (status, bytes) = send(&router, request).await;
        let body: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Ma'lumot topilmadi");
    }

    // ==========================================
    // 测试3: 修改与软删除
    // ==========================================

    #[tokio::test]
    async fn test_update_then_delete_lifecycle() {
        let (_app, router) = setup();

        let (_, added) = send_json(
            &router,
            Method::POST,
            "/api/add",
            json!({ "band": "3-band", "quantity": 200 }),
        )
        .await;
        let id = added["data"]["_id"].as_str().unwrap().to_string();

        // 修改数量
        let (status, updated) = send_json(
            &router,
            Method::PUT,
            &format!("/api/update/{}", id),
            json!({ "quantity": "450" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["message"], "Ma'lumot muvaffaqiyatli yangilandi");
        assert_eq!(updated["data"]["quantity"], 450);
        assert_eq!(updated["data"]["status"], "updated");
        assert_eq!(updated["data"]["operation"], "Miqdor yangilandi");
        assert_eq!(updated["data"]["createdAt"], added["data"]["createdAt"]);

        let (_, chart) = get_json(&router, "/api/grafik-data?period=all").await;
        assert_eq!(station(&chart, "3-band")["quantity"], 450);

        // 软删除
        let request = Request::builder()
            .method(Method::DELETE)
            .uri(format!("/api/delete/{}", id))
            .body(Body::empty())
            .unwrap();
        let (status, bytes) = send(&router, request).await;
        let deleted: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(deleted["message"], "Ma'lumot muvaffaqiyatli o'chirildi");
        assert_eq!(deleted["data"]["status"], "deleted");
        assert_eq!(deleted["data"]["quantity"], 450);

        // 图表不再计入
        for period in ["today", "month", "all"] {
            let (_, chart) = get_json(&router, &format!("/api/grafik-data?period={}", period)).await;
            assert_eq!(chart["totalAll"], 0, "period={}", period);
            assert_eq!(station(&chart, "3-band")["quantity"], 0);
            assert_eq!(chart["maxBand"]["band"], "1-band");
        }

        // 记录列表仍保留
        let (status, data) = get_json(&router, "/api/data").await;
        assert_eq!(status, StatusCode::OK);
        let rows = data["data"].as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["_id"], id.as_str());
        assert_eq!(rows[0]["status"], "deleted");
        assert_eq!(rows[0]["operation"], "O'chirildi");
    }

    #[tokio::test]
    async fn test_unknown_period_falls_back_to_today() {
        let (_app, router) = setup();

        let (status, chart) = get_json(&router, "/api/grafik-data?period=week").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(chart["period"], "today");
        assert_eq!(chart["totalAll"], 0);
        assert_eq!(chart["maxBand"]["band"], "1-band");
        assert_eq!(chart["maxBand"]["quantity"], 0);
    }

    #[tokio::test]
    async fn test_month_window_uses_relative_average() {
        let (_app, router) = setup();

        for (band, quantity) in [("1-band", 160), ("2-band", 0)] {
            send_json(
                &router,
                Method::POST,
                "/api/add",
                json!({ "band": band, "quantity": quantity }),
            )
            .await;
        }

        // 平均 160/16 = 10, 1-band 为 1600% → 封顶 100
        let (_, chart) = get_json(&router, "/api/grafik-data?period=month").await;
        assert_eq!(chart["period"], "month");
        assert_eq!(station(&chart, "1-band")["percentage"], 100);
        assert_eq!(station(&chart, "2-band")["percentage"], 0);
    }

    // ==========================================
    // 测试4: 排行
    // ==========================================

    #[tokio::test]
    async fn test_update_rankings_returns_snapshot() {
        let (_app, router) = setup();

        for (band, quantity) in [
            ("2-band", 300),
            ("Dazmol bandi", 5000),
            ("5-band", 900),
            ("9-band", 100),
            ("1-band", 50),
        ] {
            let (status, _) = send_json(
                &router,
                Method::POST,
                "/api/add",
                json!({ "band": band, "quantity": quantity }),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, body) = send_json(&router, Method::POST, "/api/update-rankings", json!({})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Reyting muvaffaqiyatli yangilandi");

        let rows = body["data"].as_array().unwrap();
        let bands: Vec<&str> = rows.iter().map(|r| r["band"].as_str().unwrap()).collect();
        assert_eq!(bands, vec!["5-band", "2-band", "9-band"]);
        assert_eq!(rows[0]["rank"], 1);
        assert_eq!(rows[2]["rank"], 3);

        let (status, view) = get_json(&router, "/api/rankings").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["data"]["rankings"].as_array().unwrap().len(), 3);
        assert_eq!(view["data"]["month"], rows[0]["month"]);
    }

    #[tokio::test]
    async fn test_rankings_for_empty_month() {
        let (_app, router) = setup();

        let (status, view) = get_json(&router, "/api/rankings?month=1999-01").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["data"]["month"], "1999-01");
        assert!(view["data"]["rankings"].as_array().unwrap().is_empty());
    }

    // ==========================================
    // 测试5: 页面与静态文件
    // ==========================================

    #[tokio::test]
    async fn test_root_redirects_to_user() {
        let (_app, router) = setup();

        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = router.clone().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/user");
    }

    #[tokio::test]
    async fn test_pages_render_html() {
        let (_app, router) = setup();

        send_json(
            &router,
            Method::POST,
            "/api/add",
            json!({ "band": "4-band", "quantity": 12 }),
        )
        .await;

        for (uri, title) in [
            ("/user", "Tikuv Nazorati Paneli"),
            ("/grafik", "Tikuv Jarayoni Grafigi"),
            ("/database", "Ma&#39;lumotlar Bazasi"),
        ] {
            let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
            let (status, bytes) = send(&router, request).await;
            let html = String::from_utf8(bytes).unwrap();

            assert_eq!(status, StatusCode::OK, "uri={}", uri);
            assert!(html.contains("<!doctype html>"), "uri={}", uri);
            assert!(html.contains(title), "uri={} 缺少标题", uri);
        }

        let request = Request::builder().uri("/user").body(Body::empty()).unwrap();
        let (_, bytes) = send(&router, request).await;
        let html = String::from_utf8(bytes).unwrap();
        assert!(html.contains("4-band"));
        assert!(html.contains("Upakovka bandi"));
    }

    #[tokio::test]
    async fn test_static_files_served_from_public_dir() {
        let (app, router) = setup();

        let css_dir = app.public_dir.path().join("css");
        std::fs::create_dir_all(&css_dir).unwrap();
        std::fs::write(css_dir.join("style.css"), "body { margin: 0; }").unwrap();

        let request = Request::builder()
            .uri("/css/style.css")
            .body(Body::empty())
            .unwrap();
        let (status, bytes) = send(&router, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(String::from_utf8(bytes).unwrap(), "body { margin: 0; }");

        let request = Request::builder()
            .uri("/missing.js")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&router, request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_healthz() {
        let (_app, router) = setup();

        let (status, body) = get_json(&router, "/healthz").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": true }));
    }
}
