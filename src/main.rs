// ==========================================
// 缝纫车间生产看板 - 服务主入口
// ==========================================
// 启动顺序: .env → 日志 → 配置 → 语言 → AppState → 排行调度器 → HTTP
// 退出: Ctrl+C / SIGTERM, 先停 HTTP 再停调度器
// ==========================================

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::watch;
use tracing::info;

use sewing_tracker::app::{build_router, AppState};
use sewing_tracker::config::AppConfig;
use sewing_tracker::{i18n, logging};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // .env 不存在时忽略
    let _ = dotenvy::dotenv();

    logging::init();

    info!("==================================================");
    info!("{} - 生产看板", sewing_tracker::APP_NAME);
    info!("系统版本: {}", sewing_tracker::VERSION);
    info!("==================================================");

    let config = AppConfig::load();
    i18n::set_locale(&config.locale);
    info!(locale = %i18n::current_locale(), db = %config.db_path, "配置加载完成");

    let state = AppState::new(&config)
        .map_err(anyhow::Error::msg)
        .context("无法初始化AppState")?;

    // 排行调度器
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let scheduler = Arc::new(state.ranking_scheduler(&config));
    let scheduler_task = tokio::spawn(scheduler.run(shutdown_rx));

    // HTTP
    let app = build_router(state);
    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("无法监听 {}", address))?;
    info!("服务已启动: http://localhost:{}", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP 服务异常退出")?;

    let _ = shutdown_tx.send(true);
    if let Err(e) = scheduler_task.await {
        tracing::warn!(error = %e, "调度器任务异常结束");
    }

    info!("服务已停止");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "无法监听 Ctrl+C");
            std::future::pending::<()>().await;
        }
        info!("收到 Ctrl+C, 准备退出");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("收到 SIGTERM, 准备退出");
            }
            Err(e) => {
                tracing::error!(error = %e, "无法监听 SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
