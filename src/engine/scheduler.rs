// ==========================================
// 缝纫车间生产看板 - 月度排行调度器
// ==========================================
// 触发条件: 本地时间 00:00 (整分钟内) 且当天是当月最后一天
// 运行方式: tokio interval 轮询, 重算放到阻塞线程池, 收到 shutdown 信号后退出
// 失败处理: 只记日志, 调度循环不中断
// ==========================================

use crate::domain::calendar::{is_last_day_of_month, local_now};
use crate::engine::ranking::RankingEngine;
use chrono::{NaiveDate, NaiveDateTime, Timelike};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

/// 调度触发判定
///
/// `now.hour == 0 && now.minute == 0 && 当天为月末`
pub fn should_fire(now: NaiveDateTime) -> bool {
    now.hour() == 0 && now.minute() == 0 && is_last_day_of_month(now.date())
}

// ==========================================
// RankingScheduler - 排行调度器
// ==========================================
pub struct RankingScheduler {
    engine: Arc<RankingEngine>,
    poll_interval: Duration,
    last_fired: Mutex<Option<NaiveDate>>, // 同一天只触发一次
}

impl RankingScheduler {
    pub fn new(engine: Arc<RankingEngine>, poll_interval: Duration) -> Self {
        Self {
            engine,
            poll_interval,
            last_fired: Mutex::new(None),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// 单次轮询
    ///
    /// # 返回
    /// 本次是否触发了重算 (重算失败也算触发)
    pub fn tick(&self, now: NaiveDateTime) -> bool {
        if !should_fire(now) {
            return false;
        }

        let today = now.date();
        {
            let mut last = match self.last_fired.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            if *last == Some(today) {
                debug!(date = %today, "今日月末排行已触发, 跳过");
                return false;
            }
            *last = Some(today);
        }

        match self.engine.recompute(now) {
            Ok(rankings) => {
                info!(date = %today, rows = rankings.len(), "定时月度排行完成");
            }
            Err(e) => {
                error!(date = %today, error = %e, "定时月度排行失败");
            }
        }
        true
    }

    /// 在阻塞线程池中执行单次轮询
    ///
    /// 未到触发时刻时直接返回, 不占用阻塞线程
    pub async fn tick_blocking(self: Arc<Self>, now: NaiveDateTime) -> bool {
        if !should_fire(now) {
            return false;
        }

        match tokio::task::spawn_blocking(move || self.tick(now)).await {
            Ok(fired) => fired,
            Err(e) => {
                error!(error = %e, "月度排行任务执行失败");
                false
            }
        }
    }

    /// 调度主循环
    ///
    /// # 参数
    /// - `shutdown`: 值变为 true (或发送端关闭) 时退出
    pub async fn run(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        let mut interval = tokio::time::interval(self.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(poll_secs = self.poll_interval.as_secs(), "月度排行调度器已启动");

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.clone().tick_blocking(local_now()).await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("月度排行调度器已停止");
    }
}
