// ==========================================
// 月度排行引擎 + 调度器集成测试
// ==========================================
// 职责: 验证排行快照的写入、幂等、过滤规则与月末触发
// 方式: 临时 SQLite 库 + 固定时间点
// ==========================================


#[cfg(test)]
mod ranking_engine_test {
    use std::sync::Arc;
    use std::time::Duration;

    use sewing_tracker::api::ProductionApi;
    use sewing_tracker::domain::production::RecordChange;
    use sewing_tracker::domain::ranking::same_snapshot;
    use sewing_tracker::engine::RankingScheduler;

    use crate::test_helpers::{at, seed_record, setup_repos};

    // ==========================================
    // 测试1: 快照内容
    // ==========================================

    #[test]
    fn test_recompute_writes_top_three_sewing_bands() {
        let env = setup_repos();
        let day = at(2026, 10, 12, 9, 0);

        seed_record(&env.record_repo, "1-band", 100, day);
        seed_record(&env.record_repo, "2-band", 700, day);
        seed_record(&env.record_repo, "2-band", 100, day);
        seed_record(&env.record_repo, "3-band", 500, day);
        seed_record(&env.record_repo, "4-band", 300, day);
        seed_record(&env.record_repo, "Dazmol bandi", 9000, day);
        seed_record(&env.record_repo, "Upakovka bandi", 8000, day);

        let rankings = env.engine.recompute(at(2026, 10, 20, 18, 0)).unwrap();

        let bands: Vec<&str> = rankings.iter().map(|r| r.band.as_str()).collect();
        assert_eq!(bands, vec!["2-band", "3-band", "4-band"]);
        assert_eq!(rankings[0].total_quantity, 800);
        assert_eq!(
            rankings.iter().map(|r| r.rank).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert!(rankings.iter().all(|r| r.month == "2026-10"));

        let stored = env.ranking_repo.find_by_month("2026-10").unwrap();
        assert!(same_snapshot(&rankings, &stored));
    }

    #[test]
    fn test_recompute_excludes_deleted_and_other_months() {
        let env = setup_repos();

        // 上月记录
        seed_record(&env.record_repo, "5-band", 10_000, at(2026, 9, 30, 23, 59));
        // 本月被删除的记录
        let deleted = seed_record(&env.record_repo, "6-band", 5_000, at(2026, 10, 2, 8, 0));
        env.record_repo
            .apply_change(
                &deleted.id,
                &RecordChange::soft_delete("O'chirildi".to_string(), at(2026, 10, 2, 9, 0)),
            )
            .unwrap()
            .expect("记录应存在");
        // 本月有效记录
        seed_record(&env.record_repo, "7-band", 40, at(2026, 10, 1, 0, 0));

        let rankings = env.engine.recompute(at(2026, 10, 15, 12, 0)).unwrap();

        assert_eq!(rankings.len(), 1);
        assert_eq!(rankings[0].band, "7-band");
        assert_eq!(rankings[0].total_quantity, 40);
    }

    #[test]
    fn test_recompute_with_no_records_clears_month() {
        let env = setup_repos();

        seed_record(&env.record_repo, "1-band", 10, at(2026, 10, 3, 10, 0));
        let first = env.engine.recompute(at(2026, 10, 10, 10, 0)).unwrap();
        assert_eq!(first.len(), 1);

        // 下月无记录 → 空快照, 不影响上月
        let next = env.engine.recompute(at(2026, 11, 10, 10, 0)).unwrap();
        assert!(next.is_empty());
        assert!(env.ranking_repo.find_by_month("2026-11").unwrap().is_empty());
        assert_eq!(env.ranking_repo.find_by_month("2026-10").unwrap().len(), 1);
    }

    // ==========================================
    // 测试2: 幂等
    // ==========================================

    #[test]
    fn test_recompute_is_idempotent() {
        let env = setup_repos();
        let day = at(2026, 10, 5, 11, 0);

        for (band, quantity) in [("8-band", 30), ("9-band", 30), ("10-band", 60), ("11-band", 5)] {
            seed_record(&env.record_repo, band, quantity, day);
        }

        let first = env.engine.recompute(at(2026, 10, 6, 8, 0)).unwrap();
        let second = env.engine.recompute(at(2026, 10, 6, 9, 30)).unwrap();

        assert!(same_snapshot(&first, &second));
        let stored = env.ranking_repo.find_by_month("2026-10").unwrap();
        assert_eq!(stored.len(), 3);
        assert!(same_snapshot(&second, &stored));

        // 同量按站点序号: 8-band 在 9-band 之前
        let bands: Vec<&str> = stored.iter().map(|r| r.band.as_str()).collect();
        assert_eq!(bands, vec!["10-band", "8-band", "9-band"]);
    }

    #[test]
    fn test_snapshot_follows_latest_data() {
        let env = setup_repos();
        let day = at(2026, 10, 5, 11, 0);

        seed_record(&env.record_repo, "1-band", 10, day);
        env.engine.recompute(at(2026, 10, 6, 8, 0)).unwrap();

        seed_record(&env.record_repo, "2-band", 20, day);
        env.engine.recompute(at(2026, 10, 6, 9, 0)).unwrap();

        let stored = env.engine.snapshot_for("2026-10").unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].band, "2-band");
        assert_eq!(stored[1].band, "1-band");
    }

    // ==========================================
    // 测试3: 月末自动触发
    // ==========================================

    #[test]
    fn test_recompute_if_month_end() {
        let env = setup_repos();
        seed_record(&env.record_repo, "3-band", 15, at(2026, 10, 30, 10, 0));

        assert!(env
            .engine
            .recompute_if_month_end(at(2026, 10, 30, 23, 59))
            .is_none());
        assert!(env.ranking_repo.find_by_month("2026-10").unwrap().is_empty());

        let fired = env
            .engine
            .recompute_if_month_end(at(2026, 10, 31, 15, 0))
            .expect("月末应重算");
        assert_eq!(fired.len(), 1);
        assert_eq!(env.ranking_repo.find_by_month("2026-10").unwrap().len(), 1);
    }

    #[test]
    fn test_add_record_on_last_day_refreshes_rankings() {
        let env = setup_repos();
        sewing_tracker::i18n::set_locale("uz");
        let api = ProductionApi::new(env.record_repo.clone(), env.engine.clone());

        api.add_record("4-band", 25, at(2027, 2, 27, 14, 0)).unwrap();
        assert!(env.ranking_repo.find_by_month("2027-02").unwrap().is_empty());

        api.add_record("12-band", 40, at(2027, 2, 28, 14, 0)).unwrap();
        let stored = env.ranking_repo.find_by_month("2027-02").unwrap();
        let bands: Vec<&str> = stored.iter().map(|r| r.band.as_str()).collect();
        assert_eq!(bands, vec!["12-band", "4-band"]);
    }

    // ==========================================
    // 测试4: 调度器
    // ==========================================

    #[test]
    fn test_scheduler_fires_once_per_month_end() {
        let env = setup_repos();
        seed_record(&env.record_repo, "1-band", 50, at(2026, 10, 20, 9, 0));

        let scheduler = RankingScheduler::new(env.engine.clone(), Duration::from_secs(60));

        // 非月末 / 非零点
        assert!(!scheduler.tick(at(2026, 10, 30, 0, 0)));
        assert!(!scheduler.tick(at(2026, 10, 31, 0, 1)));
        assert!(env.ranking_repo.find_by_month("2026-10").unwrap().is_empty());

        // 月末零点触发
        assert!(scheduler.tick(at(2026, 10, 31, 0, 0)));
        assert_eq!(env.ranking_repo.find_by_month("2026-10").unwrap().len(), 1);

        // 同一分钟内再次轮询不重复触发
        assert!(!scheduler.tick(at(2026, 10, 31, 0, 0)));

        // 下个月末再次触发
        seed_record(&env.record_repo, "2-band", 70, at(2026, 11, 2, 9, 0));
        assert!(scheduler.tick(at(2026, 11, 30, 0, 0)));
        assert_eq!(env.ranking_repo.find_by_month("2026-11").unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_scheduler_tick_blocking_recomputes_off_runtime() {
        let env = setup_repos();
        seed_record(&env.record_repo, "3-band", 80, at(2026, 10, 20, 9, 0));
        let scheduler = Arc::new(RankingScheduler::new(
            env.engine.clone(),
            Duration::from_secs(60),
        ));

        assert!(!scheduler.clone().tick_blocking(at(2026, 10, 30, 0, 0)).await);
        assert!(scheduler.clone().tick_blocking(at(2026, 10, 31, 0, 0)).await);
        assert!(!scheduler.clone().tick_blocking(at(2026, 10, 31, 0, 0)).await);

        let stored = env.ranking_repo.find_by_month("2026-10").unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].band, "3-band");
    }

    #[tokio::test]
    async fn test_scheduler_run_stops_on_shutdown() {
        let env = setup_repos();
        let scheduler = Arc::new(RankingScheduler::new(
            env.engine.clone(),
            Duration::from_millis(10),
        ));
        assert_eq!(scheduler.poll_interval(), Duration::from_millis(10));

        let (tx, rx) = tokio::sync::watch::channel(false);
        let handle = tokio::spawn(scheduler.clone().run(rx));

        tokio::time::sleep(Duration::from_millis(30)).await;
        tx.send(true).unwrap();

        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("调度器未在关闭信号后退出")
            .expect("调度器任务异常");
    }
}
