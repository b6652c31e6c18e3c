use super::*;

/// observes one tick's processes, given as `(pid, cpu_time)` pairs.
fn tick(table: &mut ProcessTable, elapsed: f64, processes: &[(Pid, u64)]) {
    table.begin_tick(elapsed);
    for (pid, cpu_time) in processes {
        table.observe(*pid, "proc", 'S', *cpu_time, 4096);
    }
    table.end_tick();
}

fn pids(table: &ProcessTable) -> Vec<Pid> {
    table.ranked().iter().map(|r| r.pid).collect()
}

mod observe_tests {
    use super::*;

    #[test]
    fn first_observation_is_idle() {
        let mut table = ProcessTable::new(100);
        tick(&mut table, 1.0, &[(1, 5_000)]);

        let record = table.get(1).unwrap();
        assert_eq!(record.instant, 0.0);
        assert_eq!(record.average, 0.0);
        assert_eq!(record.rss_bytes, 4096);
    }

    #[test]
    fn smoothing() {
        let mut table = ProcessTable::new(100);
        tick(&mut table, 1.0, &[(1, 0)]);

        // twelve ticks in one second is 12% of a core, which seeds the average.
        tick(&mut table, 1.0, &[(1, 12)]);
        let record = table.get(1).unwrap();
        assert_eq!(record.instant, 12.0);
        assert_eq!(record.average, 12.0);

        tick(&mut table, 1.0, &[(1, 12)]);
        let record = table.get(1).unwrap();
        assert_eq!(record.instant, 0.0);
        assert!((record.average - 9.6).abs() < 1e-9);
    }

    #[test]
    fn scaled_by_elapsed_time() {
        let mut table = ProcessTable::new(100);
        tick(&mut table, 1.0, &[(1, 0)]);
        tick(&mut table, 0.5, &[(1, 25)]);
        assert_eq!(table.get(1).unwrap().instant, 50.0);
    }

    #[test]
    fn counter_went_backwards() {
        let mut table = ProcessTable::new(100);
        tick(&mut table, 1.0, &[(1, 500)]);
        tick(&mut table, 1.0, &[(1, 10)]);
        assert_eq!(table.get(1).unwrap().instant, 0.0);

        // the lower reading is the new baseline.
        tick(&mut table, 1.0, &[(1, 30)]);
        assert_eq!(table.get(1).unwrap().instant, 20.0);
    }

    #[test]
    fn no_elapsed_time() {
        let mut table = ProcessTable::new(100);
        tick(&mut table, 1.0, &[(1, 0)]);
        tick(&mut table, 0.0, &[(1, 1)]);

        let instant = table.get(1).unwrap().instant;
        assert!(instant.is_finite());
        assert!(instant > 0.0);
    }

    #[test]
    fn updates_identity() {
        let mut table = ProcessTable::new(100);
        table.begin_tick(1.0);
        table.observe(7, "sh", 'S', 0, 1024);
        table.end_tick();

        // the pid was reused by a new program.
        table.begin_tick(1.0);
        table.observe(7, "vim", 'R', 0, 2048);
        table.end_tick();

        let record = table.get(7).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(record.name, "vim");
        assert_eq!(record.state, 'R');
        assert_eq!(record.rss_bytes, 2048);
    }
}

mod sweep_tests {
    use super::*;

    #[test]
    fn exited_processes_are_removed() {
        let mut table = ProcessTable::new(100);
        tick(&mut table, 1.0, &[(1, 0), (2, 0), (3, 0)]);
        assert_eq!(table.len(), 3);

        tick(&mut table, 1.0, &[(1, 0), (3, 0)]);
        assert_eq!(table.len(), 2);
        assert!(table.get(2).is_none());
        assert!(table.get(3).is_some());
    }

    #[test]
    fn everything_exited() {
        let mut table = ProcessTable::new(100);
        tick(&mut table, 1.0, &[(1, 0), (2, 0)]);
        tick(&mut table, 1.0, &[]);
        assert!(table.is_empty());
        assert!(table.ranked().is_empty());
    }

    #[test]
    fn survivors_remain_addressable() {
        let mut table = ProcessTable::new(100);
        tick(&mut table, 1.0, &[(10, 0), (20, 0), (30, 0)]);
        tick(&mut table, 1.0, &[(20, 100), (30, 0)]);
        tick(&mut table, 1.0, &[(20, 150), (30, 0), (40, 0)]);

        assert_eq!(table.get(20).unwrap().instant, 50.0);
        assert_eq!(table.get(40).unwrap().pid, 40);
        assert_eq!(table.len(), 3);
    }
}

mod rank_tests {
    use super::*;

    #[test]
    fn busiest_first() {
        let mut table = ProcessTable::new(100);
        tick(&mut table, 1.0, &[(1, 0), (2, 0), (3, 0)]);
        tick(&mut table, 1.0, &[(1, 10), (2, 50), (3, 30)]);
        assert_eq!(pids(&table), [2, 3, 1]);
    }

    #[test]
    fn ties_broken_by_instant_then_pid() {
        let mut table = ProcessTable::new(100);
        tick(&mut table, 1.0, &[(1, 0), (2, 0), (3, 0), (4, 0)]);
        tick(&mut table, 1.0, &[(1, 20), (2, 20), (3, 20), (4, 20)]);
        // pid 1 is idle this tick, pid 3 stays busy, the rest are equal.
        tick(&mut table, 1.0, &[(1, 20), (2, 30), (3, 40), (4, 30)]);

        let ranked = table.ranked();
        assert_eq!(ranked[0].pid, 3);
        assert_eq!(ranked[1].pid, 2);
        assert_eq!(ranked[2].pid, 4);
        assert_eq!(ranked[3].pid, 1);
    }

    #[test]
    fn idle_processes_ordered_by_pid() {
        let mut table = ProcessTable::new(100);
        tick(&mut table, 1.0, &[(30, 0), (10, 0), (20, 0)]);
        assert_eq!(pids(&table), [10, 20, 30]);
    }
}
