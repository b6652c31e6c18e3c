use {
    super::*,
    crate::{
        deriver::{DiskRates, NetRates},
        probe::{FsUsage, LoadAvg, ProcessSample},
    },
};

fn dashboard() -> Dashboard {
    let devices = Devices {
        iface: Some("eth0".to_owned()),
        disk: None,
    };
    Dashboard::new(80, 26, 100, devices)
}

fn processes(count: u32) -> Vec<ProcessSample> {
    (1..=count)
        .map(|pid| ProcessSample {
            pid,
            name: format!("proc{pid}"),
            state: 'S',
            cpu_time: 0,
            rss_bytes: 4096,
        })
        .collect()
}

fn recording() -> Recording {
    Recording {
        elapsed: 0.5,
        cpu: 75.0,
        memory: 40.0,
        temperature: Some(51.0),
        load: Some(LoadAvg {
            one: 0.5,
            five: 0.25,
            fifteen: 0.75,
        }),
        uptime: Some(3_661.0),
        disk: DiskRates {
            read: 2.0,
            write: 4.0,
        },
        net: NetRates {
            rx: 1.0,
            rx_errors: 3,
            ..NetRates::default()
        },
        fs: Some(FsUsage {
            used_bytes: 1 << 30,
            total_bytes: 4 << 30,
            used_percent: 25.0,
            inode_percent: 10.0,
        }),
        throttled: Some(0),
        processes: processes(3),
    }
}

mod command_tests {
    use super::*;

    #[test]
    fn defaults() {
        let dashboard = dashboard();
        assert_eq!(dashboard.state(), State::Running);
        assert_eq!(dashboard.interval(), Duration::from_millis(500));
        assert!(dashboard.color());
        assert_eq!(dashboard.scroll(), 0);
    }

    #[test]
    fn quit() {
        let mut dashboard = dashboard();
        dashboard.apply(Command::Quit);
        assert_eq!(dashboard.state(), State::Stopped);
        assert!(!dashboard.is_running());
    }

    #[test]
    fn interval_bounds() {
        let mut dashboard = dashboard();
        dashboard.apply(Command::Faster);
        assert_eq!(dashboard.interval(), Duration::from_millis(450));

        (0..20).for_each(|_| dashboard.apply(Command::Faster));
        assert_eq!(dashboard.interval(), Dashboard::MIN_INTERVAL);

        (0..50).for_each(|_| dashboard.apply(Command::Slower));
        assert_eq!(dashboard.interval(), Dashboard::MAX_INTERVAL);
    }

    #[test]
    fn toggle_color() {
        let mut dashboard = dashboard();
        dashboard.apply(Command::ToggleColor);
        assert!(!dashboard.color());
        dashboard.apply(Command::ToggleColor);
        assert!(dashboard.color());
    }

    #[test]
    fn scrolling_is_clamped() {
        let mut dashboard = dashboard();
        dashboard.ingest(Recording {
            processes: processes(20),
            ..Recording::default()
        });

        // the task pane is eight rows tall, so it lists four processes.
        dashboard.apply(Command::Scroll(Command::PAGE));
        assert_eq!(dashboard.scroll(), 10);
        dashboard.apply(Command::Scroll(100));
        assert_eq!(dashboard.scroll(), 16);
        dashboard.apply(Command::Scroll(-1));
        assert_eq!(dashboard.scroll(), 15);
        dashboard.apply(Command::ScrollTop);
        assert_eq!(dashboard.scroll(), 0);
        dashboard.apply(Command::Scroll(-1));
        assert_eq!(dashboard.scroll(), 0);
    }

    #[test]
    fn exited_processes_pull_the_scroll_back() {
        let mut dashboard = dashboard();
        dashboard.ingest(Recording {
            processes: processes(20),
            ..Recording::default()
        });
        dashboard.apply(Command::Scroll(100));

        dashboard.ingest(Recording {
            processes: processes(6),
            ..Recording::default()
        });
        assert_eq!(dashboard.scroll(), 2);
    }
}

mod layout_tests {
    use super::*;

    #[test]
    fn size_change() {
        let mut dashboard = dashboard();
        dashboard.ingest(Recording {
            processes: processes(20),
            ..Recording::default()
        });
        dashboard.apply(Command::Scroll(3));

        assert!(!dashboard.relayout(80, 26));
        assert_eq!(dashboard.scroll(), 3);

        assert!(dashboard.relayout(100, 40));
        assert_eq!(dashboard.scroll(), 0);
        assert_eq!(dashboard.draw().width(), 100);
    }

    #[test]
    fn resize_signal() {
        let mut dashboard = dashboard();
        dashboard.resized();
        assert_eq!(dashboard.state(), State::Relayout);

        assert!(dashboard.relayout(80, 26));
        assert_eq!(dashboard.state(), State::Running);
        assert!(!dashboard.relayout(80, 26));
    }

    #[test]
    fn stopping_wins_over_resizing() {
        let mut dashboard = dashboard();
        dashboard.stop();
        dashboard.resized();
        assert_eq!(dashboard.state(), State::Stopped);
    }
}

mod ingest_tests {
    use super::*;

    #[test]
    fn every_history_advances() {
        let mut dashboard = dashboard();
        dashboard.ingest(recording());
        dashboard.ingest(Recording::default());

        for stream in Stream::ALL {
            assert_eq!(dashboard.history(stream).len(), 2, "{}", stream.name());
        }
        let cpu = dashboard.history(Stream::Cpu).last_n(2).collect::<Vec<_>>();
        assert_eq!(cpu, [75.0, 0.0]);
        assert_eq!(dashboard.history(Stream::DiskWrite).last_n(2).next(), Some(4.0));
    }

    #[test]
    fn missing_temperature_is_zero() {
        let mut dashboard = dashboard();
        dashboard.ingest(Recording {
            temperature: None,
            ..recording()
        });
        assert_eq!(dashboard.history(Stream::Temperature).latest(), 0.0);
    }

    #[test]
    fn processes_are_tracked() {
        let mut dashboard = dashboard();
        dashboard.ingest(recording());
        assert_eq!(dashboard.tasks().len(), 3);

        dashboard.ingest(Recording::default());
        assert!(dashboard.tasks().is_empty());
    }
}

mod domain_tests {
    use super::*;

    #[test]
    fn temperature() {
        assert_eq!(temperature_domain(None), Domain::new(20.0, 90.0));
        assert_eq!(temperature_domain(Some(50.0)), Domain::new(20.0, 90.0));
        assert_eq!(temperature_domain(Some(85.0)), Domain::new(20.0, 95.0));
        assert_eq!(temperature_domain(Some(25.0)), Domain::new(15.0, 90.0));
        assert_eq!(temperature_domain(Some(4.0)), Domain::new(0.0, 90.0));
    }

    #[test]
    fn rates() {
        assert_eq!(rate_domain(0.0, 0.0), Domain::new(0.0, 1.0));
        assert_eq!(rate_domain(2.0, 4.0), Domain::new(0.0, 6.0));
        assert_eq!(rate_domain(0.5, 0.1), Domain::new(0.0, 1.0));
    }
}

mod draw_tests {
    use super::*;

    fn screen(dashboard: &mut Dashboard) -> Vec<String> {
        let frame = dashboard.draw();
        (0..frame.height()).map(|y| frame.row_text(y)).collect()
    }

    #[test]
    fn uptime() {
        let mut dashboard = Dashboard::new(200, 26, 100, Devices::default());
        dashboard.ingest(recording());
        let screen = screen(&mut dashboard);
        assert!(screen[1].trim_end().ends_with("PWR OK  IF n/a DK n/a  UP 0d 01:01:01"));
    }

    #[test]
    fn header() {
        let mut dashboard = dashboard();
        dashboard.ingest(recording());
        let screen = screen(&mut dashboard);

        assert!(screen[0].starts_with("  SPARTA//MON   q quit | +/- speed"));
        assert!(screen[0].contains("| c color | 500ms"));
        assert_eq!(
            screen[1].trim_end(),
            "  CPU 75.0% MEM 40.0% LOAD 0.50 0.25 0.75 TEMP 51.0C  FS / 25.0% (1.0GB/4.0GB)"
        );
    }

    #[test]
    fn missing_values() {
        let mut dashboard = Dashboard::new(200, 26, 100, Devices::default());
        dashboard.ingest(Recording::default());
        let screen = screen(&mut dashboard);

        let summary = screen[1].trim_end();
        assert!(summary.ends_with("LOAD n/a TEMP n/a  FS / n/a  PWR n/a  IF n/a DK n/a  UP n/a"));
    }

    #[test]
    fn panes() {
        let devices = Devices {
            iface: Some("eth0".to_owned()),
            disk: None,
        };
        let mut dashboard = Dashboard::new(120, 30, 100, devices);
        dashboard.ingest(recording());
        let screen = screen(&mut dashboard).join("\n");

        for title in [
            " CPU % (time) ",
            " MEM % (time) ",
            " TEMP C (time) ",
            " DISK I/O (time) ",
            " TASKS (avg CPU) ",
            " NET I/O (time) ",
            "RD 2.0MB/s  WR 4.0MB/s",
            "R/W MB/s (dev: n/a)",
            "errs/drops Δ rx 3/0 tx 0/0 (if: eth0)",
            "proc1",
        ] {
            assert!(screen.contains(title), "{title:?} is missing");
        }
    }

    #[test]
    fn units() {
        let mut dashboard = Dashboard::new(120, 30, 100, Devices::default());
        dashboard.ingest(recording());
        let screen = screen(&mut dashboard);

        // the cpu and memory graphs share the first row of panes.
        assert!(screen[2].contains("75.0%─"));
        assert!(screen[2].contains("40.0%─"));
        assert!(screen.iter().any(|row| row.contains("51.0C─")));
        assert!(screen.iter().any(|row| row.contains("RX 1.0MB/s  TX 0.0MB/s─")));
    }

    #[test]
    fn colors() {
        let mut dashboard = dashboard();
        dashboard.ingest(recording());
        let title = dashboard.draw().cell(2, 0).map(|c| c.style);
        assert_eq!(title, Some(Style::fg(Color::Magenta).bold()));

        dashboard.apply(Command::ToggleColor);
        let title = dashboard.draw().cell(2, 0).map(|c| c.style);
        assert_eq!(title, Some(Style::PLAIN));
    }

    #[test]
    fn tiny_terminal() {
        let mut dashboard = Dashboard::new(10, 5, 100, Devices::default());
        dashboard.ingest(recording());
        let screen = screen(&mut dashboard);
        assert_eq!(screen.len(), 5);
        assert!(screen.iter().all(|row| row.chars().count() == 10));
    }
}
