use {
    super::*,
    crate::frame::{Frame, Region},
};

fn history(values: &[f64]) -> RingHistory<f64> {
    let mut history = RingHistory::with_capacity(64);
    values.iter().for_each(|v| history.push(*v));
    history
}

fn series<'a>(label: &'a str, history: &'a RingHistory<f64>) -> Series<'a> {
    Series {
        label,
        history,
        style: Style::PLAIN,
    }
}

/// renders a graph into a frame of the given size.
fn render(graph: Graph<'_>, width: u16, height: u16) -> Frame {
    let mut frame = Frame::new(width, height);
    graph.render(&mut frame.view(Region::new(0, 0, width, height)));
    frame
}

fn single<'a>(history: &'a RingHistory<f64>) -> Graph<'a> {
    Graph {
        title: "CPU",
        unit: "%",
        domain: Domain::PERCENT,
        plot: Plot::Single(series("cpu", history)),
        extra: None,
    }
}

fn glyph(frame: &Frame, x: u16, y: u16) -> char {
    frame.cell(x, y).map_or('?', |c| c.glyph)
}

mod domain_tests {
    use super::*;

    #[test]
    fn fraction() {
        let domain = Domain::new(20.0, 90.0);
        assert_eq!(domain.fraction(20.0), 0.0);
        assert_eq!(domain.fraction(55.0), 0.5);
        assert_eq!(domain.fraction(90.0), 1.0);
    }

    #[test]
    fn saturates() {
        assert_eq!(Domain::PERCENT.fraction(250.0), 1.0);
        assert_eq!(Domain::PERCENT.fraction(-3.0), 0.0);
        assert_eq!(Domain::PERCENT.fraction(f64::NAN), 0.0);
    }

    #[test]
    fn degenerate() {
        let domain = Domain::new(5.0, 5.0);
        assert_eq!(domain.span(), 1.0);
        assert_eq!(domain.fraction(5.5), 0.5);
        assert_eq!(Domain::new(3.0, 1.0).span(), 1.0);
    }
}

mod single_tests {
    use super::*;

    #[test]
    fn decorations() {
        let history = history(&[12.0, 50.0]);
        let frame = render(single(&history), 20, 8);

        assert_eq!(frame.row_text(0), "┌─ CPU ──────50.0%─┐");
        assert_eq!(frame.row_text(7), "└──────────────────┘");
        // the midline, partly covered by the connector between the two samples.
        assert_eq!(frame.row_text(4), "│─│────────────────│");
    }

    #[test]
    fn flat_line() {
        let history = history(&[50.0; 30]);
        let frame = render(single(&history), 20, 8);

        // the interior is six rows tall, so one half maps three rows above the bottom.
        assert_eq!(frame.row_text(3), format!("│{}│", "o".repeat(18)));
        for y in [1, 2, 5, 6] {
            assert!(!frame.row_text(y).contains('o'), "row {y} should be empty");
        }
    }

    #[test]
    fn saturates_at_the_edges() {
        let history = history(&[200.0, -5.0]);
        let frame = render(single(&history), 20, 8);

        assert_eq!(glyph(&frame, 1, 1), 'o');
        assert_eq!(glyph(&frame, 2, 6), 'o');
        for y in 2..=5 {
            assert_eq!(glyph(&frame, 2, y), '│');
        }
        assert_eq!(glyph(&frame, 2, 1), ' ');
    }

    #[test]
    fn most_recent_samples_fill_from_the_left() {
        let values = (0..40).map(|i| if i < 38 { 0.0 } else { 100.0 }).collect::<Vec<_>>();
        let history = history(&values);
        let frame = render(single(&history), 20, 8);

        // the two most recent samples occupy the last two columns.
        assert_eq!(glyph(&frame, 17, 1), 'o');
        assert_eq!(glyph(&frame, 18, 1), 'o');
        assert_eq!(glyph(&frame, 16, 6), 'o');
        assert_eq!(glyph(&frame, 17, 6), ' ');
    }

    #[test]
    fn short_history_is_left_aligned() {
        let history = history(&[0.0, 0.0, 0.0]);
        let frame = render(single(&history), 20, 8);
        assert_eq!(frame.row_text(6), format!("│ooo{}│", " ".repeat(15)));
    }

    #[test]
    fn too_small_to_trace() {
        let history = history(&[50.0; 10]);
        let frame = render(single(&history), 11, 8);

        assert_eq!(frame.row_text(0), "┌─────────┐");
        assert!((1..7).all(|y| frame.row_text(y) == "│         │"));
    }

    #[test]
    fn empty_history() {
        let history = history(&[]);
        let frame = render(single(&history), 20, 8);
        assert!(frame.row_text(0).contains("0.0%"));
        assert!(!(1..7).any(|y| frame.row_text(y).contains('o')));
    }
}

mod dual_tests {
    use super::*;

    fn dual<'a>(a: &'a RingHistory<f64>, b: &'a RingHistory<f64>) -> Graph<'a> {
        Graph {
            title: "NET",
            unit: "MB/s",
            domain: Domain::PERCENT,
            plot: Plot::Dual(series("RX", a), series("TX", b)),
            extra: Some("errs/drops Δ rx 0/0 tx 0/0 (if: eth0)"),
        }
    }

    #[test]
    fn decorations() {
        let (a, b) = (history(&[]), history(&[]));
        let frame = render(dual(&a, &b), 40, 8);

        assert!(frame.row_text(0).ends_with("RX 0.0MB/s  TX 0.0MB/s─┐"));
        assert!(frame.row_text(0).starts_with("┌─ NET ─"));
        assert_eq!(frame.row_text(1), "│ errs/drops Δ rx 0/0 tx 0/0 (if: eth0 │");
    }

    #[test]
    fn extra_line_in_the_shortest_graph() {
        let (a, b) = (history(&[]), history(&[]));
        let frame = render(dual(&a, &b), 40, 6);
        assert!(frame.row_text(1).starts_with("│ errs/drops Δ rx 0/0"));
    }

    #[test]
    fn too_short_for_anything_but_the_border() {
        let (a, b) = (history(&[1.0]), history(&[2.0]));
        let frame = render(dual(&a, &b), 40, 5);

        assert_eq!(frame.row_text(0), format!("┌{}┐", "─".repeat(38)));
        for y in 1..4 {
            assert_eq!(frame.row_text(y), format!("│{}│", " ".repeat(38)));
        }
        assert_eq!(frame.row_text(4), format!("└{}┘", "─".repeat(38)));
    }

    #[test]
    fn overlap() {
        let a = history(&[0.0, 0.0, 0.0]);
        let b = history(&[0.0, 100.0, 0.0]);
        let frame = render(dual(&a, &b), 20, 8);

        assert_eq!(glyph(&frame, 1, 6), 'X');
        assert_eq!(glyph(&frame, 2, 6), 'o');
        assert_eq!(glyph(&frame, 3, 6), 'X');
        assert_eq!(glyph(&frame, 2, 1), '*');
        for y in 2..=5 {
            assert_eq!(glyph(&frame, 2, y), '│');
            assert_eq!(glyph(&frame, 3, y), '│');
        }
    }

    #[test]
    fn connectors_overlap_too() {
        let a = history(&[0.0, 100.0]);
        let b = history(&[0.0, 100.0]);
        let frame = render(dual(&a, &b), 20, 8);

        for y in 1..=5 {
            assert_eq!(glyph(&frame, 2, y), 'X');
        }
        assert_eq!(glyph(&frame, 1, 6), 'X');
    }

    #[test]
    fn shorter_series_limits_both() {
        let a = history(&[0.0; 10]);
        let b = history(&[0.0; 2]);
        let frame = render(dual(&a, &b), 20, 8);
        assert_eq!(frame.row_text(6), format!("│XX{}│", " ".repeat(16)));
    }
}
