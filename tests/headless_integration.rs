use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{backend::TestBackend, Terminal};
use scorelog::app::{App, AppState};
use scorelog::loader::load_reader;
use scorelog::normalize::{normalize, TimestampFormat};
use scorelog::pipeline::{run, ChartKind, PipelineConfig};
use scorelog::runtime::{ChartEvent, Runner};
use scorelog::ui::ui;

const LOG: &str = "\
Timestamp,Score,Grade,Difficulty Level
2024-02-10 09:00 PM,\"1,000,000\",E,1
2024-02-11 09:00 PM,\"900,000\",Pass,1
2024-02-25 09:00 PM,\"950,000\",Pass,2
";

fn app() -> App {
    let loaded = load_reader(LOG.as_bytes(), "alice.csv", "alice").unwrap();
    let records = normalize(&loaded, &TimestampFormat::export()).unwrap();
    let config = PipelineConfig {
        exclude_failing: true,
        ..PipelineConfig::for_chart(ChartKind::AccuracyOverTime)
    };
    let output = run(records, &config, chrono::NaiveDateTime::default());
    App::new(ChartKind::AccuracyOverTime, &config, output)
}

fn press(code: KeyCode) -> ChartEvent {
    ChartEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

// Headless viewer loop using the internal runtime without a TTY
#[test]
fn headless_viewer_switches_screens_and_quits() {
    let mut app = app();
    let mut terminal = Terminal::new(TestBackend::new(90, 24)).unwrap();

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(rx, Duration::from_millis(5));

    tx.send(press(KeyCode::Char('e'))).unwrap();
    tx.send(ChartEvent::Resize).unwrap();
    tx.send(press(KeyCode::Tab)).unwrap();
    tx.send(press(KeyCode::Down)).unwrap();
    tx.send(press(KeyCode::Esc)).unwrap();

    let mut quit = false;
    for _ in 0..100u32 {
        match runner.step() {
            ChartEvent::Tick => {}
            ChartEvent::Closed => break,
            ChartEvent::Resize => {
                terminal.draw(|f| ui(&mut app, f)).unwrap();
            }
            ChartEvent::Key(key) => {
                if !app.on_key(key) {
                    quit = true;
                    break;
                }
                terminal.draw(|f| ui(&mut app, f)).unwrap();
            }
        }
    }

    assert!(quit, "viewer should have quit on Esc");
    assert!(!app.show_excluded);
    assert_eq!(app.state, AppState::Table);
    // two buckets fit on screen, so scrolling is clamped back to the top
    assert_eq!(app.scroll_offset, 0);
}

#[test]
fn headless_viewer_stops_when_input_closes() {
    let mut app = app();
    let mut terminal = Terminal::new(TestBackend::new(90, 24)).unwrap();

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(rx, Duration::from_millis(1));
    tx.send(press(KeyCode::Char('s'))).unwrap();
    drop(tx);

    let mut steps = 0;
    loop {
        steps += 1;
        assert!(steps < 10, "viewer kept running after input closed");
        match runner.step() {
            ChartEvent::Closed => break,
            ChartEvent::Key(key) => {
                assert!(app.on_key(key));
                terminal.draw(|f| ui(&mut app, f)).unwrap();
            }
            ChartEvent::Tick | ChartEvent::Resize => {}
        }
    }
    assert!(!app.show_scatter);
}

#[test]
fn time_chart_buckets_are_biweekly() {
    let app = app();
    assert_eq!(app.output.kept.len(), 2);
    assert_eq!(app.output.excluded.len(), 1);
    // 2024-02-11 and 2024-02-25 sit in neighbouring 14-day periods
    assert_eq!(app.output.buckets.len(), 2);
}
