use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

/// What the viewer loop reacts to
#[derive(Clone, Debug)]
pub enum ChartEvent {
    Key(KeyEvent),
    /// Terminal size changed; redraw
    Resize,
    /// Nothing happened within one tick
    Tick,
    /// Input is gone for good, so the viewer should close
    Closed,
}

/// Translate a raw terminal event. Key releases and repeats, focus and mouse
/// events are dropped so the viewer only sees presses.
fn translate(event: Event) -> Option<ChartEvent> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(ChartEvent::Key(key)),
        Event::Resize(_, _) => Some(ChartEvent::Resize),
        _ => None,
    }
}

/// Pulls viewer events off a channel, one tick at a time
pub struct Runner {
    rx: Receiver<ChartEvent>,
    tick_rate: Duration,
}

impl Runner {
    /// Runner fed by whatever the caller sends; the viewer closes once every
    /// sender is dropped
    pub fn new(rx: Receiver<ChartEvent>, tick_rate: Duration) -> Self {
        Self { rx, tick_rate }
    }

    /// Runner fed from the real terminal by a background reader thread
    pub fn from_terminal(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let chart_event = match event::read() {
                Ok(raw) => match translate(raw) {
                    Some(chart_event) => chart_event,
                    None => continue,
                },
                Err(e) => {
                    log::error!("terminal input failed: {e}");
                    break;
                }
            };
            if tx.send(chart_event).is_err() {
                break;
            }
        });

        Self::new(rx, tick_rate)
    }

    /// Wait up to one tick for the next event
    pub fn step(&self) -> ChartEvent {
        match self.rx.recv_timeout(self.tick_rate) {
            Ok(chart_event) => chart_event,
            Err(RecvTimeoutError::Timeout) => ChartEvent::Tick,
            Err(RecvTimeoutError::Disconnected) => ChartEvent::Closed,
        }
    }
}
