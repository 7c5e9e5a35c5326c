use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use tracing::warn;

pub enum AppEvent {
    Key(KeyEvent),
    /// No input arrived within one tick; time for the orchestrator to poll.
    Tick,
    Resize,
}

/// Reads terminal events on a background thread and turns silence into ticks.
pub struct EventHandler {
    rx: mpsc::Receiver<AppEvent>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            loop {
                let ready = match event::poll(tick_rate) {
                    Ok(ready) => ready,
                    Err(err) => {
                        warn!(%err, "terminal event poll failed");
                        return;
                    }
                };
                let app_event = if !ready {
                    AppEvent::Tick
                } else {
                    match event::read() {
                        // Release/repeat events only show up with keyboard enhancement.
                        Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => AppEvent::Key(key),
                        Ok(Event::Resize(_, _)) => AppEvent::Resize,
                        Ok(_) => continue,
                        Err(err) => {
                            warn!(%err, "terminal event read failed");
                            return;
                        }
                    }
                };
                if tx.send(app_event).is_err() {
                    return;
                }
            }
        });

        Self { rx }
    }

    pub fn next(&self) -> anyhow::Result<AppEvent> {
        Ok(self.rx.recv()?)
    }
}
