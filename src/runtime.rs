use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent};

/// Events fed to the game loop. A `Tick` carries the clock value the
/// frame was stamped with, so the engine never reads time itself and
/// tests can replay an exact schedule.
#[derive(Clone, Debug)]
pub enum JamEvent {
    Key(KeyEvent),
    Resize,
    Tick(f64),
}

/// Where key/resize events come from; the frame loop supplies ticks.
pub trait JamEventSource: Send + 'static {
    /// Wait up to `timeout` for a queued event.
    fn recv_timeout(&self, timeout: Duration) -> Result<JamEvent, RecvTimeoutError>;
}

/// Monotonic clock behind the `now_ms` values the engine scores
/// against. Relative to its own origin, never the wall clock.
#[derive(Clone, Copy, Debug)]
pub struct WallClock {
    origin: Instant,
}

impl WallClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    pub fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Terminal-backed source: a reader thread forwards crossterm key and
/// resize events until the receiving side goes away.
pub struct CrosstermEventSource {
    rx: Receiver<JamEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || Self::forward_events(tx));
        Self { rx }
    }

    fn forward_events(tx: Sender<JamEvent>) {
        loop {
            let forwarded = match event::read() {
                Ok(CtEvent::Key(key)) => tx.send(JamEvent::Key(key)),
                Ok(CtEvent::Resize(_, _)) => tx.send(JamEvent::Resize),
                Ok(_) => Ok(()),
                Err(_) => break,
            };
            if forwarded.is_err() {
                break;
            }
        }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl JamEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<JamEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Channel-fed source for tests; queued events, ticks included, are
/// replayed in order.
pub struct TestEventSource {
    rx: Receiver<JamEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<JamEvent>) -> Self {
        Self { rx }
    }
}

impl JamEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<JamEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Paces the game: input events are drained as they arrive, and a
/// clock-stamped `Tick` is emitted whenever a frame passes without
/// one. Owns the clock, so hit handlers ask it for `now_ms` too.
pub struct FrameLoop<E: JamEventSource> {
    source: E,
    frame: Duration,
    clock: WallClock,
}

impl<E: JamEventSource> FrameLoop<E> {
    pub fn new(source: E, frame: Duration) -> Self {
        Self {
            source,
            frame,
            clock: WallClock::new(),
        }
    }

    pub fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }

    /// Next event to handle: a queued input event, or a stamped tick
    /// once the frame budget expires (a closed source also ticks, so
    /// the loop keeps rendering).
    pub fn next_event(&self) -> JamEvent {
        match self.source.recv_timeout(self.frame) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                JamEvent::Tick(self.clock.now_ms())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use std::sync::mpsc;

    #[test]
    fn empty_source_ticks_with_a_clock_stamp() {
        let (_tx, rx) = mpsc::channel();
        let frames = FrameLoop::new(TestEventSource::new(rx), Duration::from_millis(1));

        match frames.next_event() {
            JamEvent::Tick(now_ms) => assert!(now_ms >= 0.0),
            other => panic!("expected a stamped Tick, got {other:?}"),
        }
    }

    #[test]
    fn queued_events_are_replayed_in_order() {
        let (tx, rx) = mpsc::channel();
        tx.send(JamEvent::Key(KeyEvent::new(
            KeyCode::Char('a'),
            KeyModifiers::NONE,
        )))
        .unwrap();
        tx.send(JamEvent::Tick(250.0)).unwrap();

        let frames = FrameLoop::new(TestEventSource::new(rx), Duration::from_millis(10));

        match frames.next_event() {
            JamEvent::Key(key) => assert_eq!(key.code, KeyCode::Char('a')),
            other => panic!("expected the queued key first, got {other:?}"),
        }
        // a replayed tick keeps its synthetic stamp
        match frames.next_event() {
            JamEvent::Tick(now_ms) => assert_eq!(now_ms, 250.0),
            other => panic!("expected the queued tick, got {other:?}"),
        }
    }

    #[test]
    fn wall_clock_is_monotonic() {
        let clock = WallClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
        assert!(a >= 0.0);
    }
}
