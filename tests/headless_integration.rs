use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use beatrock::cue::{BeatCue, NullCue};
use beatrock::jam::{Jam, LEAD_IN_MS};
use beatrock::runtime::{FrameLoop, JamEvent, TestEventSource};
use beatrock::session::{RoundConfig, RoundPhase};

// Headless integration using the internal runtime + Jam without a TTY.
// Every tick is pre-queued with its own clock stamp, so the whole
// round replays deterministically and no real time passes.

const FRAME_MS: f64 = 16.0;

fn hit_key(c: char) -> JamEvent {
    JamEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

/// Frames at a steady 16ms cadence with the two hit keys spliced in
/// right after the frame they should score against.
fn scripted_round() -> Vec<JamEvent> {
    let mut events = Vec::new();
    let mut sent_first = false;
    let mut sent_second = false;
    let mut now_ms = 0.0;
    while now_ms < LEAD_IN_MS + 2100.0 {
        now_ms += FRAME_MS;
        events.push(JamEvent::Tick(now_ms));
        let elapsed = now_ms - LEAD_IN_MS;
        if !sent_first && elapsed >= 0.0 {
            events.push(hit_key('a'));
            sent_first = true;
        }
        if !sent_second && elapsed >= 500.0 {
            events.push(hit_key('l'));
            sent_second = true;
        }
    }
    events
}

#[test]
fn headless_round_scores_key_hits() {
    let mut jam = Jam::new(RoundConfig {
        bpm: 120,
        round_secs: 2,
        player_count: 2,
    });
    jam.start(0.0).unwrap();

    let (tx, rx) = mpsc::channel();
    for event in scripted_round() {
        tx.send(event).unwrap();
    }
    let frames = FrameLoop::new(TestEventSource::new(rx), Duration::from_millis(1));
    let mut cue = NullCue::default();

    // hits are scored at the stamp of the frame that delivered them
    let mut now_ms = 0.0;
    loop {
        match frames.next_event() {
            JamEvent::Tick(t) => {
                now_ms = t;
                let report = jam.on_tick(now_ms);
                if report.pulse {
                    cue.beat();
                }
                if report.ended {
                    break;
                }
            }
            JamEvent::Key(key) => {
                if let KeyCode::Char(c) = key.code {
                    let player = match c {
                        'a' => 0,
                        'l' => 1,
                        _ => continue,
                    };
                    jam.register_hit(player, now_ms);
                }
            }
            JamEvent::Resize => {}
        }
    }

    assert_eq!(jam.phase(), RoundPhase::Ended);
    // a 2s round at 120 bpm schedules beats 0..=3: four pulses
    assert_eq!(cue.beats, 4);

    // both hits landed within a frame of their beat: perfect window
    assert_eq!(jam.players[0].score, 3);
    assert_eq!(jam.players[1].score, 3);
    assert!(jam.winner.is_some());
    assert_eq!(jam.winner.as_ref().unwrap().label, "Tie!");
}

#[test]
fn headless_stop_key_ends_the_round() {
    let mut jam = Jam::new(RoundConfig {
        bpm: 112,
        round_secs: 60,
        player_count: 2,
    });
    jam.start(0.0).unwrap();

    let (tx, rx) = mpsc::channel();
    tx.send(JamEvent::Tick(100.0)).unwrap();
    tx.send(JamEvent::Key(KeyEvent::new(
        KeyCode::Esc,
        KeyModifiers::NONE,
    )))
    .unwrap();

    let frames = FrameLoop::new(TestEventSource::new(rx), Duration::from_millis(1));

    for _ in 0..10u32 {
        match frames.next_event() {
            JamEvent::Key(key) if key.code == KeyCode::Esc => {
                jam.stop();
                break;
            }
            JamEvent::Tick(now_ms) => {
                jam.on_tick(now_ms);
            }
            _ => {}
        }
    }

    assert_eq!(jam.phase(), RoundPhase::Ended);
    assert!(jam.winner.is_some(), "stop settles a winner");
}

#[test]
fn headless_round_with_no_input_has_scoreless_tie() {
    let mut jam = Jam::new(RoundConfig {
        bpm: 160,
        round_secs: 1,
        player_count: 3,
    });
    jam.start(0.0).unwrap();

    let mut now_ms = 0.0;
    loop {
        now_ms += FRAME_MS;
        if jam.on_tick(now_ms).ended {
            break;
        }
    }

    assert_eq!(jam.players.iter().map(|p| p.score).max(), Some(0));
    let winner = jam.winner.as_ref().unwrap();
    assert_eq!(winner.label, "Tie!");
    assert_eq!(winner.score, 0);
}
