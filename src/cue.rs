use std::io::{self, Write};

/// External collaborator fired on every beat pulse. The engine never
/// calls this itself; the event loop forwards the edge-triggered
/// pulse from the tick report.
pub trait BeatCue {
    fn beat(&mut self);
}

/// Rings the terminal bell on each beat; most terminals map it to a
/// short click or a visual flash.
#[derive(Debug)]
pub struct TerminalBell {
    enabled: bool,
}

impl TerminalBell {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
    }
}

impl BeatCue for TerminalBell {
    fn beat(&mut self) {
        if !self.enabled {
            return;
        }
        let mut out = io::stdout();
        let _ = out.write_all(b"\x07");
        let _ = out.flush();
    }
}

/// Silent cue for headless runs and tests.
#[derive(Debug, Default)]
pub struct NullCue {
    pub beats: u32,
}

impl BeatCue for NullCue {
    fn beat(&mut self) {
        self.beats += 1;
    }
}
