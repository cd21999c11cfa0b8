pub mod ui;

use beatrock::{
    config::{Config, ConfigStore, FileConfigStore},
    cue::{BeatCue, TerminalBell},
    jam::{Jam, TickReport},
    runtime::{CrosstermEventSource, FrameLoop, JamEvent},
    session::{RoundConfig, MAX_PLAYERS},
};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::Duration,
};

const FRAME_MS: u64 = 16;

/// Between-round adjustment bounds and steps (the original exposes
/// 80-160 bpm on a slider; the keys allow a wider band).
const BPM_STEP: u16 = 4;
const BPM_MIN: u16 = 40;
const BPM_MAX: u16 = 240;
const ROUND_STEP_SECS: u32 = 15;
const ROUND_MIN_SECS: u32 = 15;
const ROUND_MAX_SECS: u32 = 180;

/// Hit keys by player id, as printed on the player cards.
pub const KEY_HINTS: [char; 4] = ['a', 'l', 's', 'k'];

/// multiplayer tap-to-the-beat party game for the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Land hits on the pulse and stack streaks. Up to four players share one keyboard; the closer to the beat, the more points."
)]
pub struct Cli {
    /// tempo in beats per minute
    #[clap(short, long)]
    bpm: Option<u16>,

    /// round length in seconds
    #[clap(short = 's', long)]
    seconds: Option<u32>,

    /// number of players sharing the keyboard
    #[clap(short, long, value_parser = clap::value_parser!(u8).range(1..=MAX_PLAYERS as i64))]
    players: Option<u8>,

    /// comma-separated player names, in key order (A, L, S, K)
    #[clap(short, long)]
    names: Option<String>,

    /// turn the beat bell off (remembered for future runs)
    #[clap(long)]
    mute: bool,

    /// turn the beat bell back on (remembered for future runs)
    #[clap(long, conflicts_with = "mute")]
    sound: bool,
}

impl Cli {
    /// CLI flags override whatever the config file remembers; without
    /// either bell flag the stored preference stands.
    fn resolve(&self, stored: Config) -> Config {
        Config {
            bpm: self.bpm.unwrap_or(stored.bpm),
            round_secs: self.seconds.unwrap_or(stored.round_secs),
            players: self
                .players
                .map(usize::from)
                .unwrap_or(stored.players)
                .clamp(1, MAX_PLAYERS),
            sound: if self.mute {
                false
            } else if self.sound {
                true
            } else {
                stored.sound
            },
        }
    }
}

#[derive(Debug)]
pub struct App {
    pub jam: Jam,
    pub report: TickReport,
    pub bell: TerminalBell,
}

impl App {
    pub fn new(round: RoundConfig, sound: bool, names: Option<&str>) -> Self {
        let mut jam = Jam::new(round);
        if let Some(names) = names {
            apply_names(&mut jam, names);
        }
        let report = idle_report(&jam.config);
        Self {
            jam,
            report,
            bell: TerminalBell::new(sound),
        }
    }
}

/// Snapshot shown before a round starts: full round length on the
/// clock, nothing in motion.
fn idle_report(round: &RoundConfig) -> TickReport {
    TickReport {
        time_remaining_secs: round.round_secs,
        ..TickReport::default()
    }
}

fn apply_names(jam: &mut Jam, names: &str) {
    for (id, name) in names.split(',').map(str::trim).enumerate() {
        if !name.is_empty() {
            jam.rename_player(id, name);
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileConfigStore::new();
    let cfg = cli.resolve(store.load());
    let round = RoundConfig {
        bpm: cfg.bpm,
        round_secs: cfg.round_secs,
        player_count: cfg.players,
    };
    if let Err(e) = round.validate() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::ValueValidation, e).exit();
    }
    let _ = store.save(&cfg);

    let mut app = App::new(round, cfg.sound, cli.names.as_deref());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let frames = FrameLoop::new(
        CrosstermEventSource::new(),
        Duration::from_millis(FRAME_MS),
    );

    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    loop {
        match frames.next_event() {
            JamEvent::Tick(now_ms) => {
                if app.jam.is_running() {
                    app.report = app.jam.on_tick(now_ms);
                    if app.report.pulse {
                        app.bell.beat();
                    }
                    terminal.draw(|f| f.render_widget(&*app, f.area()))?;
                }
            }
            JamEvent::Resize => {
                terminal.draw(|f| f.render_widget(&*app, f.area()))?;
            }
            JamEvent::Key(key) => {
                match key.code {
                    KeyCode::Esc => {
                        if app.jam.is_running() {
                            app.jam.stop();
                            app.report = TickReport {
                                ended: true,
                                ..TickReport::default()
                            };
                        } else {
                            break;
                        }
                    }
                    KeyCode::Enter => {
                        if !app.jam.is_running() {
                            app.jam.start(frames.now_ms())?;
                            app.report = idle_report(&app.jam.config);
                        }
                    }
                    KeyCode::Up if !app.jam.is_running() => {
                        let bpm = app.jam.config.bpm.saturating_add(BPM_STEP).min(BPM_MAX);
                        app.jam.set_tempo(bpm);
                    }
                    KeyCode::Down if !app.jam.is_running() => {
                        let bpm = app.jam.config.bpm.saturating_sub(BPM_STEP).max(BPM_MIN);
                        app.jam.set_tempo(bpm);
                    }
                    KeyCode::Right if !app.jam.is_running() => {
                        let secs = app
                            .jam
                            .config
                            .round_secs
                            .saturating_add(ROUND_STEP_SECS)
                            .min(ROUND_MAX_SECS);
                        app.jam.set_round_secs(secs);
                        app.report = idle_report(&app.jam.config);
                    }
                    KeyCode::Left if !app.jam.is_running() => {
                        let secs = app
                            .jam
                            .config
                            .round_secs
                            .saturating_sub(ROUND_STEP_SECS)
                            .max(ROUND_MIN_SECS);
                        app.jam.set_round_secs(secs);
                        app.report = idle_report(&app.jam.config);
                    }
                    KeyCode::Char(c) => {
                        if c == 'c' && key.modifiers.contains(KeyModifiers::CONTROL) {
                            break;
                        }
                        let c = c.to_ascii_lowercase();
                        if c == 'b' {
                            app.bell.toggle();
                        } else if let Some(count) = c.to_digit(10) {
                            let count = count as usize;
                            if !app.jam.is_running() && (1..=MAX_PLAYERS).contains(&count) {
                                app.jam.set_player_count(count);
                            }
                        } else if let Some(id) = KEY_HINTS.iter().position(|&k| k == c) {
                            if id < app.jam.players.len() {
                                app.jam.register_hit(id, frames.now_ms());
                            }
                        }
                    }
                    _ => {}
                }
                terminal.draw(|f| f.render_widget(&*app, f.area()))?;
            }
        }
    }

    Ok(())
}
