use crate::judge::Judgment;
use crate::session::{ConfigError, RoundConfig, RoundPhase};
use itertools::Itertools;

/// Delay between `start` and the first scheduled beat; the UI shows a
/// countdown during this window and no hits can score (elapsed < 0).
pub const LEAD_IN_MS: f64 = 1500.0;

/// Fixed palette cycled over player ids (rgb).
pub const PLAYER_COLORS: [(u8, u8, u8); 4] = [
    (0xFF, 0x7A, 0x00),
    (0x00, 0xC2, 0xA8),
    (0x3A, 0x86, 0xFF),
    (0xFF, 0xD1, 0x66),
];

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub id: usize,
    pub name: String,
    pub color: (u8, u8, u8),
    pub score: u32,
    pub streak: u32,
    pub best_streak: u32,
    pub last_hit: String,
    /// Highest beat index this player has claimed; monotonically
    /// non-decreasing, so a beat can never be scored twice.
    pub last_beat: i64,
}

impl Player {
    fn new(id: usize) -> Self {
        Self {
            id,
            name: format!("Player {}", id + 1),
            color: PLAYER_COLORS[id % PLAYER_COLORS.len()],
            score: 0,
            streak: 0,
            best_streak: 0,
            last_hit: String::new(),
            last_beat: -1,
        }
    }

    /// Clears per-round counters; the name survives across rounds.
    fn reset_round(&mut self) {
        self.score = 0;
        self.streak = 0;
        self.best_streak = 0;
        self.last_hit.clear();
        self.last_beat = -1;
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitOutcome {
    pub judgment: Judgment,
    pub points: u32,
    pub offset_ms: f64,
}

/// Snapshot published to the UI on every frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickReport {
    /// Progress through the current beat, in [0, 1).
    pub beat_phase: f64,
    /// Whole seconds until the first beat; 0 once the round is live.
    pub countdown_secs: u32,
    /// True exactly once per beat index (edge-triggered).
    pub pulse: bool,
    pub time_remaining_secs: u32,
    pub ended: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Winner {
    pub label: String,
    pub score: u32,
}

/// Beat clock and scoring engine for one jam session. Owns the player
/// roster and the derived beat schedule; the UI layer only reads
/// published snapshots and calls in on input events.
#[derive(Debug)]
pub struct Jam {
    pub config: RoundConfig,
    pub players: Vec<Player>,
    pub winner: Option<Winner>,
    phase: RoundPhase,
    start_at_ms: f64,
    end_at_ms: f64,
    beat_interval_ms: f64,
    last_beat_index: i64,
}

impl Jam {
    pub fn new(config: RoundConfig) -> Self {
        let players = (0..config.player_count).map(Player::new).collect();
        Self {
            config,
            players,
            winner: None,
            phase: RoundPhase::Idle,
            start_at_ms: 0.0,
            end_at_ms: 0.0,
            beat_interval_ms: config.beat_interval_ms(),
            last_beat_index: -1,
        }
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase.is_running()
    }

    pub fn beat_interval_ms(&self) -> f64 {
        self.beat_interval_ms
    }

    /// Begin a round at `now_ms`. The first beat lands after the
    /// lead-in; per-round player state is reset, names are kept.
    pub fn start(&mut self, now_ms: f64) -> Result<(), ConfigError> {
        self.config.validate()?;

        for player in &mut self.players {
            player.reset_round();
        }
        self.winner = None;
        self.beat_interval_ms = self.config.beat_interval_ms();
        self.start_at_ms = now_ms + LEAD_IN_MS;
        self.end_at_ms = self.start_at_ms + self.config.round_ms();
        self.last_beat_index = -1;
        self.phase = RoundPhase::LeadIn;

        log::info!(
            "round started: {} bpm, {}s, {} players",
            self.config.bpm,
            self.config.round_secs,
            self.players.len()
        );
        Ok(())
    }

    /// Ends a running round early and settles the winner.
    pub fn stop(&mut self) {
        if !self.is_running() {
            return;
        }
        self.phase = RoundPhase::Ended;
        self.winner = self.compute_winner();
        log::info!("round stopped");
    }

    /// Advance the clock one frame. Frame gaps are irregular, so the
    /// beat index is always recomputed from absolute elapsed time;
    /// the pulse flag is an edge trigger on the observed index.
    pub fn on_tick(&mut self, now_ms: f64) -> TickReport {
        if !self.is_running() {
            return TickReport {
                ended: self.phase == RoundPhase::Ended,
                ..TickReport::default()
            };
        }

        if now_ms >= self.end_at_ms {
            self.phase = RoundPhase::Ended;
            self.winner = self.compute_winner();
            log::info!("round ended");
            return TickReport {
                ended: true,
                ..TickReport::default()
            };
        }

        let time_remaining_secs = ((self.end_at_ms - now_ms) / 1000.0).ceil().max(0.0) as u32;

        if now_ms < self.start_at_ms {
            return TickReport {
                beat_phase: 0.0,
                countdown_secs: ((self.start_at_ms - now_ms) / 1000.0).ceil() as u32,
                pulse: false,
                time_remaining_secs,
                ended: false,
            };
        }

        self.phase = RoundPhase::Active;
        let elapsed = now_ms - self.start_at_ms;
        let beat_index = (elapsed / self.beat_interval_ms).floor() as i64;
        let pulse = beat_index != self.last_beat_index;
        if pulse {
            self.last_beat_index = beat_index;
            log::trace!("beat {beat_index}");
        }

        TickReport {
            beat_phase: (elapsed % self.beat_interval_ms) / self.beat_interval_ms,
            countdown_secs: 0,
            pulse,
            time_remaining_secs,
            ended: false,
        }
    }

    /// Score a hit for `player_id` at `now_ms` against the nearest
    /// scheduled beat. Returns None when nothing changed: round not
    /// running, hit outside the round window, unknown player, or the
    /// nearest beat already claimed by this player.
    pub fn register_hit(&mut self, player_id: usize, now_ms: f64) -> Option<HitOutcome> {
        if !self.is_running() {
            return None;
        }

        let elapsed = now_ms - self.start_at_ms;
        if elapsed < 0.0 || elapsed > self.config.round_ms() {
            return None;
        }

        let interval = self.beat_interval_ms;
        let nearest = (elapsed / interval).round() as i64;
        let offset_ms = (elapsed - nearest as f64 * interval).abs();

        let player = self.players.get_mut(player_id)?;
        if nearest <= player.last_beat {
            return None;
        }

        let judgment = Judgment::classify(offset_ms);
        let points = judgment.points();
        if judgment.is_hit() {
            player.score += points;
            player.streak += 1;
            player.best_streak = player.best_streak.max(player.streak);
            player.last_hit = format!("{} +{} ({}ms)", judgment, points, offset_ms.round());
        } else {
            player.streak = 0;
            player.last_hit = judgment.to_string();
        }
        player.last_beat = nearest;

        log::debug!(
            "player {} beat {}: {} ({:.1}ms off)",
            player_id,
            nearest,
            judgment,
            offset_ms
        );
        Some(HitOutcome {
            judgment,
            points,
            offset_ms,
        })
    }

    pub fn rename_player(&mut self, player_id: usize, name: &str) {
        if let Some(player) = self.players.get_mut(player_id) {
            player.name = name.to_string();
        }
    }

    /// Tempo changes are only honored between rounds; the schedule of
    /// a live round never moves under the players.
    pub fn set_tempo(&mut self, bpm: u16) {
        if self.is_running() {
            return;
        }
        self.config.bpm = bpm;
    }

    pub fn set_round_secs(&mut self, secs: u32) {
        if self.is_running() {
            return;
        }
        self.config.round_secs = secs;
    }

    /// Grow or shrink the roster between rounds. Existing players
    /// keep their names; new seats get defaults.
    pub fn set_player_count(&mut self, count: usize) {
        if self.is_running() {
            return;
        }
        self.config.player_count = count;
        if count < self.players.len() {
            self.players.truncate(count);
        } else {
            for id in self.players.len()..count {
                self.players.push(Player::new(id));
            }
        }
    }

    /// Current front-runner (first player at the top score), shown in
    /// the header while a round is live.
    pub fn leader(&self) -> Option<&Player> {
        self.players
            .iter()
            .reduce(|top, player| if player.score > top.score { player } else { top })
    }

    fn compute_winner(&self) -> Option<Winner> {
        let champs = self.players.iter().max_set_by_key(|player| player.score);
        match champs.as_slice() {
            [] => None,
            [solo] => Some(Winner {
                label: format!("{} wins!", solo.name),
                score: solo.score,
            }),
            [first, ..] => Some(Winner {
                label: "Tie!".to_string(),
                score: first.score,
            }),
        }
    }
}
