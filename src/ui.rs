use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use beatrock::jam::Player;
use beatrock::session::RoundPhase;
use beatrock::util::format_time;

use crate::{App, KEY_HINTS};

const HORIZONTAL_MARGIN: u16 = 2;
const VERTICAL_MARGIN: u16 = 1;

fn player_color(player: &Player) -> Color {
    let (r, g, b) = player.color;
    Color::Rgb(r, g, b)
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let accent_style = Style::default().patch(bold_style).fg(Color::Rgb(255, 122, 0));

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints(
                [
                    Constraint::Length(2),
                    Constraint::Length(3),
                    Constraint::Length(2),
                    Constraint::Min(7),
                ]
                .as_ref(),
            )
            .split(area);

        self.render_header(chunks[0], buf, bold_style, dim_style);
        self.render_beat_zone(chunks[1], chunks[2], buf, accent_style, dim_style);
        self.render_players(chunks[3], buf, bold_style, dim_style);
    }
}

impl App {
    fn render_header(&self, area: Rect, buf: &mut Buffer, bold_style: Style, dim_style: Style) {
        let leader = self
            .jam
            .leader()
            .map(|p| p.name.clone())
            .unwrap_or_else(|| "None".to_string());

        let header = Line::from(vec![
            Span::styled("BEAT ROCK", bold_style.fg(Color::Rgb(255, 122, 0))),
            Span::styled("  Time ", dim_style),
            Span::styled(format_time(self.report.time_remaining_secs), bold_style),
            Span::styled("  BPM ", dim_style),
            Span::styled(self.jam.config.bpm.to_string(), bold_style),
            Span::styled("  Leader ", dim_style),
            Span::styled(leader, bold_style),
            Span::styled("  Bell ", dim_style),
            Span::styled(if self.bell.is_enabled() { "on" } else { "off" }, bold_style),
        ]);

        Paragraph::new(header)
            .alignment(Alignment::Center)
            .render(area, buf);
    }

    fn render_beat_zone(
        &self,
        gauge_area: Rect,
        info_area: Rect,
        buf: &mut Buffer,
        accent_style: Style,
        dim_style: Style,
    ) {
        Gauge::default()
            .block(Block::default().borders(Borders::ALL).title("beat"))
            .gauge_style(accent_style)
            .ratio(self.report.beat_phase.clamp(0.0, 1.0))
            .label("")
            .render(gauge_area, buf);

        let info = match self.jam.phase() {
            RoundPhase::Idle => Line::from(Span::styled(
                "Enter starts a jam · ↑/↓ tempo · ←/→ length · 1-4 players · A/L/S/K hit the beat · B bell · Esc quits",
                dim_style,
            )),
            RoundPhase::LeadIn => Line::from(Span::styled(
                format!("Starting in {}", self.report.countdown_secs),
                accent_style,
            )),
            RoundPhase::Active => Line::from(Span::styled("Hit when the bar peaks.", dim_style)),
            RoundPhase::Ended => match &self.jam.winner {
                Some(winner) => Line::from(Span::styled(
                    format!("{} Score {}  ·  Enter for a rematch", winner.label, winner.score),
                    accent_style,
                )),
                None => Line::from(Span::styled("No winner this time.", dim_style)),
            },
        };

        Paragraph::new(info)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(info_area, buf);
    }

    fn render_players(&self, area: Rect, buf: &mut Buffer, bold_style: Style, dim_style: Style) {
        if self.jam.players.is_empty() {
            return;
        }

        let share = (100 / self.jam.players.len()) as u16;
        let constraints = self
            .jam
            .players
            .iter()
            .map(|_| Constraint::Percentage(share))
            .collect::<Vec<_>>();

        let cards = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area);

        for (player, card) in self.jam.players.iter().zip(cards.iter()) {
            let color = player_color(player);
            let name = clip_name(&player.name, card.width.saturating_sub(4) as usize);
            let hint = KEY_HINTS
                .get(player.id)
                .map(|k| format!("key {}", k.to_uppercase()))
                .unwrap_or_default();

            let lines = vec![
                Line::from(Span::styled(hint, dim_style)),
                Line::from(Span::styled(
                    player.score.to_string(),
                    bold_style.fg(color).add_modifier(Modifier::UNDERLINED),
                )),
                Line::from(Span::styled(
                    format!("Streak {} | Best {}", player.streak, player.best_streak),
                    dim_style,
                )),
                Line::from(if player.last_hit.is_empty() {
                    Span::styled("Wait for the beat", dim_style)
                } else {
                    Span::styled(player.last_hit.clone(), bold_style)
                }),
            ];

            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(color))
                        .title(Span::styled(name, bold_style.fg(color))),
                )
                .render(*card, buf);
        }
    }
}

/// Keep card titles inside the border when names run long.
fn clip_name(name: &str, max_width: usize) -> String {
    if name.width() <= max_width {
        return name.to_string();
    }
    let mut clipped = String::new();
    for c in name.chars() {
        if clipped.width() + 1 > max_width.saturating_sub(1) {
            clipped.push('…');
            break;
        }
        clipped.push(c);
    }
    clipped
}
