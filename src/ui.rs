pub mod screen;

use handhit::geometry::{Canvas, Circle};
use handhit::landmark::HandSide;
use handhit::session::{Phase, Tallies};
use handhit::target::TargetState;
use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{self, Points},
        Block, Borders, Clear, Paragraph, Widget,
    },
};
use unicode_width::UnicodeWidthStr;

use crate::{App, Mode};

const HORIZONTAL_MARGIN: u16 = 2;
const LOW_TIME_SECS: u32 = 10;
const ORANGE: Color = Color::Rgb(255, 165, 0);

/// hud, legend, board, footer
fn split(area: Rect) -> [Rect; 4] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2], chunks[3]]
}

fn board_block(title: &str) -> Block<'_> {
    Block::default().borders(Borders::ALL).title(title)
}

pub fn board_area(area: Rect) -> Rect {
    split(area)[2]
}

/// The cells the board's canvas occupies inside a terminal of `area`
pub fn board_inner(area: Rect) -> Rect {
    board_block("").inner(board_area(area))
}

/// Map a terminal cell to normalized canvas coordinates, `None` outside the board
pub fn normalize_cell(col: u16, row: u16, inner: Rect) -> Option<(f64, f64)> {
    if inner.width == 0 || inner.height == 0 {
        return None;
    }
    if col < inner.x || row < inner.y || col >= inner.right() || row >= inner.bottom() {
        return None;
    }
    let x = ((col - inner.x) as f64 + 0.5) / inner.width as f64;
    let y = ((row - inner.y) as f64 + 0.5) / inner.height as f64;
    Some((x, y))
}

fn state_color(state: TargetState) -> Color {
    match state {
        TargetState::Idle => Color::DarkGray,
        TargetState::ArmedPrimary => Color::Magenta,
        TargetState::ArmedSecondary => Color::Red,
        TargetState::Correct => Color::Yellow,
        TargetState::Incorrect => ORANGE,
    }
}

fn hand_color(side: HandSide) -> Color {
    match side {
        HandSide::Left => Color::Magenta,
        HandSide::Right => Color::Red,
    }
}

/// Something round to draw; filled discs become concentric rings
struct Disc {
    circle: Circle,
    color: Color,
    filled: bool,
    label: Option<&'static str>,
}

fn render_board(
    title: &str,
    discs: &[Disc],
    pointer: &[(HandSide, f64, f64)],
    world: Canvas,
    area: Rect,
    buf: &mut Buffer,
) {
    // canvas y grows upwards, landmark y grows downwards
    let flip = |y: f64| world.height - y;
    let hands: Vec<(Color, Vec<(f64, f64)>)> = [HandSide::Left, HandSide::Right]
        .into_iter()
        .map(|side| {
            let coords = pointer
                .iter()
                .filter(|(s, _, _)| *s == side)
                .map(|(_, x, y)| (x * world.width, flip(y * world.height)))
                .collect();
            (hand_color(side), coords)
        })
        .collect();

    canvas::Canvas::default()
        .block(board_block(title))
        .marker(Marker::Braille)
        .x_bounds([0.0, world.width])
        .y_bounds([0.0, world.height])
        .paint(|ctx| {
            for disc in discs {
                let rings = if disc.filled {
                    (disc.circle.radius / 6.0).ceil() as usize
                } else {
                    1
                };
                for ring in 0..rings {
                    ctx.draw(&canvas::Circle {
                        x: disc.circle.center.x,
                        y: flip(disc.circle.center.y),
                        radius: (disc.circle.radius - ring as f64 * 6.0).max(1.0),
                        color: disc.color,
                    });
                }
            }
            ctx.layer();
            for disc in discs {
                if let Some(label) = disc.label {
                    ctx.print(
                        disc.circle.center.x,
                        flip(disc.circle.center.y),
                        Span::styled(label, Style::default().add_modifier(Modifier::BOLD)),
                    );
                }
            }
            for (color, coords) in &hands {
                ctx.draw(&Points {
                    coords,
                    color: *color,
                });
            }
        })
        .render(area, buf);
}

/// Boxed message centered over `area`
pub fn render_overlay(lines: &[(String, Style)], area: Rect, buf: &mut Buffer) {
    let width = lines
        .iter()
        .map(|(text, _)| UnicodeWidthStr::width(text.as_str()))
        .max()
        .unwrap_or(0) as u16
        + 4;
    let height = lines.len() as u16 + 2;
    let rect = Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width: width.min(area.width),
        height: height.min(area.height),
    };

    Clear.render(rect, buf);
    Paragraph::new(
        lines
            .iter()
            .map(|(text, style)| Line::from(Span::styled(text.clone(), *style)))
            .collect::<Vec<Line>>(),
    )
    .block(Block::default().borders(Borders::ALL))
    .alignment(Alignment::Center)
    .render(rect, buf);
}

pub fn start_message() -> Vec<(String, Style)> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    vec![
        ("Hit as many targets as you can!".to_string(), bold.fg(Color::Yellow)),
        (String::new(), Style::default()),
        (
            "magenta: left hand   red: right hand".to_string(),
            Style::default(),
        ),
        ("(enter) start".to_string(), bold),
    ]
}

pub fn end_message(score: i64, tallies: &Tallies) -> Vec<(String, Style)> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut stats = vec![
        format!("{} correct", tallies.correct),
        format!("{} wrong hand", tallies.incorrect),
        format!("{} missed", tallies.expired),
    ];
    if let Some(acc) = tallies.accuracy() {
        stats.push(format!("{acc}% acc"));
    }
    let reaction = match tallies.reaction() {
        Some((mean, spread)) => format!("reaction {mean:.0} ms ± {spread:.0}"),
        None => "no correct hits".to_string(),
    };

    vec![
        ("Time's up!".to_string(), bold.fg(Color::Yellow)),
        (format!("score {score}"), bold),
        (stats.iter().join("   "), Style::default()),
        (reaction, Style::default().fg(Color::Cyan)),
        ("(r) play again / (esc)ape".to_string(), Style::default().add_modifier(Modifier::ITALIC)),
    ]
}

fn legend() -> Paragraph<'static> {
    let dot = |color: Color, text: &'static str| {
        [
            Span::styled("● ", Style::default().fg(color)),
            Span::raw(text),
        ]
    };
    Paragraph::new(Line::from(
        [
            dot(Color::Magenta, "left hand   "),
            dot(Color::Red, "right hand   "),
            dot(Color::Yellow, "correct   "),
            dot(ORANGE, "wrong hand"),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<Span>>(),
    ))
    .alignment(Alignment::Center)
}

fn footer(text: &'static str) -> Paragraph<'static> {
    Paragraph::new(Span::styled(
        text,
        Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM),
    ))
    .alignment(Alignment::Center)
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [hud_area, legend_area, board_area, footer_area] = split(area);
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let pointer: Vec<(HandSide, f64, f64)> = [HandSide::Left, HandSide::Right]
            .into_iter()
            .flat_map(|side| {
                self.last_frame
                    .hand(side)
                    .unwrap_or_default()
                    .iter()
                    .filter(|l| l.x.is_finite() && l.y.is_finite())
                    .map(move |l| (side, l.x, l.y))
            })
            .collect();

        match self.mode {
            Mode::Warmup => {
                Paragraph::new(Span::styled("warm-up: touch the pads", bold_style))
                    .alignment(Alignment::Center)
                    .render(hud_area, buf);
                legend().render(legend_area, buf);

                let discs: Vec<Disc> = self
                    .warmup
                    .pads()
                    .iter()
                    .map(|(circle, touched)| Disc {
                        circle: *circle,
                        color: touched.map(hand_color).unwrap_or(Color::DarkGray),
                        filled: touched.is_some(),
                        label: None,
                    })
                    .collect();
                render_board("warm-up", &discs, &pointer, *self.game.canvas(), board_area, buf);
                footer("(w) back to the game / (esc)ape / hold left or right mouse button to move a hand")
                    .render(footer_area, buf);
            }
            Mode::Play => {
                let snapshot = self.game.snapshot();
                let session = &snapshot.session;

                let time_style = if session.time_remaining <= LOW_TIME_SECS {
                    bold_style.fg(Color::Red)
                } else {
                    bold_style.fg(Color::Green)
                };
                Paragraph::new(Line::from(vec![
                    Span::styled(format!("score {}", session.score), bold_style),
                    Span::raw("   "),
                    Span::styled(format!("time {}s", session.time_remaining), time_style),
                ]))
                .alignment(Alignment::Center)
                .render(hud_area, buf);
                legend().render(legend_area, buf);

                let discs: Vec<Disc> = snapshot
                    .targets
                    .iter()
                    .map(|t| Disc {
                        circle: Circle {
                            center: t.center,
                            radius: t.radius,
                        },
                        color: state_color(t.state),
                        filled: t.state != TargetState::Idle,
                        label: t.state.matching_hand().map(|side| match side {
                            HandSide::Left => "L",
                            HandSide::Right => "R",
                        }),
                    })
                    .collect();
                render_board("targets", &discs, &pointer, *self.game.canvas(), board_area, buf);

                footer(match session.phase {
                    Phase::Ready => "(enter) start / (w) warm-up / (esc)ape",
                    Phase::Running => "(r) restart / (esc)ape / hold left or right mouse button to move a hand",
                    Phase::Ended => "(r) play again / (w) warm-up / (esc)ape",
                })
                .render(footer_area, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_cell_centers_on_cells() {
        let inner = Rect::new(1, 1, 10, 4);
        assert_eq!(normalize_cell(1, 1, inner), Some((0.05, 0.125)));
        assert_eq!(normalize_cell(10, 4, inner), Some((0.95, 0.875)));
    }

    #[test]
    fn normalize_cell_outside_board() {
        let inner = Rect::new(1, 1, 10, 4);
        assert_eq!(normalize_cell(0, 2, inner), None);
        assert_eq!(normalize_cell(11, 2, inner), None);
        assert_eq!(normalize_cell(3, 5, inner), None);
        assert_eq!(normalize_cell(0, 0, Rect::new(0, 0, 0, 0)), None);
    }

    #[test]
    fn end_message_lists_tallies() {
        let tallies = Tallies {
            correct: 2,
            incorrect: 2,
            expired: 1,
            reaction_ms: vec![300, 500],
        };
        let lines = end_message(150, &tallies);
        assert_eq!(lines[1].0, "score 150");
        assert_eq!(lines[2].0, "2 correct   2 wrong hand   1 missed   50% acc");
        assert_eq!(lines[3].0, "reaction 400 ms ± 100");
    }

    #[test]
    fn armed_colors_follow_hands() {
        assert_eq!(state_color(TargetState::ArmedPrimary), hand_color(HandSide::Left));
        assert_eq!(state_color(TargetState::ArmedSecondary), hand_color(HandSide::Right));
    }
}
