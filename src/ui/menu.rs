use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::game::DeathReason;
use crate::theme::Palette;

/// Horizontal padding inside overlay panels, per side.
const PANEL_PADDING_X: u16 = 2;

/// Draws the pre-game panel with the start hint.
pub fn render_idle_menu(frame: &mut Frame<'_>, area: Rect, palette: &Palette) {
    let lines = [
        "SNAKE",
        "",
        "[Enter]/[Space] Start",
        "[Q]/[Esc] Quit",
        "",
        "Arrows or WASD to steer",
    ];
    render_panel(frame, area, &lines, palette);
}

/// Draws the translucent-style game-over panel over the final board.
pub fn render_game_over_menu(
    frame: &mut Frame<'_>,
    area: Rect,
    score: u32,
    death_reason: Option<DeathReason>,
    palette: &Palette,
) {
    let score_line = format!("Final score: {score}");
    let lines = [
        "Game Over",
        "",
        score_line.as_str(),
        death_reason_text(death_reason),
        "",
        "Press [Enter] to restart",
    ];
    render_panel(frame, area, &lines, palette);
}

/// Draws the notice shown while the terminal cannot fit the whole board.
pub fn render_too_small_menu(
    frame: &mut Frame<'_>,
    area: Rect,
    required_width: u16,
    required_height: u16,
    palette: &Palette,
) {
    let need_line = format!("need {required_width}x{required_height}");
    let have_line = format!("have {}x{}", area.width, area.height);
    let lines = [
        "Terminal too small",
        need_line.as_str(),
        have_line.as_str(),
        "",
        "Enlarge the window",
    ];
    render_panel(frame, area, &lines, palette);
}

fn death_reason_text(reason: Option<DeathReason>) -> &'static str {
    match reason {
        Some(DeathReason::WallCollision) => "Hit the wall",
        Some(DeathReason::SelfCollision) => "Bit your own tail",
        Some(DeathReason::BoardFilled) => "Board filled",
        None => "",
    }
}

fn render_panel(frame: &mut Frame<'_>, area: Rect, lines: &[&str], palette: &Palette) {
    let popup = centered_popup(area, panel_width(lines), panel_height(lines));
    frame.render_widget(Clear, popup);

    let text: Vec<Line<'_>> = lines
        .iter()
        .enumerate()
        .map(|(index, line)| {
            if index == 0 {
                Line::styled(*line, Style::new().add_modifier(Modifier::BOLD))
            } else {
                Line::from(*line)
            }
        })
        .collect();

    frame.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::new().fg(palette.overlay_text).bg(palette.overlay_bg))
            .block(Block::bordered().border_style(Style::new().fg(palette.border))),
        popup,
    );
}

fn panel_width(lines: &[&str]) -> u16 {
    let widest = lines.iter().map(|line| line.width()).max().unwrap_or(0);
    u16::try_from(widest)
        .unwrap_or(u16::MAX)
        .saturating_add(2 * PANEL_PADDING_X + 2)
}

fn panel_height(lines: &[&str]) -> u16 {
    u16::try_from(lines.len()).unwrap_or(u16::MAX).saturating_add(2)
}

fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    let [mid] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [center] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(mid);

    center
}
