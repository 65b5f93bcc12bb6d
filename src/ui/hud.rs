use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::theme::Palette;

const SEPARATOR: &str = " │ ";

/// Draws the one-line score display above the board.
pub fn render_score_display(
    frame: &mut Frame<'_>,
    area: Rect,
    score: u32,
    length: usize,
    interval_ms: u64,
    palette: &Palette,
) {
    frame.render_widget(
        Paragraph::new(score_line(score, length, interval_ms, palette))
            .alignment(Alignment::Center)
            .style(Style::default().fg(palette.hud_text)),
        area,
    );
}

fn score_line(score: u32, length: usize, interval_ms: u64, palette: &Palette) -> Line<'static> {
    let value = Style::default().fg(palette.hud_accent);

    Line::from(vec![
        Span::raw("Score: "),
        Span::styled(score.to_string(), value),
        Span::raw(SEPARATOR),
        Span::raw("Length: "),
        Span::styled(length.to_string(), value),
        Span::raw(SEPARATOR),
        Span::raw("Step: "),
        Span::styled(format!("{interval_ms}ms"), value),
    ])
}
