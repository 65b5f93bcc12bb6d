use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Block;

use crate::config::{CELL_COLUMNS, CELL_ROWS, GridSize};
use crate::game::{GameEngine, GameStatus};
use crate::snake::Position;
use crate::theme::Palette;
use crate::timer::TimerHost;
use crate::ui::hud::render_score_display;
use crate::ui::menu::{render_game_over_menu, render_idle_menu, render_too_small_menu};

/// Glyph filling one grid cell.
const GLYPH_CELL: &str = "██";

/// Rows above the board taken by the score display.
const HUD_ROWS: u16 = 1;

/// Renders the full game frame from immutable engine state.
///
/// When the terminal cannot show every cell the board is replaced by a
/// resize notice; the engine keeps its own pace either way.
pub fn render<T: TimerHost>(frame: &mut Frame<'_>, engine: &GameEngine<T>, palette: &Palette) {
    let area = frame.area();
    let (required_width, required_height) = required_terminal_size(engine.bounds());
    if area.width < required_width || area.height < required_height {
        render_too_small_menu(frame, area, required_width, required_height, palette);
        return;
    }

    let [hud_area, board_outer] =
        Layout::vertical([Constraint::Length(HUD_ROWS), Constraint::Min(0)]).areas(area);

    render_score_display(
        frame,
        hud_area,
        engine.score(),
        engine.snake().len(),
        engine.interval_ms(),
        palette,
    );

    let board_area = board_rect(board_outer, engine.bounds());
    let block = Block::bordered()
        .border_style(Style::new().fg(palette.border))
        .style(Style::new().bg(palette.board_bg));
    let inner = block.inner(board_area);
    frame.render_widget(block, board_area);

    if engine.status() != GameStatus::Idle {
        render_snake(frame, inner, engine, palette);
        render_food(frame, inner, engine, palette);
    }

    match engine.status() {
        GameStatus::Idle => render_idle_menu(frame, board_outer, palette),
        GameStatus::GameOver => render_game_over_menu(
            frame,
            board_outer,
            engine.score(),
            engine.death_reason(),
            palette,
        ),
        GameStatus::Running => {}
    }
}

/// Returns the terminal `(columns, rows)` needed to show the HUD and every board cell.
#[must_use]
pub fn required_terminal_size(bounds: GridSize) -> (u16, u16) {
    let (board_width, board_height) = board_size(bounds);
    (board_width, board_height.saturating_add(HUD_ROWS))
}

fn board_size(bounds: GridSize) -> (u16, u16) {
    let width = bounds.width.saturating_mul(CELL_COLUMNS).saturating_add(2);
    let height = bounds.height.saturating_mul(CELL_ROWS).saturating_add(2);
    (width, height)
}

/// Returns the bordered board rectangle centred in `area`, clipped to fit.
#[must_use]
pub fn board_rect(area: Rect, bounds: GridSize) -> Rect {
    let (width, height) = board_size(bounds);
    let width = width.min(area.width);
    let height = height.min(area.height);

    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [board] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);

    board
}

fn render_food<T: TimerHost>(
    frame: &mut Frame<'_>,
    inner: Rect,
    engine: &GameEngine<T>,
    palette: &Palette,
) {
    let Some(food) = engine.food() else {
        return;
    };
    let Some((x, y)) = logical_to_terminal(inner, engine.bounds(), food) else {
        return;
    };

    frame
        .buffer_mut()
        .set_string(x, y, GLYPH_CELL, Style::new().fg(palette.food));
}

fn render_snake<T: TimerHost>(
    frame: &mut Frame<'_>,
    inner: Rect,
    engine: &GameEngine<T>,
    palette: &Palette,
) {
    let buffer = frame.buffer_mut();
    for (index, segment) in engine.snake().segments().enumerate() {
        let Some((x, y)) = logical_to_terminal(inner, engine.bounds(), *segment) else {
            continue;
        };

        let style = if index == 0 {
            Style::new()
                .fg(palette.snake_head)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::new().fg(palette.snake_body)
        };
        buffer.set_string(x, y, GLYPH_CELL, style);
    }
}

fn logical_to_terminal(inner: Rect, bounds: GridSize, position: Position) -> Option<(u16, u16)> {
    if !position.is_within_bounds(bounds) {
        return None;
    }

    let x_offset = u16::try_from(position.x).ok()?.checked_mul(CELL_COLUMNS)?;
    let y_offset = u16::try_from(position.y).ok()?.checked_mul(CELL_ROWS)?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x.saturating_add(CELL_COLUMNS) > inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}
