use std::io;

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{
    self, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{error, warn};

use crate::config::GridSize;
use crate::renderer::required_terminal_size;

/// Concrete terminal type used by the runtime.
pub type GameTerminal = Terminal<CrosstermBackend<io::Stdout>>;

/// Full-screen terminal state for one run of the snake board.
///
/// Dropping the session hands the shell its screen back best-effort.
pub struct TerminalSession {
    terminal: GameTerminal,
}

impl TerminalSession {
    /// Takes over the screen for a board of `bounds` cells.
    ///
    /// Key presses must reach the game one at a time without echo, so raw
    /// mode comes first; the board then gets the alternate screen with the
    /// cursor hidden. A terminal that cannot show every cell is only
    /// reported here, since the renderer asks for a resize on its own.
    pub fn enter(bounds: GridSize) -> io::Result<Self> {
        match terminal::size() {
            Ok((columns, rows)) if !board_fits(columns, rows, bounds) => {
                let (need_columns, need_rows) = required_terminal_size(bounds);
                warn!(columns, rows, need_columns, need_rows, "terminal smaller than the board");
            }
            Ok(_) => {}
            Err(err) => warn!(?err, "could not read terminal size"),
        }

        enable_raw_mode()?;

        let mut stdout = io::stdout();
        if let Err(error) = execute!(stdout, EnterAlternateScreen, Hide) {
            let _ = disable_raw_mode();
            return Err(error);
        }

        let backend = CrosstermBackend::new(stdout);
        match Terminal::new(backend) {
            Ok(terminal) => Ok(Self { terminal }),
            Err(error) => {
                restore_terminal();
                Err(error)
            }
        }
    }

    /// Returns mutable access to the inner ratatui terminal.
    pub fn terminal_mut(&mut self) -> &mut GameTerminal {
        &mut self.terminal
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        restore_terminal();
    }
}

/// Returns whether a `columns` x `rows` terminal shows the HUD and every board cell.
#[must_use]
pub fn board_fits(columns: u16, rows: u16, bounds: GridSize) -> bool {
    let (need_columns, need_rows) = required_terminal_size(bounds);
    columns >= need_columns && rows >= need_rows
}

/// Leaves raw mode and the alternate screen, logging rather than failing.
///
/// Safe to call more than once, including from a panic hook.
pub fn restore_terminal() {
    if let Err(err) = disable_raw_mode() {
        error!(?err, "failed to disable raw mode");
    }

    let mut stdout = io::stdout();
    if let Err(err) = execute!(stdout, Show, LeaveAlternateScreen) {
        error!(?err, "failed to leave alternate screen");
    }
}
