//! Terminal sink: where rendered text goes, and the size probe used for
//! resize detection.

use std::io::{self, Stdout, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::execute;
use crossterm::terminal::{self, Clear, ClearType};

use crate::TerminalError;

/// Terminal dimensions as `(columns, rows)`.
pub type TerminalSize = (u16, u16);

/// Output surface driven by the monitor loop.
pub trait TerminalSink {
    fn size(&mut self) -> Result<TerminalSize, TerminalError>;

    /// Write text as-is and flush.
    fn write(&mut self, text: &str) -> Result<(), TerminalError>;

    /// Clear the whole screen and home the cursor.
    fn clear(&mut self) -> Result<(), TerminalError>;

    fn hide_cursor(&mut self) -> Result<(), TerminalError>;

    fn show_cursor(&mut self) -> Result<(), TerminalError>;
}

/// ANSI terminal backed by crossterm.
#[derive(Debug)]
pub struct CrosstermTerminal<W: Write = Stdout> {
    out: W,
}

impl CrosstermTerminal<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> CrosstermTerminal<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TerminalSink for CrosstermTerminal<W> {
    fn size(&mut self) -> Result<TerminalSize, TerminalError> {
        Ok(terminal::size()?)
    }

    fn write(&mut self, text: &str) -> Result<(), TerminalError> {
        self.out.write_all(text.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), TerminalError> {
        execute!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
        Ok(())
    }

    fn hide_cursor(&mut self) -> Result<(), TerminalError> {
        execute!(self.out, Hide)?;
        Ok(())
    }

    fn show_cursor(&mut self) -> Result<(), TerminalError> {
        execute!(self.out, Show)?;
        Ok(())
    }
}

/// Shows the stdout cursor when dropped, covering early returns and
/// cancelled futures.
#[derive(Debug, Default)]
pub struct CursorRestore;

impl Drop for CursorRestore {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), Show);
    }
}

/// Chain a panic hook that shows the cursor before the previous hook runs.
pub fn install_panic_cursor_restore() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = execute!(io::stdout(), Show);
        original_hook(panic_info);
    }));
}
