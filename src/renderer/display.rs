use anyhow::Result;
use crossterm::{
    cursor,
    style::Print,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
    ExecutableCommand,
};
use std::io::{BufWriter, Stdout, Write};

use crate::core::transform::Size;
use crate::shared::constants;

/// Owns stdout while the image is on screen.
///
/// Interactive sessions switch to the alternate screen and raw mode; both
/// are undone on drop.
pub struct TerminalSession {
    stdout: BufWriter<Stdout>,
    interactive: bool,
}

impl TerminalSession {
    pub fn new(interactive: bool, title: &str) -> Result<Self> {
        let stdout = BufWriter::with_capacity(1024 * 1024, std::io::stdout());
        let mut session = Self { stdout, interactive };
        session.initialize_terminal(title)?;
        Ok(session)
    }

    fn initialize_terminal(&mut self, title: &str) -> Result<()> {
        self.stdout.execute(SetTitle(title))?;
        if !self.interactive {
            return Ok(());
        }

        terminal::enable_raw_mode()?;
        self.stdout.execute(EnterAlternateScreen)?;
        self.stdout.execute(cursor::Hide)?;

        // Disable line wrapping (DECRAWM) so the last column never scrolls
        self.stdout.execute(Print(constants::ESC_WRAP_OFF))?;
        Ok(())
    }

    /// Sink handed to the rasterizer.
    pub fn output(&mut self) -> &mut BufWriter<Stdout> {
        &mut self.stdout
    }

    pub fn clear(&mut self) -> Result<()> {
        self.stdout.write_all(constants::ESC_CLEAR_SCREEN)?;
        self.stdout.flush()?;
        Ok(())
    }

    /// Leave the cursor on the line below `rows` so the shell prompt
    /// does not overwrite the image.
    pub fn park_cursor(&mut self, rows: u16) -> Result<()> {
        self.stdout.execute(cursor::MoveTo(0, rows))?;
        self.stdout.write_all(b"\r\n")?;
        self.stdout.flush()?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.stdout.flush();
        if self.interactive {
            restore_terminal();
        }
    }
}

/// Best-effort reset of everything an interactive session changes.
pub fn restore_terminal() {
    let mut stdout = std::io::stdout();
    let _ = stdout.execute(Print(constants::ESC_WRAP_ON));
    let _ = stdout.execute(cursor::Show);
    let _ = stdout.execute(LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
}

/// Terminal size in character cells, never zero.
pub fn terminal_size_chars() -> Result<Size> {
    let (cols, rows) = terminal::size()?;
    Ok(Size::new(cols.max(1) as u32, rows.max(1) as u32))
}
