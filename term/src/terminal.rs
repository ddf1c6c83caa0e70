use std::io::{self, Write};

use crossterm::{
    cursor, execute,
    event::{DisableMouseCapture, EnableMouseCapture},
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};

/// Raw mode, alternate screen and mouse capture for as long as it lives.
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let guard = Self { _private: () };
        execute!(
            io::stdout(),
            EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        if let Err(err) = execute!(stdout, cursor::Show, DisableMouseCapture, LeaveAlternateScreen) {
            log::warn!("Could not restore screen: {:?}", err);
        }
        if let Err(err) = terminal::disable_raw_mode() {
            log::warn!("Could not leave raw mode: {:?}", err);
        }
        let _ = stdout.flush();
    }
}
