use std::{
    io::{Stdout, Write},
    sync::Once,
};

use crossterm::{cursor, queue, terminal};

/// Raw-mode alternate screen owned for the lifetime of the value.
///
/// The terminal is handed back to the shell when the session is dropped, and also from
/// a panic hook so the panic message is printed on the normal screen.
pub struct TerminalSession {
    stdout: Stdout,
}

static PANIC_HOOK: Once = Once::new();

impl TerminalSession {
    pub fn enter() -> std::io::Result<Self> {
        PANIC_HOOK.call_once(|| {
            let previous = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |panic_info| {
                // Already failing, a second error has nowhere to go
                let _ = leave(&mut std::io::stdout());
                previous(panic_info);
            }));
        });

        terminal::enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        queue!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(terminal::ClearType::All),
            cursor::Hide,
            cursor::MoveTo(0, 0)
        )?;
        stdout.flush()?;
        tracing::debug!("Entered alternate screen");
        Ok(Self { stdout })
    }

    pub fn stdout(&mut self) -> &mut Stdout {
        &mut self.stdout
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if let Err(error) = leave(&mut self.stdout) {
            tracing::warn!("Failed to restore the terminal: {}", error);
        }
    }
}

fn leave(stdout: &mut Stdout) -> std::io::Result<()> {
    queue!(stdout, terminal::LeaveAlternateScreen, cursor::Show)?;
    stdout.flush()?;
    terminal::disable_raw_mode()
}
