use crossterm::{
    cursor, execute,
    style::ResetColor,
    terminal::{
        self, Clear, ClearType, DisableLineWrap, EnableLineWrap, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use std::io::{self, Write};

/// Alternate screen session; the terminal is restored when this is dropped
pub struct TerminalSession<W: Write> {
    out: W,
    raw_mode: bool,
}

impl<W: Write> TerminalSession<W> {
    /// Switches `out` to the alternate screen with the cursor hidden
    pub fn enter(mut out: W) -> io::Result<Self> {
        let result = execute!(
            out,
            EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            Clear(ClearType::All)
        );
        // Wrapped before checking so a partial enter is still undone
        let session = TerminalSession {
            out,
            raw_mode: false,
        };
        result.map(|()| session)
    }

    /// Turns on raw mode, undone on drop
    pub fn enable_raw_mode(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        self.raw_mode = true;
        Ok(())
    }
}

impl<W: Write> Drop for TerminalSession<W> {
    fn drop(&mut self) {
        if self.raw_mode {
            terminal::disable_raw_mode().ok();
        }
        execute!(
            self.out,
            ResetColor,
            EnableLineWrap,
            cursor::Show,
            LeaveAlternateScreen
        )
        .ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENTER_ALTERNATE: &str = "\x1b[?1049h";
    const LEAVE_ALTERNATE: &str = "\x1b[?1049l";
    const SHOW_CURSOR: &str = "\x1b[?25h";

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::other("closed"))
        }
    }

    #[test]
    fn drop_leaves_alternate_screen() {
        let mut out = Vec::new();
        let session = TerminalSession::enter(&mut out).unwrap();
        drop(session);

        let text = String::from_utf8_lossy(&out);
        let entered = text.find(ENTER_ALTERNATE).unwrap();
        let left = text.rfind(LEAVE_ALTERNATE).unwrap();
        assert!(entered < left);
        assert!(text.contains(SHOW_CURSOR));
    }

    #[test]
    fn early_return_still_restores_terminal() {
        fn setup_then_fail(out: &mut Vec<u8>) -> io::Result<()> {
            let _session = TerminalSession::enter(out)?;
            Err(io::Error::other("raw mode unavailable"))
        }

        let mut out = Vec::new();
        assert!(setup_then_fail(&mut out).is_err());
        let text = String::from_utf8_lossy(&out);
        assert!(text.ends_with(LEAVE_ALTERNATE));
    }

    #[test]
    fn failed_enter_reports_error_without_panicking_on_drop() {
        assert!(TerminalSession::enter(FailingWriter).is_err());
    }
}
