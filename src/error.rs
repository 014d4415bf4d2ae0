use thiserror::Error;

/// Errors raised by the terminal surface, the frame clock and settings resolution
#[derive(Debug, Error)]
pub enum Error {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not measure the terminal size")]
    TerminalSize,

    #[error("invalid setting '{name}': {reason}")]
    InvalidSetting { name: &'static str, reason: String },
}
