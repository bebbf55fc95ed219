use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] tickwatch_core::ConfigError),

    #[error(transparent)]
    Core(#[from] tickwatch_core::CoreError),

    #[error(transparent)]
    Terminal(#[from] tickwatch_core::TerminalError),

    #[error("logging setup failed: {0}")]
    Logging(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) | Self::Core(_) => 2,
            Self::Terminal(_) => 6,
            Self::Logging(_) | Self::Io(_) => 10,
        }
    }
}
