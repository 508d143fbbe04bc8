#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("savegame too short: {len} bytes (need at least {min})")]
    Format { len: usize, min: usize },

    #[error("unsupported savegame codec: {codec}")]
    UnsupportedCodec { codec: &'static str },

    #[error("{codec} decompression failed: {reason}")]
    Decompression { codec: &'static str, reason: String },

    #[error("unexpected end of data")]
    UnexpectedEof,

    #[error("gamma length exceeds {max} continuation bytes")]
    GammaOverflow { max: usize },

    #[error("invalid parser config: {0}")]
    Config(String),
}

impl Error {
    /// Short label used as a structured logging field.
    pub fn kind_label(&self) -> &'static str {
        match self {
            Error::Format { .. } => "format",
            Error::UnsupportedCodec { .. } => "unsupported_codec",
            Error::Decompression { .. } => "decompression",
            Error::UnexpectedEof => "unexpected_eof",
            Error::GammaOverflow { .. } => "gamma_overflow",
            Error::Config(_) => "config",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
