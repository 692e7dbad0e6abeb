use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid size spec '{0}'")]
    InvalidGeometry(String),

    #[error("{which} color parse error: '{value}'")]
    InvalidColor { which: &'static str, value: String },

    #[error("Need to provide a font")]
    MissingFont,

    #[error("Couldn't load font '{path}': {reason}")]
    FontLoad { path: String, reason: String },

    #[error("Font parsing error: {0}")]
    FontParse(String),

    #[error("{width}x{height} is a rather unusual size")]
    InvalidSize { width: i32, height: i32 },

    #[error("This looks like a very empty text")]
    EmptyText,

    #[error("Text '{0}' has no glyphs in this font")]
    NothingToRender(String),

    #[error("Cannot connect to {host}: {source}")]
    Connection {
        host: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Frame send failed: {0}")]
    Transport(#[source] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of failures, used by the binary to decide how to
/// report them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed option value; usage text should accompany the message
    Usage,
    /// Inputs parsed but do not describe anything renderable
    Content,
    /// The display host could not be reached
    Connection,
    /// A frame could not be sent once rendering started
    Transport,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidGeometry(_) | Error::InvalidColor { .. } => ErrorKind::Usage,
            Error::MissingFont
            | Error::FontLoad { .. }
            | Error::FontParse(_)
            | Error::InvalidSize { .. }
            | Error::EmptyText
            | Error::NothingToRender(_)
            | Error::Config(_)
            | Error::Io(_) => ErrorKind::Content,
            Error::Connection { .. } => ErrorKind::Connection,
            Error::Transport(_) => ErrorKind::Transport,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
