use std::path::PathBuf;

use wisp::error::InvalidRom;
use wisp::error::UnimplementedOpcode;

/// Everything that can stop lantern before (or instead of) a clean run.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum LanternError {
    #[display("could not access {}: {source}", path.display())]
    #[from(ignore)]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[display("invalid config file: {_0}")]
    Config(toml::de::Error),
    #[display("invalid log level {_0:?}")]
    #[from(ignore)]
    LogLevel(#[error(not(source))] String),
    #[display("{_0}")]
    Rom(InvalidRom),
    #[display("the core stopped: {_0}")]
    Fault(UnimplementedOpcode),
    #[display("could not encode frame: {_0}")]
    Png(png::EncodingError),
}

impl LanternError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
