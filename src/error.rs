//! Error types shared by both tools

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Which input file of the project layout is missing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Env,
    Sketch,
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileKind::Env => write!(f, "Env"),
            FileKind::Sketch => write!(f, "Original sketch"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("{kind} file not found: {}", path.display())]
    MissingFile { kind: FileKind, path: PathBuf },

    #[error("Output path {} would overwrite the original sketch", path.display())]
    OutputIsSource { path: PathBuf },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid config file {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Could not auto-detect a serial port. Please specify one with -p.")]
    NoPortFound,

    #[error("Failed to enumerate serial ports: {0}")]
    PortEnumeration(#[source] io::Error),

    #[error("Failed to open {port}: {source}")]
    PortOpen {
        port: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read from serial port: {0}")]
    SerialRead(#[source] io::Error),

    #[error("Failed to write log output: {0}")]
    Output(#[source] io::Error),

    #[error("Read timeout must be a positive number of seconds, got {0}")]
    InvalidTimeout(f64),

    #[error("Failed to install Ctrl-C handler: {0}")]
    SignalHandler(#[source] ctrlc::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
