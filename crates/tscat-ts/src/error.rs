//! Error types for TS reading, writing and loading.

use std::fmt::Display;
use std::path::PathBuf;

use thiserror::Error;

/// Errors from parsing or serializing a TS document.
#[derive(Error, Debug)]
pub enum TsError {
    /// The markup itself is malformed.
    #[error("malformed markup at byte {position}: {message}")]
    Xml { position: u64, message: String },

    /// The document has no `<TS>` element.
    #[error("document has no <TS> root element")]
    MissingRoot,

    /// The document ends inside an open element.
    #[error("document ends before </TS>")]
    UnexpectedEof,

    /// A required child element is absent.
    #[error("<{parent}> ending at byte {position} has no <{element}>")]
    MissingElement {
        element: &'static str,
        parent: &'static str,
        position: u64,
    },

    /// An element appears where the format does not allow it.
    #[error("unexpected <{element}> at byte {position}")]
    UnexpectedElement { element: String, position: u64 },

    /// A `<source>` with no text.
    #[error("empty <source> in context '{context}' at byte {position}")]
    EmptySource { context: String, position: u64 },

    /// A `type` attribute value the format does not define.
    #[error("unknown translation type '{value}' at byte {position}")]
    UnknownStatus { value: String, position: u64 },

    /// A `line` attribute that is neither absolute nor `+N`/`-N`.
    #[error("invalid line number '{value}' at byte {position}")]
    InvalidLine { value: String, position: u64 },

    /// A `<byte value>` that does not name a character.
    #[error("invalid byte value '{value}' at byte {position}")]
    InvalidByte { value: String, position: u64 },

    /// Serializing failed.
    #[error("failed to write catalogue: {0}")]
    Write(String),

    /// Reading or writing a file failed.
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TsError {
    pub(crate) fn xml(position: u64, err: impl Display) -> Self {
        Self::Xml {
            position,
            message: err.to_string(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors from building a translator out of a catalogue directory.
#[derive(Error, Debug)]
pub enum LoadError {
    /// A catalogue file failed to parse or read.
    #[error(transparent)]
    Ts(#[from] TsError),

    /// A locale was requested but its file does not exist.
    #[error("no catalogue for locale '{locale}' (expected {path})")]
    MissingLocale { locale: String, path: PathBuf },

    /// The catalogue directory could not be listed.
    #[error("cannot list {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
