//! Error types for loading and normalizing the demographics dataset.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors raised while reading the input file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("dataset not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("missing required column `{0}`")]
    MissingColumn(&'static str),

    #[error("column `{0}` appears more than once")]
    DuplicateColumn(&'static str),

    #[error("malformed CSV at line {line:?}: {source}")]
    Csv {
        line: Option<u64>,
        #[source]
        source: csv::Error,
    },
}

impl From<csv::Error> for LoadError {
    fn from(source: csv::Error) -> Self {
        let line = source.position().map(|p| p.line());
        LoadError::Csv { line, source }
    }
}

/// A single row could not be turned into a [`SchoolRecord`](crate::model::SchoolRecord).
///
/// Rows failing this way are skipped; the rest of the load continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("school year `{0}` is too short to reformat")]
    SchoolYear(String),

    #[error("DBN `{0}` is shorter than 3 characters")]
    ShortDbn(String),

    #[error("DBN `{0}` does not start with a numeric district code")]
    District(String),

    #[error("school name is empty")]
    EmptyName,
}

/// Returned when a borough name given on the command line is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown borough `{0}`")]
pub struct ParseBoroughError(pub String);
