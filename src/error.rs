//! Typed failures that abort a run.
//!
//! Every variant is raised as a [`color_eyre::eyre::Report`], so callers can
//! recover the kind with `report.downcast_ref::<Error>()`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error("Input file does not exist: {0:?}")]
    InputNotFound(PathBuf),

    #[error("Column '{column}' was not found in table: {path:?}")]
    MissingColumn { column: String, path: Option<PathBuf> },

    #[error("Malformed identifier '{id}' (row {row}): {reason}")]
    MalformedIdentifier { id: String, row: usize, reason: String },

    #[error("Invalid {name} '{value}': expected a positive integer{detail}")]
    InvalidLengthBound { name: &'static str, value: String, detail: String },

    #[error("Invalid number '{value}' in column '{column}' (row {row}) of {path:?}")]
    InvalidNumber { value: String, column: String, row: usize, path: Option<PathBuf> },

    #[error("No read counts found for '{0}'")]
    MissingTranscript(String),
}
