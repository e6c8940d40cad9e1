//! Error taxonomy shared by the registry, catalog and resolver.
use std::path::PathBuf;

use thiserror::Error;

use crate::record::{Orientation, Slot};

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("Found identical names in fasta sequences. Check those names for duplicates: {}", .names.join(", "))]
    DuplicateName { names: Vec<String> },

    #[error("'{text}' matches several adapter names: {}", .matches.join(", "))]
    AmbiguousName { text: String, matches: Vec<String> },

    #[error("identifier '{identifier}' is shared by {count} catalog entries")]
    AmbiguousIdentifier { identifier: String, count: usize },

    #[error("unsupported adapter family '{family}'. Supported: {}", .supported.join(", "))]
    UnsupportedFamily { family: String, supported: Vec<String> },

    #[error("{sample} not valid. Use one of {}", .valid.join(", "))]
    UnknownSample { sample: String, valid: Vec<String> },

    #[error("sample {sample} listed more than once in the index mapping table")]
    DuplicateSample { sample: String },

    #[error("no {slot} adapter ({orientation}) found for sample {sample}")]
    MissingAdapter { sample: String, slot: Slot, orientation: Orientation },

    #[error("header '{name}' has no identifier; expected Name|kraken:taxid|IDENTIFIER")]
    MalformedHeader { name: String },

    #[error("{}: missing required column '{column}'", .path.display())]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("{} holds {fwd} records but {} holds {rev}; files must pair one-to-one", .fwd_path.display(), .rev_path.display())]
    UnpairedRecords { fwd_path: PathBuf, fwd: usize, rev_path: PathBuf, rev: usize },

    #[error("{}: {source}", .path.display())]
    Io { path: PathBuf, #[source] source: std::io::Error },

    #[error("{}: invalid FASTA: {source}", .path.display())]
    Fasta { path: PathBuf, #[source] source: std::io::Error },

    #[error("{}: invalid FASTA/FASTQ input: {source}", .path.display())]
    Fastx { path: PathBuf, #[source] source: needletail::errors::ParseError },

    /// Writing to a caller-supplied stream failed; the caller knows its name.
    #[error("cannot write output: {0}")]
    Output(#[source] std::io::Error),

    #[error("{}: {source}", .path.display())]
    Table { path: PathBuf, #[source] source: csv::Error },
}

impl AdapterError {
    pub(crate) fn fastx(path: impl Into<PathBuf>, source: needletail::errors::ParseError) -> Self {
        AdapterError::Fastx { path: path.into(), source }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AdapterError::Io { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, AdapterError>;
