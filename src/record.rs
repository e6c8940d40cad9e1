//! Core types for **adapter records**, **catalog entries** and resolution slots.
//!
//! Every entity has a fixed set of owned fields. A registry owns its records
//! outright; cloning a registry clones the strings, so copies never alias.
//!
//! Header conventions understood by the crate:
//! - index lookup: `Name|index_dna:INDEXCODE`, e.g. `Nextera_index_N501|index_dna:N501`
//! - catalog: `Name|kraken:taxid|IDENTIFIER`, e.g. `Nextera_index_N701|kraken:taxid|1000001`
use core::fmt;

/// A single adapter read from a FASTA file.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct AdapterRecord {
    /// Header text up to the first whitespace (e.g. `"Nextera_index_S505|index_dna:S505"`).
    pub name: String,
    /// Remainder of the header after the first whitespace; empty when absent.
    pub comment: String,
    /// Nucleotide string (`A`, `C`, `G`, `T`, `N`), multi-line FASTA joined.
    pub sequence: String,
}

impl AdapterRecord {
    pub fn new(name: impl Into<String>, comment: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self { name: name.into(), comment: comment.into(), sequence: sequence.into() }
    }

    /// Rewrite the sequence to its character-order reverse (not the complement).
    pub fn reverse(&mut self) {
        self.sequence = self.sequence.chars().rev().collect();
    }
}

/// Two-line FASTA text: `>name<TAB>comment` then the sequence. The tab and
/// comment are omitted when the comment is empty. No trailing newline.
impl fmt::Display for AdapterRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.comment.is_empty() {
            write!(f, ">{}\n{}", self.name, self.sequence)
        } else {
            write!(f, ">{}\t{}\n{}", self.name, self.comment, self.sequence)
        }
    }
}

/// One row of an [`crate::catalog::AdapterCatalog`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CatalogEntry {
    pub name: String,
    pub sequence: String,
    pub comment: String,
    /// Third `|` field of the name. Numeric by convention (from 1000000) but kept opaque.
    pub identifier: String,
    /// File the entry was loaded from.
    pub source_filename: String,
}

/// Strand orientation of an adapter list.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Orientation { Fwd, Rev }

impl Orientation {
    /// Suffix used in per-sample output file names (`fwd` / `rev`).
    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Fwd => "fwd",
            Orientation::Rev => "rev",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Which adapter of a resolved sample a value belongs to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Slot { Index1, Index2, Universal }

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Slot::Index1 => "index1",
            Slot::Index2 => "index2",
            Slot::Universal => "universal",
        })
    }
}
