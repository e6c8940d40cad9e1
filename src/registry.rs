//! In-memory registry of named adapters loaded from FASTA.
//!
//! Adapter files are small, so everything is read eagerly and kept in
//! insertion order. Names must be pairwise distinct; construction fails with
//! [`AdapterError::DuplicateName`] otherwise.
//!
//! # Examples
//! ```
//! use adapterdb::{AdapterRecord, AdapterRegistry};
//! let reg = AdapterRegistry::from_records(vec![
//!     AdapterRecord::new("Nextera_index_S505|index_dna:S505", "", "AATGATACGGCGACCACCGAGATCTACACGTAAGGAGTCGTCGGCAGCGTC"),
//!     AdapterRecord::new("Universal_Adapter", "", "AATGATACGGCGACCACCGAGATCTACACTCTTTCCCTACACGACGCTCTTCCGATCT"),
//! ]).unwrap();
//! let hit = reg.find_by_index_contains("S505").unwrap().unwrap();
//! assert!(hit.starts_with(">Nextera_index_S505"));
//! ```
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use crate::error::{AdapterError, Result};
use crate::fasta;
use crate::record::AdapterRecord;

/// Ordered, name-unique collection of [`AdapterRecord`]s.
///
/// Equality compares the `(name, comment, sequence)` triples in order.
/// `Clone` is a deep copy.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AdapterRegistry {
    records: Vec<AdapterRecord>,
}

impl AdapterRegistry {
    /// Load a FASTA file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_records(fasta::read_records(path.as_ref())?)
    }

    /// Build from an explicit list of records, keeping their order.
    pub fn from_records(records: Vec<AdapterRecord>) -> Result<Self> {
        let reg = Self { records };
        reg.sanity_check()?;
        Ok(reg)
    }

    fn sanity_check(&self) -> Result<()> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for r in &self.records {
            *counts.entry(r.name.as_str()).or_default() += 1;
        }
        if counts.len() == self.records.len() {
            return Ok(());
        }
        // report in first-seen order
        let mut names: Vec<String> = Vec::new();
        for r in &self.records {
            if counts[r.name.as_str()] > 1 && !names.contains(&r.name) {
                names.push(r.name.clone());
            }
        }
        Err(AdapterError::DuplicateName { names })
    }

    /// Number of adapters.
    pub fn len(&self) -> usize { self.records.len() }

    pub fn is_empty(&self) -> bool { self.records.is_empty() }

    /// Record at position `i` in file order.
    pub fn get(&self, i: usize) -> Option<&AdapterRecord> { self.records.get(i) }

    pub fn iter(&self) -> std::slice::Iter<'_, AdapterRecord> { self.records.iter() }

    /// Borrow every record in file order.
    pub fn records(&self) -> &[AdapterRecord] { &self.records }

    /// Give up the registry and keep its records.
    pub fn into_records(self) -> Vec<AdapterRecord> { self.records }

    /// Names in file order.
    ///
    /// ```
    /// use adapterdb::{AdapterRecord, AdapterRegistry};
    /// let reg = AdapterRegistry::from_records(vec![
    ///     AdapterRecord::new("Universal_Adapter", "", "AATG"),
    ///     AdapterRecord::new("Nextera_index_N501|index_dna:N501", "", "TAGA"),
    /// ]).unwrap();
    /// assert_eq!(reg.names(), vec!["Universal_Adapter", "Nextera_index_N501|index_dna:N501"]);
    /// assert_eq!(reg.sequences(), vec!["AATG", "TAGA"]);
    /// ```
    pub fn names(&self) -> Vec<&str> { self.records.iter().map(|r| r.name.as_str()).collect() }

    /// Sequences in file order.
    pub fn sequences(&self) -> Vec<&str> { self.records.iter().map(|r| r.sequence.as_str()).collect() }

    /// Header comments in file order; empty when a header has none.
    pub fn comments(&self) -> Vec<&str> { self.records.iter().map(|r| r.comment.as_str()).collect() }

    /// All adapters whose sequence contains `needle`, as newline-joined FASTA text.
    ///
    /// Several hits are expected (adapters share long stretches), so no
    /// ambiguity check is made. `None` when nothing matches.
    pub fn find_by_sequence_contains(&self, needle: &str) -> Option<String> {
        let hits: Vec<String> = self.records
            .iter()
            .filter(|r| r.sequence.contains(needle))
            .map(|r| r.to_string())
            .collect();
        if hits.is_empty() { None } else { Some(hits.join("\n")) }
    }

    /// The single adapter whose name contains `text`, as FASTA text.
    ///
    /// More than one match means the adapter file is malformed and yields
    /// [`AdapterError::AmbiguousName`].
    pub fn find_by_name_contains(&self, text: &str) -> Result<Option<String>> {
        self.unique_name_match(text).map(|r| r.map(|r| r.to_string()))
    }

    /// Index-tag lookup (`N501`, `S505`, ...). Same contract as
    /// [`find_by_name_contains`](Self::find_by_name_contains).
    pub fn find_by_index_contains(&self, index_name: &str) -> Result<Option<String>> {
        self.find_by_name_contains(index_name)
    }

    fn unique_name_match(&self, text: &str) -> Result<Option<&AdapterRecord>> {
        let mut hits = self.records.iter().filter(|r| r.name.contains(text));
        let first = match hits.next() {
            Some(r) => r,
            None => return Ok(None),
        };
        let rest: Vec<&AdapterRecord> = hits.collect();
        if rest.is_empty() {
            return Ok(Some(first));
        }
        let matches = std::iter::once(first).chain(rest).map(|r| r.name.clone()).collect();
        Err(AdapterError::AmbiguousName { text: text.to_string(), matches })
    }

    /// Reverse every sequence in place (character order, no complement).
    pub fn reverse_all(&mut self) {
        for r in self.records.iter_mut() {
            r.reverse();
        }
    }

    /// All records as FASTA text, one record per two lines, no trailing newline.
    pub fn to_fasta_string(&self) -> String {
        self.records.iter().map(|r| r.to_string()).collect::<Vec<_>>().join("\n")
    }

    /// Write the registry to `path` in the format of [`to_fasta_string`](Self::to_fasta_string).
    pub fn write_fasta<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let text = self.to_fasta_string();
        fasta::write_file(path, |w| w.write_all(text.as_bytes()))?;
        log::info!("wrote {} adapter(s) to {}", self.len(), path.display());
        Ok(())
    }
}

impl TryFrom<Vec<AdapterRecord>> for AdapterRegistry {
    type Error = AdapterError;
    fn try_from(records: Vec<AdapterRecord>) -> Result<Self> { Self::from_records(records) }
}

impl<'a> IntoIterator for &'a AdapterRegistry {
    type Item = &'a AdapterRecord;
    type IntoIter = std::slice::Iter<'a, AdapterRecord>;
    fn into_iter(self) -> Self::IntoIter { self.records.iter() }
}

impl std::ops::Index<usize> for AdapterRegistry {
    type Output = AdapterRecord;
    fn index(&self, i: usize) -> &AdapterRecord { &self.records[i] }
}
