#![forbid(unsafe_code)]
//! # adapterdb
//!
//! Registry of sequencing **adapters** read from FASTA files, with lookups by
//! name, **index tag** (`N501`, `S505`, ...) or sequence fragment, a flat
//! **catalog** of kraken-tagged adapter files, and a **resolver** that turns
//! a sample → index-code table into per-sample adapter FASTA pairs for
//! trimming tools.
//!
//! ## Building blocks
//! - [`AdapterRegistry`]: ordered, name-unique adapters of one file.
//! - [`AdapterCatalog`]: entries of several `Name|kraken:taxid|ID` files.
//! - [`IndexResolver`]: per-sample index1/index2/universal adapters, fwd + rev.
//! - [`AdapterFamilies`] / [`CatalogSources`]: explicit file tables; nothing is
//!   looked up behind the caller's back.
//!
//! ## Examples
//! ```rust
//! use adapterdb::{AdapterRecord, AdapterRegistry};
//! let mut reg = AdapterRegistry::from_records(vec![
//!     AdapterRecord::new("Universal_Adapter", "", "AATGATACGG"),
//!     AdapterRecord::new("Nextera_index_N501|index_dna:N501", "", "TAGATCGC"),
//! ]).unwrap();
//! assert_eq!(reg.find_by_index_contains("N501").unwrap().as_deref(),
//!            Some(">Nextera_index_N501|index_dna:N501\nTAGATCGC"));
//! reg.reverse_all();
//! assert_eq!(reg[1].sequence, "CGCTAGAT");
//! ```
//!
//! Duplicate names are rejected when the registry is built:
//! ```rust
//! use adapterdb::{AdapterError, AdapterRecord, AdapterRegistry};
//! let err = AdapterRegistry::from_records(vec![
//!     AdapterRecord::new("a", "", "ACGT"),
//!     AdapterRecord::new("a", "", "TTTT"),
//! ]).unwrap_err();
//! assert!(matches!(err, AdapterError::DuplicateName { .. }));
//! ```

pub mod record;
pub mod error;
pub mod fasta;
pub mod registry;
pub mod catalog;
pub mod families;
pub mod resolver;
pub mod convert;

use std::path::Path;

pub use catalog::{AdapterCatalog, LookupPolicy};
pub use error::{AdapterError, Result};
pub use families::{AdapterFamilies, CatalogSources, FamilyFiles, NEXTERA};
pub use record::{AdapterRecord, CatalogEntry, Orientation, Slot};
pub use registry::AdapterRegistry;
pub use resolver::{AdapterPair, IndexResolver, ResolvedAdapterSet, SampleIndexMapping, SampleIndices, UNIVERSAL_ADAPTER};

/// Crate version string (from `CARGO_PKG_VERSION`).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Load a registry, optionally reversing every sequence.
///
/// Used to derive a reverse-strand list when only a forward file exists.
pub fn load_registry<P: AsRef<Path>>(path: P, reverse: bool) -> Result<AdapterRegistry> {
    let mut reg = AdapterRegistry::from_path(path)?;
    if reverse {
        reg.reverse_all();
    }
    Ok(reg)
}

/// `(name, comment, sequence, length)` rows for display, in file order.
pub fn describe_registry_rows(reg: &AdapterRegistry) -> Vec<(String, String, String, usize)> {
    reg.iter()
        .map(|r| (r.name.clone(), r.comment.clone(), r.sequence.clone(), r.sequence.len()))
        .collect()
}

#[cfg(test)]
mod describe_tests {
    use super::*;

    #[test]
    fn rows_carry_length() {
        let reg = AdapterRegistry::from_records(vec![AdapterRecord::new("x", "c", "ACGTN")]).unwrap();
        let rows = describe_registry_rows(&reg);
        assert_eq!(rows, vec![("x".to_string(), "c".to_string(), "ACGTN".to_string(), 5)]);
    }

    #[test]
    fn load_registry_can_reverse() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("a.fa");
        std::fs::write(&p, ">a\nAACG\n").unwrap();
        assert_eq!(load_registry(&p, false).unwrap()[0].sequence, "AACG");
        assert_eq!(load_registry(&p, true).unwrap()[0].sequence, "GCAA");
    }
}
