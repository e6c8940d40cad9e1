//! Explicit tables mapping adapter **families** to reference files.
//!
//! Nothing here is global: the composition root (the CLI, or a test) builds
//! the tables, usually from a data directory with [`AdapterFamilies::packaged`]
//! and [`CatalogSources::packaged`], and hands them to the resolver or catalog.
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{AdapterError, Result};

/// Tag of the only family shipped with the crate.
pub const NEXTERA: &str = "Nextera";

/// Packaged forward/reverse Nextera adapter lists.
pub const NEXTERA_FWD_FILE: &str = "adapters_Nextera_PF1_220616_fwd.fa";
pub const NEXTERA_REV_FILE: &str = "adapters_Nextera_PF1_220616_rev.fa";

/// Kraken-tagged adapter files loaded by [`crate::AdapterCatalog::load_all`], `(tag, file)`.
pub const PACKAGED_CATALOG: &[(&str, &str)] = &[
    ("PCRFree", "adapters_PCRFree_kraken.fa"),
    ("Nextera", "adapters_Nextera_kraken.fa"),
    ("Rubicon", "adapters_Rubicon_kraken.fa"),
    ("SMARTer", "adapters_SMARTer_kraken.fa"),
    ("TruSeq", "adapters_TruSeq_kraken.fa"),
    ("Small", "adapters_Small_kraken.fa"),
];

/// Forward and reverse FASTA files of one family. Records pair one-to-one.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FamilyFiles {
    pub fwd: PathBuf,
    pub rev: PathBuf,
}

/// Family tag → file pair. Tags are case-sensitive.
#[derive(Clone, Debug, Default)]
pub struct AdapterFamilies {
    table: BTreeMap<String, FamilyFiles>,
}

impl AdapterFamilies {
    /// Empty table; every lookup fails until a family is inserted.
    pub fn new() -> Self { Self::default() }

    /// The shipped table (`Nextera` only), rooted at `data_dir`.
    pub fn packaged<P: AsRef<Path>>(data_dir: P) -> Self {
        let dir = data_dir.as_ref();
        let mut fams = Self::new();
        fams.insert(NEXTERA, FamilyFiles { fwd: dir.join(NEXTERA_FWD_FILE), rev: dir.join(NEXTERA_REV_FILE) });
        fams
    }

    /// Add or replace a family.
    pub fn insert(&mut self, tag: impl Into<String>, files: FamilyFiles) -> &mut Self {
        self.table.insert(tag.into(), files);
        self
    }

    /// Files of `tag`.
    ///
    /// An unknown tag fails with [`AdapterError::UnsupportedFamily`], listing
    /// the tags that are configured.
    ///
    /// ```
    /// use adapterdb::{AdapterError, AdapterFamilies};
    /// let fams = AdapterFamilies::packaged("data");
    /// assert!(fams.get("Nextera").unwrap().fwd.ends_with("adapters_Nextera_PF1_220616_fwd.fa"));
    /// assert!(matches!(fams.get("TruSeq"), Err(AdapterError::UnsupportedFamily { .. })));
    /// ```
    pub fn get(&self, tag: &str) -> Result<&FamilyFiles> {
        self.table.get(tag).ok_or_else(|| AdapterError::UnsupportedFamily {
            family: tag.to_string(),
            supported: self.tags().map(str::to_string).collect(),
        })
    }

    /// Configured tags, sorted.
    pub fn tags(&self) -> impl Iterator<Item = &str> { self.table.keys().map(String::as_str) }
}

/// Ordered `(tag, path)` list of catalog files.
#[derive(Clone, Debug, Default)]
pub struct CatalogSources {
    sources: Vec<(String, PathBuf)>,
}

impl CatalogSources {
    /// Empty list.
    pub fn new() -> Self { Self::default() }

    /// Every file of [`PACKAGED_CATALOG`], rooted at `data_dir`, in declared order.
    ///
    /// ```
    /// use adapterdb::CatalogSources;
    /// let sources = CatalogSources::packaged("data");
    /// let (tag, path) = sources.iter().next().unwrap();
    /// assert_eq!(tag, "PCRFree");
    /// assert!(path.ends_with("adapters_PCRFree_kraken.fa"));
    /// ```
    pub fn packaged<P: AsRef<Path>>(data_dir: P) -> Self {
        let dir = data_dir.as_ref();
        let mut s = Self::new();
        for (tag, file) in PACKAGED_CATALOG {
            s.push(*tag, dir.join(file));
        }
        s
    }

    /// Append a source; [`crate::AdapterCatalog::load_all`] reads them in push order.
    pub fn push(&mut self, tag: impl Into<String>, path: impl Into<PathBuf>) -> &mut Self {
        self.sources.push((tag.into(), path.into()));
        self
    }

    /// `(tag, path)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.sources.iter().map(|(t, p)| (t.as_str(), p.as_path()))
    }

    pub fn len(&self) -> usize { self.sources.len() }

    pub fn is_empty(&self) -> bool { self.sources.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packaged_nextera_paths_are_rooted_at_data_dir() {
        let fams = AdapterFamilies::packaged("/opt/adapters");
        let f = fams.get("Nextera").unwrap();
        assert_eq!(f.fwd, Path::new("/opt/adapters/adapters_Nextera_PF1_220616_fwd.fa"));
        assert_eq!(f.rev, Path::new("/opt/adapters/adapters_Nextera_PF1_220616_rev.fa"));
    }

    #[test]
    fn unknown_family_lists_supported_tags() {
        let fams = AdapterFamilies::packaged("data");
        let err = fams.get("TruSeq").unwrap_err();
        match err {
            AdapterError::UnsupportedFamily { family, supported } => {
                assert_eq!(family, "TruSeq");
                assert_eq!(supported, vec!["Nextera"]);
            }
            other => panic!("unexpected error: {other}"),
        }
        // tags are exact
        assert!(fams.get("nextera").is_err());
    }

    #[test]
    fn custom_family_can_be_registered() {
        let mut fams = AdapterFamilies::new();
        fams.insert("Custom", FamilyFiles { fwd: "a.fa".into(), rev: "b.fa".into() });
        assert_eq!(fams.tags().collect::<Vec<_>>(), vec!["Custom"]);
    }

    #[test]
    fn packaged_catalog_keeps_declared_order() {
        let s = CatalogSources::packaged("d");
        let tags: Vec<&str> = s.iter().map(|(t, _)| t).collect();
        assert_eq!(tags, vec!["PCRFree", "Nextera", "Rubicon", "SMARTer", "TruSeq", "Small"]);
        assert_eq!(s.len(), PACKAGED_CATALOG.len());
    }
}
