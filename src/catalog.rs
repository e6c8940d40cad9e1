//! Flat catalog of kraken-tagged adapters accumulated over several files.
//!
//! Headers must read `Name|kraken:taxid|IDENTIFIER`. Loading only ever appends;
//! nothing is removed or edited afterwards. Identifiers are expected to be
//! unique but a collision is only logged, never fatal.
use std::collections::BTreeMap;
use std::path::Path;

use polars::prelude::*;

use crate::error::{AdapterError, Result};
use crate::families::CatalogSources;
use crate::fasta;
use crate::record::CatalogEntry;

/// What [`AdapterCatalog::resolve_identifier`] does when an identifier is shared.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LookupPolicy {
    /// Raise [`AdapterError::AmbiguousIdentifier`].
    Strict,
    /// Return no result.
    #[default]
    Lenient,
}

/// Append-only table of [`CatalogEntry`]s gathered from kraken-tagged files.
///
/// ```no_run
/// use adapterdb::{AdapterCatalog, CatalogSources};
/// let mut catalog = AdapterCatalog::new();
/// catalog.load_all(&CatalogSources::packaged("data"))?;
/// if let Some(comment) = catalog.resolve_identifier("1000004")? {
///     println!("{comment}");
/// }
/// # Ok::<(), adapterdb::AdapterError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct AdapterCatalog {
    entries: Vec<CatalogEntry>,
    policy: LookupPolicy,
}

impl AdapterCatalog {
    /// Empty catalog with the default [`LookupPolicy::Lenient`] policy.
    pub fn new() -> Self { Self::default() }

    /// Empty catalog with an explicit lookup policy.
    pub fn with_policy(policy: LookupPolicy) -> Self {
        Self { entries: Vec::new(), policy }
    }

    pub fn policy(&self) -> LookupPolicy { self.policy }

    /// Append every record of `path`; returns how many were added.
    ///
    /// Either the whole file is appended or, on a malformed header, nothing is.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let path = path.as_ref();
        let source_filename = path.to_string_lossy().into_owned();
        let mut batch = Vec::new();
        for rec in fasta::read_records(path)? {
            let identifier = rec
                .name
                .split('|')
                .nth(2)
                .ok_or_else(|| AdapterError::MalformedHeader { name: rec.name.clone() })?
                .to_string();
            batch.push(CatalogEntry {
                name: rec.name,
                sequence: rec.sequence,
                comment: rec.comment,
                identifier,
                source_filename: source_filename.clone(),
            });
        }
        let added = batch.len();
        self.entries.extend(batch);
        log::debug!("catalog: +{added} from {} ({} total)", path.display(), self.entries.len());

        if self.has_duplicate_identifiers() {
            log::warn!(
                "there are duplicated identifiers in the adapters: {}",
                self.duplicate_identifiers().join(", ")
            );
        }
        Ok(added)
    }

    /// Load every configured source in order.
    pub fn load_all(&mut self, sources: &CatalogSources) -> Result<usize> {
        let mut total = 0;
        for (tag, path) in sources.iter() {
            log::debug!("catalog: loading {tag} adapters");
            total += self.load(path)?;
        }
        Ok(total)
    }

    /// Number of entries over every loaded file.
    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Entries in load order.
    pub fn entries(&self) -> &[CatalogEntry] { &self.entries }

    /// Some identifier is carried by more than one entry.
    pub fn has_duplicate_identifiers(&self) -> bool {
        let mut seen = std::collections::HashSet::new();
        !self.entries.iter().all(|e| seen.insert(e.identifier.as_str()))
    }

    /// Identifiers carried by more than one entry, sorted.
    pub fn duplicate_identifiers(&self) -> Vec<String> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for e in &self.entries {
            *counts.entry(e.identifier.as_str()).or_default() += 1;
        }
        counts.into_iter().filter(|(_, n)| *n > 1).map(|(id, _)| id.to_string()).collect()
    }

    /// Comment of the unique entry carrying `identifier`.
    ///
    /// Zero matches give `Ok(None)`. Several matches give `Ok(None)` under
    /// [`LookupPolicy::Lenient`] and an error under [`LookupPolicy::Strict`].
    pub fn resolve_identifier(&self, identifier: &str) -> Result<Option<&str>> {
        let hits: Vec<&CatalogEntry> = self.entries.iter().filter(|e| e.identifier == identifier).collect();
        match (hits.len(), self.policy) {
            (0, _) => Ok(None),
            (1, _) => Ok(Some(hits[0].comment.as_str())),
            (_, LookupPolicy::Lenient) => Ok(None),
            (count, LookupPolicy::Strict) => Err(AdapterError::AmbiguousIdentifier {
                identifier: identifier.to_string(),
                count,
            }),
        }
    }

    /// Tabular view, one row per entry.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let e = &self.entries;
        df!(
            "name"       => e.iter().map(|e| e.name.as_str()).collect::<Vec<_>>(),
            "sequence"   => e.iter().map(|e| e.sequence.as_str()).collect::<Vec<_>>(),
            "comment"    => e.iter().map(|e| e.comment.as_str()).collect::<Vec<_>>(),
            "identifier" => e.iter().map(|e| e.identifier.as_str()).collect::<Vec<_>>(),
            "filename"   => e.iter().map(|e| e.source_filename.as_str()).collect::<Vec<_>>(),
        )
    }
}
