//! Per-sample adapter resolution from a sample → index-code table.
//!
//! The mapping table is whitespace-delimited with a header row naming at
//! least `sample_name`, `index1` and `index2`; any other column is ignored.
//!
//! ```text
//! Project  sample_name  index1  index2
//! P1       SampleA      N501    S505
//! ```
//!
//! Each sample resolves to its index1, index2 and (optionally) universal
//! adapters in both orientations, looked up in the family's forward and
//! reverse [`AdapterRegistry`]s. The result can be written as a pair of
//! FASTA files `{sample}_adapters_fwd.fa` / `{sample}_adapters_rev.fa`.
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{AdapterError, Result};
use crate::families::AdapterFamilies;
use crate::fasta;
use crate::record::{Orientation, Slot};
use crate::registry::AdapterRegistry;

/// Name of the adapter shared by every sample.
pub const UNIVERSAL_ADAPTER: &str = "Universal_Adapter";

const SAMPLE_COLUMN: &str = "sample_name";
const INDEX1_COLUMN: &str = "index1";
const INDEX2_COLUMN: &str = "index2";

/// One row of the mapping table.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SampleIndices {
    pub sample: String,
    pub index1: String,
    pub index2: String,
}

/// Read-only sample → `(index1, index2)` table. Sample names are unique.
#[derive(Clone, Debug, Default)]
pub struct SampleIndexMapping {
    rows: Vec<SampleIndices>,
    by_sample: HashMap<String, usize>,
}

impl SampleIndexMapping {
    /// Read and parse a mapping table file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| AdapterError::io(path, e))?;
        let mapping = Self::parse(&text, path)?;
        log::debug!("read {} sample(s) from {}", mapping.len(), path.display());
        Ok(mapping)
    }

    /// Parse table text; `origin` is only used in error messages.
    pub fn parse(text: &str, origin: &Path) -> Result<Self> {
        // runs of blanks become one tab so csv can take over
        let normalized: String = text
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| l.split_whitespace().collect::<Vec<_>>().join("\t") + "\n")
            .collect();

        let table_err = |source| AdapterError::Table { path: origin.to_path_buf(), source };
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .quoting(false)
            .from_reader(normalized.as_bytes());
        let headers = rdr.headers().map_err(table_err)?.clone();
        let column = |name: &'static str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or(AdapterError::MissingColumn { path: origin.to_path_buf(), column: name })
        };
        let (si, i1, i2) = (column(SAMPLE_COLUMN)?, column(INDEX1_COLUMN)?, column(INDEX2_COLUMN)?);

        let mut rows = Vec::new();
        for rec in rdr.records() {
            let rec = rec.map_err(table_err)?;
            rows.push(SampleIndices {
                sample: rec[si].to_string(),
                index1: rec[i1].to_string(),
                index2: rec[i2].to_string(),
            });
        }
        Self::from_rows(rows)
    }

    /// Build from rows, rejecting repeated sample names.
    pub fn from_rows(rows: Vec<SampleIndices>) -> Result<Self> {
        let mut by_sample = HashMap::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            if by_sample.insert(row.sample.clone(), i).is_some() {
                return Err(AdapterError::DuplicateSample { sample: row.sample.clone() });
            }
        }
        Ok(Self { rows, by_sample })
    }

    /// Number of samples.
    pub fn len(&self) -> usize { self.rows.len() }

    pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    /// Sample names in table order.
    pub fn sample_names(&self) -> Vec<&str> { self.rows.iter().map(|r| r.sample.as_str()).collect() }

    /// Row of `sample`, if listed.
    pub fn get(&self, sample: &str) -> Option<&SampleIndices> {
        self.by_sample.get(sample).map(|&i| &self.rows[i])
    }
}

/// Forward and reverse FASTA text of one adapter; `None` when not found.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AdapterPair {
    pub fwd: Option<String>,
    pub rev: Option<String>,
}

impl AdapterPair {
    /// FASTA text of one orientation.
    pub fn get(&self, orientation: Orientation) -> Option<&str> {
        match orientation {
            Orientation::Fwd => self.fwd.as_deref(),
            Orientation::Rev => self.rev.as_deref(),
        }
    }

    /// Both orientations were found.
    pub fn is_complete(&self) -> bool { self.fwd.is_some() && self.rev.is_some() }
}

/// Adapters resolved for one sample.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResolvedAdapterSet {
    pub sample: String,
    pub index1: AdapterPair,
    pub index2: AdapterPair,
    /// Present only when the universal adapter was requested.
    pub universal: Option<AdapterPair>,
}

impl ResolvedAdapterSet {
    /// Pair of `slot`; `None` only for an unrequested universal slot.
    pub fn get(&self, slot: Slot) -> Option<&AdapterPair> {
        match slot {
            Slot::Index1 => Some(&self.index1),
            Slot::Index2 => Some(&self.index2),
            Slot::Universal => self.universal.as_ref(),
        }
    }

    /// Requested slots in output order: universal (if any), index1, index2.
    pub fn slots(&self) -> Vec<Slot> {
        let mut slots = Vec::with_capacity(3);
        if self.universal.is_some() {
            slots.push(Slot::Universal);
        }
        slots.extend([Slot::Index1, Slot::Index2]);
        slots
    }

    /// FASTA entries of one orientation in output order.
    ///
    /// Fails on the first missing adapter.
    pub fn entries(&self, orientation: Orientation) -> Result<Vec<&str>> {
        self.slots()
            .into_iter()
            .map(|slot| {
                self.get(slot)
                    .and_then(|pair| pair.get(orientation))
                    .ok_or_else(|| AdapterError::MissingAdapter {
                        sample: self.sample.clone(),
                        slot,
                        orientation,
                    })
            })
            .collect()
    }

    /// Every requested slot is present in both orientations.
    pub fn validate(&self) -> Result<()> {
        self.entries(Orientation::Fwd)?;
        self.entries(Orientation::Rev)?;
        Ok(())
    }
}

/// Resolves samples of a mapping table against a forward/reverse adapter family.
#[derive(Clone, Debug)]
pub struct IndexResolver {
    mapping: SampleIndexMapping,
    fwd: AdapterRegistry,
    rev: AdapterRegistry,
}

impl IndexResolver {
    /// Load the mapping table and the `family` adapter files listed in `families`.
    pub fn new<P: AsRef<Path>>(mapping: P, family: &str, families: &AdapterFamilies) -> Result<Self> {
        let files = families.get(family)?;
        let mapping = SampleIndexMapping::from_path(mapping)?;
        let fwd = AdapterRegistry::from_path(&files.fwd)?;
        let rev = AdapterRegistry::from_path(&files.rev)?;
        Ok(Self::from_parts(mapping, fwd, rev))
    }

    /// Assemble a resolver from an already loaded table and registries.
    ///
    /// ```
    /// use std::path::Path;
    /// use adapterdb::{AdapterRecord, AdapterRegistry, IndexResolver, SampleIndexMapping};
    /// let mapping = SampleIndexMapping::parse("sample_name index1 index2\nA N501 S505\n", Path::new("m.txt"))?;
    /// let fwd = AdapterRegistry::from_records(vec![
    ///     AdapterRecord::new("Nextera_index_N501|index_dna:N501", "", "TAGATCGC"),
    ///     AdapterRecord::new("Nextera_index_S505|index_dna:S505", "", "GTAAGGAG"),
    /// ])?;
    /// let mut rev = fwd.clone();
    /// rev.reverse_all();
    /// let resolver = IndexResolver::from_parts(mapping, fwd, rev);
    /// let set = resolver.resolve("A", false)?;
    /// assert!(set.index1.is_complete() && set.index2.is_complete());
    /// # Ok::<(), adapterdb::AdapterError>(())
    /// ```
    pub fn from_parts(mapping: SampleIndexMapping, fwd: AdapterRegistry, rev: AdapterRegistry) -> Self {
        Self { mapping, fwd, rev }
    }

    /// The sample table this resolver was built from.
    pub fn mapping(&self) -> &SampleIndexMapping { &self.mapping }

    /// Sample names in table order.
    pub fn sample_names(&self) -> Vec<&str> { self.mapping.sample_names() }

    /// `(index1, index2)` of `sample`.
    pub fn get_indices(&self, sample: &str) -> Result<(&str, &str)> {
        self.mapping
            .get(sample)
            .map(|row| (row.index1.as_str(), row.index2.as_str()))
            .ok_or_else(|| AdapterError::UnknownSample {
                sample: sample.to_string(),
                valid: self.sample_names().into_iter().map(str::to_string).collect(),
            })
    }

    /// Look up the sample's adapters in both registries. Missing adapters
    /// become `None` slots; ambiguous names are errors.
    pub fn resolve(&self, sample: &str, include_universal: bool) -> Result<ResolvedAdapterSet> {
        let (index1, index2) = self.get_indices(sample)?;
        let by_index = |code: &str| -> Result<AdapterPair> {
            Ok(AdapterPair {
                fwd: self.fwd.find_by_index_contains(code)?,
                rev: self.rev.find_by_index_contains(code)?,
            })
        };
        let universal = if include_universal {
            Some(AdapterPair {
                fwd: self.fwd.find_by_name_contains(UNIVERSAL_ADAPTER)?,
                rev: self.rev.find_by_name_contains(UNIVERSAL_ADAPTER)?,
            })
        } else {
            None
        };
        Ok(ResolvedAdapterSet {
            sample: sample.to_string(),
            index1: by_index(index1)?,
            index2: by_index(index2)?,
            universal,
        })
    }

    /// Write `{sample}_adapters_fwd.fa` and `{sample}_adapters_rev.fa` into
    /// `output_dir` and return their paths.
    ///
    /// Nothing is created unless every requested adapter was found.
    pub fn save_per_sample_fasta<P: AsRef<Path>>(
        &self,
        sample: &str,
        include_universal: bool,
        output_dir: P,
    ) -> Result<(PathBuf, PathBuf)> {
        let set = self.resolve(sample, include_universal)?;
        set.validate()?;

        let dir = output_dir.as_ref();
        let fwd = write_entries(&set, Orientation::Fwd, dir)?;
        let rev = write_entries(&set, Orientation::Rev, dir)?;
        Ok((fwd, rev))
    }

    /// [`save_per_sample_fasta`](Self::save_per_sample_fasta) for every sample, in table order.
    ///
    /// Every sample is resolved and validated before the first file is
    /// created, so one incomplete sample leaves `output_dir` untouched.
    pub fn save_all<P: AsRef<Path>>(&self, include_universal: bool, output_dir: P) -> Result<Vec<(PathBuf, PathBuf)>> {
        let sets = self
            .sample_names()
            .into_iter()
            .map(|s| {
                let set = self.resolve(s, include_universal)?;
                set.validate()?;
                Ok(set)
            })
            .collect::<Result<Vec<_>>>()?;

        let dir = output_dir.as_ref();
        sets.iter()
            .map(|set| Ok((write_entries(set, Orientation::Fwd, dir)?, write_entries(set, Orientation::Rev, dir)?)))
            .collect()
    }
}

fn write_entries(set: &ResolvedAdapterSet, orientation: Orientation, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(format!("{}_adapters_{orientation}.fa", set.sample));
    let entries = set.entries(orientation)?;
    fasta::write_file(&path, |w| {
        for entry in &entries {
            w.write_all(entry.as_bytes())?;
            w.write_all(b"\n")?;
        }
        Ok(())
    })?;
    log::info!("wrote {} adapter(s) to {}", entries.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::AdapterRecord;

    fn registry(universal: &str, n501: &str, s505: &str) -> AdapterRegistry {
        AdapterRegistry::from_records(vec![
            AdapterRecord::new("Universal_Adapter", "", universal),
            AdapterRecord::new("Nextera_index_N501|index_dna:N501", "", n501),
            AdapterRecord::new("Nextera_index_S505|index_dna:S505", "", s505),
        ])
        .unwrap()
    }

    fn resolver() -> IndexResolver {
        let mapping = SampleIndexMapping::parse(
            "Project sample_name index1 index2\nP1 SampleA N501 S505\nP1 SampleB N501 S999\n",
            Path::new("mapping.txt"),
        )
        .unwrap();
        IndexResolver::from_parts(
            mapping,
            registry("AATGATACGG", "TAGATCGC", "GTAAGGAG"),
            registry("GGCATAGTAA", "CGCTAGAT", "GAGGAATG"),
        )
    }

    #[test]
    fn parse_ignores_extra_columns_and_blank_runs() {
        let m = SampleIndexMapping::parse(
            "sample_name   index2\tindex1  Lane\n\nS1  S502   N701 1\nS2 S503 N702 2\n",
            Path::new("m.txt"),
        )
        .unwrap();
        assert_eq!(m.sample_names(), vec!["S1", "S2"]);
        let s2 = m.get("S2").unwrap();
        assert_eq!((s2.index1.as_str(), s2.index2.as_str()), ("N702", "S503"));
    }

    #[test]
    fn missing_column_is_reported() {
        let err = SampleIndexMapping::parse("sample_name index1\nA N501\n", Path::new("m.txt")).unwrap_err();
        assert!(matches!(err, AdapterError::MissingColumn { column: "index2", .. }));
    }

    #[test]
    fn duplicate_samples_are_rejected() {
        let err = SampleIndexMapping::parse(
            "sample_name index1 index2\nA N501 S505\nA N502 S502\n",
            Path::new("m.txt"),
        )
        .unwrap_err();
        assert!(matches!(err, AdapterError::DuplicateSample { ref sample } if sample == "A"));
    }

    #[test]
    fn unknown_sample_lists_valid_names() {
        let err = resolver().get_indices("Unknown").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Unknown"));
        assert!(msg.contains("SampleA") && msg.contains("SampleB"));
    }

    #[test]
    fn resolve_fills_all_six_slots() {
        let set = resolver().resolve("SampleA", true).unwrap();
        for slot in [Slot::Index1, Slot::Index2, Slot::Universal] {
            assert!(set.get(slot).unwrap().is_complete(), "{slot} incomplete");
        }
        assert_eq!(set.index2.rev.as_deref(), Some(">Nextera_index_S505|index_dna:S505\nGAGGAATG"));
        assert_eq!(set.entries(Orientation::Fwd).unwrap().len(), 3);
    }

    #[test]
    fn resolve_without_universal_has_two_slots() {
        let set = resolver().resolve("SampleA", false).unwrap();
        assert!(set.universal.is_none());
        assert_eq!(set.slots(), vec![Slot::Index1, Slot::Index2]);
    }

    #[test]
    fn missing_index_is_a_none_slot_and_blocks_saving() {
        let r = resolver();
        let set = r.resolve("SampleB", true).unwrap();
        assert_eq!(set.index2, AdapterPair::default());
        let err = set.validate().unwrap_err();
        assert!(matches!(
            err,
            AdapterError::MissingAdapter { slot: Slot::Index2, orientation: Orientation::Fwd, .. }
        ));

        let dir = tempfile::tempdir().unwrap();
        assert!(r.save_per_sample_fasta("SampleB", true, dir.path()).is_err());
        assert!(!dir.path().join("SampleB_adapters_fwd.fa").exists());
        assert!(!dir.path().join("SampleB_adapters_rev.fa").exists());
    }

    #[test]
    fn save_all_writes_nothing_when_a_later_sample_is_incomplete() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolver().save_all(true, dir.path()).unwrap_err();
        assert!(matches!(err, AdapterError::MissingAdapter { ref sample, .. } if sample == "SampleB"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn save_writes_universal_then_indices() {
        let dir = tempfile::tempdir().unwrap();
        let (fwd, rev) = resolver().save_per_sample_fasta("SampleA", true, dir.path()).unwrap();
        assert_eq!(fwd, dir.path().join("SampleA_adapters_fwd.fa"));
        let text = std::fs::read_to_string(&fwd).unwrap();
        assert_eq!(
            text,
            ">Universal_Adapter\nAATGATACGG\n\
             >Nextera_index_N501|index_dna:N501\nTAGATCGC\n\
             >Nextera_index_S505|index_dna:S505\nGTAAGGAG\n"
        );
        let text = std::fs::read_to_string(&rev).unwrap();
        assert!(text.starts_with(">Universal_Adapter\nGGCATAGTAA\n"));
    }
}
