use std::path::{Path, PathBuf};

use adapterdb::{
    AdapterCatalog, AdapterError, AdapterFamilies, AdapterRegistry, CatalogSources, IndexResolver, Orientation, Slot,
};
use tempfile::tempdir;

fn data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data")
}

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data").join(name)
}

fn nextera_resolver(mapping: &str) -> IndexResolver {
    IndexResolver::new(fixture(mapping), "Nextera", &AdapterFamilies::packaged(data_dir())).expect("resolver")
}

#[test]
fn packaged_nextera_files_load_and_pair() {
    let fwd = AdapterRegistry::from_path(data_dir().join("adapters_Nextera_PF1_220616_fwd.fa")).unwrap();
    let rev = AdapterRegistry::from_path(data_dir().join("adapters_Nextera_PF1_220616_rev.fa")).unwrap();
    assert_eq!(fwd.len(), 50);
    assert_eq!(rev.len(), 50);
    assert_eq!(fwd.names(), rev.names());
    let s505 = fwd.find_by_index_contains("S505").unwrap().unwrap();
    assert_eq!(
        s505,
        ">Nextera_index_S505|index_dna:S505\nAATGATACGGCGACCACCGAGATCTACACGTAAGGAGTCGTCGGCAGCGTC"
    );
}

#[test]
fn sample_a_resolves_all_six_slots_and_saves_in_order() {
    let resolver = nextera_resolver("index_mapping.txt");
    assert_eq!(resolver.sample_names(), vec!["SampleA", "SampleB", "SampleC"]);
    assert_eq!(resolver.get_indices("SampleA").unwrap(), ("N501", "S505"));

    let set = resolver.resolve("SampleA", true).unwrap();
    for slot in [Slot::Universal, Slot::Index1, Slot::Index2] {
        for o in [Orientation::Fwd, Orientation::Rev] {
            assert!(set.get(slot).and_then(|p| p.get(o)).is_some(), "{slot}/{o} missing");
        }
    }

    let dir = tempdir().unwrap();
    let (fwd, rev) = resolver.save_per_sample_fasta("SampleA", true, dir.path()).unwrap();
    assert_eq!(fwd.file_name().unwrap(), "SampleA_adapters_fwd.fa");
    assert_eq!(rev.file_name().unwrap(), "SampleA_adapters_rev.fa");

    let text = std::fs::read_to_string(&fwd).unwrap();
    let headers: Vec<&str> = text.lines().filter(|l| l.starts_with('>')).collect();
    assert_eq!(
        headers,
        vec![">Universal_Adapter", ">Nextera_index_N501|index_dna:N501", ">Nextera_index_S505|index_dna:S505"]
    );
    assert_eq!(text.lines().count(), 6);
    assert!(text.ends_with('\n') && !text.ends_with("\n\n"));

    // the per-sample files read back as a registry
    let back = AdapterRegistry::from_path(&rev).unwrap();
    assert_eq!(back.len(), 3);
}

#[test]
fn save_all_writes_every_sample() {
    let resolver = nextera_resolver("index_mapping.txt");
    let dir = tempdir().unwrap();
    let written = resolver.save_all(false, dir.path()).unwrap();
    assert_eq!(written.len(), 3);
    let text = std::fs::read_to_string(dir.path().join("SampleC_adapters_fwd.fa")).unwrap();
    assert!(text.starts_with(">Nextera_index_N702|index_dna:N702\n"));
    assert_eq!(text.lines().count(), 4);
}

#[test]
fn unknown_sample_and_family_are_fatal() {
    let resolver = nextera_resolver("index_mapping.txt");
    let err = resolver.get_indices("Unknown").unwrap_err();
    assert!(err.to_string().contains("SampleA, SampleB, SampleC"));

    let err = IndexResolver::new(fixture("index_mapping.txt"), "TruSeq", &AdapterFamilies::packaged(data_dir()))
        .unwrap_err();
    assert!(matches!(err, AdapterError::UnsupportedFamily { .. }));
}

#[test]
fn missing_index_leaves_no_partial_files() {
    let resolver = nextera_resolver("index_mapping_missing.txt");
    let dir = tempdir().unwrap();
    let err = resolver.save_per_sample_fasta("SampleZ", true, dir.path()).unwrap_err();
    match err {
        AdapterError::MissingAdapter { sample, slot, orientation } => {
            assert_eq!(sample, "SampleZ");
            assert_eq!(slot, Slot::Index1);
            assert_eq!(orientation, Orientation::Fwd);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn save_all_leaves_no_files_when_any_sample_is_incomplete() {
    let resolver = nextera_resolver("index_mapping_missing.txt");
    let dir = tempdir().unwrap();
    let err = resolver.save_all(true, dir.path()).unwrap_err();
    assert!(matches!(err, AdapterError::MissingAdapter { ref sample, .. } if sample == "SampleZ"));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn packaged_nextera_covers_the_full_index_set() {
    let fwd = AdapterRegistry::from_path(data_dir().join("adapters_Nextera_PF1_220616_fwd.fa")).unwrap();
    let rev = AdapterRegistry::from_path(data_dir().join("adapters_Nextera_PF1_220616_rev.fa")).unwrap();
    for code in ["N508", "N712", "N729", "S508", "S522"] {
        assert!(fwd.find_by_index_contains(code).unwrap().is_some(), "{code} fwd");
        assert!(rev.find_by_index_contains(code).unwrap().is_some(), "{code} rev");
    }
    // reverse entries are the reverse complement of the forward ones
    let complement = |c: char| match c {
        'A' => 'T',
        'C' => 'G',
        'G' => 'C',
        'T' => 'A',
        other => other,
    };
    for (f, r) in fwd.iter().zip(rev.iter()) {
        let rc: String = f.sequence.chars().rev().map(complement).collect();
        assert_eq!(rc, r.sequence, "{}", f.name);
    }
}

#[test]
fn duplicated_names_fixture_is_rejected() {
    let err = AdapterRegistry::from_path(fixture("duplicated_names.fa")).unwrap_err();
    assert!(err.to_string().contains("Nextera_index_N501|index_dna:N501"));
}

#[test]
fn packaged_catalog_loads_without_duplicates() {
    let mut catalog = AdapterCatalog::new();
    let n = catalog.load_all(&CatalogSources::packaged(data_dir())).unwrap();
    assert_eq!(n, catalog.len());
    assert!(!catalog.has_duplicate_identifiers());
    assert_eq!(n, 62);
    assert_eq!(catalog.resolve_identifier("1000057").unwrap(), Some("TruSeq universal adapter"));
    assert_eq!(catalog.resolve_identifier("1000055").unwrap(), Some("SMARTer II A oligonucleotide"));
    assert_eq!(catalog.resolve_identifier("1000060").unwrap(), Some("Small RNA 3' adapter"));

    // a second load of one file duplicates its identifiers but stays usable
    catalog.load(data_dir().join("adapters_TruSeq_kraken.fa")).unwrap();
    assert_eq!(catalog.len(), n + 3);
    assert!(catalog.has_duplicate_identifiers());
    assert_eq!(catalog.resolve_identifier("1000057").unwrap(), None);
    assert_eq!(catalog.resolve_identifier("1000001").unwrap(), Some("PCR-free universal adapter"));
}
