//! Converters between adapter FASTA files and the formats expected by
//! various trimmers.
//!
//! - [`fasta_fwd_rev_to_columns`]: one line per adapter, `FWD [REV]`
//! - [`adapters_to_clean_ngs`]: the adapters_ngs TSV layout
//! - [`parse_adapter_removal`]: adapter sequences from an AdapterRemoval log
use std::collections::BTreeMap;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use needletail::parse_fastx_file;

use crate::error::{AdapterError, Result};
use crate::fasta;

fn read_sequences(path: &Path) -> Result<Vec<Vec<u8>>> {
    let mut reader = parse_fastx_file(path).map_err(|e| AdapterError::fastx(path, e))?;
    let mut seqs = Vec::new();
    while let Some(record) = reader.next() {
        let record = record.map_err(|e| AdapterError::fastx(path, e))?;
        seqs.push(record.seq().into_owned());
    }
    Ok(seqs)
}

/// Write one line per record of `fwd`: its sequence, followed by a space and
/// the paired sequence of `rev` when given. Inputs may be FASTA or FASTQ,
/// optionally gzipped, and must pair one-to-one.
///
/// Returns the number of lines written. Failures on `out` are reported as
/// [`AdapterError::Output`].
pub fn fasta_fwd_rev_to_columns<W: Write>(fwd: &Path, rev: Option<&Path>, out: &mut W) -> Result<usize> {
    let fwd_seqs = read_sequences(fwd)?;
    let rev_seqs = match rev {
        Some(r) => {
            let seqs = read_sequences(r)?;
            if seqs.len() != fwd_seqs.len() {
                return Err(AdapterError::UnpairedRecords {
                    fwd_path: fwd.to_path_buf(),
                    fwd: fwd_seqs.len(),
                    rev_path: r.to_path_buf(),
                    rev: seqs.len(),
                });
            }
            Some(seqs)
        }
        None => None,
    };

    for (i, seq) in fwd_seqs.iter().enumerate() {
        out.write_all(seq).map_err(AdapterError::Output)?;
        if let Some(rev_seqs) = &rev_seqs {
            out.write_all(b" ").map_err(AdapterError::Output)?;
            out.write_all(&rev_seqs[i]).map_err(AdapterError::Output)?;
        }
        out.write_all(b"\n").map_err(AdapterError::Output)?;
    }
    Ok(fwd_seqs.len())
}

/// Rewrite a FASTA file as adapters_ngs rows:
/// `adapter_<n>\t<sequence>\t0.5\t31\t10\t0\t0`, numbered from 1.
pub fn adapters_to_clean_ngs<W: Write>(input: &Path, out: &mut W) -> Result<usize> {
    let records = fasta::read_records(input)?;
    for (i, rec) in records.iter().enumerate() {
        writeln!(out, "adapter_{}\t{}\t0.5\t31\t10\t0\t0", i + 1, rec.sequence)
            .map_err(AdapterError::Output)?;
    }
    Ok(records.len())
}

/// Collect the `  --adapterN: SEQUENCE` settings of an AdapterRemoval output
/// file, keyed by the option name without dashes (`adapter1`, `adapter2`, ...).
pub fn parse_adapter_removal<P: AsRef<Path>>(path: P) -> Result<BTreeMap<String, String>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| AdapterError::io(path, e))?;
    let mut results = BTreeMap::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| AdapterError::io(path, e))?;
        if !line.starts_with("  --adapter") {
            continue;
        }
        if let Some((lhs, rhs)) = line.split_once(':') {
            results.insert(lhs.trim().replace('-', ""), rhs.trim().to_string());
        }
    }
    Ok(results)
}
