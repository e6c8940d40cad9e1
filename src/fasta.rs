//! FASTA input for adapter files.
//!
//! Parsing is delegated to `bio::io::fasta`, which splits each header at the
//! first whitespace into an id (our `name`) and a description (our `comment`)
//! and joins wrapped sequence lines.
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use bio::io::fasta;

use crate::error::{AdapterError, Result};
use crate::record::AdapterRecord;

/// Read every record of a FASTA file, in file order.
pub fn read_records(path: &Path) -> Result<Vec<AdapterRecord>> {
    let file = File::open(path).map_err(|e| AdapterError::io(path, e))?;
    let records = read_records_from(file, path)?;
    log::debug!("read {} adapter(s) from {}", records.len(), path.display());
    Ok(records)
}

/// Read records from any reader; `origin` is only used in error messages.
pub fn read_records_from<R: Read>(reader: R, origin: &Path) -> Result<Vec<AdapterRecord>> {
    fasta::Reader::new(reader)
        .records()
        .map(|rec| {
            let rec = rec.map_err(|e| AdapterError::Fasta { path: origin.to_path_buf(), source: e })?;
            Ok(AdapterRecord {
                name: rec.id().to_string(),
                comment: rec.desc().unwrap_or_default().to_string(),
                sequence: String::from_utf8_lossy(rec.seq()).into_owned(),
            })
        })
        .collect()
}

/// Create `path` and hand a buffered writer to `body`, flushing on success.
pub(crate) fn write_file<F>(path: &Path, body: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
{
    let file = File::create(path).map_err(|e| AdapterError::io(path, e))?;
    let mut w = BufWriter::new(file);
    body(&mut w).and_then(|_| w.flush()).map_err(|e| AdapterError::io(path, e))
}
