use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use polars::prelude::*;

use adapterdb::{
    convert, AdapterCatalog, AdapterFamilies, AdapterRegistry, CatalogSources, FamilyFiles, IndexResolver,
    LookupPolicy, NEXTERA,
};

/// adapterdb CLI
#[derive(Parser)]
#[command(name = "adapterdb")]
#[command(version)]
#[command(about = "Adapter FASTA registry, kraken catalog and per-sample adapter files", long_about = None)]
struct Cli {
    /// Directory holding the packaged adapter files
    #[arg(long, global = true, env = "ADAPTERDB_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// More logging (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show every adapter of a FASTA file
    Describe {
        fasta: PathBuf,
    },

    /// Look up adapters by index tag, name or sequence fragment
    Find {
        fasta: PathBuf,
        #[command(flatten)]
        query: FindQuery,
    },

    /// Write the adapters with every sequence reversed (not complemented)
    Reverse {
        fasta: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Load kraken-tagged adapter files and show or query the catalog
    Catalog {
        /// Files to load (Name|kraken:taxid|IDENTIFIER headers)
        files: Vec<PathBuf>,
        /// Also load every packaged catalog file from --data-dir
        #[arg(long)]
        all: bool,
        /// Print the comment of this identifier instead of the table
        #[arg(long)]
        identifier: Option<String>,
        /// Fail when the identifier is shared by several entries
        #[arg(long)]
        strict: bool,
    },

    /// Write {sample}_adapters_fwd.fa / _rev.fa for samples of an index mapping table
    Split {
        /// Whitespace-delimited table with sample_name, index1 and index2 columns
        mapping: PathBuf,
        /// Adapter family
        #[arg(long, default_value = NEXTERA)]
        family: String,
        /// Forward adapter file (overrides the family's packaged file)
        #[arg(long, requires = "rev")]
        fwd: Option<PathBuf>,
        /// Reverse adapter file (overrides the family's packaged file)
        #[arg(long, requires = "fwd")]
        rev: Option<PathBuf>,
        /// Only this sample (default: all)
        #[arg(long)]
        sample: Option<String>,
        /// Leave out the universal adapter
        #[arg(long)]
        no_universal: bool,
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// One line per adapter: forward sequence [space reverse sequence]
    Columns {
        fwd: PathBuf,
        rev: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert FASTA adapters to the adapters_ngs TSV format
    CleanNgs {
        fasta: PathBuf,
        #[arg(short, long, default_value = "adapters_ngs.txt")]
        output: PathBuf,
    },

    /// Print the adapter sequences recorded in an AdapterRemoval output file
    Removal {
        file: PathBuf,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct FindQuery {
    /// Index tag, e.g. N501
    #[arg(long)]
    index: Option<String>,
    /// Substring of the adapter name
    #[arg(long)]
    name: Option<String>,
    /// Substring of the adapter sequence
    #[arg(long)]
    sequence: Option<String>,
}

fn setup_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Describe { fasta } => cmd_describe(&fasta),
        Commands::Find { fasta, query } => cmd_find(&fasta, query),
        Commands::Reverse { fasta, output } => {
            let reg = adapterdb::load_registry(&fasta, true)?;
            reg.write_fasta(&output)?;
            Ok(())
        }
        Commands::Catalog { files, all, identifier, strict } => {
            cmd_catalog(&cli.data_dir, files, all, identifier, strict)
        }
        Commands::Split { mapping, family, fwd, rev, sample, no_universal, output_dir } => {
            let families = match (fwd, rev) {
                (Some(fwd), Some(rev)) => {
                    let mut f = AdapterFamilies::new();
                    f.insert(family.clone(), FamilyFiles { fwd, rev });
                    f
                }
                _ => AdapterFamilies::packaged(&cli.data_dir),
            };
            let resolver = IndexResolver::new(&mapping, &family, &families)
                .with_context(|| format!("cannot set up {family} adapters for {}", mapping.display()))?;
            std::fs::create_dir_all(&output_dir)
                .with_context(|| format!("cannot create {}", output_dir.display()))?;
            let written = match sample {
                Some(s) => vec![resolver.save_per_sample_fasta(&s, !no_universal, &output_dir)?],
                None => resolver.save_all(!no_universal, &output_dir)?,
            };
            for (f, r) in written {
                println!("{}\t{}", f.display(), r.display());
            }
            Ok(())
        }
        Commands::Columns { fwd, rev, output } => {
            let n = match output {
                Some(path) => {
                    let mut w = BufWriter::new(
                        File::create(&path).with_context(|| format!("cannot create {}", path.display()))?,
                    );
                    let n = convert::fasta_fwd_rev_to_columns(&fwd, rev.as_deref(), &mut w)
                        .with_context(|| format!("cannot write {}", path.display()))?;
                    w.flush().with_context(|| format!("cannot write {}", path.display()))?;
                    n
                }
                None => convert::fasta_fwd_rev_to_columns(&fwd, rev.as_deref(), &mut std::io::stdout().lock())?,
            };
            log::info!("{n} adapter line(s) written");
            Ok(())
        }
        Commands::CleanNgs { fasta, output } => {
            let mut w = BufWriter::new(
                File::create(&output).with_context(|| format!("cannot create {}", output.display()))?,
            );
            let n = convert::adapters_to_clean_ngs(&fasta, &mut w)
                .with_context(|| format!("cannot write {}", output.display()))?;
            w.flush().with_context(|| format!("cannot write {}", output.display()))?;
            log::info!("{n} adapter(s) written to {}", output.display());
            Ok(())
        }
        Commands::Removal { file } => {
            for (name, seq) in convert::parse_adapter_removal(&file)? {
                println!("{name}\t{seq}");
            }
            Ok(())
        }
    }
}

fn configure_polars_display() {
    std::env::set_var("POLARS_FMT_TABLE_FORMATTING", "UTF8_FULL");
    std::env::set_var("POLARS_FMT_MAX_COLS", "100000");
    std::env::set_var("POLARS_FMT_MAX_ROWS", "1000000");
    std::env::set_var("POLARS_FMT_STR_LEN", "100000");
    std::env::set_var("POLARS_TABLE_WIDTH", "65535");
}

fn cmd_describe(fasta: &Path) -> Result<()> {
    let reg = AdapterRegistry::from_path(fasta)?;
    let rows = adapterdb::describe_registry_rows(&reg);
    let df = df!(
        "name"     => rows.iter().map(|r| r.0.clone()).collect::<Vec<_>>(),
        "comment"  => rows.iter().map(|r| r.1.clone()).collect::<Vec<_>>(),
        "sequence" => rows.iter().map(|r| r.2.clone()).collect::<Vec<_>>(),
        "length"   => rows.iter().map(|r| r.3 as u64).collect::<Vec<_>>(),
    )?;
    configure_polars_display();
    println!("{}", df);
    Ok(())
}

fn cmd_find(fasta: &Path, query: FindQuery) -> Result<()> {
    let reg = AdapterRegistry::from_path(fasta)?;
    let hit = match (query.index, query.name, query.sequence) {
        (Some(index), _, _) => reg.find_by_index_contains(&index)?,
        (_, Some(name), _) => reg.find_by_name_contains(&name)?,
        (_, _, Some(seq)) => reg.find_by_sequence_contains(&seq),
        _ => bail!("one of --index, --name or --sequence is required"),
    };
    match hit {
        Some(text) => {
            println!("{text}");
            Ok(())
        }
        None => bail!("not found in {}", fasta.display()),
    }
}

fn cmd_catalog(
    data_dir: &Path,
    files: Vec<PathBuf>,
    all: bool,
    identifier: Option<String>,
    strict: bool,
) -> Result<()> {
    if files.is_empty() && !all {
        bail!("give adapter files to load or --all");
    }
    let policy = if strict { LookupPolicy::Strict } else { LookupPolicy::Lenient };
    let mut catalog = AdapterCatalog::with_policy(policy);
    if all {
        catalog.load_all(&CatalogSources::packaged(data_dir))?;
    }
    for f in &files {
        catalog.load(f)?;
    }

    match identifier {
        Some(id) => match catalog.resolve_identifier(&id)? {
            Some(comment) => println!("{comment}"),
            None => bail!("identifier {id} did not resolve to a single adapter"),
        },
        None => {
            let df = catalog.to_dataframe()?;
            configure_polars_display();
            println!("{}", df);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_requires_exactly_one_query() {
        assert!(Cli::try_parse_from(["adapterdb", "find", "a.fa"]).is_err());
        assert!(Cli::try_parse_from(["adapterdb", "find", "a.fa", "--index", "N501", "--name", "x"]).is_err());
        assert!(Cli::try_parse_from(["adapterdb", "find", "a.fa", "--index", "N501"]).is_ok());
    }

    #[test]
    fn split_defaults() {
        let cli = Cli::try_parse_from(["adapterdb", "split", "mapping.txt"]).unwrap();
        match cli.command {
            Commands::Split { family, no_universal, output_dir, fwd, .. } => {
                assert_eq!(family, "Nextera");
                assert!(!no_universal);
                assert_eq!(output_dir, PathBuf::from("."));
                assert!(fwd.is_none());
            }
            _ => panic!("expected split"),
        }
    }

    #[test]
    fn split_fwd_requires_rev() {
        assert!(Cli::try_parse_from(["adapterdb", "split", "m.txt", "--fwd", "f.fa"]).is_err());
    }
}
