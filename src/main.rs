//! ArcIO CLI - Command-line tool for ARC archives and PNAP atlases.
//!
//! This is the main entry point for the ArcIO command-line application.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufReader, Read, Seek};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use glob::{MatchOptions, Pattern};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use arcio::prelude::*;

/// ArcIO - ARC archive and PNAP atlas tool
#[derive(Parser)]
#[command(name = "arcio")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log what the codecs are doing
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the contents of ARC archives
    List {
        /// Archives to list
        inputs: Vec<PathBuf>,

        #[command(flatten)]
        select: Selection,

        /// List every *.arc file in the current directory
        #[arg(short, long)]
        include_all: bool,
    },

    /// Extract ARC archives, unpacking any PNAP atlases found inside
    Extract {
        /// Archives to extract
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, env = "ARCIO_OUTPUT", default_value = ".")]
        output: PathBuf,

        #[command(flatten)]
        select: Selection,

        /// Extract straight into the output directory instead of one folder per archive
        #[arg(short, long)]
        flatfile: bool,

        /// Extract every *.arc file in the current directory
        #[arg(short, long)]
        include_all: bool,
    },

    /// Pack files and directories into an ARC archive
    Create {
        /// Files and directories to pack
        inputs: Vec<PathBuf>,

        /// Output archive
        #[arg(short, long, env = "ARCIO_OUTPUT", default_value = "Pack.arc")]
        output: PathBuf,

        /// Pack every file under the current directory
        #[arg(short, long)]
        include_all: bool,
    },
}

/// Entry selection shared by `list` and `extract`.
#[derive(Args)]
struct Selection {
    /// Only entries with exactly these names (comma separated)
    #[arg(short = 'n', long, value_delimiter = ',')]
    only_named: Vec<String>,

    /// Only entries matching a glob pattern (case-insensitive)
    #[arg(long)]
    filter: Option<String>,
}

/// Resolved entry filter.
struct EntryFilter {
    names: Vec<String>,
    pattern: Option<Pattern>,
}

impl EntryFilter {
    fn from_selection(select: Selection) -> Result<Self> {
        let pattern = select
            .filter
            .as_deref()
            .map(Pattern::new)
            .transpose()
            .context("Invalid filter pattern")?;

        Ok(Self {
            names: select.only_named,
            pattern,
        })
    }

    fn matches(&self, entry: &ArcEntry) -> bool {
        if !self.names.is_empty() && !self.names.iter().any(|n| n == &entry.filename) {
            return false;
        }

        match &self.pattern {
            Some(pattern) => pattern.matches_with(
                &entry.filename,
                MatchOptions {
                    case_sensitive: false,
                    ..MatchOptions::new()
                },
            ),
            None => true,
        }
    }
}

struct ExtractOptions {
    output: PathBuf,
    flatfile: bool,
    filter: EntryFilter,
}

struct CreateOptions {
    output: PathBuf,
    sources: Vec<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::List {
            inputs,
            select,
            include_all,
        } => {
            let archives = resolve_archives(inputs, include_all)?;
            let filter = EntryFilter::from_selection(select)?;
            cmd_list(&archives, &filter)?;
        }
        Commands::Extract {
            inputs,
            output,
            select,
            flatfile,
            include_all,
        } => {
            let archives = resolve_archives(inputs, include_all)?;
            let options = ExtractOptions {
                output,
                flatfile,
                filter: EntryFilter::from_selection(select)?,
            };
            cmd_extract(&archives, &options)?;
        }
        Commands::Create {
            inputs,
            output,
            include_all,
        } => {
            let roots = if include_all {
                vec![PathBuf::from(".")]
            } else {
                inputs
            };
            if roots.is_empty() {
                anyhow::bail!("No input files given");
            }

            let output = with_arc_extension(output);
            let options = CreateOptions {
                sources: collect_sources(&roots, &output),
                output,
            };
            cmd_create(&options)?;
        }
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise `--verbose` selects debug output.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn resolve_archives(inputs: Vec<PathBuf>, include_all: bool) -> Result<Vec<PathBuf>> {
    let archives = if include_all {
        let options = MatchOptions {
            case_sensitive: false,
            ..MatchOptions::new()
        };
        let mut found: Vec<PathBuf> = glob::glob_with("*.arc", options)
            .context("Invalid archive pattern")?
            .filter_map(|path| match path {
                Ok(path) => Some(path),
                Err(e) => {
                    warn!("{}", e);
                    None
                }
            })
            .collect();
        found.sort();
        found
    } else {
        inputs
    };

    if archives.is_empty() {
        anyhow::bail!("No input archives given");
    }

    Ok(archives)
}

fn open_archive(path: &Path) -> Option<ArcArchive<BufReader<File>>> {
    match ArcArchive::open(path, &mut TracingSink) {
        Ok(archive) => Some(archive),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "decode failed");
            eprintln!("{} does not appear to be an arc file; skipping", path.display());
            None
        }
    }
}

fn cmd_list(archives: &[PathBuf], filter: &EntryFilter) -> Result<()> {
    let mut failed = 0;

    for path in archives {
        let Some(archive) = open_archive(path) else {
            failed += 1;
            continue;
        };

        println!("{}:", path.display());

        let mut count = 0;
        let mut total: u64 = 0;
        for entry in archive.entries().iter().filter(|e| filter.matches(e)) {
            println!("\t-{} ({} bytes)", entry.filename, entry.length);
            count += 1;
            total += u64::from(entry.length);
        }

        println!("{} files ({} bytes)\n", count, total);
    }

    if failed == archives.len() {
        anyhow::bail!("None of the inputs could be read as an arc file");
    }

    Ok(())
}

fn cmd_extract(archives: &[PathBuf], options: &ExtractOptions) -> Result<()> {
    let mut failed = 0;

    for path in archives {
        let Some(mut archive) = open_archive(path) else {
            failed += 1;
            continue;
        };

        match extract_archive(&mut archive, path, options) {
            Ok(summary) => println!(
                "Extracted {} entries ({} PNAP atlases) in {:?} ({} errors)",
                summary.extracted, summary.atlases, summary.elapsed, summary.errors
            ),
            Err(e) => {
                eprintln!("Error extracting {}: {:#}; skipping", path.display(), e);
                failed += 1;
            }
        }
    }

    if failed == archives.len() {
        anyhow::bail!("None of the inputs could be extracted");
    }

    Ok(())
}

/// Counts for one extracted archive.
struct ExtractSummary {
    extracted: usize,
    atlases: usize,
    errors: usize,
    elapsed: Duration,
}

/// Extract one decoded archive into its output directory.
///
/// Fails only when the output directory cannot be prepared; per-entry
/// failures are printed and counted in the summary.
fn extract_archive<R: Read + Seek>(
    archive: &mut ArcArchive<R>,
    path: &Path,
    options: &ExtractOptions,
) -> Result<ExtractSummary> {
    let dest = archive_output_dir(&options.output, path, options.flatfile);
    if !options.flatfile && dest.exists() {
        fs::remove_dir_all(&dest)
            .with_context(|| format!("Failed to clear {}", dest.display()))?;
    }
    fs::create_dir_all(&dest).with_context(|| format!("Failed to create {}", dest.display()))?;

    let indices: Vec<usize> = archive
        .entries()
        .iter()
        .enumerate()
        .filter(|(_, e)| options.filter.matches(e))
        .map(|(i, _)| i)
        .collect();

    println!(
        "Extracting {} of {} entries ({} bytes) from {} to {}",
        indices.len(),
        archive.entry_count(),
        archive.manifest().total_size(),
        path.display(),
        dest.display()
    );

    let pb = ProgressBar::new(indices.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let mut summary = ExtractSummary {
        extracted: 0,
        atlases: 0,
        errors: 0,
        elapsed: Duration::ZERO,
    };

    for index in indices {
        match archive.extract(index, &dest) {
            Ok(written) => {
                summary.extracted += 1;
                match unpack_atlas(&written) {
                    Ok(true) => summary.atlases += 1,
                    Ok(false) => {}
                    Err(e) => {
                        pb.println(format!("Error unpacking {}: {:#}", written.display(), e));
                        summary.errors += 1;
                    }
                }
            }
            Err(e) => {
                let name = archive.get(index).map_or("?", |entry| entry.filename.as_str());
                pb.println(format!("Error extracting {}: {}", name, e));
                summary.errors += 1;
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("Done");
    summary.elapsed = start.elapsed();

    Ok(summary)
}

/// Unpack `path` if it is a PNAP container. Returns whether it was one.
fn unpack_atlas(path: &Path) -> Result<bool> {
    let mut container = match PnapContainer::open(path) {
        Ok(Some(container)) => container,
        Ok(None) => return Ok(false),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "malformed PNAP container, kept as a plain file");
            return Ok(false);
        }
    };

    container
        .unpack_tiles(&mut TracingSink)
        .context("Failed to unpack tiles")?;
    container
        .write_layout()
        .context("Failed to write layout report")?;

    Ok(true)
}

fn cmd_create(options: &CreateOptions) -> Result<()> {
    if options.sources.is_empty() {
        anyhow::bail!("Nothing to pack");
    }

    println!(
        "Packing {} files into {}",
        options.sources.len(),
        options.output.display()
    );

    let start = Instant::now();
    let bytes = encode_arc(&options.sources).context("Failed to build archive")?;

    if let Some(parent) = options.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(&options.output, &bytes).context("Failed to write archive")?;

    println!("Wrote {} bytes in {:?}", bytes.len(), start.elapsed());

    Ok(())
}

/// Per-archive output directory: `<output>/<archive stem>`, or `<output>` when flat.
fn archive_output_dir(output: &Path, archive: &Path, flatfile: bool) -> PathBuf {
    if flatfile {
        return output.to_path_buf();
    }

    let stem = archive
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("archive"));
    output.join(stem)
}

/// Append `.arc` unless the name already ends with it.
fn with_arc_extension(output: PathBuf) -> PathBuf {
    let has_ext = output
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("arc"));
    if has_ext {
        return output;
    }

    let mut name = output.into_os_string();
    name.push(".arc");
    PathBuf::from(name)
}

/// Expand directories into their files, sorted by name. Missing paths are skipped.
fn collect_sources(roots: &[PathBuf], output: &Path) -> Vec<PathBuf> {
    let existing_output = fs::canonicalize(output).ok();
    let mut sources = Vec::new();

    for root in roots {
        if root.is_file() {
            sources.push(root.clone());
        } else if root.is_dir() {
            for entry in WalkDir::new(root).sort_by_file_name() {
                match entry {
                    Ok(entry) if entry.file_type().is_file() => {
                        let path = entry.into_path();
                        if existing_output.is_some() && fs::canonicalize(&path).ok() == existing_output {
                            continue;
                        }
                        sources.push(path);
                    }
                    Ok(_) => {}
                    Err(e) => warn!("{}", e),
                }
            }
        } else {
            eprintln!("{} does not exist; skipping", root.display());
        }
    }

    sources
}
