//! tabdupe - Tolerance-aware duplicate row detection
//!
//! Flags rows of a table that duplicate an earlier row, where some columns
//! must match exactly and others may differ by up to a numeric tolerance.
//! Near-equal values chain: within a group of rows sharing the exact key,
//! each row is compared with its predecessor in sorted order.
//!
//! # Example
//!
//! ```
//! use tabdupe::duplicates::{duplicates_allclose, Tolerance};
//! use tabdupe::table::{Column, Table};
//!
//! let table = Table::from_columns(vec![
//!     Column::from_strs("A", &["c", "c", "e", "d", "d"]),
//!     Column::from_strs("B", &["a", "a", "c", "a", "a"]),
//!     Column::from_f64("C", &[1.0, 1.01, 2.0, 3.0, 3.01]),
//! ])
//! .unwrap();
//!
//! let flags = duplicates_allclose(&table, &["A", "B"], &["C"], &Tolerance::absolute(0.02)).unwrap();
//! assert_eq!(flags, [false, true, false, false, true]);
//! ```

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod flatten;
pub mod input;
pub mod logging;
pub mod output;
pub mod table;

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{bail, Context};
use yansi::Paint;

use crate::cli::{Cli, Commands, FindArgs, FlattenArgs, OutputFormat};
use crate::config::Config;
use crate::duplicates::{DetectionSummary, DuplicateFinder};
use crate::error::ExitCode;
use crate::output::{CsvOutput, FlagsOutput, JsonOutput};

/// Run the command described by `cli`.
///
/// Logging is not initialised here; the binary does that before calling.
///
/// # Errors
///
/// Returns an error if the input cannot be read, the column selection or
/// tolerance is invalid, or the output cannot be written. Use
/// [`ExitCode::for_error`] to map it to an exit code.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    if cli.no_color {
        yansi::disable();
    }

    match &cli.command {
        Commands::Find(args) => {
            let mut config = Config::load(cli.config.as_deref(), cli.profile.as_deref());
            config.merge_find_args(args);
            run_find(args, &config, cli.quiet)
        }
        Commands::Flatten(args) => run_flatten(args),
    }
}

fn run_find(args: &FindArgs, config: &Config, quiet: bool) -> anyhow::Result<ExitCode> {
    let table = input::load_table(&args.input, args.input_format)
        .with_context(|| format!("Failed to load {}", args.input.display()))?;

    let finder = DuplicateFinder::new(config.finder_config());
    let (flags, summary) = finder
        .find(&table, args.exact.as_slice(), args.tolerance.as_slice())
        .context("Duplicate detection failed")?;

    let exit_code = if flags.any() {
        ExitCode::Success
    } else {
        ExitCode::NoDuplicates
    };

    if args.drop && config.output != OutputFormat::Csv {
        log::warn!("--drop only applies to --output csv; ignoring it");
    }

    let mut sink = open_sink(args.destination.as_ref())?;
    match config.output {
        OutputFormat::Json => JsonOutput::new(&flags, &summary, exit_code)
            .write_to(&mut sink, config.pretty)
            .context("Failed to write JSON output")?,
        OutputFormat::Csv => CsvOutput::new(&table, &flags)
            .with_drop(args.drop)
            .write_to(&mut sink)
            .context("Failed to write CSV output")?,
        OutputFormat::Flags => FlagsOutput::new(&flags)
            .write_to(&mut sink)
            .context("Failed to write flags")?,
    }
    sink.flush().context("Failed to flush output")?;

    if let Some(path) = &args.destination {
        log::info!("Results written to {}", path.display());
    }
    if !quiet {
        print_summary(&summary);
    }
    Ok(exit_code)
}

fn run_flatten(args: &FlattenArgs) -> anyhow::Result<ExitCode> {
    if args.write && args.input.is_none() {
        bail!("--write requires --input");
    }
    let flat = match &args.input {
        Some(path) => flatten::flatten_file(path)
            .with_context(|| format!("Failed to flatten {}", path.display()))?,
        None => serde_json::Map::new(),
    };
    let rendered = serde_json::to_string_pretty(&flat).context("Failed to serialize")?;

    if args.should_print() {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{rendered}").context("Failed to write to stdout")?;
    }

    if let Some(input) = args.input.as_ref().filter(|_| args.write) {
        let stem = input
            .file_stem()
            .map_or_else(|| "flattened".into(), |s| s.to_string_lossy());
        let dir = args.destination.clone().unwrap_or_else(|| PathBuf::from("."));
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        let target = dir.join(format!("{stem}.flat.json"));
        fs::write(&target, format!("{rendered}\n"))
            .with_context(|| format!("Failed to write {}", target.display()))?;
        log::info!("Flattened document written to {}", target.display());
    }

    Ok(ExitCode::Success)
}

fn open_sink(destination: Option<&PathBuf>) -> anyhow::Result<Box<dyn Write>> {
    Ok(match destination {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

fn print_summary(summary: &DetectionSummary) {
    let flagged = if summary.duplicate_rows > 0 {
        summary.duplicate_rows.yellow().bold().to_string()
    } else {
        summary.duplicate_rows.green().to_string()
    };
    eprintln!(
        "{} {flagged} of {} rows flagged ({:.1}%), {} kept, {} candidate rows in {} key groups, {:.2?}",
        "Done:".bold(),
        summary.total_rows,
        summary.duplicate_percentage(),
        summary.kept_rows(),
        summary.candidate_rows,
        summary.key_groups,
        summary.duration,
    );
}
