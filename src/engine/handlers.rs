//! Command handler: options from config file + flags, mode selection, report to stdout.

use anyhow::{Result, bail};
use colored::Colorize;
use log::{debug, info, warn};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::compare::{compare_dirs, cross_reference};
use crate::engine::arg_parser::Cli;
use crate::engine::tools::same_dir;
use crate::report::{compare_header, intra_header, write_comparison, write_groups, write_header};
use crate::scan::scan_dir;
use crate::utils::dupwalk_toml::{DupwalkToml, apply_file_to_opts, load_dupwalk_toml};
use crate::utils::setup_logging;
use crate::{CompareMode, IgnoreSet, Opts, WalkTotals};

/// What one invocation does, decided from the positionals and `-d`.
#[derive(Debug, PartialEq, Eq)]
pub enum RunMode<'a> {
    /// Groups within one tree (all, or duplicates only with `-d`).
    Single(&'a Path),
    /// Same directory given twice with `-d`: duplicates within it, under a header.
    Intra(&'a Path),
    /// Two trees: matches with `-d`, A-only without.
    Compare(&'a Path, &'a Path, CompareMode),
}

/// Merge built-in ignores, the config file and CLI flags (in that order; later wins or extends).
pub(crate) fn build_opts(cli: &Cli, file: Option<&DupwalkToml>) -> Opts {
    let use_defaults = !cli.no_default_ignores && file.is_none_or(|f| f.use_default_ignores());
    let mut opts = Opts::default();
    if use_defaults {
        opts.scan.ignore = IgnoreSet::with_defaults();
    }
    if let Some(file) = file {
        apply_file_to_opts(file, &mut opts);
    }

    if let Some(quote) = cli.quote {
        opts.quote = quote;
    }
    if let Some(verbose) = cli.verbose {
        opts.scan.verbose = verbose;
    }
    if cli.workers.is_some() {
        opts.scan.workers = cli.workers;
    }
    for dir in &cli.ignore_dirs {
        opts.scan.ignore.add_dir(dir.clone());
    }
    for name in &cli.ignore_files {
        opts.scan.ignore.add_file(name.as_str());
    }
    for ext in &cli.ignore_exts {
        opts.scan.ignore.add_dir_ext(ext);
    }
    opts.dups_only = cli.dups;
    opts
}

/// Pick the run mode. Configuration errors are reported before anything is walked.
pub fn select_mode(cli: &Cli) -> Result<RunMode<'_>> {
    match cli.second_dir() {
        None if cli.dirs.is_empty() && !cli.dups => {
            bail!("no directories specified (give DIR, or -d to search the current directory)")
        }
        None => Ok(RunMode::Single(cli.first_dir())),
        Some(second) => {
            let first = cli.first_dir();
            if same_dir(first, second) {
                if cli.dups {
                    Ok(RunMode::Intra(first))
                } else {
                    bail!("same directory specified twice: {}", first.display())
                }
            } else if cli.dups {
                Ok(RunMode::Compare(first, second, CompareMode::Matches))
            } else {
                Ok(RunMode::Compare(first, second, CompareMode::Missing))
            }
        }
    }
}

/// Handle a dupwalk invocation end to end.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let file = load_dupwalk_toml(Path::new("."));
    let file_verbose = file
        .as_ref()
        .ok()
        .and_then(Option::as_ref)
        .and_then(DupwalkToml::verbose);
    setup_logging(cli.verbose.or(file_verbose).unwrap_or(false));
    let file = file.unwrap_or_else(|msg| {
        warn!("{}", msg);
        None
    });

    let opts = build_opts(cli, file.as_ref());
    debug!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_uppercase(),
        opts
    );
    let mode = select_mode(cli)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    match mode {
        RunMode::Single(dir) => {
            let (index, totals) = scan_dir(dir, &opts.scan)?;
            write_groups(&mut out, &index, opts.dups_only, opts.quote)?;
            report_totals(&opts, &[totals]);
        }
        RunMode::Intra(dir) => {
            let (index, totals) = scan_dir(dir, &opts.scan)?;
            write_header(&mut out, &intra_header(dir, &opts.scan.ignore))?;
            write_groups(&mut out, &index, true, opts.quote)?;
            report_totals(&opts, &[totals]);
        }
        RunMode::Compare(a, b, mode) => {
            let indices = compare_dirs(a, b, &opts.scan)?;
            let exclude = opts.scan.ignore.sorted_dirs();
            let cmp = cross_reference(&indices.a, &indices.b, &exclude);
            write_header(&mut out, &compare_header(mode, a, b, &opts.scan.ignore))?;
            write_comparison(&mut out, &cmp, mode, opts.quote)?;
            report_totals(&opts, &[indices.a_totals, indices.b_totals]);
        }
    }
    out.flush()?;
    Ok(())
}

/// Verbose only: walk totals across every tree of the run.
fn report_totals(opts: &Opts, totals: &[WalkTotals]) {
    if !opts.scan.verbose {
        return;
    }
    let dirs: usize = totals.iter().map(|t| t.dirs).sum();
    let files: usize = totals.iter().map(|t| t.files).sum();
    info!(
        "found {} dirs, {} files",
        dirs.to_string().bold(),
        files.to_string().bold()
    );
}
