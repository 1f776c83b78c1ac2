use clap::Parser;
use std::path::{Path, PathBuf};

struct DefaultArgs;

impl DefaultArgs {
    pub const DIR: &'static str = ".";
}

/// Find duplicate files in one tree, or files shared with / missing from a second tree.
#[derive(Clone, Parser)]
#[command(name = "dupwalk")]
#[command(
    about = "Find duplicate files by content. One DIR: duplicates within it. DIR1 DIR2: files of DIR1 missing from (or, with -d, also in) DIR2."
)]
pub struct Cli {
    /// Zero, one or two directories.
    #[arg(value_name = "DIR", num_args = 0..=2)]
    pub dirs: Vec<PathBuf>,

    /// Only report duplicates (one tree) or matches (two trees).
    #[arg(short = 'd', long = "dups")]
    pub dups: bool,

    /// Escape spaces in printed filenames.
    #[arg(long, short = 'q', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub quote: Option<bool>,

    /// Verbose output: debug logging, progress counter and walk totals on stderr.
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,

    /// Ignore everything under this directory path. Repeatable. With two trees and -d, also drops
    /// matches under it.
    #[arg(long = "ignore", short = 'i', value_name = "DIR")]
    pub ignore_dirs: Vec<PathBuf>,

    /// Ignore files with this name. Repeatable.
    #[arg(long = "ignore-file", short = 'f', value_name = "NAME")]
    pub ignore_files: Vec<String>,

    /// Ignore directories with this extension (e.g. `.app`). Repeatable.
    #[arg(long = "ignore-ext", short = 'e', value_name = "EXT")]
    pub ignore_exts: Vec<String>,

    /// Max in-flight walk + hash tasks. Default: 4 per available thread, capped by the FD limit.
    #[arg(long, short = 'w', value_parser = clap::value_parser!(usize))]
    pub workers: Option<usize>,

    /// Start with empty ignore lists instead of the built-in ones (.git, .app, .DS_Store, ...).
    #[arg(long)]
    pub no_default_ignores: bool,
}

impl Cli {
    /// First directory, defaulting to the current directory.
    pub fn first_dir(&self) -> &Path {
        self.dirs
            .first()
            .map(PathBuf::as_path)
            .unwrap_or(Path::new(DefaultArgs::DIR))
    }

    /// Second directory when two were given.
    pub fn second_dir(&self) -> Option<&Path> {
        self.dirs.get(1).map(PathBuf::as_path)
    }
}
