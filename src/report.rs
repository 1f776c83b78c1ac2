//! Text rendering of scan and compare results. Plain, uncolored output for stdout.

use std::io::{self, Write};
use std::path::Path;

use crate::engine::tools::{display_path, sort_fold};
use crate::scan::sorted_groups;
use crate::{Comparison, CompareMode, HashIndex, IgnoreSet};

const INDENT: &str = "    ";

/// Header for a two-tree report, e.g. `Files in a also in b ignoring [b/tmp]`.
pub fn compare_header(mode: CompareMode, a: &Path, b: &Path, ignore: &IgnoreSet) -> String {
    let relation = match mode {
        CompareMode::Matches => "also in",
        CompareMode::Missing => "not in",
    };
    format!(
        "Files in {} {} {}{}",
        a.display(),
        relation,
        b.display(),
        ignoring_suffix(ignore)
    )
}

/// Header for duplicates within one tree (two-tree invocation naming the same directory).
pub fn intra_header(dir: &Path, ignore: &IgnoreSet) -> String {
    format!("Files duplicated in {}{}", dir.display(), ignoring_suffix(ignore))
}

fn ignoring_suffix(ignore: &IgnoreSet) -> String {
    let dirs = ignore.sorted_dirs();
    if dirs.is_empty() {
        return String::new();
    }
    let listed: Vec<String> = dirs.iter().map(|d| d.display().to_string()).collect();
    format!(" ignoring [{}]", listed.join(" "))
}

/// Header line followed by a blank line.
pub fn write_header<W: Write>(out: &mut W, header: &str) -> io::Result<()> {
    writeln!(out, "{}", header)?;
    writeln!(out)
}

/// One block per group in digest order: `<short-id> <count>`, then each path indented, in
/// case-insensitive order. Returns the number of groups written.
pub fn write_groups<W: Write>(
    out: &mut W,
    index: &HashIndex,
    dups_only: bool,
    quote: bool,
) -> io::Result<usize> {
    let groups = sorted_groups(index, dups_only);
    for (digest, paths) in &groups {
        writeln!(out, "{} {}", digest.short_id(), paths.len())?;
        let mut paths: Vec<&Path> = paths.iter().map(|p| p.as_path()).collect();
        sort_fold(&mut paths);
        for path in paths {
            writeln!(out, "{}{}", INDENT, display_path(path, quote))?;
        }
    }
    Ok(groups.len())
}

/// Matches: `<pathA> <short-id> <count>` then each B path indented. Returns lines-of-A written.
pub fn write_matches<W: Write>(out: &mut W, cmp: &Comparison, quote: bool) -> io::Result<usize> {
    for m in &cmp.matches {
        writeln!(
            out,
            "{} {} {}",
            display_path(&m.path, quote),
            m.digest.short_id(),
            m.others.len()
        )?;
        let mut others: Vec<&Path> = m.others.iter().map(|p| p.as_path()).collect();
        sort_fold(&mut others);
        for other in others {
            writeln!(out, "{}{}", INDENT, display_path(other, quote))?;
        }
    }
    Ok(cmp.matches.len())
}

/// A-only: `<short-id> <pathA>` per file.
pub fn write_missing<W: Write>(out: &mut W, cmp: &Comparison, quote: bool) -> io::Result<usize> {
    for (path, digest) in &cmp.a_only {
        writeln!(out, "{} {}", digest.short_id(), display_path(path, quote))?;
    }
    Ok(cmp.a_only.len())
}

/// Dispatch on `mode`.
pub fn write_comparison<W: Write>(
    out: &mut W,
    cmp: &Comparison,
    mode: CompareMode,
    quote: bool,
) -> io::Result<usize> {
    match mode {
        CompareMode::Matches => write_matches(out, cmp, quote),
        CompareMode::Missing => write_missing(out, cmp, quote),
    }
}
