//! Load `.dupwalk.toml` from a directory (CLI only). Lib does not use this; callers build
//! [`ScanOpts`](crate::ScanOpts) themselves.

use serde::Deserialize;
use std::path::Path;

use crate::utils::config::PackagePaths;
use crate::{IgnoreSet, Opts};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DupwalkToml {
    #[serde(default)]
    settings: SettingsSection,
    #[serde(default)]
    ignore: IgnoreSection,
}

#[derive(Debug, Default, Deserialize)]
struct SettingsSection {
    workers: Option<usize>,
    quote: Option<bool>,
    verbose: Option<bool>,
    /// Start from the built-in ignore lists (default true).
    defaults: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct IgnoreSection {
    dir_exts: Option<Vec<String>>,
    dirs: Option<Vec<String>>,
    files: Option<Vec<String>>,
}

impl DupwalkToml {
    /// Whether the file asks to start without the built-in ignore lists.
    pub(crate) fn use_default_ignores(&self) -> bool {
        self.settings.defaults.unwrap_or(true)
    }

    /// `verbose` from the file, needed before logging is set up.
    pub(crate) fn verbose(&self) -> Option<bool> {
        self.settings.verbose
    }
}

/// Parse config text. Errors are reported by the caller.
pub(crate) fn parse_dupwalk_toml(s: &str) -> Result<DupwalkToml, toml::de::Error> {
    toml::from_str(s)
}

/// Load the config file from `dir`. Ok(None) if missing or unreadable; Err carries a message
/// for a malformed file, which the caller warns about once logging is up.
pub(crate) fn load_dupwalk_toml(dir: &Path) -> Result<Option<DupwalkToml>, String> {
    let path = dir.join(PackagePaths::get().config_filename());
    let Ok(s) = std::fs::read_to_string(&path) else {
        return Ok(None);
    };
    parse_dupwalk_toml(&s)
        .map(Some)
        .map_err(|e| format!("ignoring {}: {}", path.display(), e))
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($sec:expr, $target:expr, $sec_field:ident => $target_field:ident) => {
        if let Some(v) = $sec.$sec_field {
            $target.$target_field = v;
        }
    };
}

/// Apply file config to opts (only fields present in the file). Call before applying CLI flags.
pub(crate) fn apply_file_to_opts(file: &DupwalkToml, opts: &mut Opts) {
    let settings = &file.settings;
    if settings.workers.is_some() {
        opts.scan.workers = settings.workers;
    }
    apply_file_opt!(settings, opts, quote => quote);
    apply_file_opt!(settings, opts.scan, verbose => verbose);
    apply_file_to_ignores(&file.ignore, &mut opts.scan.ignore);
}

fn apply_file_to_ignores(section: &IgnoreSection, ignore: &mut IgnoreSet) {
    for ext in section.dir_exts.iter().flatten() {
        ignore.add_dir_ext(ext);
    }
    for dir in section.dirs.iter().flatten() {
        ignore.add_dir(dir);
    }
    for name in section.files.iter().flatten() {
        ignore.add_file(name.as_str());
    }
}
