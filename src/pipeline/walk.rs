//! Recursive walk: one task per directory, one task per file to hash.
//!
//! Every task is counted in the spawner (see [`TaskToken`]), waits for a permit before doing
//! any I/O, and gives the permit back as soon as its own work is done. Subdirectories are not
//! waited on; they are new tasks.

use anyhow::{Result, anyhow};
use log::trace;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use walkdir::WalkDir;

use crate::PathRecord;
use crate::engine::hashing::hash_file;

use super::context::WalkContext;
use super::error_handler::walk_error_is_vanished;
use super::join::TaskToken;

/// Hand a directory walk to the pool. `token` must already be counted.
pub fn spawn_walk(ctx: &Arc<WalkContext>, dir: PathBuf, token: TaskToken) {
    let task_ctx = Arc::clone(ctx);
    ctx.exec.pool.spawn(move || {
        walk_dir(&task_ctx, &dir, &token);
        // Release our sender before the count can reach zero.
        drop(task_ctx);
        drop(token);
    });
}

/// Hand a file hash to the pool. `token` must already be counted.
pub fn spawn_hash(ctx: &Arc<WalkContext>, path: PathBuf, token: TaskToken) {
    let task_ctx = Arc::clone(ctx);
    ctx.exec.pool.spawn(move || {
        hash_one(&task_ctx, path);
        drop(task_ctx);
        drop(token);
    });
}

fn walk_dir(ctx: &Arc<WalkContext>, dir: &Path, token: &TaskToken) {
    if ctx.exec.abort.is_raised() {
        return;
    }
    let _permit = ctx.exec.limiter.acquire();
    if ctx.exec.abort.is_raised() {
        return;
    }
    if let Err(e) = visit_entries(ctx, dir, token) {
        ctx.exec.abort.raise(e);
    }
}

/// Enumerate the direct children of `dir` and spawn a task for each admissible one.
fn visit_entries(ctx: &Arc<WalkContext>, dir: &Path, token: &TaskToken) -> Result<()> {
    // min_depth(1) leaves out `dir` itself; max_depth(1) leaves descent to child tasks.
    let entries = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false);

    for entry in entries {
        if ctx.exec.abort.is_raised() {
            break;
        }
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if walk_error_is_vanished(&err) => {
                trace!("vanished during walk: {}", err);
                continue;
            }
            Err(err) => return Err(walk_error(err, dir, "read directory")),
        };

        let file_type = entry.file_type();
        if file_type.is_dir() {
            ctx.counters.dirs.fetch_add(1, Ordering::Relaxed);
            let path = entry.into_path();
            if ctx.ignore.skips_dir(&path) || ctx.skip_root.as_deref() == Some(path.as_path()) {
                trace!("skipping directory {}", path.display());
                continue;
            }
            spawn_walk(ctx, path, token.add());
        } else if file_type.is_file() {
            let size = match entry.metadata() {
                Ok(meta) => meta.len(),
                Err(err) if walk_error_is_vanished(&err) => {
                    trace!("vanished before stat: {}", err);
                    continue;
                }
                Err(err) => return Err(walk_error(err, entry.path(), "stat")),
            };
            // Empty files all match each other; they say nothing.
            if size == 0 {
                continue;
            }
            ctx.counters.files.fetch_add(1, Ordering::Relaxed);
            let path = entry.into_path();
            if ctx.ignore.skips_file(&path) {
                continue;
            }
            spawn_hash(ctx, path, token.add());
        }
        // Symlinks and special files are neither followed nor hashed.
    }
    Ok(())
}

/// `<op> <path>: <io error>`. walkdir's own display already embeds the path, so only its
/// I/O cause is kept.
fn walk_error(err: walkdir::Error, fallback: &Path, op: &str) -> anyhow::Error {
    let at = err.path().unwrap_or(fallback).to_path_buf();
    match err.into_io_error() {
        Some(io) => anyhow::Error::new(io).context(format!("{} {}", op, at.display())),
        None => anyhow!("{} {}: filesystem loop", op, at.display()),
    }
}

fn hash_one(ctx: &Arc<WalkContext>, path: PathBuf) {
    if ctx.exec.abort.is_raised() {
        return;
    }
    let _permit = ctx.exec.limiter.acquire();
    if ctx.exec.abort.is_raised() {
        return;
    }
    match hash_file(&path) {
        Ok(Some(digest)) => {
            if ctx.results.send(PathRecord { path, digest }).is_err() {
                ctx.exec
                    .abort
                    .raise(anyhow!("collector stopped before the walk finished"));
            }
        }
        Ok(None) => trace!("vanished before hashing: {}", path.display()),
        Err(e) => ctx.exec.abort.raise(e),
    }
}
