//! File hashing utilities

use anyhow::{Context, Result};
use blake3::Hasher;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::Digest;
use crate::pipeline::error_handler::is_vanished;
use crate::utils::config::HashingConsts;

/// Hash a file's contents with blake3, reading in fixed-size chunks so memory use does not
/// depend on file size.
///
/// Returns `Ok(None)` when the file vanished before or while it was opened (benign race with
/// the filesystem); every other I/O failure is an error.
pub fn hash_file(path: &Path) -> Result<Option<Digest>> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if is_vanished(&e) => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("open {}", path.display())),
    };
    let digest = hash_reader(file).with_context(|| format!("read {}", path.display()))?;
    Ok(Some(digest))
}

/// Stream any reader through the hasher.
pub fn hash_reader<R: Read>(mut reader: R) -> io::Result<Digest> {
    let mut hasher = Hasher::new();
    let mut buffer = vec![0u8; HashingConsts::HASH_READ_CHUNK_SIZE];
    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..n]);
    }
    Ok(hasher.finalize().into())
}

/// Digest of an in-memory buffer (same function as [`hash_file`]).
pub fn hash_bytes(data: &[u8]) -> Digest {
    blake3::hash(data).into()
}
