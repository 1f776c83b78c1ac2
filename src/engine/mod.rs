//! Engine module: CLI surface, hashing and the small utilities the pipeline is built from

pub mod arg_parser;
pub mod handlers;
pub mod hashing;
pub mod limiter;
pub mod progress;
pub mod tools;

// Re-export commonly used functions
pub use arg_parser::Cli;
pub use handlers::{RunMode, handle_run, select_mode};
pub use hashing::{hash_bytes, hash_file, hash_reader};
pub use limiter::{Limiter, Permit};
pub use tools::{display_path, fold_cmp, quote_path, remove_with_prefix, sort_fold};
