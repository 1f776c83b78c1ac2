pub mod config;
pub mod dupwalk_toml;
pub mod fd_limit;
pub mod logger;

pub use config::*;
pub use fd_limit::{FDS_PER_TASK, cap_by_fd_limit, max_open_fds, max_tasks_by_fd_limit};
pub use logger::setup_logging;
