pub mod config;
pub mod error;
pub mod fetch;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod stats;

/// Exit status for any fatal failure; the legacy tool exited with -1.
pub const SENTINEL_EXIT_CODE: u8 = 255;
