pub mod bin_common;
pub mod dedupe;
pub mod imghash;

/// Stand-alone helpers that fit comfortably within one file.
pub mod utils;
