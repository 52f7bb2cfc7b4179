#![forbid(unsafe_code)]

pub mod logging;
pub mod summary_cli;
