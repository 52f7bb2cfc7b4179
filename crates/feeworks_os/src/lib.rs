#![forbid(unsafe_code)]

pub mod commands;
pub mod context;
pub mod error;
pub mod memo;

pub use commands::ProposalCommand;
pub use context::ProposalContext;
pub use error::ProposalError;
pub use memo::SummaryMemo;
