#![forbid(unsafe_code)]

pub mod common;
pub mod discipline;
pub mod fee_scale;
pub mod service;
pub mod snapshot;
pub mod structure;
pub mod summary;

pub use common::{ContractViolation, ReasonCodeId, SchemaVersion, Validate};
pub use discipline::{Discipline, Phase};
