#![forbid(unsafe_code)]

pub mod construction_cost;
pub mod context;
pub mod discipline_fee;
pub mod fee_scale;
pub mod money;
pub mod service_fee;
pub mod totals;

#[cfg(test)]
mod fixtures;

pub use context::{FeeContext, FeeEngineConfig};
