#![forbid(unsafe_code)]

use feeworks_kernel_contracts::service::ServiceId;
use feeworks_kernel_contracts::structure::StructureId;
use feeworks_kernel_contracts::ContractViolation;
use thiserror::Error;

/// Failures surfaced to the editing layer. Calculation itself never fails;
/// these come from decoding, validation and edit commands.
#[derive(Debug, Error)]
pub enum ProposalError {
    #[error("malformed proposal snapshot: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("proposal snapshot violates contract: {0}")]
    Contract(#[from] ContractViolation),
    #[error("unknown structure {0:?}")]
    UnknownStructure(StructureId),
    #[error("unknown service {0:?}")]
    UnknownService(ServiceId),
    #[error("structure {0:?} already exists")]
    DuplicateStructureId(StructureId),
}
