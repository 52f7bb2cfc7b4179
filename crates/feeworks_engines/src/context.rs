#![forbid(unsafe_code)]

use feeworks_kernel_contracts::fee_scale::{
    DuplicateRateTable, FeeScaleTable, DUPLICATE_RATE_ID_CAP,
};
use feeworks_kernel_contracts::service::TrackedService;
use feeworks_kernel_contracts::snapshot::ProposalSnapshot;
use feeworks_kernel_contracts::structure::{Structure, StructureId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeeEngineConfig {
    /// Rate handed back when no bracket applies, in the same units as an
    /// adjusted rate.
    pub fallback_rate: f64,
    pub default_design_percentage: f64,
    pub duplicate_rate_id_cap: u8,
}

impl FeeEngineConfig {
    pub fn mvp_v1() -> Self {
        Self {
            fallback_rate: 0.05,
            default_design_percentage: 80.0,
            duplicate_rate_id_cap: DUPLICATE_RATE_ID_CAP,
        }
    }
}

impl Default for FeeEngineConfig {
    fn default() -> Self {
        Self::mvp_v1()
    }
}

/// Read-only view of one calculation pass. Every entry point takes this
/// explicitly; there is no process-wide proposal state.
#[derive(Debug, Clone, Copy)]
pub struct FeeContext<'a> {
    pub config: FeeEngineConfig,
    pub fee_scale: &'a FeeScaleTable,
    pub duplicate_rates: &'a DuplicateRateTable,
    pub structures: &'a [Structure],
    pub services: &'a [TrackedService],
}

impl<'a> FeeContext<'a> {
    pub fn new(
        config: FeeEngineConfig,
        fee_scale: &'a FeeScaleTable,
        duplicate_rates: &'a DuplicateRateTable,
        structures: &'a [Structure],
        services: &'a [TrackedService],
    ) -> Self {
        Self {
            config,
            fee_scale,
            duplicate_rates,
            structures,
            services,
        }
    }

    pub fn from_snapshot(config: FeeEngineConfig, snapshot: &'a ProposalSnapshot) -> Self {
        Self::new(
            config,
            &snapshot.fee_scale,
            &snapshot.duplicate_rates,
            &snapshot.structures,
            &snapshot.services,
        )
    }

    pub fn services_for(
        &self,
        structure_id: StructureId,
    ) -> impl Iterator<Item = &'a TrackedService> + 'a {
        let services = self.services;
        services
            .iter()
            .filter(move |s| s.structure_id == structure_id)
    }
}
