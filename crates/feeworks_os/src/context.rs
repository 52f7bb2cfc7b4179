#![forbid(unsafe_code)]

use feeworks_engines::discipline_fee::calculate_discipline_fee;
use feeworks_engines::service_fee::service_fee_view;
use feeworks_engines::totals;
use feeworks_engines::{FeeContext, FeeEngineConfig};
use feeworks_kernel_contracts::fee_scale::{DuplicateRateTable, FeeScaleTable};
use feeworks_kernel_contracts::service::ServiceId;
use feeworks_kernel_contracts::snapshot::ProposalSnapshot;
use feeworks_kernel_contracts::structure::{Structure, StructureId};
use feeworks_kernel_contracts::summary::{
    DisciplineFee, DisciplineTotal, ProjectSummary, ServiceFeeView, StructureSummary,
};
use feeworks_kernel_contracts::{Discipline, Phase, Validate};

use crate::commands::ProposalCommand;
use crate::error::ProposalError;
use crate::memo::SummaryMemo;

/// A validated snapshot plus the engine configuration. This is the only
/// entry point the editing layer needs; it owns no shared state and every
/// edit returns a new context.
#[derive(Debug, Clone, PartialEq)]
pub struct ProposalContext {
    config: FeeEngineConfig,
    snapshot: ProposalSnapshot,
}

impl ProposalContext {
    pub fn new(config: FeeEngineConfig, snapshot: ProposalSnapshot) -> Result<Self, ProposalError> {
        snapshot.validate()?;
        Ok(Self { config, snapshot })
    }

    pub fn from_json(config: FeeEngineConfig, raw: &str) -> Result<Self, ProposalError> {
        let snapshot: ProposalSnapshot = serde_json::from_str(raw)?;
        Self::new(config, snapshot)
    }

    pub fn to_json(&self) -> Result<String, ProposalError> {
        Ok(serde_json::to_string_pretty(&self.snapshot)?)
    }

    pub fn config(&self) -> FeeEngineConfig {
        self.config
    }

    pub fn snapshot(&self) -> &ProposalSnapshot {
        &self.snapshot
    }

    pub fn fee_context(&self) -> FeeContext<'_> {
        FeeContext::from_snapshot(self.config, &self.snapshot)
    }

    /// Swaps in a freshly fetched fee scale.
    pub fn with_fee_scale(&self, fee_scale: FeeScaleTable) -> Result<Self, ProposalError> {
        let mut snapshot = self.snapshot.clone();
        snapshot.fee_scale = fee_scale;
        Self::new(self.config, snapshot)
    }

    pub fn with_duplicate_rates(
        &self,
        duplicate_rates: DuplicateRateTable,
    ) -> Result<Self, ProposalError> {
        let mut snapshot = self.snapshot.clone();
        snapshot.duplicate_rates = duplicate_rates;
        Self::new(self.config, snapshot)
    }

    pub fn apply(&self, command: &ProposalCommand) -> Result<Self, ProposalError> {
        let snapshot = command.apply(&self.snapshot)?;
        Self::new(self.config, snapshot)
    }

    pub fn structure(&self, structure_id: StructureId) -> Result<&Structure, ProposalError> {
        self.snapshot
            .structure(structure_id)
            .ok_or(ProposalError::UnknownStructure(structure_id))
    }

    pub fn discipline_fee(
        &self,
        structure_id: StructureId,
        discipline: &Discipline,
        phase: Phase,
    ) -> Result<DisciplineFee, ProposalError> {
        let structure = self.structure(structure_id)?;
        Ok(calculate_discipline_fee(
            &self.fee_context(),
            structure,
            discipline,
            phase,
        ))
    }

    pub fn discipline_total(
        &self,
        structure_id: StructureId,
        discipline: &Discipline,
        phase: Phase,
    ) -> Result<DisciplineTotal, ProposalError> {
        let structure = self.structure(structure_id)?;
        Ok(totals::discipline_total(
            &self.fee_context(),
            structure,
            discipline,
            phase,
        ))
    }

    pub fn service_fee(&self, service_id: ServiceId) -> Result<ServiceFeeView, ProposalError> {
        let service = self
            .snapshot
            .service(service_id)
            .ok_or(ProposalError::UnknownService(service_id))?;
        let structure = self.structure(service.structure_id)?;
        Ok(service_fee_view(&self.fee_context(), service, structure))
    }

    pub fn service_fee_views(&self) -> Vec<ServiceFeeView> {
        let ctx = self.fee_context();
        self.snapshot
            .services
            .iter()
            .filter_map(|service| {
                self.snapshot
                    .structure(service.structure_id)
                    .map(|structure| service_fee_view(&ctx, service, structure))
            })
            .collect()
    }

    pub fn structure_summaries(&self) -> Vec<StructureSummary> {
        let ctx = self.fee_context();
        self.snapshot
            .structures
            .iter()
            .map(|s| totals::structure_summary(&ctx, s))
            .collect()
    }

    pub fn project_summary(&self) -> ProjectSummary {
        totals::project_summary(&self.fee_context())
    }

    pub fn project_summary_memoized(&self, memo: &mut SummaryMemo) -> ProjectSummary {
        memo.project_summary(&self.fee_context())
    }
}
