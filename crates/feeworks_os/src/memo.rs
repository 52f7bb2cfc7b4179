#![forbid(unsafe_code)]

use std::collections::{BTreeMap, BTreeSet};

use feeworks_engines::fee_scale::duplicate_ordinal;
use feeworks_engines::totals;
use feeworks_engines::{FeeContext, FeeEngineConfig};
use feeworks_kernel_contracts::fee_scale::{DuplicateRateTable, FeeScaleTable};
use feeworks_kernel_contracts::service::TrackedService;
use feeworks_kernel_contracts::structure::{Structure, StructureId};
use feeworks_kernel_contracts::summary::{
    DisciplineAmounts, DisciplineTotal, ProjectSummary, StructureSummary,
};
use feeworks_kernel_contracts::{Discipline, Phase};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::warn;

pub type Fingerprint = [u8; 32];

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct MemoKey {
    structure_id: StructureId,
    discipline: Discipline,
    phase: Phase,
}

#[derive(Debug, Clone, Copy)]
struct MemoEntry {
    fingerprint: Fingerprint,
    total: DisciplineTotal,
}

#[derive(Serialize)]
struct FingerprintInput<'a> {
    config: &'a FeeEngineConfig,
    fee_scale: &'a FeeScaleTable,
    duplicate_rates: &'a DuplicateRateTable,
    structure: &'a Structure,
    duplicate_ordinal: u32,
    services: Vec<&'a TrackedService>,
}

/// Content hash of everything a structure's totals depend on. Values are
/// compared by content, so an edited copy of a structure never matches a
/// stale entry.
pub fn structure_fingerprint(ctx: &FeeContext<'_>, structure: &Structure) -> Option<Fingerprint> {
    let input = FingerprintInput {
        config: &ctx.config,
        fee_scale: ctx.fee_scale,
        duplicate_rates: ctx.duplicate_rates,
        structure,
        duplicate_ordinal: duplicate_ordinal(structure, ctx.structures),
        services: ctx.services_for(structure.id).collect(),
    };
    match serde_json::to_vec(&input) {
        Ok(bytes) => Some(Sha256::digest(&bytes).into()),
        Err(err) => {
            warn!(
                structure_id = structure.id.0,
                error = %err,
                "fingerprint encoding failed; bypassing memo"
            );
            None
        }
    }
}

/// Per (structure, discipline, phase) cache of discipline totals.
#[derive(Debug, Default)]
pub struct SummaryMemo {
    entries: BTreeMap<MemoKey, MemoEntry>,
    hits: u64,
    misses: u64,
}

impl SummaryMemo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn discipline_total(
        &mut self,
        ctx: &FeeContext<'_>,
        structure: &Structure,
        discipline: &Discipline,
        phase: Phase,
    ) -> DisciplineTotal {
        match structure_fingerprint(ctx, structure) {
            Some(fingerprint) => self.lookup(ctx, structure, discipline, phase, fingerprint),
            None => totals::discipline_total(ctx, structure, discipline, phase),
        }
    }

    pub fn structure_summary(
        &mut self,
        ctx: &FeeContext<'_>,
        structure: &Structure,
    ) -> StructureSummary {
        let fingerprint = structure_fingerprint(ctx, structure);
        let mut phase_amounts = |phase: Phase| {
            let mut amounts = DisciplineAmounts::default();
            for discipline in Discipline::KNOWN.iter() {
                let total = match fingerprint {
                    Some(fp) => self.lookup(ctx, structure, discipline, phase, fp),
                    None => totals::discipline_total(ctx, structure, discipline, phase),
                };
                amounts.add(discipline, total.total);
            }
            amounts
        };
        let design_totals = phase_amounts(Phase::Design);
        let construction_totals = phase_amounts(Phase::Construction);
        let grand_totals = design_totals.plus(&construction_totals);
        StructureSummary {
            structure_id: structure.id,
            name: structure.name.clone(),
            design_totals,
            construction_totals,
            grand_totals,
            structure_total: grand_totals.total(),
        }
    }

    /// Drops entries for structures no longer in the context, then sums the
    /// per-structure summaries.
    pub fn project_summary(&mut self, ctx: &FeeContext<'_>) -> ProjectSummary {
        let live: BTreeSet<StructureId> = ctx.structures.iter().map(|s| s.id).collect();
        self.entries.retain(|key, _| live.contains(&key.structure_id));
        let summaries: Vec<StructureSummary> = ctx
            .structures
            .iter()
            .map(|s| self.structure_summary(ctx, s))
            .collect();
        totals::summarize(&summaries)
    }

    fn lookup(
        &mut self,
        ctx: &FeeContext<'_>,
        structure: &Structure,
        discipline: &Discipline,
        phase: Phase,
        fingerprint: Fingerprint,
    ) -> DisciplineTotal {
        let key = MemoKey {
            structure_id: structure.id,
            discipline: discipline.clone(),
            phase,
        };
        if let Some(entry) = self.entries.get(&key) {
            if entry.fingerprint == fingerprint {
                self.hits += 1;
                return entry.total;
            }
        }
        self.misses += 1;
        let total = totals::discipline_total(ctx, structure, discipline, phase);
        self.entries.insert(key, MemoEntry { fingerprint, total });
        total
    }
}
