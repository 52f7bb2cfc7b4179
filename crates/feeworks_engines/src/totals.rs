#![forbid(unsafe_code)]

use feeworks_kernel_contracts::service::TrackedService;
use feeworks_kernel_contracts::structure::{Structure, StructureId};
use feeworks_kernel_contracts::summary::{
    DisciplineAmounts, DisciplineTotal, ProjectSummary, StructureSummary,
};
use feeworks_kernel_contracts::{Discipline, Phase};

use crate::context::FeeContext;
use crate::discipline_fee::calculate_discipline_fee;
use crate::money::sum_finite;
use crate::service_fee::calculate_service_fee;

/// Construction-phase space fees only apply once construction
/// administration has been selected somewhere on the structure.
pub fn has_construction_admin_services(ctx: &FeeContext<'_>, structure_id: StructureId) -> bool {
    ctx.services_for(structure_id)
        .any(|s| s.is_included && s.is_construction_admin)
}

fn counts_toward_service_fees(
    service: &TrackedService,
    structure_id: StructureId,
    discipline: &Discipline,
    phase: Phase,
) -> bool {
    service.structure_id == structure_id
        && &service.discipline == discipline
        && service.phase == phase
        && service.is_included
        && service.min_fee.is_some()
        && !service.is_construction_admin
}

pub fn discipline_total(
    ctx: &FeeContext<'_>,
    structure: &Structure,
    discipline: &Discipline,
    phase: Phase,
) -> DisciplineTotal {
    let space_fees = match phase {
        Phase::Design => calculate_discipline_fee(ctx, structure, discipline, phase).fee,
        Phase::Construction if has_construction_admin_services(ctx, structure.id) => {
            calculate_discipline_fee(ctx, structure, discipline, phase).fee
        }
        Phase::Construction => 0.0,
    };
    let service_fees = sum_finite(
        ctx.services
            .iter()
            .filter(|s| counts_toward_service_fees(s, structure.id, discipline, phase))
            .map(|s| calculate_service_fee(ctx, s, discipline, structure).display_fee),
        "service display fee",
    );
    DisciplineTotal {
        space_fees,
        service_fees,
        total: space_fees + service_fees,
    }
}

pub fn phase_totals(ctx: &FeeContext<'_>, structure: &Structure, phase: Phase) -> DisciplineAmounts {
    let mut amounts = DisciplineAmounts::default();
    for discipline in Discipline::KNOWN.iter() {
        amounts.add(
            discipline,
            discipline_total(ctx, structure, discipline, phase).total,
        );
    }
    amounts
}

pub fn structure_summary(ctx: &FeeContext<'_>, structure: &Structure) -> StructureSummary {
    let design_totals = phase_totals(ctx, structure, Phase::Design);
    let construction_totals = phase_totals(ctx, structure, Phase::Construction);
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

pub fn summarize(summaries: &[StructureSummary]) -> ProjectSummary {
    let mut design_totals = DisciplineAmounts::default();
    let mut construction_totals = DisciplineAmounts::default();
    for s in summaries {
        design_totals = design_totals.plus(&s.design_totals);
        construction_totals = construction_totals.plus(&s.construction_totals);
    }
    let grand_totals = design_totals.plus(&construction_totals);
    ProjectSummary {
        design_totals,
        construction_totals,
        grand_totals,
        project_total: grand_totals.total(),
    }
}

pub fn project_summary(ctx: &FeeContext<'_>) -> ProjectSummary {
    let summaries: Vec<StructureSummary> = ctx
        .structures
        .iter()
        .map(|s| structure_summary(ctx, s))
        .collect();
    summarize(&summaries)
}
