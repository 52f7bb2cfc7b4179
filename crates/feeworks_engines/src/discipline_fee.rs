#![forbid(unsafe_code)]

use feeworks_kernel_contracts::structure::Structure;
use feeworks_kernel_contracts::summary::DisciplineFee;
use feeworks_kernel_contracts::{Discipline, Phase};
use tracing::warn;

use crate::construction_cost::total_construction_cost;
use crate::context::{FeeContext, FeeEngineConfig};
use crate::fee_scale::resolve_rate;
use crate::money::finite_or_zero;

pub fn design_percentage(structure: &Structure, config: &FeeEngineConfig) -> f64 {
    match structure.design_percentage {
        Some(p) if p.is_finite() => p,
        Some(p) => {
            warn!(
                structure_id = structure.id.0,
                value = %p,
                "non-finite design percentage; using default"
            );
            config.default_design_percentage
        }
        None => config.default_design_percentage,
    }
}

/// Share of the fee that falls in `phase`, as a fraction of 1.
pub fn phase_percentage(structure: &Structure, phase: Phase, config: &FeeEngineConfig) -> f64 {
    let p = design_percentage(structure, config);
    match phase {
        Phase::Design => p / 100.0,
        Phase::Construction => (100.0 - p) / 100.0,
    }
}

pub fn fee_for_cost(construction_cost: f64, adjusted_rate: f64, percentage: f64) -> f64 {
    construction_cost * (adjusted_rate / 100.0) * percentage
}

/// Pure: reads the structure and context, never writes to either.
pub fn calculate_discipline_fee(
    ctx: &FeeContext<'_>,
    structure: &Structure,
    discipline: &Discipline,
    phase: Phase,
) -> DisciplineFee {
    let resolved = resolve_rate(ctx, structure, discipline);
    if resolved.rate == 0.0 || !resolved.rate.is_finite() {
        return DisciplineFee::default();
    }
    let cost = total_construction_cost(structure, discipline);
    let percentage = phase_percentage(structure, phase, &ctx.config);
    DisciplineFee {
        fee: finite_or_zero(
            fee_for_cost(cost, resolved.rate, percentage),
            "discipline fee",
        ),
        rate: resolved.rate,
    }
}
