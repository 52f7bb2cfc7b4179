#![forbid(unsafe_code)]

use feeworks_kernel_contracts::fee_scale::{FeeScaleBracket, FeeScaleTable};
use feeworks_kernel_contracts::structure::Structure;
use feeworks_kernel_contracts::summary::{RateSource, ResolvedRate};
use feeworks_kernel_contracts::{Discipline, ReasonCodeId};
use tracing::{debug, warn};

use crate::construction_cost::structure_construction_cost;
use crate::context::FeeContext;
use crate::money::finite_or_zero;

pub mod reason_codes {
    use feeworks_kernel_contracts::ReasonCodeId;

    pub const FEE_SCALE_OK_BRACKET: ReasonCodeId = ReasonCodeId(0x4653_0001);

    pub const FEE_SCALE_EMPTY_TABLE_FALLBACK: ReasonCodeId = ReasonCodeId(0x4653_00F1);
    pub const FEE_SCALE_BELOW_LOWEST_FALLBACK: ReasonCodeId = ReasonCodeId(0x4653_00F2);
}

/// Share of the prime rate applied to disciplines the scale has no column for.
pub const UNMAPPED_DISCIPLINE_FRACTION: f64 = 100.0;

pub fn reason_code(source: RateSource) -> ReasonCodeId {
    match source {
        RateSource::Bracket { .. } => reason_codes::FEE_SCALE_OK_BRACKET,
        RateSource::EmptyTableFallback => reason_codes::FEE_SCALE_EMPTY_TABLE_FALLBACK,
        RateSource::BelowLowestThresholdFallback => reason_codes::FEE_SCALE_BELOW_LOWEST_FALLBACK,
    }
}

/// Half-open lookup: the bracket `b` with `b.construction_cost <= total <
/// next.construction_cost`, the last bracket above every threshold, and the
/// first bracket for a zero total. `None` when the table is empty or a
/// positive total sits below the lowest threshold.
pub fn select_bracket(table: &FeeScaleTable, total: f64) -> Option<usize> {
    let brackets = table.brackets();
    if brackets.is_empty() {
        return None;
    }
    if total == 0.0 {
        return Some(0);
    }
    match brackets.partition_point(|b| b.construction_cost <= total) {
        0 => None,
        n => Some(n - 1),
    }
}

pub fn discipline_fraction(bracket: &FeeScaleBracket, discipline: &Discipline) -> f64 {
    match bracket.fraction_for(discipline) {
        Some(fraction) => finite_or_zero(fraction, "fee_scale_bracket.fraction"),
        None => UNMAPPED_DISCIPLINE_FRACTION,
    }
}

/// 0 for originals. Duplicates use their recorded `duplicate_number`, or
/// otherwise their 1-based position among the structures sharing the same
/// parent.
pub fn duplicate_ordinal(structure: &Structure, structures: &[Structure]) -> u32 {
    let Some(parent) = structure.parent_id else {
        return 0;
    };
    if let Some(n) = structure.duplicate_number {
        return n;
    }
    structures
        .iter()
        .filter(|s| s.parent_id == Some(parent))
        .position(|s| s.id == structure.id)
        .map(|p| p as u32 + 1)
        .unwrap_or(1)
}

pub fn duplicate_rate(ctx: &FeeContext<'_>, structure: &Structure) -> f64 {
    if structure.parent_id.is_none() {
        return 1.0;
    }
    let ordinal = duplicate_ordinal(structure, ctx.structures);
    let cap = u32::from(ctx.config.duplicate_rate_id_cap);
    let id = ordinal.saturating_add(1).min(cap) as u8;
    match ctx.duplicate_rates.rate_for_id(id) {
        Some(rate) => finite_or_zero(rate, "duplicate_rate.rate"),
        None => 1.0,
    }
}

pub fn resolve_rate(
    ctx: &FeeContext<'_>,
    structure: &Structure,
    discipline: &Discipline,
) -> ResolvedRate {
    if ctx.fee_scale.is_empty() {
        warn!(
            structure_id = structure.id.0,
            reason_code = reason_codes::FEE_SCALE_EMPTY_TABLE_FALLBACK.0,
            fallback_rate = ctx.config.fallback_rate,
            "fee scale table is empty; using fallback rate"
        );
        return ResolvedRate {
            rate: ctx.config.fallback_rate,
            source: RateSource::EmptyTableFallback,
        };
    }

    let total = structure_construction_cost(structure);
    let Some(index) = select_bracket(ctx.fee_scale, total) else {
        warn!(
            structure_id = structure.id.0,
            total_construction_cost = total,
            reason_code = reason_codes::FEE_SCALE_BELOW_LOWEST_FALLBACK.0,
            fallback_rate = ctx.config.fallback_rate,
            "construction cost below lowest fee scale threshold; using fallback rate"
        );
        return ResolvedRate {
            rate: ctx.config.fallback_rate,
            source: RateSource::BelowLowestThresholdFallback,
        };
    };

    let bracket = &ctx.fee_scale.brackets()[index];
    let prime = finite_or_zero(bracket.prime_consultant_rate, "fee_scale_bracket.prime_rate");
    let discipline_rate = prime * (discipline_fraction(bracket, discipline) / 100.0);
    let multiplier = duplicate_rate(ctx, structure);
    debug!(
        structure_id = structure.id.0,
        discipline = discipline.as_str(),
        bracket_index = index,
        discipline_rate,
        duplicate_rate = multiplier,
        "fee scale bracket resolved"
    );
    ResolvedRate {
        rate: finite_or_zero(discipline_rate * multiplier, "adjusted rate"),
        source: RateSource::Bracket { index },
    }
}
