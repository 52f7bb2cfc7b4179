#![forbid(unsafe_code)]

use feeworks_kernel_contracts::structure::{ConstructionCost, Space, Structure};
use feeworks_kernel_contracts::summary::DisciplineAmounts;
use feeworks_kernel_contracts::Discipline;

use crate::money::finite_or_zero;

/// Cost of one space for one discipline. Missing or inactive records
/// contribute nothing.
pub fn space_construction_cost(space: &Space, discipline: &Discipline) -> f64 {
    match space.cost_record(discipline) {
        Some(record) if record.is_active => record_cost(space, record),
        _ => 0.0,
    }
}

pub fn total_construction_cost(structure: &Structure, discipline: &Discipline) -> f64 {
    structure
        .spaces()
        .map(|space| space_construction_cost(space, discipline))
        .sum()
}

/// Active cost across every discipline; this is the figure the fee scale is
/// keyed on.
pub fn structure_construction_cost(structure: &Structure) -> f64 {
    structure
        .spaces()
        .flat_map(|space| {
            space
                .construction_costs
                .iter()
                .filter(|record| record.is_active)
                .map(move |record| record_cost(space, record))
        })
        .sum()
}

pub fn construction_cost_by_discipline(structure: &Structure) -> DisciplineAmounts {
    let mut amounts = DisciplineAmounts::default();
    for discipline in Discipline::KNOWN.iter() {
        amounts.add(discipline, total_construction_cost(structure, discipline));
    }
    amounts
}

fn record_cost(space: &Space, record: &ConstructionCost) -> f64 {
    let area = finite_or_zero(space.floor_area.unwrap_or(0.0), "space.floor_area");
    let per_sqft = finite_or_zero(record.cost_per_sqft, "construction_cost.cost_per_sqft");
    area * per_sqft
}
