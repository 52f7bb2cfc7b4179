#![forbid(unsafe_code)]

use feeworks_kernel_contracts::fee_scale::{
    DuplicateRate, DuplicateRateTable, FeeScaleBracket, FeeScaleTable,
};
use feeworks_kernel_contracts::service::{ServiceId, TrackedService};
use feeworks_kernel_contracts::structure::{
    ConstructionCost, Level, LevelId, Space, SpaceId, Structure, StructureId,
};
use feeworks_kernel_contracts::{Discipline, Phase};

pub(crate) fn bracket(
    threshold: f64,
    prime: f64,
    mechanical: f64,
    plumbing: f64,
    electrical: f64,
    structural: f64,
) -> FeeScaleBracket {
    FeeScaleBracket::v1(threshold, prime, mechanical, plumbing, electrical, structural).unwrap()
}

pub(crate) fn scale(brackets: Vec<FeeScaleBracket>) -> FeeScaleTable {
    FeeScaleTable::v1(brackets).unwrap()
}

pub(crate) fn duplicate_rates(entries: &[(u8, f64)]) -> DuplicateRateTable {
    DuplicateRateTable::v1(
        entries
            .iter()
            .map(|(id, rate)| DuplicateRate::v1(*id, *rate).unwrap())
            .collect(),
    )
    .unwrap()
}

// Builds records directly so NaN inputs can reach the engine.
pub(crate) fn space(id: u64, floor_area: Option<f64>, costs: &[(Discipline, f64, bool)]) -> Space {
    Space {
        id: SpaceId(id),
        name: format!("Space {id}"),
        floor_area,
        construction_costs: costs
            .iter()
            .map(|(discipline, cost_per_sqft, is_active)| ConstructionCost {
                discipline: discipline.clone(),
                cost_per_sqft: *cost_per_sqft,
                is_active: *is_active,
            })
            .collect(),
    }
}

pub(crate) fn structure(id: u64, spaces: Vec<Space>) -> Structure {
    structure_with_levels(id, vec![spaces])
}

pub(crate) fn structure_with_levels(id: u64, levels: Vec<Vec<Space>>) -> Structure {
    let mut s = Structure::new(StructureId(id), format!("Structure {id}"));
    s.levels = levels
        .into_iter()
        .enumerate()
        .map(|(i, spaces)| Level {
            id: LevelId(i as u64 + 1),
            name: format!("Level {}", i + 1),
            spaces,
        })
        .collect();
    s
}

pub(crate) fn service(id: u64, structure: u64, discipline: Discipline, phase: Phase) -> TrackedService {
    TrackedService {
        id: ServiceId(id),
        template_id: None,
        name: format!("Service {id}"),
        structure_id: StructureId(structure),
        discipline,
        phase,
        min_fee: None,
        rate: None,
        fee_increment: None,
        is_included: true,
        is_construction_admin: false,
        custom_fee: None,
    }
}

pub(crate) fn assert_close(got: f64, want: f64) {
    assert!(
        (got - want).abs() < 1e-6,
        "expected {want}, got {got}"
    );
}
