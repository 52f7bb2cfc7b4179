#![forbid(unsafe_code)]

use feeworks_engines::FeeEngineConfig;
use feeworks_kernel_contracts::service::{ServiceId, ServiceTemplateId};
use feeworks_kernel_contracts::structure::{Structure, StructureId};
use feeworks_kernel_contracts::{Discipline, Phase};
use feeworks_os::{ProposalCommand, ProposalContext, ProposalError};

const TWO_TOWERS: &str = include_str!("../fixtures/two_towers.json");

fn close(got: f64, want: f64) {
    assert!((got - want).abs() < 1e-6, "expected {want}, got {got}");
}

fn two_towers() -> ProposalContext {
    ProposalContext::from_json(FeeEngineConfig::mvp_v1(), TWO_TOWERS).unwrap()
}

#[test]
fn at_os_cmd_01_add_structure_instantiates_every_template() {
    let ctx = two_towers()
        .apply(&ProposalCommand::AddStructure {
            structure: Structure::new(StructureId(3), "Podium"),
        })
        .unwrap();

    let added: Vec<_> = ctx.snapshot().services_for(StructureId(3)).collect();
    assert_eq!(added.len(), 2);
    assert_eq!(added[0].id, ServiceId(5));
    assert_eq!(added[0].template_id, Some(ServiceTemplateId(1)));
    assert!(added[0].is_included);
    assert_eq!(added[1].id, ServiceId(6));
    assert!(!added[1].is_included);

    // No spaces yet, so only the energy model's minimum fee is carried.
    let podium = ctx
        .discipline_total(StructureId(3), &Discipline::Mechanical, Phase::Design)
        .unwrap();
    close(podium.space_fees, 0.0);
    close(podium.service_fees, 1_000.0);
    close(ctx.project_summary().project_total, 9_514.0);

    let again = ctx.apply(&ProposalCommand::AddStructure {
        structure: Structure::new(StructureId(3), "Podium"),
    });
    assert!(matches!(
        again,
        Err(ProposalError::DuplicateStructureId(StructureId(3)))
    ));
}

#[test]
fn at_os_cmd_02_duplicate_of_a_duplicate_joins_the_root_lineage() {
    let ctx = two_towers()
        .apply(&ProposalCommand::DuplicateStructure {
            source_id: StructureId(2),
            new_id: StructureId(3),
            name: "Tower C".to_string(),
        })
        .unwrap();

    let copy = ctx.structure(StructureId(3)).unwrap();
    assert_eq!(copy.parent_id, Some(StructureId(1)));
    assert_eq!(copy.name, "Tower C");

    let copied: Vec<_> = ctx.snapshot().services_for(StructureId(3)).collect();
    assert_eq!(copied.len(), 2);
    assert_eq!(copied[0].id, ServiceId(5));
    assert_eq!(copied[0].custom_fee, Some(1_200.0));
    assert_eq!(copied[1].discipline, Discipline::Civil);

    // Second duplicate of Tower A prices at duplicate rate id 3 (0.6).
    let fee = ctx
        .discipline_fee(StructureId(3), &Discipline::Mechanical, Phase::Design)
        .unwrap();
    close(fee.rate, 3.0);
    close(fee.fee, 1_200.0);

    let summaries = ctx.structure_summaries();
    close(summaries[2].design_totals.mechanical, 2_400.0);
    close(summaries[2].design_totals.electrical, 648.0);
    close(summaries[2].structure_total, 3_048.0);
}

#[test]
fn at_os_cmd_03_deleting_the_original_promotes_its_duplicates() {
    let ctx = two_towers()
        .apply(&ProposalCommand::DeleteStructure {
            structure_id: StructureId(1),
        })
        .unwrap();

    assert_eq!(ctx.snapshot().structures.len(), 1);
    assert_eq!(ctx.snapshot().services.len(), 2);
    assert!(ctx.snapshot().service(ServiceId(1)).is_none());
    assert!(!ctx.structure(StructureId(2)).unwrap().is_duplicate());

    let fee = ctx
        .discipline_fee(StructureId(2), &Discipline::Mechanical, Phase::Design)
        .unwrap();
    close(fee.rate, 5.0);
    close(ctx.project_summary().project_total, 4_280.0);
}

#[test]
fn at_os_cmd_04_custom_fee_set_and_revert() {
    let ctx = two_towers();

    let reverted = ctx
        .apply(&ProposalCommand::RevertCustomFee {
            service_id: ServiceId(3),
        })
        .unwrap();
    let view = reverted.service_fee(ServiceId(3)).unwrap();
    close(view.fee.display_fee, 1_000.0);
    assert!(!view.can_revert);
    close(reverted.project_summary().project_total, 8_314.0);

    let raised = ctx
        .apply(&ProposalCommand::SetCustomFee {
            service_id: ServiceId(1),
            custom_fee: 1_500.0,
        })
        .unwrap();
    let view = raised.service_fee(ServiceId(1)).unwrap();
    close(view.fee.calculated_fee, 1_000.0);
    close(view.fee.display_fee, 1_500.0);
    close(raised.project_summary().project_total, 9_014.0);

    let negative = ctx.apply(&ProposalCommand::SetCustomFee {
        service_id: ServiceId(1),
        custom_fee: -10.0,
    });
    assert!(matches!(negative, Err(ProposalError::Contract(_))));
}

#[test]
fn at_os_cmd_05_dropping_construction_admin_zeroes_construction_fees() {
    let ctx = two_towers()
        .apply(&ProposalCommand::SetServiceIncluded {
            service_id: ServiceId(2),
            included: false,
        })
        .unwrap();

    let summary = ctx.project_summary();
    close(summary.construction_totals.total(), 0.0);
    close(summary.project_total, 7_744.0);
}

#[test]
fn at_os_cmd_06_moved_service_prices_against_its_new_home() {
    let ctx = two_towers()
        .apply(&ProposalCommand::MoveService {
            service_id: ServiceId(1),
            structure_id: StructureId(2),
            discipline: Discipline::Electrical,
        })
        .unwrap();

    let moved = ctx.snapshot().service(ServiceId(1)).unwrap();
    assert_eq!(moved.structure_id, StructureId(2));
    assert_eq!(moved.discipline, Discipline::Electrical);

    let summaries = ctx.structure_summaries();
    close(summaries[0].design_totals.mechanical, 2_000.0);
    close(summaries[1].design_totals.electrical, 1_864.0);
    close(ctx.project_summary().project_total, 8_514.0);

    let nowhere = ctx.apply(&ProposalCommand::MoveService {
        service_id: ServiceId(1),
        structure_id: StructureId(8),
        discipline: Discipline::Electrical,
    });
    assert!(matches!(
        nowhere,
        Err(ProposalError::UnknownStructure(StructureId(8)))
    ));
}

#[test]
fn at_os_cmd_07_design_percentage_shifts_the_phase_split() {
    let ctx = two_towers();
    let shifted = ctx
        .apply(&ProposalCommand::SetDesignPercentage {
            structure_id: StructureId(1),
            design_percentage: Some(60.0),
        })
        .unwrap();

    let tower_a = &shifted.structure_summaries()[0];
    close(tower_a.design_totals.mechanical, 2_500.0);
    close(tower_a.construction_totals.mechanical, 1_000.0);
    close(tower_a.construction_totals.electrical, 540.0);
    close(tower_a.structure_total, 4_850.0);

    let out_of_range = ctx.apply(&ProposalCommand::SetDesignPercentage {
        structure_id: StructureId(1),
        design_percentage: Some(150.0),
    });
    assert!(matches!(out_of_range, Err(ProposalError::Contract(_))));
}

#[test]
fn at_os_cmd_08_edits_never_touch_the_source_context() {
    let ctx = two_towers();
    let before = ctx.clone();

    let commands = [
        ProposalCommand::DeleteStructure {
            structure_id: StructureId(2),
        },
        ProposalCommand::SetServiceIncluded {
            service_id: ServiceId(1),
            included: false,
        },
        ProposalCommand::DuplicateStructure {
            source_id: StructureId(1),
            new_id: StructureId(5),
            name: "Tower E".to_string(),
        },
    ];
    for command in &commands {
        let edited = ctx.apply(command).unwrap();
        assert_ne!(edited, ctx);
    }
    assert_eq!(ctx, before);
    close(ctx.project_summary().project_total, 8_514.0);
}
