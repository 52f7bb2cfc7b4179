#![forbid(unsafe_code)]

use feeworks_engines::FeeEngineConfig;
use feeworks_kernel_contracts::fee_scale::{FeeScaleBracket, FeeScaleTable};
use feeworks_kernel_contracts::service::ServiceId;
use feeworks_kernel_contracts::structure::StructureId;
use feeworks_kernel_contracts::{Discipline, Phase};
use feeworks_os::memo::structure_fingerprint;
use feeworks_os::{ProposalCommand, ProposalContext, SummaryMemo};

const TWO_TOWERS: &str = include_str!("../fixtures/two_towers.json");

// Two structures, five disciplines, two phases.
const ENTRIES_PER_PASS: u64 = 20;

fn two_towers() -> ProposalContext {
    ProposalContext::from_json(FeeEngineConfig::mvp_v1(), TWO_TOWERS).unwrap()
}

#[test]
fn at_os_memo_01_memoized_summary_matches_direct_summary() {
    let ctx = two_towers();
    let mut memo = SummaryMemo::new();

    assert_eq!(ctx.project_summary_memoized(&mut memo), ctx.project_summary());
    assert_eq!(memo.misses(), ENTRIES_PER_PASS);
    assert_eq!(memo.hits(), 0);
    assert_eq!(memo.len(), ENTRIES_PER_PASS as usize);

    assert_eq!(ctx.project_summary_memoized(&mut memo), ctx.project_summary());
    assert_eq!(memo.misses(), ENTRIES_PER_PASS);
    assert_eq!(memo.hits(), ENTRIES_PER_PASS);
}

#[test]
fn at_os_memo_02_service_edit_recomputes_only_its_structure() {
    let ctx = two_towers();
    let mut memo = SummaryMemo::new();
    ctx.project_summary_memoized(&mut memo);

    let edited = ctx
        .apply(&ProposalCommand::SetCustomFee {
            service_id: ServiceId(3),
            custom_fee: 2_000.0,
        })
        .unwrap();
    let summary = edited.project_summary_memoized(&mut memo);
    assert_eq!(summary, edited.project_summary());
    assert_eq!(memo.misses(), ENTRIES_PER_PASS + 10);
    assert_eq!(memo.hits(), 10);
    assert!((summary.project_total - 9_314.0).abs() < 1e-6);
}

#[test]
fn at_os_memo_03_fee_scale_swap_invalidates_everything() {
    let ctx = two_towers();
    let mut memo = SummaryMemo::new();
    ctx.project_summary_memoized(&mut memo);

    let cheaper = ctx
        .with_fee_scale(
            FeeScaleTable::v1(vec![
                FeeScaleBracket::v1(0.0, 5.0, 50.0, 40.0, 45.0, 30.0).unwrap()
            ])
            .unwrap(),
        )
        .unwrap();
    assert_eq!(
        cheaper.project_summary_memoized(&mut memo),
        cheaper.project_summary()
    );
    assert_eq!(memo.misses(), 2 * ENTRIES_PER_PASS);
    assert_eq!(memo.hits(), 0);
}

#[test]
fn at_os_memo_04_deleted_structures_are_pruned() {
    let ctx = two_towers();
    let mut memo = SummaryMemo::new();
    ctx.project_summary_memoized(&mut memo);

    let trimmed = ctx
        .apply(&ProposalCommand::DeleteStructure {
            structure_id: StructureId(1),
        })
        .unwrap();
    assert_eq!(
        trimmed.project_summary_memoized(&mut memo),
        trimmed.project_summary()
    );
    assert_eq!(memo.len(), 10);
}

#[test]
fn at_os_memo_05_fingerprint_tracks_lineage_position() {
    let ctx = two_towers();
    let fee_ctx = ctx.fee_context();
    let tower_b = ctx.structure(StructureId(2)).unwrap();
    let before = structure_fingerprint(&fee_ctx, tower_b).unwrap();
    assert_eq!(structure_fingerprint(&fee_ctx, tower_b), Some(before));

    // Inserting an earlier sibling moves Tower B to the second duplicate slot.
    let mut snapshot = ctx.snapshot().clone();
    let mut sibling = snapshot.structures[1].clone();
    sibling.id = StructureId(7);
    snapshot.structures.insert(1, sibling);
    let shifted = ProposalContext::new(ctx.config(), snapshot).unwrap();
    let tower_b = shifted.structure(StructureId(2)).unwrap();
    assert_ne!(
        structure_fingerprint(&shifted.fee_context(), tower_b),
        Some(before)
    );
}

#[test]
fn at_os_memo_06_single_discipline_lookup_and_clear() {
    let ctx = two_towers();
    let fee_ctx = ctx.fee_context();
    let tower_a = ctx.structure(StructureId(1)).unwrap();
    let mut memo = SummaryMemo::new();

    let first = memo.discipline_total(&fee_ctx, tower_a, &Discipline::Mechanical, Phase::Design);
    let second = memo.discipline_total(&fee_ctx, tower_a, &Discipline::Mechanical, Phase::Design);
    assert_eq!(first, second);
    assert!((first.total - 3_000.0).abs() < 1e-6);
    assert_eq!((memo.hits(), memo.misses()), (1, 1));

    memo.clear();
    assert!(memo.is_empty());
}
