#![forbid(unsafe_code)]

use feeworks_kernel_contracts::service::TrackedService;
use feeworks_kernel_contracts::structure::Structure;
use feeworks_kernel_contracts::summary::{ServiceFee, ServiceFeeView};
use feeworks_kernel_contracts::{Discipline, Phase};
use tracing::warn;

use crate::construction_cost::space_construction_cost;
use crate::context::FeeContext;
use crate::discipline_fee::{fee_for_cost, phase_percentage};
use crate::fee_scale::resolve_rate;
use crate::money::{finite_or_zero, sum_finite};

/// Included services are shown only when they carry some fee term or are
/// construction administration.
pub fn is_service_eligible(service: &TrackedService) -> bool {
    service.is_included
        && (service.is_construction_admin
            || service.min_fee.is_some()
            || service.rate.is_some()
            || service.fee_increment.is_some())
}

/// Rounds up to the next multiple of `increment`. Aligned fees and
/// missing/zero increments pass through unchanged.
pub fn round_up_to_increment(fee: f64, increment: Option<f64>) -> f64 {
    match increment {
        Some(inc) if inc.is_finite() && inc > 0.0 => {
            let remainder = fee % inc;
            if remainder > 0.0 {
                fee + (inc - remainder)
            } else {
                fee
            }
        }
        _ => fee,
    }
}

/// Design-phase fee for `discipline`, summed space by space over spaces with
/// an active cost record.
pub fn design_fee_across_spaces(
    ctx: &FeeContext<'_>,
    structure: &Structure,
    discipline: &Discipline,
) -> f64 {
    let resolved = resolve_rate(ctx, structure, discipline);
    if resolved.rate == 0.0 || !resolved.rate.is_finite() {
        return 0.0;
    }
    let percentage = phase_percentage(structure, Phase::Design, &ctx.config);
    sum_finite(
        structure
            .spaces()
            .filter(|space| {
                space
                    .cost_record(discipline)
                    .is_some_and(|record| record.is_active)
            })
            .map(|space| {
                fee_for_cost(
                    space_construction_cost(space, discipline),
                    resolved.rate,
                    percentage,
                )
            }),
        "space design fee",
    )
}

pub fn calculate_service_fee(
    ctx: &FeeContext<'_>,
    service: &TrackedService,
    discipline: &Discipline,
    structure: &Structure,
) -> ServiceFee {
    let min_fee = service
        .min_fee
        .map(|fee| finite_or_zero(fee, "tracked_service.min_fee"));
    let mut calculated_fee = min_fee.unwrap_or(0.0);

    if let Some(rate) = service.rate {
        let rate = finite_or_zero(rate, "tracked_service.rate");
        calculated_fee = design_fee_across_spaces(ctx, structure, discipline) * (rate / 100.0);
    }

    calculated_fee = round_up_to_increment(calculated_fee, service.fee_increment);

    if let Some(min) = min_fee {
        if calculated_fee < min {
            calculated_fee = min;
        }
    }
    let calculated_fee = finite_or_zero(calculated_fee, "service fee");

    match service.custom_fee {
        Some(custom) if custom.is_finite() => ServiceFee {
            calculated_fee,
            display_fee: custom,
            is_custom: true,
        },
        Some(custom) => {
            warn!(
                service_id = service.id.0,
                value = %custom,
                "non-finite custom fee ignored"
            );
            natural(calculated_fee)
        }
        None => natural(calculated_fee),
    }
}

pub fn service_fee_view(
    ctx: &FeeContext<'_>,
    service: &TrackedService,
    structure: &Structure,
) -> ServiceFeeView {
    let fee = calculate_service_fee(ctx, service, &service.discipline, structure);
    ServiceFeeView {
        service_id: service.id,
        eligible: is_service_eligible(service),
        fee,
        can_revert: fee.is_custom && fee.display_fee != fee.calculated_fee,
    }
}

fn natural(calculated_fee: f64) -> ServiceFee {
    ServiceFee {
        calculated_fee,
        display_fee: calculated_fee,
        is_custom: false,
    }
}
