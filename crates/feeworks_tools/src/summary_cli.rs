#![forbid(unsafe_code)]

use feeworks_engines::FeeEngineConfig;
use feeworks_kernel_contracts::service::ServiceId;
use feeworks_kernel_contracts::summary::{ProjectSummary, StructureSummary};
use feeworks_os::{ProposalCommand, ProposalContext};
use serde::Serialize;
use tracing::debug;

pub const USAGE: &str =
    "usage: feeworks <summary|service|apply> <snapshot.json> [service_id|command.json]";

#[derive(Debug, Serialize)]
struct SummaryReport {
    project: ProjectSummary,
    structures: Vec<StructureSummary>,
}

/// Runs one subcommand against a raw snapshot document. `arg` is the service
/// id for `service` and the command document for `apply`.
pub fn execute_summary_command(
    config: FeeEngineConfig,
    subcommand: &str,
    snapshot_json: &str,
    arg: Option<&str>,
) -> Result<String, String> {
    let ctx = ProposalContext::from_json(config, snapshot_json).map_err(|e| e.to_string())?;
    debug!(
        subcommand,
        structures = ctx.snapshot().structures.len(),
        services = ctx.snapshot().services.len(),
        "snapshot loaded"
    );
    match subcommand {
        "summary" => {
            let report = SummaryReport {
                project: ctx.project_summary(),
                structures: ctx.structure_summaries(),
            };
            to_pretty_json(&report)
        }
        "service" => {
            let service_id = parse_service_id(arg)?;
            let view = ctx.service_fee(service_id).map_err(|e| e.to_string())?;
            to_pretty_json(&view)
        }
        "apply" => {
            let raw = arg
                .ok_or_else(|| "usage: feeworks apply <snapshot.json> <command.json>".to_string())?;
            let command: ProposalCommand =
                serde_json::from_str(raw).map_err(|e| format!("malformed command: {e}"))?;
            let next = ctx.apply(&command).map_err(|e| e.to_string())?;
            next.to_json().map_err(|e| e.to_string())
        }
        _ => Err(format!(
            "unknown subcommand: {subcommand}. expected one of: summary, service, apply"
        )),
    }
}

pub fn parse_service_id(raw: Option<&str>) -> Result<ServiceId, String> {
    let raw =
        raw.ok_or_else(|| "usage: feeworks service <snapshot.json> <service_id>".to_string())?;
    raw.trim()
        .parse::<u64>()
        .map(ServiceId)
        .map_err(|_| format!("invalid service id '{raw}'"))
}

fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("failed to encode output: {e}"))
}
