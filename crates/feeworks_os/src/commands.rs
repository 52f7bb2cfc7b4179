#![forbid(unsafe_code)]

use feeworks_kernel_contracts::service::{ServiceId, TrackedService};
use feeworks_kernel_contracts::snapshot::ProposalSnapshot;
use feeworks_kernel_contracts::structure::{Structure, StructureId};
use feeworks_kernel_contracts::Discipline;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ProposalError;

/// Edits the editing layer can request. Each one produces a new snapshot;
/// the input snapshot is never touched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ProposalCommand {
    AddStructure {
        structure: Structure,
    },
    DuplicateStructure {
        source_id: StructureId,
        new_id: StructureId,
        name: String,
    },
    DeleteStructure {
        structure_id: StructureId,
    },
    SetServiceIncluded {
        service_id: ServiceId,
        included: bool,
    },
    SetCustomFee {
        service_id: ServiceId,
        custom_fee: f64,
    },
    RevertCustomFee {
        service_id: ServiceId,
    },
    MoveService {
        service_id: ServiceId,
        structure_id: StructureId,
        discipline: Discipline,
    },
    SetDesignPercentage {
        structure_id: StructureId,
        design_percentage: Option<f64>,
    },
}

impl ProposalCommand {
    pub fn apply(&self, snapshot: &ProposalSnapshot) -> Result<ProposalSnapshot, ProposalError> {
        match self {
            ProposalCommand::AddStructure { structure } => add_structure(snapshot, structure.clone()),
            ProposalCommand::DuplicateStructure {
                source_id,
                new_id,
                name,
            } => duplicate_structure(snapshot, *source_id, *new_id, name),
            ProposalCommand::DeleteStructure { structure_id } => {
                delete_structure(snapshot, *structure_id)
            }
            ProposalCommand::SetServiceIncluded {
                service_id,
                included,
            } => edit_service(snapshot, *service_id, |s| s.is_included = *included),
            ProposalCommand::SetCustomFee {
                service_id,
                custom_fee,
            } => edit_service(snapshot, *service_id, |s| s.custom_fee = Some(*custom_fee)),
            ProposalCommand::RevertCustomFee { service_id } => {
                edit_service(snapshot, *service_id, |s| s.custom_fee = None)
            }
            ProposalCommand::MoveService {
                service_id,
                structure_id,
                discipline,
            } => move_service(snapshot, *service_id, *structure_id, discipline),
            ProposalCommand::SetDesignPercentage {
                structure_id,
                design_percentage,
            } => edit_structure(snapshot, *structure_id, |s| {
                s.design_percentage = *design_percentage
            }),
        }
    }
}

/// Appends the structure and gives it one tracked service per template.
pub fn add_structure(
    snapshot: &ProposalSnapshot,
    structure: Structure,
) -> Result<ProposalSnapshot, ProposalError> {
    if snapshot.structure(structure.id).is_some() {
        return Err(ProposalError::DuplicateStructureId(structure.id));
    }
    let mut next = snapshot.clone();
    let mut next_service_id = next_service_id(&next);
    for template in &snapshot.templates {
        next.services
            .push(template.instantiate(ServiceId(next_service_id), structure.id));
        next_service_id += 1;
    }
    debug!(
        structure_id = structure.id.0,
        services = snapshot.templates.len(),
        "structure added"
    );
    next.structures.push(structure);
    Ok(next)
}

/// Copies the source structure and its tracked services. The copy points at
/// the root of the source's lineage so duplicate ordinals stay flat.
pub fn duplicate_structure(
    snapshot: &ProposalSnapshot,
    source_id: StructureId,
    new_id: StructureId,
    name: &str,
) -> Result<ProposalSnapshot, ProposalError> {
    let source = snapshot
        .structure(source_id)
        .ok_or(ProposalError::UnknownStructure(source_id))?;
    if snapshot.structure(new_id).is_some() {
        return Err(ProposalError::DuplicateStructureId(new_id));
    }

    let mut copy = source.clone();
    copy.id = new_id;
    copy.name = name.to_string();
    copy.parent_id = Some(source.parent_id.unwrap_or(source.id));
    copy.duplicate_number = None;

    let mut next = snapshot.clone();
    let mut next_service_id = next_service_id(&next);
    let copied: Vec<TrackedService> = snapshot
        .services_for(source_id)
        .map(|service| {
            let mut s = service.clone();
            s.id = ServiceId(next_service_id);
            s.structure_id = new_id;
            next_service_id += 1;
            s
        })
        .collect();
    next.services.extend(copied);
    next.structures.push(copy);
    Ok(next)
}

/// Removes the structure and the services bound to it. Duplicates of the
/// removed structure become originals.
pub fn delete_structure(
    snapshot: &ProposalSnapshot,
    structure_id: StructureId,
) -> Result<ProposalSnapshot, ProposalError> {
    if snapshot.structure(structure_id).is_none() {
        return Err(ProposalError::UnknownStructure(structure_id));
    }
    let mut next = snapshot.clone();
    next.structures.retain(|s| s.id != structure_id);
    next.services.retain(|s| s.structure_id != structure_id);
    for s in next.structures.iter_mut() {
        if s.parent_id == Some(structure_id) {
            s.parent_id = None;
            s.duplicate_number = None;
        }
    }
    Ok(next)
}

/// Rebinds a service to another structure and discipline, the data-model
/// half of a drag-and-drop move.
pub fn move_service(
    snapshot: &ProposalSnapshot,
    service_id: ServiceId,
    structure_id: StructureId,
    discipline: &Discipline,
) -> Result<ProposalSnapshot, ProposalError> {
    if snapshot.structure(structure_id).is_none() {
        return Err(ProposalError::UnknownStructure(structure_id));
    }
    edit_service(snapshot, service_id, |s| {
        s.structure_id = structure_id;
        s.discipline = discipline.clone();
    })
}

fn edit_service<F>(
    snapshot: &ProposalSnapshot,
    service_id: ServiceId,
    edit: F,
) -> Result<ProposalSnapshot, ProposalError>
where
    F: FnOnce(&mut TrackedService),
{
    let mut next = snapshot.clone();
    let service = next
        .services
        .iter_mut()
        .find(|s| s.id == service_id)
        .ok_or(ProposalError::UnknownService(service_id))?;
    edit(service);
    Ok(next)
}

fn edit_structure<F>(
    snapshot: &ProposalSnapshot,
    structure_id: StructureId,
    edit: F,
) -> Result<ProposalSnapshot, ProposalError>
where
    F: FnOnce(&mut Structure),
{
    let mut next = snapshot.clone();
    let structure = next
        .structures
        .iter_mut()
        .find(|s| s.id == structure_id)
        .ok_or(ProposalError::UnknownStructure(structure_id))?;
    edit(structure);
    Ok(next)
}

fn next_service_id(snapshot: &ProposalSnapshot) -> u64 {
    snapshot
        .services
        .iter()
        .map(|s| s.id.0)
        .max()
        .map_or(1, |max| max + 1)
}
