#![forbid(unsafe_code)]

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::fee_scale::{DuplicateRateTable, FeeScaleTable};
use crate::service::{ServiceId, ServiceTemplate, ServiceTemplateId, TrackedService};
use crate::structure::{Structure, StructureId};
use crate::{ContractViolation, SchemaVersion, Validate};

pub const FEEWORKS_CONTRACT_VERSION: SchemaVersion = SchemaVersion(1);

/// Everything a calculation pass reads. The editing layer hands over a
/// fresh snapshot after every edit; nothing here is shared or mutated in
/// place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalSnapshot {
    #[serde(default = "current_schema_version")]
    pub schema_version: SchemaVersion,
    #[serde(default)]
    pub fee_scale: FeeScaleTable,
    #[serde(default)]
    pub duplicate_rates: DuplicateRateTable,
    #[serde(default)]
    pub structures: Vec<Structure>,
    #[serde(default)]
    pub services: Vec<TrackedService>,
    #[serde(default)]
    pub templates: Vec<ServiceTemplate>,
}

impl ProposalSnapshot {
    pub fn v1(
        fee_scale: FeeScaleTable,
        duplicate_rates: DuplicateRateTable,
        structures: Vec<Structure>,
        services: Vec<TrackedService>,
        templates: Vec<ServiceTemplate>,
    ) -> Result<Self, ContractViolation> {
        let s = Self {
            schema_version: FEEWORKS_CONTRACT_VERSION,
            fee_scale,
            duplicate_rates,
            structures,
            services,
            templates,
        };
        s.validate()?;
        Ok(s)
    }

    pub fn empty() -> Self {
        Self {
            schema_version: FEEWORKS_CONTRACT_VERSION,
            fee_scale: FeeScaleTable::empty(),
            duplicate_rates: DuplicateRateTable::empty(),
            structures: Vec::new(),
            services: Vec::new(),
            templates: Vec::new(),
        }
    }

    pub fn structure(&self, id: StructureId) -> Option<&Structure> {
        self.structures.iter().find(|s| s.id == id)
    }

    pub fn service(&self, id: ServiceId) -> Option<&TrackedService> {
        self.services.iter().find(|s| s.id == id)
    }

    pub fn services_for(&self, structure_id: StructureId) -> impl Iterator<Item = &TrackedService> {
        self.services
            .iter()
            .filter(move |s| s.structure_id == structure_id)
    }
}

impl Validate for ProposalSnapshot {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.schema_version != FEEWORKS_CONTRACT_VERSION {
            return Err(ContractViolation::InvalidValue {
                field: "proposal_snapshot.schema_version",
                reason: "must match FEEWORKS_CONTRACT_VERSION",
            });
        }
        self.fee_scale.validate()?;
        self.duplicate_rates.validate()?;

        let mut structure_ids: BTreeSet<StructureId> = BTreeSet::new();
        for structure in &self.structures {
            structure.validate()?;
            if !structure_ids.insert(structure.id) {
                return Err(ContractViolation::InvalidValue {
                    field: "proposal_snapshot.structures",
                    reason: "structure ids must be unique",
                });
            }
        }
        validate_lineage(&self.structures, &structure_ids)?;

        let mut template_ids: BTreeSet<ServiceTemplateId> = BTreeSet::new();
        for template in &self.templates {
            template.validate()?;
            if !template_ids.insert(template.id) {
                return Err(ContractViolation::InvalidValue {
                    field: "proposal_snapshot.templates",
                    reason: "template ids must be unique",
                });
            }
        }

        let mut service_ids: BTreeSet<ServiceId> = BTreeSet::new();
        for service in &self.services {
            service.validate()?;
            if !service_ids.insert(service.id) {
                return Err(ContractViolation::InvalidValue {
                    field: "proposal_snapshot.services",
                    reason: "service ids must be unique",
                });
            }
            if !structure_ids.contains(&service.structure_id) {
                return Err(ContractViolation::InvalidValue {
                    field: "proposal_snapshot.services.structure_id",
                    reason: "must reference a structure in the snapshot",
                });
            }
        }
        Ok(())
    }
}

fn validate_lineage(
    structures: &[Structure],
    known: &BTreeSet<StructureId>,
) -> Result<(), ContractViolation> {
    let parents: BTreeMap<StructureId, StructureId> = structures
        .iter()
        .filter_map(|s| s.parent_id.map(|p| (s.id, p)))
        .collect();
    for (child, parent) in &parents {
        if !known.contains(parent) {
            return Err(ContractViolation::InvalidValue {
                field: "structure.parent_id",
                reason: "must reference a structure in the snapshot",
            });
        }
        let mut cursor = *parent;
        let mut hops = 0usize;
        while let Some(next) = parents.get(&cursor) {
            if *next == *child || hops > parents.len() {
                return Err(ContractViolation::InvalidValue {
                    field: "structure.parent_id",
                    reason: "duplicate lineage must be acyclic",
                });
            }
            cursor = *next;
            hops += 1;
        }
    }
    Ok(())
}

fn current_schema_version() -> SchemaVersion {
    FEEWORKS_CONTRACT_VERSION
}
