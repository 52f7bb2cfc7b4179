#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::common::{validate_optional_non_negative, validate_text};
use crate::discipline::{Discipline, Phase};
use crate::structure::StructureId;
use crate::{ContractViolation, Validate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceTemplateId(pub u64);

/// Fee line for one engineering service on one structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedService {
    pub id: ServiceId,
    #[serde(default)]
    pub template_id: Option<ServiceTemplateId>,
    pub name: String,
    pub structure_id: StructureId,
    pub discipline: Discipline,
    pub phase: Phase,
    #[serde(default)]
    pub min_fee: Option<f64>,
    /// Percent of the discipline's total design fee.
    #[serde(default)]
    pub rate: Option<f64>,
    #[serde(default)]
    pub fee_increment: Option<f64>,
    #[serde(default)]
    pub is_included: bool,
    #[serde(default)]
    pub is_construction_admin: bool,
    #[serde(default)]
    pub custom_fee: Option<f64>,
}

impl Validate for TrackedService {
    fn validate(&self) -> Result<(), ContractViolation> {
        validate_text("tracked_service.name", &self.name, 256)?;
        validate_optional_non_negative("tracked_service.min_fee", self.min_fee)?;
        validate_optional_non_negative("tracked_service.rate", self.rate)?;
        validate_optional_non_negative("tracked_service.fee_increment", self.fee_increment)?;
        validate_optional_non_negative("tracked_service.custom_fee", self.custom_fee)?;
        Ok(())
    }
}

/// Standard service offering; every structure added to a proposal gets one
/// tracked service per template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceTemplate {
    pub id: ServiceTemplateId,
    pub name: String,
    pub discipline: Discipline,
    pub phase: Phase,
    #[serde(default)]
    pub min_fee: Option<f64>,
    #[serde(default)]
    pub rate: Option<f64>,
    #[serde(default)]
    pub fee_increment: Option<f64>,
    #[serde(default)]
    pub is_construction_admin: bool,
    #[serde(default)]
    pub default_included: bool,
}

impl ServiceTemplate {
    pub fn instantiate(&self, id: ServiceId, structure_id: StructureId) -> TrackedService {
        TrackedService {
            id,
            template_id: Some(self.id),
            name: self.name.clone(),
            structure_id,
            discipline: self.discipline.clone(),
            phase: self.phase,
            min_fee: self.min_fee,
            rate: self.rate,
            fee_increment: self.fee_increment,
            is_included: self.default_included,
            is_construction_admin: self.is_construction_admin,
            custom_fee: None,
        }
    }
}

impl Validate for ServiceTemplate {
    fn validate(&self) -> Result<(), ContractViolation> {
        validate_text("service_template.name", &self.name, 256)?;
        validate_optional_non_negative("service_template.min_fee", self.min_fee)?;
        validate_optional_non_negative("service_template.rate", self.rate)?;
        validate_optional_non_negative("service_template.fee_increment", self.fee_increment)?;
        Ok(())
    }
}
