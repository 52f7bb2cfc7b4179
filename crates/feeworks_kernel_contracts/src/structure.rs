#![forbid(unsafe_code)]

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::common::{
    validate_non_negative, validate_optional_non_negative, validate_percent, validate_text,
};
use crate::discipline::Discipline;
use crate::{ContractViolation, Validate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StructureId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpaceId(pub u64);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructionCost {
    pub discipline: Discipline,
    #[serde(default, deserialize_with = "crate::common::null_as_zero")]
    pub cost_per_sqft: f64,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl ConstructionCost {
    pub fn v1(
        discipline: Discipline,
        cost_per_sqft: f64,
        is_active: bool,
    ) -> Result<Self, ContractViolation> {
        let c = Self {
            discipline,
            cost_per_sqft,
            is_active,
        };
        c.validate()?;
        Ok(c)
    }
}

impl Validate for ConstructionCost {
    fn validate(&self) -> Result<(), ContractViolation> {
        validate_non_negative("construction_cost.cost_per_sqft", self.cost_per_sqft)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Space {
    pub id: SpaceId,
    pub name: String,
    #[serde(default)]
    pub floor_area: Option<f64>,
    #[serde(default)]
    pub construction_costs: Vec<ConstructionCost>,
}

impl Space {
    pub fn cost_record(&self, discipline: &Discipline) -> Option<&ConstructionCost> {
        self.construction_costs
            .iter()
            .find(|c| &c.discipline == discipline)
    }
}

impl Validate for Space {
    fn validate(&self) -> Result<(), ContractViolation> {
        validate_text("space.name", &self.name, 256)?;
        validate_optional_non_negative("space.floor_area", self.floor_area)?;
        let mut seen: BTreeSet<&Discipline> = BTreeSet::new();
        for cost in &self.construction_costs {
            cost.validate()?;
            if !seen.insert(&cost.discipline) {
                return Err(ContractViolation::InvalidValue {
                    field: "space.construction_costs",
                    reason: "discipline entries must be unique",
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub id: LevelId,
    pub name: String,
    #[serde(default)]
    pub spaces: Vec<Space>,
}

impl Validate for Level {
    fn validate(&self) -> Result<(), ContractViolation> {
        validate_text("level.name", &self.name, 256)?;
        for space in &self.spaces {
            space.validate()?;
        }
        Ok(())
    }
}

/// Top of the level/space hierarchy. A structure with a `parent_id` is a
/// duplicate of that parent and is billed through the duplicate rate table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    pub id: StructureId,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<StructureId>,
    #[serde(default)]
    pub design_percentage: Option<f64>,
    #[serde(default)]
    pub duplicate_number: Option<u32>,
    #[serde(default)]
    pub levels: Vec<Level>,
}

impl Structure {
    pub fn new(id: StructureId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            parent_id: None,
            design_percentage: None,
            duplicate_number: None,
            levels: Vec::new(),
        }
    }

    pub fn is_duplicate(&self) -> bool {
        self.parent_id.is_some()
    }

    pub fn spaces(&self) -> impl Iterator<Item = &Space> {
        self.levels.iter().flat_map(|level| level.spaces.iter())
    }
}

impl Validate for Structure {
    fn validate(&self) -> Result<(), ContractViolation> {
        validate_text("structure.name", &self.name, 256)?;
        if let Some(p) = self.design_percentage {
            validate_percent("structure.design_percentage", p)?;
        }
        if self.parent_id == Some(self.id) {
            return Err(ContractViolation::InvalidValue {
                field: "structure.parent_id",
                reason: "must not reference itself",
            });
        }
        let mut level_ids: BTreeSet<LevelId> = BTreeSet::new();
        let mut space_ids: BTreeSet<SpaceId> = BTreeSet::new();
        for level in &self.levels {
            level.validate()?;
            if !level_ids.insert(level.id) {
                return Err(ContractViolation::InvalidValue {
                    field: "structure.levels",
                    reason: "level ids must be unique",
                });
            }
            for space in &level.spaces {
                if !space_ids.insert(space.id) {
                    return Err(ContractViolation::InvalidValue {
                        field: "structure.levels.spaces",
                        reason: "space ids must be unique",
                    });
                }
            }
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}
