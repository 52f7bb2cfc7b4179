#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::common::{validate_non_negative, validate_percent};
use crate::discipline::Discipline;
use crate::{ContractViolation, Validate};

/// Highest id in a duplicate-structure rate table.
pub const DUPLICATE_RATE_ID_CAP: u8 = 10;

/// One row of the fee scale: a construction-cost threshold, the prime
/// consultant rate (percent) and each discipline's share of that rate
/// (percent of prime).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeScaleBracket {
    #[serde(default, deserialize_with = "crate::common::null_as_zero")]
    pub construction_cost: f64,
    #[serde(default, deserialize_with = "crate::common::null_as_zero")]
    pub prime_consultant_rate: f64,
    #[serde(default, deserialize_with = "crate::common::null_as_zero")]
    pub fraction_mechanical: f64,
    #[serde(default, deserialize_with = "crate::common::null_as_zero")]
    pub fraction_plumbing: f64,
    #[serde(default, deserialize_with = "crate::common::null_as_zero")]
    pub fraction_electrical: f64,
    #[serde(default, deserialize_with = "crate::common::null_as_zero")]
    pub fraction_structural: f64,
}

impl FeeScaleBracket {
    pub fn v1(
        construction_cost: f64,
        prime_consultant_rate: f64,
        fraction_mechanical: f64,
        fraction_plumbing: f64,
        fraction_electrical: f64,
        fraction_structural: f64,
    ) -> Result<Self, ContractViolation> {
        let b = Self {
            construction_cost,
            prime_consultant_rate,
            fraction_mechanical,
            fraction_plumbing,
            fraction_electrical,
            fraction_structural,
        };
        b.validate()?;
        Ok(b)
    }

    /// Discipline share of the prime rate, or `None` for disciplines the
    /// scale has no column for.
    pub fn fraction_for(&self, discipline: &Discipline) -> Option<f64> {
        match discipline {
            Discipline::Mechanical => Some(self.fraction_mechanical),
            Discipline::Plumbing => Some(self.fraction_plumbing),
            Discipline::Electrical => Some(self.fraction_electrical),
            Discipline::Structural => Some(self.fraction_structural),
            Discipline::Civil | Discipline::Other(_) => None,
        }
    }
}

impl Validate for FeeScaleBracket {
    fn validate(&self) -> Result<(), ContractViolation> {
        validate_non_negative("fee_scale_bracket.construction_cost", self.construction_cost)?;
        validate_non_negative(
            "fee_scale_bracket.prime_consultant_rate",
            self.prime_consultant_rate,
        )?;
        validate_percent(
            "fee_scale_bracket.fraction_mechanical",
            self.fraction_mechanical,
        )?;
        validate_percent("fee_scale_bracket.fraction_plumbing", self.fraction_plumbing)?;
        validate_percent(
            "fee_scale_bracket.fraction_electrical",
            self.fraction_electrical,
        )?;
        validate_percent(
            "fee_scale_bracket.fraction_structural",
            self.fraction_structural,
        )?;
        Ok(())
    }
}

/// Fee scale ordered ascending by threshold. An empty table is valid: it is
/// what callers hold before the scale has been fetched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeeScaleTable {
    brackets: Vec<FeeScaleBracket>,
}

impl FeeScaleTable {
    pub fn v1(brackets: Vec<FeeScaleBracket>) -> Result<Self, ContractViolation> {
        let t = Self { brackets };
        t.validate()?;
        Ok(t)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn brackets(&self) -> &[FeeScaleBracket] {
        &self.brackets
    }

    pub fn is_empty(&self) -> bool {
        self.brackets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.brackets.len()
    }
}

impl Validate for FeeScaleTable {
    fn validate(&self) -> Result<(), ContractViolation> {
        let mut previous: Option<f64> = None;
        for bracket in &self.brackets {
            bracket.validate()?;
            if let Some(prev) = previous {
                if bracket.construction_cost <= prev {
                    return Err(ContractViolation::InvalidValue {
                        field: "fee_scale_table.brackets",
                        reason: "construction_cost thresholds must be strictly ascending",
                    });
                }
            }
            previous = Some(bracket.construction_cost);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DuplicateRate {
    pub id: u8,
    pub rate: f64,
}

impl DuplicateRate {
    pub fn v1(id: u8, rate: f64) -> Result<Self, ContractViolation> {
        let r = Self { id, rate };
        r.validate()?;
        Ok(r)
    }
}

impl Validate for DuplicateRate {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.id == 0 || self.id > DUPLICATE_RATE_ID_CAP {
            return Err(ContractViolation::InvalidRange {
                field: "duplicate_rate.id",
                min: 1.0,
                max: DUPLICATE_RATE_ID_CAP as f64,
                got: self.id as f64,
            });
        }
        validate_non_negative("duplicate_rate.rate", self.rate)
    }
}

/// Rate multipliers for duplicate structures, indexed by id (1 = original).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DuplicateRateTable {
    entries: Vec<DuplicateRate>,
}

impl DuplicateRateTable {
    pub fn v1(entries: Vec<DuplicateRate>) -> Result<Self, ContractViolation> {
        let t = Self { entries };
        t.validate()?;
        Ok(t)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[DuplicateRate] {
        &self.entries
    }

    pub fn rate_for_id(&self, id: u8) -> Option<f64> {
        self.entries.iter().find(|e| e.id == id).map(|e| e.rate)
    }
}

impl Validate for DuplicateRateTable {
    fn validate(&self) -> Result<(), ContractViolation> {
        let mut previous: Option<u8> = None;
        for entry in &self.entries {
            entry.validate()?;
            if previous.is_some_and(|p| entry.id <= p) {
                return Err(ContractViolation::InvalidValue {
                    field: "duplicate_rate_table.entries",
                    reason: "ids must be strictly ascending",
                });
            }
            previous = Some(entry.id);
        }
        Ok(())
    }
}
