#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::discipline::Discipline;
use crate::service::ServiceId;
use crate::structure::StructureId;

/// Where an adjusted rate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RateSource {
    Bracket { index: usize },
    EmptyTableFallback,
    BelowLowestThresholdFallback,
}

impl RateSource {
    pub fn is_fallback(self) -> bool {
        !matches!(self, RateSource::Bracket { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedRate {
    /// Percent applied to construction cost.
    pub rate: f64,
    pub source: RateSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DisciplineFee {
    pub fee: f64,
    pub rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ServiceFee {
    pub calculated_fee: f64,
    pub display_fee: f64,
    pub is_custom: bool,
}

/// Service fee triple plus the flags the proposal form needs to render it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ServiceFeeView {
    pub service_id: ServiceId,
    pub eligible: bool,
    pub fee: ServiceFee,
    pub can_revert: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DisciplineTotal {
    pub space_fees: f64,
    pub service_fees: f64,
    pub total: f64,
}

/// One amount per standard discipline. Amounts for disciplines outside the
/// standard five are not tracked here.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DisciplineAmounts {
    pub civil: f64,
    pub electrical: f64,
    pub mechanical: f64,
    pub plumbing: f64,
    pub structural: f64,
}

impl DisciplineAmounts {
    pub fn get(&self, discipline: &Discipline) -> f64 {
        match discipline {
            Discipline::Civil => self.civil,
            Discipline::Electrical => self.electrical,
            Discipline::Mechanical => self.mechanical,
            Discipline::Plumbing => self.plumbing,
            Discipline::Structural => self.structural,
            Discipline::Other(_) => 0.0,
        }
    }

    /// Returns false when the discipline has no slot.
    pub fn add(&mut self, discipline: &Discipline, amount: f64) -> bool {
        let slot = match discipline {
            Discipline::Civil => &mut self.civil,
            Discipline::Electrical => &mut self.electrical,
            Discipline::Mechanical => &mut self.mechanical,
            Discipline::Plumbing => &mut self.plumbing,
            Discipline::Structural => &mut self.structural,
            Discipline::Other(_) => return false,
        };
        *slot += amount;
        true
    }

    pub fn plus(&self, other: &DisciplineAmounts) -> DisciplineAmounts {
        DisciplineAmounts {
            civil: self.civil + other.civil,
            electrical: self.electrical + other.electrical,
            mechanical: self.mechanical + other.mechanical,
            plumbing: self.plumbing + other.plumbing,
            structural: self.structural + other.structural,
        }
    }

    pub fn total(&self) -> f64 {
        self.civil + self.electrical + self.mechanical + self.plumbing + self.structural
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureSummary {
    pub structure_id: StructureId,
    pub name: String,
    pub design_totals: DisciplineAmounts,
    pub construction_totals: DisciplineAmounts,
    pub grand_totals: DisciplineAmounts,
    pub structure_total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub design_totals: DisciplineAmounts,
    pub construction_totals: DisciplineAmounts,
    pub grand_totals: DisciplineAmounts,
    pub project_total: f64,
}
