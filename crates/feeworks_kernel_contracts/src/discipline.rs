#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

/// Engineering specialty that carries its own cost and fee lines.
///
/// Names outside the five standard disciplines are kept verbatim in `Other`
/// so they survive a snapshot round-trip; the fee engine prices them without
/// a discipline fraction.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Discipline {
    Civil,
    Electrical,
    Mechanical,
    Plumbing,
    Structural,
    Other(String),
}

impl Discipline {
    /// Summary key order.
    pub const KNOWN: [Discipline; 5] = [
        Discipline::Civil,
        Discipline::Electrical,
        Discipline::Mechanical,
        Discipline::Plumbing,
        Discipline::Structural,
    ];

    pub fn parse(raw: &str) -> Discipline {
        let trimmed = raw.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "civil" => Discipline::Civil,
            "electrical" => Discipline::Electrical,
            "mechanical" => Discipline::Mechanical,
            "plumbing" => Discipline::Plumbing,
            "structural" => Discipline::Structural,
            _ => Discipline::Other(trimmed.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Discipline::Civil => "Civil",
            Discipline::Electrical => "Electrical",
            Discipline::Mechanical => "Mechanical",
            Discipline::Plumbing => "Plumbing",
            Discipline::Structural => "Structural",
            Discipline::Other(name) => name.as_str(),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Discipline::Other(_))
    }
}

impl From<String> for Discipline {
    fn from(raw: String) -> Self {
        Discipline::parse(&raw)
    }
}

impl From<Discipline> for String {
    fn from(discipline: Discipline) -> Self {
        match discipline {
            Discipline::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Design,
    Construction,
}

impl Phase {
    pub const ALL: [Phase; 2] = [Phase::Design, Phase::Construction];

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Design => "design",
            Phase::Construction => "construction",
        }
    }
}
