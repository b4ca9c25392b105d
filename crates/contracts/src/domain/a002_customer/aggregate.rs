use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Master-data situation flag (`Situacao`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Situation {
    Active,
    #[default]
    Inactive,
}

impl Situation {
    /// `A` is active; every other flag is treated as inactive
    pub fn from_flag(flag: &str) -> Self {
        match flag.trim() {
            "A" | "a" => Situation::Active,
            _ => Situation::Inactive,
        }
    }
}

/// Customer master entry, the source of truth for churn and cohort
/// classification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub code: i64,
    pub name: String,
    /// Activity segment (`Atividade`)
    pub activity: String,
    /// Product line category, e.g. `LINHA VAREJO`
    pub category: Option<String>,
    pub region: String,
    pub state: String,
    pub city: String,
    pub email: String,
    pub registered_on: Option<NaiveDate>,
    pub last_purchase: Option<NaiveDate>,
    pub situation: Situation,
}
