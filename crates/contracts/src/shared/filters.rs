use serde::{Deserialize, Serialize};

/// Team selector value meaning "every team the caller may see"
pub const ALL_TEAMS: &str = "TODAS";

/// Sales teams known to the dashboard, with display names
pub const TEAMS: &[(&str, &str)] = &[
    ("INDUSTRIAL", "Indústria"),
    ("VAREJO", "Varejo"),
    ("EXPORTAÇÃO VAREJO", "Exportação Varejo"),
    ("EXPORTAÇÃO INDUSTRIA", "Exportação Indústria"),
];

fn default_team() -> String {
    ALL_TEAMS.to_string()
}

/// Filter inputs of the sales dashboards.
///
/// `year` selects the fetched snapshot; `month` and `team` are applied locally
/// on the already-fetched year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesFilter {
    pub year: i32,
    pub month: u32,
    #[serde(default = "default_team")]
    pub team: String,
}

impl SalesFilter {
    pub fn new(year: i32, month: u32, team: &str) -> Self {
        Self {
            year,
            month,
            team: team.to_string(),
        }
    }

    /// Period in format "YYYY-MM"
    pub fn period(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_defaults_to_all_teams() {
        let filter: SalesFilter = serde_json::from_str(r#"{"year":2025,"month":3}"#).unwrap();
        assert_eq!(filter.team, ALL_TEAMS);
        assert_eq!(filter.period(), "2025-03");
    }
}
