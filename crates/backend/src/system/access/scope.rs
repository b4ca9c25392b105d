use contracts::shared::filters::{ALL_TEAMS, TEAMS};
use contracts::system::access::{AppRole, Sector};

use crate::shared::aggregation::{CategoryScope, TeamScope};

/// Data a role may see, handed to the dashboards as plain allow-lists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessScope {
    pub role: AppRole,
    pub teams: TeamScope,
    pub categories: CategoryScope,
}

pub fn sector_teams(sector: Sector) -> &'static [&'static str] {
    match sector {
        Sector::Varejo => &["VAREJO"],
        Sector::Industria => &["INDUSTRIAL"],
        Sector::Exportacao => &["EXPORTAÇÃO VAREJO", "EXPORTAÇÃO INDUSTRIA"],
    }
}

pub fn sector_categories(sector: Sector) -> &'static [&'static str] {
    match sector {
        Sector::Varejo => &["LINHA VAREJO", "LINHA MISTA"],
        Sector::Industria => &["LINHA INDUSTRIAL", "LINHA MISTA"],
        Sector::Exportacao => &["EXPORTAÇÃO", "LINHA MISTA"],
    }
}

impl AccessScope {
    pub fn for_role(role: AppRole) -> Self {
        match role.sector() {
            Some(sector) if !role.can_view_all_data() => Self {
                role,
                teams: TeamScope::Only(sector_teams(sector).iter().map(|t| t.to_string()).collect()),
                categories: CategoryScope::Only(
                    sector_categories(sector).iter().map(|c| c.to_string()).collect(),
                ),
            },
            _ => Self {
                role,
                teams: TeamScope::All,
                categories: CategoryScope::All,
            },
        }
    }

    /// Team selector entries, starting with the all-teams entry
    pub fn team_options(&self) -> Vec<(String, String)> {
        let mut options = vec![(ALL_TEAMS.to_string(), "Todas as equipes".to_string())];
        options.extend(
            TEAMS
                .iter()
                .filter(|(value, _)| self.teams.permits(value))
                .map(|(value, label)| (value.to_string(), label.to_string())),
        );
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sector_roles_are_restricted() {
        let scope = AccessScope::for_role(AppRole::GerenteExportacao);
        assert!(scope.teams.permits("EXPORTAÇÃO VAREJO"));
        assert!(scope.teams.permits("EXPORTAÇÃO INDUSTRIA"));
        assert!(!scope.teams.permits("VAREJO"));
        assert!(scope.categories.permits(Some("linha mista")));
        assert!(!scope.categories.permits(Some("LINHA VAREJO")));

        let options = scope.team_options();
        assert_eq!(options.len(), 3);
        assert_eq!(options[0].0, ALL_TEAMS);
    }

    #[test]
    fn test_unrestricted_roles() {
        for role in [AppRole::Admin, AppRole::Consultor] {
            let scope = AccessScope::for_role(role);
            assert_eq!(scope.teams, TeamScope::All);
            assert_eq!(scope.categories, CategoryScope::All);
            assert_eq!(scope.team_options().len(), TEAMS.len() + 1);
        }
    }
}
