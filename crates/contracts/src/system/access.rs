use serde::{Deserialize, Serialize};

/// Role label supplied by the identity provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppRole {
    Admin,
    Consultor,
    GerenteVarejo,
    Varejo,
    GerenteIndustria,
    Industria,
    GerenteExportacao,
    Exportacao,
    SemAcesso,
}

/// Business sector a restricted role belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sector {
    Varejo,
    Industria,
    Exportacao,
}

impl AppRole {
    /// Parse the provider's role label; anything unknown has no access
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "admin" => AppRole::Admin,
            "consultor" => AppRole::Consultor,
            "gerente_varejo" => AppRole::GerenteVarejo,
            "varejo" => AppRole::Varejo,
            "gerente_industria" => AppRole::GerenteIndustria,
            "industria" => AppRole::Industria,
            "gerente_exportacao" => AppRole::GerenteExportacao,
            "exportacao" => AppRole::Exportacao,
            _ => AppRole::SemAcesso,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AppRole::Admin => "Administrador",
            AppRole::Consultor => "Consultor",
            AppRole::GerenteVarejo => "Gerente Varejo",
            AppRole::Varejo => "Varejo",
            AppRole::GerenteIndustria => "Gerente Indústria",
            AppRole::Industria => "Indústria",
            AppRole::GerenteExportacao => "Gerente Exportação",
            AppRole::Exportacao => "Exportação",
            AppRole::SemAcesso => "Sem Acessos",
        }
    }

    pub fn sector(&self) -> Option<Sector> {
        match self {
            AppRole::GerenteVarejo | AppRole::Varejo => Some(Sector::Varejo),
            AppRole::GerenteIndustria | AppRole::Industria => Some(Sector::Industria),
            AppRole::GerenteExportacao | AppRole::Exportacao => Some(Sector::Exportacao),
            AppRole::Admin | AppRole::Consultor | AppRole::SemAcesso => None,
        }
    }

    pub fn has_access(&self) -> bool {
        *self != AppRole::SemAcesso
    }

    /// Admin and consultor see every team and category
    pub fn can_view_all_data(&self) -> bool {
        matches!(self, AppRole::Admin | AppRole::Consultor)
    }

    pub fn is_manager(&self) -> bool {
        matches!(
            self,
            AppRole::Admin
                | AppRole::GerenteVarejo
                | AppRole::GerenteIndustria
                | AppRole::GerenteExportacao
        )
    }
}

/// Filter options the caller may pick from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterOptionsResponse {
    pub role: AppRole,
    pub role_label: String,
    pub sector: Option<Sector>,
    /// `(value, display name)` pairs, starting with the all-teams entry
    pub teams: Vec<(String, String)>,
    pub years: Vec<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_label() {
        assert_eq!(AppRole::from_label("admin"), AppRole::Admin);
        assert_eq!(AppRole::from_label(" Gerente_Varejo "), AppRole::GerenteVarejo);
        assert_eq!(AppRole::from_label("root"), AppRole::SemAcesso);
        assert_eq!(AppRole::from_label(""), AppRole::SemAcesso);
    }

    #[test]
    fn test_role_sector() {
        assert_eq!(AppRole::Industria.sector(), Some(Sector::Industria));
        assert_eq!(AppRole::Consultor.sector(), None);
        assert!(AppRole::Consultor.can_view_all_data());
        assert!(!AppRole::Exportacao.can_view_all_data());
        assert!(!AppRole::SemAcesso.has_access());
    }
}
