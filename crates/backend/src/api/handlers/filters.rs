use axum::Json;
use contracts::system::access::FilterOptionsResponse;

use crate::shared::dates::current_year;
use crate::system::access::{AccessScope, CurrentRole};

/// Number of years offered in the year selector, counting the current one
pub const SELECTABLE_YEARS: i32 = 5;

pub fn filter_options(scope: &AccessScope, current_year: i32) -> FilterOptionsResponse {
    FilterOptionsResponse {
        role: scope.role,
        role_label: scope.role.display_name().to_string(),
        sector: scope.role.sector(),
        teams: scope.team_options(),
        years: (0..SELECTABLE_YEARS).map(|i| current_year - i).collect(),
    }
}

/// GET /api/filters
pub async fn get_filter_options(CurrentRole(role): CurrentRole) -> Json<FilterOptionsResponse> {
    let scope = AccessScope::for_role(role);
    Json(filter_options(&scope, current_year()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::system::access::AppRole;

    #[test]
    fn test_options_follow_role() {
        let options = filter_options(&AccessScope::for_role(AppRole::Varejo), 2026);
        assert_eq!(options.years, vec![2026, 2025, 2024, 2023, 2022]);
        assert_eq!(options.teams.len(), 2);
        assert_eq!(options.teams[1].0, "VAREJO");
        assert_eq!(options.role_label, "Varejo");

        let options = filter_options(&AccessScope::for_role(AppRole::Admin), 2026);
        assert_eq!(options.teams.len(), 5);
        assert_eq!(options.sector, None);
    }
}
