use contracts::domain::a001_sale::aggregate::SaleRecord;
use contracts::domain::a002_customer::aggregate::CustomerRecord;
use contracts::shared::filters::ALL_TEAMS;

/// Category selector value for customers without a category
pub const NO_CATEGORY: &str = "Sem categoria";

/// Teams a caller is allowed to see
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeamScope {
    All,
    Only(Vec<String>),
}

impl TeamScope {
    pub fn permits(&self, team: &str) -> bool {
        match self {
            TeamScope::All => true,
            TeamScope::Only(teams) => {
                let team = team.trim();
                teams.iter().any(|t| t == team)
            }
        }
    }
}

/// Lines of the selected team.
///
/// `TODAS` selects every team the scope permits. A specific team outside the
/// scope yields nothing.
pub fn scoped_by_team<'a, I>(records: I, scope: &TeamScope, team: &str) -> Vec<&'a SaleRecord>
where
    I: IntoIterator<Item = &'a SaleRecord>,
{
    let team = team.trim();
    if team == ALL_TEAMS {
        return records
            .into_iter()
            .filter(|r| scope.permits(&r.team))
            .collect();
    }

    if !scope.permits(team) {
        tracing::warn!("Team '{}' is outside the caller's scope", team);
        return Vec::new();
    }

    records
        .into_iter()
        .filter(|r| r.team.trim() == team)
        .collect()
}

/// Customer categories a caller is allowed to see, compared case-insensitively
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryScope {
    All,
    Only(Vec<String>),
}

impl CategoryScope {
    pub fn permits(&self, category: Option<&str>) -> bool {
        match self {
            CategoryScope::All => true,
            CategoryScope::Only(allowed) => {
                let category = category.unwrap_or("").trim().to_lowercase();
                allowed.iter().any(|a| a.trim().to_lowercase() == category)
            }
        }
    }
}

/// Customers in scope, optionally narrowed to one selected category.
///
/// `TODAS` or no selection keeps every permitted customer; `Sem categoria`
/// selects customers without a category.
pub fn scoped_customers<'a>(
    customers: &'a [CustomerRecord],
    scope: &CategoryScope,
    selected: Option<&str>,
) -> Vec<&'a CustomerRecord> {
    let selected = selected.map(str::trim).filter(|s| !s.is_empty() && *s != ALL_TEAMS);

    customers
        .iter()
        .filter(|c| scope.permits(c.category.as_deref()))
        .filter(|c| match selected {
            None => true,
            Some(NO_CATEGORY) => c.category.as_deref().map(str::trim).unwrap_or("").is_empty(),
            Some(sel) => c
                .category
                .as_deref()
                .map(|cat| cat.trim().to_lowercase() == sel.to_lowercase())
                .unwrap_or(false),
        })
        .collect()
}

pub fn in_month<'a, I>(records: I, month: u32) -> Vec<&'a SaleRecord>
where
    I: IntoIterator<Item = &'a SaleRecord>,
{
    records.into_iter().filter(|r| r.month == month).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(team: &str, month: u32) -> SaleRecord {
        SaleRecord {
            team: team.to_string(),
            month,
            ..Default::default()
        }
    }

    #[test]
    fn test_all_teams_respects_scope() {
        let records = vec![line("VAREJO", 1), line("INDUSTRIAL", 1), line("VAREJO ", 2)];
        let scope = TeamScope::Only(vec!["VAREJO".to_string()]);

        assert_eq!(scoped_by_team(&records, &TeamScope::All, ALL_TEAMS).len(), 3);
        assert_eq!(scoped_by_team(&records, &scope, ALL_TEAMS).len(), 2);
        assert_eq!(scoped_by_team(&records, &scope, "VAREJO").len(), 2);
        assert!(scoped_by_team(&records, &scope, "INDUSTRIAL").is_empty());
    }

    fn customer(code: i64, category: Option<&str>) -> CustomerRecord {
        CustomerRecord {
            code,
            category: category.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_category_scope() {
        let customers = vec![
            customer(1, Some("LINHA VAREJO")),
            customer(2, Some("linha mista")),
            customer(3, Some("LINHA INDUSTRIAL")),
            customer(4, None),
        ];
        let scope = CategoryScope::Only(vec!["LINHA VAREJO".into(), "LINHA MISTA".into()]);

        let codes = |v: Vec<&CustomerRecord>| v.iter().map(|c| c.code).collect::<Vec<_>>();
        assert_eq!(codes(scoped_customers(&customers, &scope, None)), vec![1, 2]);
        assert_eq!(codes(scoped_customers(&customers, &scope, Some("Linha Mista"))), vec![2]);
        assert_eq!(codes(scoped_customers(&customers, &CategoryScope::All, Some(NO_CATEGORY))), vec![4]);
        assert_eq!(codes(scoped_customers(&customers, &CategoryScope::All, Some(ALL_TEAMS))).len(), 4);
    }

    #[test]
    fn test_in_month() {
        let records = vec![line("VAREJO", 1), line("VAREJO", 2), line("VAREJO", 2)];
        let scoped = scoped_by_team(&records, &TeamScope::All, ALL_TEAMS);
        assert_eq!(in_month(scoped, 2).len(), 2);
    }
}
