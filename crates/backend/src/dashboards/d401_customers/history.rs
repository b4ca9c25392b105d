use contracts::dashboards::d401_customers::{CustomerSaleLine, CustomerSalesResponse};
use contracts::domain::a001_sale::aggregate::SaleRecord;
use contracts::domain::a002_customer::aggregate::CustomerRecord;
use contracts::shared::filters::ALL_TEAMS;

use crate::shared::aggregation::{ratio_percent, scoped_by_team};
use crate::shared::data_source::{DataStore, FetchError, YearSnapshot};
use crate::system::access::AccessScope;

/// Sales history of one customer over the selected and the previous year.
///
/// `None` when the customer is unknown or outside the caller's categories.
pub async fn get_customer_sales(
    store: &DataStore,
    scope: &AccessScope,
    code: i64,
    year: i32,
) -> Result<Option<CustomerSalesResponse>, FetchError> {
    let (customers, snapshot) = tokio::try_join!(store.customers(), store.snapshot(year))?;
    Ok(customer_sales(&customers, &snapshot, scope, code))
}

fn sale_line(record: &SaleRecord) -> CustomerSaleLine {
    CustomerSaleLine {
        date: record.date,
        invoice_id: record.invoice_id.trim().to_string(),
        movement: record.movement,
        product_code: record.product_code.clone(),
        product_name: record.product_name.clone(),
        quantity: record.quantity,
        merchandise_value: record.merchandise_value,
        margin_value: record.margin_value,
        margin_percent: ratio_percent(record.margin_value, record.merchandise_value),
    }
}

pub fn customer_sales(
    customers: &[CustomerRecord],
    snapshot: &YearSnapshot,
    scope: &AccessScope,
    code: i64,
) -> Option<CustomerSalesResponse> {
    let customer = customers
        .iter()
        .find(|c| c.code == code && scope.categories.permits(c.category.as_deref()))?;

    let mut lines: Vec<CustomerSaleLine> = scoped_by_team(
        snapshot.current.iter().chain(snapshot.previous.iter()),
        &scope.teams,
        ALL_TEAMS,
    )
    .into_iter()
    .filter(|r| r.customer_code == code)
    .map(sale_line)
    .collect();
    // undated lines go last
    lines.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| b.invoice_id.cmp(&a.invoice_id))
    });

    tracing::debug!(
        "D401: {} lines for customer {} in {}-{}",
        lines.len(),
        code,
        snapshot.year - 1,
        snapshot.year
    );

    Some(CustomerSalesResponse {
        code,
        name: customer.name.clone(),
        category: customer.category.clone(),
        year: snapshot.year,
        merchandise_total: lines.iter().map(|l| l.merchandise_value).sum(),
        margin_total: lines.iter().map(|l| l.margin_value).sum(),
        lines,
    })
}
