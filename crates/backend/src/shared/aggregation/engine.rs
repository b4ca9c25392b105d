//! Single-pass grouping of sale lines.
//!
//! Every dashboard rollup (month, channel, product, customer, state, ...) goes
//! through [`aggregate_by`]: records are folded into one [`Accumulator`] per
//! key in encounter order, derived figures are computed afterwards, and the
//! result is sorted and truncated only at the very end.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use contracts::domain::a001_sale::aggregate::{Movement, SaleRecord};
use contracts::shared::aggregates::{GroupTotals, TopItem};

pub const FALLBACK_KEY: &str = "Outros";
pub const NO_NAME: &str = "Sem nome";
pub const NO_CUSTOMER: &str = "Sem cliente";
pub const NO_SALESPERSON: &str = "Sem vendedor";

/// Grouping dimension of a sale line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    /// Zero-padded month number ("01".."12")
    Month,
    Channel,
    Region,
    State,
    Product,
    Customer,
    Salesperson,
}

fn non_blank(value: &str, fallback: &str) -> String {
    let v = value.trim();
    if v.is_empty() {
        fallback.to_string()
    } else {
        v.to_string()
    }
}

impl Dimension {
    pub fn key(&self, record: &SaleRecord) -> String {
        match self {
            Dimension::Month => {
                if (1..=12).contains(&record.month) {
                    format!("{:02}", record.month)
                } else {
                    FALLBACK_KEY.to_string()
                }
            }
            Dimension::Channel => non_blank(&record.channel, FALLBACK_KEY),
            Dimension::Region => non_blank(&record.region, FALLBACK_KEY),
            Dimension::State => non_blank(&record.state.to_uppercase(), FALLBACK_KEY),
            Dimension::Product => non_blank(&record.product_name, NO_NAME),
            Dimension::Customer => non_blank(&record.customer_name, NO_CUSTOMER),
            Dimension::Salesperson => non_blank(&record.salesperson, NO_SALESPERSON),
        }
    }
}

/// Running totals of one key.
///
/// Sale lines feed revenue, margin, cost, quantity and the invoice set; return
/// lines only feed `returned`, always as an absolute value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Accumulator {
    pub gross_revenue: f64,
    pub returned: f64,
    pub margin: f64,
    /// Signed sum as sent by the source; read through [`Accumulator::cost_of_goods`]
    pub cost: f64,
    pub quantity: f64,
    pub invoices: HashSet<String>,
}

impl Accumulator {
    /// Fold one line in. Returns `false` for lines with an unknown movement flag.
    pub fn add(&mut self, record: &SaleRecord) -> bool {
        match record.movement {
            Movement::Sale => {
                self.gross_revenue += record.gross_value;
                self.margin += record.margin_value;
                self.cost += record.cost_value;
                self.quantity += record.quantity;
                let invoice = record.invoice_id.trim();
                if !invoice.is_empty() {
                    self.invoices.insert(invoice.to_string());
                }
                true
            }
            Movement::Return => {
                self.returned += record.gross_value.abs();
                true
            }
            Movement::Unknown => false,
        }
    }

    pub fn merge(&mut self, other: Accumulator) {
        self.gross_revenue += other.gross_revenue;
        self.returned += other.returned;
        self.margin += other.margin;
        self.cost += other.cost;
        self.quantity += other.quantity;
        self.invoices.extend(other.invoices);
    }

    pub fn net_revenue(&self) -> f64 {
        self.gross_revenue - self.returned
    }

    pub fn cost_of_goods(&self) -> f64 {
        self.cost.abs()
    }

    pub fn invoice_count(&self) -> usize {
        self.invoices.len()
    }

    /// Margin over gross revenue, in percent
    pub fn margin_percent(&self) -> f64 {
        ratio_percent(self.margin, self.gross_revenue)
    }

    /// Gross revenue per distinct invoice
    pub fn average_ticket(&self) -> f64 {
        if self.invoices.is_empty() {
            0.0
        } else {
            self.gross_revenue / self.invoices.len() as f64
        }
    }
}

/// `part / whole * 100`, 0 when `whole` is not positive
pub fn ratio_percent(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}

/// One aggregated key
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub key: String,
    pub acc: Accumulator,
}

impl Group {
    pub fn to_totals(&self) -> GroupTotals {
        GroupTotals {
            key: self.key.clone(),
            gross_revenue: self.acc.gross_revenue,
            returned: self.acc.returned,
            net_revenue: self.acc.net_revenue(),
            margin: self.acc.margin,
            margin_percent: self.acc.margin_percent(),
            cost: self.acc.cost_of_goods(),
            quantity: self.acc.quantity,
            invoice_count: self.acc.invoice_count(),
            average_ticket: self.acc.average_ticket(),
        }
    }

    pub fn to_top_item(&self) -> TopItem {
        TopItem {
            name: self.key.clone(),
            gross_revenue: self.acc.gross_revenue,
            quantity: Some(self.acc.quantity),
            margin: Some(self.acc.margin),
            invoice_count: Some(self.acc.invoice_count()),
        }
    }
}

/// Figure a group list is ordered by (always descending)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    GrossRevenue,
    NetRevenue,
    Margin,
    Quantity,
    Invoices,
}

impl SortKey {
    fn value(&self, acc: &Accumulator) -> f64 {
        match self {
            SortKey::GrossRevenue => acc.gross_revenue,
            SortKey::NetRevenue => acc.net_revenue(),
            SortKey::Margin => acc.margin,
            SortKey::Quantity => acc.quantity,
            SortKey::Invoices => acc.invoice_count() as f64,
        }
    }
}

/// Group records by an arbitrary key, keeping first-encounter order of keys
pub fn aggregate_by<'a, I, F>(records: I, key_fn: F) -> Vec<Group>
where
    I: IntoIterator<Item = &'a SaleRecord>,
    F: Fn(&SaleRecord) -> String,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Group> = Vec::new();
    let mut skipped = 0usize;

    for record in records {
        if record.movement == Movement::Unknown {
            skipped += 1;
            continue;
        }
        let key = key_fn(record);
        let slot = match index.get(&key) {
            Some(&i) => i,
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(Group {
                    key,
                    acc: Accumulator::default(),
                });
                groups.len() - 1
            }
        };
        groups[slot].acc.add(record);
    }

    if skipped > 0 {
        tracing::debug!("Skipped {} lines with unknown movement flag", skipped);
    }

    groups
}

/// Group by a dimension and sort descending by `sort`
pub fn aggregate<'a, I>(records: I, dimension: Dimension, sort: SortKey) -> Vec<Group>
where
    I: IntoIterator<Item = &'a SaleRecord>,
{
    let mut groups = aggregate_by(records, |r| dimension.key(r));
    sort_groups(&mut groups, sort);
    groups
}

/// Stable descending sort; ties keep their current order
pub fn sort_groups(groups: &mut [Group], sort: SortKey) {
    groups.sort_by(|a, b| {
        sort.value(&b.acc)
            .partial_cmp(&sort.value(&a.acc))
            .unwrap_or(Ordering::Equal)
    });
}

/// Keep the first `n` groups of an already sorted list
pub fn top_n(mut groups: Vec<Group>, n: usize) -> Vec<Group> {
    groups.truncate(n);
    groups
}

/// Merge groups under a key mapping (e.g. state to macro-region).
///
/// Invoice sets are unioned, so an invoice spanning two merged keys is counted
/// once. Output keeps first-encounter order of the mapped keys.
pub fn regroup<F>(groups: Vec<Group>, map_key: F) -> Vec<Group>
where
    F: Fn(&str) -> String,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut merged: Vec<Group> = Vec::new();

    for group in groups {
        let key = map_key(&group.key);
        match index.get(&key) {
            Some(&i) => merged[i].acc.merge(group.acc),
            None => {
                index.insert(key.clone(), merged.len());
                merged.push(Group {
                    key,
                    acc: group.acc,
                });
            }
        }
    }

    merged
}

/// Grand total over all records
pub fn totals<'a, I>(records: I) -> Accumulator
where
    I: IntoIterator<Item = &'a SaleRecord>,
{
    let mut acc = Accumulator::default();
    for record in records {
        acc.add(record);
    }
    acc
}
