use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Movement flag of an invoice line (`Flag Tipo` in the remote API)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Movement {
    /// `V`, sale
    Sale,
    /// `D`, return (devolução)
    Return,
    /// Any other flag; skipped by the aggregations
    #[default]
    Unknown,
}

impl Movement {
    /// Parse the remote one-letter flag
    pub fn from_flag(flag: &str) -> Self {
        match flag.trim() {
            "V" | "v" => Movement::Sale,
            "D" | "d" => Movement::Return,
            _ => Movement::Unknown,
        }
    }

    /// Remote one-letter flag
    pub fn code(&self) -> &'static str {
        match self {
            Movement::Sale => "V",
            Movement::Return => "D",
            Movement::Unknown => "?",
        }
    }
}

/// One line item of an invoice, normalized at the ingestion boundary.
///
/// Identity is `(invoice_id, product_code, line_id)`. Monetary fields keep the
/// sign the source system sent; return lines usually carry negative values and
/// the aggregations take their absolute value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub line_id: i64,
    /// Issue date (local calendar date, `None` when the source date was unparseable)
    pub date: Option<NaiveDate>,
    /// Invoice number, trimmed
    pub invoice_id: String,
    pub movement: Movement,
    pub customer_code: i64,
    pub customer_name: String,
    pub product_code: String,
    pub product_name: String,
    pub quantity: f64,
    /// Invoice line total (`Total NF`), the figure all revenue is built from
    pub gross_value: f64,
    /// Merchandise total without taxes and freight (`Total Merc.`)
    pub merchandise_value: f64,
    /// Margin in currency (`$ Margem`)
    pub margin_value: f64,
    /// Cost of goods sold (`Vlr.CMV`)
    pub cost_value: f64,
    /// Sales channel (`Atividade`)
    pub channel: String,
    /// Sales team (`Equipe`)
    pub team: String,
    pub salesperson: String,
    pub region: String,
    /// Brazilian state code (`UF`), upper-cased
    pub state: String,
    pub city: String,
    pub category: String,
    pub year: i32,
    pub month: u32,
}

impl SaleRecord {
    pub fn is_sale(&self) -> bool {
        self.movement == Movement::Sale
    }

    pub fn is_return(&self) -> bool {
        self.movement == Movement::Return
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_from_flag() {
        assert_eq!(Movement::from_flag("V"), Movement::Sale);
        assert_eq!(Movement::from_flag(" D "), Movement::Return);
        assert_eq!(Movement::from_flag("X"), Movement::Unknown);
        assert_eq!(Movement::from_flag(""), Movement::Unknown);
    }
}
