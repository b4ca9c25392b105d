use chrono::Datelike;
use contracts::domain::a001_sale::aggregate::{Movement, SaleRecord};
use serde::Deserialize;

use crate::domain::common::{lenient_f64, lenient_i64, lenient_string};
use crate::shared::dates::parse_local_date;

/// Sale line as exported by the remote `/api/vendas` endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiSaleRow {
    #[serde(rename = "Id", default, deserialize_with = "lenient_i64")]
    pub id: i64,

    #[serde(rename = "Data", default, deserialize_with = "lenient_string")]
    pub date: String,

    #[serde(rename = "Nota", default, deserialize_with = "lenient_string")]
    pub invoice: String,

    #[serde(rename = "Flag Tipo", default, deserialize_with = "lenient_string")]
    pub flag: String,

    #[serde(rename = "Cód. Cli", alias = "Cod. Cli", default, deserialize_with = "lenient_i64")]
    pub customer_code: i64,

    #[serde(rename = "Cliente", default, deserialize_with = "lenient_string")]
    pub customer_name: String,

    #[serde(rename = "Cód. Prod", alias = "Cod. Prod", default, deserialize_with = "lenient_string")]
    pub product_code: String,

    #[serde(rename = "Produto", default, deserialize_with = "lenient_string")]
    pub product_name: String,

    #[serde(rename = "Quant.", default, deserialize_with = "lenient_f64")]
    pub quantity: f64,

    #[serde(rename = "Total NF", default, deserialize_with = "lenient_f64")]
    pub total_nf: f64,

    #[serde(rename = "Total Merc.", default, deserialize_with = "lenient_f64")]
    pub total_merc: f64,

    #[serde(rename = "$ Margem", default, deserialize_with = "lenient_f64")]
    pub margin: f64,

    #[serde(rename = "Vlr.CMV", default, deserialize_with = "lenient_f64")]
    pub cost: f64,

    #[serde(rename = "Atividade", default, deserialize_with = "lenient_string")]
    pub activity: String,

    #[serde(rename = "Equipe", default, deserialize_with = "lenient_string")]
    pub team: String,

    #[serde(rename = "Vendedor", default, deserialize_with = "lenient_string")]
    pub salesperson: String,

    #[serde(rename = "Região", alias = "Regiao", default, deserialize_with = "lenient_string")]
    pub region: String,

    #[serde(rename = "UF", default, deserialize_with = "lenient_string")]
    pub state: String,

    #[serde(rename = "Cidade", default, deserialize_with = "lenient_string")]
    pub city: String,

    #[serde(rename = "Categoria", default, deserialize_with = "lenient_string")]
    pub category: String,

    #[serde(rename = "Ano", default, deserialize_with = "lenient_i64")]
    pub year: i64,

    #[serde(rename = "Mês", alias = "Mes", default, deserialize_with = "lenient_i64")]
    pub month: i64,
}

impl ApiSaleRow {
    /// Convert the raw row into a typed sale record.
    ///
    /// Year and month fall back to the parsed date when the row leaves them
    /// empty; a month outside 1..=12 is kept as 0.
    pub fn to_record(&self) -> SaleRecord {
        let date = parse_local_date(&self.date);

        let year = match i32::try_from(self.year) {
            Ok(y) if y > 0 => y,
            _ => date.map(|d| d.year()).unwrap_or(0),
        };
        let month = match u32::try_from(self.month) {
            Ok(m) if (1..=12).contains(&m) => m,
            _ => date.map(|d| d.month()).unwrap_or(0),
        };

        SaleRecord {
            line_id: self.id,
            date,
            invoice_id: self.invoice.trim().to_string(),
            movement: Movement::from_flag(&self.flag),
            customer_code: self.customer_code,
            customer_name: self.customer_name.clone(),
            product_code: self.product_code.clone(),
            product_name: self.product_name.clone(),
            quantity: self.quantity,
            gross_value: self.total_nf,
            merchandise_value: self.total_merc,
            margin_value: self.margin,
            cost_value: self.cost,
            channel: self.activity.clone(),
            team: self.team.clone(),
            salesperson: self.salesperson.clone(),
            region: self.region.clone(),
            state: self.state.to_uppercase(),
            city: self.city.clone(),
            category: self.category.clone(),
            year,
            month,
        }
    }
}

/// Normalize a batch of raw rows, logging how many degraded
pub fn normalize_rows(rows: &[ApiSaleRow]) -> Vec<SaleRecord> {
    let records: Vec<SaleRecord> = rows.iter().map(ApiSaleRow::to_record).collect();

    let undated = records.iter().filter(|r| r.date.is_none()).count();
    let unknown_flag = records
        .iter()
        .filter(|r| r.movement == Movement::Unknown)
        .count();
    if undated > 0 || unknown_flag > 0 {
        tracing::debug!(
            "Sale rows normalized: {} total, {} without a parseable date, {} with unknown movement flag",
            records.len(),
            undated,
            unknown_flag
        );
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_row_to_record() {
        let json = r#"{
            "Id": 17,
            "Data": "2025-03-14T00:00:00.000Z",
            "Nota": " 000123 ",
            "Flag Tipo": "V",
            "Cód. Cli": 501,
            "Cliente": "BORRACHARIA SAO JOSE",
            "Cód. Prod": "PR-10",
            "Produto": "MANCAL 10",
            "Quant.": "3",
            "Total NF": 1500.75,
            "Total Merc.": 1400,
            "$ Margem": "450,25",
            "Vlr.CMV": -950.5,
            "Atividade": "REVENDA",
            "Equipe": "VAREJO",
            "Vendedor": "ANA",
            "Região": "SUL",
            "UF": "pr",
            "Cidade": "CURITIBA",
            "Categoria": "LINHA VAREJO",
            "Ano": 2025,
            "Mês": 3
        }"#;
        let row: ApiSaleRow = serde_json::from_str(json).unwrap();
        let record = row.to_record();

        assert_eq!(record.line_id, 17);
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2025, 3, 14));
        assert_eq!(record.invoice_id, "000123");
        assert_eq!(record.movement, Movement::Sale);
        assert_eq!(record.customer_code, 501);
        assert_eq!(record.quantity, 3.0);
        assert_eq!(record.gross_value, 1500.75);
        assert_eq!(record.margin_value, 450.25);
        assert_eq!(record.state, "PR");
        assert_eq!((record.year, record.month), (2025, 3));
    }

    #[test]
    fn test_missing_fields_degrade() {
        let row: ApiSaleRow =
            serde_json::from_str(r#"{"Data": "garbage", "Flag Tipo": null, "Mês": 14}"#).unwrap();
        let record = row.to_record();

        assert_eq!(record.date, None);
        assert_eq!(record.movement, Movement::Unknown);
        assert_eq!(record.month, 0);
        assert_eq!(record.year, 0);
        assert_eq!(record.gross_value, 0.0);
    }

    #[test]
    fn test_month_from_date_when_missing() {
        let row: ApiSaleRow = serde_json::from_str(r#"{"Data": "15/07/2024"}"#).unwrap();
        let record = row.to_record();
        assert_eq!((record.year, record.month), (2024, 7));
    }
}
