use contracts::domain::a002_customer::aggregate::{CustomerRecord, Situation};
use serde::Deserialize;

use crate::domain::common::{lenient_i64, lenient_string};
use crate::shared::dates::parse_local_date;

/// Customer master row as exported by the remote `/api/clientes` endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiCustomerRow {
    #[serde(rename = "Cód. Cli", alias = "Cod. Cli", default, deserialize_with = "lenient_i64")]
    pub code: i64,

    #[serde(rename = "Cliente", default, deserialize_with = "lenient_string")]
    pub name: String,

    #[serde(rename = "Atividade", default, deserialize_with = "lenient_string")]
    pub activity: String,

    #[serde(rename = "UF", default, deserialize_with = "lenient_string")]
    pub state: String,

    #[serde(rename = "Cidade", default, deserialize_with = "lenient_string")]
    pub city: String,

    #[serde(rename = "Email", default, deserialize_with = "lenient_string")]
    pub email: String,

    #[serde(rename = "Últ.Compra", alias = "Ult.Compra", default, deserialize_with = "lenient_string")]
    pub last_purchase: String,

    #[serde(rename = "Data Cad.", default, deserialize_with = "lenient_string")]
    pub registered_on: String,

    #[serde(rename = "Situacao", alias = "Situação", default, deserialize_with = "lenient_string")]
    pub situation: String,

    #[serde(rename = "Categoria", default, deserialize_with = "lenient_string")]
    pub category: String,

    #[serde(rename = "Regiao", alias = "Região", default, deserialize_with = "lenient_string")]
    pub region: String,
}

impl ApiCustomerRow {
    /// Convert the raw row into a customer record; unparseable dates become `None`
    pub fn to_record(&self) -> CustomerRecord {
        CustomerRecord {
            code: self.code,
            name: self.name.clone(),
            activity: self.activity.clone(),
            category: Some(self.category.clone()).filter(|c| !c.is_empty()),
            region: self.region.clone(),
            state: self.state.to_uppercase(),
            city: self.city.clone(),
            email: self.email.clone(),
            registered_on: parse_local_date(&self.registered_on),
            last_purchase: parse_local_date(&self.last_purchase),
            situation: Situation::from_flag(&self.situation),
        }
    }
}

pub fn normalize_rows(rows: &[ApiCustomerRow]) -> Vec<CustomerRecord> {
    let records: Vec<CustomerRecord> = rows.iter().map(ApiCustomerRow::to_record).collect();

    let without_purchase = records.iter().filter(|c| c.last_purchase.is_none()).count();
    if without_purchase > 0 {
        tracing::debug!(
            "Customer rows normalized: {} total, {} without a parseable last purchase",
            records.len(),
            without_purchase
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
            "Cod. Cli": 88,
            "Cliente": "AUTO PECAS LTDA",
            "Atividade": "REVENDA",
            "UF": "sc",
            "Cidade": "JOINVILLE",
            "Email": "compras@autopecas.com.br",
            "Ult.Compra": "2025-11-03T00:00:00",
            "Data Cad.": "2019-05-20",
            "Situacao": "A",
            "Categoria": null,
            "Regiao": "SUL"
        }"#;
        let row: ApiCustomerRow = serde_json::from_str(json).unwrap();
        let record = row.to_record();

        assert_eq!(record.code, 88);
        assert_eq!(record.state, "SC");
        assert_eq!(record.category, None);
        assert_eq!(record.last_purchase, NaiveDate::from_ymd_opt(2025, 11, 3));
        assert_eq!(record.registered_on, NaiveDate::from_ymd_opt(2019, 5, 20));
        assert_eq!(record.situation, Situation::Active);
    }

    #[test]
    fn test_bad_dates_become_none() {
        let row: ApiCustomerRow =
            serde_json::from_str(r#"{"Cód. Cli": "12", "Ult.Compra": "", "Situacao": "I"}"#)
                .unwrap();
        let record = row.to_record();
        assert_eq!(record.code, 12);
        assert_eq!(record.last_purchase, None);
        assert_eq!(record.situation, Situation::Inactive);
    }
}
