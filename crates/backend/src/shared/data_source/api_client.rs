use async_trait::async_trait;
use chrono::NaiveDate;
use contracts::domain::a001_sale::aggregate::SaleRecord;
use contracts::domain::a002_customer::aggregate::CustomerRecord;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::error::FetchError;
use super::source::SalesSource;
use crate::domain::a001_sale::from_api::{self as sale_api, ApiSaleRow};
use crate::domain::a002_customer::from_api::{self as customer_api, ApiCustomerRow};
use crate::shared::config::ApiConfig;
use crate::shared::dates::format_api_date;
use crate::shared::format::format_number;

/// Response envelope shared by every endpoint of the sales API
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    #[serde(default)]
    success: bool,
    #[serde(default = "Vec::new")]
    data: Vec<T>,
    #[serde(default)]
    pagination: Option<Pagination>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Pagination {
    #[serde(default)]
    has_next_page: bool,
}

/// HTTP client for the remote sales API
#[derive(Clone)]
pub struct SalesApiClient {
    client: reqwest::Client,
    base_url: String,
    page_size: usize,
    max_pages: usize,
    retries: u32,
    retry_backoff: std::time::Duration,
}

impl SalesApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| FetchError::Network(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            page_size: config.page_size.max(1),
            max_pages: config.max_pages.max(1),
            retries: config.retries,
            retry_backoff: config.retry_backoff(),
        })
    }

    /// One GET with no retry
    async fn get_once<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<ApiEnvelope<T>, FetchError> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .query(query)
            .send()
            .await
            .map_err(|e| FetchError::Network(format!("{}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: ApiEnvelope<T> = response
            .json()
            .await
            .map_err(|e| FetchError::Decode(format!("{}: {}", url, e)))?;

        if !envelope.success {
            return Err(FetchError::Api(
                envelope
                    .error
                    .clone()
                    .unwrap_or_else(|| "Erro ao buscar dados".to_string()),
            ));
        }

        Ok(envelope)
    }

    /// GET with a fixed number of extra attempts and a linear backoff
    async fn get_with_retry<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<ApiEnvelope<T>, FetchError> {
        let mut attempt = 0u32;
        loop {
            match self.get_once(url, query).await {
                Ok(envelope) => return Ok(envelope),
                Err(e) if e.is_retryable() && attempt < self.retries => {
                    attempt += 1;
                    tracing::warn!(
                        "Sales API request failed (attempt {}/{}): {}",
                        attempt,
                        self.retries + 1,
                        e
                    );
                    tokio::time::sleep(self.retry_backoff * attempt).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Every page of sale rows for a date range
    pub async fn fetch_sale_rows(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<ApiSaleRow>, FetchError> {
        let url = format!("{}/api/vendas", self.base_url);
        let mut rows: Vec<ApiSaleRow> = Vec::new();
        let mut page = 1usize;

        loop {
            let query = [
                ("dataInicio", format_api_date(from)),
                ("dataFim", format_api_date(to)),
                ("page", page.to_string()),
                ("limit", self.page_size.to_string()),
            ];
            let envelope: ApiEnvelope<ApiSaleRow> = self.get_with_retry(&url, &query).await?;
            rows.extend(envelope.data);

            let has_next = envelope.pagination.map(|p| p.has_next_page).unwrap_or(false);
            if !has_next {
                break;
            }
            if page >= self.max_pages {
                tracing::warn!(
                    "Sales API pagination stopped at page cap {} for {}..{}",
                    self.max_pages,
                    from,
                    to
                );
                break;
            }
            page += 1;
        }

        tracing::debug!(
            "Sales API: {} rows in {} page(s) for {}..{}",
            format_number(rows.len()),
            page,
            from,
            to
        );
        Ok(rows)
    }
}

#[async_trait]
impl SalesSource for SalesApiClient {
    async fn fetch_sales(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<SaleRecord>, FetchError> {
        let rows = self.fetch_sale_rows(from, to).await?;
        Ok(sale_api::normalize_rows(&rows))
    }

    async fn fetch_customers(&self) -> Result<Vec<CustomerRecord>, FetchError> {
        let url = format!("{}/api/clientes", self.base_url);
        let envelope: ApiEnvelope<ApiCustomerRow> = self.get_with_retry(&url, &[]).await?;
        tracing::info!(
            "Sales API: {} customers loaded",
            format_number(envelope.data.len())
        );
        Ok(customer_api::normalize_rows(&envelope.data))
    }
}
