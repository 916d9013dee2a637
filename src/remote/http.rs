use super::RemoteLedger;
use super::util::{RetryPolicy, send_with_retry};
use crate::core::{Ledger, Record};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LedgerResponse {
    success: bool,
    records: Option<Vec<Record>>,
    #[serde(default)]
    last_id: u64,
    error: Option<String>,
}

impl LedgerResponse {
    /// A reply without `records` is not an empty ledger.
    fn into_ledger(self, endpoint: &str) -> Result<Ledger> {
        if !self.success {
            return Err(failure(endpoint, self.error));
        }
        let records = self
            .records
            .ok_or_else(|| anyhow!("{endpoint} response is missing records"))?;
        Ok(Ledger {
            records,
            last_id: self.last_id,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RecordResponse {
    success: bool,
    record: Option<Record>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    success: bool,
    error: Option<String>,
}

fn failure(endpoint: &str, error: Option<String>) -> anyhow::Error {
    anyhow!(
        "Server reported failure for {}: {}",
        endpoint,
        error.as_deref().unwrap_or("no details")
    )
}

/// JSON client for the expense server's `/api` endpoints.
pub struct HttpRemote {
    api_url: String,
    client: Client,
    retry: RetryPolicy,
}

impl HttpRemote {
    pub fn new(base_url: &str, timeout: Duration, retry: RetryPolicy) -> Result<Self> {
        let client = Client::builder()
            .user_agent("expman/1.0")
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            api_url: format!("{}/api", base_url.trim_end_matches('/')),
            client,
            retry,
        })
    }

    async fn parse<T: DeserializeOwned>(response: Response, endpoint: &str) -> Result<T> {
        let status = response.status();
        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {endpoint}"))?;
        if !status.is_success() {
            return Err(anyhow!(
                "{} responded with {}: '{}'",
                endpoint,
                status,
                body
            ));
        }
        serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse {endpoint} response. Response: '{body}'"))
    }
}

#[async_trait]
impl RemoteLedger for HttpRemote {
    #[instrument(name = "RemoteFetch", skip(self))]
    async fn fetch_ledger(&self) -> Result<Ledger> {
        let url = format!("{}/get_expenses", self.api_url);
        debug!("Requesting ledger from {}", url);

        let response = send_with_retry(|| self.client.get(&url).send(), self.retry)
            .await
            .context("Failed to fetch ledger")?;
        let body: LedgerResponse = Self::parse(response, "get_expenses").await?;
        let ledger = body.into_ledger("get_expenses")?;

        debug!(records = ledger.records.len(), "Fetched ledger");
        Ok(ledger)
    }

    #[instrument(name = "RemoteSync", skip(self, ledger), fields(records = ledger.records.len()))]
    async fn sync_ledger(&self, ledger: &Ledger) -> Result<Ledger> {
        let url = format!("{}/sync", self.api_url);
        let response = self
            .client
            .post(&url)
            .json(ledger)
            .send()
            .await
            .context("Failed to sync ledger")?;
        let body: LedgerResponse = Self::parse(response, "sync").await?;
        let ledger = body.into_ledger("sync")?;

        debug!(
            records = ledger.records.len(),
            last_id = ledger.last_id,
            "Synced ledger"
        );
        Ok(ledger)
    }

    #[instrument(name = "RemoteAdd", skip(self, record), fields(id = record.id))]
    async fn add_record(&self, record: &Record) -> Result<Record> {
        let url = format!("{}/add_expense", self.api_url);
        let response = self
            .client
            .post(&url)
            .json(record)
            .send()
            .await
            .context("Failed to send record")?;
        let body: RecordResponse = Self::parse(response, "add_expense").await?;
        match body {
            RecordResponse {
                success: true,
                record: Some(canonical),
                ..
            } => Ok(canonical),
            RecordResponse { error, .. } => Err(failure("add_expense", error)),
        }
    }

    #[instrument(name = "RemoteDelete", skip(self))]
    async fn delete_record(&self, id: u64) -> Result<bool> {
        let url = format!("{}/delete_expense/{}", self.api_url, id);
        let response = send_with_retry(|| self.client.delete(&url).send(), self.retry)
            .await
            .with_context(|| format!("Failed to delete record {id}"))?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!(id, "Record not present on server");
            return Ok(false);
        }
        let body: StatusResponse = Self::parse(response, "delete_expense").await?;
        if !body.success {
            return Err(failure("delete_expense", body.error));
        }
        Ok(true)
    }
}
