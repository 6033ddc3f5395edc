use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use ureq::Agent;

use crate::error::{LedgerError, Result};
use crate::ledger::{FilterState, ReportResult, SavingsType};

pub const HISTORY_PATH: &str = "/api/history-pembayaran-all";
pub const SAVINGS_TYPES_PATH: &str = "/api/jenis-simpanan";

/// Read-only access to the reporting API
pub trait ReportingApi: Send + Sync {
    /// Reference list for the savings-type filter
    fn list_savings_types(&self) -> Result<Vec<SavingsType>>;

    /// Payment history matching `filter`, plus the server-side success total
    fn payment_history(&self, filter: &FilterState) -> Result<ReportResult>;
}

#[derive(Deserialize)]
struct SavingsTypeList {
    jenis_simpanan: Vec<SavingsType>,
}

/// Blocking HTTP implementation over a shared `ureq` agent
#[derive(Clone)]
pub struct HttpReportingClient {
    agent: Agent,
    base_url: String,
}

impl HttpReportingClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = self.endpoint(path);
        debug!(%url, ?query, "GET");

        let mut request = self.agent.get(&url);
        for (key, value) in query {
            request = request.query(*key, *value);
        }

        let transport = |e: ureq::Error| LedgerError::Transport {
            url: url.clone(),
            reason: e.to_string(),
        };

        let mut response = request.call().map_err(transport)?;
        let body = response.body_mut().read_to_string().map_err(transport)?;

        serde_json::from_str(&body).map_err(|e| LedgerError::MalformedResponse {
            url: url.clone(),
            source: e,
        })
    }
}

impl ReportingApi for HttpReportingClient {
    fn list_savings_types(&self) -> Result<Vec<SavingsType>> {
        let list: SavingsTypeList = self.get_json(SAVINGS_TYPES_PATH, &[])?;
        Ok(list.jenis_simpanan)
    }

    fn payment_history(&self, filter: &FilterState) -> Result<ReportResult> {
        self.get_json(HISTORY_PATH, &filter.query_pairs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_ignored() {
        let client = HttpReportingClient::new("http://localhost:8080/", Duration::from_secs(1));
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(
            client.endpoint(HISTORY_PATH),
            "http://localhost:8080/api/history-pembayaran-all"
        );
    }
}
