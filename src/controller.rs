use tracing::{debug, warn};

use crate::error::LedgerError;
use crate::ledger::{
    FilterChange, FilterState, PaymentRecord, ReportResult, SavingsTypeFilter, StatusFilter,
};

/// Shown in place of the table whenever a history fetch fails
pub const FETCH_FAILED_MESSAGE: &str = "Gagal memuat data riwayat pembayaran. Mohon coba lagi.";

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewState {
    #[default]
    Idle,
    Loading,
    Success(ReportResult),
    Failure(String),
}

/// A fetch the caller must run, tagged so its response can be matched back
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub ticket: u64,
    pub filter: FilterState,
}

impl FetchRequest {
    pub fn complete(self, outcome: Result<ReportResult, LedgerError>) -> FetchResponse {
        FetchResponse {
            ticket: self.ticket,
            filter: self.filter,
            outcome,
        }
    }
}

#[derive(Debug)]
pub struct FetchResponse {
    pub ticket: u64,
    pub filter: FilterState,
    pub outcome: Result<ReportResult, LedgerError>,
}

/// Owns the filters and the displayed result. Only the response to the most
/// recent request, taken against the current filters, is ever applied.
#[derive(Debug, Default)]
pub struct QueryController {
    filter: FilterState,
    state: ViewState,
    last_ticket: u64,
}

impl QueryController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(filter: FilterState) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Initial fetch when the view comes up
    pub fn mount(&mut self) -> FetchRequest {
        self.issue()
    }

    /// Apply a filter edit. Returns the single fetch it triggers, or `None`
    /// when the filters are unchanged.
    pub fn apply(&mut self, change: FilterChange) -> Option<FetchRequest> {
        if self.filter.apply(change) {
            Some(self.issue())
        } else {
            None
        }
    }

    pub fn set_search(&mut self, term: impl Into<String>) -> Option<FetchRequest> {
        self.apply(FilterChange::search(term))
    }

    pub fn set_status(&mut self, status: StatusFilter) -> Option<FetchRequest> {
        self.apply(FilterChange::status(status))
    }

    pub fn set_savings_type(&mut self, savings_type: SavingsTypeFilter) -> Option<FetchRequest> {
        self.apply(FilterChange::savings_type(savings_type))
    }

    fn issue(&mut self) -> FetchRequest {
        self.last_ticket += 1;
        self.state = ViewState::Loading;
        debug!(ticket = self.last_ticket, filter = ?self.filter, "history fetch issued");
        FetchRequest {
            ticket: self.last_ticket,
            filter: self.filter.clone(),
        }
    }

    /// Apply a completed fetch. Returns false when the response was
    /// superseded by a later filter change and has been dropped.
    pub fn resolve(&mut self, response: FetchResponse) -> bool {
        if response.ticket != self.last_ticket || response.filter != self.filter {
            debug!(
                ticket = response.ticket,
                latest = self.last_ticket,
                "discarding stale history response"
            );
            return false;
        }

        self.state = match response.outcome {
            Ok(result) => {
                debug!(
                    ticket = response.ticket,
                    records = result.records.len(),
                    "history fetch applied"
                );
                ViewState::Success(result)
            }
            Err(e) => {
                warn!(ticket = response.ticket, "history fetch failed: {e}");
                ViewState::Failure(FETCH_FAILED_MESSAGE.to_string())
            }
        };
        true
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ViewState::Loading)
    }

    pub fn records(&self) -> &[PaymentRecord] {
        match &self.state {
            ViewState::Success(result) => &result.records,
            _ => &[],
        }
    }

    pub fn total_success_amount(&self) -> f64 {
        match &self.state {
            ViewState::Success(result) => result.total_success_amount,
            _ => 0.0,
        }
    }

    pub fn can_export(&self) -> bool {
        self.filter.status == StatusFilter::Success
    }
}
