use std::str::FromStr;

use crate::error::LedgerError;

/// Status selector; `All` means no status restriction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Success,
    Pending,
    Failed,
}

impl StatusFilter {
    /// Value sent as the `status` query parameter
    pub fn as_query(self) -> &'static str {
        match self {
            StatusFilter::All => "ALL",
            StatusFilter::Success => "SUKSES",
            StatusFilter::Pending => "PENDING",
            StatusFilter::Failed => "FAILED",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "Semua Status",
            other => other.as_query(),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" | "semua" => Ok(StatusFilter::All),
            "sukses" | "success" => Ok(StatusFilter::Success),
            "pending" => Ok(StatusFilter::Pending),
            "failed" | "gagal" => Ok(StatusFilter::Failed),
            _ => Err(LedgerError::InvalidStatus(s.to_string())),
        }
    }
}

/// Savings-type selector: every type, or one type id
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SavingsTypeFilter {
    #[default]
    All,
    Id(String),
}

impl SavingsTypeFilter {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("all") {
            SavingsTypeFilter::All
        } else {
            SavingsTypeFilter::Id(raw.to_string())
        }
    }

    /// Value sent as the `jenis_simpanan_id` query parameter
    pub fn as_query(&self) -> &str {
        match self {
            SavingsTypeFilter::All => "ALL",
            SavingsTypeFilter::Id(id) => id,
        }
    }
}

/// The operator-controlled filters. Each effective change triggers a fetch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    pub search_term: String,
    pub status: StatusFilter,
    pub savings_type: SavingsTypeFilter,
}

impl FilterState {
    /// Query parameters for the history endpoint; all three are always sent
    pub fn query_pairs(&self) -> [(&'static str, &str); 3] {
        [
            ("search", self.search_term.as_str()),
            ("status", self.status.as_query()),
            ("jenis_simpanan_id", self.savings_type.as_query()),
        ]
    }

    /// Apply a change; returns whether anything actually differs afterwards
    pub fn apply(&mut self, change: FilterChange) -> bool {
        let before = self.clone();
        if let Some(search) = change.search_term {
            self.search_term = search;
        }
        if let Some(status) = change.status {
            self.status = status;
        }
        if let Some(savings_type) = change.savings_type {
            self.savings_type = savings_type;
        }
        *self != before
    }
}

/// A submitted edit to one or more filter fields
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterChange {
    pub search_term: Option<String>,
    pub status: Option<StatusFilter>,
    pub savings_type: Option<SavingsTypeFilter>,
}

impl FilterChange {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search_term: Some(term.into()),
            ..Self::default()
        }
    }

    pub fn status(status: StatusFilter) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn savings_type(savings_type: SavingsTypeFilter) -> Self {
        Self {
            savings_type: Some(savings_type),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.search_term.is_none() && self.status.is_none() && self.savings_type.is_none()
    }
}
