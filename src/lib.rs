pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod export;
pub mod ledger;
pub mod session;
pub mod view;

pub use client::{HttpReportingClient, ReportingApi};
pub use config::Config;
pub use controller::{QueryController, ViewState, FETCH_FAILED_MESSAGE};
pub use error::{LedgerError, Result};
pub use ledger::{FilterState, PaymentRecord, PaymentStatus, ReportResult, SavingsType};
pub use session::Session;
pub use view::{LedgerView, Theme};
